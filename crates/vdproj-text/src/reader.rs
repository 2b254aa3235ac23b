//! Streaming vdproj reader.

use std::collections::VecDeque;
use std::io::BufRead;

use tracing::debug;
use vdproj_common::{Event, Result};

use crate::parser::LineState;

/// Reads vdproj text one line at a time and yields element events.
///
/// # Example
///
/// ```
/// use vdproj_common::{Element, Event};
/// use vdproj_text::VdprojReader;
///
/// let text = "\"ProductName\" = \"8:MyApp\"\r\n";
/// let events: Vec<Event> = VdprojReader::new(text.as_bytes())
///     .collect::<Result<_, _>>()
///     .unwrap();
///
/// assert_eq!(events[0], Event::Open(Element::valued("ProductName", "8", "MyApp")));
/// assert_eq!(events[1], Event::Close);
/// ```
#[derive(Debug)]
pub struct VdprojReader<R> {
    input: R,
    state: LineState,
    pending: VecDeque<Event>,
    line: String,
    line_number: usize,
    done: bool,
}

impl<R: BufRead> VdprojReader<R> {
    /// Create a reader over buffered input.
    pub fn new(input: R) -> Self {
        Self {
            input,
            state: LineState::new(),
            pending: VecDeque::new(),
            line: String::new(),
            line_number: 0,
            done: false,
        }
    }

    /// Number of lines consumed so far.
    #[inline]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Read the next line and run it through the state machine.
    fn advance(&mut self) -> Result<()> {
        self.line.clear();
        if self.input.read_line(&mut self.line)? == 0 {
            self.done = true;
            debug!(lines = self.line_number, "end of vdproj input");
            return self.state.finish(&mut self.pending);
        }

        self.line_number += 1;
        let mut line = self.line.as_str();
        if self.line_number == 1 {
            line = line.strip_prefix('\u{feff}').unwrap_or(line);
        }

        self.state = self.state.step(self.line_number, line, &mut self.pending)?;
        Ok(())
    }
}

impl<R: BufRead> Iterator for VdprojReader<R> {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(Ok(event));
            }
            if self.done {
                return None;
            }
            if let Err(e) = self.advance() {
                self.done = true;
                self.pending.clear();
                return Some(Err(e));
            }
        }
    }
}
