//! vdproj text writer.

use std::io::Write;

use vdproj_common::escape::escape;
use vdproj_common::{Element, Error, Event, EventSink, Name, Result};

/// Indentation unit for one nesting level.
const INDENT: &str = "    ";

/// Line terminator used by [`VdprojWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// `\r\n`, as written by Visual Studio.
    #[default]
    CrLf,
    /// `\n`
    Lf,
}

impl LineEnding {
    /// The terminator text.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CrLf => "\r\n",
            Self::Lf => "\n",
        }
    }
}

/// Writes an element stream as vdproj text.
///
/// The writer holds back each `Open` until the next event shows whether the
/// element is a single line (`Close` follows) or a block (`Open` or `Blank`
/// follows).
///
/// # Example
///
/// ```
/// use vdproj_common::{transfer, Element, Event};
/// use vdproj_text::{LineEnding, VdprojWriter};
///
/// let events = vec![
///     Event::Open(Element::key("Outer")),
///     Event::Open(Element::valued("Inner", "3", "1")),
///     Event::Close,
///     Event::Close,
/// ];
///
/// let mut writer = VdprojWriter::new(Vec::new()).with_line_ending(LineEnding::Lf);
/// transfer(events.into_iter().map(Ok), &mut writer).unwrap();
///
/// let text = String::from_utf8(writer.into_inner()).unwrap();
/// assert_eq!(text, "\"Outer\"\n{\n    \"Inner\" = \"3:1\"\n}\n");
/// ```
#[derive(Debug)]
pub struct VdprojWriter<W: Write> {
    output: W,
    line_ending: LineEnding,
    depth: usize,
    pending: Option<Element>,
}

impl<W: Write> VdprojWriter<W> {
    /// Create a writer using `\r\n` line endings.
    pub fn new(output: W) -> Self {
        Self {
            output,
            line_ending: LineEnding::default(),
            depth: 0,
            pending: None,
        }
    }

    /// Use a different line terminator.
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Consume the writer and return the underlying output.
    pub fn into_inner(self) -> W {
        self.output
    }

    /// Write the held-back element as the header of a block and step inside it.
    fn open_block(&mut self, element: Element) -> Result<()> {
        if !element.can_have_children() {
            return Err(Error::UnbalancedStructure(format!(
                "element {} has an inline value and cannot contain children",
                element.name
            )));
        }
        self.write_element(&element)?;
        self.write_line("{")?;
        self.depth += 1;
        Ok(())
    }

    fn write_element(&mut self, element: &Element) -> Result<()> {
        self.write_indent()?;
        match (&element.name, &element.value) {
            (Name::Key(key), None) => {
                write!(self.output, "\"{}\"", escape(key))?;
            }
            (Name::Key(key), Some(value)) => {
                write!(
                    self.output,
                    "\"{}\" = \"{}:{}\"",
                    escape(key),
                    value.value_type,
                    escape(&value.value)
                )?;
            }
            (Name::Keyless, Some(value)) => {
                write!(
                    self.output,
                    "\"{}:{}\"",
                    escape(&value.value_type),
                    escape(&value.value)
                )?;
            }
            (Name::Keyless, None) => {
                return Err(Error::UnbalancedStructure(
                    "keyless entry without a value type and value".to_string(),
                ));
            }
        }
        self.output.write_all(self.line_ending.as_str().as_bytes())?;
        Ok(())
    }

    fn write_line(&mut self, text: &str) -> Result<()> {
        self.write_indent()?;
        self.output.write_all(text.as_bytes())?;
        self.output.write_all(self.line_ending.as_str().as_bytes())?;
        Ok(())
    }

    fn write_indent(&mut self) -> Result<()> {
        for _ in 0..self.depth {
            self.output.write_all(INDENT.as_bytes())?;
        }
        Ok(())
    }
}

impl<W: Write> EventSink for VdprojWriter<W> {
    fn event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Open(element) => {
                if let Some(parent) = self.pending.take() {
                    self.open_block(parent)?;
                }
                self.pending = Some(element);
            }
            Event::Blank => {
                let element = self.pending.take().ok_or_else(|| {
                    Error::UnbalancedStructure("empty block placeholder outside an element".to_string())
                })?;
                self.open_block(element)?;
            }
            Event::Close => {
                if let Some(element) = self.pending.take() {
                    self.write_element(&element)?;
                } else if self.depth == 0 {
                    return Err(Error::UnbalancedStructure(
                        "close without an open element".to_string(),
                    ));
                } else {
                    self.depth -= 1;
                    self.write_line("}")?;
                }
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let open = self.depth + usize::from(self.pending.is_some());
        if open > 0 {
            return Err(Error::UnbalancedStructure(format!(
                "{} element(s) left open",
                open
            )));
        }
        self.output.flush()?;
        Ok(())
    }
}
