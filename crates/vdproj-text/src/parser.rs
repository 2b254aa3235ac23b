//! Line-by-line state machine turning vdproj lines into element events.
//!
//! vdproj never closes single-line elements explicitly: an element line is
//! closed by whatever comes next, unless that is the `{` opening its block.
//! [`LineState`] carries just enough context (what the previous significant
//! line was and how many elements are open) to decide this, and
//! [`LineState::step`] is a pure function of that state and the next line.

use tracing::trace;
use vdproj_common::escape::unescape;
use vdproj_common::{Element, Error, Event, Result};

use crate::grammar::{classify, Line};

/// What the previous significant line was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Previous {
    #[default]
    Other,
    /// `"name"` or a keyless entry; may be followed by `{`.
    BlockHeader,
    /// `"name" = "type:value"`.
    ValuedElement,
    /// `{`
    OpenBrace,
}

/// Parser state between two lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineState {
    previous: Previous,
    depth: usize,
}

impl LineState {
    /// State before the first line.
    pub const fn new() -> Self {
        Self {
            previous: Previous::Other,
            depth: 0,
        }
    }

    /// Number of elements opened and not yet closed.
    #[inline]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Feed one line, appending the events it completes to `out`.
    ///
    /// `number` is the 1-based line number used in error messages.
    pub fn step<O>(self, number: usize, line: &str, out: &mut O) -> Result<Self>
    where
        O: Extend<Event>,
    {
        match classify(number, line)? {
            Line::Empty => Ok(self),
            Line::Element { name, value } => {
                let element = match value {
                    Some((value_type, value)) => {
                        Element::valued(unescape(name), value_type, unescape(value))
                    }
                    None => Element::key(unescape(name)),
                };
                Ok(self.open(element, out))
            }
            Line::Keyless { value_type, value } => {
                Ok(self.open(Element::keyless(unescape(value_type), unescape(value)), out))
            }
            Line::OpenBrace => match self.previous {
                Previous::BlockHeader => Ok(Self {
                    previous: Previous::OpenBrace,
                    ..self
                }),
                Previous::ValuedElement => Err(Error::malformed_line(
                    number,
                    "an element with a value cannot open a block",
                )),
                Previous::Other | Previous::OpenBrace => Err(Error::malformed_line(
                    number,
                    "`{` must directly follow an element name or keyless entry",
                )),
            },
            Line::CloseBrace => {
                let mut next = self.close_element_line(out);
                if next.previous == Previous::OpenBrace {
                    trace!(line = number, "empty block");
                    emit(out, Event::Blank);
                }
                if next.depth == 0 {
                    return Err(Error::UnbalancedStructure(format!(
                        "unmatched `}}` on line {}",
                        number
                    )));
                }
                next.depth -= 1;
                next.previous = Previous::Other;
                emit(out, Event::Close);
                Ok(next)
            }
        }
    }

    /// Close a trailing element line and check that every block was closed.
    pub fn finish<O>(self, out: &mut O) -> Result<()>
    where
        O: Extend<Event>,
    {
        let state = self.close_element_line(out);
        if state.depth > 0 {
            return Err(Error::UnbalancedStructure(format!(
                "end of input with {} element(s) still open",
                state.depth
            )));
        }
        Ok(())
    }

    fn open<O: Extend<Event>>(self, element: Element, out: &mut O) -> Self {
        let mut next = self.close_element_line(out);
        next.previous = if element.can_have_children() {
            Previous::BlockHeader
        } else {
            Previous::ValuedElement
        };
        next.depth += 1;
        emit(out, Event::Open(element));
        next
    }

    /// An element line not followed by `{` ends as soon as the next line arrives.
    fn close_element_line<O: Extend<Event>>(self, out: &mut O) -> Self {
        match self.previous {
            Previous::BlockHeader | Previous::ValuedElement => {
                emit(out, Event::Close);
                Self {
                    previous: Previous::Other,
                    depth: self.depth - 1,
                }
            }
            Previous::Other | Previous::OpenBrace => self,
        }
    }
}

#[inline]
fn emit<O: Extend<Event>>(out: &mut O, event: Event) {
    out.extend(std::iter::once(event));
}
