//! The canonical element stream.
//!
//! Both the vdproj text format and its XML form are read into, and written
//! from, a flat depth-first sequence of [`Event`]s. No tree is materialized;
//! a stream is produced and consumed in one pass.

use std::fmt;

use crate::Result;

/// Reserved XML element name for keyless entries.
pub const NO_KEY_ENTRY: &str = "NoKeyEntry";

/// Name of an element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Name {
    /// A regular key, stored raw (unescaped and XML-decoded).
    Key(String),
    /// A keyless entry such as `"BootstrapperCfg:{63ACBE69-...}"`.
    Keyless,
}

impl Name {
    /// The raw key, or `None` for keyless entries.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::Key(key) => Some(key),
            Self::Keyless => None,
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "{:?}", key),
            Self::Keyless => f.write_str(NO_KEY_ENTRY),
        }
    }
}

/// An inline value, written as `"<value_type>:<value>"` in vdproj.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Value {
    /// Registry tag of the value (`"8"` for strings, `"3"` for integers...).
    /// For keyless entries this is the text before the first colon.
    pub value_type: String,
    /// Raw (unescaped) value text.
    pub value: String,
}

impl Value {
    /// Create a new value.
    pub fn new(value_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            value_type: value_type.into(),
            value: value.into(),
        }
    }
}

/// An element header carried by [`Event::Open`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Element {
    /// Element name.
    pub name: Name,
    /// Inline value. Keyed elements with a value never have children.
    pub value: Option<Value>,
}

impl Element {
    /// A keyed element without a value (a block or a bare line).
    pub fn key(name: impl Into<String>) -> Self {
        Self {
            name: Name::Key(name.into()),
            value: None,
        }
    }

    /// A keyed element with an inline value.
    pub fn valued(name: impl Into<String>, value_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Name::Key(name.into()),
            value: Some(Value::new(value_type, value)),
        }
    }

    /// A keyless entry.
    pub fn keyless(value_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Name::Keyless,
            value: Some(Value::new(value_type, value)),
        }
    }

    /// Whether this element may contain children.
    ///
    /// Only keyed elements with an inline value are always self-closing.
    /// Keyless entries such as `"{EDC2488A-...}:.NETFramework,Version=v4.5.2"`
    /// regularly head a block.
    #[inline]
    pub fn can_have_children(&self) -> bool {
        matches!(self.name, Name::Keyless) || self.value.is_none()
    }
}

/// A single step of the canonical element stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    /// Begins an element.
    ///
    /// Followed directly by [`Event::Close`] the element is a single line;
    /// followed by another `Open` or by [`Event::Blank`] it opens a block.
    Open(Element),
    /// Placeholder inside a block written as `{` directly followed by `}`.
    ///
    /// Rendered as a single whitespace text node in XML so the empty block
    /// stays distinguishable from a self-closing element.
    Blank,
    /// Ends the innermost open element.
    Close,
}

/// Consumer of an element stream.
pub trait EventSink {
    /// Handle the next event.
    fn event(&mut self, event: Event) -> Result<()>;

    /// Called once after the last event. Flushes output and checks that
    /// every element was closed.
    fn finish(&mut self) -> Result<()>;
}

impl EventSink for Vec<Event> {
    fn event(&mut self, event: Event) -> Result<()> {
        self.push(event);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Pump every event from `events` into `sink`, then finish the sink.
///
/// Returns the number of events transferred. Stops at the first error.
pub fn transfer<I, S>(events: I, sink: &mut S) -> Result<usize>
where
    I: IntoIterator<Item = Result<Event>>,
    S: EventSink + ?Sized,
{
    let mut count = 0;
    for event in events {
        sink.event(event?)?;
        count += 1;
    }
    sink.finish()?;
    Ok(count)
}
