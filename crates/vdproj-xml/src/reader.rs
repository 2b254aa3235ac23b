//! Element stream from an XML document.

use std::collections::VecDeque;
use std::io::BufRead;

use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::Reader;
use tracing::debug;
use vdproj_common::{Element, Error, Event, Result, NO_KEY_ENTRY};

use crate::input::XmlInput;
use crate::name::decode_name;
use crate::{VALUE_ATTRIBUTE, VALUE_TYPE_ATTRIBUTE};

/// Reads an XML document written by [`XmlEventWriter`](crate::XmlEventWriter)
/// and yields the element stream it describes.
///
/// An element written with an explicit end tag but no child elements
/// (`<Hierarchy> </Hierarchy>`) is an empty block and yields
/// [`Event::Blank`] before its [`Event::Close`]; a self-closing element
/// (`<Hierarchy/>`) yields `Open` and `Close` only.
///
/// # Example
///
/// ```
/// use vdproj_common::{Element, Event};
/// use vdproj_xml::XmlEventReader;
///
/// let xml = r#"<ProductName valueType="8" value="MyApp"/>"#;
/// let events: Vec<Event> = XmlEventReader::new(xml.as_bytes())
///     .collect::<Result<_, _>>()
///     .unwrap();
///
/// assert_eq!(events, vec![
///     Event::Open(Element::valued("ProductName", "8", "MyApp")),
///     Event::Close,
/// ]);
/// ```
pub struct XmlEventReader<R: BufRead> {
    reader: Reader<XmlInput<R>>,
    buf: Vec<u8>,
    pending: VecDeque<Event>,
    /// One entry per open element: whether it has a child element yet.
    has_children: Vec<bool>,
    done: bool,
}

impl<R: BufRead> XmlEventReader<R> {
    /// Create a reader over buffered input.
    ///
    /// UTF-8 and UTF-16 (either byte order) are accepted; the encoding is
    /// taken from the byte order mark or the first bytes of the declaration.
    pub fn new(input: R) -> Self {
        let mut reader = Reader::from_reader(XmlInput::new(input));
        reader.config_mut().trim_text(true);

        Self {
            reader,
            buf: Vec::new(),
            pending: VecDeque::new(),
            has_children: Vec::new(),
            done: false,
        }
    }

    /// Read the next XML event and queue the element events it produces.
    fn advance(&mut self) -> Result<()> {
        self.buf.clear();
        match self.reader.read_event_into(&mut self.buf) {
            Ok(XmlEvent::Start(e)) => {
                let element = read_element(&e)?;
                mark_child(&mut self.has_children);
                self.has_children.push(false);
                self.pending.push_back(Event::Open(element));
            }
            Ok(XmlEvent::Empty(e)) => {
                let element = read_element(&e)?;
                mark_child(&mut self.has_children);
                self.pending.push_back(Event::Open(element));
                self.pending.push_back(Event::Close);
            }
            Ok(XmlEvent::End(_)) => {
                let had_children = self
                    .has_children
                    .pop()
                    .ok_or_else(|| Error::MalformedXml("unexpected end tag".to_string()))?;
                if !had_children {
                    self.pending.push_back(Event::Blank);
                }
                self.pending.push_back(Event::Close);
            }
            Ok(XmlEvent::Text(e)) => {
                let text = e.unescape().map_err(|e| Error::MalformedXml(e.to_string()))?;
                if !text.trim().is_empty() {
                    return Err(Error::MalformedXml(format!(
                        "unexpected text content {:?} at position {}",
                        text.trim(),
                        self.reader.buffer_position()
                    )));
                }
            }
            Ok(XmlEvent::CData(_)) => {
                return Err(Error::MalformedXml(format!(
                    "unexpected CDATA section at position {}",
                    self.reader.buffer_position()
                )));
            }
            Ok(XmlEvent::Eof) => {
                self.done = true;
                debug!(bytes = self.reader.buffer_position(), "end of XML input");
                if !self.has_children.is_empty() {
                    return Err(Error::MalformedXml(format!(
                        "end of document with {} element(s) still open",
                        self.has_children.len()
                    )));
                }
            }
            // Declarations, comments, processing instructions and doctypes carry no data.
            Ok(_) => {}
            Err(e) => {
                return Err(Error::MalformedXml(format!(
                    "XML parse error at position {}: {}",
                    self.reader.buffer_position(),
                    e
                )));
            }
        }
        Ok(())
    }
}

impl<R: BufRead> Iterator for XmlEventReader<R> {
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

fn mark_child(has_children: &mut [bool]) {
    if let Some(parent) = has_children.last_mut() {
        *parent = true;
    }
}

/// Turn a start tag into an element header.
fn read_element(tag: &BytesStart<'_>) -> Result<Element> {
    let local_name = tag.local_name();
    let local_name = std::str::from_utf8(local_name.as_ref())
        .map_err(|e| Error::MalformedXml(format!("element name is not UTF-8: {}", e)))?;

    let mut value_type = None;
    let mut value = None;
    for attr in tag.attributes() {
        let attr = attr.map_err(|e| Error::MalformedXml(e.to_string()))?;
        let text = attr
            .unescape_value()
            .map_err(|e| Error::MalformedXml(e.to_string()))?
            .into_owned();

        match attr.key.as_ref() {
            key if key == VALUE_TYPE_ATTRIBUTE.as_bytes() => value_type = Some(text),
            key if key == VALUE_ATTRIBUTE.as_bytes() => value = Some(text),
            key => {
                return Err(Error::MalformedXml(format!(
                    "unexpected attribute {:?} on <{}>",
                    String::from_utf8_lossy(key),
                    local_name
                )));
            }
        }
    }

    if local_name == NO_KEY_ENTRY {
        return match (value_type, value) {
            (Some(value_type), Some(value)) => Ok(Element::keyless(value_type, value)),
            _ => Err(Error::MalformedXml(format!(
                "<{}> requires both `{}` and `{}` attributes",
                NO_KEY_ENTRY, VALUE_TYPE_ATTRIBUTE, VALUE_ATTRIBUTE
            ))),
        };
    }

    let name = decode_name(local_name)?.into_owned();
    match (value_type, value) {
        (None, None) => Ok(Element::key(name)),
        (Some(value_type), Some(value)) => {
            if value_type.is_empty() || !value_type.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::MalformedXml(format!(
                    "<{}> has non-numeric {} {:?}",
                    local_name, VALUE_TYPE_ATTRIBUTE, value_type
                )));
            }
            Ok(Element::valued(name, value_type, value))
        }
        _ => Err(Error::MalformedXml(format!(
            "<{}> needs both `{}` and `{}` attributes, or neither",
            local_name, VALUE_TYPE_ATTRIBUTE, VALUE_ATTRIBUTE
        ))),
    }
}
