//! XML output of an element stream.

use std::io::{self, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event as XmlEvent};
use quick_xml::Writer;
use vdproj_common::{Element, Error, Event, EventSink, Name, Result, NO_KEY_ENTRY};

use crate::name::encode_name;
use crate::{VALUE_ATTRIBUTE, VALUE_TYPE_ATTRIBUTE};

/// A start tag held back until the next event decides its form.
#[derive(Debug)]
struct PendingStart {
    name: String,
    tag: BytesStart<'static>,
}

/// Writes an element stream as an XML document.
///
/// Each element becomes an XML element named by [`encode_name`], with the
/// inline value stored in the `valueType` and `value` attributes. Keyless
/// entries use the reserved `NoKeyEntry` tag.
///
/// # Example
///
/// ```
/// use vdproj_common::{transfer, Element, Event};
/// use vdproj_xml::XmlEventWriter;
///
/// let events = vec![
///     Event::Open(Element::valued("ProductName", "8", "MyApp")),
///     Event::Close,
/// ];
///
/// let mut writer = XmlEventWriter::new(Vec::new(), false).unwrap();
/// transfer(events.into_iter().map(Ok), &mut writer).unwrap();
///
/// let xml = String::from_utf8(writer.into_inner()).unwrap();
/// assert!(xml.ends_with(r#"<ProductName valueType="8" value="MyApp"/>"#));
/// ```
pub struct XmlEventWriter<W: Write> {
    writer: Writer<W>,
    pending: Option<PendingStart>,
    open: Vec<String>,
}

impl<W: Write> XmlEventWriter<W> {
    /// Create a writer and emit the XML declaration.
    ///
    /// With `pretty_print` the output is indented by two spaces per level.
    pub fn new(output: W, pretty_print: bool) -> Result<Self> {
        let writer = if pretty_print {
            Writer::new_with_indent(output, b' ', 2)
        } else {
            Writer::new(output)
        };

        let mut this = Self {
            writer,
            pending: None,
            open: Vec::new(),
        };
        this.write_event(XmlEvent::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        Ok(this)
    }

    /// Consume the writer and return the underlying output.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write_event(&mut self, event: XmlEvent<'_>) -> Result<()> {
        self.writer.write_event(event).map_err(write_error)
    }

    /// Write the held-back tag as a start tag with content to follow.
    fn start_pending(&mut self) -> Result<bool> {
        let Some(PendingStart { name, tag }) = self.pending.take() else {
            return Ok(false);
        };
        self.write_event(XmlEvent::Start(tag))?;
        self.open.push(name);
        Ok(true)
    }
}

impl<W: Write> EventSink for XmlEventWriter<W> {
    fn event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Open(element) => {
                self.start_pending()?;
                let (name, tag) = start_tag(&element);
                self.pending = Some(PendingStart { name, tag });
            }
            Event::Blank => {
                if !self.start_pending()? {
                    return Err(Error::UnbalancedStructure(
                        "empty block placeholder outside an element".to_string(),
                    ));
                }
                self.write_event(XmlEvent::Text(BytesText::new(" ")))?;
            }
            Event::Close => {
                if let Some(PendingStart { tag, .. }) = self.pending.take() {
                    self.write_event(XmlEvent::Empty(tag))?;
                } else {
                    let name = self.open.pop().ok_or_else(|| {
                        Error::UnbalancedStructure("close without an open element".to_string())
                    })?;
                    self.write_event(XmlEvent::End(BytesEnd::new(name)))?;
                }
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let open = self.open.len() + usize::from(self.pending.is_some());
        if open > 0 {
            return Err(Error::UnbalancedStructure(format!(
                "{} element(s) left open",
                open
            )));
        }
        self.writer.get_mut().flush()?;
        Ok(())
    }
}

/// Build the tag for an element, returning its XML name alongside.
fn start_tag(element: &Element) -> (String, BytesStart<'static>) {
    let name = match &element.name {
        Name::Key(key) => encode_name(key).into_owned(),
        Name::Keyless => NO_KEY_ENTRY.to_string(),
    };

    let mut tag = BytesStart::new(name.clone());
    if let Some(value) = &element.value {
        tag.push_attribute((VALUE_TYPE_ATTRIBUTE, value.value_type.as_str()));
        tag.push_attribute((VALUE_ATTRIBUTE, value.value.as_str()));
    }

    (name, tag)
}

/// quick-xml only fails on the underlying writer.
fn write_error<E>(error: E) -> Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    Error::Io(io::Error::new(io::ErrorKind::Other, error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vdproj_common::transfer;

    fn render(events: Vec<Event>, pretty_print: bool) -> Result<String> {
        let mut writer = XmlEventWriter::new(Vec::new(), pretty_print)?;
        transfer(events.into_iter().map(Ok), &mut writer)?;
        Ok(String::from_utf8(writer.into_inner())?)
    }

    const DECL: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

    #[test]
    fn test_valued_element() {
        let xml = render(
            vec![
                Event::Open(Element::valued("ProductName", "8", "MyApp")),
                Event::Close,
            ],
            false,
        )
        .unwrap();
        assert_eq!(
            xml,
            format!(r#"{}<ProductName valueType="8" value="MyApp"/>"#, DECL)
        );
    }

    #[test]
    fn test_keyless_entry() {
        let xml = render(
            vec![
                Event::Open(Element::keyless(
                    "{EDC2488A-8267-493A-A98E-7D9C3B36CDF3}",
                    ".NETFramework,Version=v4.5.2",
                )),
                Event::Close,
            ],
            false,
        )
        .unwrap();
        assert_eq!(
            xml,
            format!(
                r#"{}<NoKeyEntry valueType="{{EDC2488A-8267-493A-A98E-7D9C3B36CDF3}}" value=".NETFramework,Version=v4.5.2"/>"#,
                DECL
            )
        );
    }

    #[test]
    fn test_blocks_and_placeholder() {
        let xml = render(
            vec![
                Event::Open(Element::key("Root")),
                Event::Open(Element::key("Hierarchy")),
                Event::Blank,
                Event::Close,
                Event::Open(Element::key("Bare")),
                Event::Close,
                Event::Close,
            ],
            false,
        )
        .unwrap();
        assert_eq!(
            xml,
            format!("{}<Root><Hierarchy> </Hierarchy><Bare/></Root>", DECL)
        );
    }

    #[test]
    fn test_keyless_entry_with_children() {
        let xml = render(
            vec![
                Event::Open(Element::keyless("BootstrapperCfg", "{63ACBE69}")),
                Event::Open(Element::valued("Enabled", "3", "1")),
                Event::Close,
                Event::Close,
            ],
            false,
        )
        .unwrap();
        assert_eq!(
            xml,
            format!(
                r#"{}<NoKeyEntry valueType="BootstrapperCfg" value="{{63ACBE69}}"><Enabled valueType="3" value="1"/></NoKeyEntry>"#,
                DECL
            )
        );
    }

    #[test]
    fn test_attribute_values_are_xml_escaped() {
        let xml = render(
            vec![
                Event::Open(Element::valued("We\"ird", "8", r#"<a & "b">"#)),
                Event::Close,
            ],
            false,
        )
        .unwrap();
        assert!(xml.contains("<We_x0022_ird valueType=\"8\" value=\"&lt;a &amp; &quot;b&quot;&gt;\"/>"));
    }

    #[test]
    fn test_pretty_print() {
        let xml = render(
            vec![
                Event::Open(Element::key("Outer")),
                Event::Open(Element::valued("Inner", "3", "1")),
                Event::Close,
                Event::Close,
            ],
            true,
        )
        .unwrap();
        assert_eq!(
            xml,
            format!(
                "{}\n<Outer>\n  <Inner valueType=\"3\" value=\"1\"/>\n</Outer>",
                DECL
            )
        );
    }

    #[test]
    fn test_unbalanced() {
        assert!(render(vec![Event::Close], false).is_err());
        assert!(render(vec![Event::Blank], false).is_err());
        assert!(render(vec![Event::Open(Element::key("A"))], false).is_err());
    }
}
