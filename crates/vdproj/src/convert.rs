//! Stream-to-stream conversion between vdproj and XML.

use std::io::{BufRead, Write};

use tracing::debug;
use vdproj_common::{transfer, Result};
use vdproj_text::{VdprojReader, VdprojWriter};
use vdproj_xml::{XmlEventReader, XmlEventWriter};

/// Conversion options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    /// Indent XML output. vdproj output is always one token per line.
    pub pretty_print: bool,
}

impl Config {
    /// Default configuration: compact XML.
    pub const fn new() -> Self {
        Self { pretty_print: false }
    }

    /// Enable or disable indented XML output.
    pub fn pretty_print(mut self, pretty_print: bool) -> Self {
        self.pretty_print = pretty_print;
        self
    }
}

/// Convert vdproj text read from `input` into XML written to `output`.
pub fn vdproj_to_xml<R: BufRead, W: Write>(input: R, output: W, config: &Config) -> Result<()> {
    let mut writer = XmlEventWriter::new(output, config.pretty_print)?;
    let events = transfer(VdprojReader::new(input), &mut writer)?;
    debug!(events, pretty_print = config.pretty_print, "converted vdproj to XML");
    Ok(())
}

/// Convert an XML document read from `input` into vdproj text written to `output`.
pub fn xml_to_vdproj<R: BufRead, W: Write>(input: R, output: W) -> Result<()> {
    let mut writer = VdprojWriter::new(output);
    let events = transfer(XmlEventReader::new(input), &mut writer)?;
    debug!(events, "converted XML to vdproj");
    Ok(())
}

/// Convert vdproj text to an XML string.
///
/// # Example
///
/// ```
/// use vdproj::{vdproj_to_xml_string, Config};
///
/// let xml = vdproj_to_xml_string("\"ProductName\" = \"8:MyApp\"", &Config::new())?;
/// assert_eq!(
///     xml,
///     r#"<?xml version="1.0" encoding="utf-8"?><ProductName valueType="8" value="MyApp"/>"#
/// );
/// # Ok::<(), vdproj::Error>(())
/// ```
pub fn vdproj_to_xml_string(text: &str, config: &Config) -> Result<String> {
    let mut output = Vec::new();
    vdproj_to_xml(text.as_bytes(), &mut output, config)?;
    Ok(String::from_utf8(output)?)
}

/// Convert an XML string to vdproj text.
pub fn xml_to_vdproj_string(xml: &str) -> Result<String> {
    let mut output = Vec::new();
    xml_to_vdproj(xml.as_bytes(), &mut output)?;
    Ok(String::from_utf8(output)?)
}
