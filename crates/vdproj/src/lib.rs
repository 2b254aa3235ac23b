//! vdproj - lossless conversion between Visual Studio installer projects and XML.
//!
//! This crate provides a unified interface to the vdproject2xml crates.
//!
//! # Crates
//!
//! - [`vdproj_common`] - Element stream, escaping, errors
//! - [`vdproj_text`] - `.vdproj` line parser and writer
//! - [`vdproj_xml`] - XML encoding of the element stream and the name codec
//!
//! Both directions stream through the same element events, one line or one
//! XML event at a time, so no document tree is ever built in memory.
//!
//! # Example
//!
//! ```no_run
//! use vdproj::prelude::*;
//!
//! // Convert a project, writing Setup.xml next to it
//! let output = default_output_path("Setup.vdproj".as_ref())?;
//! convert_file("Setup.vdproj", &output, &Config::new().pretty_print(true))?;
//!
//! // And back again
//! convert_file(&output, "Setup.roundtrip.vdproj", &Config::new())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod convert;
mod file;

// Re-export all sub-crates
pub use vdproj_common as common;
pub use vdproj_text as text;
pub use vdproj_xml as xml;

pub use convert::{vdproj_to_xml, vdproj_to_xml_string, xml_to_vdproj, xml_to_vdproj_string, Config};
pub use file::{convert_file, default_output_path, Format};
pub use vdproj_common::{Error, Result};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        convert_file, default_output_path, vdproj_to_xml, vdproj_to_xml_string, xml_to_vdproj,
        xml_to_vdproj_string, Config, Format,
    };
    pub use vdproj_common::{transfer, Element, Event, EventSink, Name, Value};
    pub use vdproj_text::{VdprojReader, VdprojWriter};
    pub use vdproj_xml::{XmlEventReader, XmlEventWriter};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
