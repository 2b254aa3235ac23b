//! XML form of the vdproj element stream.
//!
//! Each vdproj element becomes an XML element. Keys are mapped to XML local
//! names with the reversible [`name`] codec, inline values are stored in the
//! `valueType` and `value` attributes, and keyless entries use the reserved
//! `NoKeyEntry` tag:
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <DeployProject>
//!   <VSVersion valueType="3" value="800"/>
//!   <Hierarchy> </Hierarchy>
//!   <Deployable>
//!     <NoKeyEntry valueType="{EDC2488A-8267-493A-A98E-7D9C3B36CDF3}" value=".NETFramework,Version=v4.5.2"/>
//!   </Deployable>
//! </DeployProject>
//! ```

mod input;
pub mod name;
mod reader;
mod writer;

pub use reader::XmlEventReader;
pub use writer::XmlEventWriter;
pub use vdproj_common::{Error, Result};

/// Attribute holding the value type tag of an inline value.
pub const VALUE_TYPE_ATTRIBUTE: &str = "valueType";

/// Attribute holding the text of an inline value.
pub const VALUE_ATTRIBUTE: &str = "value";
