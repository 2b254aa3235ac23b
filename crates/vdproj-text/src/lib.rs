//! Reader and writer for the Visual Studio installer project (`.vdproj`) text format.
//!
//! A vdproj file is a tree of quoted keys, one token per line:
//!
//! ```text
//! "DeployProject"
//! {
//! "VSVersion" = "3:800"
//! "Hierarchy"
//!     {
//!     }
//! "Deployable"
//!     {
//!     "{EDC2488A-8267-493A-A98E-7D9C3B36CDF3}:.NETFramework,Version=v4.5.2"
//!     }
//! }
//! ```
//!
//! [`VdprojReader`] turns such text into the element stream defined in
//! `vdproj-common`, and [`VdprojWriter`] renders a stream back into text.

pub mod grammar;
mod parser;
mod reader;
mod writer;

pub use parser::LineState;
pub use reader::VdprojReader;
pub use writer::{LineEnding, VdprojWriter};
pub use vdproj_common::{Error, Result};
