//! Error types for vdproj conversion.

use thiserror::Error;

/// Errors that can occur while reading, writing, or converting vdproj and XML documents.
#[derive(Debug, Error)]
pub enum Error {
    /// A vdproj line matched neither the element grammar nor a brace.
    #[error("malformed line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    /// Open and close markers do not pair up.
    #[error("unbalanced structure: {0}")]
    UnbalancedStructure(String),

    /// An XML local name could not be decoded back into a vdproj key.
    #[error("invalid XML name {name:?}: {reason}")]
    InvalidXmlName { name: String, reason: String },

    /// XML parsing error or an XML document that does not describe a vdproj tree.
    #[error("malformed XML: {0}")]
    MalformedXml(String),

    /// A file whose extension names neither format.
    #[error("unsupported file type: {0} (expected .vdproj or .xml)")]
    UnsupportedFormat(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output was not valid UTF-8.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl Error {
    /// Build a [`Error::MalformedLine`] for a 1-based line number.
    pub fn malformed_line(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedLine {
            line,
            reason: reason.into(),
        }
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
