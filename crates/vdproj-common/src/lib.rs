//! Common types for vdproject2xml.
//!
//! This crate provides the pieces shared by the vdproj text and XML crates:
//!
//! - [`Event`] - The canonical element stream both formats are converted through
//! - [`EventSink`] - Consumer side of the element stream
//! - [`escape`] - Backslash escaping used inside vdproj quoted strings
//! - [`Error`] - The error type for every conversion step

mod error;
mod event;

pub mod escape;

pub use error::{Error, Result};
pub use event::{transfer, Element, Event, EventSink, Name, Value, NO_KEY_ENTRY};

/// Re-export memchr for fast scanning of quoted strings
pub use memchr;
