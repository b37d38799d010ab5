//! # Kryon KRB
//!
//! Binary document model for the Kryon render core.
//!
//! ## Design Goals
//!
//! 1. **Validated decoding**: Every count and offset is bounds-checked; a
//!    malformed stream fails with a typed error instead of panicking
//! 2. **Lazy lookups**: Table indices are validated at the point of use and
//!    strings are UTF-8 decoded on lookup
//! 3. **Byte-exact round trips**: Unknown property ids and value types are
//!    preserved so a parsed document re-encodes unchanged
//! 4. **Shared record shape**: Component templates use the same element
//!    record layout as the document's element section

pub mod builder;
pub mod document;
pub mod reader;
pub mod record;
pub mod types;
pub mod writer;

pub use builder::{DocumentBuilder, ElementBuilder, TemplateBuilder};
pub use document::{
    ComponentDefinition, ComponentPropertyDef, Document, FileHeader, Resource, ResourceData,
    Style,
};
pub use reader::BinaryReader;
pub use record::{
    decode_template, AnimationRef, CustomProperty, ElementHeader, ElementRecord, EventEntry,
    Property,
};
pub use types::*;
pub use writer::encode;

use thiserror::Error;

/// Errors that can occur while decoding or encoding a KRB document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KrbError {
    #[error("Unexpected end of data at offset {offset:#x} (needed {needed} bytes)")]
    UnexpectedEof { offset: usize, needed: usize },

    #[error("Invalid magic number: {0:?}")]
    InvalidMagic([u8; 4]),

    #[error("Section {section} out of bounds: offset {offset:#x}, length {len}")]
    SectionOutOfBounds {
        section: &'static str,
        offset: usize,
        len: usize,
    },

    #[error("Unsupported document feature: {0}")]
    Unsupported(&'static str),

    #[error("{what} too large to encode: {len}")]
    Overflow { what: &'static str, len: usize },

    #[error("Invalid child reference from element {parent} to element {child}")]
    InvalidChild { parent: usize, child: usize },
}
