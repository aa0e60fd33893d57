//! # Source Formats
//!
//! Readers that turn source documents into markup trees.

pub mod osis;

pub use osis::{MAX_DOCUMENT_SIZE, OsisVerse, parse_document, read_verses};
