//! # mikra-core
//!
//! The deterministic verse transform for Mikra - THE LOGIC.
//!
//! This crate turns the markup tree of one Hebrew Bible verse into a flat,
//! position-numbered word list with lexical annotations, and stores the
//! results of whole documents for lookup.
//!
//! ## Pipeline
//!
//! - `walker` → raw words in document order (`TreeWalker`)
//! - `variant` → which alternate readings are followed (`VariantClassifier`)
//! - `normalize` → maqqef and cantillation handling (`TextNormalizer`)
//! - `strongs` → lexicon codes from lemma strings (`StrongsExtractor`)
//! - `postfilter` → apparatus noise removal and renumbering
//! - `gematria` → optional numeric values
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Never fails on unexpected markup; it ignores what it does not know
//! - Owns no state across verses; every verse gets fresh walk state
//! - Has NO async, NO network dependencies (pure Rust)

// =============================================================================
// MODULES
// =============================================================================

pub mod formats;
pub mod gematria;
pub mod importer;
pub mod node;
pub mod normalize;
pub mod postfilter;
pub mod primitives;
pub mod storage;
pub mod strongs;
pub mod transform;
pub mod types;
pub mod variant;
pub mod walker;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    Gematria, MikraError, Variant, VerseData, VerseRef, WordEntry, WordMetadata,
    validate_edition,
};

// =============================================================================
// RE-EXPORTS: Transform
// =============================================================================

pub use gematria::{annotate_verse, letter_value, word_gematria};
pub use node::{Element, MarkupNode};
pub use normalize::TextNormalizer;
pub use postfilter::post_filter;
pub use strongs::{Lexicon, StrongsNumber, extract_strongs, is_prefix_only};
pub use transform::{TransformOptions, transform_node, transform_verse};
pub use variant::{ReadingContext, ReadingDisposition, classify_reading};
pub use walker::TreeWalker;

// =============================================================================
// RE-EXPORTS: Documents and Storage
// =============================================================================

pub use formats::{OsisVerse, parse_document, read_verses};
pub use importer::{ImportReport, ImportedVerse, Importer};
pub use storage::{Occurrence, StoreStats, VerseStore};
