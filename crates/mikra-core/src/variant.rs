//! # Variant Classifier
//!
//! Decides which alternate-reading branches are admitted and how emitted
//! words are tagged.
//!
//! Three decisions live here, each backed by an auditable table:
//! - which reading types are followed (`x-qere`) and which are dropped
//!   (everything else, e.g. `x-accent`, a chant-only duplicate),
//! - which reserved `x-` element types still carry words (`x-ketiv`,
//!   `x-qere`) and which are non-lexical segments (`x-sof-pasuq`, ...),
//! - the `Variant` tag a word receives.
//!
//! The "inside a qere reading" state is a [`ReadingContext`] value passed
//! down the walk, so it can never leak past the reading that set it.

use crate::primitives::{KETIV_TYPE, QERE_TYPE, RESERVED_TYPE_PREFIX};
use crate::types::Variant;

/// Whether the walk is currently inside a followed qere reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadingContext {
    /// Main text.
    #[default]
    Base,
    /// Inside an `x-qere` reading.
    Qere,
}

/// What to do with one reading-variant node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingDisposition {
    /// Walk the reading's content in the given context.
    Follow(ReadingContext),
    /// Drop the reading and its whole subtree.
    Discard,
}

/// Reading types that are walked. Any type not listed is discarded.
const ADMITTED_READINGS: &[(&str, ReadingContext)] = &[(QERE_TYPE, ReadingContext::Qere)];

/// Reserved element types that still carry scripture words.
const LEXICAL_RESERVED_TYPES: &[&str] = &[KETIV_TYPE, QERE_TYPE];

/// Classify a reading-variant node by its `type` attribute.
#[must_use]
pub fn classify_reading(reading_type: Option<&str>) -> ReadingDisposition {
    reading_type
        .and_then(|t| {
            ADMITTED_READINGS
                .iter()
                .find(|(admitted, _)| *admitted == t)
        })
        .map_or(ReadingDisposition::Discard, |(_, context)| {
            ReadingDisposition::Follow(*context)
        })
}

/// True for an element typed with a reserved, non-whitelisted value.
///
/// Such elements (punctuation, paragraph markers) contribute no words
/// and are not descended into.
#[must_use]
pub fn is_non_lexical_segment(element_type: Option<&str>) -> bool {
    element_type.is_some_and(|t| {
        t.starts_with(RESERVED_TYPE_PREFIX) && !LEXICAL_RESERVED_TYPES.contains(&t)
    })
}

/// The tag for a word emitted from an element of `element_type`.
///
/// An explicit ketiv wins; otherwise the reading context decides.
#[must_use]
pub fn word_variant(element_type: Option<&str>, context: ReadingContext) -> Option<Variant> {
    if element_type == Some(KETIV_TYPE) {
        return Some(Variant::Ketiv);
    }
    match context {
        ReadingContext::Qere => Some(Variant::Qere),
        ReadingContext::Base => None,
    }
}

// =============================================================================
// TESTS
// =============================================================================
