//! # Source-Format Primitives
//!
//! Fixed constants describing the annotated Hebrew Bible markup and the
//! bounds the transform works within.
//!
//! These are compiled into the binary and are immutable at runtime.

use std::ops::RangeInclusive;

// =============================================================================
// CHARACTERS
// =============================================================================

/// HEBREW PUNCTUATION MAQQEF. Joins words; never a word of its own.
pub const MAQQEF: char = '\u{05BE}';

/// Line-wrap / morpheme-split marker in the source text. Not content.
pub const SPLIT_MARK: char = '/';

/// Cantillation (chant) marks: the Hebrew accents block.
///
/// Vowel points, dagesh, meteg and the shin/sin dots sit outside this
/// range and are never stripped.
pub const CANTILLATION: RangeInclusive<char> = '\u{0591}'..='\u{05AF}';

/// The Hebrew Unicode block.
pub const HEBREW_BLOCK: RangeInclusive<char> = '\u{0590}'..='\u{05FF}';

/// Hebrew presentation forms (precomposed letters with points).
pub const HEBREW_PRESENTATION_FORMS: RangeInclusive<char> = '\u{FB1D}'..='\u{FB4F}';

/// Open (peh) and closed (samekh) paragraph markers.
pub const PARAGRAPH_MARKERS: [&str; 2] = ["\u{05E4}", "\u{05E1}"];

// =============================================================================
// ELEMENT TYPES AND KEYS
// =============================================================================

/// `type` values starting with this prefix are source-specific extensions.
pub const RESERVED_TYPE_PREFIX: &str = "x-";

/// Word typed as the written form of a ketiv/qere pair.
pub const KETIV_TYPE: &str = "x-ketiv";

/// Reading typed as the read-aloud form of a ketiv/qere pair.
pub const QERE_TYPE: &str = "x-qere";

/// Attribute holding an element's kind.
pub const TYPE_ATTRIBUTE: &str = "type";

/// Attribute holding the lemma reference.
pub const LEMMA_ATTRIBUTE: &str = "lemma";

/// Attribute holding the morphology code.
pub const MORPH_ATTRIBUTE: &str = "morph";

/// Child echoing ketiv text for human cross-reference.
pub const CATCH_WORD_KEY: &str = "catchWord";

/// Child holding an alternate reading.
pub const READING_KEY: &str = "rdg";

/// Child holding apparatus commentary.
pub const NOTE_KEY: &str = "note";

/// Element enclosing one verse in an OSIS document.
pub const VERSE_ELEMENT: &str = "verse";

/// Element carrying one lexical word and its lemma/morph attributes.
pub const WORD_ELEMENT: &str = "w";

/// Attribute carrying the OSIS verse identifier.
pub const OSIS_ID_ATTRIBUTE: &str = "osisID";

// =============================================================================
// BOUNDS
// =============================================================================

/// Maximum nesting depth the tree walk descends into.
///
/// Deeper subtrees contribute no words.
pub const MAX_TREE_DEPTH: usize = 64;

/// Maximum digits in one Strong's number.
pub const MAX_STRONGS_DIGITS: usize = 5;

/// Maximum occurrences returned by one Strong's lookup.
pub const MAX_OCCURRENCE_RESULTS: usize = 1000;

/// Maximum length of an edition name.
pub const MAX_EDITION_LENGTH: usize = 64;
