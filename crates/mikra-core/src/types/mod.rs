//! # Core Type Definitions
//!
//! This module contains the record types produced by the verse transform:
//! - Verse addressing (`VerseRef`)
//! - Word output (`WordEntry`, `WordMetadata`, `Variant`)
//! - Verse output (`VerseData`)
//! - Derived numeric readings (`Gematria`)
//! - Error types (`MikraError`)
//!
//! ## Output Guarantees
//!
//! A `VerseData` leaving the transform:
//! - Has word positions forming a gap-free run starting at 1
//! - Has `text` equal to the single-space join of its words' text
//! - Never contains a word whose text is the maqqef
//! - Is treated as immutable once built

use crate::primitives::MAX_EDITION_LENGTH;
use crate::strongs::StrongsNumber;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// VERSE REFERENCE
// =============================================================================

/// Address of one verse: book code, chapter and verse number.
///
/// Parses from the OSIS form (`Gen.1.1`) and the human form (`Gen 1:1`),
/// and always displays in the human form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VerseRef {
    /// Book code as it appears in the source (e.g. `Gen`, `1Sam`).
    pub book: String,
    /// Chapter number, starting at 1.
    pub chapter: u32,
    /// Verse number, starting at 1.
    pub verse: u32,
}

impl VerseRef {
    /// Create a new verse reference.
    #[must_use]
    pub fn new(book: impl Into<String>, chapter: u32, verse: u32) -> Self {
        Self {
            book: book.into(),
            chapter,
            verse,
        }
    }

    /// Parse an OSIS identifier such as `Gen.1.1`.
    pub fn parse_osis(id: &str) -> Result<Self, MikraError> {
        let mut parts = id.trim().split('.');
        let (Some(book), Some(chapter), Some(verse), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(MikraError::InvalidReference(id.to_string()));
        };
        Self::from_parts(id, book, chapter, verse)
    }

    fn from_parts(raw: &str, book: &str, chapter: &str, verse: &str) -> Result<Self, MikraError> {
        let invalid = || MikraError::InvalidReference(raw.to_string());

        let book = book.trim();
        if book.is_empty() || !book.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(invalid());
        }
        let chapter: u32 = chapter.trim().parse().map_err(|_| invalid())?;
        let verse: u32 = verse.trim().parse().map_err(|_| invalid())?;
        if chapter == 0 || verse == 0 {
            return Err(invalid());
        }

        Ok(Self::new(book, chapter, verse))
    }
}

impl FromStr for VerseRef {
    type Err = MikraError;

    /// Accepts `Gen.1.1` or `Gen 1:1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some((book, rest)) = trimmed.split_once(char::is_whitespace)
            && let Some((chapter, verse)) = rest.split_once(':')
        {
            return Self::from_parts(s, book, chapter, verse);
        }
        Self::parse_osis(trimmed)
    }
}

impl fmt::Display for VerseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.book, self.chapter, self.verse)
    }
}

/// Check an edition name (`wlc`, `wlc-4.20`, `my_edition`).
///
/// Non-empty, at most `MAX_EDITION_LENGTH` bytes, ASCII alphanumerics
/// plus `-`, `_` and `.`.
pub fn validate_edition(edition: &str) -> Result<(), MikraError> {
    let valid = !edition.is_empty()
        && edition.len() <= MAX_EDITION_LENGTH
        && edition
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(MikraError::InvalidEdition(edition.to_string()))
    }
}

// =============================================================================
// WORD RECORDS
// =============================================================================

/// Alternate-reading tag carried by a word.
///
/// A word is a standard word (no tag), a ketiv, or a qere. Never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// The written consonantal form.
    Ketiv,
    /// The form read aloud.
    Qere,
}

/// Two numeric readings of a word (or the sum over a verse).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Gematria {
    /// Traditional values: 1-9, 10-90, 100-400.
    pub standard: u32,
    /// Alphabet position: 1-22.
    pub ordinal: u32,
}

impl std::ops::Add for Gematria {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            standard: self.standard.saturating_add(rhs.standard),
            ordinal: self.ordinal.saturating_add(rhs.ordinal),
        }
    }
}

impl std::iter::Sum for Gematria {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, g| acc + g)
    }
}

/// Extra per-word facts set by the post filter and enrichment passes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordMetadata {
    /// The lemma names only grammatical prefixes (`l`, `b`, `c/l`, ...).
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_prefix_only: bool,
    /// Present only when gematria enrichment ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gematria: Option<Gematria>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// One word of a verse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    /// 1-based position inside the verse.
    pub position: u32,
    /// The Hebrew token.
    pub text: String,
    /// Raw lemma attribute, if the source carried one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lemma: Option<String>,
    /// Raw morphology code, if the source carried one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morph: Option<String>,
    /// Canonical Strong's codes, present only when non-empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strongs: Option<Vec<StrongsNumber>>,
    /// Ketiv/qere tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<Variant>,
    #[serde(default)]
    pub metadata: WordMetadata,
}

impl WordEntry {
    /// Create a bare word with no lexical data.
    #[must_use]
    pub fn new(position: u32, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
            lemma: None,
            morph: None,
            strongs: None,
            variant: None,
            metadata: WordMetadata::default(),
        }
    }

    /// True when the word carries neither a lemma nor a morphology code.
    #[must_use]
    pub fn is_unannotated(&self) -> bool {
        self.lemma.is_none() && self.morph.is_none()
    }
}

/// The transformed verse.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VerseData {
    /// All word texts joined by single spaces.
    pub text: String,
    /// Words in reading order.
    pub words: Vec<WordEntry>,
    /// Per-verse totals, present only when gematria enrichment ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gematria: Option<Gematria>,
}

impl VerseData {
    /// Build a verse from final words, deriving `text` from them.
    #[must_use]
    pub fn from_words(words: Vec<WordEntry>) -> Self {
        let text = words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            text,
            words,
            gematria: None,
        }
    }

    /// Number of words in the verse.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True when no word survived filtering.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Mikra system.
///
/// The verse transform itself never fails; these come from reading
/// source documents, parsing references, and the verse store.
#[derive(Debug, Error)]
pub enum MikraError {
    /// The requested verse is not in the store.
    #[error("Verse not found: {book} {chapter}:{verse} (edition '{edition}')")]
    VerseNotFound {
        edition: String,
        book: String,
        chapter: u32,
        verse: u32,
    },

    /// No verse of the requested chapter is in the store.
    #[error("Chapter not found: {book} {chapter} (edition '{edition}')")]
    ChapterNotFound {
        edition: String,
        book: String,
        chapter: u32,
    },

    /// A verse reference could not be parsed.
    #[error("Invalid verse reference: '{0}'")]
    InvalidReference(String),

    /// A Strong's code could not be parsed.
    #[error("Invalid Strong's number: '{0}'")]
    InvalidStrongs(String),

    /// An edition name is empty, too long, or uses unsupported characters.
    #[error("Invalid edition name: '{0}'")]
    InvalidEdition(String),

    /// A request field exceeds its size limit or is otherwise unusable.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The source markup is not well-formed.
    #[error("Markup error: {0}")]
    Markup(String),

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// An I/O or storage error occurred.
    #[error("I/O error: {0}")]
    IoError(String),

    /// The configuration file is invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

// =============================================================================
// TESTS
// =============================================================================
