//! # Text Normalizer
//!
//! Turns a raw text run from the markup into word tokens:
//!
//! 1. Remove every `/` (a split marker, not content)
//! 2. Optionally strip cantillation marks
//! 3. Trim and split on whitespace runs
//! 4. Drop tokens that are exactly the maqqef
//!
//! Cantillation stripping is a pipeline-wide policy: one normalizer is
//! built per run, so a verse never mixes stripped and unstripped words.

use crate::primitives::{
    CANTILLATION, HEBREW_BLOCK, HEBREW_PRESENTATION_FORMS, MAQQEF, SPLIT_MARK,
};

/// Tokenizer for raw markup text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextNormalizer {
    strip_cantillation: bool,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl TextNormalizer {
    /// Create a normalizer with the given cantillation policy.
    #[must_use]
    pub const fn new(strip_cantillation: bool) -> Self {
        Self { strip_cantillation }
    }

    /// Whether this normalizer removes cantillation marks.
    #[must_use]
    pub const fn strips_cantillation(&self) -> bool {
        self.strip_cantillation
    }

    /// Apply character-level cleanup (steps 1 and 2) without tokenizing.
    #[must_use]
    pub fn clean(&self, raw: &str) -> String {
        raw.chars()
            .filter(|&c| c != SPLIT_MARK)
            .filter(|&c| !(self.strip_cantillation && is_cantillation(c)))
            .collect()
    }

    /// Split raw text into surviving word tokens.
    #[must_use]
    pub fn tokens(&self, raw: &str) -> Vec<String> {
        let cleaned = self.clean(raw);
        cleaned
            .split_whitespace()
            .filter(|token| !is_maqqef(token))
            .map(str::to_string)
            .collect()
    }
}

/// True for a cantillation (accent) code point.
#[must_use]
pub fn is_cantillation(c: char) -> bool {
    CANTILLATION.contains(&c)
}

/// True when the token is exactly one maqqef.
#[must_use]
pub fn is_maqqef(token: &str) -> bool {
    let mut chars = token.chars();
    chars.next() == Some(MAQQEF) && chars.next().is_none()
}

/// True for a code point in the Hebrew block or its presentation forms.
#[must_use]
pub fn is_hebrew(c: char) -> bool {
    HEBREW_BLOCK.contains(&c) || HEBREW_PRESENTATION_FORMS.contains(&c)
}

/// True when the text contains at least one Hebrew code point.
#[must_use]
pub fn contains_hebrew(text: &str) -> bool {
    text.chars().any(is_hebrew)
}

// =============================================================================
// TESTS
// =============================================================================
