//! # Strong's Number Extraction
//!
//! Pulls canonical lexical codes (`H7225`, `G26`) out of raw lemma strings.
//!
//! Lemma strings mix several things:
//! - plain numbers: `"7225"`
//! - prefixed numbers: `"H7225"`, `"strong:H7225"`
//! - grammatical prefixes joined by `/`: `"b/7225"`, `"c/l"`
//! - disambiguation letters: `"1254 a"`
//!
//! Every run of 1-5 digits (with its optional marker and H/G prefix) is one
//! code. Prefix-only lemmas such as `"l"` or `"c/l"` yield nothing.

use crate::primitives::MAX_STRONGS_DIGITS;
use crate::types::MikraError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Optional `strong:`/`strongs:` marker, optional H/G, then 1-5 ASCII digits.
const STRONGS_REGEX: &str = r"(?i)(?:strongs?:)?([hg])?([0-9]{1,5})";

static STRONGS_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(STRONGS_REGEX).ok());

// =============================================================================
// STRONG'S NUMBER
// =============================================================================

/// Which lexicon a Strong's number indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Lexicon {
    Hebrew,
    Greek,
}

impl Lexicon {
    /// The single-letter code prefix.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Hebrew => 'H',
            Self::Greek => 'G',
        }
    }

    fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'H' => Some(Self::Hebrew),
            'G' => Some(Self::Greek),
            _ => None,
        }
    }
}

/// A canonical Strong's code such as `H7225`.
///
/// Serialized as its string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StrongsNumber {
    lexicon: Lexicon,
    number: u32,
}

impl StrongsNumber {
    /// Create a code.
    #[must_use]
    pub const fn new(lexicon: Lexicon, number: u32) -> Self {
        Self { lexicon, number }
    }

    /// Create a Hebrew code.
    #[must_use]
    pub const fn hebrew(number: u32) -> Self {
        Self::new(Lexicon::Hebrew, number)
    }

    /// The lexicon.
    #[must_use]
    pub const fn lexicon(&self) -> Lexicon {
        self.lexicon
    }

    /// The numeric index, without leading zeros.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.number
    }
}

impl fmt::Display for StrongsNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.lexicon.letter(), self.number)
    }
}

impl FromStr for StrongsNumber {
    type Err = MikraError;

    /// Parse one code: `H7225`, `h07225`, `G26` or a bare `7225` (Hebrew).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MikraError::InvalidStrongs(s.to_string());
        let trimmed = s.trim();

        let (lexicon, digits) = match trimmed.chars().next() {
            Some(c) if c.is_ascii_alphabetic() => {
                (Lexicon::from_letter(c).ok_or_else(invalid)?, &trimmed[1..])
            }
            Some(_) => (Lexicon::Hebrew, trimmed),
            None => return Err(invalid()),
        };

        if digits.is_empty()
            || digits.len() > MAX_STRONGS_DIGITS
            || !digits.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid());
        }

        let number = digits.parse().map_err(|_| invalid())?;
        Ok(Self::new(lexicon, number))
    }
}

impl TryFrom<String> for StrongsNumber {
    type Error = MikraError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StrongsNumber> for String {
    fn from(value: StrongsNumber) -> Self {
        value.to_string()
    }
}

// =============================================================================
// EXTRACTION
// =============================================================================

/// Extract every Strong's code from a raw lemma, left to right.
///
/// Absent lemmas and prefix-only lemmas give an empty list. Matches are
/// neither reordered nor deduplicated.
#[must_use]
pub fn extract_strongs(lemma: Option<&str>) -> Vec<StrongsNumber> {
    let (Some(lemma), Some(pattern)) = (lemma, STRONGS_PATTERN.as_ref()) else {
        return Vec::new();
    };

    pattern
        .captures_iter(lemma)
        .filter_map(|caps| {
            let lexicon = caps
                .get(1)
                .and_then(|m| m.as_str().chars().next())
                .and_then(Lexicon::from_letter)
                .unwrap_or(Lexicon::Hebrew);
            // At most five ASCII digits always fit in a u32.
            let number = caps.get(2)?.as_str().parse().ok()?;
            Some(StrongsNumber::new(lexicon, number))
        })
        .collect()
}

/// True when a lemma holds no digit at all (grammatical prefixes only).
#[must_use]
pub fn is_prefix_only(lemma: &str) -> bool {
    !lemma.chars().any(|c| c.is_ascii_digit())
}

// =============================================================================
// TESTS
// =============================================================================
