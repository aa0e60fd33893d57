//! # Post Filter
//!
//! One pass over the raw word list of a verse:
//!
//! 1. Drop unannotated words with no Hebrew (apparatus prose)
//! 2. Drop unannotated peh/samekh (paragraph markers)
//! 3. Renumber positions from 1
//! 4. Flag digit-free lemmas as prefix-only and clear their codes
//! 5. Rebuild the verse text

use crate::normalize::contains_hebrew;
use crate::primitives::PARAGRAPH_MARKERS;
use crate::strongs::is_prefix_only;
use crate::types::{VerseData, WordEntry};

/// True for a raw word that is apparatus noise rather than scripture.
#[must_use]
pub fn is_apparatus_noise(word: &WordEntry) -> bool {
    if !word.is_unannotated() {
        return false;
    }
    !contains_hebrew(&word.text) || PARAGRAPH_MARKERS.contains(&word.text.as_str())
}

/// Filter, renumber and finish a raw word list.
#[must_use]
pub fn post_filter(raw: Vec<WordEntry>) -> VerseData {
    let words = raw
        .into_iter()
        .filter(|word| !is_apparatus_noise(word))
        .enumerate()
        .map(|(index, mut word)| {
            word.position = index as u32 + 1;
            if word.lemma.as_deref().is_some_and(is_prefix_only) {
                word.metadata.is_prefix_only = true;
                word.strongs = None;
            }
            word
        })
        .collect();

    VerseData::from_words(words)
}

// =============================================================================
// TESTS
// =============================================================================
