//! # Gematria
//!
//! Numeric readings of Hebrew words from per-letter values.
//!
//! - **Standard**: alef-tet 1-9, yod-tsadi 10-90, qof-tav 100-400
//! - **Ordinal**: alphabet position 1-22
//!
//! Final letter forms count as their base letter. Vowel points,
//! cantillation, maqqef and any non-letter are ignored.

use crate::types::{Gematria, VerseData};

/// The 22 consonants in alphabet order with their standard values.
const LETTERS: [(char, u32); 22] = [
    ('\u{05D0}', 1),   // alef
    ('\u{05D1}', 2),   // bet
    ('\u{05D2}', 3),   // gimel
    ('\u{05D3}', 4),   // dalet
    ('\u{05D4}', 5),   // he
    ('\u{05D5}', 6),   // vav
    ('\u{05D6}', 7),   // zayin
    ('\u{05D7}', 8),   // het
    ('\u{05D8}', 9),   // tet
    ('\u{05D9}', 10),  // yod
    ('\u{05DB}', 20),  // kaf
    ('\u{05DC}', 30),  // lamed
    ('\u{05DE}', 40),  // mem
    ('\u{05E0}', 50),  // nun
    ('\u{05E1}', 60),  // samekh
    ('\u{05E2}', 70),  // ayin
    ('\u{05E4}', 80),  // pe
    ('\u{05E6}', 90),  // tsadi
    ('\u{05E7}', 100), // qof
    ('\u{05E8}', 200), // resh
    ('\u{05E9}', 300), // shin
    ('\u{05EA}', 400), // tav
];

/// Final forms and the base letter they stand for.
const FINAL_FORMS: [(char, char); 5] = [
    ('\u{05DA}', '\u{05DB}'), // final kaf
    ('\u{05DD}', '\u{05DE}'), // final mem
    ('\u{05DF}', '\u{05E0}'), // final nun
    ('\u{05E3}', '\u{05E4}'), // final pe
    ('\u{05E5}', '\u{05E6}'), // final tsadi
];

/// Values of one character, or `None` if it is not a consonant.
#[must_use]
pub fn letter_value(c: char) -> Option<Gematria> {
    let base = FINAL_FORMS
        .iter()
        .find(|(final_form, _)| *final_form == c)
        .map_or(c, |(_, base)| *base);

    LETTERS
        .iter()
        .position(|(letter, _)| *letter == base)
        .map(|index| Gematria {
            standard: LETTERS[index].1,
            ordinal: index as u32 + 1,
        })
}

/// Both readings of one word. Words with no consonant give zero.
#[must_use]
pub fn word_gematria(word: &str) -> Gematria {
    word.chars().filter_map(letter_value).sum()
}

/// Annotate every word of a finished verse and record the verse totals.
///
/// Runs over the final word list, so totals never include filtered words.
pub fn annotate_verse(verse: &mut VerseData) {
    let mut total = Gematria::default();
    for word in &mut verse.words {
        let value = word_gematria(&word.text);
        word.metadata.gematria = Some(value);
        total = total + value;
    }
    verse.gematria = Some(total);
}

// =============================================================================
// TESTS
// =============================================================================
