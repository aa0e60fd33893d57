//! # Tree Walker
//!
//! Recursive traversal of one verse's markup tree into the raw word list.
//!
//! Dispatch:
//! - text leaf: tokenize, one bare word per token
//! - list: walk each item in order
//! - element: skip reserved non-lexical segments entirely; otherwise emit
//!   the inline text with the element's lemma/morph, then walk children
//!
//! Child keys are looked up in [`SPECIAL_CHILDREN`]. Catch-words are
//! skipped, readings go through the variant classifier, notes contribute
//! only their nested readings, and every other key is walked normally.
//!
//! Output positions are provisional; the post filter renumbers them.

use crate::node::{Element, MarkupNode};
use crate::normalize::TextNormalizer;
use crate::primitives::{
    CATCH_WORD_KEY, LEMMA_ATTRIBUTE, MAX_TREE_DEPTH, MORPH_ATTRIBUTE, NOTE_KEY, READING_KEY,
};
use crate::strongs::extract_strongs;
use crate::types::{Variant, WordEntry};
use crate::variant::{
    ReadingContext, ReadingDisposition, classify_reading, is_non_lexical_segment, word_variant,
};

/// How the walker treats a child key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildRole {
    /// Ketiv echo for cross-reference. Never walked.
    CatchWord,
    /// Alternate reading. Handed to the variant classifier.
    Reading,
    /// Apparatus note. Only nested readings survive.
    Note,
    /// Ordinary content. Walked.
    Content,
}

/// Child keys with special handling. Every other key is `Content`.
pub const SPECIAL_CHILDREN: &[(&str, ChildRole)] = &[
    (CATCH_WORD_KEY, ChildRole::CatchWord),
    (READING_KEY, ChildRole::Reading),
    (NOTE_KEY, ChildRole::Note),
];

impl ChildRole {
    /// Role of a child key.
    #[must_use]
    pub fn of(key: &str) -> Self {
        SPECIAL_CHILDREN
            .iter()
            .find(|(special, _)| *special == key)
            .map_or(Self::Content, |(_, role)| *role)
    }
}

/// Walks one verse and collects its raw words.
///
/// A walker is single-use: build one per verse.
#[derive(Debug)]
pub struct TreeWalker {
    normalizer: TextNormalizer,
    words: Vec<WordEntry>,
}

impl TreeWalker {
    /// Create a walker for one verse.
    #[must_use]
    pub fn new(normalizer: TextNormalizer) -> Self {
        Self {
            normalizer,
            words: Vec::new(),
        }
    }

    /// Walk a verse element and return the raw words in document order.
    #[must_use]
    pub fn walk_verse(mut self, verse: &Element) -> Vec<WordEntry> {
        self.walk_element(verse, ReadingContext::Base, 0);
        self.words
    }

    /// Walk an arbitrary node and return the raw words.
    #[must_use]
    pub fn walk(mut self, node: &MarkupNode) -> Vec<WordEntry> {
        self.walk_node(node, ReadingContext::Base, 0);
        self.words
    }

    fn walk_node(&mut self, node: &MarkupNode, context: ReadingContext, depth: usize) {
        if depth > MAX_TREE_DEPTH {
            return;
        }
        match node {
            MarkupNode::Text(text) => {
                let variant = word_variant(None, context);
                self.emit(text, None, None, variant);
            }
            MarkupNode::List(items) => {
                for item in items {
                    self.walk_node(item, context, depth + 1);
                }
            }
            MarkupNode::Element(element) => self.walk_element(element, context, depth),
        }
    }

    fn walk_element(&mut self, element: &Element, context: ReadingContext, depth: usize) {
        if depth > MAX_TREE_DEPTH {
            return;
        }

        let element_type = element.element_type();
        if is_non_lexical_segment(element_type) {
            return;
        }

        if let Some(text) = &element.text {
            self.emit(
                text,
                element.attribute(LEMMA_ATTRIBUTE),
                element.attribute(MORPH_ATTRIBUTE),
                word_variant(element_type, context),
            );
        }

        for (key, child) in &element.children {
            match ChildRole::of(key) {
                ChildRole::CatchWord => {}
                ChildRole::Reading => self.walk_readings(child, depth + 1),
                ChildRole::Note => {
                    for note in child.elements() {
                        for (note_key, note_child) in &note.children {
                            if ChildRole::of(note_key) == ChildRole::Reading {
                                self.walk_readings(note_child, depth + 2);
                            }
                        }
                    }
                }
                ChildRole::Content => self.walk_node(child, context, depth + 1),
            }
        }
    }

    /// Walk one reading node or a list of them.
    ///
    /// A followed reading is walked in its own context, which ends with
    /// the reading's subtree: siblings after it keep the caller's context.
    fn walk_readings(&mut self, readings: &MarkupNode, depth: usize) {
        for reading in readings.elements() {
            match classify_reading(reading.element_type()) {
                ReadingDisposition::Follow(inner) => self.walk_element(reading, inner, depth + 1),
                ReadingDisposition::Discard => {}
            }
        }
    }

    fn emit(
        &mut self,
        raw: &str,
        lemma: Option<&str>,
        morph: Option<&str>,
        variant: Option<Variant>,
    ) {
        let strongs = extract_strongs(lemma);
        for token in self.normalizer.tokens(raw) {
            let position = self.words.len() as u32 + 1;
            let mut word = WordEntry::new(position, token);
            word.lemma = lemma.map(str::to_string);
            word.morph = morph.map(str::to_string);
            word.strongs = (!strongs.is_empty()).then(|| strongs.clone());
            word.variant = variant;
            self.words.push(word);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
