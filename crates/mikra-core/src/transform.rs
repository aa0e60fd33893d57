//! # Verse Transform
//!
//! The full per-verse pipeline: walk, filter, optionally enrich.
//!
//! Each call owns its walk state, so verses can be transformed
//! independently and in any order.

use crate::gematria::annotate_verse;
use crate::node::{Element, MarkupNode};
use crate::normalize::TextNormalizer;
use crate::postfilter::post_filter;
use crate::types::VerseData;
use crate::walker::TreeWalker;
use serde::{Deserialize, Serialize};

/// Pipeline-wide policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformOptions {
    /// Remove cantillation marks from every word.
    pub strip_cantillation: bool,
    /// Attach gematria to words and verse totals.
    pub gematria: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            strip_cantillation: true,
            gematria: false,
        }
    }
}

impl TransformOptions {
    /// The normalizer for these options.
    #[must_use]
    pub const fn normalizer(&self) -> TextNormalizer {
        TextNormalizer::new(self.strip_cantillation)
    }
}

/// Transform one verse element.
#[must_use]
pub fn transform_verse(verse: &Element, options: &TransformOptions) -> VerseData {
    let raw = TreeWalker::new(options.normalizer()).walk_verse(verse);
    finish(post_filter(raw), options)
}

/// Transform any markup node standing for one verse.
#[must_use]
pub fn transform_node(node: &MarkupNode, options: &TransformOptions) -> VerseData {
    let raw = TreeWalker::new(options.normalizer()).walk(node);
    finish(post_filter(raw), options)
}

fn finish(mut verse: VerseData, options: &TransformOptions) -> VerseData {
    if options.gematria {
        annotate_verse(&mut verse);
    }
    verse
}

// =============================================================================
// TESTS
// =============================================================================
