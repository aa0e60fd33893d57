//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use mikra_core::{
    MarkupNode, MikraError, Occurrence, StrongsNumber, TransformOptions, VerseData,
    primitives::MAX_OCCURRENCE_RESULTS,
};
use serde::{Deserialize, Serialize};

/// Maximum accepted length of a posted word (bytes).
pub const MAX_WORD_LENGTH: usize = 1024;

/// Maximum accepted length of a posted lemma string (bytes).
pub const MAX_LEMMA_LENGTH: usize = 256;

/// Occurrence limit applied when the query string gives none.
pub const DEFAULT_OCCURRENCE_LIMIT: usize = 100;

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// STATUS RESPONSE
// =============================================================================

/// Store status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub verses: u64,
    pub index_rows: u64,
    pub editions: Vec<String>,
}

// =============================================================================
// VERSE / CHAPTER RESPONSES
// =============================================================================

/// Single verse response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerseResponse {
    pub success: bool,
    pub edition: String,
    pub reference: Option<String>,
    pub verse: Option<VerseData>,
    pub error: Option<String>,
}

impl VerseResponse {
    pub fn success(edition: impl Into<String>, reference: String, verse: VerseData) -> Self {
        Self {
            success: true,
            edition: edition.into(),
            reference: Some(reference),
            verse: Some(verse),
            error: None,
        }
    }

    pub fn error(edition: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            success: false,
            edition: edition.into(),
            reference: None,
            verse: None,
            error: Some(msg.into()),
        }
    }
}

/// One verse inside a chapter response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterVerse {
    pub verse: u32,
    pub data: VerseData,
}

/// Chapter response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterResponse {
    pub success: bool,
    pub edition: String,
    pub book: String,
    pub chapter: u32,
    pub verses: Vec<ChapterVerse>,
    pub error: Option<String>,
}

impl ChapterResponse {
    pub fn success(
        edition: impl Into<String>,
        book: impl Into<String>,
        chapter: u32,
        verses: Vec<ChapterVerse>,
    ) -> Self {
        Self {
            success: true,
            edition: edition.into(),
            book: book.into(),
            chapter,
            verses,
            error: None,
        }
    }

    pub fn error(
        edition: impl Into<String>,
        book: impl Into<String>,
        chapter: u32,
        msg: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            edition: edition.into(),
            book: book.into(),
            chapter,
            verses: vec![],
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// STRONG'S QUERY/RESPONSE
// =============================================================================

/// Query string of `GET /strongs/{code}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrongsQuery {
    pub limit: Option<usize>,
}

impl StrongsQuery {
    /// Effective limit, capped at `MAX_OCCURRENCE_RESULTS`.
    pub fn effective_limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_OCCURRENCE_LIMIT)
            .min(MAX_OCCURRENCE_RESULTS)
    }
}

/// Strong's occurrences response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrongsResponse {
    pub success: bool,
    pub code: Option<String>,
    pub occurrences: Vec<Occurrence>,
    pub error: Option<String>,
}

impl StrongsResponse {
    pub fn success(code: &StrongsNumber, occurrences: Vec<Occurrence>) -> Self {
        Self {
            success: true,
            code: Some(code.to_string()),
            occurrences,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            code: None,
            occurrences: vec![],
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// GEMATRIA REQUEST/RESPONSE
// =============================================================================

/// Gematria request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GematriaRequest {
    pub word: String,
}

impl GematriaRequest {
    /// Reject oversized words at the API boundary.
    pub fn validate(&self) -> Result<&str, MikraError> {
        if self.word.len() > MAX_WORD_LENGTH {
            return Err(MikraError::InvalidInput(format!(
                "Word length {} exceeds maximum {} bytes",
                self.word.len(),
                MAX_WORD_LENGTH
            )));
        }
        Ok(&self.word)
    }
}

/// Gematria response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GematriaResponse {
    pub success: bool,
    pub word: Option<String>,
    pub standard: u32,
    pub ordinal: u32,
    pub error: Option<String>,
}

impl GematriaResponse {
    pub fn success(word: impl Into<String>, standard: u32, ordinal: u32) -> Self {
        Self {
            success: true,
            word: Some(word.into()),
            standard,
            ordinal,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            word: None,
            standard: 0,
            ordinal: 0,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// LEMMA REQUEST/RESPONSE
// =============================================================================

/// Lemma analysis request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LemmaRequest {
    pub lemma: String,
}

impl LemmaRequest {
    /// Reject oversized lemmas at the API boundary.
    pub fn validate(&self) -> Result<&str, MikraError> {
        if self.lemma.len() > MAX_LEMMA_LENGTH {
            return Err(MikraError::InvalidInput(format!(
                "Lemma length {} exceeds maximum {} bytes",
                self.lemma.len(),
                MAX_LEMMA_LENGTH
            )));
        }
        Ok(&self.lemma)
    }
}

/// Lemma analysis response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LemmaResponse {
    pub success: bool,
    pub lemma: Option<String>,
    pub strongs: Vec<String>,
    pub is_prefix_only: bool,
    pub error: Option<String>,
}

impl LemmaResponse {
    pub fn success(lemma: impl Into<String>, strongs: &[StrongsNumber], is_prefix_only: bool) -> Self {
        Self {
            success: true,
            lemma: Some(lemma.into()),
            strongs: strongs.iter().map(ToString::to_string).collect(),
            is_prefix_only,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            lemma: None,
            strongs: vec![],
            is_prefix_only: false,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// TRANSFORM REQUEST/RESPONSE
// =============================================================================

/// Transform request: one verse as an xml-to-JSON tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformRequest {
    pub tree: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strip_cantillation: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gematria: Option<bool>,
}

impl TransformRequest {
    /// Options for this request, falling back to the server's.
    pub fn options(&self, defaults: TransformOptions) -> TransformOptions {
        TransformOptions {
            strip_cantillation: self
                .strip_cantillation
                .unwrap_or(defaults.strip_cantillation),
            gematria: self.gematria.unwrap_or(defaults.gematria),
        }
    }

    /// The posted tree as markup.
    pub fn to_node(&self) -> MarkupNode {
        MarkupNode::from_json(&self.tree)
    }
}

/// Transform response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformResponse {
    pub success: bool,
    pub verse: Option<VerseData>,
    pub error: Option<String>,
}

impl TransformResponse {
    pub fn success(verse: VerseData) -> Self {
        Self {
            success: true,
            verse: Some(verse),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            verse: None,
            error: Some(msg.into()),
        }
    }
}
