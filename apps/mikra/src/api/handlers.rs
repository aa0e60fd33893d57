//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.

use super::{
    AppState,
    types::{
        ChapterResponse, ChapterVerse, GematriaRequest, GematriaResponse, HealthResponse,
        LemmaRequest, LemmaResponse, StatusResponse, StrongsQuery, StrongsResponse,
        TransformRequest, TransformResponse, VerseResponse,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use mikra_core::{
    MikraError, StrongsNumber, VerseRef, extract_strongs, is_prefix_only, transform_node,
    validate_edition, word_gematria,
};

/// HTTP status for a core error.
fn error_status(err: &MikraError) -> StatusCode {
    match err {
        MikraError::VerseNotFound { .. } | MikraError::ChapterNotFound { .. } => {
            StatusCode::NOT_FOUND
        }
        MikraError::InvalidReference(_)
        | MikraError::InvalidStrongs(_)
        | MikraError::InvalidEdition(_)
        | MikraError::InvalidInput(_)
        | MikraError::Markup(_) => StatusCode::BAD_REQUEST,
        MikraError::SerializationError(_)
        | MikraError::DeserializationError(_)
        | MikraError::IoError(_)
        | MikraError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// STATUS HANDLER
// =============================================================================

/// Get store status.
pub async fn status_handler(
    State(state): State<AppState>,
) -> Result<Json<StatusResponse>, (StatusCode, String)> {
    let stats = state.store.stats().map_err(internal_error)?;
    let editions = state.store.editions().map_err(internal_error)?;

    Ok(Json(StatusResponse {
        verses: stats.verses,
        index_rows: stats.index_rows,
        editions,
    }))
}

fn internal_error(e: MikraError) -> (StatusCode, String) {
    tracing::error!("Store read failed: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

// =============================================================================
// VERSE HANDLER
// =============================================================================

/// Get one stored verse.
pub async fn verse_handler(
    State(state): State<AppState>,
    Path((edition, book, chapter, verse)): Path<(String, String, u32, u32)>,
) -> impl IntoResponse {
    let reference = match format!("{book} {chapter}:{verse}").parse::<VerseRef>() {
        Ok(r) => r,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(VerseResponse::error(edition, e.to_string())),
            );
        }
    };
    if let Err(e) = validate_edition(&edition) {
        return (
            StatusCode::BAD_REQUEST,
            Json(VerseResponse::error(edition, e.to_string())),
        );
    }

    match state.store.get_verse(&edition, &reference) {
        Ok(data) => (
            StatusCode::OK,
            Json(VerseResponse::success(edition, reference.to_string(), data)),
        ),
        Err(e) => {
            if !matches!(e, MikraError::VerseNotFound { .. }) {
                tracing::error!("Verse lookup failed: {}", e);
            }
            (error_status(&e), Json(VerseResponse::error(edition, e.to_string())))
        }
    }
}

// =============================================================================
// CHAPTER HANDLER
// =============================================================================

/// Get every stored verse of a chapter.
pub async fn chapter_handler(
    State(state): State<AppState>,
    Path((edition, book, chapter)): Path<(String, String, u32)>,
) -> impl IntoResponse {
    if let Err(e) = validate_edition(&edition) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ChapterResponse::error(edition, book, chapter, e.to_string())),
        );
    }

    match state.store.get_chapter(&edition, &book, chapter) {
        Ok(verses) => {
            let verses = verses
                .into_iter()
                .map(|(reference, data)| ChapterVerse {
                    verse: reference.verse,
                    data,
                })
                .collect();
            (
                StatusCode::OK,
                Json(ChapterResponse::success(edition, book, chapter, verses)),
            )
        }
        Err(e) => (
            error_status(&e),
            Json(ChapterResponse::error(edition, book, chapter, e.to_string())),
        ),
    }
}

// =============================================================================
// STRONG'S HANDLER
// =============================================================================

/// Find occurrences of a Strong's code.
pub async fn strongs_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<StrongsQuery>,
) -> impl IntoResponse {
    let code = match code.parse::<StrongsNumber>() {
        Ok(c) => c,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(StrongsResponse::error(e.to_string())),
            );
        }
    };

    match state.store.find_strongs(&code, query.effective_limit()) {
        Ok(occurrences) => (
            StatusCode::OK,
            Json(StrongsResponse::success(&code, occurrences)),
        ),
        Err(e) => (error_status(&e), Json(StrongsResponse::error(e.to_string()))),
    }
}

// =============================================================================
// GEMATRIA HANDLER
// =============================================================================

/// Compute gematria of a word.
pub async fn gematria_handler(Json(request): Json<GematriaRequest>) -> impl IntoResponse {
    match request.validate() {
        Ok(word) => {
            let value = word_gematria(word);
            (
                StatusCode::OK,
                Json(GematriaResponse::success(word, value.standard, value.ordinal)),
            )
        }
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(GematriaResponse::error(e.to_string())),
        ),
    }
}

// =============================================================================
// LEMMA HANDLER
// =============================================================================

/// Extract Strong's codes from a raw lemma string.
pub async fn lemma_handler(Json(request): Json<LemmaRequest>) -> impl IntoResponse {
    match request.validate() {
        Ok(lemma) => {
            let codes = extract_strongs(Some(lemma));
            (
                StatusCode::OK,
                Json(LemmaResponse::success(lemma, &codes, is_prefix_only(lemma))),
            )
        }
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(LemmaResponse::error(e.to_string())),
        ),
    }
}

// =============================================================================
// TRANSFORM HANDLER
// =============================================================================

/// Transform a posted verse tree without storing it.
pub async fn transform_handler(
    State(state): State<AppState>,
    Json(request): Json<TransformRequest>,
) -> impl IntoResponse {
    if request.tree.is_null() {
        return (
            StatusCode::BAD_REQUEST,
            Json(TransformResponse::error("Missing verse tree")),
        );
    }

    let options = request.options(state.transform);
    let verse = transform_node(&request.to_node(), &options);
    (StatusCode::OK, Json(TransformResponse::success(verse)))
}
