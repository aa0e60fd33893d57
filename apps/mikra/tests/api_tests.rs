//! Integration tests for the Mikra HTTP API.
//!
//! Uses axum-test to test the API handlers without starting a real server.

// Allow unwrap and panic in tests - these are standard for test code
// Allow holding MutexGuard across await in auth tests - tests are serialized
// intentionally to avoid env var conflicts
#![allow(clippy::unwrap_used, clippy::panic, clippy::await_holding_lock)]

use axum::http::{HeaderValue, StatusCode};
use axum_test::TestServer;
use mikra::api::{
    AppState, ChapterResponse, GematriaRequest, GematriaResponse, HealthResponse, LemmaRequest,
    LemmaResponse, MAX_WORD_LENGTH, StatusResponse, StrongsResponse, TransformResponse,
    VerseResponse, create_router,
};
use mikra_core::{Importer, TextNormalizer, TransformOptions, Variant, VerseStore};
use serde_json::json;
use std::sync::Mutex;
use tempfile::TempDir;

/// Mutex to serialize tests since they modify env vars.
static AUTH_TEST_MUTEX: Mutex<()> = Mutex::new(());

const RUTH_3: &str = r#"<osis><osisText><div type="book" osisID="Ruth"><chapter osisID="Ruth.3">
<verse osisID="Ruth.3.3">
  <w lemma="c/7364" morph="HC/Vqq2fs">וְ/רָחַ֣צְתְּ</w>
  <w type="x-ketiv" lemma="c/3381" morph="HC/Vqq1cs">וירדתי</w>
  <note type="variant"><catchWord>וירדתי</catchWord><rdg type="x-qere"><w lemma="c/3381" morph="HC/Vqq2fs">וְ/יָרַ֣דְתְּ</w></rdg></note>
  <w lemma="d/1637" morph="HTd/Ncbsa">הַ/גֹּ֑רֶן</w>
  <seg type="x-sof-pasuq">׃</seg>
</verse>
<verse osisID="Ruth.3.4"><w lemma="l" morph="HR">לְ</w><w lemma="3045" morph="HVqi2fs">תֵּדְעִ֖י</w></verse>
</chapter></div></osisText></osis>"#;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Holds the env mutex and the database directory for one test.
struct TestGuard {
    _guard: std::sync::MutexGuard<'static, ()>,
    _dir: TempDir,
}

impl Drop for TestGuard {
    fn drop(&mut self) {
        // SAFETY: Tests run sequentially under AUTH_TEST_MUTEX, so no concurrent env access.
        unsafe { std::env::remove_var("MIKRA_API_KEY") };
    }
}

fn build_server(api_key: Option<&str>, populated: bool) -> (TestServer, TestGuard) {
    let guard = AUTH_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    // SAFETY: Tests run sequentially under AUTH_TEST_MUTEX, so no concurrent env access.
    unsafe {
        match api_key {
            Some(key) => std::env::set_var("MIKRA_API_KEY", key),
            None => std::env::remove_var("MIKRA_API_KEY"),
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let store = VerseStore::open(dir.path().join("mikra.redb")).unwrap();
    if populated {
        Importer::import_into(
            &store,
            "wlc",
            RUTH_3.as_bytes(),
            &TransformOptions::default(),
        )
        .unwrap();
    }

    let state = AppState::new(store, TransformOptions::default());
    let router = create_router(state);
    (
        TestServer::new(router).unwrap(),
        TestGuard {
            _guard: guard,
            _dir: dir,
        },
    )
}

/// Create a test server over an empty store.
fn create_test_server() -> (TestServer, TestGuard) {
    build_server(None, false)
}

/// Create a test server with Ruth 3:3-4 imported as `wlc`.
fn create_populated_test_server() -> (TestServer, TestGuard) {
    build_server(None, true)
}

// =============================================================================
// HEALTH / STATUS ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (server, _guard) = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_status_empty_store() {
    let (server, _guard) = create_test_server();

    let response = server.get("/status").await;

    response.assert_status_ok();
    let status: StatusResponse = response.json();
    assert_eq!(status.verses, 0);
    assert_eq!(status.index_rows, 0);
    assert!(status.editions.is_empty());
}

#[tokio::test]
async fn test_status_populated_store() {
    let (server, _guard) = create_populated_test_server();

    let response = server.get("/status").await;

    response.assert_status_ok();
    let status: StatusResponse = response.json();
    assert_eq!(status.verses, 2);
    assert!(status.index_rows > 0);
    assert_eq!(status.editions, vec!["wlc".to_string()]);
}

// =============================================================================
// VERSE ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_verse_returns_tagged_words() {
    let (server, _guard) = create_populated_test_server();

    let response = server.get("/verse/wlc/Ruth/3/3").await;

    response.assert_status_ok();
    let result: VerseResponse = response.json();
    assert!(result.success);
    assert_eq!(result.reference.as_deref(), Some("Ruth 3:3"));

    let verse = result.verse.unwrap();
    assert_eq!(verse.words.len(), 4);
    assert_eq!(verse.words[1].variant, Some(Variant::Ketiv));
    assert_eq!(verse.words[2].variant, Some(Variant::Qere));
    let positions: Vec<u32> = verse.words.iter().map(|w| w.position).collect();
    assert_eq!(positions, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_verse_missing_returns_404() {
    let (server, _guard) = create_populated_test_server();

    let response = server.get("/verse/wlc/Ruth/3/99").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let result: VerseResponse = response.json();
    assert!(!result.success);
    assert!(result.error.is_some());
}

#[tokio::test]
async fn test_verse_unknown_edition_returns_404() {
    let (server, _guard) = create_populated_test_server();

    let response = server.get("/verse/lxx/Ruth/3/3").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_verse_invalid_edition_returns_400() {
    let (server, _guard) = create_populated_test_server();

    let response = server.get("/verse/w!c/Ruth/3/3").await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_verse_non_numeric_chapter_rejected() {
    let (server, _guard) = create_populated_test_server();

    let response = server.get("/verse/wlc/Ruth/three/3").await;
    assert!(response.status_code().is_client_error());
}

// =============================================================================
// CHAPTER ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_chapter_lists_verses_in_order() {
    let (server, _guard) = create_populated_test_server();

    let response = server.get("/chapter/wlc/Ruth/3").await;

    response.assert_status_ok();
    let result: ChapterResponse = response.json();
    assert!(result.success);
    let numbers: Vec<u32> = result.verses.iter().map(|v| v.verse).collect();
    assert_eq!(numbers, vec![3, 4]);
}

#[tokio::test]
async fn test_chapter_missing_returns_404() {
    let (server, _guard) = create_populated_test_server();

    let response = server.get("/chapter/wlc/Ruth/4").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let result: ChapterResponse = response.json();
    assert!(!result.success);
    assert!(result.verses.is_empty());
}

// =============================================================================
// STRONG'S ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_strongs_lists_ketiv_and_qere() {
    let (server, _guard) = create_populated_test_server();

    let response = server.get("/strongs/H3381").await;

    response.assert_status_ok();
    let result: StrongsResponse = response.json();
    assert!(result.success);
    assert_eq!(result.code.as_deref(), Some("H3381"));
    let positions: Vec<u32> = result.occurrences.iter().map(|o| o.position).collect();
    assert_eq!(positions, vec![2, 3]);
}

#[tokio::test]
async fn test_strongs_bare_number_is_hebrew() {
    let (server, _guard) = create_populated_test_server();

    let response = server.get("/strongs/3045").await;

    response.assert_status_ok();
    let result: StrongsResponse = response.json();
    assert_eq!(result.code.as_deref(), Some("H3045"));
    assert_eq!(result.occurrences.len(), 1);
}

#[tokio::test]
async fn test_strongs_limit_is_applied() {
    let (server, _guard) = create_populated_test_server();

    let response = server.get("/strongs/H3381?limit=1").await;

    response.assert_status_ok();
    let result: StrongsResponse = response.json();
    assert_eq!(result.occurrences.len(), 1);
}

#[tokio::test]
async fn test_strongs_invalid_code_returns_400() {
    let (server, _guard) = create_populated_test_server();

    let response = server.get("/strongs/Habc").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let result: StrongsResponse = response.json();
    assert!(!result.success);
}

#[tokio::test]
async fn test_strongs_unused_code_is_empty() {
    let (server, _guard) = create_populated_test_server();

    let response = server.get("/strongs/H1").await;

    response.assert_status_ok();
    let result: StrongsResponse = response.json();
    assert!(result.occurrences.is_empty());
}

// =============================================================================
// GEMATRIA / LEMMA ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_gematria_of_word() {
    let (server, _guard) = create_test_server();

    let request = GematriaRequest {
        word: "אמת".to_string(),
    };
    let response = server.post("/gematria").json(&request).await;

    response.assert_status_ok();
    let result: GematriaResponse = response.json();
    assert!(result.success);
    assert_eq!(result.standard, 441);
    assert_eq!(result.ordinal, 1 + 13 + 22);
}

#[tokio::test]
async fn test_gematria_oversized_word_rejected() {
    let (server, _guard) = create_test_server();

    let request = GematriaRequest {
        word: "א".repeat(MAX_WORD_LENGTH),
    };
    let response = server.post("/gematria").json(&request).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let result: GematriaResponse = response.json();
    assert!(!result.success);
    assert!(
        result
            .error
            .as_deref()
            .is_some_and(|e| e.starts_with("Invalid input"))
    );
}

#[tokio::test]
async fn test_lemma_extracts_codes() {
    let (server, _guard) = create_test_server();

    let request = LemmaRequest {
        lemma: "c/d/7225 a".to_string(),
    };
    let response = server.post("/lemma").json(&request).await;

    response.assert_status_ok();
    let result: LemmaResponse = response.json();
    assert_eq!(result.strongs, vec!["H7225".to_string()]);
    assert!(!result.is_prefix_only);
}

#[tokio::test]
async fn test_lemma_prefix_only() {
    let (server, _guard) = create_test_server();

    let response = server.post("/lemma").json(&json!({"lemma": "l"})).await;

    response.assert_status_ok();
    let result: LemmaResponse = response.json();
    assert!(result.strongs.is_empty());
    assert!(result.is_prefix_only);
}

// =============================================================================
// TRANSFORM ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_transform_posted_tree() {
    let (server, _guard) = create_test_server();

    let request = json!({
        "tree": {
            "w": [
                {"_": "בְּ/רֵאשִׁ֖ית", "$": {"lemma": "b/7225", "morph": "HR/Ncfsa"}},
                {"_": "בָּרָ֣א", "$": {"lemma": "1254 a", "morph": "HVqp3ms"}}
            ],
            "seg": {"_": "׃", "$": {"type": "x-sof-pasuq"}}
        },
        "gematria": true
    });
    let response = server.post("/transform").json(&request).await;

    response.assert_status_ok();
    let result: TransformResponse = response.json();
    assert!(result.success);

    let verse = result.verse.unwrap();
    assert_eq!(verse.words.len(), 2);
    let normalizer = TextNormalizer::default();
    let expected = format!(
        "{} {}",
        normalizer.clean("בְּ/רֵאשִׁ֖ית"),
        normalizer.clean("בָּרָ֣א")
    );
    assert_eq!(verse.text, expected);
    assert!(!verse.text.contains('/'));
    assert!(verse.gematria.is_some());
    assert!(verse.words.iter().all(|w| w.metadata.gematria.is_some()));
}

#[tokio::test]
async fn test_transform_keeps_cantillation_on_request() {
    let (server, _guard) = create_test_server();

    let request = json!({
        "tree": {"w": {"_": "בָּרָ֣א", "$": {"lemma": "1254 a"}}},
        "strip_cantillation": false
    });
    let response = server.post("/transform").json(&request).await;

    response.assert_status_ok();
    let result: TransformResponse = response.json();
    assert_eq!(result.verse.unwrap().text, "בָּרָ֣א");
}

#[tokio::test]
async fn test_transform_missing_tree_returns_400() {
    let (server, _guard) = create_test_server();

    let response = server.post("/transform").json(&json!({"tree": null})).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let result: TransformResponse = response.json();
    assert!(!result.success);
}

// =============================================================================
// ERROR HANDLING TESTS
// =============================================================================

#[tokio::test]
async fn test_404_on_unknown_endpoint() {
    let (server, _guard) = create_test_server();

    let response = server.get("/unknown").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn test_method_not_allowed() {
    let (server, _guard) = create_test_server();

    // /health is GET only
    let response = server.post("/health").await;
    assert_eq!(response.status_code().as_u16(), 405);
}

#[tokio::test]
async fn test_invalid_json_body() {
    let (server, _guard) = create_test_server();

    let response = server
        .post("/gematria")
        .text("not valid json")
        .content_type("application/json")
        .await;

    assert!(response.status_code().is_client_error());
}

// =============================================================================
// AUTHENTICATION MIDDLEWARE TESTS
// =============================================================================

#[tokio::test]
async fn test_auth_valid_bearer_token() {
    let api_key = "test-secret-key-12345";
    let (server, _guard) = build_server(Some(api_key), true);

    let response = server
        .get("/status")
        .add_header(
            axum::http::header::AUTHORIZATION,
            format!("Bearer {}", api_key)
                .parse::<HeaderValue>()
                .unwrap(),
        )
        .await;

    response.assert_status_ok();
    let status: StatusResponse = response.json();
    assert_eq!(status.verses, 2);
}

#[tokio::test]
async fn test_auth_valid_raw_token() {
    let api_key = "test-raw-key-67890";
    let (server, _guard) = build_server(Some(api_key), false);

    let response = server
        .get("/status")
        .add_header(
            axum::http::header::AUTHORIZATION,
            api_key.parse::<HeaderValue>().unwrap(),
        )
        .await;

    response.assert_status_ok();
}

#[tokio::test]
async fn test_auth_invalid_token_rejected() {
    let (server, _guard) = build_server(Some("correct-key"), false);

    let response = server
        .get("/verse/wlc/Ruth/3/3")
        .add_header(
            axum::http::header::AUTHORIZATION,
            "Bearer wrong-key".parse::<HeaderValue>().unwrap(),
        )
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_missing_header_rejected() {
    let (server, _guard) = build_server(Some("required-key"), false);

    let response = server.post("/gematria").json(&json!({"word": "אב"})).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_bearer_prefix_only_rejected() {
    let (server, _guard) = build_server(Some("actual-key"), false);

    let response = server
        .get("/status")
        .add_header(
            axum::http::header::AUTHORIZATION,
            "Bearer ".parse::<HeaderValue>().unwrap(),
        )
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_health_endpoint_bypasses_auth() {
    let (server, _guard) = build_server(Some("secret-key-for-bypass-test"), false);

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
}
