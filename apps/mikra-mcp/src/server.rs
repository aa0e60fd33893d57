//! # Mikra MCP Server
//!
//! Implements `ServerHandler` with 6 MCP tools that proxy to the Mikra HTTP API.

use crate::client::MikraClient;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router,
};
use serde::Deserialize;
use serde_json::Value;

// =============================================================================
// MCP SERVER
// =============================================================================

/// MCP server that bridges to a Mikra HTTP API.
#[derive(Clone)]
pub struct MikraMcp {
    client: MikraClient,
    default_edition: String,
    #[allow(dead_code)]
    tool_router: ToolRouter<Self>,
}

// =============================================================================
// TOOL PARAMETER STRUCTS
// =============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct VerseParams {
    #[schemars(description = "OSIS book code, e.g. 'Gen', 'Ruth', '1Sam'")]
    pub book: String,
    #[schemars(description = "Chapter number")]
    pub chapter: u32,
    #[schemars(description = "Verse number")]
    pub verse: u32,
    #[schemars(description = "Edition name (defaults to the bridge's edition)")]
    pub edition: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ChapterParams {
    #[schemars(description = "OSIS book code, e.g. 'Gen'")]
    pub book: String,
    #[schemars(description = "Chapter number")]
    pub chapter: u32,
    #[schemars(description = "Edition name (defaults to the bridge's edition)")]
    pub edition: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct StrongsParams {
    /// Strong's number such as "H7225", or a bare "7225" for Hebrew.
    #[schemars(description = "Strong's number such as 'H7225' or bare '7225' (Hebrew)")]
    pub code: String,
    #[schemars(description = "Maximum number of occurrences (default: 100)")]
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GematriaParams {
    #[schemars(description = "Hebrew word; pointing and cantillation are ignored")]
    pub word: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LemmaParams {
    #[schemars(description = "Raw OSIS lemma attribute, e.g. 'b/7225' or 'c/d/1254 a'")]
    pub lemma: String,
}

// =============================================================================
// TOOL IMPLEMENTATIONS
// =============================================================================

#[tool_router]
impl MikraMcp {
    pub fn new(client: MikraClient, default_edition: String) -> Self {
        Self {
            client,
            default_edition,
            tool_router: Self::tool_router(),
        }
    }

    fn edition<'a>(&'a self, requested: &'a Option<String>) -> &'a str {
        requested.as_deref().unwrap_or(&self.default_edition)
    }

    #[tool(description = "Get one Hebrew Bible verse as words with Strong's numbers, morphology and ketiv/qere tags")]
    async fn mikra_verse(
        &self,
        params: Parameters<VerseParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let edition = self.edition(&p.edition);
        match self.client.verse(edition, &p.book, p.chapter, p.verse).await {
            Ok(resp) => Ok(text_result(format_verse_response(&resp))),
            Err(e) => Err(McpError::internal_error(format!("{e}"), None)),
        }
    }

    #[tool(description = "Get the plain text of every stored verse in a chapter")]
    async fn mikra_chapter(
        &self,
        params: Parameters<ChapterParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        let edition = self.edition(&p.edition);
        match self.client.chapter(edition, &p.book, p.chapter).await {
            Ok(resp) => Ok(text_result(format_chapter_response(&resp))),
            Err(e) => Err(McpError::internal_error(format!("{e}"), None)),
        }
    }

    #[tool(description = "List where a Strong's number occurs (edition, reference, word position)")]
    async fn mikra_strongs(
        &self,
        params: Parameters<StrongsParams>,
    ) -> Result<CallToolResult, McpError> {
        let p = params.0;
        match self.client.strongs(&p.code, p.limit).await {
            Ok(resp) => Ok(text_result(format_strongs_response(&resp))),
            Err(e) => Err(McpError::internal_error(format!("{e}"), None)),
        }
    }

    #[tool(description = "Compute the standard and ordinal gematria of a Hebrew word")]
    async fn mikra_gematria(
        &self,
        params: Parameters<GematriaParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.client.gematria(&params.0.word).await {
            Ok(resp) => {
                let text = match error_of(&resp) {
                    Some(err) => format!("Gematria failed: {err}"),
                    None => format!(
                        "Standard: {}\nOrdinal: {}",
                        u64_of(&resp, "standard"),
                        u64_of(&resp, "ordinal")
                    ),
                };
                Ok(text_result(text))
            }
            Err(e) => Err(McpError::internal_error(format!("{e}"), None)),
        }
    }

    #[tool(description = "Extract Strong's numbers from a raw OSIS lemma attribute")]
    async fn mikra_lemma(
        &self,
        params: Parameters<LemmaParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.client.lemma(&params.0.lemma).await {
            Ok(resp) => Ok(text_result(format_lemma_response(&resp))),
            Err(e) => Err(McpError::internal_error(format!("{e}"), None)),
        }
    }

    #[tool(description = "Get store statistics (verse count, index rows, editions)")]
    async fn mikra_status(&self) -> Result<CallToolResult, McpError> {
        match self.client.status().await {
            Ok(resp) => {
                let editions = strings_of(&resp, "editions");
                let text = format!(
                    "Store Status:\n  Verses: {}\n  Index rows: {}\n  Editions: {}",
                    u64_of(&resp, "verses"),
                    u64_of(&resp, "index_rows"),
                    if editions.is_empty() {
                        "-".to_string()
                    } else {
                        editions.join(", ")
                    }
                );
                Ok(text_result(text))
            }
            Err(e) => Err(McpError::internal_error(format!("{e}"), None)),
        }
    }
}

// =============================================================================
// SERVER HANDLER
// =============================================================================

#[tool_handler]
impl ServerHandler for MikraMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Mikra Hebrew Bible server. Use tools to read verses word by word, \
                 find Strong's number occurrences, and compute gematria."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

// =============================================================================
// RESPONSE FORMATTING
// =============================================================================

fn text_result(text: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text)])
}

fn error_of(resp: &Value) -> Option<&str> {
    resp.get("error").and_then(|v| v.as_str())
}

fn u64_of(resp: &Value, key: &str) -> u64 {
    resp.get(key).and_then(|v| v.as_u64()).unwrap_or(0)
}

fn str_of<'a>(resp: &'a Value, key: &str) -> &'a str {
    resp.get(key).and_then(|v| v.as_str()).unwrap_or("")
}

fn strings_of(resp: &Value, key: &str) -> Vec<String> {
    resp.get(key)
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// One line per word: position, text, codes, morph, ketiv/qere tag.
fn format_verse_response(resp: &Value) -> String {
    if let Some(err) = error_of(resp) {
        return format!("Not found: {err}");
    }
    let Some(verse) = resp.get("verse") else {
        return "Not found.".to_string();
    };

    let mut parts = vec![format!(
        "{} ({})",
        str_of(resp, "reference"),
        str_of(resp, "edition")
    )];
    parts.push(str_of(verse, "text").to_string());

    if let Some(words) = verse.get("words").and_then(|v| v.as_array()) {
        parts.push(format!("Words ({}):", words.len()));
        for word in words {
            let codes = strings_of(word, "strongs");
            let mut line = format!(
                "  {} {} [{}] {}",
                u64_of(word, "position"),
                str_of(word, "text"),
                codes.join(","),
                str_of(word, "morph")
            );
            if let Some(variant) = word.get("variant").and_then(|v| v.as_str()) {
                line.push_str(&format!(" ({variant})"));
            }
            parts.push(line);
        }
    }

    parts.join("\n")
}

fn format_chapter_response(resp: &Value) -> String {
    if let Some(err) = error_of(resp) {
        return format!("Not found: {err}");
    }

    let mut parts = vec![format!(
        "{} {} ({})",
        str_of(resp, "book"),
        u64_of(resp, "chapter"),
        str_of(resp, "edition")
    )];
    if let Some(verses) = resp.get("verses").and_then(|v| v.as_array()) {
        for verse in verses {
            let text = verse
                .get("data")
                .map(|data| str_of(data, "text"))
                .unwrap_or("");
            parts.push(format!("{} {}", u64_of(verse, "verse"), text));
        }
    }
    parts.join("\n")
}

fn format_strongs_response(resp: &Value) -> String {
    if let Some(err) = error_of(resp) {
        return format!("Lookup failed: {err}");
    }

    let occurrences = resp
        .get("occurrences")
        .and_then(|v| v.as_array())
        .map(Vec::as_slice)
        .unwrap_or_default();
    let mut parts = vec![format!(
        "{}: {} occurrence(s)",
        str_of(resp, "code"),
        occurrences.len()
    )];
    for occurrence in occurrences {
        let reference = occurrence.get("reference").unwrap_or(&Value::Null);
        parts.push(format!(
            "  {} {} {}:{} word {}",
            str_of(occurrence, "edition"),
            str_of(reference, "book"),
            u64_of(reference, "chapter"),
            u64_of(reference, "verse"),
            u64_of(occurrence, "position")
        ));
    }
    parts.join("\n")
}

fn format_lemma_response(resp: &Value) -> String {
    if let Some(err) = error_of(resp) {
        return format!("Lemma failed: {err}");
    }
    let codes = strings_of(resp, "strongs");
    let prefix_only = resp
        .get("is_prefix_only")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    format!(
        "Strong's: {}\nPrefix-only: {prefix_only}",
        if codes.is_empty() {
            "-".to_string()
        } else {
            codes.join(", ")
        }
    )
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn verse_lists_words_with_tags() {
        let resp = json!({
            "success": true,
            "edition": "wlc",
            "reference": "Ruth 3:3",
            "verse": {
                "text": "וירדתי וְיָרַדְתְּ",
                "words": [
                    {"position": 2, "text": "וירדתי", "strongs": ["H3381"], "morph": "HC/Vqq1cs", "variant": "ketiv"},
                    {"position": 3, "text": "וְיָרַדְתְּ", "strongs": ["H3381"], "morph": "HC/Vqq2fs", "variant": "qere"}
                ]
            },
            "error": null
        });

        let text = format_verse_response(&resp);
        assert!(text.starts_with("Ruth 3:3 (wlc)"));
        assert!(text.contains("Words (2):"));
        assert!(text.contains("[H3381] HC/Vqq1cs (ketiv)"));
        assert!(text.contains("(qere)"));
    }

    #[test]
    fn verse_error_is_reported() {
        let resp = json!({"success": false, "edition": "wlc", "error": "Verse not found"});
        assert_eq!(format_verse_response(&resp), "Not found: Verse not found");
    }

    #[test]
    fn strongs_lists_occurrences() {
        let resp = json!({
            "success": true,
            "code": "H7225",
            "occurrences": [
                {"edition": "wlc", "reference": {"book": "Gen", "chapter": 1, "verse": 1}, "position": 1}
            ],
            "error": null
        });

        let text = format_strongs_response(&resp);
        assert!(text.starts_with("H7225: 1 occurrence(s)"));
        assert!(text.contains("wlc Gen 1:1 word 1"));
    }

    #[test]
    fn chapter_lists_verse_texts() {
        let resp = json!({
            "success": true,
            "edition": "wlc",
            "book": "Ruth",
            "chapter": 3,
            "verses": [{"verse": 4, "data": {"text": "לְ תֵּדְעִי", "words": []}}],
            "error": null
        });
        assert_eq!(
            format_chapter_response(&resp),
            "Ruth 3 (wlc)\n4 לְ תֵּדְעִי"
        );
    }

    #[test]
    fn lemma_without_codes() {
        let resp = json!({"success": true, "lemma": "l", "strongs": [], "is_prefix_only": true, "error": null});
        assert_eq!(
            format_lemma_response(&resp),
            "Strong's: -\nPrefix-only: true"
        );
    }
}
