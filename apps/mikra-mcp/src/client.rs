//! # Mikra HTTP Client
//!
//! Wrapper around the Mikra REST API for use by the MCP server.

use serde_json::Value;

/// Errors from the HTTP client layer.
#[derive(Debug)]
pub enum ClientError {
    /// The configured base URL cannot carry path segments.
    InvalidUrl(String),
    /// Cannot reach the Mikra server.
    ConnectionFailed(String),
    /// 401 Unauthorized - invalid or missing API key.
    Unauthorized,
    /// 429 Too Many Requests.
    RateLimited,
    /// Server returned a 5xx error.
    ServerError(u16, String),
    /// Failed to parse response body.
    ParseError(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUrl(url) => write!(f, "Invalid Mikra URL: {url}"),
            Self::ConnectionFailed(url) => write!(f, "Cannot connect to Mikra at {url}"),
            Self::Unauthorized => write!(f, "Unauthorized: invalid or missing API key"),
            Self::RateLimited => write!(f, "Rate limited: too many requests"),
            Self::ServerError(status, msg) => write!(f, "Server error ({status}): {msg}"),
            Self::ParseError(msg) => write!(f, "Parse error: {msg}"),
        }
    }
}

impl std::error::Error for ClientError {}

/// HTTP client that wraps calls to the Mikra REST API.
#[derive(Clone)]
pub struct MikraClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl MikraClient {
    /// Create a new client pointing at the given Mikra server URL.
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// Build the URL for `segments`, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> Result<reqwest::Url, ClientError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Build a request with optional Bearer auth.
    fn request(
        &self,
        method: reqwest::Method,
        segments: &[&str],
    ) -> Result<reqwest::RequestBuilder, ClientError> {
        let mut req = self.http.request(method, self.url(segments)?);
        if let Some(ref key) = self.api_key {
            req = req.bearer_auth(key);
        }
        Ok(req)
    }

    /// Check status codes and parse JSON.
    ///
    /// 4xx bodies other than 401/429 are returned as-is: the API answers
    /// lookups that miss with a JSON body carrying `error`.
    async fn handle_response(&self, resp: reqwest::Response) -> Result<Value, ClientError> {
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ClientError::RateLimited);
        }
        if status.is_server_error() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::ServerError(status.as_u16(), body));
        }
        resp.json::<Value>()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<Value, ClientError> {
        let resp = req
            .send()
            .await
            .map_err(|e| ClientError::ConnectionFailed(format!("{}: {e}", self.base_url)))?;
        self.handle_response(resp).await
    }

    /// GET /status → store statistics.
    pub async fn status(&self) -> Result<Value, ClientError> {
        let req = self.request(reqwest::Method::GET, &["status"])?;
        self.send(req).await
    }

    /// GET /verse/{edition}/{book}/{chapter}/{verse}
    pub async fn verse(
        &self,
        edition: &str,
        book: &str,
        chapter: u32,
        verse: u32,
    ) -> Result<Value, ClientError> {
        let chapter = chapter.to_string();
        let verse = verse.to_string();
        let req = self.request(
            reqwest::Method::GET,
            &["verse", edition, book, &chapter, &verse],
        )?;
        self.send(req).await
    }

    /// GET /chapter/{edition}/{book}/{chapter}
    pub async fn chapter(
        &self,
        edition: &str,
        book: &str,
        chapter: u32,
    ) -> Result<Value, ClientError> {
        let chapter = chapter.to_string();
        let req = self.request(reqwest::Method::GET, &["chapter", edition, book, &chapter])?;
        self.send(req).await
    }

    /// GET /strongs/{code}?limit=N
    pub async fn strongs(&self, code: &str, limit: Option<u64>) -> Result<Value, ClientError> {
        let mut req = self.request(reqwest::Method::GET, &["strongs", code])?;
        if let Some(limit) = limit {
            req = req.query(&[("limit", limit)]);
        }
        self.send(req).await
    }

    /// POST /gematria
    pub async fn gematria(&self, word: &str) -> Result<Value, ClientError> {
        let req = self
            .request(reqwest::Method::POST, &["gematria"])?
            .json(&serde_json::json!({ "word": word }));
        self.send(req).await
    }

    /// POST /lemma
    pub async fn lemma(&self, lemma: &str) -> Result<Value, ClientError> {
        let req = self
            .request(reqwest::Method::POST, &["lemma"])?
            .json(&serde_json::json!({ "lemma": lemma }));
        self.send(req).await
    }
}
