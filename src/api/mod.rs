use crate::models::{Note, NoteDraft};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ApiErrorKind {
    /// Request never completed (DNS, refused connection, aborted fetch).
    Network,
    /// Completed with a non-2xx status.
    Http,
    /// Completed but the body could not be decoded as expected.
    Parse,
}

/// Classified failure value returned by the store client.
///
/// The transport never throws across the controller boundary; every failure
/// is a value the controller can branch on.
#[derive(Clone, Debug)]
pub(crate) struct ApiError {
    #[allow(dead_code)]
    pub kind: ApiErrorKind,
    /// HTTP status for `Http` failures, absent otherwise.
    #[allow(dead_code)]
    pub status: Option<u16>,
    pub message: String,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ApiError {
    fn network(e: reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            status: None,
            message: e.to_string(),
        }
    }

    fn parse(e: impl std::fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            status: None,
            message: e.to_string(),
        }
    }

    fn http(status: u16, reason: Option<&str>, body: &str) -> Self {
        // Body text is best effort; fall back to the canonical reason.
        let detail = if body.is_empty() {
            reason.unwrap_or_default()
        } else {
            body
        };
        Self {
            kind: ApiErrorKind::Http,
            status: Some(status),
            message: format!("API error {status}: {detail}"),
        }
    }
}

pub(crate) type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct EnvConfig {
    pub api_url: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        let default_api_url = "http://localhost:3001".to_string();

        // We support BOTH `window.ENV.API_URL` (documented style) and
        // `window.ENV.api_url` (legacy/implementation detail) for compatibility.
        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    // 1) Preferred: API_URL
                    if let Ok(api_url) = js_sys::Reflect::get(&env, &"API_URL".into()) {
                        if let Some(url_str) = api_url.as_string() {
                            return Self {
                                api_url: normalize_base_url(&url_str),
                            };
                        }
                    }

                    // 2) Fallback: api_url
                    if let Ok(api_url) = js_sys::Reflect::get(&env, &"api_url".into()) {
                        if let Some(url_str) = api_url.as_string() {
                            return Self {
                                api_url: normalize_base_url(&url_str),
                            };
                        }
                    }
                }
            }
        }

        Self {
            api_url: default_api_url,
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Trailing slashes would produce `//notes` once joined with a path.
pub(crate) fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Decode a successful response body.
///
/// A 204 or a non-JSON content type yields no parsed body (deletion responses
/// in particular); anything else must parse as `T`.
fn decode_body<T: serde::de::DeserializeOwned>(
    status: u16,
    content_type: Option<&str>,
    body: &str,
) -> ApiResult<Option<T>> {
    let is_json = content_type
        .map(|c| c.contains("application/json"))
        .unwrap_or(false);

    if status == 204 || !is_json {
        return Ok(None);
    }

    serde_json::from_str(body).map(Some).map_err(ApiError::parse)
}

fn require_body<T>(body: Option<T>) -> ApiResult<T> {
    body.ok_or_else(|| ApiError::parse("response body was empty"))
}

/// JSON-over-HTTP CRUD client for the notes store.
///
/// No caching, no retries, no shared-state mutation; each call maps to one
/// request against `{base}/notes`.
#[derive(Clone)]
pub(crate) struct NotesApi {
    pub(crate) base_url: String,
}

impl NotesApi {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: normalize_base_url(&base_url),
        }
    }

    pub fn from_env() -> Self {
        Self::new(EnvConfig::new().api_url)
    }

    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&NoteDraft>,
    ) -> ApiResult<Option<T>> {
        let client = reqwest::Client::new();
        let url = format!("{}{}", self.base_url, path);

        let mut req = client
            .request(method, url)
            .header("Content-Type", "application/json");
        if let Some(b) = body {
            req = req.json(b);
        }

        let res = req.send().await.map_err(ApiError::network)?;
        let status = res.status();

        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ApiError::http(
                status.as_u16(),
                status.canonical_reason(),
                &body,
            ));
        }

        let content_type = res
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let text = res.text().await.unwrap_or_default();

        decode_body(status.as_u16(), content_type.as_deref(), &text)
    }

    pub async fn list_notes(&self) -> ApiResult<Vec<Note>> {
        let body = self
            .request::<Vec<Note>>(reqwest::Method::GET, "/notes", None)
            .await?;
        require_body(body)
    }

    pub async fn create_note(&self, draft: &NoteDraft) -> ApiResult<Note> {
        let body = self
            .request::<Note>(reqwest::Method::POST, "/notes", Some(draft))
            .await?;
        require_body(body)
    }

    pub async fn update_note(&self, id: &str, draft: &NoteDraft) -> ApiResult<Note> {
        let body = self
            .request::<Note>(reqwest::Method::PUT, &format!("/notes/{id}"), Some(draft))
            .await?;
        require_body(body)
    }

    pub async fn delete_note(&self, id: &str) -> ApiResult<()> {
        // 204 or any body; either way the payload is ignored.
        let _ = self
            .request::<serde_json::Value>(reqwest::Method::DELETE, &format!("/notes/{id}"), None)
            .await?;
        Ok(())
    }
}
