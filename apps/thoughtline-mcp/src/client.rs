//! # Thoughtline HTTP Client
//!
//! Wrapper around the Thoughtline HTTP API for use by the MCP server.

use serde::Serialize;
use serde_json::Value;

/// Errors from the HTTP client layer.
#[derive(Debug)]
pub enum ClientError {
    /// Cannot reach the Thoughtline server.
    ConnectionFailed(String),
    /// 429 Too Many Requests.
    RateLimited,
    /// Server refused the request outside the JSON failure payload (4xx other than 400).
    Rejected(u16, String),
    /// Server returned a 5xx error.
    ServerError(u16, String),
    /// Failed to parse response body.
    ParseError(String),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConnectionFailed(url) => write!(f, "Cannot connect to Thoughtline at {url}"),
            Self::RateLimited => write!(f, "Rate limited: too many requests"),
            Self::Rejected(status, msg) => write!(f, "Request rejected ({status}): {msg}"),
            Self::ServerError(status, msg) => write!(f, "Server error ({status}): {msg}"),
            Self::ParseError(msg) => write!(f, "Parse error: {msg}"),
        }
    }
}

impl std::error::Error for ClientError {}

/// HTTP client for the Thoughtline API.
#[derive(Clone)]
pub struct ThoughtlineClient {
    http: reqwest::Client,
    base_url: String,
}

impl ThoughtlineClient {
    pub fn new(base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
    }

    /// Check status codes and parse JSON.
    ///
    /// A 400 carries the `{ error, status: "failed" }` payload and is returned
    /// as a value for the caller to report.
    async fn handle_response(&self, resp: reqwest::Response) -> Result<Value, ClientError> {
        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ClientError::RateLimited);
        }
        if status.is_client_error() && status != reqwest::StatusCode::BAD_REQUEST {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Rejected(status.as_u16(), body));
        }
        if status.is_server_error() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::ServerError(status.as_u16(), body));
        }
        resp.json::<Value>()
            .await
            .map_err(|e| ClientError::ParseError(e.to_string()))
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, ClientError> {
        req.send()
            .await
            .map_err(|e| ClientError::ConnectionFailed(format!("{}: {e}", self.base_url)))
    }

    /// GET /status → graph metrics.
    pub async fn status(&self) -> Result<Value, ClientError> {
        let req = self.request(reqwest::Method::GET, "/status");
        let resp = self.send(req).await?;
        self.handle_response(resp).await
    }

    /// POST /thought → ingest one record.
    pub async fn ingest_thought(&self, record: &impl Serialize) -> Result<Value, ClientError> {
        let req = self.request(reqwest::Method::POST, "/thought").json(record);
        let resp = self.send(req).await?;
        self.handle_response(resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ThoughtlineClient::new("http://localhost:8080/".to_string());
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[test]
    fn error_display() {
        assert_eq!(
            ClientError::ServerError(503, "down".into()).to_string(),
            "Server error (503): down"
        );
        assert_eq!(
            ClientError::Rejected(413, "too large".into()).to_string(),
            "Request rejected (413): too large"
        );
        assert_eq!(
            ClientError::ConnectionFailed("http://x".into()).to_string(),
            "Cannot connect to Thoughtline at http://x"
        );
    }
}
