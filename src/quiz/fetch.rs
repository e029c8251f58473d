use anyhow::Context;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
enum RequestError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("Server returned an error: {status}")]
    ServerError { status: u16 },
}

/// Client for the Lurnix backend. Quiz generation is keyed by the opaque
/// session id handed out at upload time; a bearer token is attached when one
/// is configured.
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, token }
    }

    /// Fetches the raw quiz payload for an upload session. The backend wraps
    /// the generated text in a `{"quiz": "..."}` body; the payload string is
    /// returned as-is for [`parse`](super::parse) to normalize. Transport and
    /// server failures are surfaced as errors and must not be fed to the
    /// parser.
    pub fn generate_quiz(&self, session_id: &str) -> anyhow::Result<String> {
        let url = format!("{}/api/pdf/generate-quiz/{}", self.base_url, session_id);

        let mut request = ureq::get(&url);
        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("Bearer {}", token));
        }

        let response = request
            .call()
            .map_err(|e| match e {
                ureq::Error::Status(code, _) => RequestError::ServerError { status: code },
                other => RequestError::Http(other),
            })
            .context("Failed to send request")?;

        let body: Value = response
            .into_json()
            .context("Failed to read response body")?;

        let quiz = body
            .get("quiz")
            .and_then(Value::as_str)
            .context("no quiz in response")?;

        Ok(quiz.to_string())
    }
}
