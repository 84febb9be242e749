use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Serialize};

use crate::{prompt::InvocationMode, Generator};

/// Client for a local Ollama server's `/api/generate` endpoint
#[derive(Clone)]
pub struct OllamaClient {
    client: ClientWithMiddleware,
    base_url: String,
    model: String,
}

#[derive(Debug, thiserror::Error)]
pub enum OllamaError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: String,
    pub model: Option<String>,
    pub done: Option<bool>,
}

impl OllamaClient {
    pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
    pub const DEFAULT_MODEL: &str = "llama3";
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: super::retrying_client(Self::REQUEST_TIMEOUT),
            base_url: Self::DEFAULT_BASE_URL.into(),
            model: model.into(),
        }
    }

    /// Accepts either the server root or the full `/api/generate` URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.base_url = url
            .trim_end_matches('/')
            .trim_end_matches("/api/generate")
            .to_string();
        self
    }

    pub fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }

    #[tracing::instrument(skip_all, fields(model = %self.model))]
    pub async fn send_generate_request(&self, prompt: &str) -> Result<GenerateResponse, OllamaError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let resp = self
            .client
            .post(self.generate_url())
            .header(CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(&body)?)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(OllamaError::Api { status, message });
        }

        Ok(resp.json::<GenerateResponse>().await?)
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MODEL)
    }
}

impl Generator for OllamaClient {
    const DEFAULT_MODE: InvocationMode = InvocationMode::PerSection;
    const BACKEND: &'static str = "ollama";

    type Error = OllamaError;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        let response = self
            .send_generate_request(prompt)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to generate content"))?;

        Ok(response.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_accepts_full_endpoint() {
        let client = OllamaClient::default().with_base_url("http://gpu-box:11434/api/generate");
        assert_eq!(client.generate_url(), "http://gpu-box:11434/api/generate");

        let client = OllamaClient::default().with_base_url("http://gpu-box:11434/");
        assert_eq!(client.generate_url(), "http://gpu-box:11434/api/generate");
    }

    #[test]
    fn test_generate_request_body() {
        let body = GenerateRequest {
            model: "llama3",
            prompt: "hi",
            stream: false,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"model": "llama3", "prompt": "hi", "stream": false})
        );
    }

    #[test]
    fn test_generate_response_without_text() {
        let response = serde_json::from_str::<GenerateResponse>(r#"{"done": true}"#).unwrap();
        assert_eq!(response.response, "");
    }
}
