#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Parse error: {0}")]
    ParseError(&'static str),
    #[error("Invalid YouTube URL: {0}")]
    InvalidUrl(String),
    #[error("Transcript not available for video {0}")]
    TranscriptUnavailable(String),
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
