pub mod player;
pub mod watch_page;

use std::{future::Future, sync::LazyLock};

use regex::Regex;

use crate::{error::Error, types::VideoMetadata};

static VIDEO_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:[?&]v=|youtu\.be/|/shorts/|/embed/|/live/)([\w-]{11})(?:[^\w-]|$)").unwrap()
});

static BARE_VIDEO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w-]{11}$").unwrap());

/// Extracts the 11-character video id from a YouTube URL or a bare id.
pub fn extract_video_id(url: &str) -> Result<String, Error> {
    let url = url.trim();
    if BARE_VIDEO_ID_RE.is_match(url) {
        return Ok(url.to_string());
    }

    VIDEO_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| Error::InvalidUrl(url.to_string()))
}

pub trait TranscriptSource {
    /// The video's spoken text as one string
    fn fetch_transcript(&self, video_id: &str) -> impl Future<Output = anyhow::Result<String>>;
}

pub trait MetadataSource {
    fn fetch_metadata(&self, video_id: &str)
        -> impl Future<Output = anyhow::Result<VideoMetadata>>;
}
