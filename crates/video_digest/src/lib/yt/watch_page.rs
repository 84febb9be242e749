use std::ops::Deref;

use anyhow::Context;

use super::{
    player::{parse_metadata, select_caption_track, transcript_from_timed_text, WatchPageDocument},
    MetadataSource, TranscriptSource,
};
use crate::{
    error::Error,
    types::{TimedText, VideoMetadata},
};

/// Reads transcripts and metadata from the public YouTube watch page
#[derive(Default, Clone)]
pub struct WatchPageClient(pub reqwest::Client);

impl Deref for WatchPageClient {
    type Target = reqwest::Client;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl WatchPageClient {
    const WATCH_URL: &str = "https://www.youtube.com/watch";

    #[tracing::instrument(skip(self))]
    pub async fn fetch_watch_page(&self, video_id: &str) -> Result<WatchPageDocument, Error> {
        let html = self
            .get(Self::WATCH_URL)
            .query(&[("v", video_id)])
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(html.into())
    }
}

impl TranscriptSource for WatchPageClient {
    #[tracing::instrument(skip(self))]
    async fn fetch_transcript(&self, video_id: &str) -> anyhow::Result<String> {
        let player = self.fetch_watch_page(video_id).await?.player_response()?;

        let track = select_caption_track(&player)
            .ok_or_else(|| Error::TranscriptUnavailable(video_id.to_string()))?;
        tracing::debug!(language = %track.language_code, "Fetching caption track");

        let timed_text = self
            .get(&track.base_url)
            .query(&[("fmt", "json3")])
            .send()
            .await?
            .error_for_status()?
            .json::<TimedText>()
            .await
            .context("Failed to decode timed text")?;

        let transcript = transcript_from_timed_text(&timed_text);
        if transcript.is_empty() {
            return Err(Error::TranscriptUnavailable(video_id.to_string()).into());
        }

        Ok(transcript)
    }
}

impl MetadataSource for WatchPageClient {
    #[tracing::instrument(skip(self))]
    async fn fetch_metadata(&self, video_id: &str) -> anyhow::Result<VideoMetadata> {
        let player = self.fetch_watch_page(video_id).await?.player_response()?;
        Ok(parse_metadata(&player)?)
    }
}
