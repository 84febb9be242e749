use std::time::Duration;

use anyhow::Context;
use serde::Serialize;

use crate::{
    error::Error,
    parser::{normalize, parse_sections, ParseStrategy},
    prompt::{InvocationMode, PromptBuilder},
    types::{AnalysisResult, Section, VideoMetadata},
    yt::{extract_video_id, MetadataSource, TranscriptSource},
    Generator,
};

pub mod builder;

pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(120);

/// Fetches a video's transcript, prompts the generation backend and
/// normalizes what it returns
#[derive(Debug)]
pub struct VideoAnalyzer<G, T, M>
where
    G: Generator,
    T: TranscriptSource,
    M: MetadataSource,
{
    generator: G,
    transcript_source: T,
    metadata_source: M,
    mode: Option<InvocationMode>,
    call_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptAnalysis {
    pub mode: InvocationMode,
    /// Strategy that parsed the combined response; per-section responses are
    /// extracted directly
    pub strategy: Option<ParseStrategy>,
    pub analysis: AnalysisResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoAnalysis {
    pub video_id: String,
    pub metadata: VideoMetadata,
    #[serde(flatten)]
    pub outcome: TranscriptAnalysis,
}

impl<G, T, M> VideoAnalyzer<G, T, M>
where
    G: Generator,
    T: TranscriptSource,
    M: MetadataSource,
{
    pub fn mode(&self) -> InvocationMode {
        self.mode.unwrap_or(G::DEFAULT_MODE)
    }

    fn prompt_builder(&self) -> PromptBuilder {
        PromptBuilder::new().max_transcript_chars(G::MAX_TRANSCRIPT_CHARS)
    }

    /// Runs one generation call; failures and timeouts become an empty string.
    #[tracing::instrument(skip(self, prompt), fields(backend = G::BACKEND))]
    async fn generate_or_empty(&self, section: Option<Section>, prompt: String) -> String {
        match tokio::time::timeout(self.call_timeout, self.generator.generate(&prompt)).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Generation failed, continuing without content");
                String::new()
            }
            Err(_) => {
                tracing::error!(
                    timeout_secs = self.call_timeout.as_secs(),
                    "Generation timed out, continuing without content"
                );
                String::new()
            }
        }
    }

    /// Prompts the backend with `transcript` and normalizes the response(s).
    #[tracing::instrument(skip_all, fields(mode = ?self.mode()))]
    pub async fn analyze_transcript(&self, transcript: &str) -> TranscriptAnalysis {
        let prompts = self.prompt_builder();
        let mode = self.mode();

        match mode {
            InvocationMode::Combined => {
                let response = self
                    .generate_or_empty(None, prompts.combined(transcript))
                    .await;
                let normalized = normalize(&response);
                TranscriptAnalysis {
                    mode,
                    strategy: Some(normalized.strategy),
                    analysis: normalized.result,
                }
            }
            InvocationMode::PerSection => {
                let [summary, takeaways, hashtags, thread] =
                    Section::ALL.map(|section| prompts.section(section, transcript));

                let (summary, takeaways, hashtags, thread) = futures::join!(
                    self.generate_or_empty(Some(Section::Summary), summary),
                    self.generate_or_empty(Some(Section::Takeaways), takeaways),
                    self.generate_or_empty(Some(Section::Hashtags), hashtags),
                    self.generate_or_empty(Some(Section::Thread), thread),
                );

                TranscriptAnalysis {
                    mode,
                    strategy: None,
                    analysis: parse_sections(&summary, &takeaways, &hashtags, &thread),
                }
            }
        }
    }

    /// Metadata for `video_id`, or placeholder metadata when the lookup fails
    #[tracing::instrument(skip(self))]
    async fn metadata_or_fallback(&self, video_id: &str) -> VideoMetadata {
        match self.metadata_source.fetch_metadata(video_id).await {
            Ok(metadata) => metadata,
            Err(e) => {
                let fallback = VideoMetadata::fallback(video_id);
                tracing::warn!(error = ?e, ?fallback, "Failed to fetch video metadata, using fallback");
                fallback
            }
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn analyze(&self, url: &str) -> anyhow::Result<VideoAnalysis> {
        let video_id = extract_video_id(url)?;

        let transcript = self
            .transcript_source
            .fetch_transcript(&video_id)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to fetch transcript"))
            .context("Failed to fetch transcript")?;
        if transcript.trim().is_empty() {
            return Err(Error::TranscriptUnavailable(video_id).into());
        }
        tracing::info!(chars = transcript.chars().count(), "Fetched transcript");

        let metadata = self.metadata_or_fallback(&video_id).await;
        let outcome = self.analyze_transcript(&transcript).await;

        Ok(VideoAnalysis {
            video_id,
            metadata,
            outcome,
        })
    }
}
