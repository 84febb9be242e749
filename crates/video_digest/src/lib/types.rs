use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The normalized output of a single video analysis
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub key_takeaways: Vec<String>,
    pub hashtags: Vec<String>,
    pub twitter_thread: Vec<String>,
}

impl AnalysisResult {
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty()
            && self.key_takeaways.is_empty()
            && self.hashtags.is_empty()
            && self.twitter_thread.is_empty()
    }
}

/// The four logical sections requested from a generation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Summary,
    Takeaways,
    Hashtags,
    Thread,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Summary,
        Section::Takeaways,
        Section::Hashtags,
        Section::Thread,
    ];

    /// Exact header label the combined prompt asks for, without the trailing colon.
    pub const fn header_label(self) -> &'static str {
        match self {
            Section::Summary => "Short Summary",
            Section::Takeaways => "Detailed Takeaways",
            Section::Hashtags => "Hashtags",
            Section::Thread => "Twitter Thread",
        }
    }

    /// Maximum number of elements kept for list sections.
    pub const fn cap(self) -> Option<usize> {
        match self {
            Section::Summary => None,
            Section::Takeaways => Some(5),
            Section::Hashtags => Some(5),
            Section::Thread => Some(3),
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Section::Summary => "summary",
            Section::Takeaways => "takeaways",
            Section::Hashtags => "hashtags",
            Section::Thread => "thread",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: Option<String>,
    pub channel_name: Option<String>,
    pub channel_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub duration_seconds: Option<u64>,
    pub published_date: Option<NaiveDate>,
}

impl VideoMetadata {
    /// Placeholder metadata used when the watch page could not be read
    pub fn fallback(video_id: &str) -> Self {
        VideoMetadata {
            title: Some(format!("YouTube Video (ID: {video_id})")),
            channel_name: Some("Unknown Channel".into()),
            channel_url: None,
            thumbnail_url: Some(format!(
                "https://img.youtube.com/vi/{video_id}/hqdefault.jpg"
            )),
            duration_seconds: None,
            published_date: None,
        }
    }
}

// ─── ytInitialPlayerResponse ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    pub video_details: Option<VideoDetails>,
    pub microformat: Option<Microformat>,
    pub captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetails {
    pub video_id: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub channel_id: Option<String>,
    pub length_seconds: Option<String>,
    pub thumbnail: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
pub struct Thumbnails {
    pub thumbnails: Vec<Thumbnail>,
}

#[derive(Debug, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Microformat {
    pub player_microformat_renderer: Option<PlayerMicroformatRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerMicroformatRenderer {
    pub owner_profile_url: Option<String>,
    pub publish_date: Option<String>,
    pub upload_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Captions {
    pub player_captions_tracklist_renderer: Option<CaptionTracklist>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTracklist {
    #[serde(default)]
    pub caption_tracks: Vec<CaptionTrack>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,
    pub language_code: String,
    /// `"asr"` for auto-generated tracks
    pub kind: Option<String>,
}

/// Timed-text payload returned for `fmt=json3`
#[derive(Debug, Deserialize)]
pub struct TimedText {
    #[serde(default)]
    pub events: Vec<TimedTextEvent>,
}

#[derive(Debug, Deserialize)]
pub struct TimedTextEvent {
    #[serde(default)]
    pub segs: Vec<TimedTextSegment>,
}

#[derive(Debug, Deserialize)]
pub struct TimedTextSegment {
    #[serde(default)]
    pub utf8: String,
}
