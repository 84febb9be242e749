//! # Watch Page Parser
//!
//! Extracts the inline `ytInitialPlayerResponse` object from a YouTube watch
//! page and reads video metadata and caption tracks from it.

use std::{ops::Deref, sync::LazyLock};

use chrono::NaiveDate;
use itertools::Itertools;
use regex::Regex;
use serde::de::DeserializeOwned;

use crate::{
    error::Error,
    types::{CaptionTrack, PlayerResponse, TimedText, VideoMetadata},
};

static YT_PLAYER_RESPONSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)var\s+ytInitialPlayerResponse\s*=\s*(\{.*?\});\s*(?:var\s|</script>)",
    )
    .unwrap()
});

pub struct WatchPageDocument(String);

impl Deref for WatchPageDocument {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl WatchPageDocument {
    pub fn new(doc: String) -> Self {
        WatchPageDocument(doc)
    }

    pub fn to_json<T>(&self) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        YT_PLAYER_RESPONSE_RE
            .captures(self)
            .and_then(|cap| cap.get(1))
            .and_then(|m| serde_json::from_str(m.as_str()).ok())
            .ok_or(Error::ParseError(
                "Failed to extract ytInitialPlayerResponse from the page's script tag",
            ))
    }

    pub fn player_response(&self) -> Result<PlayerResponse, Error> {
        self.to_json::<PlayerResponse>()
    }
}

impl From<String> for WatchPageDocument {
    fn from(value: String) -> Self {
        WatchPageDocument(value)
    }
}

/// Accepts `YYYY-MM-DD` with or without a trailing time component.
fn parse_publish_date(date: &str) -> Option<NaiveDate> {
    date.get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
}

/// Builds [`VideoMetadata`] from the player response.
#[tracing::instrument(skip_all)]
pub fn parse_metadata(player: &PlayerResponse) -> Result<VideoMetadata, Error> {
    let details = player
        .video_details
        .as_ref()
        .ok_or(Error::ParseError("No value found for 'videoDetails'"))?;
    let microformat = player
        .microformat
        .as_ref()
        .and_then(|m| m.player_microformat_renderer.as_ref());

    let thumbnail_url = details
        .thumbnail
        .as_ref()
        .and_then(|t| t.thumbnails.iter().max_by_key(|thumb| thumb.width.unwrap_or(0)))
        .map(|thumb| thumb.url.clone())
        .or_else(|| {
            Some(format!(
                "https://img.youtube.com/vi/{}/hqdefault.jpg",
                details.video_id
            ))
        });

    let channel_url = microformat
        .and_then(|m| m.owner_profile_url.clone())
        .or_else(|| {
            details
                .channel_id
                .as_ref()
                .map(|id| format!("https://www.youtube.com/channel/{id}"))
        });

    let published_date = microformat
        .and_then(|m| m.publish_date.as_deref().or(m.upload_date.as_deref()))
        .and_then(parse_publish_date);

    Ok(VideoMetadata {
        title: details.title.clone(),
        channel_name: details.author.clone(),
        channel_url,
        thumbnail_url,
        duration_seconds: details
            .length_seconds
            .as_deref()
            .and_then(|secs| secs.parse().ok()),
        published_date,
    })
}

/// Picks the caption track to transcribe from.
///
/// Manual English tracks win over auto-generated English ones, which win over
/// the first track in any language.
pub fn select_caption_track(player: &PlayerResponse) -> Option<&CaptionTrack> {
    let tracks = &player
        .captions
        .as_ref()?
        .player_captions_tracklist_renderer
        .as_ref()?
        .caption_tracks;

    let is_english = |track: &&CaptionTrack| track.language_code.starts_with("en");
    let is_manual = |track: &&CaptionTrack| track.kind.as_deref() != Some("asr");

    tracks
        .iter()
        .filter(is_english)
        .find(is_manual)
        .or_else(|| tracks.iter().find(is_english))
        .or_else(|| tracks.first())
}

/// Joins timed-text segments into a single whitespace-normalized string.
pub fn transcript_from_timed_text(timed_text: &TimedText) -> String {
    timed_text
        .events
        .iter()
        .flat_map(|event| event.segs.iter())
        .flat_map(|seg| seg.utf8.split_whitespace())
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    const WATCH_PAGE: &str = r#"
        <html>
            <head>
                <script nonce="gZTn8MILMQFuWon1rDk2VA">
                    var ytInitialPlayerResponse = {
                        "videoDetails": {
                            "videoId": "dQw4w9WgXcQ",
                            "title": "Rust in 100 Seconds",
                            "author": "Fireship",
                            "channelId": "UCsBjURrPoezykLs9EqgamOA",
                            "lengthSeconds": "149",
                            "thumbnail": {"thumbnails": [
                                {"url": "https://i.ytimg.com/small.jpg", "width": 120, "height": 90},
                                {"url": "https://i.ytimg.com/large.jpg", "width": 1920, "height": 1080}
                            ]}
                        },
                        "microformat": {"playerMicroformatRenderer": {
                            "ownerProfileUrl": "http://www.youtube.com/@Fireship",
                            "publishDate": "2021-09-20T08:00:10-07:00"
                        }},
                        "captions": {"playerCaptionsTracklistRenderer": {"captionTracks": [
                            {"baseUrl": "https://www.youtube.com/api/timedtext?lang=de", "languageCode": "de"},
                            {"baseUrl": "https://www.youtube.com/api/timedtext?lang=en&kind=asr", "languageCode": "en", "kind": "asr"},
                            {"baseUrl": "https://www.youtube.com/api/timedtext?lang=en-GB", "languageCode": "en-GB"}
                        ]}}
                    };var meta = document.createElement('meta');
                </script>
            </head>
        </html>
    "#;

    #[test]
    fn test_successful_extraction() {
        let html = r#"
            <script nonce="gZTn8MILMQFuWon1rDk2VA">
                var ytInitialPlayerResponse = {"key": "value", "number": 42};
            </script>
        "#;

        let doc = WatchPageDocument::from(html.to_string());
        let result = doc.to_json::<Value>();
        assert!(result.is_ok(), "Failed to extract JSON: {:?}", result.err());
        assert_eq!(result.unwrap(), json!({"key": "value", "number": 42}));
    }

    #[test]
    fn test_extraction_with_no_data() {
        let doc = WatchPageDocument::from("<html><body>nothing</body></html>".to_string());
        let result = doc.to_json::<Value>();
        assert!(matches!(result, Err(Error::ParseError(_))));
    }

    #[test]
    fn test_extraction_with_invalid_json() {
        let html = r#"
            <script>
                var ytInitialPlayerResponse = {invalid: json};
            </script>
        "#;

        let doc = WatchPageDocument::from(html.to_string());
        assert!(matches!(doc.to_json::<Value>(), Err(Error::ParseError(_))));
    }

    #[test]
    fn test_parse_metadata_from_watch_page() {
        let doc = WatchPageDocument::new(WATCH_PAGE.to_string());
        let player = doc.player_response().expect("Failed to parse player response");
        let metadata = parse_metadata(&player).expect("Failed to parse metadata");

        assert_eq!(metadata.title.as_deref(), Some("Rust in 100 Seconds"));
        assert_eq!(metadata.channel_name.as_deref(), Some("Fireship"));
        assert_eq!(
            metadata.channel_url.as_deref(),
            Some("http://www.youtube.com/@Fireship")
        );
        assert_eq!(
            metadata.thumbnail_url.as_deref(),
            Some("https://i.ytimg.com/large.jpg")
        );
        assert_eq!(metadata.duration_seconds, Some(149));
        assert_eq!(metadata.published_date, NaiveDate::from_ymd_opt(2021, 9, 20));
    }

    #[test]
    fn test_parse_metadata_requires_video_details() {
        let player = serde_json::from_value::<PlayerResponse>(json!({})).unwrap();
        assert!(matches!(parse_metadata(&player), Err(Error::ParseError(_))));
    }

    #[test]
    fn test_select_caption_track_prefers_manual_english() {
        let doc = WatchPageDocument::new(WATCH_PAGE.to_string());
        let player = doc.player_response().unwrap();
        let track = select_caption_track(&player).expect("Expected a caption track");
        assert_eq!(track.language_code, "en-GB");
    }

    #[test]
    fn test_select_caption_track_falls_back_to_any_language() {
        let player = serde_json::from_value::<PlayerResponse>(json!({
            "captions": {"playerCaptionsTracklistRenderer": {"captionTracks": [
                {"baseUrl": "https://example.com/fr", "languageCode": "fr"}
            ]}}
        }))
        .unwrap();
        assert_eq!(select_caption_track(&player).unwrap().language_code, "fr");

        let no_captions = serde_json::from_value::<PlayerResponse>(json!({})).unwrap();
        assert!(select_caption_track(&no_captions).is_none());
    }

    #[test]
    fn test_transcript_from_timed_text() {
        let timed_text = serde_json::from_value::<TimedText>(json!({
            "events": [
                {"tStartMs": 0},
                {"segs": [{"utf8": "hello "}, {"utf8": " world"}]},
                {"segs": [{"utf8": "\n"}]},
                {"segs": [{"utf8": "again\nand again"}]}
            ]
        }))
        .unwrap();

        assert_eq!(
            transcript_from_timed_text(&timed_text),
            "hello world again and again"
        );
    }
}
