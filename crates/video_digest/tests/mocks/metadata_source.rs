use std::sync::{Arc, Mutex};
use video_digest::{yt::MetadataSource, VideoMetadata};

#[derive(Clone)]
pub struct MockMetadataSource {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockMetadataSource {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

impl MetadataSource for MockMetadataSource {
    async fn fetch_metadata(&self, video_id: &str) -> anyhow::Result<VideoMetadata> {
        self.calls.lock().unwrap().push(video_id.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(VideoMetadata {
            title: Some(format!("Video {video_id}")),
            channel_name: Some("Mock Channel".into()),
            channel_url: Some("https://www.youtube.com/@mock".into()),
            thumbnail_url: None,
            duration_seconds: Some(600),
            published_date: None,
        })
    }
}
