use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use video_digest::{Generator, InvocationMode};

/// Canned reply for prompts containing `needle`; later replies take precedence
#[derive(Clone)]
pub struct Reply {
    pub needle: String,
    pub text: Result<String, String>,
    pub delay: Option<Duration>,
}

#[derive(Clone)]
pub struct MockGenerator {
    pub default_response: String,
    pub replies: Vec<Reply>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MockGenerator {
    pub fn new(default_response: &str) -> Self {
        Self {
            default_response: default_response.to_string(),
            replies: Vec::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn reply(mut self, needle: &str, text: &str) -> Self {
        self.replies.push(Reply {
            needle: needle.to_string(),
            text: Ok(text.to_string()),
            delay: None,
        });
        self
    }

    pub fn fail_on(mut self, needle: &str, msg: &str) -> Self {
        self.replies.push(Reply {
            needle: needle.to_string(),
            text: Err(msg.to_string()),
            delay: None,
        });
        self
    }

    pub fn delay_on(mut self, needle: &str, text: &str, delay: Duration) -> Self {
        self.replies.push(Reply {
            needle: needle.to_string(),
            text: Ok(text.to_string()),
            delay: Some(delay),
        });
        self
    }

    async fn respond(&self, prompt: &str) -> anyhow::Result<String> {
        self.calls.lock().unwrap().push(prompt.to_string());

        let Some(reply) = self.replies.iter().rev().find(|r| prompt.contains(&r.needle)) else {
            return Ok(self.default_response.clone());
        };
        if let Some(delay) = reply.delay {
            tokio::time::sleep(delay).await;
        }
        reply.text.clone().map_err(|msg| anyhow::anyhow!("{}", msg))
    }
}

/// Local backend: four calls per analysis, no truncation
impl Generator for MockGenerator {
    const DEFAULT_MODE: InvocationMode = InvocationMode::PerSection;
    const BACKEND: &'static str = "mock-local";
    type Error = anyhow::Error;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.respond(prompt).await
    }
}

/// Hosted backend: one call per analysis, transcript cut at 20 chars
#[derive(Clone)]
pub struct MockHostedGenerator(pub MockGenerator);

impl Generator for MockHostedGenerator {
    const DEFAULT_MODE: InvocationMode = InvocationMode::Combined;
    const MAX_TRANSCRIPT_CHARS: Option<usize> = Some(20);
    const BACKEND: &'static str = "mock-hosted";
    type Error = anyhow::Error;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.0.respond(prompt).await
    }
}
