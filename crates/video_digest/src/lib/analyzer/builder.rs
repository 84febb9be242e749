use std::time::Duration;

use super::DEFAULT_CALL_TIMEOUT;
use crate::{
    prompt::InvocationMode,
    yt::{MetadataSource, TranscriptSource},
    Generator, VideoAnalyzer,
};

pub struct VideoAnalyzerBuilder<G = (), T = (), M = ()> {
    generator: G,
    transcript_source: T,
    metadata_source: M,
    mode: Option<InvocationMode>,
    call_timeout: Duration,
}

impl Default for VideoAnalyzerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoAnalyzerBuilder {
    pub fn new() -> Self {
        Self {
            generator: (),
            transcript_source: (),
            metadata_source: (),
            mode: None,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}

impl<G, T, M> VideoAnalyzerBuilder<G, T, M> {
    pub fn generator<G2: Generator>(self, generator: G2) -> VideoAnalyzerBuilder<G2, T, M> {
        VideoAnalyzerBuilder {
            generator,
            transcript_source: self.transcript_source,
            metadata_source: self.metadata_source,
            mode: self.mode,
            call_timeout: self.call_timeout,
        }
    }

    pub fn transcript_source<T2: TranscriptSource>(
        self,
        transcript_source: T2,
    ) -> VideoAnalyzerBuilder<G, T2, M> {
        VideoAnalyzerBuilder {
            generator: self.generator,
            transcript_source,
            metadata_source: self.metadata_source,
            mode: self.mode,
            call_timeout: self.call_timeout,
        }
    }

    pub fn metadata_source<M2: MetadataSource>(
        self,
        metadata_source: M2,
    ) -> VideoAnalyzerBuilder<G, T, M2> {
        VideoAnalyzerBuilder {
            generator: self.generator,
            transcript_source: self.transcript_source,
            metadata_source,
            mode: self.mode,
            call_timeout: self.call_timeout,
        }
    }

    /// Overrides the backend's default [`InvocationMode`]
    pub fn mode(mut self, mode: InvocationMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Upper bound for a single generation call
    pub fn call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }
}

impl<G, T, M> VideoAnalyzerBuilder<G, T, M>
where
    G: Generator,
    T: TranscriptSource,
    M: MetadataSource,
{
    pub fn build(self) -> VideoAnalyzer<G, T, M> {
        VideoAnalyzer {
            generator: self.generator,
            transcript_source: self.transcript_source,
            metadata_source: self.metadata_source,
            mode: self.mode,
            call_timeout: self.call_timeout,
        }
    }
}
