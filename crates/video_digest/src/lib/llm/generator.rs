use std::{fmt::Debug, future::Future};

use crate::prompt::InvocationMode;

/// A text-generation backend: `generate(prompt) -> text`.
pub trait Generator {
    /// Invocation mode used when the caller does not choose one
    const DEFAULT_MODE: InvocationMode;
    /// Transcripts longer than this many characters are cut before prompting
    const MAX_TRANSCRIPT_CHARS: Option<usize> = None;
    /// Backend name used in logs
    const BACKEND: &'static str;

    type Error: Debug + std::fmt::Display;

    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, Self::Error>>;
}

impl<G: Generator> Generator for &G {
    const DEFAULT_MODE: InvocationMode = G::DEFAULT_MODE;
    const MAX_TRANSCRIPT_CHARS: Option<usize> = G::MAX_TRANSCRIPT_CHARS;
    const BACKEND: &'static str = G::BACKEND;

    type Error = G::Error;

    async fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        (**self).generate(prompt).await
    }
}
