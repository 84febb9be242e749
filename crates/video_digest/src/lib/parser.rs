//! # Response Parser
//!
//! Turns the loosely structured text returned by a generation backend into an
//! [`AnalysisResult`]. The parser never fails: any input, including an empty
//! string, produces a valid (possibly empty) result.
//!
//! Strategies are tried in order and the first one that yields content wins:
//!
//! 1. [`ParseStrategy::Structured`]: the response is a JSON object
//! 2. [`ParseStrategy::HeaderAnchored`]: sections are delimited by the
//!    `Short Summary:` / `Detailed Takeaways:` / `Hashtags:` / `Twitter Thread:`
//!    headers the combined prompt asks for
//! 3. [`ParseStrategy::Generic`]: paragraphs are used as summary and takeaways
//! 4. [`ParseStrategy::Verbatim`]: the whole response becomes the summary

pub mod cleaner;
pub mod extractor;
pub mod splitter;

use std::{borrow::Cow, sync::LazyLock};

use regex::Regex;
use serde::Serialize;

use crate::types::{AnalysisResult, Section};

pub use cleaner::clean;
pub use splitter::split;

static THINK_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think(?:ing)?>.*?</think(?:ing)?>").unwrap());

static CODE_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\A```[A-Za-z0-9_-]*[ \t]*\n(.*?)\n?```\z").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStrategy {
    Structured,
    HeaderAnchored,
    Generic,
    Verbatim,
}

/// Content located for one section, before cleaning and capping
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block<'a> {
    /// A span of free text still to be split into elements
    Text(Cow<'a, str>),
    /// Elements that were already separated by the strategy that found them
    Items(Vec<String>),
}

impl<'a> Block<'a> {
    pub fn text(text: impl Into<Cow<'a, str>>) -> Self {
        Block::Text(text.into())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections<'a> {
    pub summary: Option<Block<'a>>,
    pub takeaways: Option<Block<'a>>,
    pub hashtags: Option<Block<'a>>,
    pub thread: Option<Block<'a>>,
}

impl<'a> Sections<'a> {
    pub fn get(&self, section: Section) -> Option<&Block<'a>> {
        match section {
            Section::Summary => self.summary.as_ref(),
            Section::Takeaways => self.takeaways.as_ref(),
            Section::Hashtags => self.hashtags.as_ref(),
            Section::Thread => self.thread.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, section: Section) -> &mut Option<Block<'a>> {
        match section {
            Section::Summary => &mut self.summary,
            Section::Takeaways => &mut self.takeaways,
            Section::Hashtags => &mut self.hashtags,
            Section::Thread => &mut self.thread,
        }
    }

    pub fn is_empty(&self) -> bool {
        Section::ALL.iter().all(|s| self.get(*s).is_none())
    }
}

/// Output of [`split`]: the located sections and the strategy that found them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitResponse<'a> {
    pub strategy: ParseStrategy,
    pub sections: Sections<'a>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Normalized {
    pub strategy: ParseStrategy,
    pub result: AnalysisResult,
}

/// Removes reasoning blocks and an enclosing markdown code fence.
pub fn preprocess(response: &str) -> String {
    let text = response.replace("\r\n", "\n");
    let text = THINK_BLOCK_RE.replace_all(&text, "");
    let trimmed = text.trim();

    match CODE_FENCE_RE.captures(trimmed).and_then(|caps| caps.get(1)) {
        Some(inner) => inner.as_str().trim().to_string(),
        None => trimmed.to_string(),
    }
}

/// Normalizes a combined response, reporting the strategy that produced it.
pub fn normalize(response: &str) -> Normalized {
    let text = preprocess(response);
    let SplitResponse { strategy, sections } = split(&text);
    let result = extractor::extract(sections);

    if result.is_empty() {
        tracing::debug!("No section could be extracted, using the response verbatim");
        return Normalized {
            strategy: ParseStrategy::Verbatim,
            result: AnalysisResult {
                summary: response.trim().to_string(),
                ..Default::default()
            },
        };
    }

    tracing::debug!(?strategy, "Normalized generated response");
    Normalized { strategy, result }
}

/// Normalizes a combined response into an [`AnalysisResult`].
pub fn parse_response(response: &str) -> AnalysisResult {
    normalize(response).result
}

/// Normalizes the four independent responses produced by per-section prompting.
///
/// A failed or empty generation is passed as `""` and leaves its field empty.
pub fn parse_sections(summary: &str, takeaways: &str, hashtags: &str, thread: &str) -> AnalysisResult {
    let summary = preprocess(summary);
    let takeaways = preprocess(takeaways);
    let hashtags = preprocess(hashtags);
    let thread = preprocess(thread);

    let sections = Sections {
        summary: Some(Block::text(summary.as_str())),
        takeaways: Some(Block::text(takeaways.as_str())),
        hashtags: Some(Block::text(hashtags.as_str())),
        thread: Some(Block::text(thread.as_str())),
    };

    extractor::extract(sections)
}
