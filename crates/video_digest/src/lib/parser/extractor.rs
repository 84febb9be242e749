//! Turns located sections into the capped, cleaned fields of an [`AnalysisResult`].

use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;

use super::{cleaner, splitter, Block, Sections};
use crate::types::{AnalysisResult, Section};

static HASHTAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#\w+").unwrap());

/// Cleans every candidate, drops empty ones and keeps the first `cap`.
fn finish(section: Section, candidates: impl IntoIterator<Item = String>) -> Vec<String> {
    let cleaned = candidates
        .into_iter()
        .map(|candidate| cleaner::clean(&candidate))
        .filter(|candidate| !candidate.is_empty());

    match section.cap() {
        Some(cap) => cleaned.take(cap).collect(),
        None => cleaned.collect(),
    }
}

fn lines(text: &str) -> Vec<String> {
    text.lines().map(cleaner::strip_decoration).collect()
}

pub fn extract_summary(block: Option<Block<'_>>) -> String {
    match block {
        Some(Block::Text(text)) => cleaner::clean(text.trim()),
        Some(Block::Items(items)) => cleaner::clean(&items.iter().map(|s| s.trim()).join(" ")),
        None => String::new(),
    }
}

pub fn extract_takeaways(block: Option<Block<'_>>) -> Vec<String> {
    match block {
        Some(Block::Text(text)) => finish(Section::Takeaways, splitter::takeaway_items(&text)),
        Some(Block::Items(items)) => finish(Section::Takeaways, items),
        None => Vec::new(),
    }
}

/// `#word` tokens of the block, or one candidate per line when there are none.
///
/// Candidates without a leading `#` are discarded rather than corrected.
pub fn extract_hashtags(block: Option<Block<'_>>) -> Vec<String> {
    let candidates = match block {
        Some(Block::Text(text)) => {
            let tokens = HASHTAG_RE
                .find_iter(&text)
                .map(|m| m.as_str().to_string())
                .collect::<Vec<_>>();
            if tokens.is_empty() {
                lines(&text)
            } else {
                tokens
            }
        }
        Some(Block::Items(items)) => items,
        None => Vec::new(),
    };

    let tagged = candidates
        .into_iter()
        .map(|candidate| cleaner::clean(&candidate))
        .filter(|candidate| candidate.len() > 1 && candidate.starts_with('#'));

    finish(Section::Hashtags, tagged)
}

pub fn extract_thread(block: Option<Block<'_>>) -> Vec<String> {
    match block {
        Some(Block::Text(text)) => finish(Section::Thread, lines(&text)),
        Some(Block::Items(items)) => finish(Section::Thread, items),
        None => Vec::new(),
    }
}

pub fn extract(sections: Sections<'_>) -> AnalysisResult {
    let Sections {
        summary,
        takeaways,
        hashtags,
        thread,
    } = sections;

    AnalysisResult {
        summary: extract_summary(summary),
        key_takeaways: extract_takeaways(takeaways),
        hashtags: extract_hashtags(hashtags),
        twitter_thread: extract_thread(thread),
    }
}
