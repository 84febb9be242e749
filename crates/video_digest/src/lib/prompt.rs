//! Instruction text sent to the generation backend.
//!
//! The combined prompt names every section by [`Section::header_label`], the
//! same labels the response splitter anchors on.

use itertools::Itertools;
use serde::Serialize;

use crate::types::Section;

/// How many generation calls are issued per analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum InvocationMode {
    /// One prompt asking for all four sections
    Combined,
    /// Four independent prompts, one per section
    PerSection,
}

#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    max_transcript_chars: Option<usize>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_transcript_chars(mut self, max_chars: Option<usize>) -> Self {
        self.max_transcript_chars = max_chars;
        self
    }

    /// The transcript cut to at most `max_transcript_chars` characters
    pub fn transcript<'a>(&self, transcript: &'a str) -> &'a str {
        let Some(max_chars) = self.max_transcript_chars else {
            return transcript;
        };
        transcript
            .char_indices()
            .nth(max_chars)
            .map_or(transcript, |(idx, _)| &transcript[..idx])
    }

    const fn section_instruction(section: Section) -> &'static str {
        match section {
            Section::Summary => "2-3 sentences summarizing the video.",
            Section::Takeaways => {
                "For each main topic or section, provide a bolded section header and a detailed paragraph."
            }
            Section::Hashtags => "List exactly 5 relevant hashtags.",
            Section::Thread => "Write exactly 3 tweets, each on a new line, as if for Twitter.",
        }
    }

    /// A single prompt requesting all four sections under fixed headers.
    pub fn combined(&self, transcript: &str) -> String {
        let headers = Section::ALL
            .iter()
            .map(|section| format!("{}:", section.header_label()))
            .join("\n");
        let instructions = Section::ALL
            .iter()
            .map(|section| {
                format!(
                    "- {}: {}",
                    section.header_label(),
                    Self::section_instruction(*section)
                )
            })
            .join("\n");

        format!(
            "Given the following YouTube video transcript, generate the following sections in plain text. \
             Use these exact section headers, in this order, and nothing else:\n\
             {headers}\n\
             {instructions}\n\
             Transcript: {}",
            self.transcript(transcript)
        )
    }

    /// A minimal prompt requesting only `section`.
    pub fn section(&self, section: Section, transcript: &str) -> String {
        let task = match section {
            Section::Summary => {
                "Summarize the following YouTube video transcript in 2-3 sentences. \
                 Do not preface with any phrase, just give the summary."
            }
            Section::Takeaways => {
                "List 5 detailed key takeaways from the following YouTube video transcript. \
                 Do not preface with any phrase, just list them as bullet points."
            }
            Section::Hashtags => {
                "Generate 5 relevant hashtags for the following YouTube video transcript. \
                 Only output the hashtags separated by spaces."
            }
            Section::Thread => {
                "Write a 3-tweet Twitter thread summarizing the following YouTube video transcript. \
                 Only output the tweets, one per line, no preface."
            }
        };

        format!("{task}\nTranscript: {}", self.transcript(transcript))
    }
}

/// The combined prompt for `transcript`, without truncation.
pub fn build_prompt(transcript: &str) -> String {
    PromptBuilder::new().combined(transcript)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{normalize, ParseStrategy};

    #[test]
    fn test_combined_prompt_lists_headers_in_order() {
        let prompt = build_prompt("the transcript");

        let positions = ["Short Summary:", "Detailed Takeaways:", "Hashtags:", "Twitter Thread:"]
            .map(|header| prompt.find(header).expect("header missing from prompt"));
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        assert!(prompt.contains("exactly 5 relevant hashtags"));
        assert!(prompt.contains("exactly 3 tweets"));
        assert!(prompt.ends_with("Transcript: the transcript"));
    }

    #[test]
    fn test_combined_prompt_headers_are_understood_by_the_parser() {
        let response = Section::ALL
            .iter()
            .map(|section| format!("{}:\n#{} value", section.header_label(), section))
            .join("\n");

        let normalized = normalize(&response);
        assert_eq!(normalized.strategy, ParseStrategy::HeaderAnchored);
        assert_eq!(normalized.result.summary, "#summary value");
        assert_eq!(normalized.result.hashtags, vec!["#hashtags"]);
        assert_eq!(normalized.result.twitter_thread, vec!["#thread value"]);
    }

    #[test]
    fn test_section_prompts_are_distinct() {
        let builder = PromptBuilder::new();
        let prompts = Section::ALL.map(|section| builder.section(section, "t"));

        assert!(prompts.iter().all(|p| p.ends_with("Transcript: t")));
        assert!(prompts[2].contains("hashtags"));
        assert_eq!(prompts.iter().unique().count(), 4);
    }

    #[test]
    fn test_transcript_truncation_respects_char_boundaries() {
        let builder = PromptBuilder::new().max_transcript_chars(Some(3));
        assert_eq!(builder.transcript("héllo"), "hél");
        assert_eq!(builder.transcript("hé"), "hé");
        assert_eq!(PromptBuilder::new().transcript("héllo"), "héllo");
    }
}
