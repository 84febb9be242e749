//! Locates the four sections inside a generated response.

use std::{borrow::Cow, cmp::Reverse, sync::LazyLock};

use itertools::Itertools;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use super::{cleaner, Block, ParseStrategy, Sections, SplitResponse};
use crate::types::Section;

/// Header labels recognized for each section, most specific first.
///
/// Multi-word labels may omit the delimiter (`Short Summary The video...`);
/// single-word labels must be followed by `:`, `-` or a line break so that
/// prose starting with e.g. "Hashtags are..." is not mistaken for a header.
/// Every header also terminates the span of the header before it.
struct SectionRule {
    section: Section,
    aliases: &'static [&'static str],
}

const SECTION_RULES: &[SectionRule] = &[
    SectionRule {
        section: Section::Summary,
        aliases: &["summary"],
    },
    SectionRule {
        section: Section::Takeaways,
        aliases: &["key takeaways", "takeaways"],
    },
    SectionRule {
        section: Section::Hashtags,
        aliases: &[],
    },
    SectionRule {
        section: Section::Thread,
        aliases: &["tweet thread", "thread"],
    },
];

/// Optional markdown decoration in front of a header: `## `, `> `, `1. `, `**`
const HEADER_PREFIX: &str = r"(?im)^[ \t]*(?:#{1,6}[ \t]+|>[ \t]*|\d+[.)][ \t]*)?(?:\*\*|__)?[ \t]*";

fn header_regex(rule: &SectionRule) -> Regex {
    let alternatives = std::iter::once(rule.section.header_label())
        .chain(rule.aliases.iter().copied())
        .map(|label| {
            let words = label.split_whitespace().map(regex::escape).join(r"[ \t]+");
            if label.contains(' ') {
                format!(r"{words}\b[ \t]*(?:\*\*|__)?[ \t]*[:\-]?")
            } else {
                format!(r"{words}[ \t]*(?:\*\*|__)?[ \t]*(?:[:\-]|$)")
            }
        })
        .join("|");

    Regex::new(&format!(r"{HEADER_PREFIX}(?:{alternatives})(?:[ \t]*(?:\*\*|__))?")).unwrap()
}

static HEADER_MARKERS: LazyLock<Vec<(Section, Regex)>> = LazyLock::new(|| {
    SECTION_RULES
        .iter()
        .map(|rule| (rule.section, header_regex(rule)))
        .collect()
});

/// Tag of every [`SUBHEADING_MARKERS`] entry; all sub-heading styles are equivalent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SubHeading;

/// Sub-headings inside a takeaways block.
static SUBHEADING_MARKERS: LazyLock<Vec<(SubHeading, Regex)>> = LazyLock::new(|| {
    [
        // `**Header**`, `- **Header:** body`, `1. __Header__ - body`
        r"(?m)^[ \t]*(?:[-*•+][ \t]+|\d+[.)][ \t]+)?(?:\*\*|__)([^*_\n]+?)[ \t]*:?[ \t]*(?:\*\*|__)[ \t]*[:\-–—]?[ \t]*",
        // `### Header`
        r"(?m)^[ \t]*#{1,6}[ \t]+([^\n]+?)[ \t#]*$",
        // a capitalized label line: `Header:`
        r"(?m)^[ \t]*(?:[-•+][ \t]+|\d+[.)][ \t]+)?(\p{Lu}[^\n:]{0,80}):[ \t]*$",
    ]
    .into_iter()
    .map(|pattern| (SubHeading, Regex::new(pattern).unwrap()))
    .collect()
});

/// A line opening with bold text starts a new paragraph block
static BOLD_LEAD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*(?:[-*•+][ \t]+|\d+[.)][ \t]+)?(?:\*\*|__)").unwrap());

/// A span of text introduced by a marker, up to the next marker or end of text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Segment<'a, T> {
    pub tag: T,
    /// First capture group of the marker, or the whole marker without one
    pub heading: &'a str,
    pub body: &'a str,
}

/// Cuts `text` at every marker match.
///
/// Returns the text preceding the first marker and one segment per marker.
/// When markers overlap, the earliest (then longest) match wins.
pub(crate) fn segment<'a, T: Copy>(
    text: &'a str,
    markers: &[(T, Regex)],
) -> (&'a str, Vec<Segment<'a, T>>) {
    let mut hits = Vec::new();
    for (tag, re) in markers {
        for caps in re.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            let heading = caps.get(1).unwrap_or(whole).as_str();
            hits.push((whole.start(), whole.end(), *tag, heading));
        }
    }
    hits.sort_by_key(|&(start, end, ..)| (start, Reverse(end)));

    let mut kept: Vec<(usize, usize, T, &'a str)> = Vec::with_capacity(hits.len());
    for hit in hits {
        if kept.last().is_some_and(|last| hit.0 < last.1) {
            continue;
        }
        kept.push(hit);
    }

    let preamble = &text[..kept.first().map_or(text.len(), |hit| hit.0)];
    let ends = kept
        .iter()
        .skip(1)
        .map(|hit| hit.0)
        .chain(std::iter::once(text.len()));
    let segments = kept
        .iter()
        .zip(ends)
        .map(|(&(_, body_start, tag, heading), body_end)| Segment {
            tag,
            heading,
            body: &text[body_start..body_end],
        })
        .collect();

    (preamble, segments)
}

/// Splits a response into its sections.
///
/// Strategies, first success wins:
/// 1. the whole response is a structured payload
/// 2. header-anchored spans
/// 3. a structured payload embedded in prose, when no header was found
/// 4. paragraph blocks of the text not claimed by any header fill in a
///    missing summary or takeaways block
pub fn split(response: &str) -> SplitResponse<'_> {
    let whole = serde_json::from_str::<Value>(response).ok();
    if let Some(sections) = whole.and_then(structured) {
        return SplitResponse {
            strategy: ParseStrategy::Structured,
            sections,
        };
    }

    let (preamble, mut sections) = header_anchored(response);
    let mut strategy = ParseStrategy::HeaderAnchored;

    if sections.is_empty() {
        if let Some(sections) = embedded_object(response).and_then(structured) {
            return SplitResponse {
                strategy: ParseStrategy::Structured,
                sections,
            };
        }
    }

    if sections.summary.is_none() || sections.takeaways.is_none() {
        let (summary, takeaways) = generic(preamble);
        if sections.summary.is_none() && summary.is_some() {
            sections.summary = summary.map(Block::text);
            strategy = ParseStrategy::Generic;
        }
        if sections.takeaways.is_none() && !takeaways.is_empty() {
            sections.takeaways = Some(Block::Items(takeaways));
            strategy = ParseStrategy::Generic;
        }
    }

    SplitResponse { strategy, sections }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl From<FieldValue> for Block<'static> {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::Text(text) => Block::Text(Cow::Owned(text)),
            FieldValue::List(items) => Block::Items(items),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StructuredPayload {
    #[serde(alias = "summary")]
    short_summary: Option<FieldValue>,
    #[serde(alias = "key_takeaways", alias = "takeaways")]
    detailed_takeaways: Option<FieldValue>,
    hashtags: Option<FieldValue>,
    twitter_thread: Option<FieldValue>,
}

/// The text from the first `{` to the last `}`, parsed as JSON
fn embedded_object(text: &str) -> Option<Value> {
    let (start, end) = text.find('{').zip(text.rfind('}'))?;
    if start >= end {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

/// Reads a JSON payload keyed by `short_summary`, `detailed_takeaways`,
/// `hashtags` and `twitter_thread`.
///
/// Non-objects, payloads with none of the keys, and payloads with a key of
/// the wrong type are rejected so that the next strategy can run.
fn structured(value: Value) -> Option<Sections<'static>> {
    if !value.is_object() {
        return None;
    }
    let payload = serde_json::from_value::<StructuredPayload>(value)
        .inspect_err(|e| tracing::debug!(error = %e, "Malformed structured payload"))
        .ok()?;

    let sections = Sections {
        summary: payload.short_summary.map(Block::from),
        takeaways: payload.detailed_takeaways.map(Block::from),
        hashtags: payload.hashtags.map(Block::from),
        thread: payload.twitter_thread.map(Block::from),
    };

    (!sections.is_empty()).then_some(sections)
}

/// Captures the text after each recognized header up to the next header of
/// another section.
///
/// A header repeated right below its own section (`Summary:` under
/// `Short Summary:`) continues the span. Sections whose span is empty stay
/// unset, so a later header for the same section can still fill them; once
/// a section has content, later spans for it are ignored.
fn header_anchored(text: &str) -> (&str, Sections<'_>) {
    let (preamble, segments) = segment(text, &HEADER_MARKERS);

    let mut sections = Sections::default();
    let runs = segments.iter().chunk_by(|segment| segment.tag);
    for (tag, run) in &runs {
        let bodies = run
            .map(|segment| segment.body.trim())
            .filter(|body| !body.is_empty())
            .collect::<Vec<_>>();
        let block = match bodies.as_slice() {
            [] => continue,
            [body] => Block::text(*body),
            bodies => Block::text(bodies.join("\n")),
        };

        let slot = sections.slot_mut(tag);
        if slot.is_none() {
            *slot = Some(block);
        }
    }

    (preamble, sections)
}

/// Splits text into paragraph blocks: at blank lines and before every line
/// that opens with bold text.
fn paragraph_blocks(text: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut start: Option<usize> = None;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        let blank = line.trim().is_empty();
        if blank || BOLD_LEAD_RE.is_match(line) {
            if let Some(block_start) = start.take() {
                blocks.push(&text[block_start..line_start]);
            }
        }
        if !blank {
            start.get_or_insert(line_start);
        }
    }
    if let Some(block_start) = start {
        blocks.push(&text[block_start..]);
    }

    blocks
        .into_iter()
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .collect()
}

/// First paragraph block as summary, each later block as takeaway(s).
fn generic(text: &str) -> (Option<&str>, Vec<String>) {
    let mut blocks = paragraph_blocks(text).into_iter();
    let summary = blocks.next();

    let takeaways = blocks
        .flat_map(|block| {
            let items = subheading_items(block);
            if items.is_empty() {
                vec![collapse(block)]
            } else {
                items
            }
        })
        .filter(|item| !item.is_empty())
        .collect();

    (summary, takeaways)
}

/// Joins the non-empty lines of a body with single spaces.
fn collapse(body: &str) -> String {
    body.lines()
        .map(cleaner::strip_decoration)
        .filter(|line| !line.is_empty())
        .join(" ")
}

/// `"<header>: <body>"` for every sub-heading followed by body text.
///
/// Sub-headings that are only boilerplate ("Here are the key takeaways:")
/// are not counted.
fn subheading_items(block: &str) -> Vec<String> {
    let (_, segments) = segment(block, &SUBHEADING_MARKERS);

    segments
        .into_iter()
        .filter_map(|Segment { heading, body, .. }| {
            let heading = heading.trim().trim_end_matches(':').trim();
            if cleaner::clean(&format!("{heading}:")).is_empty() {
                return None;
            }
            let body = collapse(body);
            (!heading.is_empty() && !body.is_empty()).then(|| format!("{heading}: {body}"))
        })
        .collect()
}

/// Splits a takeaways block into candidate takeaways.
///
/// Sub-heading segmentation takes precedence; only when it finds no
/// header-with-body pair is the block split into one candidate per line.
pub fn takeaway_items(block: &str) -> Vec<String> {
    let items = subheading_items(block);
    if !items.is_empty() {
        return items;
    }

    block
        .lines()
        .map(cleaner::strip_decoration)
        .filter(|line| !line.is_empty())
        .collect()
}
