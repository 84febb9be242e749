pub mod analyzer;
mod error;
mod llm;
pub mod parser;
pub mod prompt;
pub mod tracing;
pub mod types;
pub mod yt;

pub use analyzer::{builder::VideoAnalyzerBuilder, TranscriptAnalysis, VideoAnalysis, VideoAnalyzer};
pub use error::Error;
pub use llm::{generator::Generator, ollama, openai};
pub use parser::{normalize, parse_response, parse_sections, Normalized, ParseStrategy};
pub use prompt::{build_prompt, InvocationMode};
pub use types::{AnalysisResult, VideoMetadata};
