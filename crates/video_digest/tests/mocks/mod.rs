pub mod generator;
pub mod metadata_source;
pub mod transcript_source;
