pub mod analysis;
pub mod contact;
pub mod document;
pub mod email;

pub use analysis::{AnalysisStats, CorpusAnalysis, DateRange, FileError, PartyActivity};
pub use contact::{ContactBucket, ContactIndex, ContactSummary, TransformOutput, TransformStats};
pub use document::{ExtractionDocument, SourceDocument};
pub use email::{EmailRecord, RawEmail};

/// Errors surfaced by the corrdex crates.
///
/// Nothing inside the transform itself is fatal; these cover the storage
/// boundary around it.
#[derive(Debug, thiserror::Error)]
pub enum CorrdexError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
