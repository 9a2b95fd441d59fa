use serde::{Deserialize, Serialize};

/// Corpus-wide statistics report, independent of the contact index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusAnalysis {
    pub stats: AnalysisStats,
    pub overall_date_range: DateRange,
    pub senders: Vec<PartyActivity>,
    pub receivers: Vec<PartyActivity>,
    pub errors: Vec<FileError>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisStats {
    pub total_files: usize,
    pub valid_files: usize,
    pub invalid_files: usize,
    pub not_email_files: usize,
    pub total_emails: usize,
    pub unique_senders: usize,
    pub unique_receivers: usize,
}

/// Min/max dates in the extractor's `yyyy-mm-dd-hh-mm` rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub min: Option<String>,
    pub max: Option<String>,
}

/// Per-party activity: display string, email count, observed date span.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyActivity {
    pub name: String,
    pub count: usize,
    pub date_range: Option<DateRange>,
}

/// A document the analyzer could not use, with the reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileError {
    pub file: String,
    pub error: String,
}
