use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One upstream extractor output file, as saved next to the scanned image.
///
/// The extractor writes one JSON file per processed image. Only
/// `parsed_response` matters to the transform; the remaining fields are
/// provenance from the extraction run. Every field is optional because
/// failed extractions save a reduced shape with just an `error`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionDocument {
    pub source_dir: Option<String>,
    pub filename: Option<String>,
    pub image_path: Option<String>,
    pub response_text: Option<String>,
    pub parsed_response: Option<Value>,
    pub error: Option<String>,
}

/// An [`ExtractionDocument`] paired with the corpus file name it was
/// loaded from. The file name is the source identifier carried into every
/// [`crate::EmailRecord`] derived from the document.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub source_id: String,
    pub extraction: ExtractionDocument,
}

impl SourceDocument {
    pub fn new(source_id: impl Into<String>, extraction: ExtractionDocument) -> Self {
        Self {
            source_id: source_id.into(),
            extraction,
        }
    }
}
