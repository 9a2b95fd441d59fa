//! Loading the extraction corpus from local storage.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use shared_types::{CorrdexError, ExtractionDocument, SourceDocument};
use tracing::warn;

/// Load every `.json` document in the corpus directory, sorted by file
/// name so reruns see the same order.
///
/// A document that fails to parse still yields a [`SourceDocument`] with
/// an empty payload and the decode error recorded, so downstream passes
/// can count it instead of the run aborting. Only the directory read
/// itself is fatal.
pub fn load_corpus(dir: &Path) -> Result<Vec<SourceDocument>, CorrdexError> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.ends_with(".json") && entry.file_type()?.is_file() {
            names.push(name);
        }
    }
    names.sort();

    let mut documents = Vec::with_capacity(names.len());
    for name in names {
        let raw = fs::read_to_string(dir.join(&name))?;

        let extraction = match serde_json::from_str::<ExtractionDocument>(&raw) {
            Ok(extraction) => extraction,
            Err(e) => {
                warn!(file = %name, "skipping malformed document: {e}");
                ExtractionDocument {
                    error: Some(format!("JSONDecodeError: {e}")),
                    ..Default::default()
                }
            }
        };

        documents.push(SourceDocument::new(name, extraction));
    }

    Ok(documents)
}

/// Read and parse one JSON file. Unlike per-document corpus loading this
/// is strict: callers use it for files the run cannot proceed without.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, CorrdexError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
