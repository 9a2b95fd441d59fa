//! Shared-folder URL resolution for indexed records.
//!
//! The scanned images live in a shared cloud folder; browser HAR captures
//! of its listing contain `list_shared_link_folder_entries` responses that
//! map each image filename to a public href. This module extracts those
//! responses, builds the filename lookup, and annotates an existing
//! contact index with the URLs.

use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::ContactIndex;
use tracing::warn;

/// Request-URL marker of the folder-listing endpoint inside a HAR capture.
const FOLDER_ENTRIES_MARKER: &str = "list_shared_link_folder_entries";

/// Corpus file names look like `009_HOUSE_OVERSIGHT_027063.jpg.json`;
/// the shared folder knows the same document as `HOUSE_OVERSIGHT_027063.jpg`.
const SOURCE_FILE_PATTERN: &str = r"^\d+_(.+)\.json$";

/// One captured folder-listing response, kept with the request URL it
/// answered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderEntryResponse {
    pub url: String,
    pub response: Value,
}

/// Outcome counters of one annotation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    pub matched: usize,
    pub unmatched: usize,
}

/// Pull every folder-listing response out of one parsed HAR capture.
/// Entries with unrelated request URLs are ignored; a listing whose body
/// is not valid JSON is skipped with a warning.
pub fn extract_folder_entries(har: &Value) -> Vec<FolderEntryResponse> {
    let mut responses = Vec::new();

    let entries = har
        .pointer("/log/entries")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    for entry in entries {
        let Some(url) = entry.pointer("/request/url").and_then(Value::as_str) else {
            continue;
        };
        if !url.contains(FOLDER_ENTRIES_MARKER) {
            continue;
        }
        let Some(text) = entry
            .pointer("/response/content/text")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
        else {
            continue;
        };
        match serde_json::from_str::<Value>(text) {
            Ok(response) => responses.push(FolderEntryResponse {
                url: url.to_string(),
                response,
            }),
            Err(e) => warn!(url = %url, "failed to parse folder-listing body: {e}"),
        }
    }

    responses
}

/// Filename-to-href lookup assembled from captured folder listings.
#[derive(Debug, Default)]
pub struct LinkLookup {
    by_filename: HashMap<String, String>,
}

impl LinkLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a capture's responses into the lookup. Later captures win on
    /// filename collisions, matching a re-listed folder superseding an
    /// older capture.
    pub fn add_responses(&mut self, responses: &[FolderEntryResponse]) {
        for response in responses {
            let entries = response
                .response
                .pointer("/entries")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            for entry in entries {
                let filename = entry.get("filename").and_then(Value::as_str);
                let href = entry.get("href").and_then(Value::as_str);
                if let (Some(filename), Some(href)) = (filename, href) {
                    self.by_filename
                        .insert(filename.to_string(), href.to_string());
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.by_filename.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_filename.is_empty()
    }

    pub fn href_for(&self, filename: &str) -> Option<&str> {
        self.by_filename.get(filename).map(String::as_str)
    }

    /// Attach hrefs to every record whose source file resolves to a known
    /// document name. Records whose source file does not carry the
    /// numbered-prefix shape are left alone and not counted.
    pub fn annotate(&self, index: &mut ContactIndex) -> LinkStats {
        // The pattern is fixed at compile time, so this cannot fail.
        let source_pattern = Regex::new(SOURCE_FILE_PATTERN).unwrap();
        let mut stats = LinkStats::default();

        for bucket in index.values_mut() {
            for record in &mut bucket.emails {
                let Some(captures) = source_pattern.captures(&record.source_file) else {
                    continue;
                };
                let Some(document_name) = captures.get(1).map(|m| m.as_str()) else {
                    continue;
                };
                match self.href_for(document_name) {
                    Some(href) => {
                        record.document_url = Some(href.to_string());
                        stats.matched += 1;
                    }
                    None => stats.unmatched += 1,
                }
            }
        }

        stats
    }
}
