//! Corpus-wide sender/receiver statistics, independent of the contact
//! index. A read-only pass over the same per-document extraction files.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde_json::Value;
use shared_types::{
    AnalysisStats, CorpusAnalysis, DateRange, FileError, RawEmail, SourceDocument,
};

use crate::normalize::{is_truthy, value_to_text};
use crate::record::parse_date;

/// Reported per-file errors are capped so one bad batch cannot swamp the
/// report.
const MAX_REPORTED_ERRORS: usize = 50;

#[derive(Debug, Default)]
struct PartyCounter {
    count: usize,
    dates: Vec<NaiveDateTime>,
}

/// Accumulates activity counters over the corpus; [`CorpusAnalyzer::finish`]
/// emits the report.
#[derive(Debug, Default)]
pub struct CorpusAnalyzer {
    senders: HashMap<String, PartyCounter>,
    receivers: HashMap<String, PartyCounter>,
    all_dates: Vec<NaiveDateTime>,
    stats: AnalysisStats,
    errors: Vec<FileError>,
}

impl CorpusAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_document(&mut self, document: &SourceDocument) {
        self.stats.total_files += 1;

        let Some(parsed) = document
            .extraction
            .parsed_response
            .as_ref()
            .filter(|v| is_truthy(v))
        else {
            self.record_error(document, "no parsed_response");
            return;
        };

        if let Value::Object(map) = parsed {
            if map.get("notEmail").is_some_and(is_truthy) {
                self.stats.not_email_files += 1;
                return;
            }
        }

        let items: Vec<&Value> = match parsed {
            Value::Object(_) => vec![parsed],
            Value::Array(items) => items.iter().collect(),
            _ => {
                self.record_error(document, "parsed_response is not a list or object");
                return;
            }
        };

        self.stats.valid_files += 1;

        for item in items {
            if !item.is_object() {
                continue;
            }
            let Ok(raw) = serde_json::from_value::<RawEmail>(item.clone()) else {
                continue;
            };
            self.process_email(&raw);
        }
    }

    fn process_email(&mut self, raw: &RawEmail) {
        self.stats.total_emails += 1;

        let sender = party_display(
            raw.sender.as_ref(),
            raw.sender_guess.as_ref(),
            raw.sender_email.as_ref(),
        );
        let receiver = party_display(
            raw.receiver.as_ref(),
            raw.receiver_guess.as_ref(),
            raw.receiver_email.as_ref(),
        );

        let date = match raw.date.as_ref() {
            Some(Value::String(s)) => parse_date(s),
            _ => None,
        };

        let sender_entry = self.senders.entry(sender).or_default();
        sender_entry.count += 1;
        if let Some(date) = date {
            sender_entry.dates.push(date);
            self.all_dates.push(date);
        }

        let receiver_entry = self.receivers.entry(receiver).or_default();
        receiver_entry.count += 1;
        if let Some(date) = date {
            receiver_entry.dates.push(date);
        }
    }

    fn record_error(&mut self, document: &SourceDocument, fallback: &str) {
        self.stats.invalid_files += 1;
        let error = document
            .extraction
            .error
            .clone()
            .unwrap_or_else(|| fallback.to_string());
        self.errors.push(FileError {
            file: document.source_id.clone(),
            error,
        });
    }

    pub fn finish(mut self) -> CorpusAnalysis {
        self.stats.unique_senders = self.senders.len();
        self.stats.unique_receivers = self.receivers.len();

        let overall_date_range = date_range(&self.all_dates).unwrap_or_default();
        let senders = party_summaries(self.senders);
        let receivers = party_summaries(self.receivers);

        self.errors.truncate(MAX_REPORTED_ERRORS);

        CorpusAnalysis {
            stats: self.stats,
            overall_date_range,
            senders,
            receivers,
            errors: self.errors,
        }
    }
}

/// Display string for one side of an email: the name (or guess) with the
/// address appended as `Name <email>`. List values are joined, object
/// values rendered as JSON; a side with nothing at all becomes `Unknown`.
fn party_display(name: Option<&Value>, guess: Option<&Value>, email: Option<&Value>) -> String {
    let base = name
        .filter(|v| is_truthy(v))
        .or_else(|| guess.filter(|v| is_truthy(v)));

    let mut display = match base {
        None => "Unknown".to_string(),
        Some(Value::Array(items)) => join_values(items),
        Some(value) => value_to_text(value),
    };

    if let Some(email) = email.filter(|v| is_truthy(v)) {
        let email_text = match email {
            Value::Array(items) => join_values(items),
            value => value_to_text(value),
        };
        display = format!("{display} <{email_text}>");
    }

    display
}

fn join_values(items: &[Value]) -> String {
    items
        .iter()
        .map(value_to_text)
        .collect::<Vec<_>>()
        .join(", ")
}

fn date_range(dates: &[NaiveDateTime]) -> Option<DateRange> {
    let min = dates.iter().min()?;
    let max = dates.iter().max()?;
    let render = |dt: &NaiveDateTime| dt.format("%Y-%m-%d-%H-%M").to_string();
    Some(DateRange {
        min: Some(render(min)),
        max: Some(render(max)),
    })
}

fn party_summaries(
    parties: HashMap<String, PartyCounter>,
) -> Vec<shared_types::PartyActivity> {
    let mut summaries: Vec<_> = parties
        .into_iter()
        .map(|(name, counter)| shared_types::PartyActivity {
            date_range: date_range(&counter.dates),
            count: counter.count,
            name,
        })
        .collect();
    // Busiest first; ties by name so reruns emit identical reports.
    summaries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    summaries
}
