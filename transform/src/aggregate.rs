//! Aggregation of the extraction corpus into the per-contact index.

use std::collections::HashMap;

use serde_json::Value;
use shared_types::{
    ContactBucket, ContactIndex, EmailRecord, RawEmail, SourceDocument, TransformOutput,
    TransformStats,
};
use tracing::debug;

use crate::alias::AliasTable;
use crate::identity::SubjectIdentity;
use crate::normalize::{extract_display_value, is_truthy, normalize_to_list};
use crate::record::{build_record, preferred_party};

/// Fallback contact key when no counterparty identity survives extraction.
pub const UNKNOWN_CONTACT: &str = "Unknown";

/// Records routed to `Unknown` whose summary mentions this are presumed to
/// be disclaimer boilerplate, not genuine unidentified correspondence.
const CONFIDENTIALITY_MARKER: &str = "confidentiality";

/// Single-pass batch aggregator over the document corpus.
///
/// Feed every [`SourceDocument`] through [`Aggregator::process_document`],
/// then call [`Aggregator::finish`]. Document order never changes the
/// final output: buckets are stable-sorted by timestamp and keys are
/// emitted in case-insensitive alphabetical order.
pub struct Aggregator {
    identity: SubjectIdentity,
    aliases: AliasTable,
    buckets: HashMap<String, Vec<EmailRecord>>,
    confidentiality: Vec<EmailRecord>,
    stats: TransformStats,
}

impl Aggregator {
    pub fn new(identity: SubjectIdentity, aliases: AliasTable) -> Self {
        Self {
            identity,
            aliases,
            buckets: HashMap::new(),
            confidentiality: Vec::new(),
            stats: TransformStats::default(),
        }
    }

    /// Process one document. A malformed or payload-less document is
    /// counted and skipped; nothing here is fatal to the run.
    pub fn process_document(&mut self, document: &SourceDocument) {
        self.stats.documents += 1;

        let Some(parsed) = document
            .extraction
            .parsed_response
            .as_ref()
            .filter(|v| is_truthy(v))
        else {
            self.stats.unparseable_documents += 1;
            debug!(source = %document.source_id, "no usable extraction payload");
            return;
        };

        if let Value::Object(map) = parsed {
            if map.get("notEmail").is_some_and(is_truthy) {
                self.stats.not_email_documents += 1;
                return;
            }
        }

        let items: Vec<&Value> = match parsed {
            Value::Object(_) => vec![parsed],
            Value::Array(items) => items.iter().collect(),
            _ => {
                self.stats.unparseable_documents += 1;
                debug!(source = %document.source_id, "payload is neither object nor list");
                return;
            }
        };

        for item in items {
            if !item.is_object() {
                continue;
            }
            let Ok(raw) = serde_json::from_value::<RawEmail>(item.clone()) else {
                continue;
            };
            self.stats.emails_seen += 1;
            self.process_email(&raw, &document.source_id);
        }
    }

    fn process_email(&mut self, raw: &RawEmail, source_id: &str) {
        let sender_name = preferred_party(raw.sender.as_ref(), raw.sender_guess.as_ref());
        let sender_email = raw_or_empty(raw.sender_email.as_ref());
        let receiver_name = preferred_party(raw.receiver.as_ref(), raw.receiver_guess.as_ref());
        let receiver_email = raw_or_empty(raw.receiver_email.as_ref());

        let sender_names = normalize_to_list(Some(&sender_name));
        let sender_emails = normalize_to_list(Some(&sender_email));
        let receiver_names = normalize_to_list(Some(&receiver_name));
        let receiver_emails = normalize_to_list(Some(&receiver_email));

        let subject_sends = self.identity.side_matches(&sender_names, &sender_emails);
        let subject_receives = self.identity.side_matches(&receiver_names, &receiver_emails);

        if !subject_sends && !subject_receives {
            self.stats.skipped_not_subject += 1;
            return;
        }
        self.stats.subject_emails += 1;

        let record = build_record(raw, source_id);

        // Sender role wins for a self-addressed record: counterparties
        // come from the receiver side.
        let parties = if subject_sends {
            counterparty_identities(&receiver_names, &receiver_emails)
        } else {
            counterparty_identities(&sender_names, &sender_emails)
        };

        for party in parties {
            let canonical = self.aliases.resolve(&party).to_string();
            if canonical == UNKNOWN_CONTACT && mentions_confidentiality(raw.summary.as_ref()) {
                self.confidentiality.push(record.clone());
                continue;
            }
            // Fan-out filing: each bucket gets its own copy so later
            // per-bucket edits cannot cross-contaminate.
            self.buckets.entry(canonical).or_default().push(record.clone());
        }
    }

    /// Sort every bucket chronologically and emit the keyed output.
    pub fn finish(mut self) -> TransformOutput {
        for records in self.buckets.values_mut() {
            // Stable: records missing a timestamp sort to the front.
            records.sort_by_key(|record| record.timestamp.unwrap_or(0));
        }

        let mut names: Vec<String> = self.buckets.keys().cloned().collect();
        names.sort_by(|a, b| {
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b))
        });

        let mut contacts = ContactIndex::new();
        for name in names {
            let emails = self.buckets.remove(&name).unwrap_or_default();
            contacts.insert(
                name,
                ContactBucket {
                    count: emails.len(),
                    emails,
                },
            );
        }

        self.stats.unique_contacts = contacts.len();
        self.stats.confidentiality_exceptions = self.confidentiality.len();

        TransformOutput {
            contacts,
            confidentiality: self.confidentiality,
            stats: self.stats,
        }
    }
}

/// Counterparty identities for the non-subject side of a record.
///
/// Names come first; a blank name position falls back to the email at the
/// same index. Only when there are no names at all is the email list used
/// directly. An empty result collapses to the `Unknown` sentinel.
pub fn counterparty_identities(names: &[Value], emails: &[Value]) -> Vec<String> {
    let mut parties = Vec::new();

    if !names.is_empty() {
        for (i, name) in names.iter().enumerate() {
            let candidate = if is_truthy(name) {
                Some(name)
            } else {
                emails.get(i).filter(|v| is_truthy(v))
            };
            push_identity(&mut parties, candidate);
        }
    } else {
        for email in emails {
            push_identity(&mut parties, Some(email).filter(|v| is_truthy(v)));
        }
    }

    if parties.is_empty() {
        parties.push(UNKNOWN_CONTACT.to_string());
    }
    parties
}

fn push_identity(parties: &mut Vec<String>, value: Option<&Value>) {
    if let Some(extracted) = extract_display_value(value) {
        let trimmed = extracted.trim();
        if !trimmed.is_empty() {
            parties.push(trimmed.to_string());
        }
    }
}

fn mentions_confidentiality(summary: Option<&Value>) -> bool {
    match summary {
        Some(Value::String(text)) => text.to_lowercase().contains(CONFIDENTIALITY_MARKER),
        _ => false,
    }
}

fn raw_or_empty(value: Option<&Value>) -> Value {
    value
        .filter(|v| is_truthy(v))
        .cloned()
        .unwrap_or_else(|| Value::String(String::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared_types::ExtractionDocument;

    fn document(source_id: &str, parsed: Value) -> SourceDocument {
        SourceDocument::new(
            source_id,
            ExtractionDocument {
                parsed_response: Some(parsed),
                ..Default::default()
            },
        )
    }

    fn run(documents: &[SourceDocument]) -> TransformOutput {
        let mut aggregator = Aggregator::new(SubjectIdentity::default(), AliasTable::default());
        for doc in documents {
            aggregator.process_document(doc);
        }
        aggregator.finish()
    }

    #[test]
    fn test_not_email_marker_produces_nothing() {
        let output = run(&[document("a.json", json!({"notEmail": true}))]);
        assert!(output.contacts.is_empty());
        assert!(output.confidentiality.is_empty());
        assert_eq!(output.stats.not_email_documents, 1);
        assert_eq!(output.stats.emails_seen, 0);
    }

    #[test]
    fn test_missing_payload_counts_as_unparseable() {
        let doc = SourceDocument::new("a.json", ExtractionDocument::default());
        let output = run(&[doc, document("b.json", json!("just a string"))]);
        assert_eq!(output.stats.documents, 2);
        assert_eq!(output.stats.unparseable_documents, 2);
    }

    #[test]
    fn test_alias_resolution_and_timestamp() {
        let output = run(&[document(
            "a.json",
            json!({
                "sender": "Jeffrey Epstein",
                "receiver": "Larry",
                "date": "2015-03-02-10-15",
                "summary": "lunch"
            }),
        )]);

        let bucket = output.contacts.get("Larry Summers").expect("resolved contact");
        assert_eq!(bucket.count, 1);
        assert_eq!(bucket.emails[0].timestamp, Some(1_425_291_300));
        assert_eq!(bucket.emails[0].receiver, json!("Larry"));
        assert_eq!(bucket.emails[0].source_file, "a.json");
    }

    #[test]
    fn test_record_not_involving_subject_is_skipped() {
        let output = run(&[document(
            "a.json",
            json!({"sender": "Alice", "receiver": "Bob"}),
        )]);
        assert!(output.contacts.is_empty());
        assert_eq!(output.stats.skipped_not_subject, 1);
        assert_eq!(output.stats.subject_emails, 0);
    }

    #[test]
    fn test_single_object_payload_is_wrapped() {
        let output = run(&[document(
            "a.json",
            json!({"sender": "JE", "receiver": "Noam"}),
        )]);
        assert_eq!(output.stats.emails_seen, 1);
        assert!(output.contacts.contains_key("Noam Chomsky"));
    }

    #[test]
    fn test_empty_counterparty_falls_back_to_unknown() {
        let output = run(&[document(
            "a.json",
            json!({
                "sender": "Jeffrey Epstein",
                "receiver": [],
                "receiverEmail": null,
                "summary": "quarterly statement"
            }),
        )]);
        assert!(output.contacts.contains_key(UNKNOWN_CONTACT));
        assert!(output.confidentiality.is_empty());
    }

    #[test]
    fn test_confidentiality_summary_is_diverted() {
        let output = run(&[document(
            "a.json",
            json!({
                "sender": "Jeffrey Epstein",
                "receiver": [],
                "receiverEmail": null,
                "summary": "This message contains a Confidentiality Notice."
            }),
        )]);
        assert!(!output.contacts.contains_key(UNKNOWN_CONTACT));
        assert_eq!(output.confidentiality.len(), 1);
        assert_eq!(output.stats.confidentiality_exceptions, 1);
        // Still a subject email, just filed separately.
        assert_eq!(output.stats.subject_emails, 1);
    }

    #[test]
    fn test_confidentiality_only_applies_to_unknown() {
        let output = run(&[document(
            "a.json",
            json!({
                "sender": "Jeffrey Epstein",
                "receiver": "Larry",
                "summary": "Confidentiality Notice attached."
            }),
        )]);
        assert!(output.confidentiality.is_empty());
        assert_eq!(output.contacts.get("Larry Summers").unwrap().count, 1);
    }

    #[test]
    fn test_chronological_order_across_unsorted_documents() {
        let later = document(
            "z_later.json",
            json!({
                "sender": "GMAX",
                "receiver": "Jeffrey Epstein",
                "date": "2016-01-01-09-00"
            }),
        );
        let earlier = document(
            "a_earlier.json",
            json!({
                "sender": "gmax",
                "receiver": "Jeffrey Epstein",
                "date": "2014-06-15-08-30"
            }),
        );

        // Later document first: order of input must not matter.
        let output = run(&[later, earlier]);
        let bucket = output.contacts.get("Ghislaine Maxwell").expect("GMAX resolved");
        assert_eq!(bucket.count, 2);
        assert_eq!(bucket.emails[0].source_file, "a_earlier.json");
        assert_eq!(bucket.emails[1].source_file, "z_later.json");
        assert!(bucket.emails[0].timestamp < bucket.emails[1].timestamp);
    }

    #[test]
    fn test_null_timestamp_sorts_first() {
        let output = run(&[
            document(
                "a.json",
                json!({
                    "sender": "JE",
                    "receiver": "Reid",
                    "date": "2016-01-01-09-00"
                }),
            ),
            document(
                "b.json",
                json!({"sender": "JE", "receiver": "Reid"}),
            ),
        ]);
        let bucket = output.contacts.get("Reid Hoffman").unwrap();
        assert_eq!(bucket.emails[0].timestamp, None);
        assert_eq!(bucket.emails[1].timestamp, Some(1_451_638_800));
    }

    #[test]
    fn test_fan_out_files_under_every_recipient() {
        let output = run(&[document(
            "a.json",
            json!({
                "sender": "Jeffrey Epstein",
                "receiver": ["GMAX", "Larry"],
                "date": "2015-03-02-10-15"
            }),
        )]);
        assert_eq!(output.contacts.get("Ghislaine Maxwell").unwrap().count, 1);
        assert_eq!(output.contacts.get("Larry Summers").unwrap().count, 1);
        assert_eq!(output.stats.subject_emails, 1);

        // Independent copies per bucket, not shared references.
        let mut output = output;
        output
            .contacts
            .get_mut("Larry Summers")
            .unwrap()
            .emails[0]
            .document_url = Some("http://example.com".to_string());
        assert_eq!(
            output.contacts.get("Ghislaine Maxwell").unwrap().emails[0].document_url,
            None
        );
    }

    #[test]
    fn test_self_addressed_record_uses_receiver_side() {
        // Subject on both sides: sender role wins, so the counterparty
        // comes from the receiver side only.
        let output = run(&[document(
            "a.json",
            json!({
                "sender": "Jeffrey Epstein",
                "senderEmail": "jeevacation@gmail.com",
                "receiver": ["Jeffrey Epstein", "Boris"],
                "date": "2015-03-02-10-15"
            }),
        )]);

        // "Jeffrey Epstein" is itself in the curated table, so the record
        // is filed under the canonical subject name and under Boris, and
        // exactly once each.
        assert_eq!(output.contacts.get("Boris Nikolic").unwrap().count, 1);
        assert_eq!(output.contacts.get("Jeffrey Epstein").unwrap().count, 1);
        assert_eq!(output.contacts.len(), 2);
    }

    #[test]
    fn test_blank_name_falls_back_to_same_position_email() {
        let output = run(&[document(
            "a.json",
            json!({
                "sender": ["", "Heather"],
                "senderEmail": ["first@example.com", "heather@example.com"],
                "receiver": "Jeffrey Epstein"
            }),
        )]);
        assert!(output.contacts.contains_key("first@example.com"));
        assert_eq!(output.contacts.get("Heather Mann").unwrap().count, 1);
    }

    #[test]
    fn test_stringified_receiver_list_fans_out() {
        let output = run(&[document(
            "a.json",
            json!({
                "sender": "JE",
                "receiver": "[\"GMAX\", \"Peggy\"]"
            }),
        )]);
        assert!(output.contacts.contains_key("Ghislaine Maxwell"));
        assert!(output.contacts.contains_key("Peggy Siegal"));
    }

    #[test]
    fn test_object_shaped_counterparty_uses_name_field() {
        let output = run(&[document(
            "a.json",
            json!({
                "sender": {"name": "Ehud Barak", "email": "eb@example.com"},
                "receiver": "Jeffrey Epstein"
            }),
        )]);
        assert_eq!(output.contacts.get("Ehud Barak").unwrap().count, 1);
    }

    #[test]
    fn test_contact_keys_sorted_case_insensitively() {
        let output = run(&[
            document("a.json", json!({"sender": "JE", "receiver": "zed"})),
            document("b.json", json!({"sender": "JE", "receiver": "Alpha"})),
            document("c.json", json!({"sender": "JE", "receiver": "beta"})),
        ]);
        let keys: Vec<&String> = output.contacts.keys().collect();
        assert_eq!(keys, ["Alpha", "beta", "zed"]);
    }

    #[test]
    fn test_multiple_emails_in_one_document() {
        let output = run(&[document(
            "a.json",
            json!([
                {"sender": "JE", "receiver": "Larry", "date": "2015-03-02-10-15"},
                {"sender": "Larry", "receiver": "JE", "date": "2015-03-03-11-00"},
                {"sender": "Alice", "receiver": "Bob"}
            ]),
        )]);
        assert_eq!(output.stats.emails_seen, 3);
        assert_eq!(output.stats.subject_emails, 2);
        assert_eq!(output.stats.skipped_not_subject, 1);
        assert_eq!(output.contacts.get("Larry Summers").unwrap().count, 2);
    }

    #[test]
    fn test_stats_unique_contacts() {
        let output = run(&[
            document("a.json", json!({"sender": "JE", "receiver": "Larry"})),
            document("b.json", json!({"sender": "JE", "receiver": "LHS"})),
        ]);
        assert_eq!(output.stats.unique_contacts, 1);
        assert_eq!(output.contacts.get("Larry Summers").unwrap().count, 2);
    }
}
