//! Building one [`EmailRecord`] from one raw extracted email object.

use chrono::NaiveDateTime;
use serde_json::Value;
use shared_types::{EmailRecord, RawEmail};

use crate::normalize::is_truthy;

/// The extractor's fixed date rendering: 4-digit year, then 2-digit
/// month, day, hour, minute.
const DATE_FORMAT: &str = "%Y-%m-%d-%H-%M";

/// Parse a `yyyy-mm-dd-hh-mm` date string as a naive UTC datetime.
pub fn parse_date(date_str: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(date_str, DATE_FORMAT).ok()
}

/// Unix seconds for a date field, or `None` when it is absent, not a
/// string, or does not match the fixed format. Never fails the record.
pub fn parse_date_to_timestamp(date: Option<&Value>) -> Option<i64> {
    let Some(Value::String(date_str)) = date else {
        return None;
    };
    parse_date(date_str).map(|dt| dt.and_utc().timestamp())
}

/// The first truthy candidate, or the empty string. Used to prefer the
/// primary party field over the model's guess.
pub fn preferred_party(primary: Option<&Value>, guess: Option<&Value>) -> Value {
    primary
        .filter(|v| is_truthy(v))
        .or_else(|| guess.filter(|v| is_truthy(v)))
        .cloned()
        .unwrap_or_else(|| Value::String(String::new()))
}

/// A field value when truthy, otherwise absent.
pub fn truthy_field(value: Option<&Value>) -> Option<Value> {
    value.filter(|v| is_truthy(v)).cloned()
}

/// Build the canonical record for one raw email.
///
/// Party values are carried verbatim (primary over guess), the date is
/// parsed into a timestamp without ever rejecting the record, and the
/// guess/relationship fields are included only when the source carried
/// something non-empty.
pub fn build_record(raw: &RawEmail, source_id: &str) -> EmailRecord {
    EmailRecord {
        sender: preferred_party(raw.sender.as_ref(), raw.sender_guess.as_ref()),
        sender_email: truthy_field(raw.sender_email.as_ref()),
        receiver: preferred_party(raw.receiver.as_ref(), raw.receiver_guess.as_ref()),
        receiver_email: truthy_field(raw.receiver_email.as_ref()),
        date: raw.date.clone(),
        timestamp: parse_date_to_timestamp(raw.date.as_ref()),
        subject: raw.subject.clone(),
        summary: raw.summary.clone(),
        message_type: raw.message_type.clone(),
        source_file: source_id.to_string(),
        sender_guess: truthy_field(raw.sender_guess.as_ref()),
        receiver_guess: truthy_field(raw.receiver_guess.as_ref()),
        sender_relationship: truthy_field(raw.sender_relationship.as_ref()),
        receiver_relationship: truthy_field(raw.receiver_relationship.as_ref()),
        document_url: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    #[test]
    fn test_parse_known_timestamp() {
        let ts = parse_date_to_timestamp(Some(&json!("2015-03-02-10-15")));
        assert_eq!(ts, Some(1_425_291_300));
    }

    #[test]
    fn test_parse_round_trips_through_chrono() {
        let ts = parse_date_to_timestamp(Some(&json!("2019-07-08-09-30"))).unwrap();
        let dt = chrono::DateTime::from_timestamp(ts, 0).unwrap();
        assert_eq!(dt.year(), 2019);
        assert_eq!(dt.month(), 7);
        assert_eq!(dt.day(), 8);
        assert_eq!(dt.hour(), 9);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn test_unparseable_dates_yield_none() {
        assert_eq!(parse_date_to_timestamp(None), None);
        assert_eq!(parse_date_to_timestamp(Some(&json!(null))), None);
        assert_eq!(parse_date_to_timestamp(Some(&json!("2015-03-02"))), None);
        assert_eq!(parse_date_to_timestamp(Some(&json!("not a date"))), None);
        assert_eq!(parse_date_to_timestamp(Some(&json!(1425291300))), None);
    }

    #[test]
    fn test_primary_field_preferred_over_guess() {
        assert_eq!(
            preferred_party(Some(&json!("Named")), Some(&json!("Guessed"))),
            json!("Named")
        );
        assert_eq!(
            preferred_party(Some(&json!("")), Some(&json!("Guessed"))),
            json!("Guessed")
        );
        assert_eq!(preferred_party(None, None), json!(""));
    }

    #[test]
    fn test_record_carries_raw_values_and_timestamp() {
        let raw: RawEmail = serde_json::from_value(json!({
            "sender": "Jeffrey Epstein",
            "receiver": ["Larry", "Gwendolyn"],
            "receiverEmail": "[\"larry@example.com\"]",
            "date": "2015-03-02-10-15",
            "subject": "lunch",
            "summary": "lunch plans",
            "messageType": "Original"
        }))
        .unwrap();

        let record = build_record(&raw, "003_doc.jpg.json");
        assert_eq!(record.sender, json!("Jeffrey Epstein"));
        // Raw receiver values pass through untouched, list shape included.
        assert_eq!(record.receiver, json!(["Larry", "Gwendolyn"]));
        assert_eq!(record.receiver_email, Some(json!("[\"larry@example.com\"]")));
        assert_eq!(record.timestamp, Some(1_425_291_300));
        assert_eq!(record.source_file, "003_doc.jpg.json");
        assert_eq!(record.sender_guess, None);
    }

    #[test]
    fn test_record_without_date_is_still_produced() {
        let raw: RawEmail = serde_json::from_value(json!({
            "sender": "Jeffrey Epstein",
            "receiver": "Larry"
        }))
        .unwrap();

        let record = build_record(&raw, "doc.json");
        assert_eq!(record.date, None);
        assert_eq!(record.timestamp, None);
        assert_eq!(record.subject, None);
    }

    #[test]
    fn test_guess_used_when_primary_absent() {
        let raw: RawEmail = serde_json::from_value(json!({
            "sender": "",
            "senderGuess": "Probably Boris",
            "senderRelationship": "science advisor",
            "receiver": "Jeffrey Epstein"
        }))
        .unwrap();

        let record = build_record(&raw, "doc.json");
        assert_eq!(record.sender, json!("Probably Boris"));
        assert_eq!(record.sender_guess, Some(json!("Probably Boris")));
        assert_eq!(record.sender_relationship, Some(json!("science advisor")));
        assert_eq!(record.receiver_relationship, None);
    }
}
