use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One raw extracted email object as the vision model emitted it.
///
/// Party fields are kept as untyped JSON values: the extractor sometimes
/// returns a string, sometimes a list, and sometimes a string that is
/// itself a textual encoding of a list or object. Nothing here is trusted
/// beyond being a JSON object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawEmail {
    pub sender: Option<Value>,
    pub sender_email: Option<Value>,
    pub receiver: Option<Value>,
    pub receiver_email: Option<Value>,
    pub sender_guess: Option<Value>,
    pub receiver_guess: Option<Value>,
    pub sender_relationship: Option<Value>,
    pub receiver_relationship: Option<Value>,
    pub date: Option<Value>,
    pub subject: Option<Value>,
    pub summary: Option<Value>,
    pub message_type: Option<Value>,
    pub not_email: Option<Value>,
}

/// Canonical output unit of the transform.
///
/// Party values are preserved exactly as the extractor gave them; the only
/// derived field is `timestamp`. Guess and relationship fields are emitted
/// only when the source carried them, and `document_url` only after link
/// resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailRecord {
    pub sender: Value,
    pub sender_email: Option<Value>,
    pub receiver: Value,
    pub receiver_email: Option<Value>,
    pub date: Option<Value>,
    pub timestamp: Option<i64>,
    pub subject: Option<Value>,
    pub summary: Option<Value>,
    pub message_type: Option<Value>,
    #[serde(rename = "source_file")]
    pub source_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_guess: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver_guess: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_relationship: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver_relationship: Option<Value>,
    #[serde(rename = "document_url", skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,
}

impl Default for EmailRecord {
    fn default() -> Self {
        Self {
            sender: Value::String(String::new()),
            sender_email: None,
            receiver: Value::String(String::new()),
            receiver_email: None,
            date: None,
            timestamp: None,
            subject: None,
            summary: None,
            message_type: None,
            source_file: String::new(),
            sender_guess: None,
            receiver_guess: None,
            sender_relationship: None,
            receiver_relationship: None,
            document_url: None,
        }
    }
}
