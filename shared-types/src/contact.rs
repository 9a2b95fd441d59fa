use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::email::EmailRecord;

/// One contact's slice of the correspondence index: the resolved
/// counterparty's emails with the subject, ascending by timestamp.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactBucket {
    pub count: usize,
    pub emails: Vec<EmailRecord>,
}

/// The full index, keyed by canonical contact name. Insertion order is the
/// output order: case-insensitive alphabetical.
pub type ContactIndex = IndexMap<String, ContactBucket>;

/// Contact name to email count, same key order as the index.
pub type ContactSummary = IndexMap<String, usize>;

/// Counters accumulated over one transform run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformStats {
    pub documents: usize,
    pub unparseable_documents: usize,
    pub not_email_documents: usize,
    pub emails_seen: usize,
    pub subject_emails: usize,
    pub skipped_not_subject: usize,
    pub unique_contacts: usize,
    pub confidentiality_exceptions: usize,
}

/// Everything one transform run produces.
#[derive(Debug, Clone, Serialize)]
pub struct TransformOutput {
    pub contacts: ContactIndex,
    pub confidentiality: Vec<EmailRecord>,
    pub stats: TransformStats,
}

impl TransformOutput {
    /// The name-to-count summary, in index order.
    pub fn contact_summary(&self) -> ContactSummary {
        self.contacts
            .iter()
            .map(|(name, bucket)| (name.clone(), bucket.count))
            .collect()
    }
}
