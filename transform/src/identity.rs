//! Subject identification over noisy name and email fields.

use std::collections::HashSet;

use serde_json::Value;

use crate::normalize::{is_truthy, value_to_text};

/// The fixed individual whose correspondence is being indexed.
///
/// Matching is deliberately permissive: malformed inputs are coerced to a
/// string rendering instead of being rejected, and beyond the exact name
/// variants a name also matches when it contains every configured name
/// token as a substring. The token rule tolerates titles and middle text
/// around the name at some false-positive risk, which is why the token
/// list is configuration rather than a constant.
#[derive(Debug, Clone)]
pub struct SubjectIdentity {
    emails: HashSet<String>,
    names: HashSet<String>,
    name_tokens: Vec<String>,
}

impl SubjectIdentity {
    pub fn new<E, N, T>(emails: E, names: N, name_tokens: T) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        N: IntoIterator,
        N::Item: AsRef<str>,
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        Self {
            emails: emails
                .into_iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .collect(),
            names: names
                .into_iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .collect(),
            name_tokens: name_tokens
                .into_iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Whether this name/email pair denotes the subject.
    ///
    /// The email is checked against the known-address set first; the name
    /// then against the exact variants and the token-containment rule.
    /// False when both sides are absent or empty.
    pub fn is_subject(&self, name: Option<&Value>, email: Option<&Value>) -> bool {
        if let Some(email) = email.filter(|v| is_truthy(v)) {
            let email_lower = value_to_text(email).trim().to_lowercase();
            if self.emails.contains(&email_lower) {
                return true;
            }
        }
        if let Some(name) = name.filter(|v| is_truthy(v)) {
            let name_lower = value_to_text(name).trim().to_lowercase();
            if self.names.contains(&name_lower) {
                return true;
            }
            if !self.name_tokens.is_empty()
                && self.name_tokens.iter().all(|token| name_lower.contains(token))
            {
                return true;
            }
        }
        false
    }

    /// Whether any position of one side's name/email sequences denotes the
    /// subject. The shorter sequence is padded with an absent sentinel so
    /// mismatched lengths still check every element.
    pub fn side_matches(&self, names: &[Value], emails: &[Value]) -> bool {
        let len = names.len().max(emails.len());
        (0..len).any(|i| self.is_subject(names.get(i), emails.get(i)))
    }
}

/// The curated default identity for the indexed subject.
impl Default for SubjectIdentity {
    fn default() -> Self {
        Self::new(
            [
                "jeevacation@gmail.com",
                "jeeitunes@gmail.com",
                "e:jeeitunes@gmail.com",
            ],
            ["jeffrey epstein", "jeffrey e.", "jeffrey e", "je"],
            ["jeffrey", "epstein"],
        )
    }
}
