//! Transform Crate
//!
//! This crate turns a corpus of per-document extraction results into a
//! per-contact correspondence index centered on one individual (the
//! subject). The upstream vision-language extractor is noisy: party fields
//! arrive as strings, lists, stringified lists, or stringified objects, so
//! every stage here is written to degrade softly instead of failing a
//! record.
//!
//! # Pipeline
//!
//! - [`normalize`]: coerces heterogeneous field values into lists of
//!   values and extracts display strings from object-shaped values
//! - [`identity`]: decides whether a name/email pair denotes the subject
//! - [`alias`]: maps counterparty names onto canonical display names
//! - [`record`]: builds one [`shared_types::EmailRecord`] per raw email
//! - [`aggregate`]: buckets records by resolved counterparty and emits the
//!   final ordered index
//!
//! Two collaborators share the data model but not the index: [`analyze`]
//! reports corpus-wide sender/receiver statistics, and [`links`] attaches
//! shared-folder URLs to an already-built index.

pub mod aggregate;
pub mod alias;
pub mod analyze;
pub mod corpus;
pub mod identity;
pub mod links;
pub mod normalize;
pub mod record;

pub use aggregate::Aggregator;
pub use alias::AliasTable;
pub use analyze::CorpusAnalyzer;
pub use identity::SubjectIdentity;
pub use links::{FolderEntryResponse, LinkLookup, LinkStats};
