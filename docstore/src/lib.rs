#![deny(missing_docs)]
//! Client surface for a small schema-less document store
//!
//! A [`Collection`] holds [`Document`]s, inserted one at a time and
//! addressed by field-based filters. [`MemCollection`] is the in-memory
//! implementation, and [`insert_school`] / [`update_topics`] are the two
//! operations built on top of it.
//!
//! # Examples
//!
//! ```rust
//! use docstore::{insert_school, update_topics, MemCollection};
//! use serde_json::json;
//!
//! let coll = MemCollection::new();
//!
//! let doc = json!({ "name": "UCSF", "address": "505 Parnassus Ave" });
//! insert_school(&coll, doc.as_object().unwrap().clone()).unwrap();
//!
//! let result = update_topics(&coll, "UCSF", &["medicine", "biology"]).unwrap();
//! assert_eq!(result.matched, 1);
//! ```

pub use memcoll::MemCollection;
pub use ops::{insert_school, update_topics};

use thiserror::Error;
use uuid::Uuid;

mod memcoll;
mod ops;

/// A schema-less record: a set of named JSON fields
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Outcome of an update: how many documents matched the filter and how
/// many were actually modified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateResult {
    /// documents that matched the filter (0 or 1 for `update_one`)
    pub matched: u64,
    /// matched documents whose fields actually changed
    pub modified: u64,
}

/// Defines shared behavior for talking to a document collection
///
/// As with the key-value client, methods take shared references and
/// implementors provide interior mutability, so one collection handle can
/// be shared across owners.
pub trait Collection: Clone + Send + 'static {
    /// insert one document, returning its generated id
    fn insert_one(&self, doc: Document) -> Result<Uuid>;

    /// update the first document matching `filter` by overwriting the
    /// fields in `set`, leaving its other fields untouched
    ///
    /// A filter that matches nothing is not an error, the result simply
    /// reports zero matches.
    fn update_one(&self, filter: Document, set: Document) -> Result<UpdateResult>;

    /// the first document matching `filter`, if any
    ///
    /// A document matches when every field in the filter is present and
    /// equal in the document.
    fn find_one(&self, filter: Document) -> Result<Option<Document>>;
}

/// Document store error type
#[derive(Debug, Error, PartialEq)]
pub enum DocError {
    /// failed to acquire the collection `Mutex`
    #[error("failed to acquire lock")]
    Lock,
}

/// Custom Result type for collection operations
pub type Result<T> = std::result::Result<T, DocError>;
