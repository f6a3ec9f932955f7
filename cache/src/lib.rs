#![deny(missing_docs)]
//! # Cache
//!
//! A small caching wrapper over a key-value store client.
//!
//! [`Cache`] hands every stored value a fresh UUID key and keeps, in the
//! same backing store, a call counter and a call history for each of its
//! instrumented methods. [`Cache::replay`] turns that instrumentation back
//! into a readable report.
//!
//! Constructing a `Cache` **flushes the entire backing store**.
//!
//! # Examples
//!
//! ```rust
//! use cache::Cache;
//! use kvstore::MemStore;
//!
//! let cache = Cache::new(MemStore::new()).unwrap();
//!
//! let key = cache.store("hello").unwrap();
//! let value = cache.get_str(&key.to_string()).unwrap();
//! assert_eq!(value, Some("hello".to_owned()));
//!
//! let report = cache.replay(cache::METHOD_STORE).unwrap();
//! assert_eq!(report.count(), 1);
//! ```

pub use crate::cache::{Cache, METHOD_GET, METHOD_STORE};
pub use replay::Replay;

use kvstore::KvError;
use thiserror::Error;

mod cache;
mod replay;

/// Cache error type
#[derive(Debug, Error)]
pub enum CacheError {
    /// the backing store failed
    #[error(transparent)]
    Store(#[from] KvError),
    /// a stored value did not decode as UTF-8 text
    #[error("value is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
    /// a stored value did not parse as an integer
    #[error("value does not parse as an integer")]
    ParseInt(#[from] std::num::ParseIntError),
    /// a converter was applied to a value of the wrong type
    #[error("cannot convert {found} to {expected}")]
    WrongType {
        /// the type the converter produces
        expected: &'static str,
        /// the type actually stored
        found: &'static str,
    },
}

/// Custom Result type for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;
