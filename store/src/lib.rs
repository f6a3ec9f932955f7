#![deny(missing_docs)]
//! Client surface for a small in-memory key-value store
//!
//! The [`KvClient`] trait exposes the handful of store operations the rest
//! of the workspace is built on: scalar `set`/`get`, counters via `incr`,
//! list appends and reads via `rpush`/`lrange`, plus `exists` and the
//! whole-database `flushdb`.
//!
//! Values are typed scalars, see [`Value`]. [`MemStore`] is the in-memory
//! implementation.
//!
//! # Examples
//!
//! ```rust
//! use kvstore::{KvClient, MemStore, Value};
//!
//! let store = MemStore::new();
//! store.set("greeting", Value::from("hello")).unwrap();
//!
//! assert_eq!(store.get("greeting").unwrap(), Some(Value::from("hello")));
//! assert_eq!(store.get("missing").unwrap(), None);
//!
//! assert_eq!(store.incr("visits").unwrap(), 1);
//! assert_eq!(store.incr("visits").unwrap(), 2);
//! ```

pub use memstore::MemStore;
pub use value::Value;
use thiserror::Error;

mod memstore;
mod value;

/// Defines shared behavior for talking to a key-value store
///
/// Note, that all the methods receive shared references to the underlying
/// type. This allows sharing a client handle across threads. Implementors
/// should employ synchronization primitives such as `Mutex` in order to
/// acquire interior mutability.
pub trait KvClient: Clone + Send + 'static {
    /// bind `key` to the scalar `value`, replacing any previous entry
    fn set(&self, key: &str, value: Value) -> Result<()>;

    /// get the scalar stored at `key`
    ///
    /// Returns `None` if the key is missing. Returns `Err` if the key
    /// holds a list.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// increment the integer at `key` by one, returning the new value
    ///
    /// A missing key starts at zero, so the first `incr` returns 1.
    /// Returns `Err` if the key holds anything other than an integer.
    fn incr(&self, key: &str) -> Result<i64>;

    /// append `value` to the list at `key`, creating the list if missing
    ///
    /// Returns the length of the list after the append. Returns `Err` if
    /// the key holds a scalar.
    fn rpush(&self, key: &str, value: Value) -> Result<u64>;

    /// read the list at `key` between `start` and `stop`, both inclusive
    ///
    /// Negative indices count back from the end of the list, so
    /// `lrange(key, 0, -1)` reads the whole list. Out-of-range indices
    /// clamp rather than error, and a missing key reads as an empty list.
    fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Value>>;

    /// whether `key` currently holds an entry of any kind
    fn exists(&self, key: &str) -> Result<bool>;

    /// remove every key in the store
    fn flushdb(&self) -> Result<()>;
}

/// Store error type
#[derive(Debug, Error, PartialEq)]
pub enum KvError {
    /// the operation does not apply to the entry type held at the key
    #[error("wrong entry type at {key:?}: expected {expected}, found {found}")]
    WrongType {
        /// the key the operation was addressed to
        key: String,
        /// the entry type the operation needs
        expected: &'static str,
        /// the entry type actually held
        found: &'static str,
    },
    /// an `incr` would step past `i64::MAX`
    #[error("increment of {key:?} overflows")]
    Overflow {
        /// the key holding the counter
        key: String,
    },
    /// failed to acquire the store `Mutex`
    #[error("failed to acquire lock")]
    Lock,
}

/// Custom Result type for store operations
pub type Result<T> = std::result::Result<T, KvError>;
