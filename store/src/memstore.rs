use crate::{KvClient, KvError, Result, Value};
use log::debug;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

/// An in-memory key-value store
///
/// Cloning a `MemStore` yields another handle onto the same underlying
/// store, so a single database can be shared across owners.
#[derive(Clone, Default)]
pub struct MemStore {
    inner: Arc<Mutex<InnerStore>>,
}

impl MemStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvClient for MemStore {
    fn set(&self, key: &str, value: Value) -> Result<()> {
        self.inner.lock().map_err(|_| KvError::Lock)?.set(key, value)
    }

    fn get(&self, key: &str) -> Result<Option<Value>> {
        self.inner.lock().map_err(|_| KvError::Lock)?.get(key)
    }

    fn incr(&self, key: &str) -> Result<i64> {
        self.inner.lock().map_err(|_| KvError::Lock)?.incr(key)
    }

    fn rpush(&self, key: &str, value: Value) -> Result<u64> {
        self.inner.lock().map_err(|_| KvError::Lock)?.rpush(key, value)
    }

    fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Value>> {
        self.inner
            .lock()
            .map_err(|_| KvError::Lock)?
            .lrange(key, start, stop)
    }

    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.inner.lock().map_err(|_| KvError::Lock)?.exists(key))
    }

    fn flushdb(&self) -> Result<()> {
        self.inner.lock().map_err(|_| KvError::Lock)?.flushdb();
        Ok(())
    }
}

// One entry in the store: either a scalar or a list. Operations addressed
// to the wrong kind fail with `WrongType` instead of coercing.
enum Entry {
    Scalar(Value),
    List(Vec<Value>),
}

impl Entry {
    fn kind(&self) -> &'static str {
        match self {
            Entry::Scalar(v) => v.type_name(),
            Entry::List(_) => "list",
        }
    }
}

// Inner state of a `MemStore`
//
// Note: not an implementor of `KvClient`. `MemStore` hides this state
// behind an `Arc<Mutex<InnerStore>>`.
#[derive(Default)]
struct InnerStore {
    entries: HashMap<String, Entry>,
}

impl InnerStore {
    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        debug!("SET {} = {}", key, value);
        self.entries.insert(key.to_owned(), Entry::Scalar(value));
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Value>> {
        match self.entries.get(key) {
            Some(Entry::Scalar(v)) => Ok(Some(v.clone())),
            Some(entry @ Entry::List(_)) => Err(KvError::WrongType {
                key: key.to_owned(),
                expected: "scalar",
                found: entry.kind(),
            }),
            None => Ok(None),
        }
    }

    fn incr(&mut self, key: &str) -> Result<i64> {
        let current = match self.entries.get(key) {
            Some(Entry::Scalar(Value::Int(i))) => *i,
            Some(entry) => {
                return Err(KvError::WrongType {
                    key: key.to_owned(),
                    expected: "int",
                    found: entry.kind(),
                })
            }
            // a missing counter starts at zero
            None => 0,
        };

        let next = current
            .checked_add(1)
            .ok_or_else(|| KvError::Overflow { key: key.to_owned() })?;

        debug!("INCR {} -> {}", key, next);
        self.entries
            .insert(key.to_owned(), Entry::Scalar(Value::Int(next)));

        Ok(next)
    }

    fn rpush(&mut self, key: &str, value: Value) -> Result<u64> {
        debug!("RPUSH {} {}", key, value);
        match self
            .entries
            .entry(key.to_owned())
            .or_insert_with(|| Entry::List(Vec::new()))
        {
            Entry::List(list) => {
                list.push(value);
                Ok(list.len() as u64)
            }
            entry => Err(KvError::WrongType {
                key: key.to_owned(),
                expected: "list",
                found: entry.kind(),
            }),
        }
    }

    fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Value>> {
        let list = match self.entries.get(key) {
            Some(Entry::List(list)) => list,
            Some(entry) => {
                return Err(KvError::WrongType {
                    key: key.to_owned(),
                    expected: "list",
                    found: entry.kind(),
                })
            }
            None => return Ok(Vec::new()),
        };

        let len = list.len() as i64;

        // negative indices count back from the tail, both bounds inclusive
        let start = if start < 0 { len + start } else { start }.max(0);
        let stop = if stop < 0 { len + stop } else { stop }.min(len - 1);

        if start > stop {
            return Ok(Vec::new());
        }

        Ok(list[start as usize..=stop as usize].to_vec())
    }

    fn exists(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn flushdb(&mut self) {
        debug!("FLUSHDB ({} keys dropped)", self.entries.len());
        self.entries.clear();
    }
}
