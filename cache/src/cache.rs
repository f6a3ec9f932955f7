use crate::{CacheError, Replay, Result};
use kvstore::{KvClient, Value};
use log::debug;
use uuid::Uuid;

/// Qualified name of [`Cache::store`], used to key its instrumentation
pub const METHOD_STORE: &str = "Cache.store";

/// Qualified name of [`Cache::get`], used to key its instrumentation
pub const METHOD_GET: &str = "Cache.get";

// suffixes of the per-method call-history list keys
const INPUTS_SUFFIX: &str = ":inputs";
const OUTPUTS_SUFFIX: &str = ":outputs";

/// A caching wrapper around a key-value store client
///
/// Values go in through [`store`], which issues a fresh UUID key per value,
/// and come back out through [`get`] and its typed convenience variants.
///
/// Both `store` and `get` are instrumented: each call increments a counter
/// kept under the method's qualified name, and appends the call's argument
/// and result to a pair of history lists kept under `<method>:inputs` and
/// `<method>:outputs`. All of that state lives in the backing store itself,
/// so it survives for exactly as long as the data does.
///
/// [`store`]: Cache::store
/// [`get`]: Cache::get
#[derive(Clone)]
pub struct Cache<C: KvClient> {
    client: C,
}

impl<C: KvClient> Cache<C> {
    /// Wrap the given store client.
    ///
    /// This flushes the entire backing store, destroying every
    /// pre-existing key. There is no undo.
    pub fn new(client: C) -> Result<Self> {
        debug!("new cache, flushing backing store");
        client.flushdb()?;
        Ok(Cache { client })
    }

    /// Store a scalar under a freshly generated UUID key and return the key.
    ///
    /// Keys are never reused within a store lifetime.
    pub fn store(&self, value: impl Into<Value>) -> Result<Uuid> {
        let value = value.into();
        self.record_call(METHOD_STORE, value.to_string())?;

        let key = Uuid::new_v4();
        self.client.set(&key.to_string(), value)?;

        self.record_result(METHOD_STORE, key.to_string())?;
        Ok(key)
    }

    /// Fetch the raw value stored under `key`.
    ///
    /// A missing key is `Ok(None)`, never an error.
    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        self.record_call(METHOD_GET, key.to_owned())?;

        let value = self.client.get(key)?;

        let rendered = value.as_ref().map(Value::to_string).unwrap_or_default();
        self.record_result(METHOD_GET, rendered)?;
        Ok(value)
    }

    /// Fetch the value stored under `key` and run it through `convert`.
    ///
    /// The converter only runs when the key is present; a missing key is
    /// still `Ok(None)`.
    pub fn get_with<T>(
        &self,
        key: &str,
        convert: impl FnOnce(Value) -> Result<T>,
    ) -> Result<Option<T>> {
        self.get(key)?.map(convert).transpose()
    }

    /// Fetch the value stored under `key` as text.
    ///
    /// Bytes are decoded as UTF-8, numbers are rendered.
    pub fn get_str(&self, key: &str) -> Result<Option<String>> {
        self.get_with(key, |value| match value {
            Value::Str(s) => Ok(s),
            Value::Bytes(b) => Ok(String::from_utf8(b)?),
            Value::Int(i) => Ok(i.to_string()),
            Value::Float(x) => Ok(x.to_string()),
        })
    }

    /// Fetch the value stored under `key` as an integer.
    ///
    /// Text (and UTF-8 bytes) are parsed base 10; a stored float is a
    /// type error rather than a truncation.
    pub fn get_int(&self, key: &str) -> Result<Option<i64>> {
        self.get_with(key, |value| match value {
            Value::Int(i) => Ok(i),
            Value::Str(s) => Ok(s.parse()?),
            Value::Bytes(b) => Ok(String::from_utf8(b)?.parse()?),
            Value::Float(_) => Err(CacheError::WrongType {
                expected: "int",
                found: "float",
            }),
        })
    }

    /// Read back the instrumentation of `method` (one of [`METHOD_STORE`],
    /// [`METHOD_GET`]) as a [`Replay`] report.
    ///
    /// A method that was never called replays as zero calls; that is not
    /// an error.
    pub fn replay(&self, method: &str) -> Result<Replay> {
        let count = self
            .client
            .get(method)?
            .and_then(|v| v.as_int())
            .unwrap_or(0);

        let inputs = self.client.lrange(&history_key(method, INPUTS_SUFFIX), 0, -1)?;
        let outputs = self.client.lrange(&history_key(method, OUTPUTS_SUFFIX), 0, -1)?;

        Ok(Replay::new(method, count, inputs, outputs))
    }

    // Interceptor run before an instrumented method delegates: bump the
    // method's call counter and append the rendered argument to its
    // inputs list.
    fn record_call(&self, method: &str, input: String) -> Result<()> {
        self.client.incr(method)?;
        self.client
            .rpush(&history_key(method, INPUTS_SUFFIX), Value::Str(input))?;
        Ok(())
    }

    // Interceptor run after an instrumented method delegates: append the
    // rendered result to the method's outputs list.
    fn record_result(&self, method: &str, output: String) -> Result<()> {
        self.client
            .rpush(&history_key(method, OUTPUTS_SUFFIX), Value::Str(output))?;
        Ok(())
    }
}

fn history_key(method: &str, suffix: &str) -> String {
    format!("{}{}", method, suffix)
}

#[cfg(test)]
mod tests {
    use crate::{Cache, CacheError, METHOD_GET, METHOD_STORE};
    use kvstore::{KvClient, MemStore, Value};

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_store_then_get_round_trip() {
        init_logs();
        let cache = Cache::new(MemStore::new()).unwrap();

        for value in [
            Value::from("hello"),
            Value::from(b"raw bytes".as_slice()),
            Value::from(-17),
            Value::from(2.5),
        ] {
            let key = cache.store(value.clone()).unwrap();
            assert_eq!(cache.get(&key.to_string()).unwrap(), Some(value));
        }
    }

    #[test]
    fn test_get_missing_key_is_none() {
        let cache = Cache::new(MemStore::new()).unwrap();

        assert_eq!(cache.get("no-such-key").unwrap(), None);
        assert_eq!(cache.get_str("no-such-key").unwrap(), None);
        assert_eq!(cache.get_int("no-such-key").unwrap(), None);
    }

    #[test]
    fn test_store_issues_distinct_keys() {
        let cache = Cache::new(MemStore::new()).unwrap();

        let a = cache.store("same").unwrap();
        let b = cache.store("same").unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn test_new_flushes_the_store() {
        init_logs();
        let store = MemStore::new();
        store.set("leftover", Value::from("stale")).unwrap();

        let cache = Cache::new(store.clone()).unwrap();

        assert!(!store.exists("leftover").unwrap());
        assert_eq!(cache.get("leftover").unwrap(), None);
    }

    #[test]
    fn test_get_str_converts() {
        let cache = Cache::new(MemStore::new()).unwrap();

        let text = cache.store("plain").unwrap();
        let bytes = cache.store(b"encoded".as_slice()).unwrap();
        let number = cache.store(7).unwrap();

        assert_eq!(cache.get_str(&text.to_string()).unwrap(), Some("plain".to_owned()));
        assert_eq!(cache.get_str(&bytes.to_string()).unwrap(), Some("encoded".to_owned()));
        assert_eq!(cache.get_str(&number.to_string()).unwrap(), Some("7".to_owned()));
    }

    #[test]
    fn test_get_str_rejects_invalid_utf8() {
        let cache = Cache::new(MemStore::new()).unwrap();
        let key = cache.store(vec![0xffu8, 0xfe]).unwrap();

        assert!(matches!(
            cache.get_str(&key.to_string()),
            Err(CacheError::Utf8(_))
        ));
    }

    #[test]
    fn test_get_int_converts() {
        let cache = Cache::new(MemStore::new()).unwrap();

        let native = cache.store(42).unwrap();
        let text = cache.store("-13").unwrap();
        let bytes = cache.store(b"99".as_slice()).unwrap();

        assert_eq!(cache.get_int(&native.to_string()).unwrap(), Some(42));
        assert_eq!(cache.get_int(&text.to_string()).unwrap(), Some(-13));
        assert_eq!(cache.get_int(&bytes.to_string()).unwrap(), Some(99));
    }

    #[test]
    fn test_get_int_rejects_non_integers() {
        let cache = Cache::new(MemStore::new()).unwrap();

        let text = cache.store("not a number").unwrap();
        let float = cache.store(1.5).unwrap();

        assert!(matches!(
            cache.get_int(&text.to_string()),
            Err(CacheError::ParseInt(_))
        ));
        assert!(matches!(
            cache.get_int(&float.to_string()),
            Err(CacheError::WrongType { .. })
        ));
    }

    #[test]
    fn test_get_with_custom_converter() {
        let cache = Cache::new(MemStore::new()).unwrap();
        let key = cache.store("shout").unwrap();

        let loud = cache
            .get_with(&key.to_string(), |v| Ok(v.to_string().to_uppercase()))
            .unwrap();

        assert_eq!(loud, Some("SHOUT".to_owned()));
    }

    #[test]
    fn test_counter_tracks_calls() {
        let store = MemStore::new();
        let cache = Cache::new(store.clone()).unwrap();

        for i in 0..5 {
            cache.store(i).unwrap();
        }
        let key = cache.store("x").unwrap();
        cache.get(&key.to_string()).unwrap();
        cache.get(&key.to_string()).unwrap();

        assert_eq!(store.get(METHOD_STORE).unwrap(), Some(Value::Int(6)));
        assert_eq!(store.get(METHOD_GET).unwrap(), Some(Value::Int(2)));
    }

    #[test]
    fn test_history_pairs_inputs_with_outputs() {
        let store = MemStore::new();
        let cache = Cache::new(store.clone()).unwrap();

        let first = cache.store("first").unwrap();
        let second = cache.store("second").unwrap();

        let inputs = store.lrange("Cache.store:inputs", 0, -1).unwrap();
        let outputs = store.lrange("Cache.store:outputs", 0, -1).unwrap();

        assert_eq!(
            inputs,
            vec![Value::from("first"), Value::from("second")]
        );
        assert_eq!(
            outputs,
            vec![
                Value::from(first.to_string()),
                Value::from(second.to_string()),
            ]
        );
    }

    #[test]
    fn test_get_history_records_misses_as_empty_output() {
        let store = MemStore::new();
        let cache = Cache::new(store.clone()).unwrap();

        cache.get("absent").unwrap();

        let inputs = store.lrange("Cache.get:inputs", 0, -1).unwrap();
        let outputs = store.lrange("Cache.get:outputs", 0, -1).unwrap();

        assert_eq!(inputs, vec![Value::from("absent")]);
        assert_eq!(outputs, vec![Value::from("")]);
    }
}
