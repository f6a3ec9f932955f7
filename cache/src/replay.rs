use kvstore::Value;
use std::fmt;

/// The recorded call history of one instrumented method
///
/// Built by [`Cache::replay`]; its `Display` impl renders the diagnostic
/// report:
///
/// ```text
/// Cache.store was called 2 times:
/// Cache.store(foo) -> 8d918091-26bb-4f8c-b47b-336153f29829
/// Cache.store(bar) -> 4507453d-d2a2-42c9-850e-22a470531ec8
/// ```
///
/// [`Cache::replay`]: crate::Cache::replay
#[derive(Debug, Clone, PartialEq)]
pub struct Replay {
    method: String,
    count: i64,
    calls: Vec<(String, String)>,
}

impl Replay {
    pub(crate) fn new(method: &str, count: i64, inputs: Vec<Value>, outputs: Vec<Value>) -> Self {
        let calls = inputs
            .into_iter()
            .zip(outputs)
            .map(|(input, output)| (input.to_string(), output.to_string()))
            .collect();

        Replay {
            method: method.to_owned(),
            count,
            calls,
        }
    }

    /// the qualified name of the replayed method
    pub fn method(&self) -> &str {
        &self.method
    }

    /// how many times the method was called
    pub fn count(&self) -> i64 {
        self.count
    }

    /// the `(input, output)` pairs, in call order
    pub fn calls(&self) -> &[(String, String)] {
        &self.calls
    }
}

impl fmt::Display for Replay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} was called {} times:", self.method, self.count)?;
        for (input, output) in &self.calls {
            write!(f, "\n{}({}) -> {}", self.method, input, output)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Cache, METHOD_GET, METHOD_STORE};
    use kvstore::MemStore;

    #[test]
    fn test_replay_counts_and_pairs_calls() {
        let cache = Cache::new(MemStore::new()).unwrap();

        let first = cache.store("foo").unwrap();
        let second = cache.store("bar").unwrap();

        let report = cache.replay(METHOD_STORE).unwrap();

        assert_eq!(report.method(), METHOD_STORE);
        assert_eq!(report.count(), 2);
        assert_eq!(
            report.calls(),
            &[
                ("foo".to_owned(), first.to_string()),
                ("bar".to_owned(), second.to_string()),
            ]
        );
    }

    #[test]
    fn test_replay_display_format() {
        let cache = Cache::new(MemStore::new()).unwrap();
        let key = cache.store("foo").unwrap();

        let report = cache.replay(METHOD_STORE).unwrap();

        assert_eq!(
            report.to_string(),
            format!(
                "Cache.store was called 1 times:\nCache.store(foo) -> {}",
                key
            )
        );
    }

    #[test]
    fn test_replay_never_called_method() {
        let cache = Cache::new(MemStore::new()).unwrap();

        let report = cache.replay(METHOD_GET).unwrap();

        assert_eq!(report.count(), 0);
        assert!(report.calls().is_empty());
        assert_eq!(report.to_string(), "Cache.get was called 0 times:");
    }

    #[test]
    fn test_replay_preserves_call_order() {
        let cache = Cache::new(MemStore::new()).unwrap();

        for i in 0..10 {
            cache.store(i).unwrap();
        }

        let report = cache.replay(METHOD_STORE).unwrap();

        assert_eq!(report.count(), 10);
        let inputs: Vec<&str> = report.calls().iter().map(|(i, _)| i.as_str()).collect();
        assert_eq!(
            inputs,
            vec!["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"]
        );
    }
}
