//! Bounded history of processed webhook event ids.
//!
//! [`ProcessedEventCache`] is a FIFO with a fixed capacity: recording a new
//! id beyond capacity evicts the oldest. It is persisted as a JSON list of
//! strings under a single property key.

use std::collections::VecDeque;

/// Property key holding the serialized cache.
pub const PROCESSED_EVENTS_KEY: &str = "PROCESSED_EVENTS";

/// Default number of remembered event ids.
pub const DEFAULT_CAPACITY: usize = 100;

/// FIFO of recently processed event ids, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedEventCache {
    capacity: usize,
    ids: VecDeque<String>,
}

impl ProcessedEventCache {
    /// Creates an empty cache. A zero capacity is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            ids: VecDeque::with_capacity(capacity),
        }
    }

    /// Builds a cache from ids in arrival order, keeping the newest
    /// `capacity` of them.
    #[must_use]
    pub fn from_ids<I>(ids: I, capacity: usize) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut cache = Self::new(capacity);
        cache.ids.extend(ids);
        cache.truncate();
        cache
    }

    /// Restores a cache from its persisted JSON form.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if `raw` is not a JSON list of
    /// strings.
    pub fn from_json(raw: &str, capacity: usize) -> Result<Self, serde_json::Error> {
        let ids: Vec<String> = serde_json::from_str(raw)?;
        Ok(Self::from_ids(ids, capacity))
    }

    /// Serializes the cache as a JSON list, oldest first.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` failures (not expected for string lists).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.ids)
    }

    /// Returns `true` if `event_id` was recorded and not yet evicted.
    #[must_use]
    pub fn contains(&self, event_id: &str) -> bool {
        self.ids.iter().any(|id| id == event_id)
    }

    /// Records `event_id`, evicting the oldest ids beyond capacity.
    ///
    /// Returns `false` if the id was already present.
    pub fn record(&mut self, event_id: &str) -> bool {
        if self.contains(event_id) {
            return false;
        }
        self.ids.push_back(event_id.to_string());
        self.truncate();
        true
    }

    fn truncate(&mut self) {
        while self.ids.len() > self.capacity {
            self.ids.pop_front();
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn ids(cache: &ProcessedEventCache) -> Vec<String> {
        let Ok(json) = cache.to_json() else {
            panic!("serialize");
        };
        let Ok(ids) = serde_json::from_str(&json) else {
            panic!("deserialize");
        };
        ids
    }

    #[test]
    fn keeps_most_recent_hundred_in_order() {
        let mut cache = ProcessedEventCache::new(DEFAULT_CAPACITY);
        for i in 0..105 {
            assert!(cache.record(&format!("Ev{i:03}")));
        }
        let ids = ids(&cache);
        assert_eq!(ids.len(), 100);
        assert_eq!(ids.first().map(String::as_str), Some("Ev005"));
        assert_eq!(ids.last().map(String::as_str), Some("Ev104"));
        for i in 0..5 {
            assert!(!cache.contains(&format!("Ev{i:03}")));
        }
        assert!(cache.contains("Ev005"));
    }

    #[test]
    fn duplicate_record_is_ignored() {
        let mut cache = ProcessedEventCache::new(3);
        assert!(cache.record("E1"));
        assert!(!cache.record("E1"));
        assert_eq!(ids(&cache), vec!["E1"]);
    }

    #[test]
    fn json_round_trip_preserves_order() {
        let mut cache = ProcessedEventCache::new(10);
        cache.record("E1");
        cache.record("E2");
        let Ok(json) = cache.to_json() else {
            panic!("serialize");
        };
        assert_eq!(json, r#"["E1","E2"]"#);
        let Ok(restored) = ProcessedEventCache::from_json(&json, 10) else {
            panic!("deserialize");
        };
        assert_eq!(restored, cache);
    }

    #[test]
    fn oversized_persisted_list_is_truncated_from_the_front() {
        let Ok(cache) = ProcessedEventCache::from_json(r#"["a","b","c","d"]"#, 2) else {
            panic!("deserialize");
        };
        assert_eq!(ids(&cache), vec!["c", "d"]);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(ProcessedEventCache::from_json("{}", 5).is_err());
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut cache = ProcessedEventCache::new(0);
        cache.record("a");
        cache.record("b");
        assert!(cache.contains("b"));
        assert!(!cache.contains("a"));
    }
}
