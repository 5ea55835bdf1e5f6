use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A cached API response snapshot, keyed by URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiCacheEntry {
    pub url: String,
    pub data: Value,
    /// Creation time, milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Time to live in milliseconds.
    pub ttl: i64,
}

impl ApiCacheEntry {
    pub fn new(url: impl Into<String>, data: Value, now_millis: i64, ttl_millis: i64) -> Self {
        Self {
            url: url.into(),
            data,
            timestamp: now_millis,
            ttl: ttl_millis,
        }
    }

    /// Valid while `now - timestamp < ttl`.
    pub fn is_fresh(&self, now_millis: i64) -> bool {
        now_millis.saturating_sub(self.timestamp) < self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freshness_boundary() {
        let entry = ApiCacheEntry::new("/r/1", serde_json::json!({"name": "A"}), 0, 1000);

        assert!(entry.is_fresh(0));
        assert!(entry.is_fresh(500));
        assert!(entry.is_fresh(999));
        assert!(!entry.is_fresh(1000));
        assert!(!entry.is_fresh(1500));
    }

    #[test]
    fn test_zero_ttl_is_never_fresh() {
        let entry = ApiCacheEntry::new("/r/1", Value::Null, 10, 0);
        assert!(!entry.is_fresh(10));
    }
}
