//! Cache of raw nearby-station payloads keyed by canonical address, so a
//! repeat search within the freshness window skips the network entirely.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Maximum age at which a cached lookup may be reused without re-querying.
pub const FRESHNESS_WINDOW_DAYS: i64 = 90;

/// One cached lookup: the raw provider payload and when it was acquired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub payload: Value,
    pub fetched_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.fetched_at) < Duration::days(FRESHNESS_WINDOW_DAYS)
    }
}

/// Address-keyed store of nearby-station payloads. Mutated only from the
/// search flow; serialized as part of the settings so search history
/// survives restarts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationCache {
    entries: HashMap<String, CacheEntry>,
}

impl LocationCache {
    /// A fresh entry for the address, or `None` when absent or expired.
    /// Reuse never touches the stored timestamp.
    pub fn fresh(&self, address: &str, now: DateTime<Utc>) -> Option<&CacheEntry> {
        self.entries.get(address).filter(|e| e.is_fresh(now))
    }

    /// The entry regardless of age, mostly for tests and eviction decisions.
    pub fn entry(&self, address: &str) -> Option<&CacheEntry> {
        self.entries.get(address)
    }

    /// Store a freshly fetched payload, stamping it with `now`. Overwrites
    /// an expired entry for the same address.
    pub fn insert(&mut self, address: impl Into<String>, payload: Value, now: DateTime<Utc>) {
        self.entries.insert(
            address.into(),
            CacheEntry {
                payload,
                fetched_at: now,
            },
        );
    }

    /// Explicit eviction (user-initiated refresh or history deletion).
    /// Returns whether an entry was present.
    pub fn invalidate(&mut self, address: &str) -> bool {
        self.entries.remove(address).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
