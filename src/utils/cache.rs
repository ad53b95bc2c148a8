//! Response cache
//!
//! Keeps successful upstream bodies keyed by request URL so repeated fetches
//! within their revalidate window skip the network.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::debug;

/// Entries kept before the cache is flushed
const MAX_ENTRIES: usize = 1000;

#[derive(Debug, Clone)]
struct CachedBody {
    body: Vec<u8>,
    stored_at: Instant,
}

/// Shared cache of raw response bodies
///
/// Freshness is decided by the reader: each lookup passes the window it is
/// willing to accept, so one stored body can serve callers with different
/// revalidate hints.
#[derive(Debug, Clone, Default)]
pub struct ResponseCache {
    entries: Arc<RwLock<HashMap<String, CachedBody>>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a body for `url`, replacing any older copy
    pub fn insert(&self, url: &str, body: &[u8]) {
        if let Ok(mut entries) = self.entries.write() {
            debug!("Caching response for {}", url);
            // Simple cleanup: if cache gets too large, clear old entries
            if entries.len() >= MAX_ENTRIES && !entries.contains_key(url) {
                entries.clear();
            }
            entries.insert(
                url.to_string(),
                CachedBody {
                    body: body.to_vec(),
                    stored_at: Instant::now(),
                },
            );
        }
    }

    /// Body for `url` stored less than `max_age` ago. A zero `max_age` never hits.
    pub fn get(&self, url: &str, max_age: Duration) -> Option<Vec<u8>> {
        let entries = self.entries.read().ok()?;
        let entry = entries.get(url)?;
        if entry.stored_at.elapsed() < max_age {
            debug!("Cache hit for {}", url);
            Some(entry.body.clone())
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
