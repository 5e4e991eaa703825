use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::error::{CacheError, StoreError};
use crate::cache::source::{ElementSource, TleSet};
use crate::cache::store::FileStore;

pub const ELEMENTS_DOC: &str = "iss_tle";
pub const ELEMENTS_TTL_HOURS: i64 = 6;

/// Persisted element document. Replaced wholesale on every refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub line1: String,
    pub line2: String,
    pub fetched_at: DateTime<Utc>,
}

/// Freshness-bounded cache of the tracked object's two-line elements.
///
/// A stored entry is fresh while `now - fetched_at` is strictly below the
/// TTL; otherwise the upstream source is queried exactly once and the entry
/// replaced. Concurrent callers hitting a stale window may each trigger a
/// fetch; the upstream endpoint is idempotent, so no single-flight
/// coordination is attempted.
pub struct ElementCache<S: ElementSource> {
    store: FileStore,
    source: S,
}

impl<S: ElementSource> ElementCache<S> {
    pub fn new(store: FileStore, source: S) -> Self {
        ElementCache { store, source }
    }

    /// Return the current element pair, refreshing from upstream when the
    /// stored entry is stale or absent.
    pub async fn current_elements(&self) -> Result<TleSet, CacheError> {
        self.current_elements_at(Utc::now()).await
    }

    pub async fn current_elements_at(&self, now: DateTime<Utc>) -> Result<TleSet, CacheError> {
        if let Some(entry) = self.stored_entry()? {
            if now - entry.fetched_at < Duration::hours(ELEMENTS_TTL_HOURS) {
                log::debug!(
                    "serving cached elements fetched at {}",
                    entry.fetched_at
                );
                return Ok(TleSet {
                    line1: entry.line1,
                    line2: entry.line2,
                });
            }
        }

        let tle = self.source.fetch().await?;
        self.store.set(
            ELEMENTS_DOC,
            &CacheEntry {
                line1: tle.line1.clone(),
                line2: tle.line2.clone(),
                fetched_at: now,
            },
        )?;
        log::info!("refreshed orbital elements from upstream");
        Ok(tle)
    }

    fn stored_entry(&self) -> Result<Option<CacheEntry>, CacheError> {
        match self.store.get::<CacheEntry>(ELEMENTS_DOC) {
            Ok(entry) => Ok(entry),
            Err(StoreError::Parse(e)) => {
                // Unreadable document: treat as a miss and refetch.
                log::warn!("discarding corrupt element document: {}", e);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}
