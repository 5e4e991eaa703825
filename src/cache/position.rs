use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::error::{CacheError, StoreError};
use crate::cache::source::PositionSource;
use crate::cache::store::FileStore;

pub const POSITION_DOC: &str = "iss_position";
pub const POSITION_TTL_SECONDS: i64 = 5;

/// Live ground-track snapshot as served by the upstream position endpoint.
/// Valid only for a few seconds; consumed by the map view, not the predictor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub velocity: f64,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PositionEntry {
    data: PositionSnapshot,
    fetched_at: DateTime<Utc>,
}

/// Short-TTL cache over the live-position endpoint, same hit/refresh
/// semantics as the element cache but with a 5 second freshness bound.
pub struct PositionCache<S: PositionSource> {
    store: FileStore,
    source: S,
}

impl<S: PositionSource> PositionCache<S> {
    pub fn new(store: FileStore, source: S) -> Self {
        PositionCache { store, source }
    }

    pub async fn current_position(&self) -> Result<PositionSnapshot, CacheError> {
        self.current_position_at(Utc::now()).await
    }

    pub async fn current_position_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<PositionSnapshot, CacheError> {
        match self.store.get::<PositionEntry>(POSITION_DOC) {
            Ok(Some(entry))
                if now - entry.fetched_at < Duration::seconds(POSITION_TTL_SECONDS) =>
            {
                return Ok(entry.data);
            }
            Ok(_) => {}
            Err(StoreError::Parse(e)) => {
                log::warn!("discarding corrupt position document: {}", e);
            }
            Err(e) => return Err(e.into()),
        }

        let snapshot = self.source.fetch().await?;
        self.store.set(
            POSITION_DOC,
            &PositionEntry {
                data: snapshot.clone(),
                fetched_at: now,
            },
        )?;
        Ok(snapshot)
    }
}
