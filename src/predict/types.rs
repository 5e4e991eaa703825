use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A detected naked-eye visibility window. Immutable once finalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pass {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub max_elevation_deg: f64,
    pub duration_sec: i64,
}

impl Pass {
    pub(crate) fn open(at: DateTime<Utc>, elevation_deg: f64) -> Self {
        Pass {
            start_time: at,
            end_time: at,
            max_elevation_deg: elevation_deg,
            duration_sec: 0,
        }
    }

    pub(crate) fn extend(&mut self, at: DateTime<Utc>, elevation_deg: f64) {
        self.end_time = at;
        self.max_elevation_deg = self.max_elevation_deg.max(elevation_deg);
    }

    pub(crate) fn finalize(&mut self) {
        self.duration_sec = (self.end_time - self.start_time).num_seconds();
    }
}
