mod error;
mod observer;
mod pass_finder;
mod propagation;
mod sun;
mod types;

pub use error::PredictError;
pub use observer::ObserverLocation;
pub use pass_finder::{next_visible_pass, visible_passes};
pub use types::Pass;

// Locked scan constants. The coarse 30 second step and 9 degree elevation
// cutoff are deliberate accuracy/cost trade-offs; the boundary behavior of
// the predictor depends on these exact values.
pub const SCAN_HOURS: i64 = 72;
pub const STEP_SECONDS: i64 = 30;
pub const MIN_ELEVATION_DEG: f64 = 9.0;
pub const SUN_DARK_ELEVATION_DEG: f64 = -6.0;
pub const EARTH_RADIUS_KM: f64 = 6378.137;
