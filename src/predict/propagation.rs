use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

use crate::cache::TleSet;
use crate::predict::error::PredictError;
use crate::predict::observer::ObserverLocation;

/// Parsed element pair plus the derived SGP4 propagation constants.
/// Immutable; a fresh element pair must be re-parsed into a new handle.
pub struct Propagator {
    elements: Elements,
    constants: Constants,
}

impl Propagator {
    pub fn from_tle(tle: &TleSet) -> Result<Self, PredictError> {
        let elements = Elements::from_tle(None, tle.line1.as_bytes(), tle.line2.as_bytes())
            .map_err(|e| PredictError::InvalidElements(e.to_string()))?;
        let constants = Constants::from_elements(&elements)
            .map_err(|e| PredictError::InvalidElements(e.to_string()))?;
        Ok(Propagator {
            elements,
            constants,
        })
    }

    /// Inertial (TEME) position at `timestamp`, or `None` when propagation
    /// fails (decayed or otherwise unusable elements at that instant).
    pub fn position_eci_km(&self, timestamp: DateTime<Utc>) -> Option<[f64; 3]> {
        let minutes = self
            .elements
            .datetime_to_minutes_since_epoch(&timestamp.naive_utc())
            .ok()?;
        let prediction = self.constants.propagate(minutes).ok()?;
        Some(prediction.position)
    }
}

/// Greenwich mean sidereal time in radians for `timestamp`.
pub fn gmst(timestamp: DateTime<Utc>) -> f64 {
    sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&timestamp.naive_utc()))
}

pub fn eci_to_ecef(pos_eci: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_eci[0] * cos_gmst + pos_eci[1] * sin_gmst,
        -pos_eci[0] * sin_gmst + pos_eci[1] * cos_gmst,
        pos_eci[2],
    ]
}

pub fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();

    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    (east, north, up)
}

/// Elevation of an ECEF target above the observer's horizon, in degrees.
pub fn elevation_deg(observer: &ObserverLocation, target_ecef: [f64; 3]) -> f64 {
    let obs = observer.position_ecef_km();
    let dr = [
        target_ecef[0] - obs[0],
        target_ecef[1] - obs[1],
        target_ecef[2] - obs[2],
    ];
    let range_km = (dr[0] * dr[0] + dr[1] * dr[1] + dr[2] * dr[2]).sqrt();
    if range_km == 0.0 {
        return 0.0;
    }
    let (_, _, up) = ecef_to_enu(dr, observer.lat_rad(), observer.lon_rad());
    (up / range_km).asin().to_degrees()
}
