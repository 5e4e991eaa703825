use chrono::{DateTime, Utc};

use crate::predict::observer::ObserverLocation;
use crate::predict::propagation::{ecef_to_enu, eci_to_ecef};
use crate::predict::{EARTH_RADIUS_KM, SUN_DARK_ELEVATION_DEG};

/// Unit vector toward the Sun in the inertial frame, from the standard
/// low-precision solar ephemeris (mean longitude and mean anomaly linear in
/// days since J2000, first-order equation of center, linear obliquity).
/// Good to a fraction of a degree, which is plenty for a twilight gate.
pub fn sun_vector_eci(timestamp: DateTime<Utc>) -> [f64; 3] {
    let jd = timestamp.timestamp_millis() as f64 / 86_400_000.0 + 2_440_587.5;
    let n = jd - 2_451_545.0;

    let mean_longitude = (280.460 + 0.985_647_4 * n).rem_euclid(360.0);
    let mean_anomaly = (357.528 + 0.985_600_3 * n).rem_euclid(360.0).to_radians();

    let ecliptic_longitude = (mean_longitude
        + 1.915 * mean_anomaly.sin()
        + 0.020 * (2.0 * mean_anomaly).sin())
    .to_radians();

    let obliquity = (23.439 - 0.000_000_4 * n).to_radians();

    [
        ecliptic_longitude.cos(),
        obliquity.cos() * ecliptic_longitude.sin(),
        obliquity.sin() * ecliptic_longitude.sin(),
    ]
}

/// Solar elevation above the observer's horizon, in degrees. The Sun vector
/// is a direction, so it is rotated into the observer's ENU frame without
/// the topocentric translation used for nearby targets.
pub fn solar_elevation_deg(
    observer: &ObserverLocation,
    timestamp: DateTime<Utc>,
    gmst: f64,
) -> f64 {
    let sun_ecef = eci_to_ecef(sun_vector_eci(timestamp), gmst);
    let (_, _, up) = ecef_to_enu(sun_ecef, observer.lat_rad(), observer.lon_rad());
    up.clamp(-1.0, 1.0).asin().to_degrees()
}

/// Civil-twilight gate: dark iff the Sun is strictly below -6 degrees.
pub fn is_dark(sun_elevation_deg: f64) -> bool {
    sun_elevation_deg < SUN_DARK_ELEVATION_DEG
}

/// Cylindrical shadow gate: the object is sunlit iff its perpendicular
/// distance from the Earth-center line toward the Sun exceeds the mean
/// equatorial radius. The cylinder is infinite in both directions; this is
/// the locked approximation, not a conical umbra model.
pub fn is_sunlit(pos_eci_km: [f64; 3], timestamp: DateTime<Utc>) -> bool {
    outside_shadow_cylinder(pos_eci_km, sun_vector_eci(timestamp))
}

pub(crate) fn outside_shadow_cylinder(pos_eci_km: [f64; 3], sun_unit: [f64; 3]) -> bool {
    let dot =
        pos_eci_km[0] * sun_unit[0] + pos_eci_km[1] * sun_unit[1] + pos_eci_km[2] * sun_unit[2];
    let dist = (pos_eci_km[0] * pos_eci_km[0]
        + pos_eci_km[1] * pos_eci_km[1]
        + pos_eci_km[2] * pos_eci_km[2])
        .sqrt();
    if dist == 0.0 {
        return false;
    }
    let angle = (dot / dist).clamp(-1.0, 1.0).acos();
    dist * angle.sin() > EARTH_RADIUS_KM
}
