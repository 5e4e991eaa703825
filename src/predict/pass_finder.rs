use chrono::{DateTime, Duration, Utc};

use crate::cache::TleSet;
use crate::predict::error::PredictError;
use crate::predict::observer::ObserverLocation;
use crate::predict::propagation::{eci_to_ecef, elevation_deg, gmst, Propagator};
use crate::predict::sun::{is_dark, is_sunlit, solar_elevation_deg};
use crate::predict::types::Pass;
use crate::predict::{MIN_ELEVATION_DEG, SCAN_HOURS, STEP_SECONDS};

/// All naked-eye passes within the 72 hour scan horizon, earliest first.
///
/// A sample is visible when the object is above the minimum elevation, the
/// observer is past civil twilight and the object is outside Earth's shadow.
/// Runs of visible samples are merged into passes; a run still open at the
/// horizon is truncated there rather than discarded.
pub fn visible_passes(
    tle: &TleSet,
    observer: &ObserverLocation,
    start: DateTime<Utc>,
) -> Result<Vec<Pass>, PredictError> {
    let propagator = Propagator::from_tle(tle)?;
    let end = start + Duration::hours(SCAN_HOURS);
    let step = Duration::seconds(STEP_SECONDS);

    let passes = collect_passes(start, end, step, |t| {
        visible_elevation(&propagator, observer, t)
    });
    log::debug!(
        "scan from {} found {} candidate passes",
        start,
        passes.len()
    );
    Ok(passes)
}

/// First pass of [`visible_passes`], or `None` when the horizon is clear.
/// Callers wanting later passes re-invoke with `start` advanced past the
/// returned pass's end.
pub fn next_visible_pass(
    tle: &TleSet,
    observer: &ObserverLocation,
    start: DateTime<Utc>,
) -> Result<Option<Pass>, PredictError> {
    Ok(visible_passes(tle, observer, start)?.into_iter().next())
}

/// Scan `[start, end]` inclusive at `step`, merging consecutive visible
/// samples into passes. The sampler returns the elevation when the object
/// is visible at that instant, `None` otherwise.
fn collect_passes<F>(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step: Duration,
    mut sample: F,
) -> Vec<Pass>
where
    F: FnMut(DateTime<Utc>) -> Option<f64>,
{
    let mut passes = Vec::new();
    let mut open: Option<Pass> = None;
    let mut cursor = start;

    while cursor <= end {
        match sample(cursor) {
            Some(elevation) => match open.as_mut() {
                Some(pass) => pass.extend(cursor, elevation),
                None => open = Some(Pass::open(cursor, elevation)),
            },
            None => {
                if let Some(mut pass) = open.take() {
                    pass.finalize();
                    passes.push(pass);
                }
            }
        }
        cursor += step;
    }

    // Horizon cutoff: a still-open run ends at the last visible sample.
    if let Some(mut pass) = open.take() {
        pass.finalize();
        passes.push(pass);
    }

    passes
}

fn visible_elevation(
    propagator: &Propagator,
    observer: &ObserverLocation,
    t: DateTime<Utc>,
) -> Option<f64> {
    // Propagation failure (decayed elements) is a non-visible sample.
    let pos_eci = propagator.position_eci_km(t)?;
    let sidereal = gmst(t);

    let elevation = elevation_deg(observer, eci_to_ecef(pos_eci, sidereal));
    if !above_min_elevation(elevation) {
        return None;
    }

    if !is_dark(solar_elevation_deg(observer, t, sidereal)) {
        return None;
    }
    if !is_sunlit(pos_eci, t) {
        return None;
    }

    Some(elevation)
}

/// Elevation gate, exclusive at the threshold: exactly 9 degrees is out.
fn above_min_elevation(elevation_deg: f64) -> bool {
    elevation_deg > MIN_ELEVATION_DEG
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const ISS_LINE1: &str =
        "1 25544U 98067A   08264.51782528 -.00002182  00000-0 -11606-4 0  2927";
    const ISS_LINE2: &str =
        "2 25544  51.6416 247.4627 0006703 130.5360 325.0288 15.72125391563537";

    fn iss_tle() -> TleSet {
        TleSet {
            line1: ISS_LINE1.to_string(),
            line2: ISS_LINE2.to_string(),
        }
    }

    fn scan_sequence(visibility: &[bool]) -> Vec<Pass> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let step = Duration::seconds(STEP_SECONDS);
        let end = start + step * (visibility.len() as i32 - 1);
        let mut samples = visibility.iter();
        collect_passes(start, end, step, |_| {
            samples.next().and_then(|&v| if v { Some(45.0) } else { None })
        })
    }

    #[test]
    fn runs_of_visible_samples_merge_into_passes() {
        let passes = scan_sequence(&[false, true, true, true, false, true, false]);
        assert_eq!(passes.len(), 2);

        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let step = Duration::seconds(STEP_SECONDS);

        assert_eq!(passes[0].start_time, start + step);
        assert_eq!(passes[0].end_time, start + step * 3);
        assert_eq!(passes[0].duration_sec, 2 * STEP_SECONDS);

        assert_eq!(passes[1].start_time, start + step * 5);
        assert_eq!(passes[1].end_time, start + step * 5);
        assert_eq!(passes[1].duration_sec, 0);
    }

    #[test]
    fn pass_open_at_horizon_ends_at_the_horizon() {
        let passes = scan_sequence(&[false, false, true, true, true]);
        assert_eq!(passes.len(), 1);

        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = start + Duration::seconds(STEP_SECONDS) * 4;
        assert_eq!(passes[0].end_time, end);
    }

    #[test]
    fn all_invisible_sequence_yields_no_pass() {
        let passes = scan_sequence(&[false; 16]);
        assert!(passes.is_empty());
    }

    #[test]
    fn max_elevation_tracks_the_peak_sample() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let step = Duration::seconds(STEP_SECONDS);
        let elevations = [None, Some(10.5), Some(42.7), Some(12.0), None];
        let mut samples = elevations.iter();
        let passes = collect_passes(start, start + step * 4, step, |_| {
            samples.next().copied().flatten()
        });
        assert_eq!(passes.len(), 1);
        assert_eq!(passes[0].max_elevation_deg, 42.7);
    }

    #[test]
    fn elevation_threshold_is_exclusive() {
        assert!(!above_min_elevation(9.0));
        assert!(above_min_elevation(9.0001));
    }

    #[test]
    fn malformed_elements_abort_the_scan() {
        let tle = TleSet {
            line1: "not a tle".into(),
            line2: "still not a tle".into(),
        };
        let observer = ObserverLocation::new(48.85, 2.35);
        let start = Utc.with_ymd_and_hms(2008, 9, 20, 12, 25, 40).unwrap();
        assert!(matches!(
            next_visible_pass(&tle, &observer, start),
            Err(PredictError::InvalidElements(_))
        ));
    }

    #[test]
    fn scan_is_deterministic() {
        let observer = ObserverLocation::new(48.85, 2.35);
        let start = Utc.with_ymd_and_hms(2008, 9, 20, 12, 25, 40).unwrap();
        let first = next_visible_pass(&iss_tle(), &observer, start).unwrap();
        let second = next_visible_pass(&iss_tle(), &observer, start).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn every_pass_is_consistent_and_inside_the_horizon() {
        let observer = ObserverLocation::new(48.85, 2.35);
        let start = Utc.with_ymd_and_hms(2008, 9, 20, 12, 25, 40).unwrap();
        let end = start + Duration::hours(SCAN_HOURS);

        let passes = visible_passes(&iss_tle(), &observer, start).unwrap();
        for pass in &passes {
            assert!(pass.start_time >= start);
            assert!(pass.end_time <= end);
            assert!(pass.start_time <= pass.end_time);
            assert_eq!(
                pass.duration_sec,
                (pass.end_time - pass.start_time).num_seconds()
            );
            assert!(pass.max_elevation_deg > MIN_ELEVATION_DEG);
        }
        for window in passes.windows(2) {
            assert!(window[0].end_time < window[1].start_time);
        }
    }
}
