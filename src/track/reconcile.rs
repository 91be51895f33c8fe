use chrono::{DateTime, Utc};

use super::bracket::bracket;
use super::error::ReconcileError;
use super::types::{ReconcileMethod, TrackPoint, VesselEstimate, KNOTS_TO_KMH};
use crate::geo::{self, Ellipsoid};

/// Estimate a vessel's position, course, and speed at `target`.
///
/// Reports for other vessels in `points` are ignored. With reports on both
/// sides of `target` the estimate travels the implied great-circle course
/// at the implied average speed; with reports on one side only it
/// extrapolates at the reported course and speed, backward in time if the
/// single report lies after `target`. A bracket whose two sides carry the
/// same timestamp degenerates to single-point extrapolation from the
/// preceding report.
pub fn reconcile(
    points: &[TrackPoint],
    vessel_id: u32,
    target: DateTime<Utc>,
) -> Result<VesselEstimate, ReconcileError> {
    let own: Vec<&TrackPoint> = points.iter().filter(|p| p.vessel_id == vessel_id).collect();
    let (prev, next) = bracket(&own, target);
    let (prev, next) = (prev.copied(), next.copied());

    match (prev, next) {
        (None, None) => Err(ReconcileError::NoReports { vessel_id }),
        (Some(prev), Some(next)) if next.timestamp > prev.timestamp => {
            Ok(interpolate(prev, next, vessel_id, target))
        }
        (Some(prev), Some(next)) => {
            // Zero-duration bracket; the preceding report becomes the sole
            // source and its own course and speed carry the projection.
            log::debug!(
                "vessel {vessel_id}: zero-duration bracket at {}",
                prev.timestamp
            );
            Ok(extrapolate(
                prev,
                vessel_id,
                target,
                (Some(prev.timestamp), Some(next.timestamp)),
            ))
        }
        (Some(prev), None) => Ok(extrapolate(
            prev,
            vessel_id,
            target,
            (Some(prev.timestamp), None),
        )),
        (None, Some(next)) => Ok(extrapolate(
            next,
            vessel_id,
            target,
            (None, Some(next.timestamp)),
        )),
    }
}

fn extrapolate(
    report: &TrackPoint,
    vessel_id: u32,
    target: DateTime<Utc>,
    bracket: (Option<DateTime<Utc>>, Option<DateTime<Utc>>),
) -> VesselEstimate {
    let speed_kmh = report.sog_knots * KNOTS_TO_KMH;
    let course_deg = report.cog_deg;
    let delta_t_hours = hours_between(target, report.timestamp);
    let distance_km = delta_t_hours * speed_kmh;
    let position = geo::destination(
        report.position(),
        distance_km,
        course_deg,
        Ellipsoid::default(),
    );

    VesselEstimate {
        vessel_id,
        position,
        course_deg,
        speed_kmh,
        delta_t_hours,
        method: ReconcileMethod::Extrapolated,
        bracket,
    }
}

fn interpolate(
    prev: &TrackPoint,
    next: &TrackPoint,
    vessel_id: u32,
    target: DateTime<Utc>,
) -> VesselEstimate {
    let elapsed_hours = hours_between(next.timestamp, prev.timestamp);
    let course_deg = geo::bearing(prev.position(), next.position());
    let speed_kmh =
        geo::distance(prev.position(), next.position(), Ellipsoid::default()) / elapsed_hours;
    let delta_t_hours = hours_between(target, prev.timestamp);
    let distance_km = speed_kmh * delta_t_hours;
    let position = geo::destination(
        prev.position(),
        distance_km,
        course_deg,
        Ellipsoid::default(),
    );

    VesselEstimate {
        vessel_id,
        position,
        course_deg,
        speed_kmh,
        delta_t_hours,
        method: ReconcileMethod::Interpolated,
        bracket: (Some(prev.timestamp), Some(next.timestamp)),
    }
}

fn hours_between(a: DateTime<Utc>, b: DateTime<Utc>) -> f64 {
    (a - b).num_milliseconds() as f64 / 3_600_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::LatLon;
    use chrono::{Duration, TimeZone};

    fn point(
        vessel_id: u32,
        at: DateTime<Utc>,
        lat: f64,
        lon: f64,
        sog_knots: f64,
        cog_deg: f64,
    ) -> TrackPoint {
        TrackPoint {
            vessel_id,
            timestamp: at,
            latitude_deg: lat,
            longitude_deg: lon,
            sog_knots,
            cog_deg,
        }
    }

    fn target() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn no_reports_is_an_error() {
        let points = [point(7, target(), 0.0, 0.0, 5.0, 0.0)];
        let err = reconcile(&points, 8, target()).unwrap_err();
        assert!(matches!(err, ReconcileError::NoReports { vessel_id: 8 }));
    }

    #[test]
    fn bracketed_target_interpolates_along_the_path() {
        // Reports two hours either side of the target, one degree of
        // longitude apart on the equator.
        let points = [
            point(1, target() - Duration::hours(2), 0.0, 0.0, 10.0, 90.0),
            point(1, target() + Duration::hours(2), 0.0, 1.0, 3.0, 270.0),
        ];
        let est = reconcile(&points, 1, target()).unwrap();

        assert_eq!(est.method, ReconcileMethod::Interpolated);
        assert!((est.delta_t_hours - 2.0).abs() < 1e-9);
        assert_eq!(
            est.bracket,
            (
                Some(target() - Duration::hours(2)),
                Some(target() + Duration::hours(2))
            )
        );
        // Halfway along the equatorial great circle.
        assert!(est.position.latitude_deg.abs() < 1e-6);
        assert!((est.position.longitude_deg - 0.5).abs() < 1e-3);
        assert!((est.course_deg - 90.0).abs() < 1e-6);
        // Implied speed covers one degree of equatorial arc in four hours.
        let leg_km = geo::distance(
            LatLon::new(0.0, 0.0),
            LatLon::new(0.0, 1.0),
            Ellipsoid::Wgs84,
        );
        assert!((est.speed_kmh - leg_km / 4.0).abs() < 1e-6);
    }

    #[test]
    fn target_before_all_reports_extrapolates() {
        let points = [point(2, target() + Duration::hours(3), 10.0, 10.0, 12.0, 180.0)];
        let est = reconcile(&points, 2, target()).unwrap();
        assert_eq!(est.method, ReconcileMethod::Extrapolated);
        assert!((est.delta_t_hours + 3.0).abs() < 1e-9);
        assert_eq!(est.bracket, (None, Some(target() + Duration::hours(3))));
        // Backward from a southbound report means displaced north.
        assert!(est.position.latitude_deg > 10.0);
    }

    #[test]
    fn single_point_extrapolation_travels_the_reported_course() {
        // Due north at 20 knots for five hours.
        let source = LatLon::new(40.0, -70.0);
        let points = [point(
            3,
            target() - Duration::hours(5),
            source.latitude_deg,
            source.longitude_deg,
            20.0,
            0.0,
        )];
        let est = reconcile(&points, 3, target()).unwrap();

        assert_eq!(est.method, ReconcileMethod::Extrapolated);
        assert!((est.delta_t_hours - 5.0).abs() < 1e-9);
        assert!((est.speed_kmh - 20.0 * KNOTS_TO_KMH).abs() < 1e-9);

        let expected_km = 20.0 * KNOTS_TO_KMH * 5.0;
        let travelled = geo::distance(source, est.position, Ellipsoid::Wgs84);
        assert!((travelled - expected_km).abs() < 0.5, "got {travelled}");
        assert!((est.position.longitude_deg - source.longitude_deg).abs() < 1e-6);
        assert!(est.position.latitude_deg > source.latitude_deg);
    }

    #[test]
    fn zero_duration_bracket_falls_back_to_extrapolation() {
        let at = target() - Duration::hours(1);
        let points = [
            point(4, at, 5.0, 5.0, 10.0, 90.0),
            point(4, at, 5.0, 5.0, 10.0, 90.0),
        ];
        let est = reconcile(&points, 4, target()).unwrap();
        assert_eq!(est.method, ReconcileMethod::Extrapolated);
        assert!(est.position.latitude_deg.is_finite());
        assert!(est.position.longitude_deg.is_finite());
        assert_eq!(est.bracket, (Some(at), Some(at)));
    }

    #[test]
    fn other_vessels_do_not_leak_into_the_estimate() {
        let points = [
            point(5, target() - Duration::hours(1), 0.0, 0.0, 10.0, 90.0),
            point(6, target() - Duration::minutes(1), 50.0, 50.0, 30.0, 0.0),
            point(5, target() + Duration::hours(1), 0.0, 0.5, 10.0, 90.0),
        ];
        let est = reconcile(&points, 5, target()).unwrap();
        assert_eq!(est.method, ReconcileMethod::Interpolated);
        assert!(est.position.latitude_deg.abs() < 1e-6);
    }
}
