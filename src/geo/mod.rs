//! Geodesy primitives on spherical and ellipsoidal earth models.

mod horizon;

pub use horizon::{
    fov_ground_angle_deg, fov_ground_angle_rad, horizon_angle_deg, horizon_angle_rad,
    EARTH_RADIUS_KM,
};

use serde::{Deserialize, Serialize};
use strum_macros::Display;

const VINCENTY_EPS: f64 = 1e-12;
const VINCENTY_MAX_ITER: usize = 200;

/// A geodetic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

impl LatLon {
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
        }
    }
}

/// Named reference ellipsoids for the distance and destination problems.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
pub enum Ellipsoid {
    #[default]
    #[strum(serialize = "WGS-84")]
    Wgs84,
    #[strum(serialize = "GRS-80")]
    Grs80,
    #[strum(serialize = "Airy-1830")]
    Airy1830,
}

impl Ellipsoid {
    /// Look up an ellipsoid by its conventional name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "WGS-84" => Some(Self::Wgs84),
            "GRS-80" => Some(Self::Grs80),
            "Airy-1830" => Some(Self::Airy1830),
            _ => None,
        }
    }

    pub fn semi_major_km(self) -> f64 {
        match self {
            Self::Wgs84 | Self::Grs80 => 6378.137,
            Self::Airy1830 => 6377.563396,
        }
    }

    pub fn flattening(self) -> f64 {
        match self {
            Self::Wgs84 => 1.0 / 298.257223563,
            Self::Grs80 => 1.0 / 298.257222101,
            Self::Airy1830 => 1.0 / 299.3249646,
        }
    }

    pub fn semi_minor_km(self) -> f64 {
        self.semi_major_km() * (1.0 - self.flattening())
    }

    fn mean_radius_km(self) -> f64 {
        (2.0 * self.semi_major_km() + self.semi_minor_km()) / 3.0
    }
}

/// Geodesic distance between two points in km (Vincenty inverse problem).
///
/// Falls back to a spherical great circle on the rare near-antipodal
/// geometry where the iteration does not converge.
pub fn distance(p1: LatLon, p2: LatLon, ellipsoid: Ellipsoid) -> f64 {
    let a = ellipsoid.semi_major_km();
    let b = ellipsoid.semi_minor_km();
    let f = ellipsoid.flattening();

    let phi1 = p1.latitude_deg.to_radians();
    let phi2 = p2.latitude_deg.to_radians();
    let l = (p2.longitude_deg - p1.longitude_deg).to_radians();

    let u1 = ((1.0 - f) * phi1.tan()).atan();
    let u2 = ((1.0 - f) * phi2.tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    for _ in 0..VINCENTY_MAX_ITER {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();
        if sin_sigma == 0.0 {
            return 0.0; // coincident points
        }
        let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        let sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        let cos_2sigma_m = if cos_sq_alpha != 0.0 {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        } else {
            0.0 // both points on the equator
        };
        let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
        let lambda_next = l
            + (1.0 - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m
                            + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

        if (lambda_next - lambda).abs() < VINCENTY_EPS {
            let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
            let big_a =
                1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
            let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
            let delta_sigma = big_b
                * sin_sigma
                * (cos_2sigma_m
                    + big_b / 4.0
                        * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                            - big_b / 6.0
                                * cos_2sigma_m
                                * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                                * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));
            return b * big_a * (sigma - delta_sigma);
        }
        lambda = lambda_next;
    }

    haversine_km(p1, p2, ellipsoid.mean_radius_km())
}

/// Point reached traveling `distance_km` along `course_deg` from `p1`
/// (Vincenty direct problem). A negative distance travels the reciprocal
/// course, which backward extrapolation relies on.
pub fn destination(p1: LatLon, distance_km: f64, course_deg: f64, ellipsoid: Ellipsoid) -> LatLon {
    let a = ellipsoid.semi_major_km();
    let b = ellipsoid.semi_minor_km();
    let f = ellipsoid.flattening();

    let phi1 = p1.latitude_deg.to_radians();
    let (sin_alpha1, cos_alpha1) = course_deg.to_radians().sin_cos();

    let u1 = ((1.0 - f) * phi1.tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let sigma1 = sin_u1.atan2(cos_u1 * cos_alpha1);
    let sin_alpha = cos_u1 * sin_alpha1;
    let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
    let u_sq = cos_sq_alpha * (a * a - b * b) / (b * b);
    let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));

    let mut sigma = distance_km / (b * big_a);
    for _ in 0..VINCENTY_MAX_ITER {
        let cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
        let (sin_sigma, cos_sigma) = sigma.sin_cos();
        let delta_sigma = big_b
            * sin_sigma
            * (cos_2sigma_m
                + big_b / 4.0
                    * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                        - big_b / 6.0
                            * cos_2sigma_m
                            * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                            * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));
        let sigma_next = distance_km / (b * big_a) + delta_sigma;
        if (sigma_next - sigma).abs() < VINCENTY_EPS {
            sigma = sigma_next;
            break;
        }
        sigma = sigma_next;
    }

    let cos_2sigma_m = (2.0 * sigma1 + sigma).cos();
    let (sin_sigma, cos_sigma) = sigma.sin_cos();

    let phi2 = (sin_u1 * cos_sigma + cos_u1 * sin_sigma * cos_alpha1).atan2(
        (1.0 - f)
            * (sin_alpha * sin_alpha
                + (sin_u1 * sin_sigma - cos_u1 * cos_sigma * cos_alpha1).powi(2))
            .sqrt(),
    );
    let lambda = (sin_sigma * sin_alpha1).atan2(cos_u1 * cos_sigma - sin_u1 * sin_sigma * cos_alpha1);
    let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
    let l = lambda
        - (1.0 - c)
            * f
            * sin_alpha
            * (sigma
                + c * sin_sigma
                    * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

    let lon2 = (p1.longitude_deg + l.to_degrees() + 540.0).rem_euclid(360.0) - 180.0;
    LatLon::new(phi2.to_degrees(), lon2)
}

/// Initial great-circle bearing from `p1` to `p2` in degrees from true
/// north, normalized to `[0, 360)`. Spherical-earth approximation; the
/// result feeds [`destination`] directly.
pub fn bearing(p1: LatLon, p2: LatLon) -> f64 {
    let phi1 = p1.latitude_deg.to_radians();
    let phi2 = p2.latitude_deg.to_radians();
    let delta_lambda = (p2.longitude_deg - p1.longitude_deg).to_radians();

    let x = delta_lambda.sin() * phi2.cos();
    let y = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();
    x.atan2(y).to_degrees().rem_euclid(360.0)
}

fn haversine_km(p1: LatLon, p2: LatLon, radius_km: f64) -> f64 {
    let phi1 = p1.latitude_deg.to_radians();
    let phi2 = p2.latitude_deg.to_radians();
    let delta_phi = (p2.latitude_deg - p1.latitude_deg).to_radians();
    let delta_lambda = (p2.longitude_deg - p1.longitude_deg).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    2.0 * radius_km * h.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_degree_of_equatorial_longitude() {
        let d = distance(LatLon::new(0.0, 0.0), LatLon::new(0.0, 1.0), Ellipsoid::Wgs84);
        assert!((d - 111.3195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn one_degree_of_meridional_latitude() {
        let d = distance(LatLon::new(0.0, 0.0), LatLon::new(1.0, 0.0), Ellipsoid::Wgs84);
        assert!((d - 110.574).abs() < 0.05, "got {d}");
    }

    #[test]
    fn coincident_points_have_zero_distance() {
        let p = LatLon::new(42.5, -70.1);
        assert_eq!(distance(p, p, Ellipsoid::Wgs84), 0.0);
    }

    #[test]
    fn bearing_cardinal_directions() {
        let origin = LatLon::new(0.0, 0.0);
        assert!((bearing(origin, LatLon::new(0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!(bearing(origin, LatLon::new(1.0, 0.0)).abs() < 1e-9);
        assert!((bearing(origin, LatLon::new(0.0, -1.0)) - 270.0).abs() < 1e-9);
        assert!((bearing(origin, LatLon::new(-1.0, 0.0)) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn round_trip_along_meridian() {
        let p = LatLon::new(10.0, 20.0);
        let q = LatLon::new(11.0, 20.0);
        let est = destination(p, distance(p, q, Ellipsoid::Wgs84), bearing(p, q), Ellipsoid::Wgs84);
        assert!(distance(est, q, Ellipsoid::Wgs84) < 0.001); // < 1 m
    }

    #[test]
    fn round_trip_along_equator() {
        let p = LatLon::new(0.0, 5.0);
        let q = LatLon::new(0.0, 6.0);
        let est = destination(p, distance(p, q, Ellipsoid::Wgs84), bearing(p, q), Ellipsoid::Wgs84);
        assert!(distance(est, q, Ellipsoid::Wgs84) < 0.001);
    }

    #[test]
    fn round_trip_oblique_short_range() {
        // The bearing is spherical while distance/destination are
        // ellipsoidal, so an oblique leg closes only to the model mismatch.
        let p = LatLon::new(45.0, 9.0);
        let q = LatLon::new(45.1, 9.1);
        let est = destination(p, distance(p, q, Ellipsoid::Wgs84), bearing(p, q), Ellipsoid::Wgs84);
        assert!(distance(est, q, Ellipsoid::Wgs84) < 0.1);
    }

    #[test]
    fn negative_distance_travels_reciprocal_course() {
        let p = LatLon::new(30.0, -40.0);
        let forward = destination(p, 100.0, 45.0, Ellipsoid::Wgs84);
        let backward = destination(p, -100.0, 225.0, Ellipsoid::Wgs84);
        assert!(distance(forward, backward, Ellipsoid::Wgs84) < 0.001);
    }

    #[test]
    fn alternate_ellipsoid_changes_the_answer() {
        let p = LatLon::new(50.0, 0.0);
        let q = LatLon::new(51.0, 1.0);
        let wgs = distance(p, q, Ellipsoid::Wgs84);
        let airy = distance(p, q, Ellipsoid::Airy1830);
        assert!((wgs - airy).abs() > 1e-4);
    }

    #[test]
    fn ellipsoid_names() {
        assert_eq!(Ellipsoid::from_name("WGS-84"), Some(Ellipsoid::Wgs84));
        assert_eq!(Ellipsoid::from_name("GRS-80"), Some(Ellipsoid::Grs80));
        assert_eq!(Ellipsoid::from_name("bogus"), None);
        assert_eq!(Ellipsoid::Wgs84.to_string(), "WGS-84");
        assert_eq!(Ellipsoid::default(), Ellipsoid::Wgs84);
    }
}
