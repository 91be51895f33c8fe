//! Spherical-earth horizon and sensor-footprint geometry.

/// Spherical earth radius in km implied by the definition of the nautical
/// mile.
pub const EARTH_RADIUS_KM: f64 = 6366.71;

/// Central angle from the sub-satellite point to the visible horizon, in
/// radians, for a spherical earth of radius `radius_km`.
pub fn horizon_angle_rad(altitude_km: f64, radius_km: f64) -> f64 {
    (radius_km / (radius_km + altitude_km)).acos()
}

/// Degree variant of [`horizon_angle_rad`].
pub fn horizon_angle_deg(altitude_km: f64, radius_km: f64) -> f64 {
    horizon_angle_rad(altitude_km, radius_km).to_degrees()
}

/// Ground angle subtended by a circular sensor field of view of half-angle
/// `half_fov_deg`, in radians. Saturates at the horizon angle once the
/// half-FOV reaches the limb.
pub fn fov_ground_angle_rad(half_fov_deg: f64, altitude_km: f64, radius_km: f64) -> f64 {
    let fov = half_fov_deg.to_radians();
    let horizon_limit = (radius_km / (radius_km + altitude_km)).asin();
    if fov >= horizon_limit {
        horizon_angle_rad(altitude_km, radius_km)
    } else {
        ((radius_km + altitude_km) / radius_km * fov.sin()).asin() - fov
    }
}

/// Degree variant of [`fov_ground_angle_rad`].
pub fn fov_ground_angle_deg(half_fov_deg: f64, altitude_km: f64, radius_km: f64) -> f64 {
    fov_ground_angle_rad(half_fov_deg, altitude_km, radius_km).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_altitude_sees_no_horizon() {
        assert_eq!(horizon_angle_deg(0.0, EARTH_RADIUS_KM), 0.0);
    }

    #[test]
    fn horizon_angle_grows_with_altitude() {
        let altitudes = [0.0, 100.0, 400.0, 1000.0, 20000.0, 36000.0];
        for pair in altitudes.windows(2) {
            let lower = horizon_angle_deg(pair[0], EARTH_RADIUS_KM);
            let higher = horizon_angle_deg(pair[1], EARTH_RADIUS_KM);
            assert!(higher > lower, "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn footprint_never_exceeds_horizon() {
        for altitude_km in [100.0, 400.0, 1000.0, 36000.0] {
            let horizon = horizon_angle_deg(altitude_km, EARTH_RADIUS_KM);
            for half_fov_deg in [0.5, 5.0, 15.0, 45.0, 80.0, 89.9] {
                let footprint = fov_ground_angle_deg(half_fov_deg, altitude_km, EARTH_RADIUS_KM);
                assert!(
                    footprint <= horizon + 1e-9,
                    "fov {half_fov_deg} alt {altitude_km}: {footprint} > {horizon}"
                );
            }
        }
    }

    #[test]
    fn wide_fov_saturates_at_horizon() {
        let altitude_km = 500.0;
        let saturated = fov_ground_angle_deg(89.0, altitude_km, EARTH_RADIUS_KM);
        let horizon = horizon_angle_deg(altitude_km, EARTH_RADIUS_KM);
        assert!((saturated - horizon).abs() < 1e-9);
    }

    #[test]
    fn degree_and_radian_variants_agree() {
        let deg = horizon_angle_deg(400.0, EARTH_RADIUS_KM);
        let rad = horizon_angle_rad(400.0, EARTH_RADIUS_KM);
        assert!((deg - rad.to_degrees()).abs() < 1e-12);

        let deg = fov_ground_angle_deg(10.0, 400.0, EARTH_RADIUS_KM);
        let rad = fov_ground_angle_rad(10.0, 400.0, EARTH_RADIUS_KM);
        assert!((deg - rad.to_degrees()).abs() < 1e-12);
    }
}
