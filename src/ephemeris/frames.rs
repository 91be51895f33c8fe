//! Reference-frame conversions shared by the SGP4 ephemeris backend.

// WGS-84 constants used by the geodetic conversions.
const WGS84_A_KM: f64 = 6378.137;
const WGS84_E2: f64 = 0.00669437999014;

/// Rotate a TEME position into ECEF by Greenwich mean sidereal time.
pub fn teme_to_ecef(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let cos_gmst = gmst.cos();
    let sin_gmst = gmst.sin();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

/// Geodetic latitude/longitude/altitude to an ECEF position in km.
pub fn geodetic_to_ecef(lat_rad: f64, lon_rad: f64, alt_km: f64) -> [f64; 3] {
    let sin_lat = lat_rad.sin();
    let cos_lat = lat_rad.cos();
    let sin_lon = lon_rad.sin();
    let cos_lon = lon_rad.cos();
    let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
    let x = (n + alt_km) * cos_lat * cos_lon;
    let y = (n + alt_km) * cos_lat * sin_lon;
    let z = (n * (1.0 - WGS84_E2) + alt_km) * sin_lat;
    [x, y, z]
}

/// ECEF position to geodetic latitude/longitude (radians) and altitude in
/// km, by Bowring's method.
pub fn ecef_to_geodetic(pos: [f64; 3]) -> (f64, f64, f64) {
    let [x, y, z] = pos;
    let lon = y.atan2(x);
    let p = (x * x + y * y).sqrt();
    let b = WGS84_A_KM * (1.0 - WGS84_E2).sqrt();
    let ep2 = (WGS84_A_KM * WGS84_A_KM - b * b) / (b * b);
    let theta = (z * WGS84_A_KM).atan2(p * b);
    let lat = (z + ep2 * b * theta.sin().powi(3))
        .atan2(p - WGS84_E2 * WGS84_A_KM * theta.cos().powi(3));
    let sin_lat = lat.sin();
    let n = WGS84_A_KM / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt();
    let alt = if p > 1e-9 {
        p / lat.cos() - n
    } else {
        z.abs() - b // on the polar axis
    };
    (lat, lon, alt)
}

/// Resolve an ECEF offset into local east/north/up components at the
/// given geodetic position.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geodetic_round_trip() {
        let cases: [(f64, f64, f64); 4] = [
            (0.0, 0.0, 0.0),
            (45.0, 120.0, 2.5),
            (-33.9, 18.4, 0.1),
            (71.2, -156.8, 0.0),
        ];
        for (lat_deg, lon_deg, alt_km) in cases {
            let ecef = geodetic_to_ecef(lat_deg.to_radians(), lon_deg.to_radians(), alt_km);
            let (lat, lon, alt) = ecef_to_geodetic(ecef);
            assert!((lat.to_degrees() - lat_deg).abs() < 1e-6, "lat at {lat_deg}");
            assert!((lon.to_degrees() - lon_deg).abs() < 1e-9, "lon at {lon_deg}");
            assert!((alt - alt_km).abs() < 1e-4, "alt at {lat_deg}");
        }
    }

    #[test]
    fn equatorial_ecef_lands_on_the_semi_major_axis() {
        let ecef = geodetic_to_ecef(0.0, 0.0, 0.0);
        assert!((ecef[0] - 6378.137).abs() < 1e-9);
        assert!(ecef[1].abs() < 1e-9);
        assert!(ecef[2].abs() < 1e-9);
    }

    #[test]
    fn enu_axes_at_the_origin() {
        // At lat 0, lon 0: east is +y, north is +z, up is +x.
        let (e, n, u) = ecef_to_enu([1.0, 2.0, 3.0], 0.0, 0.0);
        assert!((e - 2.0).abs() < 1e-12);
        assert!((n - 3.0).abs() < 1e-12);
        assert!((u - 1.0).abs() < 1e-12);
    }

    #[test]
    fn teme_rotation_preserves_length() {
        let pos = [4000.0, 3000.0, 2000.0];
        let rotated = teme_to_ecef(pos, 1.234);
        let len = |v: [f64; 3]| (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
        assert!((len(pos) - len(rotated)).abs() < 1e-9);
        assert_eq!(pos[2], rotated[2]);
    }
}
