use crate::types::Coordinates;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points, in kilometres, using the haversine formula.
///
/// Inputs are in degrees and converted to radians internally.
pub fn haversine_km(a: &Coordinates, b: &Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair outside [0, 1] for identical or antipodal points, and sqrt/asin would then
    // return NaN.
    let h = h.clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

#[cfg(test)]
mod test {
    use super::*;

    fn coords(lat: f64, lon: f64) -> Coordinates {
        Coordinates::new(lat, lon).unwrap()
    }

    #[test]
    fn distance_from_a_point_to_itself_is_zero() {
        let ikeja = coords(6.6018, 3.3515);
        assert_eq!(haversine_km(&ikeja, &ikeja), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let ikeja = coords(6.6018, 3.3515);
        let yaba = coords(6.5095, 3.3711);
        assert_eq!(haversine_km(&ikeja, &yaba), haversine_km(&yaba, &ikeja));
    }

    #[test]
    fn known_distance_across_lagos() {
        // Ikeja to Victoria Island is a little under 21 km as the crow flies.
        let ikeja = coords(6.6018, 3.3515);
        let vi = coords(6.4281, 3.4219);
        let d = haversine_km(&ikeja, &vi);
        assert!((d - 20.82).abs() < 0.1, "expected ~20.82 km, got {d}");
    }

    #[test]
    fn antipodal_points_stay_finite() {
        let a = coords(0.0, 0.0);
        let b = coords(0.0, 180.0);
        let d = haversine_km(&a, &b);
        assert!(d.is_finite());
        // Half the Earth's circumference.
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 0.5, "got {d}");
    }

    #[test]
    fn nearly_identical_points_stay_finite() {
        let a = coords(52.5200, 13.4050);
        let b = coords(52.5200, 13.4050 + 1e-13);
        let d = haversine_km(&a, &b);
        assert!(d.is_finite());
        assert!(d < 1e-6);
    }
}
