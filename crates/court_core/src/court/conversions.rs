//! Pixel ↔ meter conversions against a known reference length.

use nalgebra::Point2;

/// Pixel distance → meters, given a reference measured both ways.
///
/// `convert_pixel_distance_to_meters(100.0, 1.8, 200.0) == 0.9`
#[inline]
pub fn convert_pixel_distance_to_meters(
    pixel_distance: f64,
    reference_height_m: f64,
    reference_height_px: f64,
) -> f64 {
    (pixel_distance * reference_height_m) / reference_height_px
}

/// Meters → pixel distance, inverse of [`convert_pixel_distance_to_meters`].
#[inline]
pub fn convert_meters_to_pixel_distance(
    meters: f64,
    reference_height_m: f64,
    reference_height_px: f64,
) -> f64 {
    (meters * reference_height_px) / reference_height_m
}

#[inline]
pub fn measure_distance(a: Point2<f64>, b: Point2<f64>) -> f64 {
    nalgebra::distance(&a, &b)
}

/// Speed in km/h for `distance_m` covered in `elapsed_s`.
#[inline]
pub fn speed_kmh(distance_m: f64, elapsed_s: f64) -> f64 {
    distance_m / elapsed_s * super::constants::timing::MPS_TO_KMH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_meter_conversions() {
        assert!((convert_pixel_distance_to_meters(100.0, 1.8, 200.0) - 0.9).abs() < 1e-12);
        assert!((convert_meters_to_pixel_distance(2.0, 1.8, 1080.0) - 1200.0).abs() < 1e-9);
    }

    #[test]
    fn test_measure_distance() {
        let d = measure_distance(Point2::new(0.0, 0.0), Point2::new(3.0, 4.0));
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_speed_kmh() {
        // 10 m/s
        assert!((speed_kmh(20.0, 2.0) - 36.0).abs() < 1e-12);
    }
}
