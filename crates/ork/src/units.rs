use std::f64::consts::PI;

/// Multiplier turning degrees, as stored in design files, into radians.
pub const DEGREES: f64 = PI / 180.0;

/// Convert an angle from degrees to radians (the canonical internal unit)
///
/// Angles in design files are written in degrees; every angle held by the
/// in-memory model is in radians.
pub fn to_radians(degrees: f64) -> f64 {
    degrees * DEGREES
}

/// Clamp a fraction into `[0, 1]`.
pub fn clamp_fraction(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degrees_to_radians() {
        assert!((to_radians(180.0) - PI).abs() < 1e-12);
        assert!((to_radians(90.0) - PI / 2.0).abs() < 1e-12);
        assert_eq!(to_radians(0.0), 0.0);
    }

    #[test]
    fn test_clamp_fraction() {
        assert_eq!(clamp_fraction(1.5), 1.0);
        assert_eq!(clamp_fraction(-0.1), 0.0);
        assert_eq!(clamp_fraction(0.3), 0.3);
    }
}
