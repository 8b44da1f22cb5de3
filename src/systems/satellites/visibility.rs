use bevy::prelude::*;

use crate::config::{VISIBILITY_GAIN, VISIBILITY_OFFSET};

/// Brightness in `[0, 2]` for a satellite at globe-rotated position `q`.
///
/// Satellites behind the globe's equatorial view plane are dark; facing ones
/// get brighter the closer they sit to the view axis.
pub fn brightness(q: Vec3) -> f32 {
    if !q.is_finite() || q.z <= 0.0 {
        return 0.0;
    }

    let d = q.truncate().length();
    let raw = (VISIBILITY_OFFSET - d).clamp(0.0, 1.0);
    raw * raw * VISIBILITY_GAIN
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_dead_centre_is_max() {
        assert_approx_eq!(brightness(Vec3::new(0.0, 0.0, 1.0)), 2.0, 1e-6);
    }

    #[test]
    fn test_rim_is_dark() {
        assert_eq!(brightness(Vec3::new(3.0, 0.0, 1.0)), 0.0);
        assert_eq!(brightness(Vec3::new(0.0, -6.0, 4.0)), 0.0);
    }

    #[test]
    fn test_facing_away_is_dark() {
        assert_eq!(brightness(Vec3::new(0.0, 0.0, 0.0)), 0.0);
        assert_eq!(brightness(Vec3::new(0.0, 0.0, -1.0)), 0.0);
        assert_eq!(brightness(Vec3::new(0.1, 0.1, -7.0)), 0.0);
    }

    #[test]
    fn test_falloff_is_squared() {
        // d = 2.5, raw = 0.5
        assert_approx_eq!(brightness(Vec3::new(2.5, 0.0, 1.0)), 0.5, 1e-6);
    }

    #[test]
    fn test_non_increasing_with_distance() {
        let mut last = f32::MAX;
        for i in 0..=80 {
            let d = i as f32 * 0.05;
            let b = brightness(Vec3::new(d * 0.6, d * 0.8, 2.0));
            assert!((0.0..=2.0).contains(&b));
            assert!(b <= last, "brightness rose at d = {d}");
            last = b;
        }
    }

    #[test]
    fn test_nan_input_stays_dark() {
        assert_eq!(brightness(Vec3::new(0.0, 0.0, f32::NAN)), 0.0);
    }
}
