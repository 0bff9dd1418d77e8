//! Easing curves for element transitions

use serde::{Deserialize, Serialize};

/// Easing curve applied to a transition's progress
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant rate
    Linear,
    /// Starts slow and speeds up (quadratic)
    Accelerate,
    /// Starts fast and slows down (quadratic)
    Decelerate,
    /// Slow at both ends, fastest in the middle (cosine)
    #[default]
    AccelerateDecelerate,
}

impl Easing {
    /// Map linear progress (0.0 to 1.0) onto the curve
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::Accelerate => t * t,
            Easing::Decelerate => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::AccelerateDecelerate => ((t + 1.0) * std::f32::consts::PI).cos() / 2.0 + 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: [Easing; 4] = [
        Easing::Linear,
        Easing::Accelerate,
        Easing::Decelerate,
        Easing::AccelerateDecelerate,
    ];

    #[test]
    fn test_endpoints_are_exact() {
        for easing in CURVES {
            assert!(easing.apply(0.0).abs() < 1e-6, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_out_of_range_progress_is_clamped() {
        assert_eq!(Easing::Linear.apply(-0.5), 0.0);
        assert_eq!(Easing::Decelerate.apply(3.0), 1.0);
    }

    #[test]
    fn test_accelerate_and_decelerate_bracket_linear() {
        let t = 0.3;
        assert!(Easing::Accelerate.apply(t) < t);
        assert!(Easing::Decelerate.apply(t) > t);
        assert!((Easing::AccelerateDecelerate.apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_easing_from_config_name() {
        #[derive(Deserialize)]
        struct Wrapper {
            easing: Easing,
        }
        let parsed: Wrapper = toml::from_str("easing = \"decelerate\"").unwrap();
        assert_eq!(parsed.easing, Easing::Decelerate);
    }
}
