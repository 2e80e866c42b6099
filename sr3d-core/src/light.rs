//! The directional light used for shading.

use crate::math::{normalized, Vector3};

/// A single directional light plus an ambient term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// Direction the light travels in, world space. Kept unit length by
    /// [`Light::new`].
    pub direction: Vector3,
    /// Brightness added to every lit fragment, in `[0, 1]`.
    pub ambient: f32,
}

impl Light {
    pub fn new(direction: Vector3, ambient: f32) -> Self {
        Self {
            direction: normalized(direction),
            ambient,
        }
    }

    /// Lambertian brightness of a surface with unit normal `n`, clamped to
    /// `[0, 1]` but never below the ambient term.
    #[inline]
    pub fn brightness(&self, n: &Vector3) -> f32 {
        let intensity = n.dot(&-self.direction).max(0.0);
        (self.ambient + intensity).min(1.0)
    }
}

impl Default for Light {
    /// Light from the upper left front, shining down and away from a camera
    /// on the -Z side.
    fn default() -> Self {
        Self::new(Vector3::new(1.0, -1.0, 1.0), 0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_normalized() {
        let light = Light::default();
        assert!((light.direction.norm() - 1.0).abs() < 1e-6);
        assert_eq!(light.ambient, 0.1);
    }

    #[test]
    fn test_brightness() {
        let light = Light::new(Vector3::new(0.0, 0.0, 1.0), 0.1);
        // Facing the light
        assert_eq!(light.brightness(&Vector3::new(0.0, 0.0, -1.0)), 1.0);
        // Facing away, ambient only
        assert_eq!(light.brightness(&Vector3::new(0.0, 0.0, 1.0)), 0.1);
        // Grazing
        assert!((light.brightness(&Vector3::new(1.0, 0.0, 0.0)) - 0.1).abs() < 1e-6);
    }
}
