//! Camera and projection utilities

use crate::math::{look_at_lh, perspective_fov_lh, Matrix44, Vector3};

/// A left-handed perspective camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vector3,
    pub target: Vector3,
    pub up: Vector3,
    /// Vertical field of view in radians
    pub fov: f32,
    /// Width over height
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// The default camera with its aspect ratio set for a `width`×`height`
    /// viewport.
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self::default();
        camera.set_viewport(width, height);
        camera
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix44 {
        look_at_lh(&self.eye, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix44 {
        perspective_fov_lh(self.fov, self.aspect, self.near, self.far)
    }

    /// Matches the aspect ratio to a viewport. Ignored for an empty viewport.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }
}

impl Default for Camera {
    /// Slightly above the origin on the -Z side, looking at it.
    fn default() -> Self {
        Self {
            eye: Vector3::new(0.0, 1.0, -2.0),
            target: Vector3::zeros(),
            up: Vector3::y(),
            fov: std::f32::consts::FRAC_PI_4,
            aspect: 1.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vector4;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(camera.eye, Vector3::new(0.0, 1.0, -2.0));
    }

    #[test]
    fn test_set_viewport_ignores_empty() {
        let mut camera = Camera::new(64, 32);
        camera.set_viewport(10, 0);
        assert_eq!(camera.aspect, 2.0);
    }

    #[test]
    fn test_target_projects_to_center() {
        let camera = Camera::default();
        let clip = camera.projection_matrix() * camera.view_matrix() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!(clip.w > 0.0);
        assert!((clip.x / clip.w).abs() < 1e-6);
        assert!((clip.y / clip.w).abs() < 1e-6);
        let z = clip.z / clip.w;
        assert!(z > 0.0 && z < 1.0, "{z}");
    }
}
