//! Model transforms, rotation state and per-draw uniforms

use crate::math::{Matrix44, Vector3};

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }
}

/// Transform builder for model matrices
pub struct Transform;

impl Transform {
    /// Rotation about X, then Y, then Z
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix44 {
        let rx = Matrix44::new_rotation(Vector3::new(rotation.x, 0.0, 0.0));
        let ry = Matrix44::new_rotation(Vector3::new(0.0, rotation.y, 0.0));
        let rz = Matrix44::new_rotation(Vector3::new(0.0, 0.0, rotation.z));
        rz * ry * rx
    }

    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix44 {
        Matrix44::new_translation(&Vector3::new(x, y, z))
    }

    /// Non-uniform scale. Lighting is only correct for uniform scales, see
    /// [`vertex_shader`][crate::vertex_shader].
    pub fn scale_matrix(sx: f32, sy: f32, sz: f32) -> Matrix44 {
        Matrix44::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    pub fn uniform_scale(s: f32) -> Matrix44 {
        Matrix44::new_scaling(s)
    }

    /// Centers the box `(min, max)` on the origin and scales it uniformly so
    /// that its longest side is one unit long.
    ///
    /// A box with no extent is only centered.
    pub fn fit_unit_cube((min, max): (Vector3, Vector3)) -> Matrix44 {
        let center = (min + max) * 0.5;
        let extent = (max - min).max();
        let scale = if extent > 0.0 && extent.is_finite() {
            1.0 / extent
        } else {
            1.0
        };
        Self::uniform_scale(scale) * Self::translation_matrix(-center.x, -center.y, -center.z)
    }

    /// `projection * view * model`
    pub fn mvp_matrix(model: &Matrix44, view: &Matrix44, projection: &Matrix44) -> Matrix44 {
        projection * (view * model)
    }
}

/// The matrices of one draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniforms {
    /// Object to world.
    pub model: Matrix44,
    /// World to view.
    pub view: Matrix44,
    /// View to clip.
    pub projection: Matrix44,
}

impl Uniforms {
    pub fn new(model: Matrix44, view: Matrix44, projection: Matrix44) -> Self {
        Self {
            model,
            view,
            projection,
        }
    }

    pub fn mvp(&self) -> Matrix44 {
        Transform::mvp_matrix(&self.model, &self.view, &self.projection)
    }
}

impl Default for Uniforms {
    fn default() -> Self {
        let id = Matrix44::identity();
        Self::new(id, id, id)
    }
}
