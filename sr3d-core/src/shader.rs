//! Vertex stage.

use crate::geometry::Vertex;
use crate::math::{normalize, Matrix44, Vector3, Vector4};

/// Output of the vertex stage for one vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VsOutput {
    /// Homogeneous clip-space position.
    pub clip_pos: Vector4,
    /// Unit world-space normal, or zero if the input normal was zero.
    pub world_normal: Vector3,
}

/// Transforms one vertex into clip space.
///
/// The position is multiplied by `mvp`. The normal is multiplied by the
/// upper-left 3×3 of `model` and renormalized, which is only exact for
/// rotations, translations and uniform scales; a model with non-uniform
/// scale or shear skews the shading.
///
/// Never fails. Degenerate matrices give NaN or infinite components.
#[inline]
pub fn vertex_shader(vertex: &Vertex, model: &Matrix44, mvp: &Matrix44) -> VsOutput {
    let clip_pos = mvp * vertex.position.push(1.0);
    let mut world_normal = model.fixed_view::<3, 3>(0, 0) * vertex.normal;
    normalize(&mut world_normal);
    VsOutput {
        clip_pos,
        world_normal,
    }
}
