//! Linear algebra primitives for the pipeline.
//!
//! Vectors and matrices are `nalgebra` types. `Matrix4` stores its elements in
//! column-major order, so linear indexing `m[i]` addresses the same sixteen
//! floats a column-major `float[16]` would, and `a * b` applies `b` first and
//! `a` second.

/// Position, direction, or normal in 3D.
pub type Vector3 = nalgebra::Vector3<f32>;

/// Homogeneous clip-space point.
pub type Vector4 = nalgebra::Vector4<f32>;

/// 4×4 transform, column-major.
pub type Matrix44 = nalgebra::Matrix4<f32>;

/// Normalizes `v` in place.
///
/// Leaves `v` untouched when its length is exactly zero, so callers must not
/// assume a unit result.
#[inline]
pub fn normalize(v: &mut Vector3) {
    v.try_normalize_mut(0.0);
}

/// Returns a normalized copy of `v`, or `v` itself if it has zero length.
#[inline]
pub fn normalized(mut v: Vector3) -> Vector3 {
    normalize(&mut v);
    v
}

/// Returns the identity matrix.
#[inline]
pub fn identity() -> Matrix44 {
    Matrix44::identity()
}

/// Composes two transforms. The result applies `b` first, then `a`.
#[inline]
pub fn multiply(a: &Matrix44, b: &Matrix44) -> Matrix44 {
    a * b
}

/// Left-handed look-at view matrix.
///
/// The camera looks down its local +Z axis. `eye` maps to the origin and
/// `target` onto the positive Z axis. Degenerate if `up` is parallel to the
/// viewing direction; the result then contains zeros or NaNs.
pub fn look_at_lh(eye: &Vector3, target: &Vector3, up: &Vector3) -> Matrix44 {
    let forward = normalized(target - eye);
    let right = normalized(up.cross(&forward));
    let up = forward.cross(&right);

    #[rustfmt::skip]
    let view = Matrix44::new(
        right.x,   right.y,   right.z,   -right.dot(eye),
        up.x,      up.y,      up.z,      -up.dot(eye),
        forward.x, forward.y, forward.z, -forward.dot(eye),
        0.0,       0.0,       0.0,       1.0,
    );
    view
}

/// Left-handed perspective projection with depth mapped to `[0, 1]`.
///
/// View-space depth `z_near` maps to 0 and `z_far` to 1 after the perspective
/// divide. The projected `w` equals the view-space `z`.
pub fn perspective_fov_lh(
    fov_radians: f32,
    aspect: f32,
    z_near: f32,
    z_far: f32,
) -> Matrix44 {
    let y_scale = 1.0 / (fov_radians / 2.0).tan();
    let x_scale = y_scale / aspect;
    let z_range = z_far / (z_far - z_near);

    let mut m = Matrix44::zeros();
    m[0] = x_scale;
    m[5] = y_scale;
    m[10] = z_range;
    m[11] = 1.0;
    m[14] = -z_range * z_near;
    m
}
