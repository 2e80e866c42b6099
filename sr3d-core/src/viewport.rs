//! Clip space to screen space.

use crate::math::{Vector3, Vector4};

/// Maps a clip-space position to `(pixel x, pixel y, depth)`.
///
/// Performs the perspective divide, then scales NDC `[-1, 1]` onto
/// `[0, width] × [0, height]` with y flipped so that row 0 is the top. Depth
/// is NDC z unchanged.
///
/// `clip.w == 0` yields infinities or NaN; callers reject such vertices first.
#[inline]
pub fn viewport_transform(clip: &Vector4, width: u32, height: u32) -> Vector3 {
    let ndc = clip.xyz() / clip.w;
    Vector3::new(
        (ndc.x + 1.0) * 0.5 * width as f32,
        (1.0 - ndc.y) * 0.5 * height as f32,
        ndc.z,
    )
}
