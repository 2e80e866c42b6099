//! Triangle and line rasterization.
//!
//! Triangles are filled by testing every pixel center of their clamped
//! bounding box against barycentric coordinates. Depth is interpolated
//! linearly in screen space and tested against the target's depth buffer.

use crate::color;
use crate::light::Light;
use crate::math::{normalize, Vector3};
use crate::stats::Throughput;
use crate::target::RenderTarget;

/// Barycentric coordinates of `(x, y)` with respect to the screen-space
/// triangle `v0 v1 v2`. Only the x and y components of the vertices are used.
///
/// The weights always sum to one. For a zero-area triangle the divisions
/// produce infinities or NaN.
#[inline]
pub fn barycentric(x: f32, y: f32, v0: &Vector3, v1: &Vector3, v2: &Vector3) -> (f32, f32, f32) {
    let c0 = (x * (v1.y - v2.y) + (v2.x - v1.x) * y + v1.x * v2.y - v2.x * v1.y)
        / (v0.x * (v1.y - v2.y) + (v2.x - v1.x) * v0.y + v1.x * v2.y - v2.x * v1.y);
    let c1 = (x * (v2.y - v0.y) + (v0.x - v2.x) * y + v2.x * v0.y - v0.x * v2.y)
        / (v1.x * (v2.y - v0.y) + (v0.x - v2.x) * v1.y + v2.x * v0.y - v0.x * v2.y);
    (c0, c1, 1.0 - c0 - c1)
}

/// Twice the signed area of the screen-space triangle.
#[inline]
fn doubled_area(v0: &Vector3, v1: &Vector3, v2: &Vector3) -> f32 {
    (v1.x - v0.x) * (v2.y - v0.y) - (v2.x - v0.x) * (v1.y - v0.y)
}

/// Returns `base` with its color channels scaled by the light's brightness
/// for unit normal `n`.
#[inline]
pub fn shade(base: u32, n: &Vector3, light: &Light) -> u32 {
    color::scale(base, light.brightness(n))
}

/// Fills a screen-space triangle.
///
/// `screen` holds `(pixel x, pixel y, depth)` per vertex. A pixel is covered
/// if its center has non-negative barycentric weights, and written if its
/// interpolated depth is strictly less than the stored one. If `normals` is
/// given the color is Lambert shaded with the interpolated normal; otherwise
/// `color` is written as is.
///
/// Triangles with a zero or non-finite area are skipped. Returns how many
/// pixels were covered and how many of those were written.
pub fn draw_triangle(
    target: &mut RenderTarget,
    screen: &[Vector3; 3],
    normals: Option<&[Vector3; 3]>,
    light: &Light,
    color: u32,
) -> Throughput {
    let [v0, v1, v2] = screen;
    let area = doubled_area(v0, v1, v2);
    if !area.is_finite() || area.abs() <= f32::EPSILON {
        return Throughput::default();
    }

    let (w, h) = (target.width() as i32, target.height() as i32);
    let min_x = (v0.x.min(v1.x).min(v2.x).floor() as i32).max(0);
    let max_x = (v0.x.max(v1.x).max(v2.x).ceil() as i32).min(w - 1);
    let min_y = (v0.y.min(v1.y).min(v2.y).floor() as i32).max(0);
    let max_y = (v0.y.max(v1.y).max(v2.y).ceil() as i32).min(h - 1);

    let mut frags = Throughput::default();
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let (c0, c1, c2) = barycentric(x as f32 + 0.5, y as f32 + 0.5, v0, v1, v2);
            if c0 < 0.0 || c1 < 0.0 || c2 < 0.0 || c2.is_nan() {
                continue;
            }
            frags.i += 1;

            let depth = c0 * v0.z + c1 * v1.z + c2 * v2.z;
            let color = match normals {
                Some([n0, n1, n2]) => {
                    let mut n = n0 * c0 + n1 * c1 + n2 * c2;
                    normalize(&mut n);
                    shade(color, &n, light)
                }
                None => color,
            };
            let Some(i) = target.index(x, y) else {
                continue;
            };
            if target.test_and_set(i, depth, color) {
                frags.o += 1;
            }
        }
    }
    frags
}

/// Draws a line with Bresenham's algorithm. Both endpoints are included.
/// Ignores and leaves untouched the depth buffer. Pixels outside the target
/// are skipped.
pub fn draw_line(target: &mut RenderTarget, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };

    let (mut x, mut y) = (x0, y0);
    let mut err = dx + dy;
    loop {
        target.set_pixel(x, y, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}
