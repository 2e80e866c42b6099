//! Color and depth buffers.

use crate::color;

/// The color a target is reset to when it is (re)allocated.
pub const DEFAULT_CLEAR: u32 = color::BLACK;

/// Depth value of an empty pixel. Anything nearer passes the depth test.
pub const FAR_DEPTH: f32 = 1.0;

/// A packed-color framebuffer plus a depth buffer of the same size.
///
/// Both buffers are row-major, top row first. Pixel `(x, y)` lives at index
/// `y * width + x` in each.
#[derive(Debug, Clone)]
pub struct RenderTarget {
    width: u32,
    height: u32,
    color: Vec<u32>,
    depth: Vec<f32>,
}

impl RenderTarget {
    /// Allocates a `width`×`height` target cleared to [`DEFAULT_CLEAR`].
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            color: vec![DEFAULT_CLEAR; len],
            depth: vec![FAR_DEPTH; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The packed colors, row-major.
    pub fn color(&self) -> &[u32] {
        &self.color
    }

    /// The depths, row-major.
    pub fn depth(&self) -> &[f32] {
        &self.depth
    }

    /// Fills every pixel with `color` and resets every depth to far.
    pub fn clear(&mut self, color: u32) {
        self.color.fill(color);
        self.depth.fill(FAR_DEPTH);
    }

    /// Reallocates both buffers for a new size.
    ///
    /// Does nothing if either dimension is zero or the size is unchanged.
    /// Otherwise the contents are discarded and reset to [`DEFAULT_CLEAR`]
    /// and far depth. Returns whether the buffers were reallocated.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 || (width, height) == (self.width, self.height) {
            return false;
        }
        log::debug!(
            "resizing render target {}x{} -> {width}x{height}",
            self.width,
            self.height
        );
        *self = Self::new(width, height);
        true
    }

    /// Buffer index of `(x, y)`, or `None` if it is outside the target.
    #[inline]
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        let in_bounds = x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height;
        in_bounds.then(|| y as usize * self.width as usize + x as usize)
    }

    /// Writes a color at `(x, y)`. Coordinates outside the target are ignored.
    /// The depth buffer is not touched.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if let Some(i) = self.index(x, y) {
            self.color[i] = color;
        }
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|i| self.color[i])
    }

    pub fn depth_at(&self, x: i32, y: i32) -> Option<f32> {
        self.index(x, y).map(|i| self.depth[i])
    }

    /// Depth-tested write: stores `color` and `depth` at buffer index `i` if
    /// `depth` is strictly nearer than what is there. Returns whether it did.
    #[inline]
    pub(crate) fn test_and_set(&mut self, i: usize, depth: f32, color: u32) -> bool {
        if depth < self.depth[i] {
            self.depth[i] = depth;
            self.color[i] = color;
            true
        } else {
            false
        }
    }

    /// The framebuffer as RGBA bytes, four per pixel.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.color.iter().flat_map(|&c| color::channels(c)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::rgb;

    #[test]
    fn test_new_is_cleared() {
        let t = RenderTarget::new(4, 3);
        assert_eq!(t.color().len(), 12);
        assert_eq!(t.depth().len(), 12);
        assert!(t.color().iter().all(|&c| c == DEFAULT_CLEAR));
        assert!(t.depth().iter().all(|&d| d == 1.0));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut t = RenderTarget::new(8, 8);
        t.set_pixel(3, 3, rgb(1, 2, 3));
        t.clear(rgb(9, 9, 9));
        let once = (t.color().to_vec(), t.depth().to_vec());
        t.clear(rgb(9, 9, 9));
        assert_eq!(once, (t.color().to_vec(), t.depth().to_vec()));
        assert!(t.color().iter().all(|&c| c == rgb(9, 9, 9)));
        assert!(t.depth().iter().all(|&d| d == 1.0));
    }

    #[test]
    fn test_set_pixel_out_of_bounds_is_ignored() {
        let mut t = RenderTarget::new(2, 2);
        t.set_pixel(-1, 0, rgb(255, 0, 0));
        t.set_pixel(0, 2, rgb(255, 0, 0));
        t.set_pixel(2, 0, rgb(255, 0, 0));
        assert!(t.color().iter().all(|&c| c == DEFAULT_CLEAR));

        t.set_pixel(1, 0, rgb(255, 0, 0));
        assert_eq!(t.pixel(1, 0), Some(rgb(255, 0, 0)));
        assert_eq!(t.color()[1], rgb(255, 0, 0));
        assert_eq!(t.pixel(5, 5), None);
    }

    #[test]
    fn test_resize_resets_contents() {
        let mut t = RenderTarget::new(4, 4);
        t.clear(rgb(10, 20, 30));
        assert!(t.resize(5, 2));
        assert_eq!((t.width(), t.height()), (5, 2));
        assert_eq!(t.color().len(), 10);
        assert_eq!(t.depth().len(), 10);
        assert!(t.color().iter().all(|&c| c == 0xFF00_0000));
        assert!(t.depth().iter().all(|&d| d == 1.0));
    }

    #[test]
    fn test_resize_noop_cases() {
        let mut t = RenderTarget::new(4, 4);
        t.clear(rgb(10, 20, 30));
        assert!(!t.resize(0, 10));
        assert!(!t.resize(10, 0));
        assert!(!t.resize(4, 4));
        assert_eq!((t.width(), t.height()), (4, 4));
        assert!(t.color().iter().all(|&c| c == rgb(10, 20, 30)));
    }

    #[test]
    fn test_depth_test_keeps_first_of_equal() {
        let mut t = RenderTarget::new(1, 1);
        assert!(t.test_and_set(0, 0.5, rgb(1, 0, 0)));
        assert!(!t.test_and_set(0, 0.5, rgb(0, 1, 0)));
        assert!(!t.test_and_set(0, 0.7, rgb(0, 0, 1)));
        assert_eq!(t.pixel(0, 0), Some(rgb(1, 0, 0)));
        assert_eq!(t.depth_at(0, 0), Some(0.5));
    }

    #[test]
    fn test_rgba_bytes() {
        let mut t = RenderTarget::new(2, 1);
        t.set_pixel(0, 0, crate::color::rgba(1, 2, 3, 4));
        assert_eq!(t.to_rgba_bytes(), vec![1, 2, 3, 4, 0, 0, 0, 255]);
    }
}
