//! Packed 32-bit colors.
//!
//! A color is a `u32` whose little-endian bytes are `[r, g, b, a]`, so a
//! framebuffer of them can be handed to any surface expecting RGBA bytes
//! (the "ABGR8888" format of most texture APIs).

/// Opaque black, the color a freshly allocated target is filled with.
pub const BLACK: u32 = rgba(0, 0, 0, 0xFF);

/// Opaque white.
pub const WHITE: u32 = rgba(0xFF, 0xFF, 0xFF, 0xFF);

/// Packs four 8-bit channels.
#[inline]
pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    u32::from_le_bytes([r, g, b, a])
}

/// Packs an opaque color.
#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    rgba(r, g, b, 0xFF)
}

/// Unpacks `[r, g, b, a]`.
#[inline]
pub const fn channels(color: u32) -> [u8; 4] {
    color.to_le_bytes()
}

/// Multiplies the R, G and B channels by `brightness`, truncating toward
/// zero. Alpha is kept as is.
#[inline]
pub fn scale(color: u32, brightness: f32) -> u32 {
    let [r, g, b, a] = channels(color);
    let f = |c: u8| (c as f32 * brightness) as u8;
    rgba(f(r), f(g), f(b), a)
}

/// Perceived brightness in `[0, 1]` (Rec. 601 weights).
#[inline]
pub fn luminance(color: u32) -> f32 {
    let [r, g, b, _] = channels(color);
    (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32) / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_order() {
        let c = rgba(0x11, 0x22, 0x33, 0x44);
        assert_eq!(c, 0x4433_2211);
        assert_eq!(channels(c), [0x11, 0x22, 0x33, 0x44]);
        assert_eq!(BLACK, 0xFF00_0000);
    }

    #[test]
    fn test_scale_truncates_and_keeps_alpha() {
        let c = rgba(0xCC, 0x10, 0xFF, 0x80);
        assert_eq!(scale(c, 1.0), c);
        assert_eq!(scale(c, 0.5), rgba(0x66, 0x08, 0x7F, 0x80));
        assert_eq!(scale(c, 0.0), rgba(0, 0, 0, 0x80));
    }

    #[test]
    fn test_luminance() {
        assert_eq!(luminance(BLACK), 0.0);
        assert!((luminance(WHITE) - 1.0).abs() < 1e-6);
    }
}
