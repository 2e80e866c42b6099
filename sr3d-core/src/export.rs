//! Writing render targets out as PNM images.
//!
//! Type | Magic | Contents
//! ---- | ----- | --------
//! PPM  | P6    | the color buffer, 3x8 bpp RGB
//! PGM  | P5    | the depth buffer, 8 bpp, black is near

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::color::channels;
use crate::target::RenderTarget;

/// Writes the color buffer as a binary PPM. Alpha is dropped.
pub fn write_ppm(target: &RenderTarget, mut dest: impl Write) -> io::Result<()> {
    writeln!(dest, "P6 {} {} 255", target.width(), target.height())?;
    let rgb: Vec<u8> = target
        .color()
        .iter()
        .flat_map(|&c| {
            let [r, g, b, _] = channels(c);
            [r, g, b]
        })
        .collect();
    dest.write_all(&rgb)
}

/// Writes the depth buffer as a binary PGM, depth 0 as black and 1 as white.
/// Depths outside `[0, 1]` are clamped.
pub fn write_depth_pgm(target: &RenderTarget, mut dest: impl Write) -> io::Result<()> {
    writeln!(dest, "P5 {} {} 255", target.width(), target.height())?;
    let gray: Vec<u8> = target
        .depth()
        .iter()
        .map(|&d| (d.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect();
    dest.write_all(&gray)
}

/// Saves the color buffer to `path` as a binary PPM.
pub fn save_ppm(target: &RenderTarget, path: impl AsRef<Path>) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_ppm(target, &mut out)?;
    out.flush()
}

/// Saves the depth buffer to `path` as a binary PGM.
pub fn save_depth_pgm(target: &RenderTarget, path: impl AsRef<Path>) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_depth_pgm(target, &mut out)?;
    out.flush()
}
