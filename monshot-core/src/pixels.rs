use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

use image::{codecs::png::PngEncoder, ExtendedColorType, ImageEncoder, Rgba, RgbaImage};

use crate::error::SaveError;

/// Byte order of one 32-bit Z-pixmap pixel as it sits in the reply buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    /// LSB-first servers (x86 and friends): B, G, R, pad.
    Bgrx,
    /// MSB-first servers: pad, R, G, B.
    Xrgb,
}

impl PixelLayout {
    #[inline]
    fn rgb(self, px: &[u8]) -> [u8; 3] {
        match self {
            PixelLayout::Bgrx => [px[2], px[1], px[0]],
            PixelLayout::Xrgb => [px[1], px[2], px[3]],
        }
    }
}

/// Borrowed view over a `GetImage` payload in Z-pixmap format, 4 bytes per pixel.
#[derive(Debug, Clone, Copy)]
pub struct ZPixmap<'a> {
    pub data: &'a [u8],
    pub width: u32,
    pub height: u32,
    /// Bytes per row including scanline padding.
    pub stride: usize,
    pub layout: PixelLayout,
}

impl<'a> ZPixmap<'a> {
    /// Tightly packed rows, the usual 32bpp / 32-bit pad case.
    pub fn packed(data: &'a [u8], width: u32, height: u32, layout: PixelLayout) -> Self {
        Self {
            data,
            width,
            height,
            stride: width as usize * 4,
            layout,
        }
    }
}

/// Bytes per scanline for `width` pixels, rounded up to `scanline_pad` bits.
pub fn scanline_stride(width: u32, bits_per_pixel: u8, scanline_pad: u8) -> usize {
    let bits = width as usize * bits_per_pixel as usize;
    let pad = (scanline_pad as usize).max(8);
    bits.div_ceil(pad) * pad / 8
}

/// Reorders the server's pixels into RGBA with opaque alpha. Pixels the
/// payload is too short for are left as (0, 0, 0, 0).
pub fn zpixmap_to_rgba(pixmap: &ZPixmap<'_>) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width, pixmap.height);
    let expected = pixmap.stride * pixmap.height as usize;
    if pixmap.data.len() < expected {
        log::warn!(
            "image payload is short: {} < {} bytes, missing pixels stay transparent",
            pixmap.data.len(),
            expected
        );
    }

    for y in 0..pixmap.height {
        let row = y as usize * pixmap.stride;
        for x in 0..pixmap.width {
            let idx = row + x as usize * 4;
            if let Some(px) = pixmap.data.get(idx..idx + 4) {
                let [r, g, b] = pixmap.layout.rgb(px);
                img.put_pixel(x, y, Rgba([r, g, b, 255]));
            }
        }
    }
    img
}

pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, SaveError> {
    let mut data = Vec::new();
    write_png(Cursor::new(&mut data), img)?;
    Ok(data)
}

/// Writes `img` as PNG to `path`. The file is closed before returning.
pub fn save_png(img: &RgbaImage, path: &Path) -> Result<(), SaveError> {
    let file = File::create(path).map_err(|source| SaveError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    write_png(&mut writer, img)?;
    writer.flush().map_err(|source| SaveError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

fn write_png<W: Write>(writer: W, img: &RgbaImage) -> Result<(), SaveError> {
    let encoder = PngEncoder::new(writer);
    encoder.write_image(
        img.as_raw(),
        img.width(),
        img.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(())
}
