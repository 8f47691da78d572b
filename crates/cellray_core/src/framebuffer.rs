//! Output pixel buffer and file export.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::hdr::HdrEncoder;
use image::{Rgb, RgbaImage};
use thiserror::Error;

use crate::Colour;

/// Errors that can occur while writing an image to disk.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Buffer of {len} bytes does not match a {width}x{height} image")]
    SizeMismatch { width: u32, height: u32, len: usize },
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Row-major buffer of linear RGBA colours.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Colour>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Colour::ZERO; width as usize * height as usize],
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Colour {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, colour: Colour) {
        let i = self.index(x, y);
        self.pixels[i] = colour;
    }

    /// Copy a `width`-wide block of row-major pixels into the image with its
    /// top-left corner at (x, y).
    pub fn blit(&mut self, x: u32, y: u32, width: u32, block: &[Colour]) {
        if width == 0 {
            return;
        }
        for (row, chunk) in block.chunks(width as usize).enumerate() {
            let start = self.index(x, y + row as u32);
            self.pixels[start..start + chunk.len()].copy_from_slice(chunk);
        }
    }

    /// Convert to 8-bit RGBA with gamma correction.
    pub fn to_rgba8(&self, gamma: f32) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for colour in &self.pixels {
            let c = encode_gamma(*colour, gamma);
            bytes.extend_from_slice(&[
                quantize(c.x),
                quantize(c.y),
                quantize(c.z),
                quantize(colour.w),
            ]);
        }
        bytes
    }

    /// Write an 8-bit PNG.
    pub fn save_png(&self, path: impl AsRef<Path>, gamma: f32) -> ExportResult<()> {
        let bytes = self.to_rgba8(gamma);
        let len = bytes.len();
        let img = RgbaImage::from_raw(self.width, self.height, bytes).ok_or(
            ExportError::SizeMismatch {
                width: self.width,
                height: self.height,
                len,
            },
        )?;
        img.save(path.as_ref())?;
        log::info!("Wrote {}", path.as_ref().display());
        Ok(())
    }

    /// Write a Radiance HDR file. Alpha is dropped.
    pub fn save_hdr(&self, path: impl AsRef<Path>, gamma: f32) -> ExportResult<()> {
        let rgb: Vec<Rgb<f32>> = self
            .pixels
            .iter()
            .map(|c| {
                let c = encode_gamma(*c, gamma);
                Rgb([c.x, c.y, c.z])
            })
            .collect();

        let writer = BufWriter::new(File::create(path.as_ref())?);
        HdrEncoder::new(writer).encode(&rgb, self.width as usize, self.height as usize)?;
        log::info!("Wrote {}", path.as_ref().display());
        Ok(())
    }
}

/// Raise RGB to `1 / gamma`. Non-positive gamma leaves the colour linear.
fn encode_gamma(colour: Colour, gamma: f32) -> Colour {
    if gamma <= 0.0 || gamma == 1.0 {
        return colour;
    }
    let inv = 1.0 / gamma;
    Colour::new(
        colour.x.max(0.0).powf(inv),
        colour.y.max(0.0).powf(inv),
        colour.z.max(0.0).powf(inv),
        colour.w,
    )
}

#[inline]
fn quantize(c: f32) -> u8 {
    (255.99 * c.clamp(0.0, 1.0)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_get_set_row_major() {
        let mut img = ImageBuffer::new(3, 2);
        img.set(2, 1, Colour::ONE);

        assert_eq!(img.get(2, 1), Colour::ONE);
        assert_eq!(img.pixels[5], Colour::ONE);
        assert_eq!(img.get(0, 0), Colour::ZERO);
    }

    #[test]
    fn test_blit_places_block() {
        let mut img = ImageBuffer::new(4, 4);
        let block = vec![Colour::ONE; 4];
        img.blit(1, 2, 2, &block);

        assert_eq!(img.get(1, 2), Colour::ONE);
        assert_eq!(img.get(2, 3), Colour::ONE);
        assert_eq!(img.get(0, 2), Colour::ZERO);
        assert_eq!(img.get(3, 3), Colour::ZERO);
        assert_eq!(img.pixels.iter().filter(|c| **c == Colour::ONE).count(), 4);
    }

    #[test]
    fn test_to_rgba8_gamma() {
        let mut img = ImageBuffer::new(2, 1);
        img.set(0, 0, Colour::new(0.25, 1.0, 2.0, 1.0));
        img.set(1, 0, Colour::new(0.0, 0.0, 0.0, 0.0));

        let bytes = img.to_rgba8(2.0);
        // sqrt(0.25) = 0.5
        assert_eq!(bytes[..4], [127, 255, 255, 255]);
        assert_eq!(bytes[4..], [0, 0, 0, 0]);

        let linear = img.to_rgba8(1.0);
        assert_eq!(linear[0], 63);
    }

    #[test]
    fn test_save_png_and_hdr() {
        let dir = std::env::temp_dir();
        let png = dir.join("cellray_image_test.png");
        let hdr = dir.join("cellray_image_test.hdr");

        let mut img = ImageBuffer::new(4, 3);
        img.set(1, 1, Colour::new(1.0, 0.5, 0.25, 1.0));

        img.save_png(&png, 2.2).expect("png export");
        img.save_hdr(&hdr, 1.0).expect("hdr export");

        let decoded = image::open(&png).expect("decode png").to_rgba8();
        assert_eq!(decoded.dimensions(), (4, 3));
        assert_eq!(decoded.get_pixel(1, 1)[0], 255);

        let _ = std::fs::remove_file(png);
        let _ = std::fs::remove_file(hdr);
    }
}
