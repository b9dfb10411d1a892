//! Decoded RGBA bitmaps for the background and car images
//!
//! Files are decoded with the `image` crate (PNG, JPEG and BMP are enabled)
//! and converted to straight RGBA8.

use std::path::Path;

use image::RgbaImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BitmapError {
    #[error("Failed to load image {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

/// Decoded bitmap in RGBA format, ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedBitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>, // RGBA, 4 bytes per pixel
}

impl DecodedBitmap {
    /// Fully transparent bitmap
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; (width * height * 4) as usize],
        }
    }

    /// RGBA at (x, y), or None outside the bitmap
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        self.pixels.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = ((y * self.width + x) * 4) as usize;
        self.pixels[i..i + 4].copy_from_slice(&rgba);
    }
}

impl From<RgbaImage> for DecodedBitmap {
    fn from(img: RgbaImage) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            pixels: img.into_raw(),
        }
    }
}

/// Load any supported image file as RGBA
pub fn load_image(path: &Path) -> Result<DecodedBitmap, BitmapError> {
    let img = image::open(path).map_err(|source| BitmapError::Decode {
        path: path.display().to_string(),
        source,
    })?;
    let bitmap = DecodedBitmap::from(img.to_rgba8());
    tracing::debug!(
        "Decoded {} ({}x{})",
        path.display(),
        bitmap.width,
        bitmap.height
    );
    Ok(bitmap)
}
