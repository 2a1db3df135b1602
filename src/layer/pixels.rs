use std::sync::Arc;

use crate::foundation::error::{BlendError, BlendResult};

/// Byte layout of a layer's pixel rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PixelFormat {
    /// Three bytes per pixel, implicitly opaque.
    Rgb8,
    /// Four bytes per pixel, straight (non-premultiplied) alpha last.
    Rgba8,
}

impl PixelFormat {
    /// Bytes per pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgb8 => 3,
            Self::Rgba8 => 4,
        }
    }

    /// Whether pixels carry their own alpha byte.
    pub fn has_alpha(self) -> bool {
        matches!(self, Self::Rgba8)
    }
}

/// Immutable, tightly packed row-major pixel storage for one layer.
///
/// Construction checks that the byte length matches `width * height * bpp`, so row reads never
/// go out of bounds. Cloning is cheap: the bytes are shared.
#[derive(Clone, Debug)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Arc<Vec<u8>>,
}

impl PixelBuffer {
    /// Wrap raw bytes, validating dimensions against the byte length.
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> BlendResult<Self> {
        if width == 0 || height == 0 {
            return Err(BlendError::validation(format!(
                "pixel buffer must be non-empty (got {width}x{height})"
            )));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(format.bytes_per_pixel()))
            .ok_or_else(|| BlendError::validation("pixel buffer size overflow"))?;
        if data.len() != expected {
            return Err(BlendError::validation(format!(
                "pixel buffer for {width}x{height} {format:?} expects {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            format,
            data: Arc::new(data),
        })
    }

    /// Fill a buffer with a single color. `px` must hold 3 or 4 bytes.
    pub fn solid(width: u32, height: u32, px: &[u8]) -> BlendResult<Self> {
        let format = match px.len() {
            3 => PixelFormat::Rgb8,
            4 => PixelFormat::Rgba8,
            n => {
                return Err(BlendError::validation(format!(
                    "solid pixel must have 3 or 4 channels, got {n}"
                )));
            }
        };
        let count = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| BlendError::validation("pixel buffer size overflow"))?;
        Self::new(width, height, format, px.repeat(count))
    }

    /// Convert a decoded image, keeping an alpha channel only when the source has one.
    pub fn from_dynamic(img: image::DynamicImage) -> BlendResult<Self> {
        if img.color().has_alpha() {
            let rgba = img.to_rgba8();
            let (w, h) = rgba.dimensions();
            Self::new(w, h, PixelFormat::Rgba8, rgba.into_raw())
        } else {
            let rgb = img.to_rgb8();
            let (w, h) = rgb.dimensions();
            Self::new(w, h, PixelFormat::Rgb8, rgb.into_raw())
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row byte layout.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// One row of `width * bpp` bytes. Panics if `y >= height`.
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.width as usize * self.format.bytes_per_pixel();
        let start = y as usize * stride;
        &self.data[start..start + stride]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/pixels.rs"]
mod tests;
