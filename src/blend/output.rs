use std::path::Path;

use anyhow::Context as _;

use crate::{
    blend::mode::BlendMode,
    foundation::core::{CanvasRect, Point},
    foundation::error::{BlendError, BlendResult},
};

/// The merged layer produced by one compositing run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlendOutput {
    /// Suggested name for the merged layer (see [`crate::merged_layer_name`]).
    pub name: String,
    /// Canvas top-left corner in the shared coordinate space; place the result here.
    pub origin: Point,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Mode the layers were blended with.
    pub mode: BlendMode,
    /// Straight RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl BlendOutput {
    /// Canvas rectangle covered by the result.
    pub fn rect(&self) -> CanvasRect {
        CanvasRect::new(self.origin.x, self.origin.y, self.width, self.height)
    }

    /// RGBA of canvas pixel `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data
            .get(i..i + 4)
            .and_then(|px| <[u8; 4]>::try_from(px).ok())
    }

    /// Copy into an [`image::RgbaImage`].
    pub fn to_rgba_image(&self) -> BlendResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.data.clone()).ok_or_else(|| {
            BlendError::composite("output buffer does not match its declared dimensions")
        })
    }

    /// Encode as PNG at `path`, creating parent directories as needed.
    pub fn save_png(&self, path: impl AsRef<Path>) -> BlendResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        image::save_buffer_with_format(
            path,
            &self.data,
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/blend/output.rs"]
mod tests;
