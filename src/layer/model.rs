use crate::{
    foundation::core::{CanvasRect, Point},
    foundation::error::{BlendError, BlendResult},
    layer::pixels::PixelBuffer,
    layer::weight::parse_weight,
};

/// Fully opaque layer opacity, in percent.
pub const FULL_OPACITY: f64 = 100.0;

/// One positioned image layer handed to the compositor by its host.
///
/// The compositor only reads layers. Size and alpha presence come from [`Layer::pixels`].
#[derive(Clone, Debug)]
pub struct Layer {
    /// Display name; may embed a `(w<number>)` weight token.
    pub name: String,
    /// Top-left corner in the shared coordinate space.
    pub offset: Point,
    /// Layer-wide opacity in percent, `[0, 100]`.
    pub opacity: f64,
    /// Row-major pixel data.
    pub pixels: PixelBuffer,
}

impl Layer {
    /// A fully opaque layer at the origin.
    pub fn new(name: impl Into<String>, pixels: PixelBuffer) -> Self {
        Self {
            name: name.into(),
            offset: Point::default(),
            opacity: FULL_OPACITY,
            pixels,
        }
    }

    /// Builder-style offset setter.
    pub fn with_offset(mut self, x: i64, y: i64) -> Self {
        self.offset = Point::new(x, y);
        self
    }

    /// Builder-style opacity setter (percent).
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Whether pixels carry per-pixel alpha.
    pub fn has_alpha(&self) -> bool {
        self.pixels.format().has_alpha()
    }

    /// Covered rectangle in the shared coordinate space.
    pub fn rect(&self) -> CanvasRect {
        CanvasRect::new(self.offset.x, self.offset.y, self.width(), self.height())
    }

    /// Blend weight parsed from the name.
    pub fn weight(&self) -> f64 {
        parse_weight(&self.name)
    }

    /// Check host-supplied metadata.
    pub fn validate(&self) -> BlendResult<()> {
        if !self.opacity.is_finite() || !(0.0..=FULL_OPACITY).contains(&self.opacity) {
            return Err(BlendError::validation(format!(
                "layer '{}' opacity must be within [0, 100], got {}",
                self.name, self.opacity
            )));
        }
        if self
            .offset
            .x
            .checked_add(i64::from(self.width()))
            .zip(self.offset.y.checked_add(i64::from(self.height())))
            .is_none()
        {
            return Err(BlendError::validation(format!(
                "layer '{}' extends past the coordinate space",
                self.name
            )));
        }
        Ok(())
    }
}

/// Name for the merged layer: `<bottom>-<top>`, each cut at its first `.`.
///
/// `layers` is in host order (topmost first). Returns an empty string for no layers.
pub fn merged_layer_name(layers: &[Layer]) -> String {
    fn stem(name: &str) -> &str {
        name.split_once('.').map_or(name, |(head, _)| head)
    }

    match (layers.first(), layers.last()) {
        (Some(top), Some(bottom)) => format!("{}-{}", stem(&bottom.name), stem(&top.name)),
        _ => String::new(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/model.rs"]
mod tests;
