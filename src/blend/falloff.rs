use crate::foundation::core::CanvasRect;

/// Seam suppression band widths, in pixels, per axis.
///
/// `crop_*` pixels nearest an internal layer edge are dropped; the next `fade_*` pixels ramp
/// linearly up to full contribution. Edges lying on the canvas border are left untouched.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(default)]
pub struct EdgeParams {
    /// Horizontal crop band (left/right edges).
    pub crop_h: u32,
    /// Vertical crop band (top/bottom edges).
    pub crop_v: u32,
    /// Horizontal fade band.
    pub fade_h: u32,
    /// Vertical fade band.
    pub fade_v: u32,
}

/// Falloff along one axis of one layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisFalloff {
    crop: u32,
    fade: u32,
    len: u32,
    leading_internal: bool,
    trailing_internal: bool,
}

impl AxisFalloff {
    /// `start`/`len` locate the layer on this axis, `canvas_start`/`canvas_end` the canvas.
    pub fn new(crop: u32, fade: u32, start: i64, len: u32, canvas_start: i64, canvas_end: i64) -> Self {
        Self {
            crop,
            fade,
            len,
            leading_internal: start > canvas_start,
            trailing_internal: start + i64::from(len) < canvas_end,
        }
    }

    fn band(&self) -> u64 {
        u64::from(self.crop) + u64::from(self.fade)
    }

    fn ramp(&self, d: u32) -> f64 {
        f64::from(d - self.crop + 1) / (f64::from(self.fade) + 1.0)
    }

    /// Contribution factor for local coordinate `i` (`0..len`); `0.0` means cropped.
    pub fn factor(&self, i: u32) -> f64 {
        let band = self.band();
        let mut f: f64 = 1.0;
        if self.leading_internal && u64::from(i) < band {
            if i < self.crop {
                return 0.0;
            }
            f = self.ramp(i);
        }
        if self.trailing_internal {
            let d = self.len - 1 - i;
            if u64::from(d) < band {
                if d < self.crop {
                    return 0.0;
                }
                f = f.min(self.ramp(d));
            }
        }
        f
    }

    /// Factors for every coordinate along the axis.
    pub fn table(&self) -> Vec<f64> {
        (0..self.len).map(|i| self.factor(i)).collect()
    }
}

/// Per-pixel seam falloff for one layer placed on a canvas.
///
/// The two axes are independent; a pixel's factor is the smaller of its row and column factors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeFalloff {
    /// Horizontal axis (columns).
    pub horizontal: AxisFalloff,
    /// Vertical axis (rows).
    pub vertical: AxisFalloff,
}

impl EdgeFalloff {
    /// Build the falloff for `layer` placed on `canvas`.
    pub fn new(params: EdgeParams, layer: CanvasRect, canvas: CanvasRect) -> Self {
        Self {
            horizontal: AxisFalloff::new(
                params.crop_h,
                params.fade_h,
                layer.x,
                layer.width,
                canvas.x,
                canvas.right(),
            ),
            vertical: AxisFalloff::new(
                params.crop_v,
                params.fade_v,
                layer.y,
                layer.height,
                canvas.y,
                canvas.bottom(),
            ),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/blend/falloff.rs"]
mod tests;
