//! layerblend merges a stack of positioned image layers into one new layer.
//!
//! The compositor is a pure function of its inputs: callers hand over a list of [`Layer`]s
//! (topmost first) plus [`BlendOptions`], and get back a [`BlendOutput`] covering the union of
//! all layer rectangles. Nothing is written back to the input layers.
//!
//! # Pipeline overview
//!
//! 1. **Bounds**: the canvas is the bounding box of every layer rectangle.
//! 2. **Fold**: layers are processed bottommost first. The first contributing layer seeds the
//!    accumulator, the rest are folded in with the selected [`BlendMode`].
//! 3. **Finalize**: accumulated values are normalized, rounded half up and clamped to RGBA8.
//!
//! Per-pixel contributions are scaled by pixel alpha, layer opacity, the seam falloff of
//! [`EdgeParams`] and the `(w<number>)` weight parsed from the layer name.
//!
//! [`LayerStack`] is a small JSON-backed host for loading layers from image files; the
//! `layerblend` binary drives it from the command line.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod blend;
mod foundation;
mod layer;
mod stack;

pub use crate::foundation::core::{CanvasRect, Point, Rgb8};
pub use crate::foundation::error::{BlendError, BlendResult};

pub use crate::layer::model::{FULL_OPACITY, Layer, merged_layer_name};
pub use crate::layer::pixels::{PixelBuffer, PixelFormat};
pub use crate::layer::weight::{DEFAULT_WEIGHT, is_contributing, parse_weight};

pub use crate::blend::bounds::canvas_bounds;
pub use crate::blend::engine::{
    BlendOptions, BlendProgress, NoProgress, blend_layers, blend_layers_with_progress,
};
pub use crate::blend::falloff::{AxisFalloff, EdgeFalloff, EdgeParams};
pub use crate::blend::mode::BlendMode;
pub use crate::blend::output::BlendOutput;

pub use crate::stack::manifest::{LayerFilter, LayerStack, StackLayer, normalize_rel_path};
