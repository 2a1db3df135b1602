use rayon::prelude::*;

use crate::{
    blend::accum::{AccumRow, Accumulator},
    blend::bounds::canvas_bounds,
    blend::falloff::{AxisFalloff, EdgeFalloff, EdgeParams},
    blend::finalize::finalize,
    blend::mode::BlendMode,
    blend::output::BlendOutput,
    blend::strategy::{self, Strategy},
    foundation::core::{CanvasRect, Rgb8},
    foundation::error::{BlendError, BlendResult},
    layer::model::{FULL_OPACITY, Layer, merged_layer_name},
    layer::weight::is_contributing,
};

/// Options for one compositing run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BlendOptions {
    /// Accumulation rule for layers above the bottommost contributing one.
    pub mode: BlendMode,
    /// Seam crop/fade bands.
    pub edges: EdgeParams,
    /// Reference color for [`BlendMode::ExtractNormal`]; ignored by other modes.
    pub reference_rgb: Rgb8,
    /// Process each layer's rows in parallel.
    pub parallel: bool,
    /// Worker thread count for parallel runs. `None` uses rayon defaults.
    pub threads: Option<usize>,
}

impl Default for BlendOptions {
    fn default() -> Self {
        Self {
            mode: BlendMode::Average,
            edges: EdgeParams::default(),
            reference_rgb: Rgb8::BLACK,
            parallel: false,
            threads: None,
        }
    }
}

impl BlendOptions {
    /// Options with every field at its default except `mode`.
    pub fn with_mode(mode: BlendMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Check option invariants.
    pub fn validate(&self) -> BlendResult<()> {
        if self.threads == Some(0) {
            return Err(BlendError::validation(
                "blend 'threads' must be >= 1 when set",
            ));
        }
        Ok(())
    }
}

/// Best-effort progress observer.
///
/// Called from worker threads in parallel runs, possibly out of order. Implementations must not
/// block; they cannot influence the result.
pub trait BlendProgress: Sync {
    /// A layer starts folding. `index` counts from the bottommost layer.
    fn layer_started(&self, _index: usize, _total: usize, _weight: f64) {}

    /// Overall completion in `[0, 1]`, reported once per processed row.
    fn progress(&self, _fraction: f64) {}
}

/// Progress observer that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl BlendProgress for NoProgress {}

/// Composite `layers` (topmost first) into one merged layer.
///
/// Returns `Ok(None)` when fewer than two layers are given, without looking at them. Otherwise
/// host data is validated up front, so an error means no partial result was produced.
pub fn blend_layers(layers: &[Layer], opts: &BlendOptions) -> BlendResult<Option<BlendOutput>> {
    blend_layers_with_progress(layers, opts, &NoProgress)
}

/// [`blend_layers`] with a progress observer.
#[tracing::instrument(skip_all, fields(layers = layers.len(), mode = %opts.mode))]
pub fn blend_layers_with_progress(
    layers: &[Layer],
    opts: &BlendOptions,
    progress: &dyn BlendProgress,
) -> BlendResult<Option<BlendOutput>> {
    if layers.len() < 2 {
        tracing::debug!("fewer than two layers, nothing to blend");
        return Ok(None);
    }
    opts.validate()?;
    for layer in layers {
        layer.validate()?;
    }

    let canvas = canvas_bounds(layers.iter().map(Layer::rect))?;
    let mut acc = Accumulator::new(
        canvas.width,
        canvas.height,
        opts.mode == BlendMode::Median,
    )?;
    let pool = if opts.parallel {
        Some(build_thread_pool(opts.threads)?)
    } else {
        None
    };
    tracing::debug!(
        x = canvas.x,
        y = canvas.y,
        width = canvas.width,
        height = canvas.height,
        "canvas"
    );

    let total = layers.len();
    let mut seeded = false;
    // Bottommost layer first.
    for (index, layer) in layers.iter().rev().enumerate() {
        let weight = layer.weight();
        if !is_contributing(weight) {
            tracing::debug!(layer = %layer.name, weight, "layer excluded by weight");
            continue;
        }
        tracing::debug!(layer = %layer.name, index, total, weight, "folding layer");
        progress.layer_started(index, total, weight);

        let pass = LayerPass::new(layer, weight, canvas, opts.edges, index, total)?;
        let pool = pool.as_ref();
        if !seeded {
            let seed = strategy::Seed {
                samples: opts.mode == BlendMode::Median,
            };
            pass.run(&seed, &mut acc, pool, progress);
            seeded = true;
            continue;
        }
        match opts.mode {
            BlendMode::Average => pass.run(&strategy::Average, &mut acc, pool, progress),
            BlendMode::Darken => pass.run(&strategy::Darken, &mut acc, pool, progress),
            BlendMode::Lighten => pass.run(&strategy::Lighten, &mut acc, pool, progress),
            BlendMode::InverseNormal => {
                pass.run(&strategy::InverseNormal, &mut acc, pool, progress)
            }
            BlendMode::ExtractNormal => {
                let extract = strategy::ExtractNormal {
                    reference: opts.reference_rgb.to_f64(),
                };
                pass.run(&extract, &mut acc, pool, progress)
            }
            BlendMode::Median => pass.run(&strategy::Median, &mut acc, pool, progress),
        }
    }
    if !seeded {
        tracing::debug!("every layer was excluded by weight");
    }

    let data = finalize(acc);
    progress.progress(1.0);

    Ok(Some(BlendOutput {
        name: merged_layer_name(layers),
        origin: canvas.origin(),
        width: canvas.width,
        height: canvas.height,
        mode: opts.mode,
        data,
    }))
}

/// One layer's placement and attenuation, precomputed before its pixel loop.
struct LayerPass<'a> {
    layer: &'a Layer,
    weight: f64,
    opacity: f64,
    left: usize,
    top: usize,
    columns: Vec<f64>,
    rows: AxisFalloff,
    index: usize,
    total: usize,
}

impl<'a> LayerPass<'a> {
    fn new(
        layer: &'a Layer,
        weight: f64,
        canvas: CanvasRect,
        edges: EdgeParams,
        index: usize,
        total: usize,
    ) -> BlendResult<Self> {
        let rect = layer.rect();
        if !canvas.contains_rect(rect) {
            return Err(BlendError::composite(format!(
                "layer '{}' lies outside the computed canvas",
                layer.name
            )));
        }
        let falloff = EdgeFalloff::new(edges, rect, canvas);
        let to_index = |v: i64| {
            usize::try_from(v)
                .map_err(|_| BlendError::composite("layer offset does not fit in memory"))
        };
        Ok(Self {
            layer,
            weight,
            opacity: layer.opacity / FULL_OPACITY,
            left: to_index(rect.x - canvas.x)?,
            top: to_index(rect.y - canvas.y)?,
            columns: falloff.horizontal.table(),
            rows: falloff.vertical,
            index,
            total,
        })
    }

    fn run<S: Strategy>(
        &self,
        strategy: &S,
        acc: &mut Accumulator,
        pool: Option<&rayon::ThreadPool>,
        progress: &dyn BlendProgress,
    ) {
        let rows = acc.rows_mut(self.top..self.top + self.layer.height() as usize);
        match pool {
            Some(pool) => pool.install(|| {
                rows.into_par_iter()
                    .enumerate()
                    .for_each(|(y, row)| self.fold_row(strategy, y as u32, row, progress));
            }),
            None => {
                for (y, row) in rows.into_iter().enumerate() {
                    self.fold_row(strategy, y as u32, row, progress);
                }
            }
        }
    }

    fn fold_row<S: Strategy>(
        &self,
        strategy: &S,
        y: u32,
        mut row: AccumRow<'_>,
        progress: &dyn BlendProgress,
    ) {
        let height = f64::from(self.layer.height());
        progress.progress((self.index as f64 + f64::from(y) / height) / (self.total as f64 + 1.0));

        let fy = self.rows.factor(y);
        if fy <= 0.0 {
            return;
        }

        let format = self.layer.pixels.format();
        let has_alpha = format.has_alpha();
        let src = self.layer.pixels.row(y);
        for (x, (px, &fx)) in src
            .chunks_exact(format.bytes_per_pixel())
            .zip(&self.columns)
            .enumerate()
        {
            if fx <= 0.0 {
                continue;
            }
            let pixel_alpha = if has_alpha { f64::from(px[3]) } else { 255.0 };
            let a = pixel_alpha * self.opacity * fy.min(fx) * self.weight;
            if a <= 0.0 {
                continue;
            }
            strategy.apply(&mut row.pixel(self.left + x), [px[0], px[1], px[2]], a);
        }
    }
}

fn build_thread_pool(threads: Option<usize>) -> BlendResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| BlendError::composite(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/blend/engine.rs"]
mod tests;
