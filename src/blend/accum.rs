use std::ops::Range;

use smallvec::SmallVec;

use crate::foundation::error::{BlendError, BlendResult};

/// Raw per-channel samples kept by the median mode.
pub(crate) type Samples = SmallVec<[u8; 8]>;

/// Accumulator slots per pixel (R, G, B, A).
pub(crate) const CHANNELS: usize = 4;
/// Color channels per pixel.
pub(crate) const COLOR_CHANNELS: usize = 3;
/// Index of the alpha slot inside a pixel.
pub(crate) const ALPHA: usize = 3;

/// Running per-pixel state for one compositing run.
///
/// Color slots hold a weighted total and its divisor. The alpha slot total holds the strongest
/// alpha seen (or a mode-specific alpha), with a fixed divisor of 1. Sample lists exist only
/// when the run needs them (median).
pub(crate) struct Accumulator {
    width: usize,
    totals: Vec<f64>,
    counts: Vec<f64>,
    samples: Vec<Samples>,
}

impl Accumulator {
    pub(crate) fn new(width: u32, height: u32, track_samples: bool) -> BlendResult<Self> {
        let px = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| BlendError::composite("canvas pixel count overflow"))?;
        let len = px
            .checked_mul(CHANNELS)
            .ok_or_else(|| BlendError::composite("accumulator size overflow"))?;

        let counts = [0.0, 0.0, 0.0, 1.0].repeat(px);
        let samples = if track_samples {
            vec![Samples::new(); px * COLOR_CHANNELS]
        } else {
            Vec::new()
        };

        Ok(Self {
            width: width as usize,
            totals: vec![0.0; len],
            counts,
            samples,
        })
    }

    /// Disjoint mutable views over canvas rows `rows`.
    pub(crate) fn rows_mut(&mut self, rows: Range<usize>) -> Vec<AccumRow<'_>> {
        let stride = self.width * CHANNELS;
        let sample_stride = self.width * COLOR_CHANNELS;
        let totals = self.totals[rows.start * stride..rows.end * stride].chunks_mut(stride.max(1));
        let counts = self.counts[rows.start * stride..rows.end * stride].chunks_mut(stride.max(1));
        let mut samples = self
            .samples
            .get_mut(rows.start * sample_stride..rows.end * sample_stride)
            .unwrap_or_default()
            .chunks_mut(sample_stride.max(1));

        totals
            .zip(counts)
            .map(|(totals, counts)| AccumRow {
                totals,
                counts,
                samples: samples.next().unwrap_or_default(),
            })
            .collect()
    }

    pub(crate) fn into_parts(self) -> (Vec<f64>, Vec<f64>, Vec<Samples>) {
        (self.totals, self.counts, self.samples)
    }
}

/// Mutable view over one canvas row of accumulator state.
pub(crate) struct AccumRow<'a> {
    totals: &'a mut [f64],
    counts: &'a mut [f64],
    samples: &'a mut [Samples],
}

impl AccumRow<'_> {
    /// State of the pixel at canvas column `x`.
    pub(crate) fn pixel(&mut self, x: usize) -> PixelAccum<'_> {
        let n = x * CHANNELS;
        let s = x * COLOR_CHANNELS;
        PixelAccum {
            totals: &mut self.totals[n..n + CHANNELS],
            counts: &mut self.counts[n..n + CHANNELS],
            samples: self
                .samples
                .get_mut(s..s + COLOR_CHANNELS)
                .unwrap_or_default(),
        }
    }
}

/// Accumulator slots of a single pixel.
pub(crate) struct PixelAccum<'a> {
    /// Four running totals, alpha last.
    pub(crate) totals: &'a mut [f64],
    /// Four divisors, alpha last.
    pub(crate) counts: &'a mut [f64],
    /// Three sample lists in median mode, empty otherwise.
    pub(crate) samples: &'a mut [Samples],
}

impl PixelAccum<'_> {
    pub(crate) fn keep_max_alpha(&mut self, a: f64) {
        if a > self.totals[ALPHA] {
            self.totals[ALPHA] = a;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/blend/accum.rs"]
mod tests;
