//! Per-pixel reducers folding one source pixel into accumulator state.
//!
//! Each mode is its own zero-sized (or tiny) type so the engine can pick one per layer pass and
//! run a monomorphized row loop, instead of branching on the mode for every pixel.

use crate::blend::accum::{ALPHA, COLOR_CHANNELS, PixelAccum};

/// Folds one source pixel of alpha weight `a` (`> 0`, in `0..=255 * weight`) into `px`.
pub(crate) trait Strategy: Sync {
    fn apply(&self, px: &mut PixelAccum<'_>, rgb: [u8; 3], a: f64);
}

/// Seeds the accumulator from the first contributing layer, without blending.
pub(crate) struct Seed {
    pub(crate) samples: bool,
}

impl Strategy for Seed {
    fn apply(&self, px: &mut PixelAccum<'_>, rgb: [u8; 3], a: f64) {
        if self.samples {
            for (list, c) in px.samples.iter_mut().zip(rgb) {
                list.clear();
                list.push(c);
            }
        } else {
            let af = a / 255.0;
            for (i, c) in rgb.into_iter().enumerate() {
                px.totals[i] = f64::from(c) * af;
                px.counts[i] = af;
            }
        }
        px.totals[ALPHA] = a;
    }
}

pub(crate) struct Average;

impl Strategy for Average {
    fn apply(&self, px: &mut PixelAccum<'_>, rgb: [u8; 3], a: f64) {
        let af = a / 255.0;
        for (i, c) in rgb.into_iter().enumerate() {
            px.totals[i] += f64::from(c) * af;
            px.counts[i] += af;
        }
        px.keep_max_alpha(a);
    }
}

pub(crate) struct Median;

impl Strategy for Median {
    fn apply(&self, px: &mut PixelAccum<'_>, rgb: [u8; 3], a: f64) {
        for (list, c) in px.samples.iter_mut().zip(rgb) {
            list.push(c);
        }
        px.keep_max_alpha(a);
    }
}

pub(crate) struct Darken;

impl Strategy for Darken {
    fn apply(&self, px: &mut PixelAccum<'_>, rgb: [u8; 3], a: f64) {
        keep_extreme(px, rgb, a, |new, current| new < current);
    }
}

pub(crate) struct Lighten;

impl Strategy for Lighten {
    fn apply(&self, px: &mut PixelAccum<'_>, rgb: [u8; 3], a: f64) {
        keep_extreme(px, rgb, a, |new, current| new > current);
    }
}

/// Replaces the normalized value of each channel with `c` when `wins(c, current)`.
///
/// Weight only gates inclusion here: the divisor is kept so the stored value stays exactly `c`.
fn keep_extreme(px: &mut PixelAccum<'_>, rgb: [u8; 3], a: f64, wins: impl Fn(f64, f64) -> bool) {
    for (i, c) in rgb.into_iter().enumerate() {
        let c = f64::from(c);
        if px.counts[i] <= 0.0 {
            px.totals[i] = c;
            px.counts[i] = 1.0;
        } else if wins(c, px.totals[i] / px.counts[i]) {
            px.totals[i] = c * px.counts[i];
        }
    }
    px.keep_max_alpha(a);
}

/// Un-blends a semi-transparent cover: what would have to lie underneath it to produce the
/// color accumulated so far.
pub(crate) struct InverseNormal;

impl Strategy for InverseNormal {
    fn apply(&self, px: &mut PixelAccum<'_>, rgb: [u8; 3], a: f64) {
        if px.totals[ALPHA] <= 0.0 {
            return;
        }
        let af = a / 255.0;
        if af >= 1.0 {
            return;
        }
        let remaining = 1.0 - (1.0 - px.totals[ALPHA] / 255.0) / af;
        if remaining > 0.0 {
            for (i, c) in rgb.into_iter().enumerate() {
                px.totals[i] = (px.totals[i] - f64::from(c) * af) / (1.0 - af) / remaining;
                px.counts[i] = 1.0;
            }
        }
        px.totals[ALPHA] = remaining * 255.0;
    }
}

/// Estimates how strongly `reference` was laid over the accumulated color to give the new one.
///
/// Distances are measured from the raw running totals, so a translucent base counts as darker.
pub(crate) struct ExtractNormal {
    pub(crate) reference: [f64; 3],
}

impl Strategy for ExtractNormal {
    fn apply(&self, px: &mut PixelAccum<'_>, rgb: [u8; 3], _a: f64) {
        if px.totals[ALPHA] <= 0.0 {
            return;
        }
        let mut best = 0.0;
        let mut overlay = None;
        for i in 0..COLOR_CHANNELS {
            let acc = px.totals[i];
            let reference = self.reference[i];
            // Strictly greater: the first of equally distant channels wins.
            let dist = (reference - acc).abs();
            if dist > best {
                best = dist;
                overlay = Some(255.0 * (f64::from(rgb[i]) - acc) / (reference - acc));
            }
            px.totals[i] = reference;
            px.counts[i] = 1.0;
        }
        px.totals[ALPHA] = overlay.unwrap_or(0.0);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/blend/strategy.rs"]
mod tests;
