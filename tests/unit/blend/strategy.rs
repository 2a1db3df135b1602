use super::*;
use crate::blend::accum::Samples;

struct Slot {
    totals: [f64; 4],
    counts: [f64; 4],
    samples: [Samples; 3],
}

impl Slot {
    fn empty() -> Self {
        Self {
            totals: [0.0; 4],
            counts: [0.0, 0.0, 0.0, 1.0],
            samples: Default::default(),
        }
    }

    fn apply(&mut self, s: &impl Strategy, rgb: [u8; 3], a: f64) {
        let mut px = PixelAccum {
            totals: &mut self.totals,
            counts: &mut self.counts,
            samples: &mut self.samples,
        };
        s.apply(&mut px, rgb, a);
    }

    fn value(&self, i: usize) -> f64 {
        self.totals[i] / self.counts[i]
    }
}

fn seeded(rgb: [u8; 3], a: f64) -> Slot {
    let mut slot = Slot::empty();
    slot.apply(&Seed { samples: false }, rgb, a);
    slot
}

#[test]
fn seed_stores_premultiplied_totals() {
    let slot = seeded([100, 50, 0], 127.5);
    assert_eq!(slot.totals, [50.0, 25.0, 0.0, 127.5]);
    assert_eq!(slot.counts, [0.5, 0.5, 0.5, 1.0]);
}

#[test]
fn seed_starts_sample_lists_in_median_mode() {
    let mut slot = Slot::empty();
    slot.apply(&Seed { samples: true }, [1, 2, 3], 255.0);
    assert_eq!(slot.samples[1].as_slice(), &[2]);
    assert_eq!(slot.counts[0], 0.0);
    assert_eq!(slot.totals[ALPHA], 255.0);
}

#[test]
fn average_accumulates_weighted_sums() {
    let mut slot = seeded([0, 100, 200], 255.0);
    slot.apply(&Average, [100, 100, 0], 255.0);
    assert_eq!(slot.value(0), 50.0);
    assert_eq!(slot.value(1), 100.0);
    assert_eq!(slot.value(2), 100.0);

    // A half-strength contribution counts half: (100 + 125) / 2.5.
    slot.apply(&Average, [250, 100, 100], 127.5);
    assert!((slot.value(0) - 90.0).abs() < 1e-9);
}

#[test]
fn average_keeps_strongest_alpha() {
    let mut slot = seeded([0, 0, 0], 100.0);
    slot.apply(&Average, [0, 0, 0], 50.0);
    assert_eq!(slot.totals[ALPHA], 100.0);
    slot.apply(&Average, [0, 0, 0], 200.0);
    assert_eq!(slot.totals[ALPHA], 200.0);
}

#[test]
fn median_appends_raw_samples() {
    let mut slot = Slot::empty();
    slot.apply(&Seed { samples: true }, [9, 9, 9], 255.0);
    slot.apply(&Median, [1, 2, 3], 10.0);
    assert_eq!(slot.samples[0].as_slice(), &[9, 1]);
    assert_eq!(slot.samples[2].as_slice(), &[9, 3]);
    assert_eq!(slot.totals[ALPHA], 255.0);
}

#[test]
fn darken_keeps_minimum_regardless_of_weight() {
    let mut slot = seeded([100, 100, 100], 255.0);
    slot.apply(&Darken, [50, 150, 100], 3.0 * 255.0);
    assert_eq!(slot.value(0), 50.0);
    assert_eq!(slot.value(1), 100.0);
    assert_eq!(slot.value(2), 100.0);
}

#[test]
fn darken_preserves_value_under_partial_seed() {
    let mut slot = seeded([200, 200, 200], 51.0);
    slot.apply(&Darken, [10, 250, 200], 255.0);
    assert!((slot.value(0) - 10.0).abs() < 1e-9);
    assert!((slot.value(1) - 200.0).abs() < 1e-9);
}

#[test]
fn darken_seeds_untouched_channels() {
    let mut slot = Slot::empty();
    slot.apply(&Darken, [30, 40, 50], 255.0);
    assert_eq!(slot.totals[..3], [30.0, 40.0, 50.0]);
    assert_eq!(slot.counts[..3], [1.0, 1.0, 1.0]);
}

#[test]
fn lighten_keeps_maximum() {
    let mut slot = seeded([100, 100, 100], 255.0);
    slot.apply(&Lighten, [50, 150, 100], 255.0);
    assert_eq!(slot.value(0), 100.0);
    assert_eq!(slot.value(1), 150.0);
}

#[test]
fn inverse_normal_recovers_underlying_color() {
    // Red at 50% over opaque blue gives (127.5, 0, 127.5) at full alpha.
    let mut slot = seeded([0, 0, 0], 255.0);
    slot.totals[..3].copy_from_slice(&[127.5, 0.0, 127.5]);
    slot.apply(&InverseNormal, [255, 0, 0], 127.5);
    assert!((slot.value(0) - 0.0).abs() < 1e-9);
    assert!((slot.value(2) - 255.0).abs() < 1e-9);
    assert_eq!(slot.counts[0], 1.0);
    assert!((slot.totals[ALPHA] - 255.0).abs() < 1e-9);
}

#[test]
fn inverse_normal_ignores_opaque_covers_and_empty_pixels() {
    let mut slot = seeded([10, 20, 30], 255.0);
    let before = slot.totals;
    slot.apply(&InverseNormal, [0, 0, 0], 255.0);
    assert_eq!(slot.totals, before);

    let mut empty = Slot::empty();
    empty.apply(&InverseNormal, [5, 5, 5], 100.0);
    assert_eq!(empty.totals, [0.0; 4]);
}

#[test]
fn inverse_normal_without_remaining_alpha_only_sets_alpha() {
    // Existing alpha 25%, cover 50%: remaining = 1 - 0.75 / 0.5 < 0.
    let mut slot = seeded([10, 20, 30], 63.75);
    let colors = slot.totals;
    slot.apply(&InverseNormal, [0, 0, 0], 127.5);
    assert_eq!(slot.totals[..3], colors[..3]);
    assert!((slot.totals[ALPHA] - (-0.5 * 255.0)).abs() < 1e-9);
}

#[test]
fn extract_normal_uses_channel_with_largest_distance() {
    // Accumulated black, reference white; new pixel shows a 40% white overlay on red only.
    let mut slot = seeded([0, 0, 0], 255.0);
    let ex = ExtractNormal {
        reference: [255.0, 255.0, 255.0],
    };
    slot.apply(&ex, [102, 0, 0], 255.0);
    // All distances equal: the first channel (red) wins.
    assert!((slot.totals[ALPHA] - 102.0).abs() < 1e-9);
    assert_eq!(slot.totals[..3], [255.0, 255.0, 255.0]);
    assert_eq!(slot.counts[..3], [1.0, 1.0, 1.0]);
}

#[test]
fn extract_normal_prefers_strictly_farther_channel() {
    let mut slot = seeded([200, 0, 200], 255.0);
    let ex = ExtractNormal {
        reference: [255.0, 255.0, 255.0],
    };
    slot.apply(&ex, [255, 51, 255], 255.0);
    // Green is farthest (255 vs 55).
    assert!((slot.totals[ALPHA] - 51.0).abs() < 1e-9);
}

#[test]
fn extract_normal_zero_distance_gives_zero_alpha() {
    let mut slot = seeded([7, 8, 9], 255.0);
    let ex = ExtractNormal {
        reference: [7.0, 8.0, 9.0],
    };
    slot.apply(&ex, [100, 100, 100], 255.0);
    assert_eq!(slot.totals[ALPHA], 0.0);
}

#[test]
fn extract_normal_measures_from_raw_totals() {
    // Half-transparent base: the running total is 50, not the normalized 100.
    let mut slot = seeded([100, 100, 100], 127.5);
    let ex = ExtractNormal {
        reference: [200.0, 200.0, 200.0],
    };
    slot.apply(&ex, [150, 150, 150], 255.0);
    assert!((slot.totals[ALPHA] - 170.0).abs() < 1e-9);
    assert_eq!(slot.totals[..3], [200.0, 200.0, 200.0]);
}
