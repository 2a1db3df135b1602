use crate::blend::accum::{Accumulator, CHANNELS, COLOR_CHANNELS, Samples};

/// Resolve accumulator state into straight RGBA8 bytes.
///
/// Sample lists are reduced to their median first, then every slot becomes
/// `round(total / count)` clamped to `0..=255`, or 0 when nothing contributed.
pub(crate) fn finalize(acc: Accumulator) -> Vec<u8> {
    let (mut totals, mut counts, mut samples) = acc.into_parts();
    if !samples.is_empty() {
        resolve_medians(&mut totals, &mut counts, &mut samples);
    }
    totals
        .iter()
        .zip(&counts)
        .map(|(&t, &c)| if c > 0.0 { to_u8(t / c) } else { 0 })
        .collect()
}

fn resolve_medians(totals: &mut [f64], counts: &mut [f64], samples: &mut [Samples]) {
    for (px, lists) in samples.chunks_exact_mut(COLOR_CHANNELS).enumerate() {
        for (i, list) in lists.iter_mut().enumerate() {
            if let Some(m) = median(list) {
                totals[px * CHANNELS + i] = f64::from(m);
                counts[px * CHANNELS + i] = 1.0;
            }
        }
    }
}

/// Middle sample; the rounded-up mean of the two middle samples for even counts.
pub(crate) fn median(samples: &mut [u8]) -> Option<u8> {
    if samples.is_empty() {
        return None;
    }
    samples.sort_unstable();
    let mid = samples.len() / 2;
    if samples.len() % 2 == 1 {
        Some(samples[mid])
    } else {
        let sum = u16::from(samples[mid - 1]) + u16::from(samples[mid]) + 1;
        Some((sum / 2) as u8)
    }
}

/// Round half up and clamp; NaN maps to 0.
fn to_u8(v: f64) -> u8 {
    (v + 0.5).floor().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/blend/finalize.rs"]
mod tests;
