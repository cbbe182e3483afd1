//! Read-depth normalization of the two sort bins.
//!
//! The deeper library is stochastically downsampled so both bins carry the
//! same effective depth: counts are rescaled by `min(totals) / bin_total`,
//! rounded to integers by unbiased stochastic rounding (floor plus a
//! Bernoulli draw on the fractional remainder), then shifted by a
//! pseudocount of 1 so the guide-wise log-ratio is always defined.

use log::info;
use rand::rngs::StdRng;
use rand::Rng;

use screenpeak_core::models::GuideRecord;

/// Library totals before and after normalization, mostly for logging and
/// tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeSummary {
    pub low_total_before: u64,
    pub high_total_before: u64,
    pub low_total_after: u64,
    pub high_total_after: u64,
}

/// Normalize both bins of every guide in place.
///
/// Counts are updated exactly once; callers needing reproducibility must
/// seed `rng` themselves, there is no ambient random state.
///
/// Guides with a zero count in either bin must have been dropped at
/// ingestion; the rescale factor assumes strictly positive totals.
pub fn normalize_counts(guides: &mut [GuideRecord], rng: &mut StdRng) -> NormalizeSummary {
    let low_total_before: u64 = guides.iter().map(|g| g.low_reads as u64).sum();
    let high_total_before: u64 = guides.iter().map(|g| g.high_reads as u64).sum();
    let floor_total = low_total_before.min(high_total_before) as f64;

    let low_scale = floor_total / low_total_before as f64;
    let high_scale = floor_total / high_total_before as f64;

    for guide in guides.iter_mut() {
        guide.low_reads = stochastic_round(guide.low_reads as f64 * low_scale, rng) + 1;
        guide.high_reads = stochastic_round(guide.high_reads as f64 * high_scale, rng) + 1;
    }

    let summary = NormalizeSummary {
        low_total_before,
        high_total_before,
        low_total_after: guides.iter().map(|g| g.low_reads as u64).sum(),
        high_total_after: guides.iter().map(|g| g.high_reads as u64).sum(),
    };
    info!(
        "normalized libraries: low {} -> {}, high {} -> {}",
        summary.low_total_before,
        summary.low_total_after,
        summary.high_total_before,
        summary.high_total_after,
    );
    summary
}

/// Round `value` down, adding 1 with probability equal to the fractional
/// remainder. Preserves the expectation of the input.
fn stochastic_round(value: f64, rng: &mut StdRng) -> u32 {
    let floor = value.floor();
    let remainder = value - floor;
    let bump = if rng.gen::<f64>() < remainder { 1 } else { 0 };
    floor as u32 + bump
}
