//! Conversion of a posterior sample into a peak call.

use screenpeak_core::algebra::spans_overlap;
use screenpeak_core::models::CredibleInterval;

/// Default credible-region mass used by the decision rule (alpha = 0.001).
pub const DEFAULT_CREDIBLE_MASS: f64 = 0.999;

/// Narrowest interval containing `mass` of the sample: the highest
/// density credible region of a unimodal posterior.
///
/// `draws` must be non-empty and `mass` in (0, 1]; both are enforced by
/// configuration validation upstream.
pub fn highest_density_interval(draws: &[f64], mass: f64) -> CredibleInterval {
    assert!(!draws.is_empty(), "posterior sample is empty");

    let mut sorted = draws.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("posterior draws must be finite"));

    let n = sorted.len();
    let span = ((mass * n as f64).ceil() as usize).clamp(1, n);

    let mut best_start = 0;
    let mut best_width = f64::INFINITY;
    for i in 0..=(n - span) {
        let width = sorted[i + span - 1] - sorted[i];
        if width < best_width {
            best_width = width;
            best_start = i;
        }
    }

    CredibleInterval {
        low: sorted[best_start],
        high: sorted[best_start + span - 1],
    }
}

/// ROPE decision: the window is a peak iff its credible region clears the
/// region of practical equivalence `[-rope_half_width, rope_half_width]`
/// entirely, i.e. the two intervals do not overlap at all.
pub fn rope_decision(interval: &CredibleInterval, rope_half_width: f64) -> bool {
    !spans_overlap(
        (-rope_half_width, rope_half_width),
        (interval.low, interval.high),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_hdi_of_uniform_grid() {
        let draws: Vec<f64> = (0..1000).map(|i| i as f64 / 1000.0).collect();
        let interval = highest_density_interval(&draws, 0.9);
        // any 900-wide run works on a uniform grid; the first is found
        assert_eq!(interval.low, 0.0);
        assert!((interval.high - 0.899).abs() < 1e-12);
    }

    #[rstest]
    fn test_hdi_finds_the_dense_region() {
        // 90 draws tightly clustered at ~5, 10 outliers spread to 100
        let mut draws: Vec<f64> = (0..90).map(|i| 5.0 + i as f64 * 0.001).collect();
        draws.extend((0..10).map(|i| 20.0 + i as f64 * 8.0));
        let interval = highest_density_interval(&draws, 0.9);
        assert!(interval.low >= 5.0);
        assert!(interval.high < 6.0);
    }

    #[rstest]
    fn test_hdi_is_order_independent() {
        let draws = vec![3.0, 1.0, 2.0, 5.0, 4.0];
        let reversed: Vec<f64> = draws.iter().rev().copied().collect();
        assert_eq!(
            highest_density_interval(&draws, 0.8),
            highest_density_interval(&reversed, 0.8)
        );
    }

    #[rstest]
    #[case(1.0, 1.5, true)] // clears the ROPE on the right
    #[case(-0.2, 0.3, false)] // entirely inside the ROPE
    #[case(-1.5, -1.0, true)] // clears on the left
    #[case(0.5, 1.5, false)] // straddles the boundary
    #[case(0.693, 1.5, true)] // touching the boundary does not overlap
    fn test_rope_decision(#[case] low: f64, #[case] high: f64, #[case] expected: bool) {
        let interval = CredibleInterval { low, high };
        assert_eq!(rope_decision(&interval, 0.693), expected);
    }
}
