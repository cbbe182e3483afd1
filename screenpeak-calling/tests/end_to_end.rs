//! Full-pipeline test on a synthetic screen: a handful of non-targeting
//! controls with flat log-ratios, two guides over one locus with a strong
//! injected shift, and two guides over a second locus with no shift. The
//! shifted locus must be called a peak; the flat locus must not.

use pretty_assertions::assert_eq;
use rstest::*;

use screenpeak_calling::{call_peaks, CallConfig, MomentScope, SamplerConfig};
use screenpeak_core::models::{GuideRecord, Region};
use screenpeak_core::Strand;

fn targeting(chrom: &str, start: u32, end: u32, low: u32, high: u32) -> GuideRecord {
    GuideRecord {
        tag: format!("{}:{}-{}:+", chrom, start, end),
        target: Some(Region::new(chrom, start, end)),
        strand: Strand::Plus,
        low_reads: low,
        high_reads: high,
    }
}

/// 8 controls at ~1:1, 2 guides at ~e^2:1 over [1000, 1100), 2 guides at
/// ~1:1 over [5000, 5100). Depths vary a little so the count prior is not
/// degenerate.
fn synthetic_screen() -> Vec<GuideRecord> {
    let mut guides: Vec<GuideRecord> = (0..8)
        .map(|i| GuideRecord::control(format!("NT-{:04}", i), 900 + 40 * i, 920 + 35 * i))
        .collect();

    // injected mean log-ratio shift of 2.0: low/high = e^2 = 7.389
    guides.push(targeting("chr1", 1000, 1050, 1620, 219));
    guides.push(targeting("chr1", 1040, 1100, 1750, 237));

    // quiet locus, log-ratio near 0
    guides.push(targeting("chr1", 5000, 5050, 1010, 990));
    guides.push(targeting("chr1", 5020, 5100, 940, 1005));

    guides
}

fn test_config() -> CallConfig {
    CallConfig {
        window_size: 100,
        step_size: 100,
        sampler: SamplerConfig {
            draws: 1000,
            warmup: 1000,
            chains: 2,
            seed: 42,
        },
        seed: 42,
        ..Default::default()
    }
}

#[rstest]
fn test_shifted_window_is_a_peak_and_flat_window_is_not() {
    let calls = call_peaks(synthetic_screen(), &test_config()).unwrap();

    let shifted: Vec<_> = calls
        .iter()
        .filter(|c| c.region.overlaps(&Region::new("chr1", 1000, 1100)))
        .collect();
    let flat: Vec<_> = calls
        .iter()
        .filter(|c| c.region.overlaps(&Region::new("chr1", 5000, 5100)))
        .collect();
    assert!(!shifted.is_empty());
    assert!(!flat.is_empty());

    for call in &shifted {
        assert!(
            call.is_peak,
            "shifted window {} not called: interval [{:.3}, {:.3}]",
            call.region, call.interval.low, call.interval.high,
        );
        // the credible region must clear the default ROPE of ln(2)
        assert!(call.interval.low > std::f64::consts::LN_2);
        // and sit near the injected shift
        assert!(call.interval.low > 1.0 && call.interval.high < 3.0);
    }

    for call in &flat {
        assert!(
            !call.is_peak,
            "flat window {} wrongly called: interval [{:.3}, {:.3}]",
            call.region, call.interval.low, call.interval.high,
        );
    }
}

#[rstest]
fn test_chunked_jobs_concatenate_to_the_full_run() {
    let full = call_peaks(synthetic_screen(), &test_config()).unwrap();

    let mut stitched = Vec::new();
    for job in 0..2 {
        let config = CallConfig {
            job_index: job,
            job_range: 2,
            ..test_config()
        };
        stitched.extend(call_peaks(synthetic_screen(), &config).unwrap());
    }

    // same windows in the same order; per-window fits reuse the same
    // derived seeds, so the calls are identical
    assert_eq!(stitched, full);
}

#[rstest]
fn test_per_fit_moments_agree_on_strong_signal() {
    let config = CallConfig {
        moment_scope: MomentScope::PerFit,
        ..test_config()
    };
    let calls = call_peaks(synthetic_screen(), &config).unwrap();
    let shifted = calls
        .iter()
        .find(|c| c.region.overlaps(&Region::new("chr1", 1000, 1100)))
        .unwrap();
    assert!(shifted.is_peak);
}
