//! Empirical moments shared by every window fit.

use log::warn;

use screenpeak_core::models::GuideRecord;

/// Which guides contribute to the empirical moments behind the priors.
///
/// `Global` uses every retained guide in the run (controls included),
/// computed once up front and shared read-only across windows. `PerFit`
/// recomputes the moments from the two-group subset of each window's fit.
/// The comparison groups of the likelihood are identical under both
/// scopes; only the priors move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MomentScope {
    Global,
    PerFit,
}

/// Read-only empirical summary backing the priors of a window fit.
///
/// `dispersion_scale` is the square root of the count variance in excess
/// of Poisson (`sd^2 - mean`); when the data is under-dispersed the raw
/// standard deviation is used instead and `underdispersed` is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitContext {
    pub log_ratio_mean: f64,
    pub log_ratio_sd: f64,
    pub count_mean: f64,
    pub count_sd: f64,
    pub dispersion_scale: f64,
    pub underdispersed: bool,
}

impl FitContext {
    /// Compute moments over the given guides. Counts must already be
    /// normalized (strictly positive in both bins).
    pub fn from_guides<'a>(guides: impl IntoIterator<Item = &'a GuideRecord>) -> Self {
        let mut log_ratios = Vec::new();
        let mut totals = Vec::new();
        for guide in guides {
            log_ratios.push(guide.log_ratio());
            totals.push(guide.total_reads() as f64);
        }
        debug_assert!(!totals.is_empty(), "moments need at least one guide");

        let (log_ratio_mean, log_ratio_sd) = mean_and_sd(&log_ratios);
        let (count_mean, count_sd) = mean_and_sd(&totals);

        let variance_excess = count_sd * count_sd - count_mean;
        let (dispersion_scale, underdispersed) = if variance_excess <= 0.0 {
            warn!(
                "count data is underdispersed relative to Poisson \
                 (variance {:.2} <= mean {:.2}); results may be inaccurate",
                count_sd * count_sd,
                count_mean,
            );
            (count_sd, true)
        } else {
            (variance_excess.sqrt(), false)
        };

        FitContext {
            log_ratio_mean,
            log_ratio_sd,
            count_mean,
            count_sd,
            dispersion_scale,
            underdispersed,
        }
    }
}

/// Population mean and standard deviation.
fn mean_and_sd(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}
