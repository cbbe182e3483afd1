//! The per-window hierarchical activity model.
//!
//! For each guide `j` in a two-group fit (background controls vs guides
//! overlapping the window):
//!
//! ```text
//! intensity_j ~ Gamma(mean = count_mean, sd = dispersion_scale)
//! activity_g  ~ Normal(log_ratio_mean, log_ratio_sd),  g in {0, 1}
//! bias_g      = sigmoid(activity_g)
//! low_j       ~ Poisson(intensity_j * bias_g(j))
//! high_j      ~ Poisson(intensity_j * (1 - bias_g(j)))
//! ```
//!
//! The quantity of interest is `boost = activity_1 - activity_0`, the
//! log-odds shift in low-bin sorting attributable to targeting the window
//! rather than background. The sampler works on the unconstrained
//! parameter vector `[ln intensity_1 .. ln intensity_n, activity_0,
//! activity_1]`; intensity terms therefore carry the log-transform
//! Jacobian.

use statrs::distribution::{Continuous, Gamma, Normal};
use statrs::function::gamma::ln_gamma;
use statrs::statistics::Distribution as _;

use crate::errors::ModelError;
use crate::moments::FitContext;

/// One guide's observed counts and group label within a fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuideObservation {
    pub low_reads: u32,
    pub high_reads: u32,
    /// 0 = background, 1 = window.
    pub group: usize,
}

/// A fully specified posterior for one window, ready to sample.
#[derive(Debug, Clone)]
pub struct ActivityModel {
    observations: Vec<GuideObservation>,
    intensity_prior: Gamma,
    activity_prior: Normal,
}

impl ActivityModel {
    /// Assemble a model from a two-group observation set and the shared
    /// empirical moments.
    pub fn new(
        observations: Vec<GuideObservation>,
        context: &FitContext,
    ) -> Result<Self, ModelError> {
        let foreground = observations.iter().filter(|o| o.group == 1).count();
        let background = observations.len() - foreground;
        if foreground == 0 || background == 0 {
            return Err(ModelError::EmptyFitGroup {
                foreground,
                background,
            });
        }

        // Gamma with mean m and sd s has shape (m/s)^2 and rate m/s^2.
        let mean = context.count_mean;
        let sd = context.dispersion_scale;
        let shape = (mean / sd).powi(2);
        let rate = mean / (sd * sd);
        let intensity_prior =
            Gamma::new(shape, rate).map_err(|_| ModelError::DegenerateIntensityPrior {
                mean,
                dispersion: sd,
            })?;

        let activity_prior = Normal::new(context.log_ratio_mean, context.log_ratio_sd)
            .map_err(|_| ModelError::DegenerateActivityPrior(context.log_ratio_sd))?;

        Ok(ActivityModel {
            observations,
            intensity_prior,
            activity_prior,
        })
    }

    pub fn n_guides(&self) -> usize {
        self.observations.len()
    }

    /// Total parameter dimension: one log-intensity per guide plus the
    /// two group activities.
    pub fn dimension(&self) -> usize {
        self.observations.len() + 2
    }

    pub fn observations(&self) -> &[GuideObservation] {
        &self.observations
    }

    /// Moment-matched starting point: each guide's intensity at its
    /// observed total depth, both activities at the prior mean.
    pub fn initial_params(&self) -> Vec<f64> {
        let mut params: Vec<f64> = self
            .observations
            .iter()
            .map(|o| f64::from(o.low_reads + o.high_reads).max(1.0).ln())
            .collect();
        params.push(self.activity_prior.mean().unwrap_or(0.0));
        params.push(self.activity_prior.mean().unwrap_or(0.0));
        params
    }

    /// Log density terms involving guide `j` only: its intensity prior
    /// (with Jacobian) and both Poisson likelihood terms.
    pub fn guide_log_density(&self, j: usize, log_intensity: f64, activities: (f64, f64)) -> f64 {
        let obs = &self.observations[j];
        let intensity = log_intensity.exp();
        let bias = sigmoid(if obs.group == 0 {
            activities.0
        } else {
            activities.1
        });

        self.intensity_prior.ln_pdf(intensity)
            + log_intensity
            + poisson_ln_pmf(intensity * bias, obs.low_reads)
            + poisson_ln_pmf(intensity * (1.0 - bias), obs.high_reads)
    }

    /// Log density terms involving group `g`'s activity: its prior and
    /// the Poisson likelihood of every guide in the group.
    pub fn activity_log_density(&self, group: usize, activity: f64, log_intensities: &[f64]) -> f64 {
        let bias = sigmoid(activity);
        let mut total = self.activity_prior.ln_pdf(activity);
        for (j, obs) in self.observations.iter().enumerate() {
            if obs.group != group {
                continue;
            }
            let intensity = log_intensities[j].exp();
            total += poisson_ln_pmf(intensity * bias, obs.low_reads)
                + poisson_ln_pmf(intensity * (1.0 - bias), obs.high_reads);
        }
        total
    }
}

#[inline]
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// `ln P(k; theta)` for a Poisson rate `theta > 0`.
#[inline]
fn poisson_ln_pmf(theta: f64, k: u32) -> f64 {
    let k = f64::from(k);
    k * theta.ln() - theta - ln_gamma(k + 1.0)
}
