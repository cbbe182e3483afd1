//! # screenpeak-calling: Bayesian peak calling over CRISPRi screen windows
//!
//! Turns a guide-wise count table from a flow-sorted CRISPRi screen into
//! per-window peak calls:
//!
//! 1. stochastic depth normalization of the two sort bins ([`normalize`])
//! 2. sliding-window construction over guide target spans ([`windows`])
//! 3. guide-to-window assignment ([`assign`])
//! 4. a per-window hierarchical Gamma-Poisson model of bin bias
//!    ([`model`]), sampled by adaptive random-walk Metropolis ([`sampler`])
//! 5. a ROPE decision on the highest-density credible region of the
//!    enhancer boost ([`decision`])
//!
//! Window fits are independent: they share only the read-only empirical
//! moments in [`moments::FitContext`] and run on a rayon parallel
//! iterator. For distribution across machines, [`chunk`] slices the
//! window index range into disjoint jobs whose outputs concatenate, in
//! job order, into the full peak list.

pub mod assign;
pub mod chunk;
pub mod config;
pub mod decision;
pub mod errors;
pub mod model;
pub mod moments;
pub mod normalize;
pub mod sampler;
pub mod track;
pub mod windows;

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use screenpeak_core::models::{GuideRecord, PeakCall, Window};

use crate::assign::AssignmentMatrix;
use crate::model::{ActivityModel, GuideObservation};
use crate::moments::FitContext;
use crate::sampler::sample_boost;

// re-export the knobs callers actually touch
pub use crate::config::CallConfig;
pub use crate::moments::MomentScope;
pub use crate::sampler::SamplerConfig;

/// Chains that mix worse than this get a per-window warning.
const R_HAT_WARN: f64 = 1.1;

/// Run the full calling pipeline over this job's chunk of windows.
///
/// Consumes the guide records (their counts are rewritten once by the
/// normalizer). Returns peak calls in window-index order for the chunk
/// selected by `config.job_index` / `config.job_range`.
pub fn call_peaks(mut guides: Vec<GuideRecord>, config: &CallConfig) -> Result<Vec<PeakCall>> {
    config.validate()?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    normalize::normalize_counts(&mut guides, &mut rng);

    let windows = windows::build_windows(&guides, config.window_size, config.step_size);
    if windows.is_empty() {
        bail!("no candidate windows: the guide table contains no targeting guides");
    }
    debug!("built {} windows", windows.len());

    let matrix = AssignmentMatrix::build(&guides, &windows);
    if matrix.control_guides().is_empty() {
        bail!("no non-targeting control guides found; the background group is empty");
    }

    let global_context = FitContext::from_guides(guides.iter());

    let chunk = chunk::chunk_windows(windows.len(), config.job_range, config.job_index)?;
    let job_windows = &windows[chunk.start - 1..chunk.end - 1];

    let progress = ProgressBar::new(job_windows.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} windows")
            .unwrap(),
    );

    let calls: Result<Vec<PeakCall>> = job_windows
        .par_iter()
        .map(|window| {
            let call = fit_window(window, &guides, &matrix, &global_context, config)
                .with_context(|| format!("failed to fit {}", window))?;
            progress.inc(1);
            Ok(call)
        })
        .collect();
    progress.finish_and_clear();

    calls
}

/// Fit one window's model and apply the decision rule.
fn fit_window(
    window: &Window,
    guides: &[GuideRecord],
    matrix: &AssignmentMatrix,
    global_context: &FitContext,
    config: &CallConfig,
) -> Result<PeakCall> {
    let groups = matrix.fit_groups(window.index);
    let observations: Vec<GuideObservation> = groups
        .iter()
        .map(|&(i, group)| GuideObservation {
            low_reads: guides[i].low_reads,
            high_reads: guides[i].high_reads,
            group,
        })
        .collect();

    let per_fit_context;
    let context = match config.moment_scope {
        MomentScope::Global => global_context,
        MomentScope::PerFit => {
            per_fit_context = FitContext::from_guides(groups.iter().map(|&(i, _)| &guides[i]));
            &per_fit_context
        }
    };

    let model = ActivityModel::new(observations, context)?;

    let mut sampler_config = config.sampler;
    sampler_config.seed = config
        .seed
        .wrapping_add(window.index as u64 * config.sampler.chains as u64);
    let posterior = sample_boost(&model, &sampler_config);
    if posterior.r_hat > R_HAT_WARN {
        warn!(
            "wnd_{}: split R-hat {:.3} indicates poor mixing; \
             consider more warmup sweeps",
            window.index, posterior.r_hat,
        );
    }

    let interval = decision::highest_density_interval(&posterior.draws, config.credible_mass);
    let is_peak = decision::rope_decision(&interval, config.rope_threshold);
    debug!(
        "wnd_{}: boost in [{:.3}, {:.3}], r_hat {:.3}, peak = {}",
        window.index, interval.low, interval.high, posterior.r_hat, is_peak,
    );

    Ok(PeakCall {
        region: window.region.clone(),
        interval,
        is_peak,
    })
}
