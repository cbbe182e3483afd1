use thiserror::Error;

/// Configuration problems are fatal and raised before any data is read.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Windows must take up space (window_size > 0)")]
    ZeroWindowSize,

    #[error("Step size must cause the window to slide (step_size > 0)")]
    ZeroStepSize,

    #[error("Can't have step_size ({step}) > window_size ({window}). Will cause gaps.")]
    StepExceedsWindow { step: u32, window: u32 },

    #[error("Job range implies no work! Must be greater than 0.")]
    ZeroJobRange,

    #[error("Job index must be within [0, job_range); got index {index} with range {range}")]
    JobIndexOutOfRange { index: usize, range: usize },

    #[error("ROPE threshold must be positive; got {0}")]
    NonPositiveRope(f64),

    #[error("Credible mass must be in (0, 1); got {0}")]
    BadCredibleMass(f64),

    #[error("Sampler needs at least one chain")]
    ZeroChains,

    #[error("Sampler needs at least one draw per chain")]
    ZeroDraws,
}

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Degenerate activity prior: log-ratio sd must be positive, got {0}")]
    DegenerateActivityPrior(f64),

    #[error("Degenerate intensity prior: count mean {mean} / dispersion {dispersion}")]
    DegenerateIntensityPrior { mean: f64, dispersion: f64 },

    #[error("Window fit needs guides in both groups ({foreground} foreground, {background} background)")]
    EmptyFitGroup {
        foreground: usize,
        background: usize,
    },
}
