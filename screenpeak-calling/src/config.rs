use crate::errors::ConfigError;
use crate::moments::MomentScope;
use crate::sampler::SamplerConfig;

/// Full configuration of one peak-calling run.
///
/// `validate` must pass before any input is read; every knob here maps to
/// a command-line flag of the `call` subcommand.
#[derive(Debug, Clone)]
pub struct CallConfig {
    pub window_size: u32,
    pub step_size: u32,
    /// ROPE half-width on the enhancer boost scale. The default of
    /// ln(2) treats anything below a two-fold change as practically
    /// equivalent to zero.
    pub rope_threshold: f64,
    /// Mass of the highest-density credible region used by the decision
    /// rule.
    pub credible_mass: f64,
    pub job_index: usize,
    pub job_range: usize,
    /// Derive regions of effect from the strand-specific offset
    /// constants; when false, coordinate spans are the regions of effect
    /// verbatim.
    pub use_offsets: bool,
    pub moment_scope: MomentScope,
    pub seed: u64,
    pub sampler: SamplerConfig,
}

impl Default for CallConfig {
    fn default() -> Self {
        CallConfig {
            window_size: 100,
            step_size: 100,
            rope_threshold: std::f64::consts::LN_2,
            credible_mass: 0.999,
            job_index: 0,
            job_range: 1,
            use_offsets: true,
            moment_scope: MomentScope::Global,
            seed: 42,
            sampler: SamplerConfig::default(),
        }
    }
}

impl CallConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::ZeroWindowSize);
        }
        if self.step_size == 0 {
            return Err(ConfigError::ZeroStepSize);
        }
        if self.step_size > self.window_size {
            return Err(ConfigError::StepExceedsWindow {
                step: self.step_size,
                window: self.window_size,
            });
        }
        if self.job_range == 0 {
            return Err(ConfigError::ZeroJobRange);
        }
        if self.job_index >= self.job_range {
            return Err(ConfigError::JobIndexOutOfRange {
                index: self.job_index,
                range: self.job_range,
            });
        }
        if self.rope_threshold <= 0.0 {
            return Err(ConfigError::NonPositiveRope(self.rope_threshold));
        }
        if !(self.credible_mass > 0.0 && self.credible_mass < 1.0) {
            return Err(ConfigError::BadCredibleMass(self.credible_mass));
        }
        self.sampler.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::*;

    #[rstest]
    fn test_default_config_is_valid() {
        assert!(CallConfig::default().validate().is_ok());
    }

    #[rstest]
    fn test_step_larger_than_window_rejected() {
        let cfg = CallConfig {
            window_size: 100,
            step_size: 150,
            ..Default::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::StepExceedsWindow {
                step: 150,
                window: 100
            })
        );
    }

    #[rstest]
    fn test_job_index_must_be_in_range() {
        let cfg = CallConfig {
            job_index: 5,
            job_range: 5,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::JobIndexOutOfRange { index: 5, range: 5 })
        ));
    }

    #[rstest]
    fn test_zero_sizes_rejected() {
        let cfg = CallConfig {
            window_size: 0,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroWindowSize));

        let cfg = CallConfig {
            step_size: 0,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroStepSize));
    }
}
