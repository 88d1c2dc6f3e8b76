//! Run configuration shared by every gene job.

use thiserror::Error;

use crate::initiation::{PREFIX_CANDIDATES, PREFIX_RESIDUES};
use crate::scoring::DEFAULT_GC_EXPONENT;
use crate::tables::ExpressionProfile;
use crate::tournament::DEFAULT_CANDIDATES;

/// Default target GC%.
pub const DEFAULT_TARGET_GC: f64 = 55.0;

/// Invalid configuration values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Target GC% outside (0, 100).
    #[error("target GC% must lie strictly between 0 and 100, got {0}")]
    TargetGc(f64),

    /// A count that must be positive was zero.
    #[error("{0} must be at least 1")]
    ZeroCount(&'static str),

    /// GC exponent not a positive finite number.
    #[error("GC score exponent must be positive and finite, got {0}")]
    GcExponent(f64),
}

/// Parameters for one backtranslation run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BacktranslationConfig {
    /// Built-in expression system.
    pub profile: ExpressionProfile,
    /// Desired GC%.
    pub target_gc: f64,
    /// Run the translation-initiation prefix search when an oracle exists.
    pub optimize_prefix: bool,
    /// Full-length candidates per gene.
    pub candidates: usize,
    /// Prefix candidates per gene.
    pub prefix_candidates: usize,
    /// Prefix length in residues.
    pub prefix_residues: usize,
    /// Exponent applied to the GC distance when scoring.
    pub gc_exponent: f64,
    /// Base seed; entropy seeding when absent.
    pub seed: Option<u64>,
    /// Worker threads; rayon's default when absent.
    pub threads: Option<usize>,
}

impl Default for BacktranslationConfig {
    fn default() -> Self {
        Self {
            profile: ExpressionProfile::default(),
            target_gc: DEFAULT_TARGET_GC,
            optimize_prefix: true,
            candidates: DEFAULT_CANDIDATES,
            prefix_candidates: PREFIX_CANDIDATES,
            prefix_residues: PREFIX_RESIDUES,
            gc_exponent: DEFAULT_GC_EXPONENT,
            seed: None,
            threads: None,
        }
    }
}

impl BacktranslationConfig {
    /// Set the expression system.
    pub fn with_profile(mut self, profile: ExpressionProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Set the target GC%.
    pub fn with_target_gc(mut self, target_gc: f64) -> Self {
        self.target_gc = target_gc;
        self
    }

    /// Enable or disable the prefix search.
    pub fn with_prefix_optimization(mut self, enabled: bool) -> Self {
        self.optimize_prefix = enabled;
        self
    }

    /// Set the number of full-length candidates.
    pub fn with_candidates(mut self, candidates: usize) -> Self {
        self.candidates = candidates;
        self
    }

    /// Set the number of prefix candidates.
    pub fn with_prefix_candidates(mut self, candidates: usize) -> Self {
        self.prefix_candidates = candidates;
        self
    }

    /// Set the prefix length in residues.
    pub fn with_prefix_residues(mut self, residues: usize) -> Self {
        self.prefix_residues = residues;
        self
    }

    /// Set the GC score exponent.
    pub fn with_gc_exponent(mut self, exponent: f64) -> Self {
        self.gc_exponent = exponent;
        self
    }

    /// Seed every job deterministically from `seed`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Fix the worker thread count.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.target_gc > 0.0 && self.target_gc < 100.0) {
            return Err(ConfigError::TargetGc(self.target_gc));
        }
        if self.candidates == 0 {
            return Err(ConfigError::ZeroCount("candidates"));
        }
        if self.prefix_candidates == 0 {
            return Err(ConfigError::ZeroCount("prefix candidates"));
        }
        if self.prefix_residues == 0 {
            return Err(ConfigError::ZeroCount("prefix residues"));
        }
        if self.threads == Some(0) {
            return Err(ConfigError::ZeroCount("threads"));
        }
        if !(self.gc_exponent.is_finite() && self.gc_exponent > 0.0) {
            return Err(ConfigError::GcExponent(self.gc_exponent));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = BacktranslationConfig::default();
        assert_eq!(config.target_gc, 55.0);
        assert_eq!(config.candidates, 10);
        assert_eq!(config.prefix_residues, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        let base = BacktranslationConfig::default();
        assert_eq!(
            base.clone().with_target_gc(100.0).validate(),
            Err(ConfigError::TargetGc(100.0))
        );
        assert!(base.clone().with_target_gc(f64::NAN).validate().is_err());
        assert_eq!(
            base.clone().with_candidates(0).validate(),
            Err(ConfigError::ZeroCount("candidates"))
        );
        assert!(base.clone().with_threads(0).validate().is_err());
        assert!(base.with_gc_exponent(-1.0).validate().is_err());
    }
}
