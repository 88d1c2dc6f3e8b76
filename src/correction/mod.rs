//! Layered corrections applied to codon weights before sampling.
//!
//! Both correctors are pure functions of the growing buffer and the
//! incoming weights; they never touch the shared tables.

mod autocorrelation;
mod gc;

pub use autocorrelation::{autocorrelation_bonus, correct_autocorrelation, AUTOCORRELATION_WINDOW};
pub use gc::{correct_gc, logistic4, LogisticParameters, GC_CORRECTION_MIN_LENGTH};

use thiserror::Error;

/// Errors raised while calibrating the GC corrector.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CorrectionError {
    /// Target GC% outside the open interval (0, 100).
    #[error("target GC% must lie in (0, 100), got {0}")]
    InvalidTarget(f64),

    /// Least-squares fit produced non-finite parameters.
    #[error("logistic calibration diverged for target GC% {0}")]
    Diverged(f64),
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
