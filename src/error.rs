use thiserror::Error;

use crate::config::ConfigError;
use crate::correction::CorrectionError;
use crate::initiation::OracleError;
use crate::io::IoError;
use crate::sequence::SequenceError;
use crate::tables::TableError;

/// Top-level error for the backtranslation pipeline.
#[derive(Debug, Error)]
pub enum BacktranslationError {
    /// Input residue with no codon in the active profile. Raised before any
    /// growth starts.
    #[error("gene '{gene}': residue '{residue}' has no codon in the active profile")]
    UnknownResidue {
        /// Gene name.
        gene: String,
        /// Residue symbol.
        residue: char,
    },

    /// Codon usage data could not be loaded or queried.
    #[error(transparent)]
    Table(#[from] TableError),

    /// Protein input rejected.
    #[error(transparent)]
    Sequence(#[from] SequenceError),

    /// Invalid run configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// GC corrector calibration failed.
    #[error(transparent)]
    Correction(#[from] CorrectionError),

    /// Gene input could not be read.
    #[error(transparent)]
    Io(#[from] IoError),

    /// Folding oracle failed outside the prefix search.
    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// Worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}
