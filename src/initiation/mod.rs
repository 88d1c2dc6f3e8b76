//! Translation-initiation prefix search
//!
//! Structure around the start codon slows initiation, so before the main
//! tournament a handful of short prefixes are grown with the reduced
//! grower and the least stable one, by folding free energy, is frozen as
//! the seed of every full-length candidate.

mod oracle;

pub use oracle::{parse_free_energy, CommandOracle, FoldingOracle, OracleError};

use rand::Rng;
use thiserror::Error;
use tracing::debug;

use crate::grower::{GrowthSettings, SequenceGrower};
use crate::motif::MotifGuard;
use crate::selection::WeightedCodonSelector;
use crate::tables::TableError;

/// Residues covered by the frozen prefix.
pub const PREFIX_RESIDUES: usize = 20;
/// Prefix candidates compared per gene.
pub const PREFIX_CANDIDATES: usize = 10;

/// Errors raised during the prefix search.
#[derive(Debug, Error)]
pub enum InitiationError {
    /// Growth failed on the codon tables.
    #[error(transparent)]
    Table(#[from] TableError),

    /// Folding oracle failed.
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

/// The prefix selected for freezing.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PrefixChoice {
    /// Prefix nucleotides.
    pub nucleotides: String,
    /// Its folding free energy, kcal/mol.
    pub free_energy: f64,
}

/// Picks the least structured start among several grown prefixes.
#[derive(Debug, Clone, Copy)]
pub struct TranslationInitiationOptimizer<'a> {
    selector: WeightedCodonSelector<'a>,
    guard: &'a MotifGuard,
    oracle: &'a dyn FoldingOracle,
    residues: usize,
    candidates: usize,
}

impl<'a> TranslationInitiationOptimizer<'a> {
    /// Optimizer with the default prefix length and candidate count.
    pub fn new(
        selector: WeightedCodonSelector<'a>,
        guard: &'a MotifGuard,
        oracle: &'a dyn FoldingOracle,
    ) -> Self {
        Self {
            selector,
            guard,
            oracle,
            residues: PREFIX_RESIDUES,
            candidates: PREFIX_CANDIDATES,
        }
    }

    /// Override the prefix length in residues (minimum 1).
    pub fn with_residues(mut self, residues: usize) -> Self {
        self.residues = residues.max(1);
        self
    }

    /// Override the number of prefix candidates (minimum 1).
    pub fn with_candidates(mut self, candidates: usize) -> Self {
        self.candidates = candidates.max(1);
        self
    }

    /// Grow the prefix candidates for `protein` and return the one with
    /// the highest free energy. Later candidates win ties.
    pub fn optimize<R: Rng + ?Sized>(
        &self,
        protein: &[u8],
        rng: &mut R,
    ) -> Result<PrefixChoice, InitiationError> {
        let prefix = &protein[..protein.len().min(self.residues)];
        let mut best = self.grow_one(prefix, rng)?;
        for _ in 1..self.candidates {
            let next = self.grow_one(prefix, rng)?;
            if next.free_energy.total_cmp(&best.free_energy).is_ge() {
                best = next;
            }
        }
        debug!(
            prefix = %best.nucleotides,
            dg = best.free_energy,
            "translation start selected"
        );
        Ok(best)
    }

    fn grow_one<R: Rng + ?Sized>(
        &self,
        prefix: &[u8],
        rng: &mut R,
    ) -> Result<PrefixChoice, InitiationError> {
        let grown = SequenceGrower::new(self.selector, self.guard, GrowthSettings::prefix(), prefix)
            .run(rng)?;
        let nucleotides = grown.sequence.into_string();
        let free_energy = self.oracle.free_energy(&nucleotides)?;
        Ok(PrefixChoice {
            nucleotides,
            free_energy,
        })
    }
}
