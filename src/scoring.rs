//! Candidate fitness: codon adaptation, GC distance and CpG load.

use crate::sequence::{cpg_count, gc_percent};
use crate::tables::{CodonTable, TableError};

/// Default exponent applied to the GC distance.
pub const DEFAULT_GC_EXPONENT: f64 = 2.0;

/// Components of a candidate score. `total` is their plain sum and is not
/// normalised.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Score {
    /// Codon adaptation index, in percent.
    pub cai: f64,
    /// GC% of the candidate, one decimal.
    pub gc: f64,
    /// `-|target - gc|^exponent`.
    pub gc_score: f64,
    /// Number of CG dinucleotides.
    pub cpg_count: usize,
    /// `-(cpg_count / codons) * 100`.
    pub cpg_score: f64,
    /// `cai + gc_score + cpg_score`.
    pub total: f64,
}

/// Scores completed candidates against the single-codon usage table.
#[derive(Debug, Clone, Copy)]
pub struct CandidateScorer<'a> {
    codons: &'a CodonTable,
    target_gc: f64,
    gc_exponent: f64,
}

impl<'a> CandidateScorer<'a> {
    /// Scorer with the default GC exponent.
    pub fn new(codons: &'a CodonTable, target_gc: f64) -> Self {
        Self {
            codons,
            target_gc,
            gc_exponent: DEFAULT_GC_EXPONENT,
        }
    }

    /// Override the GC distance exponent.
    pub fn with_gc_exponent(mut self, exponent: f64) -> Self {
        self.gc_exponent = exponent;
        self
    }

    /// Codon adaptation index of `nucleotides` as a backtranslation of
    /// `protein`, in percent.
    ///
    /// Each codon's relative adaptiveness is its base weight over the
    /// largest base weight among its synonyms; the index is their geometric
    /// mean, computed through a sum of logarithms. A codon that does not
    /// encode its residue counts as zero adaptiveness.
    pub fn codon_adaptation_index(&self, protein: &[u8], nucleotides: &[u8]) -> Result<f64, TableError> {
        let mut log_sum = 0.0;
        let mut n = 0usize;
        for (&residue, codon) in protein.iter().zip(nucleotides.chunks_exact(3)) {
            let choices = self.codons.require(residue)?;
            let codon = [codon[0], codon[1], codon[2]];
            let max = choices.max_weight();
            let weight = choices.weight_of(&codon).unwrap_or(0.0);
            let adaptiveness = if max > 0.0 { weight / max } else { 0.0 };
            log_sum += adaptiveness.ln();
            n += 1;
        }
        if n == 0 {
            return Ok(0.0);
        }
        Ok((log_sum / n as f64).exp() * 100.0)
    }

    /// Full score of a completed candidate.
    pub fn score(&self, protein: &[u8], nucleotides: &[u8]) -> Result<Score, TableError> {
        let cai = self.codon_adaptation_index(protein, nucleotides)?;
        let gc = gc_percent(nucleotides);
        let gc_score = -(self.target_gc - gc).abs().powf(self.gc_exponent);
        let cpg = cpg_count(nucleotides);
        let cpg_score = if protein.is_empty() {
            0.0
        } else {
            -(cpg as f64 / protein.len() as f64) * 100.0
        };
        Ok(Score {
            cai,
            gc,
            gc_score,
            cpg_count: cpg,
            cpg_score,
            total: cai + gc_score + cpg_score,
        })
    }
}
