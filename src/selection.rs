//! Weighted codon selection: source weights, corrections, then a draw.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::correction::{correct_autocorrelation, correct_gc, LogisticParameters};
use crate::sequence::{Codon, GrowingSequence};
use crate::tables::{CodonChoiceSet, Profile, TableError};

/// Picks the next codon for a residue of the protein being grown.
#[derive(Debug, Clone, Copy)]
pub struct WeightedCodonSelector<'a> {
    profile: &'a Profile,
    params: &'a LogisticParameters,
}

impl<'a> WeightedCodonSelector<'a> {
    /// Selector over shared, read-only tables.
    pub fn new(profile: &'a Profile, params: &'a LogisticParameters) -> Self {
        Self { profile, params }
    }

    /// Target GC% the corrections steer towards.
    pub fn target_gc(&self) -> f64 {
        self.params.target()
    }

    /// Profile the weights come from.
    pub fn profile(&self) -> &'a Profile {
        self.profile
    }

    /// Weights before correction: single-codon usage for the first residue
    /// and whenever context does not apply, otherwise bicodon usage
    /// conditioned on the previous residue and codon. Context rows missing
    /// from the bicodon table fall back to single-codon usage.
    pub fn source_weights(
        &self,
        index: usize,
        protein: &[u8],
        buffer: &GrowingSequence,
    ) -> Result<Vec<f64>, TableError> {
        let residue = protein[index];
        let choices = self.profile.codons.require(residue)?;
        if index == 0 {
            return Ok(choices.base_weights());
        }
        let pair = [protein[index - 1], residue];
        let context = buffer.last_codon().and_then(|previous| {
            if self.profile.context.uses_context(pair, &previous) {
                self.profile.bicodons.weights_for(pair, &previous, choices)
            } else {
                None
            }
        });
        Ok(context.unwrap_or_else(|| choices.base_weights()))
    }

    /// Source weights after the GC and autocorrelation corrections, in
    /// choice order.
    pub fn corrected_weights(
        &self,
        index: usize,
        protein: &[u8],
        buffer: &GrowingSequence,
    ) -> Result<(&'a CodonChoiceSet, Vec<f64>), TableError> {
        let choices = self.profile.codons.require(protein[index])?;
        let source = self.source_weights(index, protein, buffer)?;
        let gc_corrected = correct_gc(
            choices,
            &source,
            buffer.gc_percent(),
            buffer.len(),
            self.params,
        );
        let weights = correct_autocorrelation(
            index,
            protein,
            buffer,
            choices,
            &gc_corrected,
            &self.profile.correlations,
        );
        Ok((choices, weights))
    }

    /// Draw the codon for `protein[index]`; `buffer` holds the codons of
    /// `protein[..index]`.
    pub fn select<R: Rng + ?Sized>(
        &self,
        index: usize,
        protein: &[u8],
        buffer: &GrowingSequence,
        rng: &mut R,
    ) -> Result<Codon, TableError> {
        let (choices, weights) = self.corrected_weights(index, protein, buffer)?;
        let pick = sample_index(&weights, rng);
        choices.codon(pick).ok_or(TableError::UnknownResidue {
            residue: protein[index] as char,
        })
    }
}

/// Weighted draw over `weights`. Negative and non-finite weights count as
/// zero; if nothing positive remains the draw is uniform.
pub fn sample_index<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> usize {
    if weights.len() <= 1 {
        return 0;
    }
    let cleaned: Vec<f64> = weights
        .iter()
        .map(|&w| if w.is_finite() && w > 0.0 { w } else { 0.0 })
        .collect();
    match WeightedIndex::new(&cleaned) {
        Ok(dist) => dist.sample(rng),
        Err(_) => rng.gen_range(0..weights.len()),
    }
}
