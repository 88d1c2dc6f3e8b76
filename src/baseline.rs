//! Most-frequent-codon baseline
//!
//! Deterministic reference backtranslation: every residue gets its highest
//! weight codon. A restriction site cuts the buffer back and the next
//! codon placed is the second most frequent synonym. After ten collisions
//! the next multi-codon residue is drawn at random from the base weights
//! so the loop cannot get stuck.

use rand::Rng;
use tracing::trace;

use crate::motif::MotifGuard;
use crate::selection::sample_index;
use crate::sequence::GrowingSequence;
use crate::tables::{CodonChoiceSet, CodonTable, TableError};

/// Collision count (starting from 1) at which a random draw is used.
const ESCAPE_EVERY: usize = 11;

/// Backtranslates with the most frequent codon of each residue.
#[derive(Debug, Clone, Copy)]
pub struct MostFrequentBacktranslator<'a> {
    codons: &'a CodonTable,
    guard: &'a MotifGuard,
}

impl<'a> MostFrequentBacktranslator<'a> {
    /// Baseline over `codons`, avoiding the sites of `guard`.
    pub fn new(codons: &'a CodonTable, guard: &'a MotifGuard) -> Self {
        Self { codons, guard }
    }

    /// Backtranslate `protein`. `rng` is only used by the escape draw.
    pub fn backtranslate<R: Rng + ?Sized>(
        &self,
        protein: &[u8],
        rng: &mut R,
    ) -> Result<GrowingSequence, TableError> {
        let mut buffer = GrowingSequence::with_capacity(protein.len());
        let mut use_second = false;
        let mut collisions = 1usize;

        while buffer.cursor() < protein.len() {
            let residue = protein[buffer.cursor()];
            let choices = self.codons.require(residue)?;
            let best = choices.most_frequent().unwrap_or(0);
            let pick = if choices.is_single() {
                best
            } else if collisions % ESCAPE_EVERY == 0 {
                collisions = 1;
                sample_index(&choices.base_weights(), rng)
            } else if use_second {
                use_second = false;
                second_most_frequent(choices, best)
            } else {
                best
            };
            let codon = choices
                .codon(pick)
                .ok_or(TableError::UnknownResidue { residue: residue as char })?;
            buffer.push_codon(&codon);

            if let Some(start) = self.guard.find_restriction_site(buffer.as_bytes()) {
                use_second = true;
                collisions += 1;
                let cursor = buffer.truncate_at(start);
                trace!(start, cursor, collisions, "restriction site");
            }
        }
        Ok(buffer)
    }
}

/// Highest weight codon other than `best`; the first one wins ties.
fn second_most_frequent(choices: &CodonChoiceSet, best: usize) -> usize {
    let mut second: Option<(usize, f64)> = None;
    for (idx, choice) in choices.iter().enumerate() {
        if idx == best {
            continue;
        }
        match second {
            Some((_, weight)) if weight >= choice.weight => {}
            _ => second = Some((idx, choice.weight)),
        }
    }
    second.map_or(best, |(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{ExpressionProfile, Profile};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn toy() -> CodonTable {
        CodonTable::from_tsv(
            "M\tATG\t100\nW\tTGG\t100\nI\tATC\t60\nI\tATT\t40\nP\tCCA\t70\nP\tCCG\t30\n\
             G\tGGA\t60\nG\tGGC\t40\nS\tTCC\t70\nS\tAGC\t30\n"
                .as_bytes(),
        )
        .unwrap()
    }

    #[test]
    fn takes_most_frequent_codons() {
        let profile = Profile::builtin(ExpressionProfile::HomoSapiens).unwrap();
        let guard = MotifGuard::default();
        let baseline = MostFrequentBacktranslator::new(&profile.codons, &guard);
        let protein = b"MKLW";
        let out = baseline.backtranslate(protein, &mut StdRng::seed_from_u64(0)).unwrap();
        for (i, residue) in protein.iter().enumerate() {
            let choices = profile.codons.choices(*residue).unwrap();
            let expected = choices.codon(choices.most_frequent().unwrap()).unwrap();
            assert_eq!(out.codon_at(i), Some(expected));
        }
    }

    #[test]
    fn collision_switches_to_second_choice() {
        let codons = toy();
        let guard = MotifGuard::default();
        let baseline = MostFrequentBacktranslator::new(&codons, &guard);
        let out = baseline.backtranslate(b"MGS", &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(out.as_bytes(), b"ATGGGCTCC");
    }

    #[test]
    fn second_choice_waits_for_a_synonymous_residue() {
        // TGG|ATC|CCA spells GGATCC; W has no alternative so I takes ATT.
        let codons = toy();
        let guard = MotifGuard::default();
        let baseline = MostFrequentBacktranslator::new(&codons, &guard);
        let out = baseline.backtranslate(b"MWIP", &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(out.as_bytes(), b"ATGTGGATTCCA");
    }

    #[test]
    fn second_choice_skips_best() {
        let set = CodonChoiceSet::new([(*b"AAA", 10.0), (*b"AAG", 30.0), (*b"AAC", 10.0)]);
        assert_eq!(second_most_frequent(&set, 1), 0);
        let single = CodonChoiceSet::new([(*b"ATG", 1.0)]);
        assert_eq!(second_most_frequent(&single, 0), 0);
    }
}
