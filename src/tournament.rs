//! Best-of-N selection over independently grown candidates.

use rand::Rng;
use tracing::debug;

use crate::grower::{GcThresholds, GrowthSettings, RetryCounters, SequenceGrower};
use crate::motif::MotifGuard;
use crate::scoring::{CandidateScorer, Score};
use crate::selection::WeightedCodonSelector;
use crate::sequence::GrowingSequence;
use crate::tables::TableError;

/// Candidates grown per gene.
pub const DEFAULT_CANDIDATES: usize = 10;

/// A completed, scored backtranslation.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Completed nucleotides.
    pub sequence: GrowingSequence,
    /// Fitness.
    pub score: Score,
    /// Retry bookkeeping of the grower that produced it.
    pub counters: RetryCounters,
    /// GC band the candidate was accepted in.
    pub thresholds: GcThresholds,
}

/// Grows a fixed number of candidates and keeps the best one.
#[derive(Debug, Clone, Copy)]
pub struct TournamentSelector<'a> {
    selector: WeightedCodonSelector<'a>,
    guard: &'a MotifGuard,
    scorer: CandidateScorer<'a>,
    settings: GrowthSettings,
    rounds: usize,
}

impl<'a> TournamentSelector<'a> {
    /// Tournament of [`DEFAULT_CANDIDATES`] main-pass candidates.
    pub fn new(
        selector: WeightedCodonSelector<'a>,
        guard: &'a MotifGuard,
        scorer: CandidateScorer<'a>,
    ) -> Self {
        Self {
            selector,
            guard,
            scorer,
            settings: GrowthSettings::main(),
            rounds: DEFAULT_CANDIDATES,
        }
    }

    /// Override the number of candidates (minimum 1).
    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds.max(1);
        self
    }

    /// Override the grower settings.
    pub fn with_settings(mut self, settings: GrowthSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Grow every candidate from `seed` and return the highest scoring one.
    pub fn run<R: Rng + ?Sized>(
        &self,
        protein: &[u8],
        seed: &[u8],
        rng: &mut R,
    ) -> Result<Candidate, TableError> {
        let first = self.grow_one(0, protein, seed, rng)?;
        let rest = (1..self.rounds)
            .map(|round| self.grow_one(round, protein, seed, rng))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(best_candidate(first, rest))
    }

    fn grow_one<R: Rng + ?Sized>(
        &self,
        round: usize,
        protein: &[u8],
        seed: &[u8],
        rng: &mut R,
    ) -> Result<Candidate, TableError> {
        let grown = SequenceGrower::new(self.selector, self.guard, self.settings, protein)
            .with_seed(seed)
            .run(rng)?;
        let score = self.scorer.score(protein, grown.sequence.as_bytes())?;
        debug!(
            round,
            total = score.total,
            cai = score.cai,
            gc = score.gc,
            restarts = grown.counters.restarts,
            "candidate scored"
        );
        Ok(Candidate {
            sequence: grown.sequence,
            score,
            counters: grown.counters,
            thresholds: grown.thresholds,
        })
    }
}

/// Highest total score among `first` and `rest`; among equal scores the
/// later candidate wins.
pub fn best_candidate(first: Candidate, rest: impl IntoIterator<Item = Candidate>) -> Candidate {
    rest.into_iter().fold(first, |best, next| {
        if next.score.total.total_cmp(&best.score.total).is_ge() {
            next
        } else {
            best
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correction::LogisticParameters;
    use crate::tables::{ExpressionProfile, Profile};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn candidate(tag: &[u8], total: f64) -> Candidate {
        Candidate {
            sequence: GrowingSequence::from_codons(tag),
            score: Score {
                cai: 0.0,
                gc: 0.0,
                gc_score: 0.0,
                cpg_count: 0,
                cpg_score: 0.0,
                total,
            },
            counters: RetryCounters::default(),
            thresholds: GcThresholds::for_target(55.0),
        }
    }

    #[test]
    fn picks_highest_and_later_on_ties() {
        let rest = vec![
            candidate(b"CCC", 42.0),
            candidate(b"GGG", 42.0),
            candidate(b"TTT", -3.0),
        ];
        let best = best_candidate(candidate(b"AAA", 10.0), rest);
        assert_eq!(best.sequence.as_bytes(), b"GGG");

        let alone = best_candidate(candidate(b"AAA", 10.0), Vec::new());
        assert_eq!(alone.sequence.as_bytes(), b"AAA");
        let first_wins = best_candidate(candidate(b"AAA", 10.0), vec![candidate(b"CCC", 9.0)]);
        assert_eq!(first_wins.sequence.as_bytes(), b"AAA");
    }

    #[test]
    fn winner_scores_at_least_every_round() {
        let profile = Profile::builtin(ExpressionProfile::HomoSapiens).unwrap();
        let params = LogisticParameters::fit(55.0).unwrap();
        let guard = MotifGuard::default();
        let selector = WeightedCodonSelector::new(&profile, &params);
        let scorer = CandidateScorer::new(&profile.codons, 55.0);
        let protein = b"MDELVKRSGAQHPLW";

        let tournament = TournamentSelector::new(selector, &guard, scorer);
        let winner = tournament.run(protein, b"", &mut StdRng::seed_from_u64(9)).unwrap();

        let single = tournament.with_rounds(1);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..DEFAULT_CANDIDATES {
            let one = single.run(protein, b"", &mut rng).unwrap();
            assert!(winner.score.total >= one.score.total);
        }
    }
}
