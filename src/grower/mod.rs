//! Truncate-and-retry sequence growth
//!
//! A [`SequenceGrower`] extends a nucleotide buffer chunk by chunk, scans
//! it for forbidden motifs after every chunk, cuts it back to the codon
//! containing the first offending nucleotide and keeps going. A finished
//! buffer must also land inside the GC band, otherwise growth restarts
//! from the frozen prefix. The loop is an explicit state machine so single
//! transitions can be driven and inspected in isolation.

mod config;

pub use config::{GcThresholds, GrowthSettings, DEFAULT_MAX_GC, DEFAULT_MIN_GC, RELAX_EVERY, RELAX_STEP};

use rand::Rng;
use tracing::trace;

use crate::motif::{Motif, MotifGuard};
use crate::selection::WeightedCodonSelector;
use crate::sequence::GrowingSequence;
use crate::tables::TableError;

/// Why a grower went back to its frozen prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RestartReason {
    /// Restriction site found after the truncation cap was reached.
    RestrictionSiteCap,
    /// Completed sequence above the GC ceiling.
    GcAboveMax,
    /// Completed sequence below the GC floor.
    GcBelowMin,
}

/// Grower states.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GrowthState {
    /// Next step appends a chunk of codons.
    Growing,
    /// Next step scans the buffer for motifs.
    MotifCheck,
    /// Last scan cut the buffer back; `motif` is the first kind that did.
    Truncated {
        /// First motif that caused a cut.
        motif: Motif,
        /// Cursor after the cuts.
        cursor: usize,
    },
    /// Buffer covers the whole protein and passed the motif scan.
    CompleteCandidate,
    /// GC% of the completed buffer is about to be gated.
    GcCheck {
        /// GC% of the buffer, one decimal.
        gc: f64,
    },
    /// Next step resets the buffer to the frozen prefix.
    Restart(RestartReason),
    /// Terminal.
    Complete,
}

/// Bounded-retry counters. They are the only guard against non-termination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RetryCounters {
    /// Restriction-site truncations since the last restart.
    pub restriction_sites: usize,
    /// A/T-run truncations since the last restart.
    pub at_runs: usize,
    /// Pyrimidine-run truncations since the last restart.
    pub pyrimidine_runs: usize,
    /// Restarts caused by GC above the ceiling.
    pub relax_max: usize,
    /// Restarts caused by GC below the floor.
    pub relax_min: usize,
    /// All truncations over the lifetime of the grower.
    pub truncations: usize,
    /// All restarts over the lifetime of the grower.
    pub restarts: usize,
}

impl RetryCounters {
    fn reset_motifs(&mut self) {
        self.restriction_sites = 0;
        self.at_runs = 0;
        self.pyrimidine_runs = 0;
    }
}

/// A finished buffer together with the bookkeeping that produced it.
#[derive(Debug, Clone)]
pub struct GrownSequence {
    /// Completed nucleotides.
    pub sequence: GrowingSequence,
    /// GC% at completion, one decimal.
    pub gc: f64,
    /// Counters at completion.
    pub counters: RetryCounters,
    /// GC band at completion, after any relaxation.
    pub thresholds: GcThresholds,
}

/// Grows one candidate for a protein.
#[derive(Debug)]
pub struct SequenceGrower<'a> {
    selector: WeightedCodonSelector<'a>,
    guard: &'a MotifGuard,
    settings: GrowthSettings,
    protein: &'a [u8],
    seed: Vec<u8>,
    buffer: GrowingSequence,
    counters: RetryCounters,
    thresholds: GcThresholds,
    state: GrowthState,
}

impl<'a> SequenceGrower<'a> {
    /// Grower for `protein` starting from an empty buffer, with the GC band
    /// derived from the selector's target.
    pub fn new(
        selector: WeightedCodonSelector<'a>,
        guard: &'a MotifGuard,
        settings: GrowthSettings,
        protein: &'a [u8],
    ) -> Self {
        let mut grower = Self {
            thresholds: GcThresholds::for_target(selector.target_gc()),
            selector,
            guard,
            settings,
            protein,
            seed: Vec::new(),
            buffer: GrowingSequence::with_capacity(protein.len()),
            counters: RetryCounters::default(),
            state: GrowthState::Growing,
        };
        grower.state = grower.resume_state();
        grower
    }

    /// Freeze `seed` as the start of every attempt. Partial codons and
    /// anything past the protein are ignored.
    pub fn with_seed(mut self, seed: &[u8]) -> Self {
        let whole = (seed.len() - seed.len() % 3).min(self.protein.len() * 3);
        self.seed = seed[..whole].to_vec();
        self.buffer.reset_to(&self.seed);
        self.state = self.resume_state();
        self
    }

    /// Replace the GC band.
    pub fn with_thresholds(mut self, thresholds: GcThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Current state.
    pub fn state(&self) -> GrowthState {
        self.state
    }

    /// Current buffer.
    pub fn buffer(&self) -> &GrowingSequence {
        &self.buffer
    }

    /// Current counters.
    pub fn counters(&self) -> &RetryCounters {
        &self.counters
    }

    /// Current GC band.
    pub fn thresholds(&self) -> &GcThresholds {
        &self.thresholds
    }

    /// Perform one transition and return the new state.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<GrowthState, TableError> {
        let next = match self.state {
            GrowthState::Growing => {
                self.grow_chunk(rng)?;
                GrowthState::MotifCheck
            }
            GrowthState::MotifCheck => self.check_motifs(),
            GrowthState::Truncated { .. } => self.resume_state(),
            GrowthState::CompleteCandidate => GrowthState::GcCheck {
                gc: self.buffer.gc_percent(),
            },
            GrowthState::GcCheck { gc } => self.gate_gc(gc),
            GrowthState::Restart(reason) => self.restart(reason),
            GrowthState::Complete => GrowthState::Complete,
        };
        self.state = next;
        Ok(next)
    }

    /// Step until [`GrowthState::Complete`].
    pub fn run<R: Rng + ?Sized>(mut self, rng: &mut R) -> Result<GrownSequence, TableError> {
        while self.step(rng)? != GrowthState::Complete {}
        Ok(GrownSequence {
            gc: self.buffer.gc_percent(),
            sequence: self.buffer,
            counters: self.counters,
            thresholds: self.thresholds,
        })
    }

    fn resume_state(&self) -> GrowthState {
        if self.buffer.cursor() < self.protein.len() {
            GrowthState::Growing
        } else {
            GrowthState::CompleteCandidate
        }
    }

    fn grow_chunk<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), TableError> {
        let cursor = self.buffer.cursor();
        let remaining = self.protein.len().saturating_sub(cursor);
        for index in cursor..cursor + remaining.min(self.settings.chunk) {
            let codon = self.selector.select(index, self.protein, &self.buffer, rng)?;
            self.buffer.push_codon(&codon);
        }
        Ok(())
    }

    fn check_motifs(&mut self) -> GrowthState {
        let mut first_cut = None;

        if let Some(start) = self.guard.find_restriction_site(self.buffer.as_bytes()) {
            if self.counters.restriction_sites >= self.settings.restart_cap {
                return GrowthState::Restart(RestartReason::RestrictionSiteCap);
            }
            self.cut(Motif::RestrictionSite, start);
            self.counters.restriction_sites += 1;
            first_cut.get_or_insert(Motif::RestrictionSite);
        }

        if let Some(start) = self.guard.find(Motif::Homopolymer, self.buffer.as_bytes()) {
            self.cut(Motif::Homopolymer, start);
            first_cut.get_or_insert(Motif::Homopolymer);
        }

        if self.counters.at_runs <= self.settings.motif_check_limit {
            if let Some(start) = self.guard.find(Motif::AtRun, self.buffer.as_bytes()) {
                self.cut(Motif::AtRun, start);
                self.counters.at_runs += 1;
                first_cut.get_or_insert(Motif::AtRun);
            }
        }

        if self.counters.pyrimidine_runs <= self.settings.motif_check_limit {
            if let Some(start) = self.guard.find(Motif::PyrimidineRun, self.buffer.as_bytes()) {
                self.cut(Motif::PyrimidineRun, start);
                self.counters.pyrimidine_runs += 1;
                first_cut.get_or_insert(Motif::PyrimidineRun);
            }
        }

        match first_cut {
            Some(motif) => GrowthState::Truncated {
                motif,
                cursor: self.buffer.cursor(),
            },
            None => self.resume_state(),
        }
    }

    fn cut(&mut self, motif: Motif, start: usize) {
        let cursor = self.buffer.truncate_at(start);
        self.counters.truncations += 1;
        trace!(?motif, start, cursor, "truncated");
    }

    fn gate_gc(&self, gc: f64) -> GrowthState {
        if !self.settings.gc_gating || self.buffer.is_empty() || self.thresholds.contains(gc) {
            GrowthState::Complete
        } else if gc > self.thresholds.max {
            GrowthState::Restart(RestartReason::GcAboveMax)
        } else {
            GrowthState::Restart(RestartReason::GcBelowMin)
        }
    }

    fn restart(&mut self, reason: RestartReason) -> GrowthState {
        match reason {
            RestartReason::GcAboveMax => {
                self.counters.relax_max += 1;
                self.thresholds.relax_max(self.counters.relax_max);
            }
            RestartReason::GcBelowMin => {
                self.counters.relax_min += 1;
                self.thresholds.relax_min(self.counters.relax_min);
            }
            RestartReason::RestrictionSiteCap => {}
        }
        self.counters.reset_motifs();
        self.counters.restarts += 1;
        self.buffer.reset_to(&self.seed);
        trace!(
            ?reason,
            min = self.thresholds.min,
            max = self.thresholds.max,
            "restarted from frozen prefix"
        );
        self.resume_state()
    }
}
