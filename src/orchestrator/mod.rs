//! Per-gene backtranslation
//!
//! An [`EngineContext`] holds everything a job reads but never writes:
//! the profile tables, the fitted GC curve, the motif guard, the run
//! configuration and the optional folding oracle. It is built once and
//! shared by `Arc` across workers. A [`BacktranslationOrchestrator`] turns
//! one [`GeneJob`] into one [`GeneReport`]: optional prefix search, then
//! the candidate tournament.

pub mod distribute;

pub use distribute::{run_jobs, run_jobs_ordered};

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, info_span, warn};

use crate::config::BacktranslationConfig;
use crate::correction::LogisticParameters;
use crate::error::BacktranslationError;
use crate::grower::{GcThresholds, RetryCounters};
use crate::initiation::{FoldingOracle, InitiationError, PrefixChoice, TranslationInitiationOptimizer};
use crate::motif::{MotifGuard, MotifHit};
use crate::scoring::{CandidateScorer, Score};
use crate::selection::WeightedCodonSelector;
use crate::sequence::AminoAcidSequence;
use crate::tables::{Profile, TableError};
use crate::tournament::TournamentSelector;

/// One protein to backtranslate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneJob {
    /// Unique gene name.
    pub name: String,
    /// Protein sequence.
    pub protein: AminoAcidSequence,
}

impl GeneJob {
    /// New job.
    pub fn new(name: impl Into<String>, protein: AminoAcidSequence) -> Self {
        Self {
            name: name.into(),
            protein,
        }
    }
}

/// Outcome of one job.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneReport {
    /// Gene name.
    pub name: String,
    /// Winning nucleotide sequence.
    pub nucleotides: String,
    /// Score of the winner.
    pub score: Score,
    /// Frozen translation start, when the prefix search ran.
    pub prefix: Option<PrefixChoice>,
    /// Retry counters of the winning grower.
    pub counters: RetryCounters,
    /// GC band the winner was accepted in.
    pub thresholds: GcThresholds,
    /// Forbidden motifs left in the winner. Only A/T and pyrimidine runs
    /// can remain, once their truncation budget ran out.
    pub residual_motifs: Vec<MotifHit>,
    /// Seed of the job's random generator.
    pub seed: u64,
}

impl GeneReport {
    /// `(name, nucleotides)` pair for output.
    pub fn record(&self) -> (&str, &str) {
        (&self.name, &self.nucleotides)
    }
}

/// Immutable inputs shared by every job of a run.
#[derive(Debug)]
pub struct EngineContext {
    profile: Profile,
    params: LogisticParameters,
    guard: MotifGuard,
    config: BacktranslationConfig,
    oracle: Option<Arc<dyn FoldingOracle>>,
}

impl EngineContext {
    /// Validate `config` and fit the GC curve for its target.
    pub fn new(profile: Profile, config: BacktranslationConfig) -> Result<Self, BacktranslationError> {
        config.validate()?;
        let params = LogisticParameters::fit(config.target_gc)?;
        debug!(
            a = params.a,
            b = params.b,
            c = params.c,
            d = params.d,
            target = config.target_gc,
            "GC corrector calibrated"
        );
        Ok(Self {
            profile,
            params,
            guard: MotifGuard::default(),
            config,
            oracle: None,
        })
    }

    /// Context over the built-in profile named in `config`.
    pub fn builtin(config: BacktranslationConfig) -> Result<Self, BacktranslationError> {
        let profile = Profile::builtin(config.profile)?;
        Self::new(profile, config)
    }

    /// Attach a folding oracle for the prefix search.
    pub fn with_oracle(mut self, oracle: Arc<dyn FoldingOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Replace the motif guard.
    pub fn with_guard(mut self, guard: MotifGuard) -> Self {
        self.guard = guard;
        self
    }

    /// Codon usage data.
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Fitted GC curve.
    pub fn params(&self) -> &LogisticParameters {
        &self.params
    }

    /// Motif guard.
    pub fn guard(&self) -> &MotifGuard {
        &self.guard
    }

    /// Run configuration.
    pub fn config(&self) -> &BacktranslationConfig {
        &self.config
    }

    /// True when jobs will run the prefix search.
    pub fn prefix_search_enabled(&self) -> bool {
        self.config.optimize_prefix && self.oracle.is_some()
    }

    /// Seed for the job named `name`: derived from the base seed when one
    /// is configured, fresh entropy otherwise.
    pub fn job_seed(&self, name: &str) -> u64 {
        match self.config.seed {
            Some(base) => derive_seed(base, name),
            None => rand::random(),
        }
    }
}

/// Per-gene seed: the first 8 bytes of `blake3(base ‖ name)`.
pub fn derive_seed(base: u64, name: &str) -> u64 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&base.to_le_bytes());
    hasher.update(name.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

/// Resolves gene jobs against a shared context.
#[derive(Debug, Clone)]
pub struct BacktranslationOrchestrator {
    context: Arc<EngineContext>,
}

impl BacktranslationOrchestrator {
    /// Orchestrator over `context`.
    pub fn new(context: Arc<EngineContext>) -> Self {
        Self { context }
    }

    /// Shared context.
    pub fn context(&self) -> &EngineContext {
        &self.context
    }

    /// Backtranslate `job` with its own seeded generator.
    pub fn backtranslate(&self, job: &GeneJob) -> Result<GeneReport, BacktranslationError> {
        let seed = self.context.job_seed(&job.name);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut report = self.backtranslate_with_rng(job, &mut rng)?;
        report.seed = seed;
        Ok(report)
    }

    /// Backtranslate `job` drawing from `rng`. The reported seed is 0.
    pub fn backtranslate_with_rng<R: Rng + ?Sized>(
        &self,
        job: &GeneJob,
        rng: &mut R,
    ) -> Result<GeneReport, BacktranslationError> {
        let ctx = &*self.context;
        let span = info_span!("gene", name = %job.name, residues = job.protein.len());
        let _guard = span.enter();

        ctx.profile
            .codons
            .check_coverage(&job.protein)
            .map_err(|err| match err {
                TableError::UnknownResidue { residue } => BacktranslationError::UnknownResidue {
                    gene: job.name.clone(),
                    residue,
                },
                other => other.into(),
            })?;

        info!("backtranslation started");
        let protein = job.protein.residues();
        let selector = WeightedCodonSelector::new(&ctx.profile, &ctx.params);

        let prefix = match ctx.oracle.as_deref() {
            Some(oracle) if ctx.config.optimize_prefix => {
                let optimizer = TranslationInitiationOptimizer::new(selector, &ctx.guard, oracle)
                    .with_residues(ctx.config.prefix_residues)
                    .with_candidates(ctx.config.prefix_candidates);
                match optimizer.optimize(protein, rng) {
                    Ok(choice) => Some(choice),
                    Err(InitiationError::Oracle(err)) => {
                        warn!(error = %err, "folding oracle failed; prefix search skipped");
                        None
                    }
                    Err(InitiationError::Table(err)) => return Err(err.into()),
                }
            }
            _ => None,
        };
        let seed = prefix
            .as_ref()
            .map(|choice| choice.nucleotides.as_bytes())
            .unwrap_or_default();

        let scorer = CandidateScorer::new(&ctx.profile.codons, ctx.config.target_gc)
            .with_gc_exponent(ctx.config.gc_exponent);
        let winner = TournamentSelector::new(selector, &ctx.guard, scorer)
            .with_rounds(ctx.config.candidates)
            .run(protein, seed, rng)?;

        let residual_motifs = ctx.guard.violations(winner.sequence.as_bytes());
        for hit in &residual_motifs {
            warn!(motif = ?hit.motif, start = hit.start, "motif left in sequence");
        }
        info!(
            score = winner.score.total,
            gc = winner.score.gc,
            cai = winner.score.cai,
            cpg = winner.score.cpg_count,
            "backtranslation finished"
        );
        Ok(GeneReport {
            name: job.name.clone(),
            nucleotides: winner.sequence.into_string(),
            score: winner.score,
            prefix,
            counters: winner.counters,
            thresholds: winner.thresholds,
            residual_motifs,
            seed: 0,
        })
    }
}
