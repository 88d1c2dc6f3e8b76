//! # Multi-objective protein backtranslation
//!
//! Turns amino-acid sequences into synthetic coding DNA tuned for an
//! expression system. Each codon is drawn from weighted usage tables and
//! the weights are corrected on the fly for GC content and codon
//! autocorrelation. Forbidden motifs are cut out as the sequence grows.
//!
//! ## Pipeline
//!
//! 1. **Prefix search** (optional): grow 10 short starts and freeze the
//!    least structured one according to a folding-energy oracle
//! 2. **Growth**: extend in chunks, scan for restriction sites,
//!    homopolymers and A/T or pyrimidine runs, truncate and retry
//! 3. **GC gating**: restart finished sequences outside the GC band, with
//!    the band slowly relaxing
//! 4. **Tournament**: score 10 candidates on CAI, GC distance and CpG load
//!    and keep the best
//!
//! ## Usage Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use backtrans::{
//!     AminoAcidSequence, BacktranslationConfig, BacktranslationOrchestrator, EngineContext, GeneJob,
//! };
//!
//! let config = BacktranslationConfig::default().with_target_gc(58.0).with_seed(7);
//! let context = Arc::new(EngineContext::builtin(config)?);
//! let orchestrator = BacktranslationOrchestrator::new(context);
//!
//! let job = GeneJob::new("ins", AminoAcidSequence::parse("MALWMRLLPLLALLALWGPDPAAAFVNQHLCGSHLVEALYLVCGERGFFYTPKT")?);
//! let report = orchestrator.backtranslate(&job)?;
//! assert_eq!(report.nucleotides.len(), job.protein.len() * 3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]

pub mod baseline;     // Most-frequent-codon reference backtranslation
pub mod config;       // Run configuration
pub mod correction;   // GC and autocorrelation weight corrections
pub mod grower;       // Truncate-and-retry growth state machine
pub mod initiation;   // Translation-start prefix search and folding oracles
pub mod io;           // Gene input and record output
pub mod motif;        // Forbidden-motif scanning
pub mod orchestrator; // Per-gene pipeline and job distribution
pub mod scoring;      // Candidate fitness
pub mod selection;    // Weighted codon selection
pub mod sequence;     // Protein and nucleotide sequences
pub mod tables;       // Codon usage data and expression profiles
pub mod tournament;   // Best-of-N candidate selection

mod error;

// Re-exports for convenience
pub use baseline::MostFrequentBacktranslator;
pub use config::{BacktranslationConfig, ConfigError};
pub use correction::{CorrectionError, LogisticParameters};
pub use error::BacktranslationError;
pub use grower::{GcThresholds, GrowthSettings, GrowthState, RetryCounters, SequenceGrower};
pub use initiation::{CommandOracle, FoldingOracle, OracleError, TranslationInitiationOptimizer};
pub use io::{read_genes, read_genes_from_path, render_records, write_records, IoError};
pub use motif::{Motif, MotifGuard, MotifHit};
pub use orchestrator::{
    derive_seed, run_jobs, run_jobs_ordered, BacktranslationOrchestrator, EngineContext, GeneJob,
    GeneReport,
};
pub use scoring::{CandidateScorer, Score};
pub use selection::WeightedCodonSelector;
pub use sequence::{AminoAcidSequence, Codon, GrowingSequence, SequenceError};
pub use tables::{ExpressionProfile, Profile, TableError};
pub use tournament::{Candidate, TournamentSelector};
