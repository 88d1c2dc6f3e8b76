//! Folding-energy oracles
//!
//! The translation-initiation search only needs one number per prefix: the
//! minimum free energy of its secondary structure in kcal/mol. Higher
//! (less negative) values mean a less stable, more accessible start.

use std::fmt;
use std::io;
use std::process::Command;

use thiserror::Error;
use tracing::debug;

/// Sequence used to check that a folding command actually runs.
const PROBE_SEQUENCE: &str = "ATGGCCAAGCTGGCC";

/// Errors raised by a folding oracle.
#[derive(Debug, Error)]
pub enum OracleError {
    /// The program could not be started.
    #[error("failed to run folding command '{program}': {source}")]
    Spawn {
        /// Program name or path.
        program: String,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },

    /// The program ran but reported failure.
    #[error("folding command '{program}' exited with {status}: {stderr}")]
    Failed {
        /// Program name or path.
        program: String,
        /// Exit status.
        status: String,
        /// Captured standard error.
        stderr: String,
    },

    /// No finite number could be read from the output.
    #[error("could not read a free energy from folding output {0:?}")]
    Unparseable(String),

    /// Command line was empty.
    #[error("empty folding command")]
    EmptyCommand,
}

/// Minimum-free-energy estimator for nucleotide sequences.
pub trait FoldingOracle: Send + Sync + fmt::Debug {
    /// Free energy of the most stable structure of `nucleotides`, kcal/mol.
    fn free_energy(&self, nucleotides: &str) -> Result<f64, OracleError>;
}

/// Oracle backed by an external command such as `seqfold`.
///
/// The command is run as `<program> [args...] <sequence>` and the last
/// numeric token on its standard output is taken as the free energy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOracle {
    program: String,
    args: Vec<String>,
}

impl CommandOracle {
    /// Oracle running `program` with no extra arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append arguments placed before the sequence.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Split a whitespace-separated command line such as `seqfold -t 37`.
    pub fn parse(command_line: &str) -> Result<Self, OracleError> {
        let mut words = command_line.split_whitespace();
        let program = words.next().ok_or(OracleError::EmptyCommand)?;
        Ok(Self::new(program).with_args(words))
    }

    /// Program name or path.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run the command once on a short sequence. Returns `None` when it
    /// cannot be started or does not produce a free energy.
    pub fn probe(self) -> Option<Self> {
        match self.free_energy(PROBE_SEQUENCE) {
            Ok(dg) => {
                debug!(program = %self.program, dg, "folding command available");
                Some(self)
            }
            Err(err) => {
                debug!(program = %self.program, error = %err, "folding command unavailable");
                None
            }
        }
    }
}

impl FoldingOracle for CommandOracle {
    fn free_energy(&self, nucleotides: &str) -> Result<f64, OracleError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(nucleotides)
            .output()
            .map_err(|source| OracleError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(OracleError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_free_energy(&stdout).ok_or_else(|| OracleError::Unparseable(stdout.trim().to_string()))
    }
}

/// Last finite number among the whitespace-separated tokens of `output`.
pub fn parse_free_energy(output: &str) -> Option<f64> {
    output
        .split_whitespace()
        .rev()
        .filter_map(|token| token.trim_end_matches(|c: char| c == ',' || c == ';').parse::<f64>().ok())
        .find(|value| value.is_finite())
}
