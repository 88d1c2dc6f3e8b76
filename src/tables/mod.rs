//! Read-only codon usage data.
//!
//! An expression-system [`Profile`] bundles the single-codon table, the
//! bicodon (codon context) table, the rule deciding when context applies,
//! and the autocorrelation groups. Built-in profiles are embedded from the
//! TSV files under `data/`; custom ones are loaded with the `from_tsv`
//! constructors.

mod bicodon;
mod codon;
mod correlation;
mod tsv;

pub use bicodon::{BicodonTable, ContextRules, ResiduePair};
pub use codon::{CodonChoice, CodonChoiceSet, CodonTable};
pub use correlation::CorrelationGroups;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

const HUMAN_CODONS: &str = include_str!("../../data/codon/human.tsv");
const B_CELL_CODONS: &str = include_str!("../../data/codon/b_cell.tsv");
const HEK293T_CODONS: &str = include_str!("../../data/codon/hek293t.tsv");
const HUMAN_BICODONS: &str = include_str!("../../data/bicodon/homo_sapiens.tsv");
const HUMAN_TRNA_BICODONS: &str = include_str!("../../data/bicodon/homo_sapiens_trna.tsv");
const B_CELL_BICODONS: &str = include_str!("../../data/bicodon/b_cell.tsv");
const HEK293T_BICODONS: &str = include_str!("../../data/bicodon/hek293t.tsv");
const B_CELL_CONTEXT: &str = include_str!("../../data/context/b_cell.tsv");
const HEK293T_CONTEXT: &str = include_str!("../../data/context/hek293t.tsv");
const HUMAN_CORRELATIONS: &str = include_str!("../../data/correlation/human.tsv");

/// Errors raised while loading codon usage data.
#[derive(Debug, Error)]
pub enum TableError {
    /// Residue has no codon in the active table.
    #[error("residue '{residue}' has no codon in the active table")]
    UnknownResidue {
        /// Residue symbol.
        residue: char,
    },

    /// Same codon listed twice for a residue.
    #[error("codon {codon} listed twice for residue '{residue}'")]
    DuplicateCodon {
        /// Residue symbol.
        residue: char,
        /// Duplicated codon.
        codon: String,
    },

    /// Malformed table line.
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What was wrong.
        message: String,
    },

    /// Unrecognised expression-system name.
    #[error("unknown expression profile '{0}' (expected one of: human, human-trna, b-cell, hek293t)")]
    UnknownProfile(String),

    /// Underlying read failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Built-in expression systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExpressionProfile {
    /// Homo sapiens, transcriptome average.
    #[default]
    HomoSapiens,
    /// Homo sapiens, bicodon usage corrected for tRNA abundance.
    HomoSapiensTrnaCorrected,
    /// Epstein-Barr immortalised B-cells, highly expressed genes.
    BCell,
    /// HEK293T cells, highly expressed genes.
    Hek293T,
}

impl ExpressionProfile {
    /// All built-in profiles.
    pub const ALL: [ExpressionProfile; 4] = [
        ExpressionProfile::HomoSapiens,
        ExpressionProfile::HomoSapiensTrnaCorrected,
        ExpressionProfile::BCell,
        ExpressionProfile::Hek293T,
    ];

    /// Short name used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HomoSapiens => "human",
            Self::HomoSapiensTrnaCorrected => "human-trna",
            Self::BCell => "b-cell",
            Self::Hek293T => "hek293t",
        }
    }

    /// Human-readable description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::HomoSapiens => "Homo sapiens (no tissue in particular)",
            Self::HomoSapiensTrnaCorrected => {
                "Homo sapiens (no tissue in particular, tRNA-corrected)"
            }
            Self::BCell => "B-cells (Epstein-Barr virally immortalized)",
            Self::Hek293T => "HEK293T-cells",
        }
    }
}

impl fmt::Display for ExpressionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpressionProfile {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "human" | "homo-sapiens" | "1" => Self::HomoSapiens,
            "human-trna" | "homo-sapiens-trna" | "2" => Self::HomoSapiensTrnaCorrected,
            "b-cell" | "bcell" | "3" => Self::BCell,
            "hek293t" | "hek" | "4" => Self::Hek293T,
            _ => return Err(TableError::UnknownProfile(s.to_string())),
        })
    }
}

/// Immutable codon usage data for one expression system.
#[derive(Debug, Clone)]
pub struct Profile {
    /// Display name.
    pub name: String,
    /// Single-codon usage.
    pub codons: CodonTable,
    /// Codon-context usage.
    pub bicodons: BicodonTable,
    /// When context usage applies.
    pub context: ContextRules,
    /// Autocorrelation groups.
    pub correlations: CorrelationGroups,
}

impl Profile {
    /// Load one of the embedded profiles.
    pub fn builtin(profile: ExpressionProfile) -> Result<Self, TableError> {
        let (codons, bicodons, context) = match profile {
            ExpressionProfile::HomoSapiens => (HUMAN_CODONS, HUMAN_BICODONS, None),
            ExpressionProfile::HomoSapiensTrnaCorrected => {
                (HUMAN_CODONS, HUMAN_TRNA_BICODONS, None)
            }
            ExpressionProfile::BCell => (B_CELL_CODONS, B_CELL_BICODONS, Some(B_CELL_CONTEXT)),
            ExpressionProfile::Hek293T => {
                (HEK293T_CODONS, HEK293T_BICODONS, Some(HEK293T_CONTEXT))
            }
        };
        let context = match context {
            Some(flags) => ContextRules::from_tsv(flags.as_bytes())?,
            None => ContextRules::Always,
        };
        Ok(Self {
            name: profile.description().to_string(),
            codons: CodonTable::from_tsv(codons.as_bytes())?,
            bicodons: BicodonTable::from_tsv(bicodons.as_bytes())?,
            context,
            correlations: CorrelationGroups::from_tsv(HUMAN_CORRELATIONS.as_bytes())?,
        })
    }

    /// Assemble a profile from separately loaded parts.
    pub fn custom(
        name: impl Into<String>,
        codons: CodonTable,
        bicodons: BicodonTable,
        context: ContextRules,
        correlations: CorrelationGroups,
    ) -> Self {
        Self {
            name: name.into(),
            codons,
            bicodons,
            context,
            correlations,
        }
    }
}
