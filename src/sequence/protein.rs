use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

/// Stop marker used in protein input.
pub const STOP: u8 = b'*';

/// Residue symbols accepted on input: the 20 standard amino acids,
/// selenocysteine (`U`) and the stop marker.
const ALPHABET: &[u8] = b"ACDEFGHIKLMNPQRSTVWYU*";

/// Errors raised while parsing protein input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SequenceError {
    /// Input contained no residues.
    #[error("amino-acid sequence is empty")]
    Empty,

    /// Input contained a symbol outside the residue alphabet.
    #[error("invalid residue '{symbol}' at position {position}")]
    InvalidResidue {
        /// Offending symbol.
        symbol: char,
        /// 0-based residue position.
        position: usize,
    },
}

/// Immutable protein sequence stored as uppercase ASCII residues.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AminoAcidSequence {
    residues: Arc<[u8]>,
}

impl AminoAcidSequence {
    /// Parse residues from text. Whitespace is skipped and lowercase input
    /// is upper-cased.
    pub fn parse(text: &str) -> Result<Self, SequenceError> {
        let mut residues = Vec::with_capacity(text.len());
        for symbol in text.chars().filter(|c| !c.is_whitespace()) {
            let upper = symbol.to_ascii_uppercase();
            if !upper.is_ascii() || !ALPHABET.contains(&(upper as u8)) {
                return Err(SequenceError::InvalidResidue {
                    symbol,
                    position: residues.len(),
                });
            }
            residues.push(upper as u8);
        }
        Self::from_residues(residues)
    }

    /// Build from already-uppercased residue bytes.
    pub fn from_residues(residues: impl Into<Arc<[u8]>>) -> Result<Self, SequenceError> {
        let residues: Arc<[u8]> = residues.into();
        if residues.is_empty() {
            return Err(SequenceError::Empty);
        }
        if let Some(position) = residues.iter().position(|r| !ALPHABET.contains(r)) {
            return Err(SequenceError::InvalidResidue {
                symbol: residues[position] as char,
                position,
            });
        }
        Ok(Self { residues })
    }

    /// Number of residues.
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    /// Always false for a parsed sequence; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Residue bytes in order.
    pub fn residues(&self) -> &[u8] {
        &self.residues
    }

    /// Residue at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<u8> {
        self.residues.get(index).copied()
    }

    /// Leading `len` residues (the whole sequence if shorter).
    pub fn prefix(&self, len: usize) -> Self {
        let end = len.min(self.residues.len());
        if end == self.residues.len() {
            return self.clone();
        }
        Self {
            residues: Arc::from(&self.residues[..end]),
        }
    }
}

impl FromStr for AminoAcidSequence {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AminoAcidSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &residue in self.residues.iter() {
            write!(f, "{}", residue as char)?;
        }
        Ok(())
    }
}
