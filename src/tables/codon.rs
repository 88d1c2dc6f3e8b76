use std::collections::HashMap;
use std::io::BufRead;

use super::tsv::read_records;
use super::TableError;
use crate::sequence::{AminoAcidSequence, Codon};

/// A synonymous codon with its base usage weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CodonChoice {
    /// Nucleotide triplet.
    pub codon: Codon,
    /// Usage weight from the expression-system table.
    pub weight: f64,
}

/// Ordered synonymous codons for one residue.
///
/// The order is fixed when the table is loaded and every weight vector
/// produced during a run is indexed in this order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CodonChoiceSet {
    choices: Vec<CodonChoice>,
}

impl CodonChoiceSet {
    /// Build from `(codon, weight)` pairs in table order.
    pub fn new(choices: impl IntoIterator<Item = (Codon, f64)>) -> Self {
        Self {
            choices: choices
                .into_iter()
                .map(|(codon, weight)| CodonChoice { codon, weight })
                .collect(),
        }
    }

    /// Number of synonymous codons.
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    /// True when the set has no codon.
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// True for residues encoded by exactly one codon (M, W).
    pub fn is_single(&self) -> bool {
        self.choices.len() == 1
    }

    /// Choices in table order.
    pub fn iter(&self) -> impl Iterator<Item = &CodonChoice> {
        self.choices.iter()
    }

    /// Codon at `index`.
    pub fn codon(&self, index: usize) -> Option<Codon> {
        self.choices.get(index).map(|c| c.codon)
    }

    /// Position of `codon` in the set.
    pub fn index_of(&self, codon: &Codon) -> Option<usize> {
        self.choices.iter().position(|c| &c.codon == codon)
    }

    /// Uncorrected weights in table order.
    pub fn base_weights(&self) -> Vec<f64> {
        self.choices.iter().map(|c| c.weight).collect()
    }

    /// Base weight of `codon`.
    pub fn weight_of(&self, codon: &Codon) -> Option<f64> {
        self.choices.iter().find(|c| &c.codon == codon).map(|c| c.weight)
    }

    /// Largest base weight among the synonyms.
    pub fn max_weight(&self) -> f64 {
        self.choices.iter().map(|c| c.weight).fold(0.0, f64::max)
    }

    /// Index of the most frequent codon; the first one wins ties.
    pub fn most_frequent(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (idx, choice) in self.choices.iter().enumerate() {
            match best {
                Some(b) if self.choices[b].weight >= choice.weight => {}
                _ => best = Some(idx),
            }
        }
        best
    }

    fn push(&mut self, codon: Codon, weight: f64) {
        self.choices.push(CodonChoice { codon, weight });
    }
}

/// Single-codon usage table of an expression system.
#[derive(Debug, Clone, Default)]
pub struct CodonTable {
    residues: HashMap<u8, CodonChoiceSet>,
}

impl CodonTable {
    /// Build from `(residue, codon, weight)` rows; row order defines the
    /// choice order of every residue.
    pub fn from_rows(rows: impl IntoIterator<Item = (u8, Codon, f64)>) -> Result<Self, TableError> {
        let mut residues: HashMap<u8, CodonChoiceSet> = HashMap::new();
        for (residue, codon, weight) in rows {
            let set = residues.entry(residue).or_default();
            if set.index_of(&codon).is_some() {
                return Err(TableError::DuplicateCodon {
                    residue: residue as char,
                    codon: String::from_utf8_lossy(&codon).into_owned(),
                });
            }
            set.push(codon, weight);
        }
        Ok(Self { residues })
    }

    /// Load a `residue<TAB>codon<TAB>weight` table.
    pub fn from_tsv<R: BufRead>(reader: R) -> Result<Self, TableError> {
        let rows = read_records(reader, 3)?
            .into_iter()
            .map(|record| -> Result<(u8, Codon, f64), TableError> {
                Ok((record.residue(0)?, record.codon(1)?, record.weight(2)?))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rows(rows)
    }

    /// Synonymous codons of `residue`.
    pub fn choices(&self, residue: u8) -> Option<&CodonChoiceSet> {
        self.residues.get(&residue).filter(|set| !set.is_empty())
    }

    /// Synonymous codons of `residue`, or the fatal configuration error.
    pub fn require(&self, residue: u8) -> Result<&CodonChoiceSet, TableError> {
        self.choices(residue).ok_or(TableError::UnknownResidue {
            residue: residue as char,
        })
    }

    /// Fail on the first residue of `sequence` the table cannot encode.
    pub fn check_coverage(&self, sequence: &AminoAcidSequence) -> Result<(), TableError> {
        sequence
            .residues()
            .iter()
            .try_for_each(|&residue| self.require(residue).map(|_| ()))
    }

    /// Whether `codon` is a synonym of `residue` in this table.
    pub fn encodes(&self, residue: u8, codon: &Codon) -> bool {
        self.choices(residue)
            .map_or(false, |set| set.index_of(codon).is_some())
    }

    /// Residues present in the table.
    pub fn residues(&self) -> impl Iterator<Item = u8> + '_ {
        self.residues.keys().copied()
    }
}
