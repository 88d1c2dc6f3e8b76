use std::collections::HashMap;
use std::io::BufRead;

use super::tsv::read_records;
use super::TableError;
use crate::sequence::{parse_codon, Codon};

/// Codons favoured together when a residue recurs nearby.
///
/// A codon missing from the map correlates only with itself.
#[derive(Debug, Clone, Default)]
pub struct CorrelationGroups {
    groups: HashMap<Codon, Vec<Codon>>,
}

impl CorrelationGroups {
    /// No correlations: every codon forms its own group.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a `codon<TAB>member,member,...` table.
    pub fn from_tsv<R: BufRead>(reader: R) -> Result<Self, TableError> {
        let mut groups = HashMap::new();
        for record in read_records(reader, 2)? {
            let codon = record.codon(0)?;
            let members = record.fields[1]
                .split(',')
                .map(|m| {
                    parse_codon(m).ok_or_else(|| TableError::Parse {
                        line: record.line,
                        message: format!("invalid codon '{}' in group", m.trim()),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            groups.insert(codon, members);
        }
        Ok(Self { groups })
    }

    /// Correlation group of `codon`, the codon itself when absent.
    pub fn group_of(&self, codon: &Codon) -> Vec<Codon> {
        self.groups
            .get(codon)
            .cloned()
            .unwrap_or_else(|| vec![*codon])
    }

    /// Number of codons with an explicit group.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True when no codon has an explicit group.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
