use std::collections::{HashMap, HashSet};
use std::io::BufRead;

use super::codon::CodonChoiceSet;
use super::tsv::read_records;
use super::TableError;
use crate::sequence::{Codon, STOP};

/// Residue pair key: previous residue followed by current residue.
pub type ResiduePair = [u8; 2];

/// Codon-context weights keyed by residue pair and codon 6-mer.
#[derive(Debug, Clone, Default)]
pub struct BicodonTable {
    pairs: HashMap<ResiduePair, HashMap<(Codon, Codon), f64>>,
}

impl BicodonTable {
    /// Load a `pair<TAB>previous<TAB>codon<TAB>weight` table.
    pub fn from_tsv<R: BufRead>(reader: R) -> Result<Self, TableError> {
        let mut pairs: HashMap<ResiduePair, HashMap<(Codon, Codon), f64>> = HashMap::new();
        for record in read_records(reader, 4)? {
            let pair = record.residue_pair(0)?;
            let previous = record.codon(1)?;
            let codon = record.codon(2)?;
            let weight = record.weight(3)?;
            pairs.entry(pair).or_default().insert((previous, codon), weight);
        }
        Ok(Self { pairs })
    }

    /// Weight of `codon` following `previous` for the residue `pair`.
    pub fn weight(&self, pair: ResiduePair, previous: &Codon, codon: &Codon) -> Option<f64> {
        self.pairs.get(&pair)?.get(&(*previous, *codon)).copied()
    }

    /// Context weights for every choice of the current residue, in choice
    /// order. `None` when any row is missing.
    pub fn weights_for(
        &self,
        pair: ResiduePair,
        previous: &Codon,
        choices: &CodonChoiceSet,
    ) -> Option<Vec<f64>> {
        let rows = self.pairs.get(&pair)?;
        choices
            .iter()
            .map(|choice| rows.get(&(*previous, choice.codon)).copied())
            .collect()
    }

    /// Number of residue pairs with context data.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True when no context data is loaded.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// When bicodon weights replace the single-codon weights.
#[derive(Debug, Clone)]
pub enum ContextRules {
    /// Every residue after the first uses context, except the stop marker.
    Always,
    /// Only flagged (residue pair, previous codon) combinations use context.
    Selective(HashSet<(ResiduePair, Codon)>),
}

impl ContextRules {
    /// Load a `pair<TAB>previous` flag list for [`ContextRules::Selective`].
    pub fn from_tsv<R: BufRead>(reader: R) -> Result<Self, TableError> {
        let mut flags = HashSet::new();
        for record in read_records(reader, 2)? {
            flags.insert((record.residue_pair(0)?, record.codon(1)?));
        }
        Ok(Self::Selective(flags))
    }

    /// Whether the current residue should draw from the bicodon table.
    pub fn uses_context(&self, pair: ResiduePair, previous: &Codon) -> bool {
        match self {
            ContextRules::Always => pair[1] != STOP,
            ContextRules::Selective(flags) => flags.contains(&(pair, *previous)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "# pair\tprevious\tcodon\tweight\n\
        AK\tGCC\tAAA\t32\n\
        AK\tGCC\tAAG\t68\n\
        AK\tGCT\tAAA\t53\n\
        AK\tGCT\tAAG\t47\n";

    #[test]
    fn weights_follow_choice_order() {
        let table = BicodonTable::from_tsv(TABLE.as_bytes()).unwrap();
        let lys = CodonChoiceSet::new([(*b"AAG", 57.0), (*b"AAA", 43.0)]);
        assert_eq!(
            table.weights_for(*b"AK", b"GCC", &lys),
            Some(vec![68.0, 32.0])
        );
        assert_eq!(table.weights_for(*b"AK", b"GCA", &lys), None);
        assert_eq!(table.weight(*b"AK", b"GCT", b"AAA"), Some(53.0));
    }

    #[test]
    fn selective_rules_match_pair_and_previous_codon() {
        let rules = ContextRules::from_tsv("AL\tGCG\nAL\tGCA\n".as_bytes()).unwrap();
        assert!(rules.uses_context(*b"AL", b"GCG"));
        assert!(!rules.uses_context(*b"AL", b"GCC"));
        assert!(!rules.uses_context(*b"AK", b"GCG"));
    }

    #[test]
    fn always_rules_skip_stop() {
        assert!(ContextRules::Always.uses_context(*b"AK", b"GCC"));
        assert!(!ContextRules::Always.uses_context(*b"K*", b"AAA"));
    }
}
