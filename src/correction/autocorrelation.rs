use super::round2;
use crate::sequence::GrowingSequence;
use crate::tables::{CodonChoiceSet, CorrelationGroups};

/// Residues further back than this no longer bias the choice.
pub const AUTOCORRELATION_WINDOW: usize = 25;

/// Weight bonus for a recurrence `distance` residues back (0 = the
/// immediately preceding residue). Positive across the whole window.
pub fn autocorrelation_bonus(distance: usize) -> f64 {
    round2(-0.1601 * distance as f64 + 11.247)
}

/// Favour the codon (and its correlation group) used the last time the
/// residue at `index` occurred within [`AUTOCORRELATION_WINDOW`] residues.
///
/// `buffer` must hold exactly the codons for `protein[..index]`. The group
/// members each gain the bonus and the other synonyms give up
/// `bonus × group size` in proportion to their current weights. If the other
/// synonyms carry no weight at all they are left unchanged.
pub fn correct_autocorrelation(
    index: usize,
    protein: &[u8],
    buffer: &GrowingSequence,
    choices: &CodonChoiceSet,
    weights: &[f64],
    groups: &CorrelationGroups,
) -> Vec<f64> {
    if choices.is_single() {
        return weights.to_vec();
    }
    let Some(&residue) = protein.get(index) else {
        return weights.to_vec();
    };

    let distance = protein[..index]
        .iter()
        .rev()
        .take(AUTOCORRELATION_WINDOW)
        .position(|&r| r == residue);
    let Some(distance) = distance else {
        return weights.to_vec();
    };
    let Some(used) = buffer.codon_at(index - 1 - distance) else {
        return weights.to_vec();
    };

    let bonus = autocorrelation_bonus(distance);
    let group = groups.group_of(&used);
    let in_group: Vec<bool> = choices
        .iter()
        .map(|choice| group.contains(&choice.codon))
        .collect();

    let to_distribute = bonus * group.len() as f64;
    let prev_total: f64 = weights
        .iter()
        .zip(&in_group)
        .filter(|&(_, &member)| !member)
        .map(|(w, _)| w)
        .sum();
    let new_total = prev_total - to_distribute;

    weights
        .iter()
        .zip(&in_group)
        .map(|(&w, &member)| {
            if member {
                w + bonus
            } else if prev_total != 0.0 {
                new_total * w / prev_total
            } else {
                w
            }
        })
        .collect()
}
