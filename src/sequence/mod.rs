//! Sequence primitives shared by every stage of the engine.
//!
//! Protein input is parsed once into an immutable [`AminoAcidSequence`];
//! the nucleotide side is grown codon by codon inside a
//! [`GrowingSequence`].

mod growing;
mod protein;

pub use growing::{cpg_count, gc_percent, GrowingSequence};
pub use protein::{AminoAcidSequence, SequenceError, STOP};

/// Nucleotide triplet stored as uppercase ASCII.
pub type Codon = [u8; 3];

/// Parse a three-letter codon, upper-casing and mapping `U` to `T`.
pub fn parse_codon(text: &str) -> Option<Codon> {
    let bytes = text.trim().as_bytes();
    if bytes.len() != 3 {
        return None;
    }
    let mut codon = [0u8; 3];
    for (slot, &byte) in codon.iter_mut().zip(bytes) {
        *slot = match byte.to_ascii_uppercase() {
            b'U' => b'T',
            base @ (b'A' | b'C' | b'G' | b'T') => base,
            _ => return None,
        };
    }
    Some(codon)
}
