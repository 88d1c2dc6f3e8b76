#![allow(dead_code)]

use std::sync::Arc;

use backtrans::{
    AminoAcidSequence, BacktranslationConfig, BacktranslationOrchestrator, EngineContext, GeneJob,
    MotifGuard, Profile,
};

pub fn orchestrator(config: BacktranslationConfig) -> BacktranslationOrchestrator {
    let context = EngineContext::builtin(config).expect("context builds");
    BacktranslationOrchestrator::new(Arc::new(context))
}

pub fn job(name: &str, protein: &str) -> GeneJob {
    GeneJob::new(name, AminoAcidSequence::parse(protein).expect("valid protein"))
}

/// True when every triplet of `nucleotides` encodes the matching residue.
pub fn decodes_to(profile: &Profile, protein: &[u8], nucleotides: &str) -> bool {
    let bytes = nucleotides.as_bytes();
    bytes.len() == protein.len() * 3
        && protein
            .iter()
            .zip(bytes.chunks_exact(3))
            .all(|(&residue, codon)| profile.codons.encodes(residue, &[codon[0], codon[1], codon[2]]))
}

/// Fraction of codons whose third base is G or C.
pub fn gc3(nucleotides: &str) -> f64 {
    let codons: Vec<&[u8]> = nucleotides.as_bytes().chunks_exact(3).collect();
    let gc = codons
        .iter()
        .filter(|codon| matches!(codon[2], b'G' | b'C'))
        .count();
    gc as f64 / codons.len() as f64
}

pub fn fingerprint(text: &str) -> blake3::Hash {
    blake3::hash(text.as_bytes())
}

pub fn has_restriction_site(nucleotides: &str) -> bool {
    MotifGuard::default()
        .find_restriction_site(nucleotides.as_bytes())
        .is_some()
}
