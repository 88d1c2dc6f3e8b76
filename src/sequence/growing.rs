use super::Codon;

/// GC percentage of `nucleotides`, rounded to one decimal. Empty input is 0.
pub fn gc_percent(nucleotides: &[u8]) -> f64 {
    if nucleotides.is_empty() {
        return 0.0;
    }
    let gc = nucleotides
        .iter()
        .filter(|&&b| matches!(b, b'G' | b'C'))
        .count();
    let percent = gc as f64 * 100.0 / nucleotides.len() as f64;
    (percent * 10.0).round() / 10.0
}

/// Number of `CG` dinucleotides.
pub fn cpg_count(nucleotides: &[u8]) -> usize {
    nucleotides.windows(2).filter(|w| w == b"CG").count()
}

/// Nucleotide buffer grown one codon at a time.
///
/// The buffer only ever holds whole codons, so its length is `3 * cursor()`
/// and every truncation lands on a codon boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrowingSequence {
    buffer: Vec<u8>,
}

impl GrowingSequence {
    /// Empty buffer sized for `residues` codons.
    pub fn with_capacity(residues: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(residues * 3),
        }
    }

    /// Buffer seeded with whole codons. Trailing partial codons are dropped.
    pub fn from_codons(nucleotides: &[u8]) -> Self {
        let whole = nucleotides.len() - nucleotides.len() % 3;
        Self {
            buffer: nucleotides[..whole].to_vec(),
        }
    }

    /// Index of the next residue to backtranslate.
    pub fn cursor(&self) -> usize {
        self.buffer.len() / 3
    }

    /// Length in nucleotides.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True when no codon has been placed.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Raw nucleotides.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Append one codon.
    pub fn push_codon(&mut self, codon: &Codon) {
        self.buffer.extend_from_slice(codon);
    }

    /// Codon placed for residue `index`.
    pub fn codon_at(&self, index: usize) -> Option<Codon> {
        let start = index * 3;
        self.buffer
            .get(start..start + 3)
            .map(|slice| [slice[0], slice[1], slice[2]])
    }

    /// Most recently placed codon.
    pub fn last_codon(&self) -> Option<Codon> {
        self.cursor().checked_sub(1).and_then(|i| self.codon_at(i))
    }

    /// Cut the buffer back to the start of the codon containing nucleotide
    /// `position`. Returns the new cursor.
    pub fn truncate_at(&mut self, position: usize) -> usize {
        let boundary = position - position % 3;
        self.buffer.truncate(boundary);
        self.cursor()
    }

    /// Replace the contents with `seed` (a frozen prefix or nothing).
    pub fn reset_to(&mut self, seed: &[u8]) {
        debug_assert_eq!(seed.len() % 3, 0, "seed must hold whole codons");
        self.buffer.clear();
        self.buffer.extend_from_slice(seed);
    }

    /// GC percentage of the current buffer, one decimal.
    pub fn gc_percent(&self) -> f64 {
        gc_percent(&self.buffer)
    }

    /// Consume into an owned string.
    pub fn into_string(self) -> String {
        self.buffer.into_iter().map(char::from).collect()
    }
}
