//! Forbidden-motif scanning
//!
//! Motifs are checked in priority order:
//! - restriction sites (BamHI `GGATCC`, SpeI `ACTAGT`)
//! - homopolymers of 6 or more
//! - A/T stretches of 8 or more
//! - pyrimidine (C/T) stretches of 10 or more
//!
//! CpG dinucleotides are only counted for scoring. Every finder returns the
//! leftmost motif start in nucleotides; callers cut the buffer back to the
//! codon containing that position.

pub use crate::sequence::cpg_count;

/// BamHI recognition site.
pub const BAMHI: &[u8; 6] = b"GGATCC";
/// SpeI recognition site.
pub const SPEI: &[u8; 6] = b"ACTAGT";

/// Minimum homopolymer length that is rejected.
pub const HOMOPOLYMER_MIN: usize = 6;
/// Minimum A/T stretch that is rejected.
pub const AT_RUN_MIN: usize = 8;
/// Minimum C/T stretch that is rejected.
pub const PYRIMIDINE_RUN_MIN: usize = 10;

/// Motif kinds, in scan priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Motif {
    /// BamHI or SpeI site.
    RestrictionSite,
    /// Six or more identical nucleotides.
    Homopolymer,
    /// Eight or more nucleotides from {A, T}.
    AtRun,
    /// Ten or more nucleotides from {C, T}.
    PyrimidineRun,
}

impl Motif {
    /// All kinds in the order they are checked.
    pub const PRIORITY: [Motif; 4] = [
        Motif::RestrictionSite,
        Motif::Homopolymer,
        Motif::AtRun,
        Motif::PyrimidineRun,
    ];
}

/// Leftmost occurrence of a motif.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotifHit {
    /// Kind of motif.
    pub motif: Motif,
    /// Start offset in nucleotides.
    pub start: usize,
}

/// Scanner for the forbidden motifs.
#[derive(Debug, Clone)]
pub struct MotifGuard {
    sites: Vec<Vec<u8>>,
}

impl Default for MotifGuard {
    fn default() -> Self {
        Self {
            sites: vec![BAMHI.to_vec(), SPEI.to_vec()],
        }
    }
}

impl MotifGuard {
    /// Guard with a custom set of restriction sites.
    pub fn with_sites<I, S>(sites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        Self {
            sites: sites
                .into_iter()
                .map(|s| s.as_ref().to_ascii_uppercase())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Restriction sites being avoided.
    pub fn sites(&self) -> impl Iterator<Item = &[u8]> {
        self.sites.iter().map(Vec::as_slice)
    }

    /// Leftmost occurrence of `motif` in `nucleotides`.
    pub fn find(&self, motif: Motif, nucleotides: &[u8]) -> Option<usize> {
        match motif {
            Motif::RestrictionSite => self.find_restriction_site(nucleotides),
            Motif::Homopolymer => find_homopolymer(nucleotides),
            Motif::AtRun => find_run(nucleotides, AT_RUN_MIN, |b| matches!(b, b'A' | b'T')),
            Motif::PyrimidineRun => {
                find_run(nucleotides, PYRIMIDINE_RUN_MIN, |b| matches!(b, b'C' | b'T'))
            }
        }
    }

    /// Leftmost position where any restriction site starts.
    pub fn find_restriction_site(&self, nucleotides: &[u8]) -> Option<usize> {
        (0..nucleotides.len()).find(|&pos| {
            self.sites
                .iter()
                .any(|site| nucleotides[pos..].starts_with(site))
        })
    }

    /// First hit of each motif kind present, in priority order.
    pub fn violations(&self, nucleotides: &[u8]) -> Vec<MotifHit> {
        Motif::PRIORITY
            .iter()
            .filter_map(|&motif| {
                self.find(motif, nucleotides)
                    .map(|start| MotifHit { motif, start })
            })
            .collect()
    }

    /// True when no forbidden motif is present.
    pub fn is_clean(&self, nucleotides: &[u8]) -> bool {
        Motif::PRIORITY
            .iter()
            .all(|&motif| self.find(motif, nucleotides).is_none())
    }
}

/// Start of the first run of `HOMOPOLYMER_MIN` or more identical bases.
pub fn find_homopolymer(nucleotides: &[u8]) -> Option<usize> {
    let mut start = 0;
    for pos in 1..=nucleotides.len() {
        if pos == nucleotides.len() || nucleotides[pos] != nucleotides[start] {
            if pos - start >= HOMOPOLYMER_MIN {
                return Some(start);
            }
            start = pos;
        }
    }
    None
}

/// Start of the first run of at least `min_len` bases matching `in_class`.
pub fn find_run(nucleotides: &[u8], min_len: usize, in_class: impl Fn(u8) -> bool) -> Option<usize> {
    let mut run = 0;
    for (pos, &base) in nucleotides.iter().enumerate() {
        if in_class(base) {
            run += 1;
            if run >= min_len {
                return Some(pos + 1 - run);
            }
        } else {
            run = 0;
        }
    }
    None
}
