//! Settings and thresholds for one grower variant
//!
//! Two variants exist:
//! - main pass: chunks of 10 residues, restart after 200 restriction-site
//!   truncations, GC band enforced on completion
//! - prefix pass: chunks of 20 residues, restart after 150 truncations,
//!   no GC gating

/// Default GC floor for a completed sequence.
pub const DEFAULT_MIN_GC: f64 = 48.0;
/// Default GC ceiling for a completed sequence.
pub const DEFAULT_MAX_GC: f64 = 60.0;
/// Threshold moved by this much every [`RELAX_EVERY`] GC restarts.
pub const RELAX_STEP: f64 = 0.5;
/// GC restarts of one kind between two relaxations.
pub const RELAX_EVERY: usize = 10;

/// Tunables that distinguish the main and prefix growers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GrowthSettings {
    /// Residues appended between two motif scans.
    pub chunk: usize,
    /// Restriction-site truncations allowed before a full restart.
    pub restart_cap: usize,
    /// A/T and pyrimidine runs stop being checked once their counter
    /// exceeds this.
    pub motif_check_limit: usize,
    /// Enforce the GC band on completion.
    pub gc_gating: bool,
}

impl GrowthSettings {
    /// Full-length candidate growth.
    pub fn main() -> Self {
        Self {
            chunk: 10,
            restart_cap: 200,
            motif_check_limit: 100,
            gc_gating: true,
        }
    }

    /// Translation-initiation prefix growth.
    pub fn prefix() -> Self {
        Self {
            chunk: 20,
            restart_cap: 150,
            motif_check_limit: 100,
            gc_gating: false,
        }
    }

    /// Override the chunk size (minimum 1).
    pub fn with_chunk(mut self, chunk: usize) -> Self {
        self.chunk = chunk.max(1);
        self
    }
}

impl Default for GrowthSettings {
    fn default() -> Self {
        Self::main()
    }
}

/// GC band a completed sequence must fall in.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GcThresholds {
    /// Inclusive floor.
    pub min: f64,
    /// Inclusive ceiling.
    pub max: f64,
}

impl GcThresholds {
    /// Initial band for a target GC%: floor 48, ceiling 60 or `target + 2`
    /// for targets of 60 and above.
    pub fn for_target(target: f64) -> Self {
        let max = if target >= DEFAULT_MAX_GC {
            target + 2.0
        } else {
            DEFAULT_MAX_GC
        };
        Self {
            min: DEFAULT_MIN_GC,
            max,
        }
    }

    /// True when `gc` lies inside the band.
    pub fn contains(&self, gc: f64) -> bool {
        gc >= self.min && gc <= self.max
    }

    /// Record one restart for GC above the ceiling; `restarts` is the new
    /// running count.
    pub fn relax_max(&mut self, restarts: usize) {
        if restarts % RELAX_EVERY == 0 {
            self.max += RELAX_STEP;
        }
    }

    /// Record one restart for GC below the floor.
    pub fn relax_min(&mut self, restarts: usize) {
        if restarts % RELAX_EVERY == 0 {
            self.min -= RELAX_STEP;
        }
    }
}
