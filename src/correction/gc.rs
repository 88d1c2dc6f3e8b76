//! GC-content correction driven by a four-parameter logistic curve.
//!
//! The curve maps the current GC% of the growing buffer to a correction
//! ratio: 0 at the target, approaching ±1 towards 0% and 100% GC. The
//! ratio shifts weight between codons with an A/T wobble base and codons
//! with a G/C wobble base.

use super::{round2, CorrectionError};
use crate::tables::CodonChoiceSet;

/// Buffers shorter than this many nucleotides are never corrected.
pub const GC_CORRECTION_MIN_LENGTH: usize = 10;

/// Inner calibration knees for targets well inside them.
const LOWER_KNEE: f64 = 40.0;
const UPPER_KNEE: f64 = 70.0;
/// Closest a knee may sit to the target before it is moved.
const KNEE_GAP: f64 = 5.0;

const MAX_ITERATIONS: usize = 200;
const MAX_DAMPING: f64 = 1e12;
const MAX_SLOPE: f64 = 500.0;
const START_SLOPES: [f64; 4] = [2.0, 4.0, 8.0, 16.0];

/// Four-parameter logistic: `((A - D) / (1 + (x / C)^B)) + D`.
pub fn logistic4(x: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    (a - d) / (1.0 + (x / c).powf(b)) + d
}

/// Calibration points `(GC%, ratio)` for `target`; the point `(target, 0)`
/// is enforced exactly by the fit. The knees sit at 40% and 70% and move
/// towards the nearer bound once the target comes within [`KNEE_GAP`] of
/// them, so the points always rise through the target.
fn calibration(target: f64) -> [(f64, f64); 4] {
    let lower = LOWER_KNEE.min((target - KNEE_GAP).max(target / 2.0));
    let upper = UPPER_KNEE.max((target + KNEE_GAP).min((target + 100.0) / 2.0));
    [(1e-9, -1.0), (lower, -0.9), (upper, 0.9), (100.0, 1.0)]
}

/// Fitted `A, B, C, D` for one target GC%.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogisticParameters {
    /// Lower asymptote.
    pub a: f64,
    /// Slope.
    pub b: f64,
    /// Inflection point.
    pub c: f64,
    /// Upper asymptote.
    pub d: f64,
    target: f64,
}

impl LogisticParameters {
    /// Least-squares fit against the calibration points anchored at
    /// `target`.
    ///
    /// `D` is eliminated through `A + D (target / C)^B = 0`, so the fitted
    /// curve is exactly zero at the target. The search is restricted to
    /// rising curves (`A < 0 < D`, `0 < B <= 500`, `0 < C <= 100`): below
    /// the target the curve is negative, above it positive. The three free
    /// parameters are solved with Levenberg-Marquardt damping from several
    /// `(B, C)` starts and the cheapest admissible solution is kept.
    pub fn fit(target: f64) -> Result<Self, CorrectionError> {
        if !target.is_finite() || target <= 0.0 || target >= 100.0 {
            return Err(CorrectionError::InvalidTarget(target));
        }

        let points = calibration(target);
        let (lower, upper) = (points[1].0, points[2].0);
        let inflections = [target, (lower + target) / 2.0, (target + upper) / 2.0];

        let mut best: Option<([f64; 3], f64)> = None;
        for &b in &START_SLOPES {
            for &c in &inflections {
                let Some((params, cost)) = refine([-1.0, b, c], &points, target) else {
                    continue;
                };
                if best.map_or(true, |(_, best_cost)| cost < best_cost) {
                    best = Some((params, cost));
                }
            }
        }

        let (params, _) = best.ok_or(CorrectionError::Diverged(target))?;
        let [a, b, c, d] = full_parameters(&params, target);
        Ok(Self { a, b, c, d, target })
    }

    /// Curve value at `gc`, clamped to `[-1, 1]`.
    pub fn evaluate(&self, gc: f64) -> f64 {
        logistic4(gc, self.a, self.b, self.c, self.d).clamp(-1.0, 1.0)
    }

    /// Correction ratio `|logistic4(gc)|`, in `[0, 1]`.
    pub fn ratio(&self, gc: f64) -> f64 {
        self.evaluate(gc).abs()
    }

    /// Target GC% the curve is anchored to.
    pub fn target(&self) -> f64 {
        self.target
    }
}

/// Damped Gauss-Newton descent from `start`. Steps that leave the
/// admissible region are rejected like steps that raise the cost.
fn refine(start: [f64; 3], points: &[(f64, f64); 4], target: f64) -> Option<([f64; 3], f64)> {
    let mut params = start;
    if !admissible(&params, target) {
        return None;
    }
    let mut cost = sum_of_squares(&params, points, target);
    let mut damping = 1e-3;

    for _ in 0..MAX_ITERATIONS {
        let residuals = residuals(&params, points, target);
        let jacobian = jacobian(&params, points, target);

        // Normal equations: (JᵀJ + λ diag(JᵀJ)) δ = Jᵀ r
        let mut jtj = [[0.0; 3]; 3];
        let mut jtr = [0.0; 3];
        for i in 0..3 {
            for j in 0..3 {
                jtj[i][j] = (0..points.len())
                    .map(|k| jacobian[k][i] * jacobian[k][j])
                    .sum();
            }
            jtr[i] = (0..points.len())
                .map(|k| jacobian[k][i] * residuals[k])
                .sum();
        }

        let mut improvement = None;
        while damping < MAX_DAMPING {
            let mut system = jtj;
            for (i, row) in system.iter_mut().enumerate() {
                row[i] += damping * jtj[i][i];
            }
            if let Some(step) = solve3(system, jtr) {
                let candidate = [params[0] + step[0], params[1] + step[1], params[2] + step[2]];
                if admissible(&candidate, target) {
                    let candidate_cost = sum_of_squares(&candidate, points, target);
                    if candidate_cost.is_finite() && candidate_cost < cost {
                        improvement = Some(cost - candidate_cost);
                        params = candidate;
                        cost = candidate_cost;
                        damping = (damping / 10.0).max(1e-12);
                        break;
                    }
                }
            }
            damping *= 10.0;
        }

        match improvement {
            Some(delta) if delta >= 1e-14 => continue,
            _ => break,
        }
    }

    cost.is_finite().then_some((params, cost))
}

/// Rising curve with finite parameters that really vanishes at `target`.
fn admissible(free: &[f64; 3], target: f64) -> bool {
    let [a, b, c, d] = full_parameters(free, target);
    a < 0.0
        && b > 0.0
        && b <= MAX_SLOPE
        && c > 0.0
        && c <= 100.0
        && d.is_finite()
        && d > 0.0
        && logistic4(target, a, b, c, d).abs() <= 1e-9 * (1.0 + d - a)
}

fn full_parameters(free: &[f64; 3], target: f64) -> [f64; 4] {
    let [a, b, c] = *free;
    let d = -a / (target / c).powf(b);
    [a, b, c, d]
}

fn residuals(free: &[f64; 3], points: &[(f64, f64); 4], target: f64) -> [f64; 4] {
    let [a, b, c, d] = full_parameters(free, target);
    let mut out = [0.0; 4];
    for (slot, &(x, y)) in out.iter_mut().zip(points.iter()) {
        *slot = y - logistic4(x, a, b, c, d);
    }
    out
}

fn sum_of_squares(free: &[f64; 3], points: &[(f64, f64); 4], target: f64) -> f64 {
    residuals(free, points, target).iter().map(|r| r * r).sum()
}

/// Derivative of the model (not the residual) w.r.t. each free parameter.
fn jacobian(free: &[f64; 3], points: &[(f64, f64); 4], target: f64) -> [[f64; 3]; 4] {
    let mut jac = [[0.0; 3]; 4];
    for p in 0..3 {
        let h = 1e-6 * free[p].abs().max(1.0);
        let mut plus = *free;
        let mut minus = *free;
        plus[p] += h;
        minus[p] -= h;
        let r_plus = residuals(&plus, points, target);
        let r_minus = residuals(&minus, points, target);
        for k in 0..4 {
            jac[k][p] = -(r_plus[k] - r_minus[k]) / (2.0 * h);
        }
    }
    jac
}

/// Gaussian elimination with partial pivoting.
fn solve3(mut m: [[f64; 3]; 3], mut rhs: [f64; 3]) -> Option<[f64; 3]> {
    for col in 0..3 {
        let pivot = (col..3).max_by(|&a, &b| m[a][col].abs().total_cmp(&m[b][col].abs()))?;
        if m[pivot][col].abs() < 1e-300 || !m[pivot][col].is_finite() {
            return None;
        }
        m.swap(col, pivot);
        rhs.swap(col, pivot);
        for row in 0..3 {
            if row != col {
                let factor = m[row][col] / m[col][col];
                for k in col..3 {
                    m[row][k] -= factor * m[col][k];
                }
                rhs[row] -= factor * rhs[col];
            }
        }
    }
    let solution = [rhs[0] / m[0][0], rhs[1] / m[1][1], rhs[2] / m[2][2]];
    solution.iter().all(|v| v.is_finite()).then_some(solution)
}

/// Shift weight between A/T- and G/C-wobble synonyms according to how far
/// `gc` (GC% of the buffer) is from the target.
///
/// Buffers shorter than [`GC_CORRECTION_MIN_LENGTH`] are left untouched and
/// single-codon residues always get `[100]`. A wobble group whose total
/// weight is zero keeps its weights, since there is nothing to rescale.
pub fn correct_gc(
    choices: &CodonChoiceSet,
    weights: &[f64],
    gc: f64,
    buffer_len: usize,
    params: &LogisticParameters,
) -> Vec<f64> {
    if buffer_len < GC_CORRECTION_MIN_LENGTH {
        return weights.to_vec();
    }
    if choices.is_single() {
        return vec![100.0];
    }

    let y = params.ratio(gc);
    let at_wobble: Vec<bool> = choices
        .iter()
        .map(|choice| matches!(choice.codon[2], b'A' | b'T'))
        .collect();

    let (prev_at, prev_gc) = weights
        .iter()
        .zip(&at_wobble)
        .fold((0.0, 0.0), |(at, gc), (&w, &is_at)| {
            if is_at {
                (at + w, gc)
            } else {
                (at, gc + w)
            }
        });
    let new_at = prev_at + y * prev_gc;
    let new_gc = prev_gc + y * prev_at;

    let target = params.target();
    if gc > target {
        weights
            .iter()
            .zip(&at_wobble)
            .map(|(&w, &is_at)| match is_at {
                false => round2((1.0 - y) * w),
                true if prev_at > 0.0 => round2(new_at * w / prev_at),
                true => w,
            })
            .collect()
    } else if gc < target {
        weights
            .iter()
            .zip(&at_wobble)
            .map(|(&w, &is_at)| match is_at {
                true => round2((1.0 - y) * w),
                false if prev_gc > 0.0 => round2(new_gc * w / prev_gc),
                false => w,
            })
            .collect()
    } else {
        weights.to_vec()
    }
}
