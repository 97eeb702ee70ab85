//! Domain contracts and numeric-safety rescaling
//!
//! Every operator declares the interval it consumes and produces. The
//! rescale functions map the observed range of a value array onto a target
//! interval, which is how randomly assembled expressions are kept inside
//! each operator's domain regardless of what their subtrees produce.

use serde::{Deserialize, Serialize};

/// Observed spreads below this are treated as constant input.
pub const SPREAD_EPSILON: f32 = 1e-3;

/// A closed numeric interval used as an operator domain contract.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub lo: f32,
    pub hi: f32,
}

impl Interval {
    /// Unconstrained: any real value.
    pub const ANY: Interval = Interval {
        lo: f32::NEG_INFINITY,
        hi: f32::INFINITY,
    };

    /// The displayable unit interval.
    pub const UNIT: Interval = Interval { lo: 0.0, hi: 1.0 };

    pub const fn new(lo: f32, hi: f32) -> Self {
        Self { lo, hi }
    }

    pub fn is_bounded(self) -> bool {
        self.lo.is_finite() && self.hi.is_finite()
    }

    pub fn midpoint(self) -> f32 {
        (self.lo + self.hi) * 0.5
    }

    pub fn contains(self, value: f32, tolerance: f32) -> bool {
        value >= self.lo - tolerance && value <= self.hi + tolerance
    }
}

/// How the source range of a rescale is observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RescalePolicy {
    /// Literal observed minimum and maximum.
    #[default]
    MinMax,
    /// 5th/95th percentile band; outliers are clipped to it.
    Percentile,
}

/// Linearly map the observed range of `values` onto `target`.
///
/// If the observed spread is below [`SPREAD_EPSILON`] the input is
/// effectively constant and every element maps to the target midpoint.
pub fn rescale(values: &[f32], target: Interval) -> Vec<f32> {
    let (lo, hi) = min_max(values);
    rescale_from(values, lo, hi, target)
}

/// Like [`rescale`] but sources the range from the 5th/95th percentile of
/// the observed distribution, clipping outliers to that band so a single
/// extreme sample cannot collapse the rescale of the rest of the field.
pub fn rescale_robust(values: &[f32], target: Interval) -> Vec<f32> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let lo = percentile(&sorted, 0.05);
    let hi = percentile(&sorted, 0.95);
    rescale_from(values, lo, hi, target)
}

/// Rescale under the given policy.
pub fn rescale_with(policy: RescalePolicy, values: &[f32], target: Interval) -> Vec<f32> {
    match policy {
        RescalePolicy::MinMax => rescale(values, target),
        RescalePolicy::Percentile => rescale_robust(values, target),
    }
}

fn rescale_from(values: &[f32], src_lo: f32, src_hi: f32, target: Interval) -> Vec<f32> {
    if src_hi - src_lo < SPREAD_EPSILON {
        return vec![target.midpoint(); values.len()];
    }
    let scale = (target.hi - target.lo) / (src_hi - src_lo);
    values
        .iter()
        .map(|&v| target.lo + (v.clamp(src_lo, src_hi) - src_lo) * scale)
        .collect()
}

fn min_max(values: &[f32]) -> (f32, f32) {
    let mut lo = f32::INFINITY;
    let mut hi = f32::NEG_INFINITY;
    for &v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    (lo, hi)
}

/// Linear-interpolated percentile of an already-sorted slice.
fn percentile(sorted: &[f32], q: f32) -> f32 {
    if sorted.is_empty() {
        return 0.0;
    }
    let pos = q * (sorted.len() - 1) as f32;
    let idx = pos.floor() as usize;
    let frac = pos - idx as f32;
    if idx + 1 < sorted.len() {
        sorted[idx] + (sorted[idx + 1] - sorted[idx]) * frac
    } else {
        sorted[idx]
    }
}
