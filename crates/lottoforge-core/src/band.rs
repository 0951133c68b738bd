use crate::combination::Combination;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Middle-50% band of main-number sums. Both ends are `None` when there was
/// no history to compute it from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SumBand {
    pub low: Option<u32>,
    pub high: Option<u32>,
}

impl SumBand {
    pub fn is_empty(&self) -> bool {
        self.low.is_none() || self.high.is_none()
    }

    pub fn contains(&self, sum: u32) -> bool {
        match (self.low, self.high) {
            (Some(lo), Some(hi)) => (lo..=hi).contains(&sum),
            _ => false,
        }
    }
}

impl fmt::Display for SumBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.low, self.high) {
            (Some(lo), Some(hi)) => write!(f, "{}–{}", lo, hi),
            _ => write!(f, "–"),
        }
    }
}

/// Nearest-rank 25th/75th percentile of the main sums.
pub fn band(history: &[Combination]) -> SumBand {
    let mut sums: Vec<u32> = history.iter().map(Combination::main_sum).collect();
    if sums.is_empty() {
        return SumBand::default();
    }
    sums.sort_unstable();

    let n = sums.len();
    SumBand {
        low: Some(sums[nearest_rank(n, 1, 4)]),
        high: Some(sums[nearest_rank(n, 3, 4)]),
    }
}

/// `ceil(num/den * n) - 1`, clamped to `0..n`.
fn nearest_rank(n: usize, num: usize, den: usize) -> usize {
    (num * n).div_ceil(den).saturating_sub(1).min(n - 1)
}
