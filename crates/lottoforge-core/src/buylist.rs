use crate::band::SumBand;
use crate::combination::Combination;
use crate::generator::context::HistoryContext;
use crate::scorer::{AggregateHitResult, BatchPool, RowRef, Tier};
use fnv::FnvHashSet;
use serde::Serialize;
use std::cmp::Ordering;

const HOT_WEIGHT: f64 = 1.3;
const OVERDUE_WEIGHT: f64 = 1.1;
const VIP_WEIGHT: f64 = 1.6;
const BAND_WEIGHT: f64 = 0.8;
const SPREAD_WEIGHT: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuyListEntry {
    pub combination: Combination,
    /// Best tier this row reached in the aggregate pass, if any.
    pub tier: Option<Tier>,
    /// Appearances across all runs of the pool.
    pub frequency: usize,
    pub score: f64,
}

/// Ranking score of a row against the history pools.
///
/// Each main found in `hot`, `overdue` or `vip` adds that pool's weight. A
/// valid band adds up to 0.8 for a main sum near its middle (negative far
/// outside it), and the spread `max - min` of the mains adds 0.2 per step.
pub fn score(c: &Combination, ctx: &HistoryContext, band: &SumBand) -> f64 {
    let mains = c.mains();
    let mut s = HOT_WEIGHT * count_in(mains, &ctx.hot)
        + OVERDUE_WEIGHT * count_in(mains, &ctx.overdue)
        + VIP_WEIGHT * count_in(mains, &ctx.vip);

    if let (Some(lo), Some(hi)) = (band.low, band.high) {
        if hi > lo {
            let mid = 0.5 * f64::from(lo + hi);
            let width = f64::from(hi - lo);
            s += BAND_WEIGHT * (1.0 - (f64::from(c.main_sum()) - mid).abs() / width);
        }
    }

    let (lo, hi) = match (mains.iter().min(), mains.iter().max()) {
        (Some(lo), Some(hi)) => (*lo, *hi),
        _ => return s,
    };
    s + SPREAD_WEIGHT * f64::from(hi - lo)
}

/// `pool` must be sorted.
fn count_in(mains: &[u8], pool: &[u8]) -> f64 {
    mains.iter().filter(|n| pool.binary_search(n).is_ok()).count() as f64
}

/// Higher score first, then earlier first appearance.
fn by_rank(a: &(f64, RowRef), b: &(f64, RowRef)) -> Ordering {
    b.0.total_cmp(&a.0).then(a.1.cmp(&b.1))
}

/// Picks up to `n` distinct rows from `pool`.
///
/// Rows that reached a tier come first, rarest tier first; rows of one tier
/// are ordered by [`score`], ties by first appearance. Remaining slots take
/// the most frequently generated rows, ties again broken by score. A short
/// list is returned when the pool runs out of distinct rows.
pub fn select(
    aggregate: &AggregateHitResult,
    pool: &BatchPool,
    ctx: &HistoryContext,
    band: &SumBand,
    n: usize,
) -> Vec<BuyListEntry> {
    let freq = pool.frequencies();
    let mut picked: FnvHashSet<&Combination> = FnvHashSet::default();
    let mut out = Vec::with_capacity(n);

    for (tier, rows) in aggregate.tier_rows.iter().rev() {
        let mut ranked: Vec<(&Combination, f64, RowRef)> = Vec::new();
        for at in rows {
            let Some(c) = pool.get(*at) else {
                continue;
            };
            if picked.insert(c) {
                ranked.push((c, score(c, ctx, band), *at));
            }
        }
        ranked.sort_by(|a, b| by_rank(&(a.1, a.2), &(b.1, b.2)));

        for (c, score, _) in ranked {
            if out.len() >= n {
                return out;
            }
            out.push(BuyListEntry {
                combination: c.clone(),
                tier: Some(*tier),
                frequency: freq.get(c).map_or(1, |f| f.count),
                score,
            });
        }
    }

    let mut rest: Vec<(&Combination, usize, f64, RowRef)> = freq
        .iter()
        .filter(|(c, _)| !picked.contains(*c))
        .map(|(c, f)| (*c, f.count, score(c, ctx, band), f.first))
        .collect();
    rest.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| by_rank(&(a.2, a.3), &(b.2, b.3))));

    out.extend(
        rest.into_iter()
            .take(n.saturating_sub(out.len()))
            .map(|(c, frequency, score, _)| BuyListEntry {
                combination: c.clone(),
                tier: None,
                frequency,
                score,
            }),
    );
    out
}
