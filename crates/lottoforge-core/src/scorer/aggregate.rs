use super::{check_shape, score_row, Tier};
use crate::combination::Combination;
use crate::error::LottoResult;
use crate::profile::GameProfile;
use fnv::FnvHashMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// One generated batch of candidate rows, in generation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CandidateBatch(pub Vec<Combination>);

impl CandidateBatch {
    pub fn rows(&self) -> &[Combination] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Combination>> for CandidateBatch {
    fn from(rows: Vec<Combination>) -> Self {
        Self(rows)
    }
}

/// Anything that can produce a fresh batch from an RNG. Implementations must
/// be pure functions of the RNG state so repeated runs are reproducible.
pub trait BatchSource: Sync {
    fn generate(&self, rng: &mut fastrand::Rng) -> CandidateBatch;
}

/// Position of a row inside a repeated-sampling pool: 0-based run index and
/// 1-based row position within that run's batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowRef {
    pub run: usize,
    pub row: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitResult {
    pub tier_counts: BTreeMap<Tier, usize>,
    /// 1-based row positions, ascending.
    pub tier_rows: BTreeMap<Tier, Vec<usize>>,
}

impl HitResult {
    fn record(&mut self, tier: Tier, position: usize) {
        *self.tier_counts.entry(tier).or_default() += 1;
        self.tier_rows.entry(tier).or_default().push(position);
    }

    /// Rows that reached any reportable tier.
    pub fn total(&self) -> usize {
        self.tier_counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.tier_counts.is_empty()
    }

    pub fn count(&self, tier: Tier) -> usize {
        self.tier_counts.get(&tier).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateHitResult {
    pub runs: usize,
    pub tier_counts: BTreeMap<Tier, usize>,
    /// Every (run, row) that reached the tier, in run order then row order.
    pub tier_rows: BTreeMap<Tier, Vec<RowRef>>,
}

impl AggregateHitResult {
    fn merge_run(&mut self, run: usize, hits: &HitResult) {
        for (tier, count) in &hits.tier_counts {
            *self.tier_counts.entry(*tier).or_default() += count;
        }
        for (tier, rows) in &hits.tier_rows {
            self.tier_rows
                .entry(*tier)
                .or_default()
                .extend(rows.iter().map(|&row| RowRef { run, row }));
        }
        self.runs += 1;
    }

    pub fn total(&self) -> usize {
        self.tier_counts.values().sum()
    }

    pub fn count(&self, tier: Tier) -> usize {
        self.tier_counts.get(&tier).copied().unwrap_or(0)
    }
}

/// Every batch generated during repeated sampling, indexed by run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchPool {
    pub batches: Vec<CandidateBatch>,
}

/// How often a distinct row appeared across the pool, and where first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowFrequency {
    pub count: usize,
    pub first: RowRef,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    pub runs: usize,
    pub total_rows: usize,
    pub unique_rows: usize,
    pub most_common_frequency: usize,
}

impl BatchPool {
    pub fn get(&self, at: RowRef) -> Option<&Combination> {
        self.batches
            .get(at.run)
            .and_then(|b| b.rows().get(at.row.checked_sub(1)?))
    }

    /// Rows in run order, then row order.
    pub fn rows(&self) -> impl Iterator<Item = (RowRef, &Combination)> {
        self.batches.iter().enumerate().flat_map(|(run, batch)| {
            batch
                .rows()
                .iter()
                .enumerate()
                .map(move |(i, c)| (RowRef { run, row: i + 1 }, c))
        })
    }

    pub fn frequencies(&self) -> FnvHashMap<&Combination, RowFrequency> {
        let mut freq: FnvHashMap<&Combination, RowFrequency> = FnvHashMap::default();
        for (at, c) in self.rows() {
            freq.entry(c)
                .and_modify(|f| f.count += 1)
                .or_insert(RowFrequency { count: 1, first: at });
        }
        freq
    }

    pub fn stats(&self) -> PoolStats {
        let freq = self.frequencies();
        PoolStats {
            runs: self.batches.len(),
            total_rows: self.batches.iter().map(CandidateBatch::len).sum(),
            unique_rows: freq.len(),
            most_common_frequency: freq.values().map(|f| f.count).max().unwrap_or(0),
        }
    }
}

/// Scores every row of `batch` against `target`.
pub fn aggregate(
    target: &Combination,
    batch: &CandidateBatch,
    profile: &GameProfile,
) -> LottoResult<HitResult> {
    check_shape(target, profile)?;

    let mut result = HitResult::default();
    for (i, row) in batch.rows().iter().enumerate() {
        if let Some(tier) = score_row(target, row, profile)? {
            result.record(tier, i + 1);
        }
    }
    Ok(result)
}

#[derive(Debug, Clone)]
pub struct RepeatedOutcome {
    pub aggregate: AggregateHitResult,
    pub pool: BatchPool,
    pub stats: PoolStats,
}

/// Generates `runs` fresh batches and scores each against `target`.
///
/// One seed per run is taken from `rng` before any generation starts, so the
/// outcome depends only on the incoming RNG state, not on `parallel`.
pub fn aggregate_repeated<S: BatchSource>(
    target: &Combination,
    profile: &GameProfile,
    runs: usize,
    source: &S,
    rng: &mut fastrand::Rng,
    parallel: bool,
) -> LottoResult<RepeatedOutcome> {
    check_shape(target, profile)?;

    let seeds: Vec<u64> = (0..runs).map(|_| rng.u64(..)).collect();
    let generate = |&seed: &u64| source.generate(&mut fastrand::Rng::with_seed(seed));

    let batches: Vec<CandidateBatch> = if parallel {
        seeds.par_iter().map(generate).collect()
    } else {
        seeds.iter().map(generate).collect()
    };

    let mut result = AggregateHitResult::default();
    for (run, batch) in batches.iter().enumerate() {
        let hits = aggregate(target, batch, profile)?;
        debug!("run {}: {} reportable rows", run, hits.total());
        result.merge_run(run, &hits);
    }

    let pool = BatchPool { batches };
    let stats = pool.stats();
    Ok(RepeatedOutcome {
        aggregate: result,
        pool,
        stats,
    })
}
