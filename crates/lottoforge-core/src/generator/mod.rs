//! Candidate batch generation.
//!
//! Rows follow the game's pattern table: an anchor (VIP or LRR, round-robin),
//! then hot, overdue and undrawn quotas, topped up to the main count.

pub mod context;

pub use self::context::HistoryContext;

use crate::combination::Combination;
use crate::consts::{DEFAULT_BATCH_ROWS, DEFAULT_DEDUP_RETRIES};
use crate::profile::{AnchorKind, GameProfile, Pattern};
use crate::scorer::{BatchSource, CandidateBatch};
use fnv::FnvHashSet;
use tracing::debug;
use typed_builder::TypedBuilder;

#[derive(TypedBuilder)]
pub struct PatternGenerator<'a> {
    pub profile: &'a GameProfile,
    pub context: &'a HistoryContext,
    #[builder(default = DEFAULT_BATCH_ROWS)]
    pub rows: usize,
    #[builder(default = DEFAULT_DEDUP_RETRIES)]
    pub retries: usize,
}

impl BatchSource for PatternGenerator<'_> {
    fn generate(&self, rng: &mut fastrand::Rng) -> CandidateBatch {
        generate(self.profile, self.rows, self.context, rng, self.retries)
    }
}

#[derive(Default)]
struct AnchorCursor {
    vip: usize,
    lrr: usize,
}

impl AnchorCursor {
    fn next(&mut self, kind: AnchorKind, ctx: &HistoryContext) -> Option<u8> {
        let pool = ctx.anchors(kind);
        if pool.is_empty() {
            return None;
        }
        let idx = match kind {
            AnchorKind::Vip => &mut self.vip,
            AnchorKind::Lrr => &mut self.lrr,
        };
        let n = pool[*idx % pool.len()];
        *idx += 1;
        Some(n)
    }
}

/// Produces exactly `count` valid rows. A row that repeats an earlier one is
/// regenerated up to `retries` times, then accepted.
pub fn generate(
    profile: &GameProfile,
    count: usize,
    ctx: &HistoryContext,
    rng: &mut fastrand::Rng,
    retries: usize,
) -> CandidateBatch {
    let mut seen: FnvHashSet<Combination> = FnvHashSet::default();
    let mut cursor = AnchorCursor::default();
    let mut rows = Vec::with_capacity(count);

    for i in 0..count {
        let pattern = match profile.patterns.len() {
            0 => None,
            len => Some(&profile.patterns[i % len]),
        };
        let anchor = pattern.and_then(|p| cursor.next(p.anchor, ctx));

        let mut row = build_row(profile, ctx, pattern, anchor, rng);
        let mut attempts = 0;
        while seen.contains(&row) && attempts < retries {
            row = build_row(profile, ctx, pattern, anchor, rng);
            attempts += 1;
        }
        if !seen.insert(row.clone()) {
            debug!("row {} kept as duplicate after {} retries", i + 1, retries);
        }
        rows.push(row);
    }

    CandidateBatch(rows)
}

fn build_row(
    profile: &GameProfile,
    ctx: &HistoryContext,
    pattern: Option<&Pattern>,
    anchor: Option<u8>,
    rng: &mut fastrand::Rng,
) -> Combination {
    let size = profile.main_count;
    let mut mains: Vec<u8> = Vec::with_capacity(size);
    mains.extend(anchor);

    if let Some(p) = pattern {
        take_from(&ctx.hot, p.hot, &mut mains, size, rng);
        take_from(&ctx.overdue, p.overdue, &mut mains, size, rng);
        take_from(&ctx.undrawn, p.undrawn, &mut mains, size, rng);
    }

    while mains.len() < size {
        let mut pool: Vec<u8> = ctx
            .fill
            .iter()
            .copied()
            .filter(|n| !mains.contains(n))
            .collect();
        if pool.is_empty() {
            pool = profile.main_numbers().filter(|n| !mains.contains(n)).collect();
        }
        match rng.choice(pool) {
            Some(n) => mains.push(n),
            None => break,
        }
    }
    mains.sort_unstable();

    let bonus = match (profile.bonus_range, ctx.bonus_pool.is_empty()) {
        (None, _) => None,
        (Some(_), false) => rng.choice(ctx.bonus_pool.iter().copied()),
        (Some((lo, hi)), true) => Some(rng.u8(lo..=hi)),
    };

    Combination::from_sorted_unchecked(mains, bonus)
}

fn take_from(pool: &[u8], quota: u8, mains: &mut Vec<u8>, size: usize, rng: &mut fastrand::Rng) {
    if quota == 0 {
        return;
    }
    let mut choices: Vec<u8> = pool.iter().copied().filter(|n| !mains.contains(n)).collect();
    rng.shuffle(&mut choices);
    let room = size.saturating_sub(mains.len());
    mains.extend(choices.into_iter().take((quota as usize).min(room)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::FeedHints;
    use crate::game::GameKind;
    use crate::profile::{ILLINOIS_LOTTO, MEGA_MILLIONS};

    fn feed() -> FeedHints {
        FeedHints {
            hot: vec![10, 40, 6, 17, 24, 18, 16, 49],
            overdue: vec![53, 3, 40, 15, 51, 9, 66, 6],
            bonus_hot: vec![1, 24, 2],
            bonus_overdue: vec![4, 6, 15],
        }
    }

    #[test]
    fn test_rows_are_valid_and_counted() {
        let ctx = HistoryContext::build(&MEGA_MILLIONS, &[], &feed(), 20);
        let mut rng = fastrand::Rng::with_seed(42);
        let batch = generate(&MEGA_MILLIONS, 50, &ctx, &mut rng, 10);

        assert_eq!(batch.len(), 50);
        for row in batch.rows() {
            let raw = row.to_raw();
            let again = MEGA_MILLIONS.combination(raw.mains(), raw.bonus()).unwrap();
            assert_eq!(&again, row);
        }
        let unique: FnvHashSet<&Combination> = batch.rows().iter().collect();
        assert_eq!(unique.len(), 50);
    }

    #[test]
    fn test_same_seed_same_batch() {
        let ctx = HistoryContext::build(&ILLINOIS_LOTTO, &[], &FeedHints::default(), 20);
        let generator = PatternGenerator::builder()
            .profile(&ILLINOIS_LOTTO)
            .context(&ctx)
            .build();

        let a = generator.generate(&mut fastrand::Rng::with_seed(9));
        let b = generator.generate(&mut fastrand::Rng::with_seed(9));
        assert_eq!(a, b);
        assert_eq!(a.len(), DEFAULT_BATCH_ROWS);
        assert!(a.rows().iter().all(|r| r.bonus().is_none()));
    }

    #[test]
    fn test_vip_anchors_round_robin() {
        let ctx = HistoryContext::build(&MEGA_MILLIONS, &[], &feed(), 20);
        assert_eq!(ctx.vip, vec![6, 40]);

        let mut rng = fastrand::Rng::with_seed(3);
        let batch = generate(&MEGA_MILLIONS, 9, &ctx, &mut rng, 10);
        // The first nine patterns are all VIP-anchored.
        for (i, row) in batch.rows().iter().enumerate() {
            let anchor = ctx.vip[i % 2];
            assert!(row.mains().contains(&anchor), "row {} lacks {}", i + 1, anchor);
        }
    }

    #[test]
    fn test_tiny_space_accepts_duplicates() {
        let tiny = GameProfile {
            kind: GameKind::MegaMillions,
            main_count: 5,
            main_min: 1,
            main_max: 6,
            bonus_range: None,
            tiers: &[3, 4, 5],
            buy_list_size: 10,
            patterns: MEGA_MILLIONS.patterns,
        };
        let ctx = HistoryContext::build(&tiny, &[], &FeedHints::default(), 20);
        let mut rng = fastrand::Rng::with_seed(1);
        let batch = generate(&tiny, 20, &ctx, &mut rng, 10);

        assert_eq!(batch.len(), 20);
        let unique: FnvHashSet<&Combination> = batch.rows().iter().collect();
        assert!(unique.len() <= 6);
    }
}
