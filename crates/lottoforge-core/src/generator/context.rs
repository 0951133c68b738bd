use crate::codec::FeedHints;
use crate::combination::Combination;
use crate::consts::{RECENT_DRAWS, VERY_RECENT_DRAWS};
use crate::profile::{AnchorKind, GameProfile};
use fnv::FnvHashSet;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Number pools derived from recent history and feed hints. Every pool is
/// sorted ascending and clipped to the game's ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HistoryContext {
    /// Not drawn in the most recent draws.
    pub undrawn: Vec<u8>,
    /// Drawn exactly twice in the window, but not very recently.
    pub lrr: Vec<u8>,
    pub hot: Vec<u8>,
    pub overdue: Vec<u8>,
    /// Both hot and overdue.
    pub vip: Vec<u8>,
    /// Fallback for topping up rows: `undrawn ∪ hot ∪ overdue`.
    pub fill: Vec<u8>,
    pub bonus_pool: Vec<u8>,
}

impl HistoryContext {
    /// `history` is newest first; only the first `window` draws are used.
    pub fn build(
        profile: &GameProfile,
        history: &[Combination],
        feed: &FeedHints,
        window: usize,
    ) -> Self {
        let window = &history[..history.len().min(window)];
        let recent = &window[..window.len().min(RECENT_DRAWS)];
        let very_recent = &window[..window.len().min(VERY_RECENT_DRAWS)];

        let seen_recent = mains_of(recent);
        let undrawn: Vec<u8> = profile
            .main_numbers()
            .filter(|n| !seen_recent.contains(n))
            .collect();

        let mut counts: BTreeMap<u8, usize> = BTreeMap::new();
        for c in window {
            for &n in c.mains() {
                *counts.entry(n).or_default() += 1;
            }
        }
        let seen_very_recent = mains_of(very_recent);
        let lrr: Vec<u8> = counts
            .into_iter()
            .filter(|&(n, count)| count == 2 && !seen_very_recent.contains(&n))
            .map(|(n, _)| n)
            .collect();

        let hot = clip(&feed.hot, |n| profile.main_in_range(n));
        let overdue = clip(&feed.overdue, |n| profile.main_in_range(n));
        let vip: Vec<u8> = hot
            .iter()
            .copied()
            .filter(|n| overdue.binary_search(n).is_ok())
            .collect();

        let fill: Vec<u8> = undrawn
            .iter()
            .chain(&hot)
            .chain(&overdue)
            .copied()
            .collect::<BTreeSet<u8>>()
            .into_iter()
            .collect();

        let bonus_pool = if profile.has_bonus() {
            let recent_bonus: FnvHashSet<u8> = recent.iter().filter_map(|c| c.bonus()).collect();
            let mut pool: BTreeSet<u8> = profile
                .bonus_numbers()
                .filter(|b| !recent_bonus.contains(b))
                .collect();
            pool.extend(clip(&feed.bonus_hot, |n| profile.bonus_in_range(n)));
            pool.extend(clip(&feed.bonus_overdue, |n| profile.bonus_in_range(n)));
            pool.into_iter().collect()
        } else {
            Vec::new()
        };

        Self {
            undrawn,
            lrr,
            hot,
            overdue,
            vip,
            fill,
            bonus_pool,
        }
    }

    pub fn anchors(&self, kind: AnchorKind) -> &[u8] {
        match kind {
            AnchorKind::Vip => &self.vip,
            AnchorKind::Lrr => &self.lrr,
        }
    }
}

fn mains_of(draws: &[Combination]) -> FnvHashSet<u8> {
    draws.iter().flat_map(|c| c.mains().iter().copied()).collect()
}

fn clip(numbers: &[u32], in_range: impl Fn(u32) -> bool) -> Vec<u8> {
    numbers
        .iter()
        .copied()
        .filter(|&n| in_range(n))
        .map(|n| n as u8)
        .collect::<BTreeSet<u8>>()
        .into_iter()
        .collect()
}
