use crate::game::GameKind;
use strum::Display;

/// Which anchor pool a generation pattern starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum AnchorKind {
    /// Numbers that are both hot and overdue in the feed.
    #[strum(serialize = "VIP")]
    Vip,
    /// Numbers drawn exactly twice in the window but not very recently.
    #[strum(serialize = "LRR")]
    Lrr,
}

/// Quotas for one generated row: an anchor, then so many hot, overdue and
/// undrawn numbers. Quotas may over-fill a row; generation caps them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pattern {
    pub anchor: AnchorKind,
    pub hot: u8,
    pub overdue: u8,
    pub undrawn: u8,
}

const fn p(anchor: AnchorKind, hot: u8, overdue: u8, undrawn: u8) -> Pattern {
    Pattern {
        anchor,
        hot,
        overdue,
        undrawn,
    }
}

use AnchorKind::{Lrr, Vip};

const FIVE_MAIN_PATTERNS: &[Pattern] = &[
    p(Vip, 1, 0, 3),
    p(Vip, 1, 1, 2),
    p(Vip, 1, 2, 1),
    p(Vip, 2, 0, 2),
    p(Vip, 2, 1, 1),
    p(Vip, 3, 0, 1),
    p(Vip, 0, 1, 3),
    p(Vip, 0, 2, 2),
    p(Vip, 0, 3, 1),
    p(Lrr, 1, 0, 3),
    p(Lrr, 1, 1, 2),
    p(Lrr, 1, 2, 1),
    p(Lrr, 2, 0, 2),
    p(Lrr, 2, 1, 1),
    p(Lrr, 3, 0, 1),
    p(Lrr, 0, 1, 3),
    p(Lrr, 0, 2, 2),
    p(Lrr, 0, 3, 1),
];

const SIX_MAIN_PATTERNS: &[Pattern] = &[
    p(Vip, 1, 0, 4),
    p(Vip, 1, 1, 3),
    p(Vip, 1, 2, 2),
    p(Vip, 1, 3, 1),
    p(Vip, 2, 0, 3),
    p(Vip, 2, 1, 2),
    p(Vip, 2, 2, 1),
    p(Vip, 2, 3, 0),
    p(Vip, 3, 0, 2),
    p(Vip, 3, 1, 1),
    p(Vip, 3, 2, 0),
    p(Vip, 4, 0, 1),
    p(Vip, 4, 1, 0),
    p(Vip, 5, 0, 0),
    p(Vip, 0, 1, 4),
    p(Vip, 0, 2, 3),
    p(Vip, 0, 3, 3),
    p(Vip, 0, 4, 1),
    p(Vip, 0, 5, 0),
    p(Lrr, 1, 0, 4),
    p(Lrr, 1, 1, 3),
    p(Lrr, 1, 2, 2),
    p(Lrr, 1, 3, 1),
    p(Lrr, 2, 0, 3),
    p(Lrr, 2, 1, 2),
    p(Lrr, 2, 2, 1),
    p(Lrr, 2, 3, 0),
    p(Lrr, 3, 0, 2),
    p(Lrr, 3, 1, 1),
    p(Lrr, 3, 2, 0),
    p(Lrr, 4, 0, 1),
    p(Lrr, 4, 1, 0),
    p(Lrr, 5, 0, 0),
    p(Lrr, 0, 1, 4),
    p(Lrr, 0, 2, 3),
    p(Lrr, 0, 3, 3),
    p(Lrr, 0, 4, 1),
    p(Lrr, 0, 5, 0),
];

/// Static shape of a game. Profiles are immutable and shared freely.
#[derive(Debug, PartialEq, Eq)]
pub struct GameProfile {
    pub kind: GameKind,
    pub main_count: usize,
    pub main_min: u8,
    pub main_max: u8,
    /// Inclusive bonus range, `None` for games without a bonus ball.
    pub bonus_range: Option<(u8, u8)>,
    /// Reportable main-overlap tiers, ascending.
    pub tiers: &'static [u8],
    pub buy_list_size: usize,
    pub patterns: &'static [Pattern],
}

pub static MEGA_MILLIONS: GameProfile = GameProfile {
    kind: GameKind::MegaMillions,
    main_count: 5,
    main_min: 1,
    main_max: 70,
    bonus_range: Some((1, 25)),
    tiers: &[3, 4, 5],
    buy_list_size: 10,
    patterns: FIVE_MAIN_PATTERNS,
};

pub static POWERBALL: GameProfile = GameProfile {
    kind: GameKind::Powerball,
    main_count: 5,
    main_min: 1,
    main_max: 69,
    bonus_range: Some((1, 26)),
    tiers: &[3, 4, 5],
    buy_list_size: 10,
    patterns: FIVE_MAIN_PATTERNS,
};

pub static ILLINOIS_LOTTO: GameProfile = GameProfile {
    kind: GameKind::IllinoisLotto,
    main_count: 6,
    main_min: 1,
    main_max: 50,
    bonus_range: None,
    tiers: &[3, 4, 5, 6],
    buy_list_size: 15,
    patterns: SIX_MAIN_PATTERNS,
};

impl GameProfile {
    pub fn for_game(kind: GameKind) -> &'static GameProfile {
        match kind {
            GameKind::MegaMillions => &MEGA_MILLIONS,
            GameKind::Powerball => &POWERBALL,
            GameKind::IllinoisLotto => &ILLINOIS_LOTTO,
        }
    }

    pub fn has_bonus(&self) -> bool {
        self.bonus_range.is_some()
    }

    pub fn main_in_range(&self, n: u32) -> bool {
        n >= self.main_min as u32 && n <= self.main_max as u32
    }

    pub fn bonus_in_range(&self, n: u32) -> bool {
        match self.bonus_range {
            Some((lo, hi)) => n >= lo as u32 && n <= hi as u32,
            None => false,
        }
    }

    pub fn main_numbers(&self) -> impl Iterator<Item = u8> {
        self.main_min..=self.main_max
    }

    pub fn bonus_numbers(&self) -> impl Iterator<Item = u8> {
        let (lo, hi) = self.bonus_range.unwrap_or((1, 0));
        lo..=hi
    }

    /// Highest reportable tier not above `overlap`, if any.
    pub fn tier_for_overlap(&self, overlap: usize) -> Option<u8> {
        self.tiers
            .iter()
            .rev()
            .copied()
            .find(|&t| t as usize <= overlap)
    }
}
