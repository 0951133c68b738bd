#![allow(dead_code)]

use lottoforge_core::codec::FeedHints;
use lottoforge_core::combination::Combination;
use lottoforge_core::game::{DrawTier, GameKind};
use lottoforge_core::generator::{generate, HistoryContext};
use lottoforge_core::profile::{GameProfile, MEGA_MILLIONS};
use lottoforge_core::protocol::{RawCombination, RunRequest, TargetSpec};

/// Builder for test draws.
pub struct DrawBuilder {
    profile: &'static GameProfile,
    mains: Vec<u32>,
    bonus: Option<u32>,
}

impl DrawBuilder {
    pub fn new(game: GameKind) -> Self {
        let profile = GameProfile::for_game(game);
        Self {
            profile,
            mains: (1..=profile.main_count as u32).collect(),
            bonus: profile.bonus_range.map(|(lo, _)| lo as u32),
        }
    }

    pub fn mains(mut self, mains: &[u32]) -> Self {
        self.mains = mains.to_vec();
        self
    }

    pub fn bonus(mut self, bonus: u32) -> Self {
        self.bonus = Some(bonus);
        self
    }

    pub fn raw(self) -> RawCombination {
        RawCombination(self.mains, self.bonus)
    }

    pub fn build(self) -> Combination {
        self.profile
            .combination(&self.mains, self.bonus)
            .expect("test draw must be valid")
    }
}

pub fn mm(mains: [u32; 5], bonus: u32) -> Combination {
    MEGA_MILLIONS.combination(&mains, Some(bonus)).unwrap()
}

/// `n` valid draws for `profile`, newest first, from a fixed seed.
pub fn sample_history(profile: &GameProfile, n: usize, seed: u64) -> Vec<Combination> {
    let ctx = HistoryContext::build(profile, &[], &FeedHints::default(), 0);
    let mut rng = fastrand::Rng::with_seed(seed);
    generate(profile, n, &ctx, &mut rng, 10).0
}

pub const MM_FEED: &str = "\
Top 8 hot numbers: 10, 40, 6, 17, 24, 18, 16, 49
Top 8 overdue numbers: 53, 3, 5, 15, 51, 9, 66, 37
Top 3 hot Mega Ball numbers: 1, 24, 2
Top 3 overdue Mega Ball numbers: 4, 6, 15
";

pub fn mm_request(seed: Option<u64>) -> RunRequest {
    RunRequest {
        game: GameKind::MegaMillions,
        targets: vec![TargetSpec {
            tier: None,
            draw: RawCombination(vec![10, 14, 34, 40, 43], Some(5)),
        }],
        history: sample_history(&MEGA_MILLIONS, 20, 77)
            .iter()
            .map(Combination::to_raw)
            .collect(),
        feed: MM_FEED.to_string(),
        seed,
    }
}

pub fn il_request(seed: Option<u64>) -> RunRequest {
    let target = |tier, mains: [u32; 6]| TargetSpec {
        tier: Some(tier),
        draw: RawCombination(mains.to_vec(), None),
    };
    RunRequest {
        game: GameKind::IllinoisLotto,
        targets: vec![
            target(DrawTier::Jackpot, [5, 6, 14, 15, 48, 49]),
            target(DrawTier::MillionOne, [3, 6, 11, 16, 32, 36]),
            target(DrawTier::MillionTwo, [1, 4, 5, 10, 18, 49]),
        ],
        history: Vec::new(),
        feed: String::new(),
        seed,
    }
}
