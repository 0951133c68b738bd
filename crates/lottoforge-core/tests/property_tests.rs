use lottoforge_core::band::band;
use lottoforge_core::buylist::select;
use lottoforge_core::codec::{self, FeedHints};
use lottoforge_core::combination::Combination;
use lottoforge_core::game::GameKind;
use lottoforge_core::generator::context::HistoryContext;
use lottoforge_core::profile::GameProfile;
use lottoforge_core::scorer::{aggregate, score_row, AggregateHitResult, BatchPool, CandidateBatch};
use proptest::prelude::*;
use proptest::sample::subsequence;
use std::collections::HashSet;

// --- STRATEGIES ---

fn arb_game() -> impl Strategy<Value = GameKind> {
    prop_oneof![
        Just(GameKind::MegaMillions),
        Just(GameKind::Powerball),
        Just(GameKind::IllinoisLotto),
    ]
}

/// Distinct mains in random order, plus a valid bonus where the game has one.
fn arb_draw(game: GameKind) -> impl Strategy<Value = (Vec<u32>, Option<u32>)> {
    let profile = GameProfile::for_game(game);
    let numbers: Vec<u32> = profile.main_numbers().map(u32::from).collect();
    let (lo, hi) = profile.bonus_range.unwrap_or((0, 0));
    let has_bonus = profile.has_bonus();

    (
        subsequence(numbers, profile.main_count).prop_shuffle(),
        lo as u32..=hi as u32,
    )
        .prop_map(move |(mains, b)| (mains, has_bonus.then_some(b)))
}

prop_compose! {
    fn arb_pair()(game in arb_game())(
        game in Just(game),
        target in arb_draw(game),
        row in arb_draw(game),
    ) -> (GameKind, (Vec<u32>, Option<u32>), (Vec<u32>, Option<u32>)) {
        (game, target, row)
    }
}

prop_compose! {
    fn arb_batch()(game in arb_game())(
        game in Just(game),
        target in arb_draw(game),
        rows in proptest::collection::vec(arb_draw(game), 0..60),
    ) -> (GameKind, (Vec<u32>, Option<u32>), Vec<(Vec<u32>, Option<u32>)>) {
        (game, target, rows)
    }
}

fn build(game: GameKind, draw: &(Vec<u32>, Option<u32>)) -> Combination {
    GameProfile::for_game(game)
        .combination(&draw.0, draw.1)
        .unwrap()
}

proptest! {
    #[test]
    fn prop_codec_round_trip((game, draw, _) in arb_pair()) {
        let profile = GameProfile::for_game(game);
        let c = build(game, &draw);
        let text = codec::format(&c);
        let again = codec::parse(profile, &text).unwrap();
        prop_assert_eq!(codec::format(&again), text);
        prop_assert_eq!(again, c);
    }

    #[test]
    fn prop_score_ignores_main_order((game, target, row) in arb_pair()) {
        let profile = GameProfile::for_game(game);
        let t = build(game, &target);
        let r = build(game, &row);

        let mut t_rev = target.clone();
        t_rev.0.reverse();
        let mut r_rev = row.clone();
        r_rev.0.reverse();

        let a = score_row(&t, &r, profile).unwrap();
        let b = score_row(&build(game, &t_rev), &build(game, &r_rev), profile).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_counts_never_exceed_batch((game, target, rows) in arb_batch()) {
        let profile = GameProfile::for_game(game);
        let batch = CandidateBatch(rows.iter().map(|d| build(game, d)).collect());
        let hits = aggregate(&build(game, &target), &batch, profile).unwrap();

        prop_assert!(hits.total() <= batch.len());
        let listed: usize = hits.tier_rows.values().map(Vec::len).sum();
        prop_assert_eq!(listed, hits.total());
    }

    #[test]
    fn prop_buy_list_is_distinct_and_bounded(
        (game, target, rows) in arb_batch(),
        n in 0usize..20,
    ) {
        let profile = GameProfile::for_game(game);
        let batch = CandidateBatch(rows.iter().map(|d| build(game, d)).collect());
        let hits = aggregate(&build(game, &target), &batch, profile).unwrap();

        // Treat the single batch as run 0 of a pool.
        let mut agg = AggregateHitResult::default();
        for (tier, positions) in &hits.tier_rows {
            agg.tier_rows.insert(
                *tier,
                positions
                    .iter()
                    .map(|&row| lottoforge_core::scorer::RowRef { run: 0, row })
                    .collect(),
            );
        }
        let distinct: HashSet<&Combination> = batch.rows().iter().collect();
        let pool = BatchPool { batches: vec![batch.clone()] };

        let history: Vec<Combination> = batch.rows().to_vec();
        let ctx = HistoryContext::build(profile, &history, &FeedHints::default(), history.len());
        let list = select(&agg, &pool, &ctx, &band(&history), n);
        prop_assert!(list.len() <= n);
        prop_assert_eq!(list.len(), n.min(distinct.len()));
        let unique: HashSet<&Combination> = list.iter().map(|e| &e.combination).collect();
        prop_assert_eq!(unique.len(), list.len());
    }

    #[test]
    fn prop_band_is_ordered((game, _, rows) in arb_batch()) {
        let history: Vec<Combination> = rows.iter().map(|d| build(game, d)).collect();
        let b = band(&history);
        match (b.low, b.high) {
            (Some(lo), Some(hi)) => prop_assert!(lo <= hi),
            (None, None) => prop_assert!(history.is_empty()),
            _ => prop_assert!(false, "half-open band {:?}", b),
        }
    }
}
