use crate::band::{band, SumBand};
use crate::buylist::{select, BuyListEntry};
use crate::codec::FeedHints;
use crate::combination::Combination;
use crate::config::EngineConfig;
use crate::error::LottoResult;
use crate::generator::{generate, HistoryContext, PatternGenerator};
use crate::profile::GameProfile;
use crate::scorer::{
    aggregate, aggregate_repeated, bonus_matches, check_shape, overlap, score_row,
    AggregateHitResult, CandidateBatch, HitResult, PoolStats, Tier,
};
use serde::Serialize;
use tracing::{debug, info};

/// A target draw with the label it is reported under (`MM`, `IL_M1`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledTarget {
    pub label: String,
    pub target: Combination,
}

#[derive(Debug, Clone, Serialize)]
pub struct Phase1Outcome {
    pub band: SumBand,
    pub hit_result: HitResult,
    pub batch: CandidateBatch,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetHits {
    pub label: String,
    pub target: Combination,
    pub hit_result: HitResult,
}

/// One shared batch scored against several targets.
#[derive(Debug, Clone, Serialize)]
pub struct Phase1TiersOutcome {
    pub band: SumBand,
    pub batch: CandidateBatch,
    pub results: Vec<TargetHits>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Phase2Outcome {
    pub band: SumBand,
    pub aggregate_hit_result: AggregateHitResult,
    pub buy_list: Vec<BuyListEntry>,
    pub stats: PoolStats,
}

/// Per-ticket confirmation detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketCheck {
    /// 1-based position in the buy list.
    pub position: usize,
    pub combination: Combination,
    pub matched_mains: usize,
    pub bonus_hit: bool,
    pub tier: Option<Tier>,
}

pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn windowed<'a>(
        &self,
        profile: &GameProfile,
        history: &'a [Combination],
    ) -> LottoResult<&'a [Combination]> {
        let window = &history[..history.len().min(self.config.history_window)];
        for c in window {
            check_shape(c, profile)?;
        }
        Ok(window)
    }

    /// Single-batch evaluation against the newest draw. `history` is newest
    /// first.
    pub fn run_phase1(
        &self,
        profile: &GameProfile,
        target: &Combination,
        history: &[Combination],
        feed: &FeedHints,
        rng: &mut fastrand::Rng,
    ) -> LottoResult<Phase1Outcome> {
        let labeled = LabeledTarget {
            label: profile.kind.to_string(),
            target: target.clone(),
        };
        let mut outcome = self.run_phase1_tiers(profile, &[labeled], history, feed, rng)?;
        let hit_result = outcome
            .results
            .pop()
            .map(|r| r.hit_result)
            .unwrap_or_default();

        Ok(Phase1Outcome {
            band: outcome.band,
            hit_result,
            batch: outcome.batch,
        })
    }

    pub fn run_phase1_tiers(
        &self,
        profile: &GameProfile,
        targets: &[LabeledTarget],
        history: &[Combination],
        feed: &FeedHints,
        rng: &mut fastrand::Rng,
    ) -> LottoResult<Phase1TiersOutcome> {
        for t in targets {
            check_shape(&t.target, profile)?;
        }
        let history = self.windowed(profile, history)?;
        let ctx = HistoryContext::build(profile, history, feed, history.len());
        let batch = generate(
            profile,
            self.config.batch_rows,
            &ctx,
            rng,
            self.config.dedup_retries,
        );

        let results = targets
            .iter()
            .map(|t| {
                let hit_result = aggregate(&t.target, &batch, profile)?;
                info!(
                    "Phase 1 {}: {} reportable rows of {}",
                    t.label,
                    hit_result.total(),
                    batch.len()
                );
                Ok(TargetHits {
                    label: t.label.clone(),
                    target: t.target.clone(),
                    hit_result,
                })
            })
            .collect::<LottoResult<Vec<_>>>()?;

        Ok(Phase1TiersOutcome {
            band: band(history),
            batch,
            results,
        })
    }

    /// Repeated sampling plus buy-list extraction. The target is promoted to
    /// the newest history slot before pools and band are computed.
    pub fn run_phase2(
        &self,
        profile: &GameProfile,
        target: &Combination,
        history: &[Combination],
        feed: &FeedHints,
        rng: &mut fastrand::Rng,
    ) -> LottoResult<Phase2Outcome> {
        check_shape(target, profile)?;

        let mut promoted = Vec::with_capacity(history.len() + 1);
        promoted.push(target.clone());
        promoted.extend_from_slice(history);
        let history = self.windowed(profile, &promoted)?;

        let ctx = HistoryContext::build(profile, history, feed, history.len());
        let generator = PatternGenerator::builder()
            .profile(profile)
            .context(&ctx)
            .rows(self.config.batch_rows)
            .retries(self.config.dedup_retries)
            .build();

        debug!(
            "Phase 2 {}: {} runs, parallel={}",
            profile.kind, self.config.phase2_runs, !self.config.sequential
        );
        let outcome = aggregate_repeated(
            target,
            profile,
            self.config.phase2_runs,
            &generator,
            rng,
            !self.config.sequential,
        )?;
        let band = band(history);
        let buy_list = select(
            &outcome.aggregate,
            &outcome.pool,
            &ctx,
            &band,
            profile.buy_list_size,
        );

        info!(
            "Phase 2 {}: {} hits over {} runs, {} unique rows, buy list of {}",
            profile.kind,
            outcome.aggregate.total(),
            outcome.aggregate.runs,
            outcome.stats.unique_rows,
            buy_list.len()
        );

        Ok(Phase2Outcome {
            band,
            aggregate_hit_result: outcome.aggregate,
            buy_list,
            stats: outcome.stats,
        })
    }

    /// Scores a fixed buy list against a newly announced draw. Positions in
    /// the result are 1-based buy-list positions.
    pub fn confirm(
        &self,
        profile: &GameProfile,
        buy_list: &[Combination],
        target: &Combination,
    ) -> LottoResult<HitResult> {
        aggregate(target, &CandidateBatch(buy_list.to_vec()), profile)
    }

    pub fn check_tickets(
        &self,
        profile: &GameProfile,
        buy_list: &[Combination],
        target: &Combination,
    ) -> LottoResult<Vec<TicketCheck>> {
        buy_list
            .iter()
            .enumerate()
            .map(|(i, ticket)| {
                let tier = score_row(target, ticket, profile)?;
                Ok(TicketCheck {
                    position: i + 1,
                    combination: ticket.clone(),
                    matched_mains: overlap(target.mains(), ticket.mains()),
                    bonus_hit: bonus_matches(target, ticket, profile),
                    tier,
                })
            })
            .collect()
    }
}
