//! Phase workflow over saved runs: Phase 1 saves its request, Phase 2 is
//! started from that save, and confirmation scores a Phase-2 buy list.

use crate::band::SumBand;
use crate::buylist::BuyListEntry;
use crate::codec::{self, FeedHints};
use crate::combination::Combination;
use crate::config::EngineConfig;
use crate::engine::{Engine, LabeledTarget, TargetHits, TicketCheck};
use crate::error::{LottoError, LottoResult};
use crate::game::{GameKind, Phase};
use crate::persist::{RunRecord, RunStore};
use crate::profile::GameProfile;
use crate::protocol::{RunRequest, TargetSpec};
use crate::scorer::{AggregateHitResult, CandidateBatch, HitResult, PoolStats};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct Phase1Report {
    pub game: GameKind,
    pub seed: u64,
    pub band: SumBand,
    pub batch: CandidateBatch,
    pub results: Vec<TargetHits>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Phase2Report {
    pub game: GameKind,
    pub seed: u64,
    pub target: LabeledTarget,
    pub band: SumBand,
    pub aggregate_hit_result: AggregateHitResult,
    pub buy_list: Vec<BuyListEntry>,
    pub stats: PoolStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfirmResult {
    pub label: String,
    pub target: Combination,
    pub hit_result: HitResult,
    pub tickets: Vec<TicketCheck>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfirmReport {
    pub game: GameKind,
    pub buy_list: Vec<Combination>,
    pub results: Vec<ConfirmResult>,
}

/// A request with every field validated against its game.
struct Resolved {
    profile: &'static GameProfile,
    targets: Vec<LabeledTarget>,
    history: Vec<Combination>,
    feed: FeedHints,
    seed: u64,
}

fn resolve_targets(
    profile: &GameProfile,
    targets: &[TargetSpec],
) -> LottoResult<Vec<LabeledTarget>> {
    if targets.is_empty() {
        return Err(LottoError::Config("no target draw given".to_string()));
    }
    targets
        .iter()
        .map(|t| {
            Ok(LabeledTarget {
                label: t.label(profile.kind),
                target: codec::from_raw(profile, &t.draw)?,
            })
        })
        .collect()
}

/// Fills in a random seed when the request has none, so the saved echo can
/// be replayed exactly.
fn resolve(request: &mut RunRequest) -> LottoResult<Resolved> {
    let profile = GameProfile::for_game(request.game);
    let targets = resolve_targets(profile, &request.targets)?;

    let history = request
        .history
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            codec::from_raw(profile, raw).map_err(|e| {
                LottoError::parse(format!("history entry {}: {}", i + 1, e))
            })
        })
        .collect::<LottoResult<Vec<_>>>()?;

    let seed = *request.seed.get_or_insert_with(|| fastrand::u64(..));

    Ok(Resolved {
        profile,
        targets,
        history,
        feed: FeedHints::parse(&request.feed),
        seed,
    })
}

/// Settings for a Phase-2 replay: generation and window settings come from
/// the Phase-1 save when it recorded them, the run count and threading from
/// `current`.
fn replay_config(saved: Option<&EngineConfig>, current: &EngineConfig) -> EngineConfig {
    match saved {
        Some(saved) => EngineConfig {
            phase2_runs: current.phase2_runs,
            sequential: current.sequential,
            ..saved.clone()
        },
        None => current.clone(),
    }
}

pub struct Workflow {
    engine: Engine,
    runs: RunStore,
}

impl Workflow {
    pub fn new(config: EngineConfig, runs: RunStore) -> Self {
        Self {
            engine: Engine::new(config),
            runs,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn runs(&self) -> &RunStore {
        &self.runs
    }

    /// Runs Phase 1 against every target in the request using one shared
    /// batch, then saves the run.
    pub fn phase1(&self, mut request: RunRequest) -> LottoResult<(Phase1Report, PathBuf)> {
        let r = resolve(&mut request)?;
        let mut rng = fastrand::Rng::with_seed(r.seed);

        let outcome =
            self.engine
                .run_phase1_tiers(r.profile, &r.targets, &r.history, &r.feed, &mut rng)?;

        let report = Phase1Report {
            game: request.game,
            seed: r.seed,
            band: outcome.band,
            batch: outcome.batch,
            results: outcome.results,
        };
        let record = RunRecord::new(Phase::Eval, request, Vec::new(), &report)?
            .with_config(self.engine.config().clone());
        let path = self.runs.save(&record)?;
        Ok((report, path))
    }

    /// Re-reads a Phase-1 save and runs Phase 2 on its first target, with the
    /// batch size, dedup retries and history window the save was made with.
    pub fn phase2_from_saved<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> LottoResult<(Phase2Report, PathBuf)> {
        let saved = RunStore::load(&path)?;
        saved.expect_phase(Phase::Eval)?;

        let mut request = saved.request;
        let r = resolve(&mut request)?;
        let target = r
            .targets
            .into_iter()
            .next()
            .ok_or_else(|| LottoError::Config("saved run has no target".to_string()))?;
        info!(
            "Phase 2 for {} from {}",
            target.label,
            path.as_ref().display()
        );

        let engine = Engine::new(replay_config(saved.config.as_ref(), self.engine.config()));
        let mut rng = fastrand::Rng::with_seed(r.seed);
        let outcome =
            engine.run_phase2(r.profile, &target.target, &r.history, &r.feed, &mut rng)?;

        let buy_list_raw = outcome
            .buy_list
            .iter()
            .map(|e| e.combination.to_raw())
            .collect();
        let report = Phase2Report {
            game: request.game,
            seed: r.seed,
            target,
            band: outcome.band,
            aggregate_hit_result: outcome.aggregate_hit_result,
            buy_list: outcome.buy_list,
            stats: outcome.stats,
        };
        let record = RunRecord::new(Phase::Predict, request, buy_list_raw, &report)?
            .with_config(engine.config().clone());
        let path = self.runs.save(&record)?;
        Ok((report, path))
    }

    /// Scores the buy list of a Phase-2 save against newly announced draws.
    pub fn confirm_from_saved<P: AsRef<Path>>(
        &self,
        path: P,
        targets: Vec<TargetSpec>,
    ) -> LottoResult<(ConfirmReport, PathBuf)> {
        let saved = RunStore::load(&path)?;
        saved.expect_phase(Phase::Predict)?;

        let profile = GameProfile::for_game(saved.game);
        let buy_list = saved
            .buy_list
            .iter()
            .map(|raw| codec::from_raw(profile, raw))
            .collect::<LottoResult<Vec<_>>>()?;
        let labeled = resolve_targets(profile, &targets)?;

        let results = labeled
            .into_iter()
            .map(|t| {
                let hit_result = self.engine.confirm(profile, &buy_list, &t.target)?;
                let tickets = self.engine.check_tickets(profile, &buy_list, &t.target)?;
                info!(
                    "Confirm {}: {} of {} tickets reached a tier",
                    t.label,
                    hit_result.total(),
                    buy_list.len()
                );
                Ok(ConfirmResult {
                    label: t.label,
                    target: t.target,
                    hit_result,
                    tickets,
                })
            })
            .collect::<LottoResult<Vec<_>>>()?;

        let report = ConfirmReport {
            game: saved.game,
            buy_list,
            results,
        };
        let request = RunRequest {
            game: saved.game,
            targets,
            history: Vec::new(),
            feed: String::new(),
            seed: None,
        };
        let record = RunRecord::new(Phase::Confirm, request, saved.buy_list, &report)?;
        let path = self.runs.save(&record)?;
        Ok((report, path))
    }
}
