use super::{parse_date_arg, Env};
use crate::reports;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{ArgGroup, ArgMatches, Args};
use lottoforge_core::api::Workflow;
use lottoforge_core::codec::{self, parse_blob};
use lottoforge_core::config::EngineConfig;
use lottoforge_core::game::{DrawTier, GameKind};
use lottoforge_core::history::HistoryStore;
use lottoforge_core::persist::RunStore;
use lottoforge_core::profile::GameProfile;
use lottoforge_core::protocol::{RawCombination, RunRequest, TargetSpec};
use std::fs;
use std::path::PathBuf;
use strum::IntoEnumIterator;
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
#[command(group(
    ArgGroup::new("target_source")
        .required(true)
        .args(["target", "target_date"])
))]
pub struct Phase1Args {
    #[command(flatten)]
    pub config: EngineConfig,

    #[arg(long)]
    pub game: GameKind,

    /// Target draw as `[[m1, ..., mk], bonus]`.
    #[arg(long)]
    pub target: Option<String>,

    /// Look the target up in the history store. For IL without `--tier`
    /// every tier drawn that day becomes a target.
    #[arg(long, value_parser = parse_date_arg)]
    pub target_date: Option<NaiveDate>,

    #[arg(long)]
    pub tier: Option<DrawTier>,

    /// File with "Top N hot/overdue ..." lines.
    #[arg(long)]
    pub feed: Option<PathBuf>,

    /// History blob (oldest line first) used instead of the store.
    #[arg(long)]
    pub history_file: Option<PathBuf>,

    /// Newest history date to use from the store. Defaults to the day before
    /// `--target-date`.
    #[arg(long, value_parser = parse_date_arg)]
    pub from: Option<NaiveDate>,

    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct Phase2Args {
    #[command(flatten)]
    pub config: EngineConfig,

    /// Saved Phase-1 run. Its batch size, dedup retries and history window
    /// are reused; only `--phase2-runs` and `--sequential` apply here.
    #[arg(long)]
    pub saved: PathBuf,
}

#[derive(Args, Debug, Clone)]
#[command(group(
    ArgGroup::new("target_source")
        .required(true)
        .args(["target", "target_date"])
))]
pub struct ConfirmArgs {
    /// Saved Phase-2 run.
    #[arg(long)]
    pub saved: PathBuf,

    #[arg(long)]
    pub target: Option<String>,

    #[arg(long, value_parser = parse_date_arg)]
    pub target_date: Option<NaiveDate>,

    #[arg(long)]
    pub tier: Option<DrawTier>,
}

fn tier_for(game: GameKind, tier: Option<DrawTier>) -> Option<DrawTier> {
    if game.has_draw_tiers() {
        tier
    } else {
        None
    }
}

/// Targets from `--target` text or from the store by date.
fn resolve_targets(
    game: GameKind,
    text: Option<&str>,
    date: Option<NaiveDate>,
    tier: Option<DrawTier>,
    store: Option<&HistoryStore>,
) -> anyhow::Result<Vec<TargetSpec>> {
    let profile = GameProfile::for_game(game);
    let tier = tier_for(game, tier);

    if let Some(text) = text {
        let c = codec::parse(profile, text).context("parsing --target")?;
        return Ok(vec![TargetSpec {
            tier,
            draw: c.to_raw(),
        }]);
    }

    let (Some(date), Some(store)) = (date, store) else {
        bail!("either --target or --target-date is required");
    };

    if game.has_draw_tiers() && tier.is_none() {
        let mut targets = Vec::new();
        for t in DrawTier::iter() {
            match store.get_by_date(game, date, Some(t)) {
                Ok(c) => targets.push(TargetSpec {
                    tier: Some(t),
                    draw: c.to_raw(),
                }),
                Err(e) => warn!("{}", e),
            }
        }
        if targets.is_empty() {
            bail!("no {} draws stored for {}", game, date.format("%m/%d/%Y"));
        }
        return Ok(targets);
    }

    let c = store.get_by_date(game, date, tier)?;
    Ok(vec![TargetSpec {
        tier,
        draw: c.to_raw(),
    }])
}

fn load_history(
    args: &Phase1Args,
    store: &HistoryStore,
    window: usize,
) -> anyhow::Result<Vec<RawCombination>> {
    let profile = GameProfile::for_game(args.game);

    if let Some(path) = &args.history_file {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let parsed = parse_blob(profile, &text);
        if !parsed.warnings.is_empty() {
            warn!(
                "{} line(s) of {} were skipped",
                parsed.warnings.len(),
                path.display()
            );
        }
        // Blob lines run oldest to newest.
        return Ok(parsed
            .entries
            .iter()
            .rev()
            .map(|e| e.combination.to_raw())
            .collect());
    }

    let from = args
        .from
        .or_else(|| args.target_date.and_then(|d| d.pred_opt()));
    let draws = store.get_history(args.game, from, args.tier, window);
    Ok(draws.iter().map(|d| d.combination.to_raw()).collect())
}

pub fn run_phase1(args: &Phase1Args, matches: &ArgMatches, env: &Env) -> anyhow::Result<()> {
    let config = env.engine_config(&args.config, matches)?;
    let store = env.open_store()?;

    let targets = resolve_targets(
        args.game,
        args.target.as_deref(),
        args.target_date,
        args.tier,
        Some(&store),
    )?;
    let history = load_history(args, &store, config.history_window)?;
    let feed = match &args.feed {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
        }
        None => String::new(),
    };

    info!(
        "🎯 Phase 1 for {}: {} target(s), {} history draws",
        args.game.title(),
        targets.len(),
        history.len()
    );
    let request = RunRequest {
        game: args.game,
        targets,
        history,
        feed,
        seed: args.seed,
    };

    let workflow = Workflow::new(config, env.run_store());
    let (report, path) = workflow.phase1(request)?;
    if !env.emit_json(&report)? {
        reports::print_phase1(&report);
        reports::print_saved(&path);
    }
    Ok(())
}

pub fn run_phase2(args: &Phase2Args, matches: &ArgMatches, env: &Env) -> anyhow::Result<()> {
    let config = env.engine_config(&args.config, matches)?;
    let workflow = Workflow::new(config, env.run_store());

    let (report, path) = workflow
        .phase2_from_saved(&args.saved)
        .with_context(|| format!("running Phase 2 from {}", args.saved.display()))?;
    if !env.emit_json(&report)? {
        reports::print_phase2(&report);
        reports::print_saved(&path);
    }
    Ok(())
}

pub fn run_confirm(args: &ConfirmArgs, env: &Env) -> anyhow::Result<()> {
    let saved = RunStore::load(&args.saved)?;
    let store = match args.target_date {
        Some(_) => Some(env.open_store()?),
        None => None,
    };
    let targets = resolve_targets(
        saved.game,
        args.target.as_deref(),
        args.target_date,
        args.tier,
        store.as_ref(),
    )?;

    let workflow = Workflow::new(env.file_config()?, env.run_store());
    let (report, path) = workflow
        .confirm_from_saved(&args.saved, targets)
        .with_context(|| format!("confirming {}", args.saved.display()))?;
    if !env.emit_json(&report)? {
        reports::print_confirm(&report);
        reports::print_saved(&path);
    }
    Ok(())
}
