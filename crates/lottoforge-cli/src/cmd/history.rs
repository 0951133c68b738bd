use super::{parse_date_arg, Env};
use crate::reports;
use chrono::NaiveDate;
use clap::Args;
use lottoforge_core::game::{DrawTier, GameKind};

#[derive(Args, Debug, Clone)]
pub struct HistoryArgs {
    #[arg(long)]
    pub game: GameKind,

    #[arg(long)]
    pub tier: Option<DrawTier>,

    /// Only draws on or before this date.
    #[arg(long, value_parser = parse_date_arg)]
    pub from: Option<NaiveDate>,

    #[arg(long, default_value_t = 20)]
    pub limit: usize,

    /// Print history-blob lines (oldest first) instead of a table.
    #[arg(long, default_value_t = false)]
    pub blob: bool,
}

pub fn run(args: &HistoryArgs, env: &Env) -> anyhow::Result<()> {
    let store = env.open_store()?;

    if args.blob {
        print!(
            "{}",
            store.history_blob(args.game, args.tier, args.from, args.limit)
        );
        return Ok(());
    }

    let draws = store.get_history(args.game, args.from, args.tier, args.limit);
    if !env.emit_json(&draws)? {
        reports::print_history(args.game, &draws);
    }
    Ok(())
}
