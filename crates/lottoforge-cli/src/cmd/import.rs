use super::Env;
use crate::reports;
use anyhow::Context;
use clap::Args;
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct ImportArgs {
    /// CSV with `game, draw_date, tier, n1..n5[, n6][, bonus]` columns.
    pub csv: PathBuf,

    /// Keep stored draws when a CSV row disagrees with them.
    #[arg(long, default_value_t = false)]
    pub keep_existing: bool,
}

pub fn run(args: &ImportArgs, env: &Env) -> anyhow::Result<()> {
    let text = fs::read_to_string(&args.csv)
        .with_context(|| format!("reading {}", args.csv.display()))?;

    let mut store = env.open_store()?;
    let summary = store.import_csv(&text, !args.keep_existing)?;
    store.save()?;
    info!("📥 History now holds {} draws", store.len());

    if !env.emit_json(&summary)? {
        reports::print_import_summary(&summary);
    }
    Ok(())
}
