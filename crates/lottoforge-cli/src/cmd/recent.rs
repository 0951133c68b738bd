use super::Env;
use crate::reports;
use clap::Args;

#[derive(Args, Debug, Clone)]
pub struct RecentArgs {
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

pub fn run(args: &RecentArgs, env: &Env) -> anyhow::Result<()> {
    let files = env.run_store().list_recent(args.limit)?;
    if !env.emit_json(&files)? {
        reports::print_recent(&files);
    }
    Ok(())
}
