use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing::{error, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(name = "lottoforge", author, version, about = "Lottery draw hit-scoring engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding history.json and saved runs.
    #[arg(global = true, long, default_value = "data")]
    data_dir: PathBuf,

    /// JSON engine config; flags typed on the command line win over it.
    #[arg(global = true, long)]
    config: Option<PathBuf>,

    /// Print reports as JSON instead of tables.
    #[arg(global = true, long, default_value_t = false)]
    json: bool,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Import draws from a CSV file into the history store
    Import(cmd::import::ImportArgs),
    /// Store a single draw
    SaveDraw(cmd::save_draw::SaveDrawArgs),
    /// Show stored draws, newest first
    History(cmd::history::HistoryArgs),
    /// Generate one batch and score it against the target draw(s)
    Phase1(cmd::phase::Phase1Args),
    /// Repeated sampling and buy-list selection from a saved Phase-1 run
    Phase2(cmd::phase::Phase2Args),
    /// Score a saved buy list against announced draws
    Confirm(cmd::phase::ConfirmArgs),
    /// List saved runs, newest first
    Recent(cmd::recent::RecentArgs),
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let env = cmd::Env {
        data_dir: cli.data_dir.clone(),
        config: cli.config.clone(),
        json: cli.json,
    };

    // Flag sources for the config overlay live on the subcommand's matches.
    let sub_matches = matches.subcommand().map_or(&matches, |(_, m)| m);

    let result = match &cli.command {
        Commands::Import(args) => cmd::import::run(args, &env),
        Commands::SaveDraw(args) => cmd::save_draw::run(args, &env),
        Commands::History(args) => cmd::history::run(args, &env),
        Commands::Phase1(args) => cmd::phase::run_phase1(args, sub_matches, &env),
        Commands::Phase2(args) => cmd::phase::run_phase2(args, sub_matches, &env),
        Commands::Confirm(args) => cmd::phase::run_confirm(args, &env),
        Commands::Recent(args) => cmd::recent::run(args, &env),
    };

    if let Err(e) = result {
        error!("{:#}", e);
        process::exit(1);
    }
}
