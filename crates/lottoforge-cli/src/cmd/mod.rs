pub mod history;
pub mod import;
pub mod phase;
pub mod recent;
pub mod save_draw;

use anyhow::Context;
use chrono::NaiveDate;
use clap::ArgMatches;
use lottoforge_core::codec;
use lottoforge_core::config::EngineConfig;
use lottoforge_core::history::HistoryStore;
use lottoforge_core::persist::RunStore;
use std::path::PathBuf;
use tracing::info;

/// Global options shared by every subcommand.
pub struct Env {
    pub data_dir: PathBuf,
    pub config: Option<PathBuf>,
    pub json: bool,
}

impl Env {
    pub fn open_store(&self) -> anyhow::Result<HistoryStore> {
        HistoryStore::open(&self.data_dir)
            .with_context(|| format!("opening history in {}", self.data_dir.display()))
    }

    pub fn run_store(&self) -> RunStore {
        RunStore::new(&self.data_dir)
    }

    /// Config file contents, or defaults when no `--config` was given.
    pub fn file_config(&self) -> anyhow::Result<EngineConfig> {
        match &self.config {
            Some(path) => {
                info!("⚙️  Loading engine config: {}", path.display());
                EngineConfig::load_from_file(path).map_err(anyhow::Error::msg)
            }
            None => Ok(EngineConfig::default()),
        }
    }

    /// [`Env::file_config`] with the flags typed on the command line laid
    /// over it.
    pub fn engine_config(
        &self,
        cli: &EngineConfig,
        matches: &ArgMatches,
    ) -> anyhow::Result<EngineConfig> {
        let mut config = self.file_config()?;
        config.merge_from_cli(cli, matches);
        Ok(config)
    }

    /// Prints `value` as JSON when `--json` was given. Returns whether it did.
    pub fn emit_json<T: serde::Serialize>(&self, value: &T) -> anyhow::Result<bool> {
        if !self.json {
            return Ok(false);
        }
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(true)
    }
}

pub fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    codec::parse_date(s).ok_or_else(|| format!("unrecognised date '{}'", s))
}
