use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Rows per generated candidate batch.
    #[arg(long, default_value_t = 50)]
    pub batch_rows: usize,

    /// Repeated sampling runs for Phase 2.
    #[arg(long, default_value_t = 100)]
    pub phase2_runs: usize,

    /// Regeneration attempts before a duplicate row is accepted.
    #[arg(long, default_value_t = 10)]
    pub dedup_retries: usize,

    /// Most recent draws considered for pools and the sum band.
    #[arg(long, default_value_t = 20)]
    pub history_window: usize,

    /// Generate Phase-2 batches on the calling thread instead of the rayon pool.
    #[arg(long, default_value_t = false)]
    pub sequential: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            batch_rows: 50,
            phase2_runs: 100,
            dedup_retries: 10,
            history_window: 20,
            sequential: false,
        }
    }
}

impl EngineConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        serde_json::from_str(&content).map_err(|e| format!("Failed to parse config JSON: {}", e))
    }

    /// Overlays the values the user actually typed on the command line,
    /// leaving file-provided values in place for everything else.
    pub fn merge_from_cli(&mut self, cli: &EngineConfig, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident, $arg_name:expr) => {
                if matches.value_source($arg_name) == Some(ValueSource::CommandLine) {
                    self.$field = cli.$field.clone();
                }
            };
        }

        update_if_present!(batch_rows, "batch_rows");
        update_if_present!(phase2_runs, "phase2_runs");
        update_if_present!(dedup_retries, "dedup_retries");
        update_if_present!(history_window, "history_window");
        update_if_present!(sequential, "sequential");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, FromArgMatches, Parser};

    #[derive(Parser, Debug)]
    struct Harness {
        #[command(flatten)]
        config: EngineConfig,
    }

    #[test]
    fn test_clap_defaults_match_default_impl() {
        let h = Harness::parse_from(["test"]);
        assert_eq!(h.config, EngineConfig::default());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let cfg: EngineConfig = serde_json::from_str(r#"{"phase2_runs": 7}"#).unwrap();
        assert_eq!(cfg.phase2_runs, 7);
        assert_eq!(cfg.batch_rows, 50);
    }

    #[test]
    fn test_merge_only_overrides_typed_flags() {
        let matches = Harness::command().get_matches_from(["test", "--batch-rows", "12"]);
        let cli = Harness::from_arg_matches(&matches).unwrap();

        let mut file_cfg = EngineConfig {
            phase2_runs: 3,
            ..Default::default()
        };
        file_cfg.merge_from_cli(&cli.config, &matches);

        assert_eq!(file_cfg.batch_rows, 12);
        assert_eq!(file_cfg.phase2_runs, 3, "file value must survive");
    }
}
