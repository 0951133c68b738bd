//! Saved phase runs: one pretty-printed JSON file per run in the data
//! directory, named `<phase>_<GAME>_<timestamp>_<id8>.json`. A name already
//! taken gets a `-2`, `-3`, ... suffix instead of being overwritten.

use crate::config::EngineConfig;
use crate::error::{LottoError, LottoResult};
use crate::game::{GameKind, Phase};
use crate::protocol::{RawCombination, RunRequest};
use crate::run::RunIdentifier;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};
use walkdir::WalkDir;

const STAMP_FORMAT: &str = "%Y%m%dT%H%M%S";
const MAX_NAME_ATTEMPTS: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub phase: Phase,
    pub game: GameKind,
    pub run_id: String,
    pub created_at: DateTime<Utc>,
    /// Request echo, with the effective seed filled in.
    pub request: RunRequest,
    #[serde(default)]
    pub buy_list: Vec<RawCombination>,
    /// Engine settings the run was produced with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<EngineConfig>,
    pub result: serde_json::Value,
}

impl RunRecord {
    pub fn new<R: Serialize>(
        phase: Phase,
        request: RunRequest,
        buy_list: Vec<RawCombination>,
        result: &R,
    ) -> LottoResult<Self> {
        Ok(Self {
            phase,
            game: request.game,
            run_id: RunIdentifier::from_run(phase, &request, &buy_list).hash,
            created_at: Utc::now(),
            request,
            buy_list,
            config: None,
            result: serde_json::to_value(result)?,
        })
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn file_name(&self) -> String {
        format!(
            "{}_{}_{}_{}.json",
            self.phase,
            self.game,
            self.created_at.format(STAMP_FORMAT),
            &self.run_id[..8.min(self.run_id.len())]
        )
    }

    /// Fails with a `Config` error unless this record belongs to `phase`.
    pub fn expect_phase(&self, phase: Phase) -> LottoResult<()> {
        if self.phase != phase {
            return Err(LottoError::Config(format!(
                "saved run is a {} record, expected {}",
                self.phase, phase
            )));
        }
        Ok(())
    }
}

/// A saved run found on disk by [`RunStore::list_recent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunFile {
    pub path: PathBuf,
    pub phase: Phase,
    pub game: GameKind,
    pub stamp: String,
}

impl RunFile {
    fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?.strip_suffix(".json")?;
        let mut parts = name.splitn(4, '_');
        let phase = Phase::from_str(parts.next()?).ok()?;
        let game = GameKind::from_str(parts.next()?).ok()?;
        let stamp = parts.next()?.to_string();
        parts.next()?;
        Some(Self {
            path: path.to_path_buf(),
            phase,
            game,
            stamp,
        })
    }
}

pub struct RunStore {
    dir: PathBuf,
}

impl RunStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `record` under a name no other saved run holds.
    pub fn save(&self, record: &RunRecord) -> LottoResult<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_string_pretty(record)?;
        let name = record.file_name();
        let stem = name.trim_end_matches(".json");

        for attempt in 1..=MAX_NAME_ATTEMPTS {
            let path = match attempt {
                1 => self.dir.join(&name),
                n => self.dir.join(format!("{}-{}.json", stem, n)),
            };
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!("{} exists, trying next name", path.display());
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            file.write_all(content.as_bytes())?;
            info!("Saved {} run to {}", record.phase, path.display());
            return Ok(path);
        }

        Err(LottoError::Config(format!(
            "no free file name for {} in {}",
            name,
            self.dir.display()
        )))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> LottoResult<RunRecord> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            LottoError::NotFound(format!("saved run {}: {}", path.display(), e))
        })?;
        let record = serde_json::from_str(&content)?;
        debug!("Loaded saved run {}", path.display());
        Ok(record)
    }

    /// Saved runs, newest first.
    pub fn list_recent(&self, limit: usize) -> LottoResult<Vec<RunFile>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| LottoError::Io(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(file) = RunFile::from_path(entry.path()) {
                files.push(file);
            }
        }

        files.sort_by(|a, b| b.stamp.cmp(&a.stamp).then_with(|| b.path.cmp(&a.path)));
        files.truncate(limit);
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::TargetSpec;
    use chrono::TimeZone;

    fn request(seed: u64) -> RunRequest {
        RunRequest {
            game: GameKind::Powerball,
            targets: vec![TargetSpec {
                tier: None,
                draw: RawCombination(vec![28, 37, 42, 50, 53], Some(19)),
            }],
            history: vec![],
            feed: String::new(),
            seed: Some(seed),
        }
    }

    fn record_at(phase: Phase, seed: u64, secs: i64) -> RunRecord {
        let mut r = RunRecord::new(phase, request(seed), vec![], &serde_json::json!({})).unwrap();
        r.created_at = Utc.timestamp_opt(1_760_000_000 + secs, 0).unwrap();
        r
    }

    #[test]
    fn test_file_name_shape() {
        let r = record_at(Phase::Eval, 1, 0);
        let name = r.file_name();
        assert!(name.starts_with("eval_PB_2025"), "{name}");
        assert!(name.ends_with(&format!("_{}.json", &r.run_id[..8])));
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = RunStore::new(dir.path().join("runs"));
        let r = record_at(Phase::Predict, 3, 0);

        let path = store.save(&r).unwrap();
        let back = RunStore::load(&path).unwrap();
        assert_eq!(back, r);
        assert!(back.expect_phase(Phase::Predict).is_ok());
        assert!(matches!(
            back.expect_phase(Phase::Eval),
            Err(LottoError::Config(_))
        ));
    }

    #[test]
    fn test_same_name_is_never_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let store = RunStore::new(dir.path());
        let first = record_at(Phase::Confirm, 1, 0);
        let mut second = first.clone();
        second.buy_list = vec![RawCombination(vec![1, 2, 3, 4, 5], Some(1))];

        let a = store.save(&first).unwrap();
        let b = store.save(&second).unwrap();
        assert_ne!(a, b);
        assert!(b.to_str().unwrap().ends_with("-2.json"), "{}", b.display());
        assert_eq!(RunStore::load(&a).unwrap(), first);
        assert_eq!(RunStore::load(&b).unwrap(), second);
        assert_eq!(store.list_recent(10).unwrap().len(), 2);
    }

    #[test]
    fn test_buy_list_changes_run_id() {
        let a = RunRecord::new(Phase::Confirm, request(1), vec![], &serde_json::json!({})).unwrap();
        let b = RunRecord::new(
            Phase::Confirm,
            request(1),
            vec![RawCombination(vec![1, 2, 3, 4, 5], Some(1))],
            &serde_json::json!({}),
        )
        .unwrap();
        assert_ne!(a.run_id, b.run_id);
    }

    #[test]
    fn test_config_echo_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = RunStore::new(dir.path());
        let config = EngineConfig {
            batch_rows: 12,
            ..EngineConfig::default()
        };
        let r = record_at(Phase::Eval, 1, 0).with_config(config.clone());

        let back = RunStore::load(store.save(&r).unwrap()).unwrap();
        assert_eq!(back.config, Some(config));

        // Saves without the field still load.
        let mut legacy = serde_json::to_value(record_at(Phase::Eval, 2, 0)).unwrap();
        legacy.as_object_mut().unwrap().remove("config");
        let back: RunRecord = serde_json::from_value(legacy).unwrap();
        assert_eq!(back.config, None);
    }

    #[test]
    fn test_list_recent_is_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = RunStore::new(dir.path());
        store.save(&record_at(Phase::Eval, 1, 0)).unwrap();
        store.save(&record_at(Phase::Predict, 2, 60)).unwrap();
        store.save(&record_at(Phase::Confirm, 3, 120)).unwrap();
        fs::write(dir.path().join("history.json"), "{}").unwrap();

        let recent = store.list_recent(2).unwrap();
        let phases: Vec<Phase> = recent.iter().map(|f| f.phase).collect();
        assert_eq!(phases, vec![Phase::Confirm, Phase::Predict]);
        assert_eq!(store.list_recent(10).unwrap().len(), 3);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = RunStore::load("/nonexistent/eval_MM_x_y.json").unwrap_err();
        assert!(matches!(err, LottoError::NotFound(_)));
    }
}
