//! JSON-file history store keyed by `(game, tier, date)`.

pub mod import;

pub use self::import::ImportSummary;

use crate::codec::{self, format_blob, BlobEntry};
use crate::combination::Combination;
use crate::consts::HISTORY_FILE;
use crate::error::{LottoError, LottoResult};
use crate::game::{DrawTier, GameKind};
use crate::profile::GameProfile;
use crate::protocol::RawCombination;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One stored draw as it appears on disk and on the `save-draw` path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRecord {
    pub game: GameKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<DrawTier>,
    pub date: NaiveDate,
    pub draw: RawCombination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatedDraw {
    pub date: NaiveDate,
    pub combination: Combination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct DrawKey {
    game: GameKind,
    tier: Option<DrawTier>,
    date: NaiveDate,
}

/// Draw tier actually used for a key. MM/PB have none; IL defaults to the
/// jackpot draw.
pub fn key_tier(game: GameKind, tier: Option<DrawTier>) -> Option<DrawTier> {
    if game.has_draw_tiers() {
        Some(tier.unwrap_or(DrawTier::Jackpot))
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Added,
    Updated,
    Unchanged,
    /// A different draw already exists and overwrite was off.
    KeptExisting,
}

#[derive(Serialize, Deserialize, Default)]
struct StoreFile {
    rows: Vec<DrawRecord>,
}

#[derive(Debug, Default)]
pub struct HistoryStore {
    path: Option<PathBuf>,
    draws: BTreeMap<DrawKey, Combination>,
}

impl HistoryStore {
    /// Store with no backing file; `save` is a no-op.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens `<data_dir>/history.json`, starting empty if it does not exist.
    pub fn open<P: AsRef<Path>>(data_dir: P) -> LottoResult<Self> {
        let path = data_dir.as_ref().join(HISTORY_FILE);
        let mut store = Self {
            path: Some(path.clone()),
            draws: BTreeMap::new(),
        };

        if !path.exists() {
            debug!("No history store at {}", path.display());
            return Ok(store);
        }

        let content = fs::read_to_string(&path)?;
        let file: StoreFile = serde_json::from_str(&content)?;
        for (i, record) in file.rows.into_iter().enumerate() {
            let (key, combination) = validate(&record).map_err(|reason| {
                LottoError::parse(format!("{} row {}: {}", path.display(), i + 1, reason))
            })?;
            store.draws.insert(key, combination);
        }

        info!("Loaded {} draws from {}", store.draws.len(), path.display());
        Ok(store)
    }

    pub fn save(&self) -> LottoResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = StoreFile {
            rows: self
                .draws
                .iter()
                .map(|(k, c)| DrawRecord {
                    game: k.game,
                    tier: k.tier,
                    date: k.date,
                    draw: c.to_raw(),
                })
                .collect(),
        };
        fs::write(path, serde_json::to_string_pretty(&file)?)?;
        debug!("Saved {} draws to {}", self.draws.len(), path.display());
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    /// Stored draws per game and tier.
    pub fn counts(&self) -> BTreeMap<(GameKind, Option<DrawTier>), usize> {
        let mut out = BTreeMap::new();
        for k in self.draws.keys() {
            *out.entry((k.game, k.tier)).or_default() += 1;
        }
        out
    }

    pub fn get_by_date(
        &self,
        game: GameKind,
        date: NaiveDate,
        tier: Option<DrawTier>,
    ) -> LottoResult<Combination> {
        let key = DrawKey {
            game,
            tier: key_tier(game, tier),
            date,
        };
        self.draws
            .get(&key)
            .cloned()
            .ok_or_else(|| LottoError::NotFound(describe(game, key.tier, Some(date))))
    }

    /// Draws on or before `from_date` (all draws when `None`), newest first.
    pub fn get_history(
        &self,
        game: GameKind,
        from_date: Option<NaiveDate>,
        tier: Option<DrawTier>,
        limit: usize,
    ) -> Vec<DatedDraw> {
        let tier = key_tier(game, tier);
        self.draws
            .iter()
            .rev()
            .filter(|(k, _)| k.game == game && k.tier == tier)
            .filter(|(k, _)| from_date.map_or(true, |d| k.date <= d))
            .take(limit)
            .map(|(k, c)| DatedDraw {
                date: k.date,
                combination: c.clone(),
            })
            .collect()
    }

    /// The `offset`-th newest draw (1-based) on or before `as_of`.
    pub fn get_latest(
        &self,
        game: GameKind,
        tier: Option<DrawTier>,
        as_of: Option<NaiveDate>,
        offset: usize,
    ) -> LottoResult<DatedDraw> {
        let history = self.get_history(game, as_of, tier, usize::MAX);
        if history.is_empty() {
            return Err(LottoError::NotFound(describe(
                game,
                key_tier(game, tier),
                as_of,
            )));
        }
        if offset == 0 || offset > history.len() {
            return Err(LottoError::NotFound(format!(
                "offset {} out of range (1..={})",
                offset,
                history.len()
            )));
        }
        Ok(history[offset - 1].clone())
    }

    pub fn insert(&mut self, record: DrawRecord, overwrite: bool) -> LottoResult<InsertOutcome> {
        let (key, combination) = validate(&record).map_err(LottoError::parse)?;
        Ok(self.put(key, combination, overwrite))
    }

    fn put(&mut self, key: DrawKey, combination: Combination, overwrite: bool) -> InsertOutcome {
        let outcome = match self.draws.get(&key) {
            None => InsertOutcome::Added,
            Some(existing) if *existing == combination => return InsertOutcome::Unchanged,
            Some(_) if overwrite => InsertOutcome::Updated,
            Some(_) => return InsertOutcome::KeptExisting,
        };
        self.draws.insert(key, combination);
        outcome
    }

    /// Blob text for the newest `limit` draws, oldest line first.
    pub fn history_blob(
        &self,
        game: GameKind,
        tier: Option<DrawTier>,
        from_date: Option<NaiveDate>,
        limit: usize,
    ) -> String {
        let entries: Vec<BlobEntry> = self
            .get_history(game, from_date, tier, limit)
            .into_iter()
            .rev()
            .map(|d| BlobEntry {
                date: Some(d.date),
                combination: d.combination,
            })
            .collect();
        format_blob(&entries)
    }
}

fn validate(record: &DrawRecord) -> Result<(DrawKey, Combination), String> {
    let profile = GameProfile::for_game(record.game);
    let combination = codec::from_raw(profile, &record.draw).map_err(|e| match e {
        LottoError::Parse { reason } => reason,
        other => other.to_string(),
    })?;
    let key = DrawKey {
        game: record.game,
        tier: key_tier(record.game, record.tier),
        date: record.date,
    };
    Ok((key, combination))
}

fn describe(game: GameKind, tier: Option<DrawTier>, date: Option<NaiveDate>) -> String {
    let mut s = match tier {
        Some(t) => format!("no {} {} draw", game, t),
        None => format!("no {} draw", game),
    };
    match date {
        Some(d) => s.push_str(&format!(" for {}", d.format("%m/%d/%Y"))),
        None => s.push_str(" stored"),
    }
    s
}
