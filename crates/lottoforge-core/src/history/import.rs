use super::{key_tier, DrawKey, HistoryStore, InsertOutcome};
use crate::codec::parse_date;
use crate::combination::Combination;
use crate::error::{LineWarning, LottoError, LottoResult};
use crate::game::{DrawTier, GameKind};
use crate::profile::GameProfile;
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{info, warn};

const REQUIRED: [&str; 8] = ["game", "draw_date", "tier", "n1", "n2", "n3", "n4", "n5"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub added: usize,
    pub updated: usize,
    pub unchanged: usize,
    /// Invalid rows, plus rows that would have replaced a stored draw while
    /// overwrite was off.
    pub skipped: usize,
    pub warnings: Vec<LineWarning>,
}

struct Columns {
    game: usize,
    date: usize,
    tier: usize,
    mains: [usize; 5],
    n6: Option<usize>,
    bonus: Option<usize>,
}

impl Columns {
    fn locate(headers: &StringRecord) -> LottoResult<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        let missing: Vec<&str> = REQUIRED.iter().copied().filter(|c| find(c).is_none()).collect();
        if !missing.is_empty() {
            return Err(LottoError::parse(format!(
                "CSV is missing columns: {}",
                missing.join(", ")
            )));
        }

        let at = |name: &str| find(name).unwrap_or_default();
        Ok(Self {
            game: at("game"),
            date: at("draw_date"),
            tier: at("tier"),
            mains: [at("n1"), at("n2"), at("n3"), at("n4"), at("n5")],
            n6: find("n6"),
            bonus: find("bonus"),
        })
    }
}

impl HistoryStore {
    /// Imports `game, draw_date, tier, n1..n5[, n6][, bonus]` rows. Column
    /// names are case-insensitive and may come in any order. Bad rows are
    /// skipped and reported; a missing column fails the whole import.
    pub fn import_csv(&mut self, text: &str, overwrite: bool) -> LottoResult<ImportSummary> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let cols = Columns::locate(rdr.headers()?)?;
        let mut summary = ImportSummary::default();

        for (i, result) in rdr.records().enumerate() {
            // Header is line 1.
            let line = i + 2;
            let (text, parsed) = match result {
                Ok(record) => (join(&record), parse_row(&record, &cols)),
                Err(e) => (String::new(), Err(e.to_string())),
            };

            match parsed {
                Ok((key, combination)) => match self.put(key, combination, overwrite) {
                    InsertOutcome::Added => summary.added += 1,
                    InsertOutcome::Updated => summary.updated += 1,
                    InsertOutcome::Unchanged => summary.unchanged += 1,
                    InsertOutcome::KeptExisting => summary.skipped += 1,
                },
                Err(reason) => {
                    warn!("Skipping CSV line {}: {}", line, reason);
                    summary.skipped += 1;
                    summary.warnings.push(LineWarning { line, text, reason });
                }
            }
        }

        info!(
            "CSV import: {} added, {} updated, {} unchanged, {} skipped",
            summary.added, summary.updated, summary.unchanged, summary.skipped
        );
        Ok(summary)
    }
}

fn join(record: &StringRecord) -> String {
    record.iter().collect::<Vec<_>>().join(",")
}

fn parse_row(record: &StringRecord, cols: &Columns) -> Result<(DrawKey, Combination), String> {
    let field = |idx: usize| record.get(idx).unwrap_or("").trim();

    let game = GameKind::from_str(field(cols.game))
        .map_err(|_| format!("unknown game '{}'", field(cols.game)))?;
    let date = parse_date(field(cols.date))
        .ok_or_else(|| format!("unrecognised date '{}'", field(cols.date)))?;

    let tier = if game.has_draw_tiers() {
        let raw = field(cols.tier);
        Some(
            DrawTier::from_str(raw)
                .map_err(|_| format!("{} rows need tier JP, M1 or M2, got '{}'", game, raw))?,
        )
    } else {
        None
    };

    let number = |idx: usize| {
        let s = field(idx);
        s.parse::<u32>()
            .map_err(|_| format!("'{}' is not a number", s))
    };

    let mut mains = cols
        .mains
        .iter()
        .map(|&idx| number(idx))
        .collect::<Result<Vec<u32>, String>>()?;
    if let Some(idx) = cols.n6 {
        if game.has_draw_tiers() && !field(idx).is_empty() {
            mains.push(number(idx)?);
        }
    }

    let bonus = match cols.bonus {
        Some(idx) if !field(idx).is_empty() => Some(number(idx)?),
        _ => None,
    };

    let profile = GameProfile::for_game(game);
    let combination = profile.combination(&mains, bonus).map_err(|e| match e {
        LottoError::Parse { reason } => reason,
        other => other.to_string(),
    })?;

    Ok((
        DrawKey {
            game,
            tier: key_tier(game, tier),
            date,
        },
        combination,
    ))
}
