//! Textual forms of a draw: the `[[mains], bonus]` field form, history-blob
//! lines and feed hint blocks.

pub mod blob;
pub mod feed;

pub use self::blob::{format_blob, format_blob_line, parse_blob, BlobEntry, BlobParse};
pub use self::feed::FeedHints;

use crate::combination::Combination;
use crate::error::{LottoError, LottoResult};
use crate::profile::GameProfile;
use crate::protocol::RawCombination;
use chrono::NaiveDate;
use std::borrow::Cow;

/// Parses `[[m1, ..., mk], bonus_or_null]` for the given game.
///
/// The legacy tuple form `([m1, ...], None)` is accepted as well.
pub fn parse(profile: &GameProfile, text: &str) -> LottoResult<Combination> {
    let normalized = normalize_legacy(text);
    let raw: RawCombination = serde_json::from_str(&normalized).map_err(|e| {
        LottoError::parse(format!("expected [[mains...], bonus]: {}", e))
    })?;
    from_raw(profile, &raw)
}

pub fn format(combination: &Combination) -> String {
    combination.to_string()
}

pub fn from_raw(profile: &GameProfile, raw: &RawCombination) -> LottoResult<Combination> {
    profile.combination(raw.mains(), raw.bonus())
}

fn normalize_legacy(text: &str) -> Cow<'_, str> {
    let t = text.trim();
    let t = if t.starts_with('(') && t.ends_with(')') && t.len() >= 2 {
        Cow::Owned(format!("[{}]", &t[1..t.len() - 1]))
    } else {
        Cow::Borrowed(t)
    };
    if t.contains("None") {
        Cow::Owned(t.replace("None", "null"))
    } else {
        t
    }
}

/// Accepts `MM/DD/YYYY`, `MM-DD-YYYY`, `MM/DD/YY`, `MM-DD-YY` and `YYYY-MM-DD`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let s = text.trim();
    let parts: Vec<&str> = s.split(['/', '-']).collect();
    if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
        return None;
    }

    let formats: &[&str] = if parts[0].len() == 4 {
        &["%Y-%m-%d", "%Y/%m/%d"]
    } else if parts[2].len() == 2 {
        &["%m-%d-%y", "%m/%d/%y"]
    } else if parts[2].len() == 4 {
        &["%m/%d/%Y", "%m-%d-%Y"]
    } else {
        return None;
    };

    formats
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
}
