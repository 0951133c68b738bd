use super::parse_date;
use crate::combination::Combination;
use crate::error::{LineWarning, LottoError};
use crate::profile::GameProfile;
use chrono::NaiveDate;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobEntry {
    pub date: Option<NaiveDate>,
    pub combination: Combination,
}

/// Result of parsing a history blob: every good line plus one warning per
/// line that was skipped.
#[derive(Debug, Clone, Default)]
pub struct BlobParse {
    pub entries: Vec<BlobEntry>,
    pub warnings: Vec<LineWarning>,
}

impl BlobParse {
    pub fn combinations(&self) -> Vec<Combination> {
        self.entries.iter().map(|e| e.combination.clone()).collect()
    }
}

/// Parses `MM-DD-YY  NN-NN-NN-NN-NN[  BB]` lines. The date is optional.
/// Blank lines are ignored; malformed lines become warnings.
pub fn parse_blob(profile: &GameProfile, blob: &str) -> BlobParse {
    let mut out = BlobParse::default();

    for (idx, raw_line) in blob.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_line(profile, line) {
            Ok(entry) => out.entries.push(entry),
            Err(reason) => {
                warn!("Skipping history line {}: {} ({})", idx + 1, line, reason);
                out.warnings.push(LineWarning {
                    line: idx + 1,
                    text: line.to_string(),
                    reason,
                });
            }
        }
    }

    out
}

fn parse_line(profile: &GameProfile, line: &str) -> Result<BlobEntry, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    let (date, rest) = match tokens.first().and_then(|t| parse_date(t)) {
        Some(d) => (Some(d), &tokens[1..]),
        None => (None, &tokens[..]),
    };

    let mains_token = rest.first().ok_or("missing main numbers")?;
    let mains = mains_token
        .split('-')
        .map(|p| {
            p.parse::<u32>()
                .map_err(|_| format!("'{}' is not a number", p))
        })
        .collect::<Result<Vec<u32>, String>>()?;

    let bonus = match rest.get(1) {
        Some(t) => Some(
            t.parse::<u32>()
                .map_err(|_| format!("bonus '{}' is not a number", t))?,
        ),
        None => None,
    };

    if rest.len() > 2 {
        return Err(format!("unexpected field '{}'", rest[2]));
    }

    let combination = profile.combination(&mains, bonus).map_err(|e| match e {
        LottoError::Parse { reason } => reason,
        other => other.to_string(),
    })?;

    Ok(BlobEntry { date, combination })
}

pub fn format_blob_line(date: Option<NaiveDate>, combination: &Combination) -> String {
    let mut line = String::new();
    if let Some(d) = date {
        line.push_str(&d.format("%m-%d-%y").to_string());
        line.push_str("  ");
    }
    line.push_str(&combination.dashed());
    if let Some(b) = combination.bonus() {
        line.push_str(&format!("  {:02}", b));
    }
    line
}

pub fn format_blob<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = &'a BlobEntry>,
{
    let mut out = String::new();
    for e in entries {
        out.push_str(&format_blob_line(e.date, &e.combination));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{ILLINOIS_LOTTO, MEGA_MILLIONS, POWERBALL};

    #[test]
    fn test_dated_and_undated_lines() {
        let blob = "
10-14-25  17-18-21-42-64  07

06-43-52-64-65 22
";
        let parsed = parse_blob(&MEGA_MILLIONS, blob);
        assert!(parsed.warnings.is_empty());
        assert_eq!(parsed.entries.len(), 2);
        assert_eq!(
            parsed.entries[0].date,
            NaiveDate::from_ymd_opt(2025, 10, 14)
        );
        assert_eq!(parsed.entries[0].combination.bonus(), Some(7));
        assert_eq!(parsed.entries[1].date, None);
        assert_eq!(parsed.entries[1].combination.mains(), &[6, 43, 52, 64, 65]);
    }

    #[test]
    fn test_bad_lines_are_reported_not_fatal() {
        let blob = "05-06-14-15-48-49\n[JP]\n01-08-12-27-30\n03-06-11-16-32-36\n01-01-12-27-30-43\n";
        let parsed = parse_blob(&ILLINOIS_LOTTO, blob);
        assert_eq!(parsed.entries.len(), 2);
        let lines: Vec<usize> = parsed.warnings.iter().map(|w| w.line).collect();
        assert_eq!(lines, vec![2, 3, 5]);
        assert!(parsed.warnings[2].reason.contains("duplicate"));
    }

    #[test]
    fn test_missing_bonus_is_a_warning_for_bonus_games() {
        let parsed = parse_blob(&POWERBALL, "28-37-42-50-53\n");
        assert!(parsed.entries.is_empty());
        assert_eq!(parsed.warnings.len(), 1);
    }

    #[test]
    fn test_format_line_round_trips() {
        let parsed = parse_blob(&MEGA_MILLIONS, "10/14/2025\t1-8-31-56-67 3");
        let entry = &parsed.entries[0];
        let line = format_blob_line(entry.date, &entry.combination);
        assert_eq!(line, "10-14-25  01-08-31-56-67  03");

        let again = parse_blob(&MEGA_MILLIONS, &line);
        assert_eq!(again.entries[0], *entry);
    }
}
