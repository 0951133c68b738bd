/// Overlaps below this many main numbers are never reported, for every game.
pub const MIN_REPORTABLE_MAINS: u8 = 3;

/// Rows in one candidate batch.
pub const DEFAULT_BATCH_ROWS: usize = 50;

/// Draws looked at when building pools ("recently drawn" numbers).
pub const RECENT_DRAWS: usize = 10;

/// Draws treated as "very recent" when picking last-repeat-rare anchors.
pub const VERY_RECENT_DRAWS: usize = 5;

/// File name of the history store inside the data directory.
pub const HISTORY_FILE: &str = "history.json";

/// Regeneration attempts for a duplicate row before it is accepted.
pub const DEFAULT_DEDUP_RETRIES: usize = 10;
