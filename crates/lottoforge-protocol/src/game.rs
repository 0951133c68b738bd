use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Supported draw games. The short code (`MM`, `PB`, `IL`) is the canonical
/// textual form everywhere: CLI flags, CSV columns, saved-run file names.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum GameKind {
    #[serde(rename = "MM")]
    #[strum(serialize = "MM")]
    MegaMillions,
    #[serde(rename = "PB")]
    #[strum(serialize = "PB")]
    Powerball,
    #[serde(rename = "IL")]
    #[strum(serialize = "IL")]
    IllinoisLotto,
}

impl GameKind {
    /// Only Illinois Lotto publishes several draws (tiers) per date.
    pub fn has_draw_tiers(&self) -> bool {
        matches!(self, GameKind::IllinoisLotto)
    }

    pub fn title(&self) -> &'static str {
        match self {
            GameKind::MegaMillions => "Mega Millions",
            GameKind::Powerball => "Powerball",
            GameKind::IllinoisLotto => "Illinois Lotto",
        }
    }
}

/// Illinois Lotto draw tier: the jackpot draw and the two "million" draws.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum DrawTier {
    #[serde(rename = "JP")]
    #[strum(serialize = "JP")]
    Jackpot,
    #[serde(rename = "M1")]
    #[strum(serialize = "M1")]
    MillionOne,
    #[serde(rename = "M2")]
    #[strum(serialize = "M2")]
    MillionTwo,
}

/// Workflow phase a saved run belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    Eval,
    Predict,
    Confirm,
}
