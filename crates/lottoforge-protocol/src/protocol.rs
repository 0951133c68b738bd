use crate::game::{DrawTier, GameKind};
use serde::{Deserialize, Serialize};

/// Unvalidated draw shape as it travels through JSON: `[[mains...], bonus]`.
///
/// Numbers are kept wide so out-of-range values survive deserialisation and
/// can be rejected with a precise reason by the codec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCombination(pub Vec<u32>, pub Option<u32>);

impl RawCombination {
    pub fn mains(&self) -> &[u32] {
        &self.0
    }

    pub fn bonus(&self) -> Option<u32> {
        self.1
    }
}

/// A draw to score against, optionally tagged with its IL tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<DrawTier>,
    pub draw: RawCombination,
}

impl TargetSpec {
    pub fn label(&self, game: GameKind) -> String {
        match self.tier {
            Some(tier) => format!("{}_{}", game, tier),
            None => game.to_string(),
        }
    }
}

/// Everything needed to re-run a phase exactly. Saved verbatim in run records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRequest {
    pub game: GameKind,
    pub targets: Vec<TargetSpec>,
    /// Newest first.
    #[serde(default)]
    pub history: Vec<RawCombination>,
    #[serde(default)]
    pub feed: String,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_combination_wire_shape() {
        let raw = RawCombination(vec![10, 14, 34, 40, 43], Some(5));
        assert_eq!(serde_json::to_string(&raw).unwrap(), "[[10,14,34,40,43],5]");

        let il: RawCombination = serde_json::from_str("[[1,4,5,10,18,49],null]").unwrap();
        assert_eq!(il.bonus(), None);
        assert_eq!(il.mains().len(), 6);
    }

    #[test]
    fn test_target_labels() {
        let t = TargetSpec {
            tier: Some(DrawTier::MillionOne),
            draw: RawCombination(vec![1, 2, 3, 4, 5, 6], None),
        };
        assert_eq!(t.label(GameKind::IllinoisLotto), "IL_M1");

        let t = TargetSpec {
            tier: None,
            draw: RawCombination(vec![1, 2, 3, 4, 5], Some(1)),
        };
        assert_eq!(t.label(GameKind::Powerball), "PB");
    }
}
