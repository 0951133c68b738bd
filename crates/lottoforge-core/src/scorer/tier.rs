use crate::consts::MIN_REPORTABLE_MAINS;
use crate::error::LottoError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A reportable match bucket such as `4` or `4+B`.
///
/// The derived ordering runs from most common to rarest:
/// `3 < 3+B < 4 < 4+B < 5 < 5+B` (and `3 < 4 < 5 < 6` for IL).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tier {
    pub mains: u8,
    pub bonus: bool,
}

impl Tier {
    pub const fn plain(mains: u8) -> Self {
        Self {
            mains,
            bonus: false,
        }
    }

    pub const fn with_bonus(mains: u8) -> Self {
        Self { mains, bonus: true }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bonus {
            write!(f, "{}+B", self.mains)
        } else {
            write!(f, "{}", self.mains)
        }
    }
}

impl FromStr for Tier {
    type Err = LottoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (digits, bonus) = match s.strip_suffix("+B").or_else(|| s.strip_suffix("+b")) {
            Some(d) => (d, true),
            None => (s, false),
        };
        let mains: u8 = digits
            .parse()
            .map_err(|_| LottoError::parse(format!("unknown tier '{}'", s)))?;
        if mains < MIN_REPORTABLE_MAINS {
            return Err(LottoError::parse(format!("tier '{}' is not reportable", s)));
        }
        Ok(Tier { mains, bonus })
    }
}

// Tiers are JSON map keys, so they travel as their label.
impl Serialize for Tier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Tier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
