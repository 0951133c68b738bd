use crate::error::{LottoError, LottoResult};
use crate::profile::GameProfile;
use crate::protocol::RawCombination;
use itertools::Itertools;
use serde::{Serialize, Serializer};
use std::fmt;

/// A validated draw: distinct main numbers (stored ascending) and an optional
/// bonus ball. Equality is main-set plus bonus.
///
/// Only [`GameProfile::combination`] (or the codec, which calls it) hands out
/// values of this type, so every `Combination` satisfies its game's shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Combination {
    mains: Vec<u8>,
    bonus: Option<u8>,
}

impl Combination {
    /// Caller guarantees the invariants (distinct, sorted, in range).
    pub(crate) fn from_sorted_unchecked(mains: Vec<u8>, bonus: Option<u8>) -> Self {
        debug_assert!(mains.windows(2).all(|w| w[0] < w[1]));
        Self { mains, bonus }
    }

    pub fn mains(&self) -> &[u8] {
        &self.mains
    }

    pub fn bonus(&self) -> Option<u8> {
        self.bonus
    }

    pub fn main_sum(&self) -> u32 {
        self.mains.iter().map(|&n| n as u32).sum()
    }

    pub fn to_raw(&self) -> RawCombination {
        RawCombination(
            self.mains.iter().map(|&n| n as u32).collect(),
            self.bonus.map(|b| b as u32),
        )
    }

    /// Hyphenated two-digit form used in history blobs and tables.
    pub fn dashed(&self) -> String {
        self.mains.iter().map(|n| format!("{:02}", n)).join("-")
    }
}

/// `[[m1, m2, ...], bonus]`, with `null` when there is no bonus.
impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[[{}], ", self.mains.iter().join(", "))?;
        match self.bonus {
            Some(b) => write!(f, "{}]", b),
            None => write!(f, "null]"),
        }
    }
}

impl Serialize for Combination {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_raw().serialize(serializer)
    }
}

impl GameProfile {
    /// Validates and canonicalises a draw for this game.
    pub fn combination(&self, mains: &[u32], bonus: Option<u32>) -> LottoResult<Combination> {
        if mains.len() != self.main_count {
            return Err(LottoError::parse(format!(
                "{} expects {} main numbers, got {}",
                self.kind,
                self.main_count,
                mains.len()
            )));
        }

        if let Some(&bad) = mains.iter().find(|&&n| !self.main_in_range(n)) {
            return Err(LottoError::parse(format!(
                "main number {} outside {}..={}",
                bad, self.main_min, self.main_max
            )));
        }

        let mut sorted: Vec<u8> = mains.iter().map(|&n| n as u8).collect();
        sorted.sort_unstable();
        if let Some(w) = sorted.windows(2).find(|w| w[0] == w[1]) {
            return Err(LottoError::parse(format!("duplicate main number {}", w[0])));
        }

        let bonus = match (self.bonus_range, bonus) {
            (Some(_), Some(b)) if self.bonus_in_range(b) => Some(b as u8),
            (Some((lo, hi)), Some(b)) => {
                return Err(LottoError::parse(format!(
                    "bonus {} outside {}..={}",
                    b, lo, hi
                )))
            }
            (Some(_), None) => {
                return Err(LottoError::parse(format!(
                    "{} requires a bonus number",
                    self.kind
                )))
            }
            (None, Some(b)) => {
                return Err(LottoError::parse(format!(
                    "{} has no bonus ball, got {}",
                    self.kind, b
                )))
            }
            (None, None) => None,
        };

        Ok(Combination::from_sorted_unchecked(sorted, bonus))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{ILLINOIS_LOTTO, MEGA_MILLIONS};

    #[test]
    fn test_mains_are_canonicalised() {
        let c = MEGA_MILLIONS
            .combination(&[43, 10, 34, 14, 40], Some(5))
            .unwrap();
        assert_eq!(c.mains(), &[10, 14, 34, 40, 43]);
        assert_eq!(c.main_sum(), 141);
        assert_eq!(c.to_string(), "[[10, 14, 34, 40, 43], 5]");
        assert_eq!(c.dashed(), "10-14-34-40-43");
    }

    #[test]
    fn test_duplicate_main_is_rejected() {
        let err = ILLINOIS_LOTTO
            .combination(&[1, 2, 3, 4, 9, 9], None)
            .unwrap_err();
        assert!(matches!(err, LottoError::Parse { .. }));
        assert!(err.to_string().contains("duplicate main number 9"));
    }

    #[test]
    fn test_bonus_rules() {
        assert!(MEGA_MILLIONS.combination(&[1, 2, 3, 4, 5], None).is_err());
        assert!(MEGA_MILLIONS.combination(&[1, 2, 3, 4, 5], Some(26)).is_err());
        assert!(ILLINOIS_LOTTO
            .combination(&[1, 2, 3, 4, 5, 6], Some(1))
            .is_err());
        // Bonus may repeat a main number.
        assert!(MEGA_MILLIONS.combination(&[1, 2, 3, 4, 5], Some(5)).is_ok());
    }

    #[test]
    fn test_out_of_range_and_wrong_count() {
        assert!(MEGA_MILLIONS.combination(&[0, 2, 3, 4, 5], Some(1)).is_err());
        assert!(MEGA_MILLIONS.combination(&[1, 2, 3, 4, 71], Some(1)).is_err());
        assert!(MEGA_MILLIONS.combination(&[1, 2, 3, 4], Some(1)).is_err());
        assert!(MEGA_MILLIONS.combination(&[1, 2, 3, 4, 300], Some(1)).is_err());
    }
}
