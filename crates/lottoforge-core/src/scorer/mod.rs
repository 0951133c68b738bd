//! Hit scoring: classify one candidate row against a target draw, then
//! tabulate whole batches (see [`aggregate`]).

pub mod aggregate;
pub mod tier;

pub use self::aggregate::{
    aggregate, aggregate_repeated, AggregateHitResult, BatchPool, BatchSource, CandidateBatch,
    HitResult, PoolStats, RepeatedOutcome, RowFrequency, RowRef,
};
pub use self::tier::Tier;

use crate::combination::Combination;
use crate::error::{LottoError, LottoResult};
use crate::profile::GameProfile;

/// Main numbers shared by both draws. Both slices are ascending.
pub fn overlap(a: &[u8], b: &[u8]) -> usize {
    let (mut i, mut j, mut n) = (0, 0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                n += 1;
                i += 1;
                j += 1;
            }
        }
    }
    n
}

/// `true` when the game has a bonus ball and both draws carry the same one.
pub fn bonus_matches(target: &Combination, row: &Combination, profile: &GameProfile) -> bool {
    profile.has_bonus()
        && matches!((target.bonus(), row.bonus()), (Some(t), Some(r)) if t == r)
}

/// Classifies `row` against `target`. Overlaps below the reportable floor
/// yield `None`, even when the bonus matches.
pub fn score_row(
    target: &Combination,
    row: &Combination,
    profile: &GameProfile,
) -> LottoResult<Option<Tier>> {
    check_shape(target, profile)?;
    check_shape(row, profile)?;

    let hits = overlap(target.mains(), row.mains());
    Ok(profile.tier_for_overlap(hits).map(|mains| Tier {
        mains,
        bonus: bonus_matches(target, row, profile),
    }))
}

pub(crate) fn check_shape(c: &Combination, profile: &GameProfile) -> LottoResult<()> {
    if c.mains().len() != profile.main_count {
        return Err(LottoError::ShapeMismatch {
            expected: profile.main_count,
            found: c.mains().len(),
        });
    }
    Ok(())
}
