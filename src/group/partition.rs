//! Balanced team partitioning.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::TeamError;

/// Requested team shape: a target team size or a target team count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamShape {
    Size(usize),
    Count(usize),
}

impl TeamShape {
    /// Resolve optional size/count arguments; exactly one must be non-zero.
    pub fn from_args(size: Option<usize>, count: Option<usize>) -> Result<Self, TeamError> {
        let size = size.filter(|&n| n > 0);
        let count = count.filter(|&n| n > 0);
        match (size, count) {
            (Some(size), None) => Ok(Self::Size(size)),
            (None, Some(count)) => Ok(Self::Count(count)),
            _ => Err(TeamError::SizeOrCount),
        }
    }

    /// Target team size for `staged` members.
    pub fn team_size(self, staged: usize) -> usize {
        match self {
            Self::Size(size) => size,
            Self::Count(count) => staged.div_ceil(count),
        }
    }
}

/// Team sizes for `staged` members at a target size of `size`.
///
/// Uses the fewest teams that keep every team at or below `size`, then spreads
/// members so sizes differ by at most one (larger teams first).
pub fn team_sizes(staged: usize, size: usize) -> Vec<usize> {
    if staged == 0 || size == 0 {
        return Vec::new();
    }
    let teams = staged.div_ceil(size);
    let base = staged / teams;
    let extra = staged % teams;
    (0..teams)
        .map(|i| if i < extra { base + 1 } else { base })
        .collect()
}

/// Shuffle `members` uniformly and slice them into teams of `sizes`.
///
/// `sizes` must sum to `members.len()`.
pub fn deal<T, R>(mut members: Vec<T>, sizes: &[usize], rng: &mut R) -> Vec<Vec<T>>
where
    R: Rng + ?Sized,
{
    debug_assert_eq!(sizes.iter().sum::<usize>(), members.len());
    members.shuffle(rng);
    let mut rest = members.into_iter();
    sizes
        .iter()
        .map(|&n| rest.by_ref().take(n).collect())
        .collect()
}
