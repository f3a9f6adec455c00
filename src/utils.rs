//! Small sequence helpers used by the relocation planner.

use crate::errors::{Error, Result};
use std::collections::HashSet;
use std::hash::Hash;

/// Mark every element that equals an earlier element of the sequence.
///
/// The returned vector is parallel to the input: `flags[i]` is true when
/// `items[i]` already appeared at some index `j < i`. The first occurrence
/// of a value is never flagged.
pub fn detect_duplicates<I>(items: I) -> Vec<bool>
where
    I: IntoIterator,
    I::Item: Hash + Eq,
{
    let mut seen = HashSet::new();
    items.into_iter().map(|item| !seen.insert(item)).collect()
}

/// Zip two sequences, failing instead of truncating when their lengths differ.
pub fn zip_equal<A, B>(left: A, right: B) -> Result<Vec<(A::Item, B::Item)>>
where
    A: IntoIterator,
    B: IntoIterator,
{
    let left: Vec<_> = left.into_iter().collect();
    let right: Vec<_> = right.into_iter().collect();

    if left.len() != right.len() {
        return Err(Error::LengthMismatch {
            left: left.len(),
            right: right.len(),
        });
    }

    Ok(left.into_iter().zip(right).collect())
}
