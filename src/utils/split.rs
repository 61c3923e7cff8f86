//! Splitting a sequence into near-equal batches.

use crate::error_handling::SplitError;

/// Splits `source` into at most `group_count` consecutive batches of near-equal size.
///
/// `group_count` is a target number of groups, not a batch size. The batch length
/// is `step = ceil(len / group_count)`; every batch has `step` items except
/// possibly the last, so the number of batches returned is `ceil(len / step)`,
/// which may be less than `group_count` when the division is uneven
/// (10 items into 3 groups gives batches of 4, 4 and 2).
///
/// A `group_count` larger than `source.len()` is clamped to `source.len()`.
/// An empty `source` yields no batches and no error.
///
/// Batches own clones of the input, so later changes to the caller's data never
/// reach batches already returned.
///
/// # Errors
///
/// Returns `SplitError::ZeroGroupCount` if `group_count` is zero, whatever the input.
pub fn split_into_batches<T: Clone>(
    source: &[T],
    group_count: usize,
) -> Result<Vec<Vec<T>>, SplitError> {
    if group_count == 0 {
        return Err(SplitError::ZeroGroupCount);
    }

    if source.is_empty() {
        return Ok(Vec::new());
    }

    let group_count = group_count.min(source.len());
    let step = source.len().div_ceil(group_count);

    Ok(source.chunks(step).map(<[T]>::to_vec).collect())
}
