//! Search and set helpers shared by the binning engine, axes, and table.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::Hash;

/// Total-order comparator for `f64` usable with sort and binary search.
///
/// NaNs compare equal to each other and greater than every other value,
/// so an ascending sort collects them at the end.
pub fn compare_numeric(first: f64, second: f64) -> Ordering {
    match (first.is_nan(), second.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => first.partial_cmp(&second).unwrap_or(Ordering::Equal),
    }
}

/// Binary search over a slice sorted under `comparator`.
///
/// Returns the index of a matching element, or `None` — absence is an
/// expected outcome, not an error. If the slice is not sorted under the
/// same comparator the result is unspecified (but never unsafe).
pub fn binary_search<T, F>(slice: &[T], target: &T, mut comparator: F) -> Option<usize>
where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut low = 0;
    let mut high = slice.len();
    while low < high {
        let mid = (low + high) / 2;
        match comparator(&slice[mid], target) {
            Ordering::Less => low = mid + 1,
            Ordering::Greater => high = mid,
            Ordering::Equal => return Some(mid),
        }
    }
    None
}

/// Index of the first element matching `predicate`, or `None`. O(n).
pub fn find_index<T, F>(slice: &[T], predicate: F) -> Option<usize>
where
    F: FnMut(&T) -> bool,
{
    slice.iter().position(predicate)
}

/// First element matching `predicate`, or `None`. O(n).
pub fn find_first<T, F>(slice: &[T], mut predicate: F) -> Option<&T>
where
    F: FnMut(&T) -> bool,
{
    slice.iter().find(|item| predicate(item))
}

/// Elements of `minuend` whose identity (via `identity_of`) does not
/// appear in `subtrahend`.
///
/// Cost is O(n + m) through a hash set of subtrahend identities. An empty
/// subtrahend returns the minuend slice borrowed rather than copied, so
/// callers that need the original preserved must not mutate the result in
/// place. The order of the returned elements is unspecified and must not
/// be relied on.
pub fn set_difference<'a, T, K, F>(
    minuend: &'a [T],
    subtrahend: &[T],
    mut identity_of: F,
) -> Cow<'a, [T]>
where
    T: Clone,
    K: Eq + Hash,
    F: FnMut(&T) -> K,
{
    if subtrahend.is_empty() {
        return Cow::Borrowed(minuend);
    }
    let removed: HashSet<K> = subtrahend.iter().map(&mut identity_of).collect();
    Cow::Owned(
        minuend
            .iter()
            .filter(|item| !removed.contains(&identity_of(item)))
            .cloned()
            .collect(),
    )
}
