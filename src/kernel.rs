//! Per-slice sort and top-k drivers.
//!
//! Each driver takes a value view and a companion `i64` index view of equal length, fills the
//! indices with `0..n` and permutes both views together, so that afterwards `indices[i]` is the
//! position `values[i]` had on entry. Arguments are validated before any element is touched.

use crate::{
	error::{Result, SortError},
	indexed::ValueIndexAccessor,
	ordering::{Direction, Element},
	span::Span,
};
use core::cmp::Ordering;
use log::trace;
use ndarray::{ArrayBase, ArrayViewMut1, DataMut, Ix1, s};

/// Top-k selections with `k * PARTIAL_SORT_RATIO <= n` use a heap-based partial sort, all others
/// an nth-element selection.
///
/// This is a tuning constant only, both strategies yield the same elements.
pub const PARTIAL_SORT_RATIO: usize = 64;

/// Fills `indices` with `0, 1, 2, ...`.
pub fn fill_indices<S>(indices: &mut ArrayBase<S, Ix1>)
where
	S: DataMut<Elem = i64>,
{
	for (position, index) in indices.iter_mut().enumerate() {
		*index = position as i64;
	}
}

/// Sorts `values` and co-permutes `indices` such that `indices[i]` is the original position of
/// `values[i]`.
///
/// NaN is treated as the top of the order: ascending sorts place NaN last, descending sorts place
/// NaN first. With `stable`, equal values keep their original relative order.
///
/// ```
/// use strided_sort::{
///     kernel::sort_slice,
///     ndarray::{arr1, s},
/// };
///
/// let mut values = arr1(&[3.0, f64::NAN, 1.0, 3.0]);
/// let mut indices = arr1(&[0; 4]);
/// sort_slice(values.view_mut(), indices.view_mut(), false, true)?;
/// assert_eq!(values.slice(s![..3]), arr1(&[1.0, 3.0, 3.0]));
/// assert!(values[3].is_nan());
/// assert_eq!(indices, arr1(&[2, 0, 3, 1]));
/// # Ok::<(), strided_sort::SortError>(())
/// ```
///
/// # Errors
///
/// Returns [`SortError::LengthMismatch`] if the views differ in length.
#[cfg(feature = "alloc")]
pub fn sort_slice<T: Element>(
	mut values: ArrayViewMut1<'_, T>,
	mut indices: ArrayViewMut1<'_, i64>,
	descending: bool,
	stable: bool,
) -> Result<()> {
	check_lengths(values.len(), indices.len())?;
	fill_indices(&mut indices);
	sort_paired(
		Span::from_views(&mut values, &mut indices),
		Direction::from_descending(descending),
		stable,
	);
	Ok(())
}

/// Selects the `k` largest (or smallest) values and returns the views truncated to length `k`.
///
/// After the call, the first `k` positions of `values` hold the selected values with their
/// original positions in `indices`. With `sorted`, they are ordered by the policy (largest first if
/// `largest`, smallest first otherwise). Equal values are ordered by original position. The order
/// of positions `k..` is unspecified. NaN is treated as the largest value.
///
/// ```
/// use strided_sort::{kernel::topk_slice, ndarray::arr1};
///
/// let mut values = arr1(&[3.0, f64::NAN, 1.0, 3.0]);
/// let mut indices = arr1(&[0; 4]);
/// let (top, positions) = topk_slice(values.view_mut(), indices.view_mut(), 2, true, true)?;
/// assert!(top[0].is_nan());
/// assert_eq!(top[1], 3.0);
/// assert_eq!(positions, arr1(&[1, 0]));
/// # Ok::<(), strided_sort::SortError>(())
/// ```
///
/// # Errors
///
/// Returns [`SortError::LengthMismatch`] if the views differ in length and
/// [`SortError::KOutOfRange`] if `k` exceeds their length.
pub fn topk_slice<'a, T: Element>(
	mut values: ArrayViewMut1<'a, T>,
	mut indices: ArrayViewMut1<'a, i64>,
	k: usize,
	largest: bool,
	sorted: bool,
) -> Result<(ArrayViewMut1<'a, T>, ArrayViewMut1<'a, i64>)> {
	let len = values.len();
	check_lengths(len, indices.len())?;
	if k > len {
		return Err(SortError::KOutOfRange { k, len });
	}
	fill_indices(&mut indices);
	topk_paired(
		Span::from_views(&mut values, &mut indices),
		k,
		Direction::from_largest(largest),
		sorted,
	);
	Ok((values.slice_move(s![..k]), indices.slice_move(s![..k])))
}

fn check_lengths(values: usize, indices: usize) -> Result<()> {
	if values == indices {
		Ok(())
	} else {
		Err(SortError::LengthMismatch { values, indices })
	}
}

#[cfg(feature = "alloc")]
pub(crate) fn sort_paired<T: Element>(
	mut v: Span<'_, ValueIndexAccessor<'_, T>>,
	direction: Direction,
	stable: bool,
) {
	let compare = move |a: &(T, i64), b: &(T, i64)| direction.compare(&a.0, &b.0);
	if stable {
		trace!("stable sort: n={}, direction={direction:?}", v.len());
		v.sort_by(compare);
	} else {
		trace!("unstable sort: n={}, direction={direction:?}", v.len());
		v.sort_unstable_by(compare);
	}
}

pub(crate) fn topk_paired<T: Element>(
	mut v: Span<'_, ValueIndexAccessor<'_, T>>,
	k: usize,
	direction: Direction,
	sorted: bool,
) {
	let len = v.len();
	debug_assert!(k <= len);
	if k == 0 {
		return;
	}
	let compare = move |a: &(T, i64), b: &(T, i64)| -> Ordering {
		direction.compare(&a.0, &b.0).then(a.1.cmp(&b.1))
	};
	if use_partial_sort(k, len) {
		trace!("top-k by partial sort: n={len}, k={k}, direction={direction:?}");
		v.partial_sort_by(k, compare);
	} else {
		trace!("top-k by selection: n={len}, k={k}, direction={direction:?}, sorted={sorted}");
		v.select_nth_unstable_by(k - 1, compare);
		if sorted {
			v.slice_mut(..k - 1).sort_unstable_by(compare);
		}
	}
}

fn use_partial_sort(k: usize, len: usize) -> bool {
	k.saturating_mul(PARTIAL_SORT_RATIO) <= len
}
