//! Derivative work of [`core::slice::sort`] licensed under `MIT OR Apache-2.0`.
//!
//! [`core::slice::sort`]: https://doc.rust-lang.org/src/core/slice/sort.rs.html

#![cfg(feature = "alloc")]

use crate::{accessor::RandomAccessor, insertion_sort::insertion_sort_shift_left, span::Span};
use alloc::vec::Vec;
use core::cmp;

/// Merges non-decreasing runs `v[..mid]` and `v[mid..]` using `buf` as temporary storage, and
/// stores the result into `v[..]`.
///
/// Both runs must be non-empty.
fn merge<A, F>(mut v: Span<'_, A>, mid: usize, buf: &mut Vec<A::Value>, is_less: &mut F)
where
	A: RandomAccessor,
	F: FnMut(&A::Value, &A::Value) -> bool,
{
	let len = v.len();
	debug_assert!(0 < mid && mid < len);

	// The merge process first copies the shorter run into `buf`. Then it traces the newly copied
	// run and the longer run forwards (or backwards), comparing their next unconsumed elements and
	// copying the lesser (or greater) one into `v`.
	//
	// As soon as the shorter run is fully consumed, the process is done. If the longer run gets
	// consumed first, then we must copy whatever is left of the shorter run into the remaining
	// hole in `v`.
	//
	// Intermediate state of the process is always tracked by `hole`, which serves two purposes:
	// 1. Protects integrity of `v` from panics in `is_less`.
	// 2. Fills the remaining hole in `v` if the longer run gets consumed first.
	buf.clear();

	if mid <= len - mid {
		// The left run is shorter.
		buf.extend((0..mid).map(|i| v.get(i)));
		let mut hole = MergeHole {
			buf: buf.as_slice(),
			start: 0,
			end: mid,
			dest: 0,
			v,
		};

		// Initially, these indices point to the beginnings of their runs.
		let mut right = mid;

		while hole.start < hole.end && right < len {
			// Consume the lesser side.
			// If equal, prefer the left run to maintain stability.

			// SAFETY: `hole.dest <= right < len` as every consumed element of the right run has
			// been written to at most its own position.
			unsafe {
				let lesser = hole.v.uget(right);
				let shorter = hole.buf[hole.start];
				let next = if is_less(&lesser, &shorter) {
					right += 1;
					lesser
				} else {
					hole.start += 1;
					shorter
				};
				hole.v.uset(hole.dest, next);
			}
			hole.dest += 1;
		}
	} else {
		// The right run is shorter.
		buf.extend((mid..len).map(|i| v.get(i)));
		let mut hole = MergeHole {
			buf: buf.as_slice(),
			start: 0,
			end: len - mid,
			dest: mid,
			v,
		};

		// Initially, these indices point past the ends of their runs.
		let mut out = len;

		while 0 < hole.dest && 0 < hole.end {
			// Consume the greater side.
			// If equal, prefer the right run to maintain stability.

			// SAFETY: `0 < hole.dest < out <= len`.
			unsafe {
				let greater = hole.v.uget(hole.dest - 1);
				let shorter = hole.buf[hole.end - 1];
				let next = if is_less(&shorter, &greater) {
					hole.dest -= 1;
					greater
				} else {
					hole.end -= 1;
					shorter
				};
				out -= 1;
				hole.v.uset(out, next);
			}
		}
	}
	// Finally, `hole` gets dropped. If the shorter run was not fully consumed, whatever remains of
	// it will now be copied into the hole in `v`.
}

// When dropped, copies the range `start..end` of `buf` into `dest..` of `v`.
struct MergeHole<'b, 's, A: RandomAccessor> {
	buf: &'b [A::Value],
	start: usize,
	end: usize,

	v: Span<'s, A>,
	dest: usize,
}

impl<A: RandomAccessor> Drop for MergeHole<'_, '_, A> {
	fn drop(&mut self) {
		for (offset, &value) in self.buf[self.start..self.end].iter().enumerate() {
			// SAFETY: The unconsumed elements of the shorter run fit exactly into the hole.
			unsafe { self.v.uset(self.dest + offset, value) };
		}
	}
}

/// This merge sort borrows some (but not all) ideas from TimSort, which used to be described in
/// detail [here](https://github.com/python/cpython/blob/main/Objects/listsort.txt). However Python
/// has switched to a Powersort based implementation.
///
/// The algorithm identifies strictly descending and non-descending subsequences, which are called
/// natural runs. There is a stack of pending runs yet to be merged. Each newly found run is pushed
/// onto the stack, and then some pairs of adjacent runs are merged until these two invariants are
/// satisfied:
///
/// 1. for every `i` in `1..runs.len()`: `runs[i - 1].len > runs[i].len`
/// 2. for every `i` in `2..runs.len()`: `runs[i - 2].len > runs[i - 1].len + runs[i].len`
///
/// The invariants ensure that the total running time is *O*(*n* \* log(*n*)) worst-case.
pub(crate) fn merge_sort<A, F>(
	mut v: Span<'_, A>,
	is_less: &mut F,
	buf: &mut Vec<A::Value>,
	runs: &mut Vec<TimSortRun>,
) where
	A: RandomAccessor,
	F: FnMut(&A::Value, &A::Value) -> bool,
{
	// Spans of up to this length get sorted using insertion sort.
	const MAX_INSERTION: usize = 20;

	let len = v.len();

	// Short spans get sorted in-place via insertion sort to avoid allocations.
	if len <= MAX_INSERTION {
		if len >= 2 {
			insertion_sort_shift_left(v, 1, is_less);
		}
		return;
	}

	// When merging two sorted runs, `buf` holds a copy of the shorter run, which will always have
	// length at most `len / 2`.
	buf.reserve(len / 2);
	runs.clear();

	let mut end = 0;
	let mut start = 0;

	// Scan forward. Memory pre-fetching prefers forward scanning vs backwards scanning, and the
	// code-gen is usually better.
	while end < len {
		let (streak_end, was_reversed) = find_streak(&v.slice_mut(start..), is_less);
		end += streak_end;
		if was_reversed {
			v.slice_mut(start..end).reverse();
		}

		// Insert some more elements into the run if it's too short. Insertion sort is faster than
		// merge sort on short sequences, so this significantly improves performance.
		end = provide_sorted_batch(v.view_mut(), start, end, is_less);

		// Push this run onto the stack.
		runs.push(TimSortRun {
			start,
			len: end - start,
		});
		start = end;

		// Merge some pairs of adjacent runs to satisfy the invariants.
		while let Some(r) = collapse(runs, len) {
			let left = runs[r];
			let right = runs[r + 1];
			merge(
				v.slice_mut(left.start..right.start + right.len),
				left.len,
				buf,
				is_less,
			);
			runs[r + 1] = TimSortRun {
				start: left.start,
				len: left.len + right.len,
			};
			runs.remove(r);
		}
	}

	// Finally, exactly one run must remain in the stack.
	debug_assert!(runs.len() == 1 && runs[0].start == 0 && runs[0].len == len);

	// Examines the stack of runs and identifies the next pair of runs to merge. More specifically,
	// if `Some(r)` is returned, that means `runs[r]` and `runs[r + 1]` must be merged next. If the
	// algorithm should continue building a new run instead, `None` is returned.
	//
	// TimSort is infamous for its buggy implementations, as described here:
	// http://envisage-project.eu/timsort-specification-and-verification/
	//
	// The gist of the story is: we must enforce the invariants on the top four runs on the stack.
	// Enforcing them on just top three is not sufficient to ensure that the invariants will still
	// hold for *all* runs in the stack.
	//
	// This function correctly checks invariants for the top four runs. Additionally, if the top
	// run starts at index 0, it will always demand a merge operation until the stack is fully
	// collapsed, in order to complete the sort.
	#[inline]
	fn collapse(runs: &[TimSortRun], stop: usize) -> Option<usize> {
		let n = runs.len();
		if n >= 2
			&& (runs[n - 1].start + runs[n - 1].len == stop
				|| runs[n - 2].len <= runs[n - 1].len
				|| (n >= 3 && runs[n - 3].len <= runs[n - 2].len + runs[n - 1].len)
				|| (n >= 4 && runs[n - 4].len <= runs[n - 3].len + runs[n - 2].len))
		{
			if n >= 3 && runs[n - 3].len < runs[n - 1].len {
				Some(n - 3)
			} else {
				Some(n - 2)
			}
		} else {
			None
		}
	}
}

/// Pending run of [`merge_sort`].
#[derive(Clone, Copy, Debug)]
pub(crate) struct TimSortRun {
	len: usize,
	start: usize,
}

/// Takes a range as denoted by start and end, that is already sorted and extends it to the right if
/// necessary with sorts optimized for smaller ranges such as insertion sort.
fn provide_sorted_batch<A, F>(mut v: Span<'_, A>, start: usize, mut end: usize, is_less: &mut F) -> usize
where
	A: RandomAccessor,
	F: FnMut(&A::Value, &A::Value) -> bool,
{
	// This value is a balance between least comparisons and best performance, as influenced by
	// for example cache locality.
	const MIN_INSERTION_RUN: usize = 10;

	let len = v.len();
	debug_assert!(end >= start && end <= len);

	// Insert some more elements into the run if it's too short. Insertion sort is faster than
	// merge sort on short sequences, so this significantly improves performance.
	let start_end_diff = end - start;

	if start_end_diff < MIN_INSERTION_RUN && end < len {
		// v[start..end] are elements that are already sorted in the input. We want to extend the
		// sorted region to the left, so we push up MIN_INSERTION_RUN - 1 to the right. Which is
		// more efficient that trying to push those already sorted elements to the left.
		end = cmp::min(start + MIN_INSERTION_RUN, len);
		let presorted_start = cmp::max(start_end_diff, 1);

		insertion_sort_shift_left(v.slice_mut(start..end), presorted_start, is_less);
	}

	end
}

/// Finds a streak of presorted elements starting at the beginning of the span. Returns the first
/// value that is not part of said streak, and a bool denoting whether the streak was reversed.
/// Streaks can be increasing or decreasing.
fn find_streak<A, F>(v: &Span<'_, A>, is_less: &mut F) -> (usize, bool)
where
	A: RandomAccessor,
	F: FnMut(&A::Value, &A::Value) -> bool,
{
	let len = v.len();

	if len < 2 {
		return (len, false);
	}

	let mut end = 2;

	// SAFETY: We checked that len >= 2, so 0 and 1 are valid indices. We know end >= 2 and check
	// end < len. From that follows that accessing v at end and end - 1 is safe.
	unsafe {
		let assume_reverse = is_less(&v.uget(1), &v.uget(0));

		if assume_reverse {
			while end < len && is_less(&v.uget(end), &v.uget(end - 1)) {
				end += 1;
			}

			(end, true)
		} else {
			while end < len && !is_less(&v.uget(end), &v.uget(end - 1)) {
				end += 1;
			}
			(end, false)
		}
	}
}

#[cfg(feature = "std")]
#[cfg(test)]
mod test {
	use super::merge_sort;
	use crate::span::Span;
	use ndarray::{Array1, Array2};
	use quickcheck_macros::quickcheck;

	#[quickcheck]
	fn sorted(xs: Vec<u32>) {
		let mut sorted = xs.clone();
		sorted.sort();
		let mut array = Array1::from_vec(xs);
		merge_sort(
			Span::from_view(&mut array),
			&mut u32::lt,
			&mut Vec::new(),
			&mut Vec::new(),
		);
		assert_eq!(array.to_vec(), sorted);
	}

	#[quickcheck]
	fn stably_sorted_pairs(xs: Vec<u8>) {
		let mut expected = xs.iter().copied().zip(0..).collect::<Vec<(u8, i64)>>();
		expected.sort_by_key(|&(value, _)| value);
		let mut matrix = Array2::from_shape_fn((xs.len(), 2), |(i, j)| xs[i] * j as u8);
		let mut values = matrix.column_mut(1);
		let mut indices = Array1::from_iter(0..xs.len() as i64);
		let mut buf = Vec::new();
		let mut runs = Vec::new();
		merge_sort(
			Span::from_views(&mut values, &mut indices),
			&mut |a: &(u8, i64), b: &(u8, i64)| a.0 < b.0,
			&mut buf,
			&mut runs,
		);
		let sorted = values.iter().copied().zip(indices.iter().copied()).collect::<Vec<_>>();
		assert_eq!(sorted, expected);
	}
}
