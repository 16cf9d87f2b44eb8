//! Derivative work of [`core::slice::sort`] licensed under `MIT OR Apache-2.0`.
//!
//! [`core::slice::sort`]: https://doc.rust-lang.org/src/core/slice/sort.rs.html

use crate::{
	accessor::RandomAccessor,
	heap_sort::heap_sort,
	insertion_sort::{insertion_sort_shift_left, partial_insertion_sort},
	partition::{break_patterns, choose_pivot, partition, partition_equal},
	span::Span,
};
use core::cmp;

/// Sorts `v` using pattern-defeating quicksort, which is *O*(*n* \* log(*n*)) worst-case.
pub(crate) fn quick_sort<A, F>(v: Span<'_, A>, mut is_less: F)
where
	A: RandomAccessor,
	F: FnMut(&A::Value, &A::Value) -> bool,
{
	// Limit the number of imbalanced partitions to `floor(log2(len)) + 1`.
	let limit = usize::BITS - v.len().leading_zeros();

	recurse(v, &mut is_less, None, limit);
}

/// Sorts `v` recursively.
///
/// If the span had a predecessor in the original span, it is specified as `pred`.
///
/// `limit` is the number of allowed imbalanced partitions before switching to `heap_sort`. If zero,
/// this function will immediately switch to heapsort.
fn recurse<A, F>(mut v: Span<'_, A>, is_less: &mut F, mut pred: Option<A::Value>, mut limit: u32)
where
	A: RandomAccessor,
	F: FnMut(&A::Value, &A::Value) -> bool,
{
	// Spans of up to this length get sorted using insertion sort.
	const MAX_INSERTION: usize = 20;

	// True if the last partitioning was reasonably balanced.
	let mut was_balanced = true;
	// True if the last partitioning didn't shuffle elements (the span was already partitioned).
	let mut was_partitioned = true;

	loop {
		let len = v.len();

		// Very short spans get sorted using insertion sort.
		if len <= MAX_INSERTION {
			if len >= 2 {
				insertion_sort_shift_left(v, 1, is_less);
			}
			return;
		}

		// If too many bad pivot choices were made, simply fall back to heapsort in order to
		// guarantee `O(n * log(n))` worst-case.
		if limit == 0 {
			heap_sort(v, is_less);
			return;
		}

		// If the last partitioning was imbalanced, try breaking patterns in the span by shuffling
		// some elements around. Hopefully we'll choose a better pivot this time.
		if !was_balanced {
			break_patterns(v.view_mut());
			limit -= 1;
		}

		// Choose a pivot and try guessing whether the span is already sorted.
		let (pivot, likely_sorted) = choose_pivot(v.view_mut(), is_less);

		// If the last partitioning was decently balanced and didn't shuffle elements, and if pivot
		// selection predicts the span is likely already sorted...
		if was_balanced && was_partitioned && likely_sorted {
			// Try identifying several out-of-order elements and shifting them to correct
			// positions. If the span ends up being completely sorted, we're done.
			if partial_insertion_sort(v.view_mut(), is_less) {
				return;
			}
		}

		// If the chosen pivot is equal to the predecessor, then it's the smallest element in the
		// span. Partition the span into elements equal to and elements greater than the pivot.
		// This case is usually hit when the span contains many duplicate elements.
		if let Some(p) = pred {
			if !is_less(&p, &v.get(pivot)) {
				let mid = partition_equal(v.view_mut(), pivot, is_less);

				// Continue sorting elements greater than the pivot.
				let (_, rest) = v.split_at(mid);
				v = rest;
				continue;
			}
		}

		// Partition the span.
		let (mid, was_p) = partition(v.view_mut(), pivot, is_less);
		was_balanced = cmp::min(mid, len - mid) >= len / 8;
		was_partitioned = was_p;

		// Split the span into `left`, `pivot`, and `right`.
		let pivot = v.get(mid);
		let (left, right) = v.split_at(mid);
		let (_, right) = right.split_at(1);

		// Recurse into the shorter side only in order to minimize the total number of recursive
		// calls and consume less stack space. Then just continue with the longer side (this is
		// akin to tail recursion).
		if left.len() < right.len() {
			recurse(left, is_less, pred, limit);
			v = right;
			pred = Some(pivot);
		} else {
			recurse(right, is_less, Some(pivot), limit);
			v = left;
		}
	}
}

#[cfg(feature = "std")]
#[cfg(test)]
mod test {
	use super::quick_sort;
	use crate::span::Span;
	use ndarray::{Array1, s};
	use quickcheck_macros::quickcheck;

	#[quickcheck]
	fn sorted(xs: Vec<u32>) {
		let mut sorted = xs.clone();
		sorted.sort_unstable();
		let sorted = Array1::from_vec(sorted);
		let mut array = Array1::from_vec(xs);
		quick_sort(Span::from_view(&mut array), u32::lt);
		assert_eq!(array, sorted);
	}

	#[quickcheck]
	fn sorted_strided(xs: Vec<u32>) {
		let mut sorted = xs.iter().step_by(3).copied().collect::<Vec<_>>();
		sorted.sort_unstable();
		let mut array = Array1::from_vec(xs);
		let mut view = array.slice_mut(s![..;3]);
		quick_sort(Span::from_view(&mut view), u32::lt);
		assert_eq!(view.to_vec(), sorted);
	}

	#[quickcheck]
	fn sorted_pairs(xs: Vec<u8>) {
		let mut values = Array1::from_vec(xs.clone());
		let mut indices = Array1::from_iter(0..xs.len() as i64);
		quick_sort(
			Span::from_views(&mut values, &mut indices),
			|a: &(u8, i64), b: &(u8, i64)| a.0 < b.0,
		);
		for i in 1..values.len() {
			assert!(values[i - 1] <= values[i]);
		}
		for (value, &index) in values.iter().zip(&indices) {
			assert_eq!(*value, xs[index as usize]);
		}
	}
}
