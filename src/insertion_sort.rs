//! Derivative work of [`core::slice::sort`] licensed under `MIT OR Apache-2.0`.
//!
//! [`core::slice::sort`]: https://doc.rust-lang.org/src/core/slice/sort.rs.html

use crate::{
	accessor::{Proxy, RandomAccessor},
	span::Span,
};

/// When dropped, writes `value` into the slot at `dest`.
pub(crate) struct InsertionHole<A: RandomAccessor> {
	pub(crate) value: A::Value,
	pub(crate) dest: A,
}

impl<A: RandomAccessor> Drop for InsertionHole<A> {
	fn drop(&mut self) {
		// SAFETY: Holes are only created with `dest` pointing into the span being sorted.
		unsafe { self.dest.proxy() }.set(self.value);
	}
}

/// Sorts `v[..]` using insertion sort, assuming `v[..offset]` is already sorted.
///
/// This is *O*(*n*^2) worst-case.
///
/// # Panics
///
/// Panics if `offset` is zero or greater than `len`.
pub(crate) fn insertion_sort_shift_left<A, F>(mut v: Span<'_, A>, offset: usize, is_less: &mut F)
where
	A: RandomAccessor,
	F: FnMut(&A::Value, &A::Value) -> bool,
{
	let len = v.len();
	assert!(offset != 0 && offset <= len);

	for i in offset..len {
		shift_tail(v.slice_mut(..=i), is_less);
	}
}

/// Partially sorts a span by shifting several out-of-order elements around.
///
/// Returns `true` if the span is sorted at the end. This function is *O*(*n*) worst-case.
#[cold]
pub(crate) fn partial_insertion_sort<A, F>(mut v: Span<'_, A>, is_less: &mut F) -> bool
where
	A: RandomAccessor,
	F: FnMut(&A::Value, &A::Value) -> bool,
{
	// Maximum number of adjacent out-of-order pairs that will get shifted.
	const MAX_STEPS: usize = 5;
	// If the span is shorter than this, don't shift any elements.
	const SHORTEST_SHIFTING: usize = 50;

	let len = v.len();
	let mut i = 1;

	for _ in 0..MAX_STEPS {
		// SAFETY: We already explicitly did the bound checking with `i < len`.
		unsafe {
			// Find the next pair of adjacent out-of-order elements.
			while i < len && !is_less(&v.uget(i), &v.uget(i - 1)) {
				i += 1;
			}
		}

		// Are we done?
		if i == len {
			return true;
		}

		// Don't shift elements on short spans, that has a performance cost.
		if len < SHORTEST_SHIFTING {
			return false;
		}

		// Swap the found pair of elements. This puts them in correct order.
		v.swap(i - 1, i);

		if i >= 2 {
			// Shift the smaller element to the left.
			shift_tail(v.slice_mut(..i), is_less);
			// Shift the greater element to the right.
			shift_head(v.slice_mut(i..), is_less);
		}
	}

	// Didn't manage to sort the span in the limited number of steps.
	false
}

/// Shifts the first element to the right until it encounters a greater or equal element.
fn shift_head<A, F>(mut v: Span<'_, A>, is_less: &mut F)
where
	A: RandomAccessor,
	F: FnMut(&A::Value, &A::Value) -> bool,
{
	let len = v.len();
	// SAFETY: All indexing is within `0..len` and `len >= 2` is checked first.
	unsafe {
		// If the first two elements are out-of-order...
		if len >= 2 && is_less(&v.uget(1), &v.uget(0)) {
			// Read the first element into a stack variable. If a following comparison panics,
			// `hole` gets dropped and writes the element back into the span.
			let mut hole = InsertionHole {
				value: v.uget(0),
				dest: v.cursor(1),
			};
			v.uset(0, v.uget(1));

			for i in 2..len {
				let next = v.uget(i);
				if !is_less(&next, &hole.value) {
					break;
				}

				// Move `i`-th element one place to the left, thus shifting the hole to the right.
				v.uset(i - 1, next);
				hole.dest = v.cursor(i);
			}
			// `hole` gets dropped and thus copies the element into the remaining hole in `v`.
		}
	}
}

/// Shifts the last element to the left until it encounters a smaller or equal element.
pub(crate) fn shift_tail<A, F>(mut v: Span<'_, A>, is_less: &mut F)
where
	A: RandomAccessor,
	F: FnMut(&A::Value, &A::Value) -> bool,
{
	let len = v.len();
	// SAFETY: All indexing is within `0..len` and `len >= 2` is checked first.
	unsafe {
		// If the last two elements are out-of-order...
		if len >= 2 && is_less(&v.uget(len - 1), &v.uget(len - 2)) {
			// Read the last element into a stack variable. If a following comparison panics,
			// `hole` gets dropped and writes the element back into the span.
			let mut hole = InsertionHole {
				value: v.uget(len - 1),
				dest: v.cursor(len - 2),
			};
			v.uset(len - 1, v.uget(len - 2));

			for i in (0..len - 2).rev() {
				let prev = v.uget(i);
				if !is_less(&hole.value, &prev) {
					break;
				}

				// Move `i`-th element one place to the right, thus shifting the hole to the left.
				v.uset(i + 1, prev);
				hole.dest = v.cursor(i);
			}
			// `hole` gets dropped and thus copies the element into the remaining hole in `v`.
		}
	}
}

#[cfg(feature = "std")]
#[cfg(test)]
mod test {
	use super::{insertion_sort_shift_left, partial_insertion_sort};
	use crate::span::Span;
	use ndarray::{Array1, Array2, s};
	use quickcheck_macros::quickcheck;

	#[quickcheck]
	fn sorted(xs: Vec<u32>) {
		let mut array = Array1::from_vec(xs);
		if array.len() >= 2 {
			insertion_sort_shift_left(Span::from_view(&mut array), 1, &mut u32::lt);
		}
		for i in 1..array.len() {
			assert!(array[i - 1] <= array[i]);
		}
	}

	#[quickcheck]
	fn sorted_column(xs: Vec<u32>) {
		let rows = xs.len();
		let mut matrix = Array2::from_shape_fn((rows, 2), |(i, j)| if j == 0 { xs[i] } else { 0 });
		let mut column = matrix.column_mut(0);
		if rows >= 2 {
			insertion_sort_shift_left(Span::from_view(&mut column), 1, &mut u32::lt);
		}
		let mut expected = xs;
		expected.sort();
		assert_eq!(matrix.column(0).to_vec(), expected);
		assert!(matrix.column(1).iter().all(|&x| x == 0));
	}

	#[test]
	fn nearly_sorted() {
		let mut array = Array1::from_iter(0..100u32);
		array.swap(40, 41);
		array.swap(70, 71);
		assert!(partial_insertion_sort(
			Span::from_view(&mut array),
			&mut u32::lt
		));
		assert_eq!(array, Array1::from_iter(0..100u32));
		let mut array = Array1::from_iter((0..100u32).rev());
		let mut view = array.slice_mut(s![..20]);
		assert!(!partial_insertion_sort(
			Span::from_view(&mut view),
			&mut u32::lt
		));
	}
}
