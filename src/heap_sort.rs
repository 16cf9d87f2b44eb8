//! Derivative work of [`core::slice::sort`] licensed under `MIT OR Apache-2.0`.
//!
//! [`core::slice::sort`]: https://doc.rust-lang.org/src/core/slice/sort.rs.html

use crate::{accessor::RandomAccessor, span::Span};

// This binary heap respects the invariant `parent >= child`.
fn sift_down<A, F>(mut v: Span<'_, A>, mut node: usize, is_less: &mut F)
where
	A: RandomAccessor,
	F: FnMut(&A::Value, &A::Value) -> bool,
{
	let len = v.len();
	loop {
		// Children of `node`.
		let mut child = 2 * node + 1;
		if child >= len {
			break;
		}

		// SAFETY: `node < child < len` and `child + 1 < len` is checked before its use.
		unsafe {
			// Choose the greater child.
			if child + 1 < len && is_less(&v.uget(child), &v.uget(child + 1)) {
				child += 1;
			}

			// Stop if the invariant holds at `node`.
			if !is_less(&v.uget(node), &v.uget(child)) {
				break;
			}

			// Swap `node` with the greater child, move one step down, and continue sifting.
			v.uswap(node, child);
		}
		node = child;
	}
}

/// Sorts `v` using heapsort, which guarantees *O*(*n* \* log(*n*)) worst-case.
#[cold]
pub(crate) fn heap_sort<A, F>(mut v: Span<'_, A>, is_less: &mut F)
where
	A: RandomAccessor,
	F: FnMut(&A::Value, &A::Value) -> bool,
{
	// Build the heap in linear time.
	for i in (0..v.len() / 2).rev() {
		sift_down(v.view_mut(), i, is_less);
	}

	// Pop maximal elements from the heap.
	for i in (1..v.len()).rev() {
		v.swap(0, i);
		sift_down(v.slice_mut(..i), 0, is_less);
	}
}

/// Places the `mid` least elements of `v` in sorted order into `v[..mid]`.
///
/// A max-heap of the first `mid` elements admits every following element less than its root, then
/// is popped in place. This is *O*(*n* \* log(*mid*)) worst-case and leaves `v[mid..]` in
/// unspecified order.
///
/// # Panics
///
/// Panics if `mid > len`.
pub(crate) fn partial_sort<A, F>(mut v: Span<'_, A>, mid: usize, is_less: &mut F)
where
	A: RandomAccessor,
	F: FnMut(&A::Value, &A::Value) -> bool,
{
	let len = v.len();
	assert!(
		mid <= len,
		"partial sort length {mid} out of bounds for span of length {len}"
	);
	if mid == 0 {
		return;
	}

	// Build a heap of the first `mid` elements in linear time.
	for i in (0..mid / 2).rev() {
		sift_down(v.slice_mut(..mid), i, is_less);
	}

	// Replace the heap's maximum with every smaller element of the tail.
	for i in mid..len {
		// SAFETY: `0 < mid <= i < len`.
		unsafe {
			if is_less(&v.uget(i), &v.uget(0)) {
				v.uswap(0, i);
				sift_down(v.slice_mut(..mid), 0, is_less);
			}
		}
	}

	// Pop maximal elements from the heap.
	for i in (1..mid).rev() {
		v.swap(0, i);
		sift_down(v.slice_mut(..i), 0, is_less);
	}
}

#[cfg(feature = "std")]
#[cfg(test)]
mod test {
	use super::{heap_sort, partial_sort};
	use crate::span::Span;
	use ndarray::{Array1, s};
	use quickcheck_macros::quickcheck;

	#[quickcheck]
	fn sorted(xs: Vec<u32>) {
		let mut array = Array1::from_vec(xs);
		heap_sort(Span::from_view(&mut array), &mut u32::lt);
		for i in 1..array.len() {
			assert!(array[i - 1] <= array[i]);
		}
	}

	#[quickcheck]
	fn sorted_reversed(xs: Vec<u32>) {
		let mut array = Array1::from_vec(xs);
		let mut view = array.slice_mut(s![..;-1]);
		heap_sort(Span::from_view(&mut view), &mut u32::gt);
		for i in 1..array.len() {
			assert!(array[i - 1] <= array[i]);
		}
	}

	#[quickcheck]
	fn partially_sorted(xs: Vec<u32>, mid: usize) {
		let mid = mid % (xs.len() + 1);
		let mut sorted = xs.clone();
		sorted.sort();
		let mut array = Array1::from_vec(xs);
		partial_sort(Span::from_view(&mut array), mid, &mut u32::lt);
		assert_eq!(array.slice(s![..mid]).to_vec(), sorted[..mid]);
		let mut rest = array.slice(s![mid..]).to_vec();
		rest.sort();
		assert_eq!(rest, sorted[mid..]);
	}
}
