//! Derivative work of [`alloc::slice`] licensed under `MIT OR Apache-2.0`.
//!
//! [`alloc::slice`]: https://doc.rust-lang.org/src/alloc/slice.rs.html

#![cfg(feature = "alloc")]

use crate::{
	accessor::RandomAccessor,
	merge_sort::{TimSortRun, merge_sort},
	span::Span,
};
use alloc::vec::Vec;
use core::mem;

#[inline]
pub(crate) fn stable_sort<A, F>(v: Span<'_, A>, mut is_less: F)
where
	A: RandomAccessor,
	F: FnMut(&A::Value, &A::Value) -> bool,
{
	// Most spans can be sorted with at most 16 runs in-flight.
	const START_RUN_CAPACITY: usize = 16;

	if mem::size_of::<A::Value>() == 0 {
		// Sorting has no meaningful behavior on zero-sized types. Do nothing.
		return;
	}

	// Scratch memory holds copies of the shorter of two runs being merged.
	let mut buf = Vec::new();
	let mut runs = Vec::<TimSortRun>::with_capacity(START_RUN_CAPACITY);

	merge_sort(v, &mut is_less, &mut buf, &mut runs);
}

#[cfg(feature = "std")]
#[cfg(test)]
mod test {
	use super::stable_sort;
	use crate::span::Span;
	use ndarray::{Array1, s};
	use quickcheck_macros::quickcheck;

	fn keyed(xs: Vec<u32>) -> Vec<(u32, usize)> {
		xs.into_iter()
			.enumerate()
			.map(|(position, x)| (x % 8, position))
			.collect()
	}

	#[quickcheck]
	fn stably_sorted(xs: Vec<u32>) {
		let xs = keyed(xs);
		let mut sorted = xs.clone();
		sorted.sort_by_key(|&(key, _)| key);
		let mut array = Array1::from_vec(xs);
		stable_sort(Span::from_view(&mut array), |a, b| a.0 < b.0);
		assert_eq!(array.to_vec(), sorted);
	}

	#[quickcheck]
	fn stably_sorted_reversed(xs: Vec<u32>) {
		let xs = keyed(xs);
		let mut sorted = xs.clone();
		sorted.reverse();
		sorted.sort_by_key(|&(key, _)| key);
		let mut array = Array1::from_vec(xs);
		let mut view = array.slice_mut(s![..;-1]);
		stable_sort(Span::from_view(&mut view), |a, b| a.0 < b.0);
		assert_eq!(view.to_vec(), sorted);
	}
}
