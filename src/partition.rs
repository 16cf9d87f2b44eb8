//! Derivative work of [`core::slice::sort`] licensed under `MIT OR Apache-2.0`.
//!
//! [`core::slice::sort`]: https://doc.rust-lang.org/src/core/slice/sort.rs.html

use crate::{accessor::RandomAccessor, insertion_sort::insertion_sort_shift_left, span::Span};
use core::{
	cmp::{
		self,
		Ordering::{Equal, Greater, Less},
	},
	mem,
};

// For spans of up to this length it's probably faster to simply sort them.
// Defined at the module scope because it's used in multiple functions.
const MAX_INSERTION: usize = 16;

/// Reorders `v` such that the element at `index` is at its final sorted position.
///
/// Returns the elements before `index`, a proxy for the element at `index` and the elements after
/// `index`.
///
/// # Panics
///
/// Panics if `index >= len`.
pub(crate) fn partition_at_index<'s, A, F>(
	mut v: Span<'s, A>,
	index: usize,
	is_less: &mut F,
) -> (Span<'s, A>, A::Reference, Span<'s, A>)
where
	A: RandomAccessor,
	F: FnMut(&A::Value, &A::Value) -> bool,
{
	let len = v.len();
	assert!(
		index < len,
		"partition index {index} out of bounds for span of length {len}"
	);

	if index == len - 1 {
		// Find max element and place it in the last position of the span.
		let max = max_index(&v, is_less);
		v.swap(max, index);
	} else if index == 0 {
		// Find min element and place it in the first position of the span.
		let min = min_index(&v, is_less);
		v.swap(min, index);
	} else {
		partition_at_index_loop(v.view_mut(), index, is_less, None);
	}

	let (left, right) = v.split_at(index);
	let (mut pivot, right) = right.split_at(1);
	let pivot = pivot.at(0);
	(left, pivot, right)
}

fn min_index<A, F>(v: &Span<'_, A>, is_less: &mut F) -> usize
where
	A: RandomAccessor,
	F: FnMut(&A::Value, &A::Value) -> bool,
{
	let mut min = 0;
	for i in 1..v.len() {
		// SAFETY: `min <= i < len`.
		if unsafe { is_less(&v.uget(i), &v.uget(min)) } {
			min = i;
		}
	}
	min
}

fn max_index<A, F>(v: &Span<'_, A>, is_less: &mut F) -> usize
where
	A: RandomAccessor,
	F: FnMut(&A::Value, &A::Value) -> bool,
{
	let mut max = 0;
	for i in 1..v.len() {
		// SAFETY: `max <= i < len`.
		if unsafe { !is_less(&v.uget(i), &v.uget(max)) } {
			max = i;
		}
	}
	max
}

fn partition_at_index_loop<A, F>(
	mut v: Span<'_, A>,
	mut index: usize,
	is_less: &mut F,
	mut pred: Option<A::Value>,
) where
	A: RandomAccessor,
	F: FnMut(&A::Value, &A::Value) -> bool,
{
	// Limit the amount of iterations and fall back to fast deterministic selection to ensure O(n)
	// worst case running time. This limit needs to be constant, because using `ilog2(len)` like in
	// `sort` would result in O(n log n) time complexity.
	let mut limit = 16;

	// True if the last partitioning was reasonably balanced.
	let mut was_balanced = true;

	loop {
		let len = v.len();

		if len <= MAX_INSERTION {
			if len >= 2 {
				insertion_sort_shift_left(v, 1, is_less);
			}
			return;
		}

		if limit == 0 {
			median_of_medians(v, is_less, index);
			return;
		}

		// If the last partitioning was imbalanced, try breaking patterns in the span by shuffling
		// some elements around. Hopefully we'll choose a better pivot this time.
		if !was_balanced {
			break_patterns(v.view_mut());
			limit -= 1;
		}

		// Choose a pivot
		let (pivot, _) = choose_pivot(v.view_mut(), is_less);

		// If the chosen pivot is equal to the predecessor, then it's the smallest element in the
		// span. Partition the span into elements equal to and elements greater than the pivot.
		// This case is usually hit when the span contains many duplicate elements.
		if let Some(p) = pred {
			if !is_less(&p, &v.get(pivot)) {
				let mid = partition_equal(v.view_mut(), pivot, is_less);

				// If we've passed our index, then we're good.
				if mid > index {
					return;
				}

				// Otherwise, continue sorting elements greater than the pivot.
				let (_, rest) = v.split_at(mid);
				v = rest;
				index -= mid;
				pred = None;
				continue;
			}
		}

		let (mid, _) = partition(v.view_mut(), pivot, is_less);
		was_balanced = cmp::min(mid, len - mid) >= len / 8;

		// Split the span into `left`, `pivot`, and `right`.
		let pivot = v.get(mid);
		let (left, right) = v.split_at(mid);
		let (_, right) = right.split_at(1);

		match mid.cmp(&index) {
			Less => {
				v = right;
				index = index - mid - 1;
				pred = Some(pivot);
			}
			Greater => v = left,
			// If mid == index, then we're done, since partition() guaranteed that all elements
			// after mid are greater than or equal to mid.
			Equal => return,
		}
	}
}

/// Selection algorithm to select the k-th element from the span in guaranteed O(n) time.
/// This is essentially a quickselect that uses Tukey's Ninther for pivot selection
fn median_of_medians<A, F>(mut v: Span<'_, A>, is_less: &mut F, mut k: usize)
where
	A: RandomAccessor,
	F: FnMut(&A::Value, &A::Value) -> bool,
{
	// Since this function isn't public, it should never be called with an out-of-bounds index.
	debug_assert!(k < v.len());

	loop {
		let len = v.len();

		if len <= MAX_INSERTION {
			if len >= 2 {
				insertion_sort_shift_left(v, 1, is_less);
			}
			return;
		}

		// `median_of_{minima,maxima}` can't handle the extreme cases of the first/last element,
		// so we catch them here and just do a linear search.
		if k == len - 1 {
			let max = max_index(&v, is_less);
			v.swap(max, k);
			return;
		} else if k == 0 {
			let min = min_index(&v, is_less);
			v.swap(min, k);
			return;
		}

		let p = median_of_ninthers(v.view_mut(), is_less);

		match p.cmp(&k) {
			Equal => return,
			Greater => {
				let (left, _) = v.split_at(p);
				v = left;
			}
			Less => {
				// Since `p < k < len`, `p + 1` doesn't overflow and is a valid index into the span.
				let (_, right) = v.split_at(p + 1);
				v = right;
				k -= p + 1;
			}
		}
	}
}

// Optimized for when `k` lies somewhere in the middle of the span. Selects a pivot as close as
// possible to the median of the span. For more details on how the algorithm operates, refer to the
// paper <https://drops.dagstuhl.de/opus/volltexte/2017/7612/pdf/LIPIcs-SEA-2017-24.pdf>.
fn median_of_ninthers<A, F>(mut v: Span<'_, A>, is_less: &mut F) -> usize
where
	A: RandomAccessor,
	F: FnMut(&A::Value, &A::Value) -> bool,
{
	let len = v.len();
	// use `saturating_mul` so the multiplication doesn't overflow on 16-bit platforms.
	let frac = if len <= 1024 {
		len / 12
	} else if len <= 128_usize.saturating_mul(1024) {
		len / 64
	} else {
		len / 1024
	};

	let pivot = frac / 2;
	let lo = len / 2 - pivot;
	let hi = frac + lo;
	let gap = (len - 9 * frac) / 4;
	let mut a = lo - 4 * frac - gap;
	let mut b = hi + gap;
	for i in lo..hi {
		ninther(
			v.view_mut(),
			is_less,
			[a, i - frac, b, a + 1, i, b + 1, a + 2, i + frac, b + 2],
		);
		a += 3;
		b += 3;
	}

	median_of_medians(v.slice_mut(lo..lo + frac), is_less, pivot);
	partition(v, lo + pivot, is_less).0
}

/// Moves around the 9 elements at the indices a..i, such that `v[e]` contains the median of the 9
/// elements and the other elements are partitioned around it.
fn ninther<A, F>(mut v: Span<'_, A>, is_less: &mut F, n: [usize; 9])
where
	A: RandomAccessor,
	F: FnMut(&A::Value, &A::Value) -> bool,
{
	let [a, mut b, c, mut d, e, mut f, g, mut h, i] = n;
	b = median_idx(&v, is_less, a, b, c);
	h = median_idx(&v, is_less, g, h, i);
	if is_less(&v.get(h), &v.get(b)) {
		mem::swap(&mut b, &mut h);
	}
	if is_less(&v.get(f), &v.get(d)) {
		mem::swap(&mut d, &mut f);
	}
	if is_less(&v.get(e), &v.get(d)) {
		// do nothing
	} else if is_less(&v.get(f), &v.get(e)) {
		d = f;
	} else {
		if is_less(&v.get(e), &v.get(b)) {
			v.swap(e, b);
		} else if is_less(&v.get(h), &v.get(e)) {
			v.swap(e, h);
		}
		return;
	}
	if is_less(&v.get(d), &v.get(b)) {
		d = b;
	} else if is_less(&v.get(h), &v.get(d)) {
		d = h;
	}

	v.swap(d, e);
}

/// Returns the index pointing to the median of the 3 elements `v[a]`, `v[b]` and `v[c]`.
fn median_idx<A, F>(v: &Span<'_, A>, is_less: &mut F, mut a: usize, b: usize, mut c: usize) -> usize
where
	A: RandomAccessor,
	F: FnMut(&A::Value, &A::Value) -> bool,
{
	if is_less(&v.get(c), &v.get(a)) {
		mem::swap(&mut a, &mut c);
	}
	if is_less(&v.get(c), &v.get(b)) {
		return c;
	}
	if is_less(&v.get(b), &v.get(a)) {
		return a;
	}
	b
}

/// Partitions `v` into elements equal to `v[pivot]` followed by elements greater than `v[pivot]`.
///
/// Returns the number of elements equal to the pivot. It is assumed that `v` does not contain
/// elements smaller than the pivot.
pub(crate) fn partition_equal<A, F>(mut v: Span<'_, A>, pivot: usize, is_less: &mut F) -> usize
where
	A: RandomAccessor,
	F: FnMut(&A::Value, &A::Value) -> bool,
{
	// Place the pivot at the beginning of span and keep a copy of it. The slot itself is left
	// untouched below.
	v.swap(0, pivot);
	let pivot = v.get(0);
	let (_, mut v) = v.split_at(1);

	// Now partition the span.
	let mut l = 0;
	let mut r = v.len();
	if r == 0 {
		return 1;
	}
	loop {
		// SAFETY: `l < r <= len` is checked before every access.
		unsafe {
			// Find the first element greater than the pivot.
			while l < r && !is_less(&pivot, &v.uget(l)) {
				l += 1;
			}

			// Find the last element equal to the pivot.
			loop {
				r -= 1;
				if l >= r || !is_less(&pivot, &v.uget(r)) {
					break;
				}
			}

			// Are we done?
			if l >= r {
				break;
			}

			// Swap the found pair of out-of-order elements.
			v.uswap(l, r);
			l += 1;
		}
	}

	// We found `l` elements equal to the pivot. Add 1 to account for the pivot itself.
	l + 1
}

/// Partitions `v` into elements smaller than `v[pivot]`, followed by elements greater than or
/// equal to `v[pivot]`.
///
/// Returns a tuple of:
///
/// 1. Number of elements smaller than `v[pivot]`.
/// 2. True if `v` was already partitioned.
pub(crate) fn partition<A, F>(mut v: Span<'_, A>, pivot: usize, is_less: &mut F) -> (usize, bool)
where
	A: RandomAccessor,
	F: FnMut(&A::Value, &A::Value) -> bool,
{
	// Place the pivot at the beginning of span and keep a copy of it.
	v.swap(0, pivot);
	let pivot = v.get(0);

	let (mid, was_partitioned) = {
		let (_, mut w) = v.view_mut().split_at(1);

		// Find the first pair of out-of-order elements.
		let mut l = 0;
		let mut r = w.len();

		// SAFETY: `l < r <= len` is checked before every access.
		unsafe {
			// Find the first element greater than or equal to the pivot.
			while l < r && is_less(&w.uget(l), &pivot) {
				l += 1;
			}

			// Find the last element smaller that the pivot.
			while l < r && !is_less(&w.uget(r - 1), &pivot) {
				r -= 1;
			}
		}

		(
			l + partition_in_place(w.slice_mut(l..r), &pivot, is_less),
			l >= r,
		)
	};

	// Place the pivot between the two partitions.
	v.swap(0, mid);

	(mid, was_partitioned)
}

/// Partitions `v` into elements smaller than `pivot`, followed by elements greater than or equal
/// to `pivot`.
///
/// Returns the number of elements smaller than `pivot`.
fn partition_in_place<A, F>(mut v: Span<'_, A>, pivot: &A::Value, is_less: &mut F) -> usize
where
	A: RandomAccessor,
	F: FnMut(&A::Value, &A::Value) -> bool,
{
	let mut l = 0;
	let mut r = v.len();
	loop {
		// SAFETY: `l < r <= len` is checked before every access.
		unsafe {
			while l < r && is_less(&v.uget(l), pivot) {
				l += 1;
			}
			while l < r && !is_less(&v.uget(r - 1), pivot) {
				r -= 1;
			}
			if l >= r {
				break;
			}

			// `v[l]` belongs right and `v[r - 1]` belongs left.
			r -= 1;
			v.uswap(l, r);
			l += 1;
		}
	}
	l
}

/// Scatters some elements around in an attempt to break patterns that might cause imbalanced
/// partitions in quicksort.
#[cold]
pub(crate) fn break_patterns<A: RandomAccessor>(mut v: Span<'_, A>) {
	let len = v.len();
	if len >= 8 {
		let mut seed = len;
		let mut gen_usize = || {
			// Pseudorandom number generator from the "Xorshift RNGs" paper by George Marsaglia.
			if usize::BITS <= 32 {
				let mut random = seed as u32;
				random ^= random << 13;
				random ^= random >> 17;
				random ^= random << 5;
				seed = random as usize;
			} else {
				let mut random = seed as u64;
				random ^= random << 13;
				random ^= random >> 7;
				random ^= random << 17;
				seed = random as usize;
			}
			seed
		};

		// Take random numbers modulo this number. The number fits into `usize` because `len` is not
		// greater than `isize::MAX`.
		let modulus = len.next_power_of_two();

		// Some pivot candidates will be in the nearby of this index. Let's randomize them.
		let pos = len / 4 * 2;

		for i in 0..3 {
			// Generate a random number modulo `len`. However, in order to avoid costly operations
			// we first take it modulo a power of two, and then decrease by `len` until it fits
			// into the range `[0, len - 1]`.
			let mut other = gen_usize() & (modulus - 1);

			// `other` is guaranteed to be less than `2 * len`.
			if other >= len {
				other -= len;
			}

			v.swap(pos - 1 + i, other);
		}
	}
}

/// Chooses a pivot in `v` and returns the index and `true` if the span is likely already sorted.
///
/// Elements in `v` might be reordered in the process.
pub(crate) fn choose_pivot<A, F>(mut v: Span<'_, A>, is_less: &mut F) -> (usize, bool)
where
	A: RandomAccessor,
	F: FnMut(&A::Value, &A::Value) -> bool,
{
	// Minimum length to choose the median-of-medians method.
	// Shorter spans use the simple median-of-three method.
	const SHORTEST_MEDIAN_OF_MEDIANS: usize = 50;
	// Maximum number of swaps that can be performed in this function.
	const MAX_SWAPS: usize = 4 * 3;

	let len = v.len();

	// Three indices near which we are going to choose a pivot.
	let mut a = len / 4;
	let mut b = len / 4 * 2;
	let mut c = len / 4 * 3;

	// Counts the total number of swaps we are about to perform while sorting indices.
	let mut swaps = 0;

	if len >= 8 {
		let w = &v;
		// Swaps indices so that `v[a] <= v[b]`.
		// SAFETY: `len >= 8` so there are at least two elements in the neighborhoods of `a`, `b`
		// and `c`. This means the three calls to `sort_adjacent` result in corresponding calls to
		// `sort3` with valid 3-item neighborhoods around each index.
		let mut sort2 = |a: &mut usize, b: &mut usize| unsafe {
			if is_less(&w.uget(*b), &w.uget(*a)) {
				mem::swap(a, b);
				swaps += 1;
			}
		};

		// Swaps indices so that `v[a] <= v[b] <= v[c]`.
		let mut sort3 = |a: &mut usize, b: &mut usize, c: &mut usize| {
			sort2(a, b);
			sort2(b, c);
			sort2(a, b);
		};

		if len >= SHORTEST_MEDIAN_OF_MEDIANS {
			// Finds the median of `v[a - 1], v[a], v[a + 1]` and stores the index into `a`.
			let mut sort_adjacent = |a: &mut usize| {
				let tmp = *a;
				sort3(&mut (tmp - 1), a, &mut (tmp + 1));
			};

			// Find medians in the neighborhoods of `a`, `b`, and `c`.
			sort_adjacent(&mut a);
			sort_adjacent(&mut b);
			sort_adjacent(&mut c);
		}

		// Find the median among `a`, `b`, and `c`.
		sort3(&mut a, &mut b, &mut c);
	}

	if swaps < MAX_SWAPS {
		(b, swaps == 0)
	} else {
		// The maximum number of swaps was performed. Chances are the span is descending or mostly
		// descending, so reversing will probably help sort it faster.
		v.reverse();
		(len - 1 - b, true)
	}
}

#[cfg(feature = "std")]
#[cfg(test)]
mod test {
	use super::{partition, partition_at_index, partition_equal};
	use crate::{accessor::Proxy, span::Span};
	use ndarray::{Array1, Array2, arr1};
	use quickcheck::TestResult;
	use quickcheck_macros::quickcheck;

	#[quickcheck]
	fn at_index(xs: Vec<u32>, index: usize) -> TestResult {
		if xs.is_empty() {
			return TestResult::discard();
		}
		let index = index % xs.len();
		let mut sorted = xs.clone();
		sorted.sort();
		let mut array = arr1(&xs);
		let (left, value, right) =
			partition_at_index(Span::from_view(&mut array), index, &mut u32::lt);
		let value = value.get();
		assert_eq!(value, sorted[index]);
		assert_eq!(left.len(), index);
		for i in 0..left.len() {
			assert!(left.get(i) <= value);
		}
		for i in 0..right.len() {
			assert!(value <= right.get(i));
		}
		TestResult::passed()
	}

	#[test]
	fn at_index_many_duplicates() {
		let xs = (0..1000u32).map(|x| x % 3).collect::<Vec<_>>();
		let mut matrix = Array2::from_shape_fn((1000, 3), |(i, _)| xs[i]);
		let mut column = matrix.column_mut(1);
		for index in [0, 1, 332, 333, 334, 500, 998, 999] {
			let (_, value, _) =
				partition_at_index(Span::from_view(&mut column), index, &mut u32::lt);
			assert_eq!(value.get(), index as u32 / 334);
		}
		assert_eq!(matrix.column(0).to_vec(), xs);
	}

	#[quickcheck]
	fn partitioned(xs: Vec<u32>, pivot: usize) -> TestResult {
		if xs.is_empty() {
			return TestResult::discard();
		}
		let pivot = xs[pivot % xs.len()];
		let position = xs.iter().position(|&x| x == pivot).unwrap_or(0);
		let mut array = Array1::from_vec(xs);
		let (mid, _) = partition(Span::from_view(&mut array), position, &mut u32::lt);
		assert_eq!(array[mid], pivot);
		assert!(array.iter().take(mid).all(|&x| x < pivot));
		assert!(array.iter().skip(mid).all(|&x| x >= pivot));
		TestResult::passed()
	}

	#[test]
	fn partitioned_equal() {
		let mut array = arr1(&[2, 5, 2, 7, 2, 2, 9]);
		let mid = partition_equal(Span::from_view(&mut array), 2, &mut i32::lt);
		assert_eq!(mid, 4);
		assert!(array.iter().take(mid).all(|&x| x == 2));
		assert!(array.iter().skip(mid).all(|&x| x > 2));
	}
}
