//! Bounded range of a [`RandomAccessor`], the unit the sorting and selection algorithms work on.

#[cfg(feature = "alloc")]
use crate::stable_sort::stable_sort;
use crate::{
	accessor::{Proxy, RandomAccessor, StridedAccessor},
	heap_sort::partial_sort,
	partition::partition_at_index,
	quick_sort::quick_sort,
};
use core::{
	cmp::Ordering::{self, Less},
	fmt,
	marker::PhantomData,
	ops::{Bound, RangeBounds},
};
use ndarray::{ArrayBase, DataMut, Ix1};

/// The `len` elements starting at a cursor, borrowed mutably for `'s`.
///
/// Every position in `0..len` is a valid element. Safe methods check indices against `len` and
/// panic when out of bounds, methods prefixed with `u` do not.
pub struct Span<'s, A> {
	begin: A,
	len: usize,
	marker: PhantomData<&'s mut ()>,
}

impl<A: fmt::Debug> fmt::Debug for Span<'_, A> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Span")
			.field("begin", &self.begin)
			.field("len", &self.len)
			.finish()
	}
}

impl<'s, T: Copy> Span<'s, StridedAccessor<'s, T>> {
	/// Creates a span over all elements of `view`.
	pub fn from_view<S>(view: &'s mut ArrayBase<S, Ix1>) -> Self
	where
		S: DataMut<Elem = T>,
	{
		let len = view.len();
		// SAFETY: The cursor starts at the first element of a view of length `len`.
		unsafe { Self::new(StridedAccessor::from_view(view), len) }
	}
}

impl<'s, A: RandomAccessor> Span<'s, A> {
	/// Creates a span of `len` elements starting at `begin`.
	///
	/// # Safety
	///
	/// `begin + i` must be a valid element for every `i` in `0..len` during `'s`, and no other
	/// span over these elements may be used during `'s`.
	#[inline]
	pub unsafe fn new(begin: A, len: usize) -> Self {
		Self {
			begin,
			len,
			marker: PhantomData,
		}
	}

	/// Number of elements.
	#[inline]
	pub fn len(&self) -> usize {
		self.len
	}

	/// Returns `true` if the span has no elements.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Cursor at the first element.
	#[inline]
	pub fn begin(&self) -> A {
		self.begin
	}

	/// Cursor one past the last element.
	#[inline]
	pub fn end(&self) -> A {
		self.begin + self.len as isize
	}

	#[inline]
	pub(crate) fn cursor(&self, index: usize) -> A {
		self.begin + index as isize
	}

	/// Returns a proxy for the element at `index`.
	///
	/// # Panics
	///
	/// Panics if `index` is out of bounds.
	#[inline]
	pub fn at(&mut self, index: usize) -> A::Reference {
		self.check(index);
		// SAFETY: Checked above.
		unsafe { self.uat(index) }
	}

	/// Returns a proxy for the element at `index` without bounds checking.
	///
	/// # Safety
	///
	/// `index` must be less than [`len`](Span::len).
	#[inline]
	pub unsafe fn uat(&mut self, index: usize) -> A::Reference {
		// SAFETY: Guaranteed by the caller.
		unsafe { self.begin.proxy_at(index as isize) }
	}

	/// Copies out the element at `index`.
	///
	/// # Panics
	///
	/// Panics if `index` is out of bounds.
	#[inline]
	pub fn get(&self, index: usize) -> A::Value {
		self.check(index);
		// SAFETY: Checked above.
		unsafe { self.uget(index) }
	}

	/// Copies out the element at `index` without bounds checking.
	///
	/// # Safety
	///
	/// `index` must be less than [`len`](Span::len).
	#[inline]
	pub unsafe fn uget(&self, index: usize) -> A::Value {
		// SAFETY: Guaranteed by the caller.
		unsafe { self.begin.proxy_at(index as isize).get() }
	}

	/// Overwrites the element at `index`.
	///
	/// # Panics
	///
	/// Panics if `index` is out of bounds.
	#[inline]
	pub fn set(&mut self, index: usize, value: A::Value) {
		self.at(index).set(value);
	}

	/// Overwrites the element at `index` without bounds checking.
	///
	/// # Safety
	///
	/// `index` must be less than [`len`](Span::len).
	#[inline]
	pub unsafe fn uset(&mut self, index: usize, value: A::Value) {
		// SAFETY: Guaranteed by the caller.
		unsafe { self.uat(index) }.set(value);
	}

	/// Swaps the elements at `a` and `b`.
	///
	/// # Panics
	///
	/// Panics if `a` or `b` are out of bounds.
	#[inline]
	pub fn swap(&mut self, a: usize, b: usize) {
		self.check(a);
		self.check(b);
		// SAFETY: Checked above.
		unsafe { self.uswap(a, b) }
	}

	/// Swaps the elements at `a` and `b` without bounds checking.
	///
	/// # Safety
	///
	/// `a` and `b` must be less than [`len`](Span::len).
	#[inline]
	pub unsafe fn uswap(&mut self, a: usize, b: usize) {
		// SAFETY: Guaranteed by the caller.
		let (a, b) = unsafe { (self.uat(a), self.uat(b)) };
		a.swap(b);
	}

	/// Reborrows the span.
	#[inline]
	pub fn view_mut(&mut self) -> Span<'_, A> {
		Span {
			begin: self.begin,
			len: self.len,
			marker: PhantomData,
		}
	}

	/// Divides the span into `..mid` and `mid..`.
	///
	/// # Panics
	///
	/// Panics if `mid > len`.
	#[inline]
	pub fn split_at(self, mid: usize) -> (Self, Self) {
		assert!(
			mid <= self.len,
			"split index {mid} out of bounds for span of length {}",
			self.len
		);
		let right = Span {
			begin: self.cursor(mid),
			len: self.len - mid,
			marker: PhantomData,
		};
		let left = Span {
			begin: self.begin,
			len: mid,
			marker: PhantomData,
		};
		(left, right)
	}

	/// Reborrows the elements in `range`.
	///
	/// # Panics
	///
	/// Panics if `range` is out of bounds.
	pub fn slice_mut<R>(&mut self, range: R) -> Span<'_, A>
	where
		R: RangeBounds<usize>,
	{
		let start = match range.start_bound() {
			Bound::Included(&start) => start,
			Bound::Excluded(&start) => start + 1,
			Bound::Unbounded => 0,
		};
		let end = match range.end_bound() {
			Bound::Included(&end) => end + 1,
			Bound::Excluded(&end) => end,
			Bound::Unbounded => self.len,
		};
		assert!(
			start <= end && end <= self.len,
			"range {start}..{end} out of bounds for span of length {}",
			self.len
		);
		Span {
			begin: self.cursor(start),
			len: end - start,
			marker: PhantomData,
		}
	}

	/// Reverses the order of elements in place.
	pub fn reverse(&mut self) {
		let len = self.len;
		for i in 0..len / 2 {
			// SAFETY: `i < len / 2` so both `i` and `len - 1 - i` are in bounds.
			unsafe { self.uswap(i, len - 1 - i) };
		}
	}

	/// Sorts the span with a comparator function.
	///
	/// This sort is stable and *O*(*n* log *n*) worst-case. It allocates temporary storage for
	/// half the span.
	#[cfg(feature = "alloc")]
	#[inline]
	pub fn sort_by<F>(&mut self, mut compare: F)
	where
		F: FnMut(&A::Value, &A::Value) -> Ordering,
	{
		stable_sort(self.view_mut(), |a: &A::Value, b: &A::Value| {
			compare(a, b) == Less
		});
	}

	/// Sorts the span with a comparator function, but might not preserve the order of equal
	/// elements.
	///
	/// This sort is unstable, in-place and *O*(*n* log *n*) worst-case.
	#[inline]
	pub fn sort_unstable_by<F>(&mut self, mut compare: F)
	where
		F: FnMut(&A::Value, &A::Value) -> Ordering,
	{
		quick_sort(self.view_mut(), |a: &A::Value, b: &A::Value| {
			compare(a, b) == Less
		});
	}

	/// Rearranges the span such that `..mid` holds its `mid` least elements in sorted order.
	///
	/// The order of the remaining elements is unspecified. This is *O*(*n* log *mid*) worst-case.
	///
	/// # Panics
	///
	/// Panics if `mid > len`.
	#[inline]
	pub fn partial_sort_by<F>(&mut self, mid: usize, mut compare: F)
	where
		F: FnMut(&A::Value, &A::Value) -> Ordering,
	{
		partial_sort(self.view_mut(), mid, &mut |a: &A::Value, b: &A::Value| {
			compare(a, b) == Less
		});
	}

	/// Reorders the span such that the element at `index` is at its final sorted position.
	///
	/// Returns the elements before `index`, a proxy for the element at `index` and the elements
	/// after `index`. No element before `index` is greater and no element after it is less.
	///
	/// # Panics
	///
	/// Panics if `index >= len`.
	#[inline]
	pub fn select_nth_unstable_by<F>(
		&mut self,
		index: usize,
		mut compare: F,
	) -> (Span<'_, A>, A::Reference, Span<'_, A>)
	where
		F: FnMut(&A::Value, &A::Value) -> Ordering,
	{
		partition_at_index(self.view_mut(), index, &mut |a: &A::Value, b: &A::Value| {
			compare(a, b) == Less
		})
	}

	#[inline]
	fn check(&self, index: usize) {
		assert!(
			index < self.len,
			"index {index} out of bounds for span of length {}",
			self.len
		);
	}
}

#[cfg(feature = "std")]
#[cfg(test)]
mod test {
	use super::Span;
	use crate::accessor::Proxy;
	use ndarray::{Array1, arr1, arr2, s};
	use quickcheck::TestResult;
	use quickcheck_macros::quickcheck;

	#[test]
	fn strided_slicing() {
		let mut matrix = arr2(&[[1, 2], [3, 4], [5, 6], [7, 8]]);
		let mut column = matrix.column_mut(0);
		let mut span = Span::from_view(&mut column);
		assert_eq!(span.end() - span.begin(), 4);
		{
			let mut middle = span.slice_mut(1..=2);
			assert_eq!(middle.len(), 2);
			middle.reverse();
		}
		let (mut left, right) = span.split_at(1);
		left.set(0, right.get(2));
		assert_eq!(matrix, arr2(&[[7, 2], [5, 4], [3, 6], [7, 8]]));
	}

	#[test]
	#[should_panic(expected = "out of bounds")]
	fn out_of_bounds() {
		let mut array = arr1(&[1, 2, 3]);
		let mut span = Span::from_view(&mut array);
		span.swap(0, 3);
	}

	#[quickcheck]
	fn reversed(xs: Vec<i32>) {
		let mut array = Array1::from_vec(xs.clone());
		let mut view = array.slice_mut(s![..;-1]);
		Span::from_view(&mut view).reverse();
		let mut expected = xs;
		expected.reverse();
		assert_eq!(array.slice(s![..;-1]).to_vec(), expected);
	}

	#[quickcheck]
	fn sorted_by(xs: Vec<i32>) {
		let mut expected = xs.clone();
		expected.sort();
		let mut array = Array1::from_vec(xs.clone());
		Span::from_view(&mut array).sort_by(|a, b| a.cmp(b));
		assert_eq!(array.to_vec(), expected);
		let mut array = Array1::from_vec(xs);
		Span::from_view(&mut array).sort_unstable_by(|a, b| b.cmp(a));
		expected.reverse();
		assert_eq!(array.to_vec(), expected);
	}

	#[quickcheck]
	fn partially_sorted(xs: Vec<i32>, mid: usize) {
		let mid = mid % (xs.len() + 1);
		let mut expected = xs.clone();
		expected.sort();
		let mut array = Array1::from_vec(xs);
		Span::from_view(&mut array).partial_sort_by(mid, |a, b| a.cmp(b));
		assert_eq!(array.slice(s![..mid]).to_vec(), expected[..mid]);
	}

	#[quickcheck]
	fn selected(xs: Vec<i32>, index: usize) -> TestResult {
		if xs.is_empty() {
			return TestResult::discard();
		}
		let index = index % xs.len();
		let mut expected = xs.clone();
		expected.sort();
		let mut array = Array1::from_vec(xs);
		let mut span = Span::from_view(&mut array);
		let (left, nth, right) = span.select_nth_unstable_by(index, |a, b| a.cmp(b));
		assert_eq!(nth.get(), expected[index]);
		for i in 0..left.len() {
			assert!(left.get(i) <= nth.get());
		}
		for i in 0..right.len() {
			assert!(right.get(i) >= nth.get());
		}
		TestResult::passed()
	}
}
