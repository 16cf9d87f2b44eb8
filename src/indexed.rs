//! Composite cursor moving a value stream and an index stream in lockstep.

use crate::{
	accessor::{Proxy, RandomAccessor, StridedAccessor},
	span::Span,
};
use core::{
	cmp::Ordering,
	ops::{Add, AddAssign, Sub, SubAssign},
};
use ndarray::{ArrayBase, DataMut, Ix1};

/// Cursor over two streams advanced together.
///
/// Every movement is applied to both streams. Distance, equality and ordering are measured on the
/// value stream only, as both streams are always offset identically. Dereferencing yields a
/// [`PairRef`], so generic algorithms that swap through the cursor rearrange both streams.
#[derive(Clone, Copy, Debug)]
pub struct IndexedAccessor<V, I> {
	values: V,
	indices: I,
}

/// [`IndexedAccessor`] over a strided value stream and a strided `i64` index stream.
pub type ValueIndexAccessor<'a, T> = IndexedAccessor<StridedAccessor<'a, T>, StridedAccessor<'a, i64>>;

impl<V, I> IndexedAccessor<V, I>
where
	V: RandomAccessor,
	I: RandomAccessor,
{
	/// Combines a value cursor and an index cursor positioned at the same logical element.
	#[inline]
	pub const fn new(values: V, indices: I) -> Self {
		Self { values, indices }
	}

	/// Cursor of the value stream.
	#[inline]
	pub fn values(&self) -> V {
		self.values
	}

	/// Cursor of the index stream.
	#[inline]
	pub fn indices(&self) -> I {
		self.indices
	}

	/// Splits into the value and the index cursor.
	#[inline]
	pub fn into_parts(self) -> (V, I) {
		(self.values, self.indices)
	}

	/// Moves both cursors one element forward.
	#[inline]
	pub fn inc(&mut self) -> &mut Self {
		*self += 1;
		self
	}

	/// Moves both cursors one element backward.
	#[inline]
	pub fn dec(&mut self) -> &mut Self {
		*self -= 1;
		self
	}

	/// Moves both cursors one element forward and returns the previous position.
	#[inline]
	pub fn post_inc(&mut self) -> Self {
		let copy = *self;
		self.inc();
		copy
	}

	/// Moves both cursors one element backward and returns the previous position.
	#[inline]
	pub fn post_dec(&mut self) -> Self {
		let copy = *self;
		self.dec();
		copy
	}
}

impl<'a, T> ValueIndexAccessor<'a, T> {
	/// Creates a cursor from raw pointers and element strides of both streams.
	#[inline]
	pub const fn from_raw_parts(
		values: *mut T,
		value_stride: isize,
		indices: *mut i64,
		index_stride: isize,
	) -> Self {
		Self {
			values: StridedAccessor::new(values, value_stride),
			indices: StridedAccessor::new(indices, index_stride),
		}
	}
}

impl<V, I> Add<isize> for IndexedAccessor<V, I>
where
	V: RandomAccessor,
	I: RandomAccessor,
{
	type Output = Self;

	#[inline]
	fn add(self, offset: isize) -> Self {
		Self::new(self.values + offset, self.indices + offset)
	}
}

impl<V, I> AddAssign<isize> for IndexedAccessor<V, I>
where
	V: RandomAccessor,
	I: RandomAccessor,
{
	#[inline]
	fn add_assign(&mut self, offset: isize) {
		self.values += offset;
		self.indices += offset;
	}
}

impl<V, I> Sub<isize> for IndexedAccessor<V, I>
where
	V: RandomAccessor,
	I: RandomAccessor,
{
	type Output = Self;

	#[inline]
	fn sub(self, offset: isize) -> Self {
		Self::new(self.values - offset, self.indices - offset)
	}
}

impl<V, I> SubAssign<isize> for IndexedAccessor<V, I>
where
	V: RandomAccessor,
	I: RandomAccessor,
{
	#[inline]
	fn sub_assign(&mut self, offset: isize) {
		self.values -= offset;
		self.indices -= offset;
	}
}

impl<V, I> Sub for IndexedAccessor<V, I>
where
	V: RandomAccessor,
	I: RandomAccessor,
{
	type Output = isize;

	#[inline]
	fn sub(self, origin: Self) -> isize {
		self.values - origin.values
	}
}

impl<V: RandomAccessor, I> PartialEq for IndexedAccessor<V, I> {
	#[inline]
	fn eq(&self, other: &Self) -> bool {
		self.values == other.values
	}
}

impl<V: RandomAccessor, I> Eq for IndexedAccessor<V, I> {}

impl<V: RandomAccessor, I> PartialOrd for IndexedAccessor<V, I> {
	#[inline]
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl<V: RandomAccessor, I> Ord for IndexedAccessor<V, I> {
	#[inline]
	fn cmp(&self, other: &Self) -> Ordering {
		self.values.cmp(&other.values)
	}
}

impl<V, I> RandomAccessor for IndexedAccessor<V, I>
where
	V: RandomAccessor,
	I: RandomAccessor,
{
	type Value = (V::Value, I::Value);
	type Reference = PairRef<V::Reference, I::Reference>;

	#[inline]
	unsafe fn proxy(self) -> Self::Reference {
		// SAFETY: Both streams are offset identically, so the caller's guarantee covers both.
		unsafe {
			PairRef {
				value: self.values.proxy(),
				index: self.indices.proxy(),
			}
		}
	}
}

/// [`Proxy`] for the `(value, index)` pair at one position of an [`IndexedAccessor`].
///
/// Holds a proxy into each stream. Reading copies both fields out, writing stores both and
/// swapping exchanges both slots of two positions.
#[derive(Debug)]
pub struct PairRef<V, I> {
	value: V,
	index: I,
}

impl<V: Proxy, I: Proxy> PairRef<V, I> {
	/// Proxy of the value slot.
	#[inline]
	pub fn value(&self) -> &V {
		&self.value
	}

	/// Proxy of the index slot.
	#[inline]
	pub fn index(&self) -> &I {
		&self.index
	}

	/// Splits into the proxies of both slots.
	#[inline]
	pub fn into_parts(self) -> (V, I) {
		(self.value, self.index)
	}
}

impl<V: Proxy, I: Proxy> Proxy for PairRef<V, I> {
	type Value = (V::Value, I::Value);

	#[inline]
	fn get(&self) -> Self::Value {
		(self.value.get(), self.index.get())
	}

	#[inline]
	fn set(&mut self, (value, index): Self::Value) {
		self.value.set(value);
		self.index.set(index);
	}

	#[inline]
	fn swap(self, other: Self) {
		self.value.swap(other.value);
		self.index.swap(other.index);
	}
}

impl<'s, T: Copy> Span<'s, ValueIndexAccessor<'s, T>> {
	/// Creates a span pairing `values` with `indices`.
	///
	/// # Panics
	///
	/// Panics if the views differ in length.
	pub fn from_views<S, SI>(
		values: &'s mut ArrayBase<S, Ix1>,
		indices: &'s mut ArrayBase<SI, Ix1>,
	) -> Self
	where
		S: DataMut<Elem = T>,
		SI: DataMut<Elem = i64>,
	{
		assert_eq!(
			values.len(),
			indices.len(),
			"values and indices differ in length"
		);
		let len = values.len();
		let begin = IndexedAccessor::new(
			StridedAccessor::from_view(values),
			StridedAccessor::from_view(indices),
		);
		// SAFETY: Both cursors start at the first element of views of length `len`.
		unsafe { Span::new(begin, len) }
	}
}

#[cfg(feature = "std")]
#[cfg(test)]
mod test {
	use super::{IndexedAccessor, ValueIndexAccessor};
	use crate::{
		accessor::{Proxy, RandomAccessor, StridedAccessor},
		span::Span,
	};
	use ndarray::{arr1, arr2, s};

	#[test]
	fn lockstep() {
		let mut values = arr2(&[[1.0, 9.0], [2.0, 8.0], [3.0, 7.0]]);
		let mut indices = arr1(&[0i64, 1, 2, 3, 4, 5]);
		let mut column = values.column_mut(1);
		let mut every_other = indices.slice_mut(s![..;2]);
		let begin = IndexedAccessor::new(
			StridedAccessor::from_view(&mut column),
			StridedAccessor::from_view(&mut every_other),
		);
		let mut cursor = begin;
		cursor.inc();
		assert_eq!(cursor - begin, 1);
		// SAFETY: Positions 0..3 are in bounds of both views.
		unsafe {
			assert_eq!(cursor.proxy().get(), (8.0, 2));
			assert_eq!(cursor.post_inc().proxy().get(), (8.0, 2));
			assert_eq!(cursor.proxy().get(), (7.0, 4));
			assert_eq!(begin.proxy_at(2).get(), (7.0, 4));
			cursor.dec();
			assert_eq!(cursor.post_dec().proxy().get(), (8.0, 2));
		}
		assert_eq!(cursor, begin);
		assert!(begin < begin + 2);
		assert_eq!((begin + 2 - 1).values(), (begin + 1).values());
		assert_eq!((begin + 2).indices() - begin.indices(), 2);
	}

	#[test]
	fn swap_exchanges_both_streams() {
		let mut values = arr1(&[5u8, 6, 7]);
		let mut indices = arr1(&[0i64, 1, 2]);
		let cursor = ValueIndexAccessor::from_raw_parts(
			values.as_mut_ptr(),
			1,
			indices.as_mut_ptr(),
			1,
		);
		// SAFETY: Positions 0..3 are in bounds of both arrays.
		unsafe {
			cursor.proxy().swap(cursor.proxy_at(2));
			cursor.proxy_at(1).swap(cursor.proxy_at(1));
			let mut middle = cursor.proxy_at(1);
			middle.set((60, 10));
			let (value, index) = middle.into_parts();
			assert_eq!((value.get(), index.get()), (60, 10));
		}
		assert_eq!(values, arr1(&[7, 60, 5]));
		assert_eq!(indices, arr1(&[2, 10, 0]));
	}

	#[test]
	fn span_from_views() {
		let mut values = arr1(&[3, 1, 2]);
		let mut indices = arr1(&[0i64, 1, 2]);
		let mut span = Span::from_views(&mut values, &mut indices);
		assert_eq!(span.len(), 3);
		span.swap(0, 1);
		assert_eq!(span.get(0), (1, 1));
		assert_eq!(span.get(1), (3, 0));
		let pair = span.at(2);
		assert_eq!(pair.value().get(), 2);
		assert_eq!(pair.index().get(), 2);
	}

	#[test]
	#[should_panic(expected = "differ in length")]
	fn span_from_views_mismatch() {
		let mut values = arr1(&[3, 1, 2]);
		let mut indices = arr1(&[0i64, 1]);
		let _ = Span::from_views(&mut values, &mut indices);
	}
}
