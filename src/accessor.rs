//! Random-access cursors over strided memory.
//!
//! A [`StridedAccessor`] addresses element `i` of a view as `ptr + i * stride`. Moving a cursor is
//! plain (wrapping) pointer arithmetic and therefore safe, dereferencing it is not: there is no
//! bounds checking, so every dereference is an `unsafe` operation whose caller guarantees that the
//! cursor points into the view it was created from.
//!
//! Generic algorithms do not dereference cursors into Rust references. They go through the
//! [`RandomAccessor`] trait, which hands out a fresh [`Proxy`] per access. A proxy reads, writes
//! and swaps the slot(s) it stands for, which lets composite cursors such as
//! [`IndexedAccessor`](crate::indexed::IndexedAccessor) move several streams at once.

use core::{
	cmp::Ordering,
	fmt,
	marker::PhantomData,
	mem,
	ops::{Add, AddAssign, Sub, SubAssign},
	ptr,
};
use ndarray::{ArrayBase, Data, DataMut, Ix1};

mod sealed {
	pub trait Sealed {}
}

/// Capability of an [`Accessor`], either [`ReadOnly`] or [`ReadWrite`].
pub trait Access: sealed::Sealed {}

/// Capability of a cursor that only reads.
#[derive(Debug)]
pub enum ReadOnly {}

/// Capability of a cursor that reads and writes.
#[derive(Debug)]
pub enum ReadWrite {}

impl sealed::Sealed for ReadOnly {}
impl sealed::Sealed for ReadWrite {}
impl Access for ReadOnly {}
impl Access for ReadWrite {}

/// Cursor over one strided stream of `T` with capability `M`.
///
/// Two accessors compare by raw address only. Comparing or subtracting accessors with different
/// strides yields meaningless results.
pub struct Accessor<'a, T, M: Access> {
	ptr: *mut T,
	stride: isize,
	marker: PhantomData<(&'a mut T, M)>,
}

/// Read-write cursor over one strided stream.
pub type StridedAccessor<'a, T> = Accessor<'a, T, ReadWrite>;

/// Read-only cursor over one strided stream.
pub type ConstStridedAccessor<'a, T> = Accessor<'a, T, ReadOnly>;

impl<'a, T, M: Access> Accessor<'a, T, M> {
	const fn from_raw(ptr: *mut T, stride: isize) -> Self {
		Self {
			ptr,
			stride,
			marker: PhantomData,
		}
	}

	/// Element stride of the cursor.
	#[inline]
	pub const fn stride(&self) -> isize {
		self.stride
	}

	/// Raw pointer to the current element.
	#[inline]
	pub const fn as_ptr(&self) -> *const T {
		self.ptr
	}

	/// Returns `true` for the null sentinel created by [`Default`].
	#[inline]
	pub fn is_null(&self) -> bool {
		self.ptr.is_null()
	}

	/// Returns a reference to the current element.
	///
	/// # Safety
	///
	/// The cursor must point to a valid element of the view it was created from.
	#[inline]
	pub unsafe fn get(&self) -> &'a T {
		// SAFETY: Guaranteed by the caller.
		unsafe { &*self.ptr }
	}

	/// Returns a reference to the element `idx` positions away without moving the cursor.
	///
	/// # Safety
	///
	/// `idx` positions away from the cursor must be a valid element of the view.
	#[inline]
	pub unsafe fn at(&self, idx: isize) -> &'a T {
		// SAFETY: Guaranteed by the caller.
		unsafe { &*self.ptr.offset(idx * self.stride) }
	}

	/// Moves the cursor one element forward.
	#[inline]
	pub fn inc(&mut self) -> &mut Self {
		self.ptr = self.ptr.wrapping_offset(self.stride);
		self
	}

	/// Moves the cursor one element backward.
	#[inline]
	pub fn dec(&mut self) -> &mut Self {
		self.ptr = self.ptr.wrapping_offset(self.stride.wrapping_neg());
		self
	}

	/// Moves the cursor one element forward and returns its previous position.
	#[inline]
	pub fn post_inc(&mut self) -> Self {
		let copy = *self;
		self.inc();
		copy
	}

	/// Moves the cursor one element backward and returns its previous position.
	#[inline]
	pub fn post_dec(&mut self) -> Self {
		let copy = *self;
		self.dec();
		copy
	}

	/// Signed distance in elements from `origin` to `self`.
	///
	/// # Panics
	///
	/// Panics if the stride is zero.
	#[inline]
	pub fn distance(&self, origin: &Self) -> isize {
		let unit = mem::size_of::<T>().max(1) as isize * self.stride;
		(self.ptr.addr() as isize).wrapping_sub(origin.ptr.addr() as isize) / unit
	}
}

impl<'a, T> Accessor<'a, T, ReadWrite> {
	/// Creates a cursor at `ptr` advancing by `stride` elements.
	#[inline]
	pub const fn new(ptr: *mut T, stride: isize) -> Self {
		Self::from_raw(ptr, stride)
	}

	/// Creates a cursor at `ptr` over contiguous elements.
	#[inline]
	pub const fn from_ptr(ptr: *mut T) -> Self {
		Self::from_raw(ptr, 1)
	}

	/// Creates a cursor at the first element of `view`.
	pub fn from_view<S>(view: &'a mut ArrayBase<S, Ix1>) -> Self
	where
		S: DataMut<Elem = T>,
	{
		let stride = normalized_stride(view.len(), view.strides()[0]);
		Self::from_raw(view.as_mut_ptr(), stride)
	}

	/// Raw mutable pointer to the current element.
	#[inline]
	pub const fn as_mut_ptr(&self) -> *mut T {
		self.ptr
	}

	/// Returns a mutable reference to the current element.
	///
	/// # Safety
	///
	/// The cursor must point to a valid element of the view it was created from and no other
	/// reference to that element may be alive.
	#[inline]
	pub unsafe fn get_mut(&self) -> &'a mut T {
		// SAFETY: Guaranteed by the caller.
		unsafe { &mut *self.ptr }
	}

	/// Returns a mutable reference to the element `idx` positions away without moving the cursor.
	///
	/// # Safety
	///
	/// `idx` positions away from the cursor must be a valid element of the view and no other
	/// reference to that element may be alive.
	#[inline]
	pub unsafe fn at_mut(&self, idx: isize) -> &'a mut T {
		// SAFETY: Guaranteed by the caller.
		unsafe { &mut *self.ptr.offset(idx * self.stride) }
	}

	/// Downgrades to a read-only cursor at the same position.
	#[inline]
	pub const fn into_const(self) -> ConstStridedAccessor<'a, T> {
		Accessor::from_raw(self.ptr, self.stride)
	}
}

impl<'a, T> Accessor<'a, T, ReadOnly> {
	/// Creates a read-only cursor at `ptr` advancing by `stride` elements.
	#[inline]
	pub const fn new(ptr: *const T, stride: isize) -> Self {
		Self::from_raw(ptr.cast_mut(), stride)
	}

	/// Creates a read-only cursor at `ptr` over contiguous elements.
	#[inline]
	pub const fn from_ptr(ptr: *const T) -> Self {
		Self::from_raw(ptr.cast_mut(), 1)
	}

	/// Creates a read-only cursor at the first element of `view`.
	pub fn from_view<S>(view: &'a ArrayBase<S, Ix1>) -> Self
	where
		S: Data<Elem = T>,
	{
		let stride = normalized_stride(view.len(), view.strides()[0]);
		Self::from_raw(view.as_ptr().cast_mut(), stride)
	}
}

// Views of up to one element may carry any stride, including zero.
fn normalized_stride(len: usize, stride: isize) -> isize {
	if len <= 1 { 1 } else { stride }
}

impl<T, M: Access> Default for Accessor<'_, T, M> {
	fn default() -> Self {
		Self::from_raw(ptr::null_mut(), 1)
	}
}

impl<T, M: Access> Clone for Accessor<'_, T, M> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<T, M: Access> Copy for Accessor<'_, T, M> {}

impl<T, M: Access> fmt::Debug for Accessor<'_, T, M> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Accessor")
			.field("ptr", &self.ptr)
			.field("stride", &self.stride)
			.finish()
	}
}

impl<T, M: Access> Add<isize> for Accessor<'_, T, M> {
	type Output = Self;

	#[inline]
	fn add(self, offset: isize) -> Self {
		Self::from_raw(
			self.ptr.wrapping_offset(offset.wrapping_mul(self.stride)),
			self.stride,
		)
	}
}

impl<'a, T, M: Access> Add<Accessor<'a, T, M>> for isize {
	type Output = Accessor<'a, T, M>;

	#[inline]
	fn add(self, accessor: Accessor<'a, T, M>) -> Self::Output {
		accessor + self
	}
}

impl<T, M: Access> AddAssign<isize> for Accessor<'_, T, M> {
	#[inline]
	fn add_assign(&mut self, offset: isize) {
		*self = *self + offset;
	}
}

impl<T, M: Access> Sub<isize> for Accessor<'_, T, M> {
	type Output = Self;

	#[inline]
	fn sub(self, offset: isize) -> Self {
		self + offset.wrapping_neg()
	}
}

impl<T, M: Access> SubAssign<isize> for Accessor<'_, T, M> {
	#[inline]
	fn sub_assign(&mut self, offset: isize) {
		*self = *self - offset;
	}
}

impl<T, M: Access> Sub for Accessor<'_, T, M> {
	type Output = isize;

	#[inline]
	fn sub(self, origin: Self) -> isize {
		self.distance(&origin)
	}
}

impl<T, M: Access> PartialEq for Accessor<'_, T, M> {
	#[inline]
	fn eq(&self, other: &Self) -> bool {
		ptr::eq(self.ptr, other.ptr)
	}
}

impl<T, M: Access> Eq for Accessor<'_, T, M> {}

impl<T, M: Access> PartialOrd for Accessor<'_, T, M> {
	#[inline]
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl<T, M: Access> Ord for Accessor<'_, T, M> {
	#[inline]
	fn cmp(&self, other: &Self) -> Ordering {
		self.ptr.cmp(&other.ptr)
	}
}

/// Stand-in for a reference to one logical element.
///
/// A proxy is created for a single access and refers to live slots, never to copies. Swapping two
/// proxies exchanges the contents of their slots, not the proxies themselves.
pub trait Proxy {
	/// Logical element type.
	type Value: Copy;

	/// Copies the element out.
	fn get(&self) -> Self::Value;

	/// Overwrites the element.
	fn set(&mut self, value: Self::Value);

	/// Exchanges the contents of the slots referred to by `self` and `other`.
	///
	/// Both proxies may refer to the same slots.
	fn swap(self, other: Self);
}

/// [`Proxy`] for one slot of a [`StridedAccessor`].
pub struct ElementRef<'a, T> {
	ptr: *mut T,
	marker: PhantomData<&'a mut T>,
}

impl<T> ElementRef<'_, T> {
	/// Raw pointer to the referenced slot.
	#[inline]
	pub const fn as_ptr(&self) -> *mut T {
		self.ptr
	}
}

impl<T> fmt::Debug for ElementRef<'_, T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("ElementRef").field(&self.ptr).finish()
	}
}

impl<T: Copy> Proxy for ElementRef<'_, T> {
	type Value = T;

	#[inline]
	fn get(&self) -> T {
		// SAFETY: Proxies are only created by `RandomAccessor::proxy` for valid slots.
		unsafe { ptr::read(self.ptr) }
	}

	#[inline]
	fn set(&mut self, value: T) {
		// SAFETY: Proxies are only created by `RandomAccessor::proxy` for valid slots.
		unsafe { ptr::write(self.ptr, value) }
	}

	#[inline]
	fn swap(self, other: Self) {
		// SAFETY: Both slots are valid and `ptr::swap` allows them to be the same.
		unsafe { ptr::swap(self.ptr, other.ptr) }
	}
}

/// Random-access cursor as consumed by the sorting and selection algorithms.
///
/// Moving a cursor is safe, producing a [`Proxy`] for its current position is not.
pub trait RandomAccessor:
	Copy
	+ Ord
	+ Add<isize, Output = Self>
	+ AddAssign<isize>
	+ Sub<isize, Output = Self>
	+ SubAssign<isize>
	+ Sub<Output = isize>
{
	/// Logical element type.
	type Value: Copy;
	/// Proxy type standing in for a reference to one logical element.
	type Reference: Proxy<Value = Self::Value>;

	/// Returns a proxy for the current element.
	///
	/// # Safety
	///
	/// The cursor must point to a valid element and the proxy must not outlive the view.
	unsafe fn proxy(self) -> Self::Reference;

	/// Returns a proxy for the element `idx` positions away without moving the cursor.
	///
	/// # Safety
	///
	/// See [`proxy`](RandomAccessor::proxy).
	#[inline]
	unsafe fn proxy_at(self, idx: isize) -> Self::Reference {
		// SAFETY: Guaranteed by the caller.
		unsafe { (self + idx).proxy() }
	}
}

impl<'a, T: Copy> RandomAccessor for Accessor<'a, T, ReadWrite> {
	type Value = T;
	type Reference = ElementRef<'a, T>;

	#[inline]
	unsafe fn proxy(self) -> ElementRef<'a, T> {
		ElementRef {
			ptr: self.ptr,
			marker: PhantomData,
		}
	}
}

#[cfg(feature = "std")]
#[cfg(test)]
mod test {
	use super::{ConstStridedAccessor, Proxy, RandomAccessor, StridedAccessor};
	use ndarray::{arr1, arr2, s};

	#[test]
	fn column_traversal() {
		let mut matrix = arr2(&[[1, 2, 3], [4, 5, 6], [7, 8, 9]]);
		let mut column = matrix.column_mut(1);
		let begin = StridedAccessor::from_view(&mut column);
		assert_eq!(begin.stride(), 3);
		let end = begin + 3;
		assert_eq!(end - begin, 3);
		assert_eq!(begin - end, -3);
		assert!(begin < end);
		let mut cursor = begin;
		let mut seen = Vec::new();
		while cursor != end {
			// SAFETY: `cursor` is within `begin..end`.
			seen.push(unsafe { *cursor.post_inc().get() });
		}
		assert_eq!(seen, [2, 5, 8]);
		// SAFETY: Offsets stay within the column.
		unsafe {
			*begin.at_mut(2) = 0;
			assert_eq!(*(end - 1).get(), 0);
			assert_eq!(*(2 + begin).get(), 0);
		}
		assert_eq!(matrix[[2, 1]], 0);
	}

	#[test]
	fn reversed_view() {
		let mut array = arr1(&[0, 1, 2, 3, 4, 5]);
		let mut view = array.slice_mut(s![..;-2]);
		let mut cursor = StridedAccessor::from_view(&mut view);
		assert_eq!(cursor.stride(), -2);
		// SAFETY: All positions are within the view of length 3.
		unsafe {
			assert_eq!(*cursor.get(), 5);
			cursor.inc();
			assert_eq!(*cursor.get(), 3);
			cursor += 1;
			assert_eq!(*cursor.get(), 1);
			cursor.dec();
			cursor -= 1;
			assert_eq!(*cursor.get(), 5);
			assert_eq!(*cursor.at(1), 3);
		}
		let end = cursor + 3;
		assert_eq!(end - cursor, 3);
		// Raw address order runs against the logical order for negative strides.
		assert!(end < cursor);
	}

	#[test]
	fn default_is_null() {
		let cursor = StridedAccessor::<f32>::default();
		assert!(cursor.is_null());
		assert_eq!(cursor.stride(), 1);
		let cursor = ConstStridedAccessor::<f32>::default();
		assert!(cursor.is_null());
	}

	#[test]
	fn const_from_view() {
		let array = arr1(&[1.5, 2.5, 3.5]);
		let cursor = ConstStridedAccessor::from_view(&array);
		let mut moved = cursor;
		assert_eq!(moved.post_dec(), cursor);
		moved += 2;
		assert_eq!(moved - cursor, 1);
		// SAFETY: Position 1 is in bounds.
		assert_eq!(unsafe { *moved.get() }, 2.5);
	}

	#[test]
	fn proxy_swap() {
		let mut array = arr1(&[10, 20, 30]);
		let cursor = StridedAccessor::from_ptr(array.as_mut_ptr());
		// SAFETY: Positions 0 and 2 are in bounds.
		unsafe {
			cursor.proxy().swap(cursor.proxy_at(2));
			cursor.proxy_at(1).swap(cursor.proxy_at(1));
			let mut middle = cursor.proxy_at(1);
			middle.set(middle.get() + 1);
		}
		assert_eq!(array, arr1(&[30, 21, 10]));
		assert_eq!(cursor.into_const().stride(), 1);
	}
}
