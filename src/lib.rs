//! Stride-aware sorting and top-k selection of value/index pairs for non-contiguous views into
//! *n*-dimensional arrays.
//!
//! Algorithms operate on a [`Span`] of random-access cursors rather than on a contiguous slice.
//! A cursor either walks one strided stream ([`StridedAccessor`]) or two strided streams in
//! lockstep ([`ValueIndexAccessor`]), so a column of values is permuted together with the column
//! of original positions it carries. Floating-point NaN is ordered as the top of the order by
//! [`Direction`].
//!
//! # Example
//!
//! ```
//! use strided_sort::{kernel::{fill_indices, topk_slice}, ndarray::{Array1, arr2}};
//!
//! // 2-dimensional array of 4 rows and 3 columns.
//! let mut v = arr2(&[[ 0.5, 4.0, 1.0],   // row 0, axis 0
//!                    [ 8.0, 3.0, 2.0],   // row 1, axis 0
//!                    [-1.0, 9.0, f64::NAN],
//!                    [ 4.0, 9.0, 0.0]]);
//!
//! // Due to row-major memory layout, columns are non-contiguous.
//! let column = v.column_mut(2);
//! assert!(column.as_slice().is_none());
//!
//! // Selects the two largest elements of the last column with their original positions.
//! let mut indices = Array1::zeros(column.len());
//! fill_indices(&mut indices);
//! let (values, indices) = topk_slice(column, indices.view_mut(), 2, true, true)?;
//! assert!(values[0].is_nan());
//! assert_eq!(values[1], 2.0);
//! assert_eq!(indices.to_vec(), [2, 1]);
//! # Ok::<(), strided_sort::SortError>(())
//! ```
//!
//! # Current Implementation
//!
//! Complexities where *n* is the length of the (sub)view and *k* the count of elements to select.
//!
//! | Resource | Complexity | Sorting (stable) | Sorting (unstable)  | Top-k (`k * 64 <= n`) | Top-k (otherwise)       |
//! |----------|------------|------------------|---------------------|-----------------------|-------------------------|
//! | Time     | Best       | *O*(*n*)         | *O*(*n*)            | *O*(*n*)              | *O*(*n*)                |
//! | Time     | Average    | *O*(*n* log *n*) | *O*(*n* log *n*)    | *O*(*n* log *k*)      | *O*(*n* + *k* log *k*)  |
//! | Time     | Worst      | *O*(*n* log *n*) | *O*(*n* log *n*)    | *O*(*n* log *k*)      | *O*(*n* + *k* log *k*)  |
//! | Space    | Worst      | *O*(*n*/2)       | *O*(log *n*)        | *O*(1)                | *O*(log *k*)            |
//!
//! # Features
//!
//!   * `alloc` for stable sorting, [`kernel::sort_slice`] and the [`axis`] drivers. Enabled by
//!     `std`.
//!   * `std` for [`std::error::Error`] on [`SortError`]. Enabled by `default`.

#![deny(
	missing_docs,
	rustdoc::broken_intra_doc_links,
	rustdoc::missing_crate_level_docs
)]
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod accessor;
pub mod axis;
pub mod error;
pub mod indexed;
pub mod kernel;
pub mod ordering;
pub mod span;

mod heap_sort;
mod insertion_sort;
mod merge_sort;
mod partition;
mod quick_sort;
mod stable_sort;

pub use accessor::{ConstStridedAccessor, Proxy, RandomAccessor, StridedAccessor};
pub use error::{Result, SortError};
pub use indexed::{IndexedAccessor, PairRef, ValueIndexAccessor};
pub use ndarray;
pub use ordering::{Direction, Element};
pub use span::Span;

use core::cmp::Ordering;
use ndarray::{ArrayBase, ArrayViewMut1, Axis, Data, DataMut, IndexLonger, Ix1};

/// Extension trait for 1-dimensional [`ArrayBase<S, Ix1>`](`ArrayBase`) array or (sub)view with
/// arbitrary memory layout (e.g., non-contiguous) providing methods (e.g., [sorting]) to
/// [`slice`](`core::slice`) of [`Copy`] elements.
///
/// [sorting]: https://en.wikipedia.org/wiki/Sorting_algorithm
pub trait Slice1Ext<A, S>
where
	A: Copy,
	S: Data<Elem = A>,
{
	/// Sorts the array with a comparator function.
	///
	/// This sort is stable (i.e., does not reorder equal elements) and *O*(*n* log *n*)
	/// worst-case. It allocates temporary storage for half the array.
	///
	/// # Examples
	///
	/// ```
	/// use strided_sort::{Direction, Slice1Ext, ndarray::arr1};
	///
	/// let mut v = arr1(&[5.0, f64::NAN, -3.0, 2.0]);
	/// v.sort_by(|a, b| Direction::Descending.compare(a, b));
	/// assert!(v[0].is_nan());
	/// assert_eq!(v.slice(strided_sort::ndarray::s![1..]), arr1(&[5.0, 2.0, -3.0]));
	/// ```
	#[cfg(feature = "alloc")]
	fn sort_by<F>(&mut self, compare: F)
	where
		F: FnMut(&A, &A) -> Ordering,
		S: DataMut;
	/// Sorts the array with a comparator function, but might not preserve the order of equal
	/// elements.
	///
	/// This sort is unstable, in-place and *O*(*n* log *n*) worst-case.
	///
	/// # Examples
	///
	/// ```
	/// use strided_sort::{Slice1Ext, ndarray::arr2};
	///
	/// let mut v = arr2(&[[5, 4], [1, 3], [-3, 2]]);
	/// v.column_mut(0).sort_unstable_by(|a, b| b.cmp(a));
	/// assert_eq!(v, arr2(&[[5, 4], [1, 3], [-3, 2]]));
	/// v.column_mut(1).sort_unstable_by(|a, b| a.cmp(b));
	/// assert_eq!(v, arr2(&[[5, 2], [1, 3], [-3, 4]]));
	/// ```
	fn sort_unstable_by<F>(&mut self, compare: F)
	where
		F: FnMut(&A, &A) -> Ordering,
		S: DataMut;
	/// Rearranges the array such that `..mid` holds its `mid` least elements in sorted order.
	///
	/// The order of the remaining elements is unspecified. This is *O*(*n* log *mid*) worst-case.
	///
	/// # Panics
	///
	/// Panics if `mid > len()`.
	///
	/// # Examples
	///
	/// ```
	/// use strided_sort::{Slice1Ext, ndarray::{arr1, s}};
	///
	/// let mut v = arr1(&[9, 1, 8, 2, 7, 3]);
	/// v.partial_sort_by(3, |a, b| a.cmp(b));
	/// assert_eq!(v.slice(s![..3]), arr1(&[1, 2, 3]));
	/// ```
	fn partial_sort_by<F>(&mut self, mid: usize, compare: F)
	where
		F: FnMut(&A, &A) -> Ordering,
		S: DataMut;
	/// Reorders the array with a comparator function such that the element at `index` is at its
	/// final sorted position.
	///
	/// Returns the subview before `index`, the element at `index` and the subview after `index`.
	/// No element before `index` is greater and no element after it is less. This reordering is
	/// unstable, in-place and *O*(*n*) worst-case.
	///
	/// # Panics
	///
	/// Panics when `index >= len()`.
	///
	/// # Examples
	///
	/// ```
	/// use strided_sort::{Slice1Ext, ndarray::arr1};
	///
	/// let mut v = arr1(&[-5i32, 4, 1, -3, 2]);
	/// let (lesser, median, greater) = v.select_nth_unstable_by(2, |a, b| a.cmp(b));
	/// assert_eq!(*median, 1);
	/// assert!(lesser.iter().all(|&x| x <= 1));
	/// assert!(greater.iter().all(|&x| x >= 1));
	/// ```
	fn select_nth_unstable_by<F>(
		&mut self,
		index: usize,
		compare: F,
	) -> (ArrayViewMut1<'_, A>, &mut A, ArrayViewMut1<'_, A>)
	where
		F: FnMut(&A, &A) -> Ordering,
		S: DataMut;
	/// Checks if the elements of this array are sorted using the given comparator function.
	///
	/// Returns `false` as soon as `compare` returns [`None`] or [`Greater`](Ordering::Greater)
	/// for any two consecutive elements.
	///
	/// # Examples
	///
	/// ```
	/// use strided_sort::{Slice1Ext, ndarray::arr2};
	///
	/// let v = arr2(&[[1.0, 9.0], [2.0, f64::NAN], [2.0, 3.0]]);
	/// assert!(v.column(0).is_sorted_by(|a, b| a.partial_cmp(b)));
	/// assert!(!v.column(1).is_sorted_by(|a, b| a.partial_cmp(b)));
	/// ```
	#[must_use]
	fn is_sorted_by<F>(&self, compare: F) -> bool
	where
		F: FnMut(&A, &A) -> Option<Ordering>;
}

impl<A, S> Slice1Ext<A, S> for ArrayBase<S, Ix1>
where
	A: Copy,
	S: Data<Elem = A>,
{
	#[cfg(feature = "alloc")]
	#[inline]
	fn sort_by<F>(&mut self, compare: F)
	where
		F: FnMut(&A, &A) -> Ordering,
		S: DataMut,
	{
		Span::from_view(self).sort_by(compare);
	}
	#[inline]
	fn sort_unstable_by<F>(&mut self, compare: F)
	where
		F: FnMut(&A, &A) -> Ordering,
		S: DataMut,
	{
		Span::from_view(self).sort_unstable_by(compare);
	}
	#[inline]
	fn partial_sort_by<F>(&mut self, mid: usize, compare: F)
	where
		F: FnMut(&A, &A) -> Ordering,
		S: DataMut,
	{
		Span::from_view(self).partial_sort_by(mid, compare);
	}
	#[inline]
	fn select_nth_unstable_by<F>(
		&mut self,
		index: usize,
		compare: F,
	) -> (ArrayViewMut1<'_, A>, &mut A, ArrayViewMut1<'_, A>)
	where
		F: FnMut(&A, &A) -> Ordering,
		S: DataMut,
	{
		Span::from_view(self).select_nth_unstable_by(index, compare);
		let (left, rest) = self.view_mut().split_at(Axis(0), index);
		let (pivot, right) = rest.split_at(Axis(0), 1);
		(left, pivot.index(0), right)
	}
	#[inline]
	fn is_sorted_by<F>(&self, mut compare: F) -> bool
	where
		F: FnMut(&A, &A) -> Option<Ordering>,
	{
		let mut cursor = ConstStridedAccessor::from_view(self);
		for _ in 1..self.len() {
			// SAFETY: The cursor and its successor are within the array.
			let (a, b) = unsafe { (cursor.get(), cursor.at(1)) };
			if !compare(a, b).is_some_and(Ordering::is_le) {
				return false;
			}
			cursor.inc();
		}
		true
	}
}
