//! Sort and top-k along one axis of an n-dimensional array.
//!
//! Every lane along the axis is handled independently by the per-slice drivers of
//! [`kernel`](crate::kernel), one lane after the other.

#![cfg(feature = "alloc")]

use crate::{
	error::{Result, SortError},
	kernel::{fill_indices, sort_paired, topk_paired},
	ordering::{Direction, Element},
	span::Span,
};
use ndarray::{Array, ArrayBase, Axis, Data, DataMut, Dimension, Slice, Zip};

/// Sorts every lane of `array` along `axis` in place and returns the original position of each
/// element within its lane.
///
/// ```
/// use strided_sort::{axis::sort_axis, ndarray::{Axis, arr2}};
///
/// let mut array = arr2(&[[3, 1, 2], [0, 5, 4]]);
/// let indices = sort_axis(&mut array, Axis(0), true, true)?;
/// assert_eq!(array, arr2(&[[3, 5, 4], [0, 1, 2]]));
/// assert_eq!(indices, arr2(&[[0, 1, 1], [1, 0, 0]]));
/// # Ok::<(), strided_sort::SortError>(())
/// ```
///
/// # Errors
///
/// Returns [`SortError::AxisOutOfBounds`] if `axis` is not an axis of `array`.
pub fn sort_axis<A, S, D>(
	array: &mut ArrayBase<S, D>,
	axis: Axis,
	descending: bool,
	stable: bool,
) -> Result<Array<i64, D>>
where
	A: Element,
	S: DataMut<Elem = A>,
	D: Dimension,
{
	check_axis(axis, array.ndim())?;
	let direction = Direction::from_descending(descending);
	let mut indices = Array::zeros(array.raw_dim());
	Zip::from(array.lanes_mut(axis))
		.and(indices.lanes_mut(axis))
		.for_each(|mut values, mut indices| {
			fill_indices(&mut indices);
			sort_paired(
				Span::from_views(&mut values, &mut indices),
				direction,
				stable,
			);
		});
	Ok(indices)
}

/// Selects the `k` largest (or smallest) elements of every lane of `array` along `axis`.
///
/// Returns the selected values and their original positions within their lanes, with the length of
/// `axis` reduced to `k`.
///
/// ```
/// use strided_sort::{axis::topk_axis, ndarray::{Axis, arr2}};
///
/// let array = arr2(&[[3.0, 1.0, 2.0], [0.0, f32::NAN, 4.0]]);
/// let (values, indices) = topk_axis(&array, Axis(1), 1, true, true)?;
/// assert_eq!(values[[0, 0]], 3.0);
/// assert!(values[[1, 0]].is_nan());
/// assert_eq!(indices, arr2(&[[0], [1]]));
/// # Ok::<(), strided_sort::SortError>(())
/// ```
///
/// # Errors
///
/// Returns [`SortError::AxisOutOfBounds`] if `axis` is not an axis of `array` and
/// [`SortError::KOutOfRange`] if `k` exceeds the length of `axis`.
pub fn topk_axis<A, S, D>(
	array: &ArrayBase<S, D>,
	axis: Axis,
	k: usize,
	largest: bool,
	sorted: bool,
) -> Result<(Array<A, D>, Array<i64, D>)>
where
	A: Element,
	S: Data<Elem = A>,
	D: Dimension,
{
	check_axis(axis, array.ndim())?;
	let len = array.len_of(axis);
	if k > len {
		return Err(SortError::KOutOfRange { k, len });
	}
	let direction = Direction::from_largest(largest);
	let mut values = array.to_owned();
	let mut indices = Array::zeros(values.raw_dim());
	Zip::from(values.lanes_mut(axis))
		.and(indices.lanes_mut(axis))
		.for_each(|mut values, mut indices| {
			fill_indices(&mut indices);
			topk_paired(
				Span::from_views(&mut values, &mut indices),
				k,
				direction,
				sorted,
			);
		});
	let top = Slice::from(..k);
	Ok((
		values.slice_axis(axis, top).to_owned(),
		indices.slice_axis(axis, top).to_owned(),
	))
}

fn check_axis(axis: Axis, ndim: usize) -> Result<()> {
	if axis.index() < ndim {
		Ok(())
	} else {
		Err(SortError::AxisOutOfBounds {
			axis: axis.index(),
			ndim,
		})
	}
}

#[cfg(feature = "std")]
#[cfg(test)]
mod test {
	use super::{sort_axis, topk_axis};
	use crate::{
		error::SortError,
		kernel::{sort_slice, topk_slice},
	};
	use ndarray::{Array1, Array3, Axis, arr1, arr2};
	use quickcheck_macros::quickcheck;

	#[quickcheck]
	fn lanes_sorted(xs: Vec<i16>, axis: usize, descending: bool) {
		let xs = xs.into_iter().take(24).collect::<Vec<_>>();
		let mut array = Array3::from_shape_fn((2, 3, 4), |(i, j, l)| {
			xs.get(i * 12 + j * 4 + l).copied().unwrap_or(0)
		});
		array.swap_axes(0, 2);
		let axis = Axis(axis % 3);
		let original = array.clone();
		let indices = sort_axis(&mut array, axis, descending, true).unwrap();
		assert_eq!(indices.shape(), array.shape());
		for ((lane, original), positions) in array
			.lanes(axis)
			.into_iter()
			.zip(original.lanes(axis))
			.zip(indices.lanes(axis))
		{
			let mut expected = original.to_owned();
			let mut expected_positions = Array1::zeros(expected.len());
			sort_slice(
				expected.view_mut(),
				expected_positions.view_mut(),
				descending,
				true,
			)
			.unwrap();
			assert_eq!(lane, expected);
			assert_eq!(positions, expected_positions);
		}
	}

	#[quickcheck]
	fn lanes_selected(xs: Vec<f32>, k: usize, largest: bool) {
		let xs = xs.into_iter().take(24).collect::<Vec<_>>();
		let array = Array3::from_shape_fn((4, 2, 3), |(i, j, l)| {
			xs.get(i * 6 + j * 3 + l).copied().unwrap_or(0.5)
		});
		let k = k % 5;
		let (values, indices) = topk_axis(&array, Axis(0), k, largest, true).unwrap();
		assert_eq!(values.shape(), [k, 2, 3]);
		assert_eq!(indices.shape(), [k, 2, 3]);
		for ((lane, original), positions) in values
			.lanes(Axis(0))
			.into_iter()
			.zip(array.lanes(Axis(0)))
			.zip(indices.lanes(Axis(0)))
		{
			let mut expected = original.to_owned();
			let mut expected_positions = Array1::zeros(expected.len());
			let (top, top_positions) = topk_slice(
				expected.view_mut(),
				expected_positions.view_mut(),
				k,
				largest,
				true,
			)
			.unwrap();
			let bits = lane.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
			assert_eq!(bits, top.iter().map(|x| x.to_bits()).collect::<Vec<_>>());
			assert_eq!(positions, top_positions);
		}
	}

	#[test]
	fn rejected() {
		let mut array = arr2(&[[1, 2], [3, 4]]);
		assert_eq!(
			sort_axis(&mut array, Axis(2), false, false).unwrap_err(),
			SortError::AxisOutOfBounds { axis: 2, ndim: 2 }
		);
		assert_eq!(
			topk_axis(&array, Axis(1), 3, false, false).unwrap_err(),
			SortError::KOutOfRange { k: 3, len: 2 }
		);
		assert_eq!(array, arr2(&[[1, 2], [3, 4]]));
	}

	#[test]
	fn single_axis() {
		let array = arr1(&[4u8, 9, 1, 9]);
		let (values, indices) = topk_axis(&array, Axis(0), 3, true, true).unwrap();
		assert_eq!(values, arr1(&[9, 9, 4]));
		assert_eq!(indices, arr1(&[1, 3, 0]));
	}
}
