//! Argument validation errors.

/// Errors reported by the sort and top-k drivers before any element is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SortError {
	/// Values and indices differ in length.
	#[error("length mismatch: {values} values vs {indices} indices")]
	LengthMismatch {
		/// Length of the value view.
		values: usize,
		/// Length of the index view.
		indices: usize,
	},

	/// Requested more elements than available.
	#[error("k {k} out of range for length {len}")]
	KOutOfRange {
		/// Requested number of elements.
		k: usize,
		/// Number of available elements.
		len: usize,
	},

	/// Invalid axis for the given array rank.
	#[error("axis {axis} out of bounds for rank {ndim}")]
	AxisOutOfBounds {
		/// Requested axis.
		axis: usize,
		/// Rank of the array.
		ndim: usize,
	},
}

/// Result type for sort and top-k operations.
pub type Result<T> = core::result::Result<T, SortError>;
