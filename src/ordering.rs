//! NaN-aware ordering policy.
//!
//! Floating-point NaN is incomparable under [`PartialOrd`], which would break the strict weak order
//! the sorting algorithms rely on. [`Direction`] extends `<` and `>` such that NaN is treated as
//! the top of the order: it sorts last in [`Ascending`](Direction::Ascending) and first in
//! [`Descending`](Direction::Descending) order. All NaN compare equal to each other, regardless of
//! sign or payload.

use core::cmp::Ordering;

/// Element type that can be ordered by a [`Direction`].
pub trait Element: Copy + PartialOrd {
	/// Returns `true` if the value is NaN. Always `false` for integers.
	fn is_nan(&self) -> bool;
}

macro_rules! impl_integer {
	($($t:ty),*) => {$(
		impl Element for $t {
			#[inline]
			fn is_nan(&self) -> bool {
				false
			}
		}
	)*};
}

macro_rules! impl_float {
	($($t:ty),*) => {$(
		impl Element for $t {
			#[inline]
			fn is_nan(&self) -> bool {
				<$t>::is_nan(*self)
			}
		}
	)*};
}

impl_integer!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);
impl_float!(f32, f64);

/// Sorting direction with NaN at the top of the order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
	/// Smallest first, NaN last.
	#[default]
	Ascending,
	/// Largest first, NaN first.
	Descending,
}

impl Direction {
	/// Direction of a sort with the `descending` flag.
	#[inline]
	pub const fn from_descending(descending: bool) -> Self {
		if descending {
			Self::Descending
		} else {
			Self::Ascending
		}
	}

	/// Direction of a top-k selection with the `largest` flag.
	#[inline]
	pub const fn from_largest(largest: bool) -> Self {
		Self::from_descending(largest)
	}

	/// Returns `true` if `a` goes strictly before `b`.
	///
	/// ```
	/// use strided_sort::Direction;
	///
	/// assert!(Direction::Ascending.is_less(&1.0, &f64::NAN));
	/// assert!(Direction::Descending.is_less(&f64::NAN, &1.0));
	/// assert!(!Direction::Ascending.is_less(&f64::NAN, &f64::NAN));
	/// assert!(Direction::Descending.is_less(&2, &1));
	/// ```
	#[inline]
	pub fn is_less<T: Element>(self, a: &T, b: &T) -> bool {
		match self {
			Self::Ascending => (!a.is_nan() && b.is_nan()) || a < b,
			Self::Descending => (a.is_nan() && !b.is_nan()) || a > b,
		}
	}

	/// Total order of `a` and `b` consistent with [`is_less`](Direction::is_less).
	#[inline]
	pub fn compare<T: Element>(self, a: &T, b: &T) -> Ordering {
		if self.is_less(a, b) {
			Ordering::Less
		} else if self.is_less(b, a) {
			Ordering::Greater
		} else {
			Ordering::Equal
		}
	}
}

#[cfg(feature = "std")]
#[cfg(test)]
mod test {
	use super::Direction::{self, Ascending, Descending};
	use core::cmp::Ordering::{Equal, Greater, Less};
	use quickcheck_macros::quickcheck;

	#[test]
	fn nan_is_top() {
		let nan = f32::NAN;
		assert!(Ascending.is_less(&f32::INFINITY, &nan));
		assert!(!Ascending.is_less(&nan, &f32::INFINITY));
		assert!(Descending.is_less(&nan, &f32::INFINITY));
		assert!(!Descending.is_less(&f32::NEG_INFINITY, &nan));
		assert_eq!(Ascending.compare(&nan, &-nan), Equal);
		assert_eq!(Descending.compare(&nan, &0.0), Less);
		assert_eq!(Ascending.compare(&nan, &0.0), Greater);
	}

	#[test]
	fn flags() {
		assert_eq!(Direction::default(), Ascending);
		assert_eq!(Direction::from_descending(true), Descending);
		assert_eq!(Direction::from_largest(false), Ascending);
	}

	fn strict_weak_order(direction: Direction, xs: &[f32]) {
		for a in xs {
			assert!(!direction.is_less(a, a));
			for b in xs {
				if direction.is_less(a, b) {
					assert!(!direction.is_less(b, a));
				}
				for c in xs {
					if direction.is_less(a, b) && direction.is_less(b, c) {
						assert!(direction.is_less(a, c));
					}
				}
			}
		}
	}

	#[quickcheck]
	fn is_strict_weak_order(xs: Vec<f32>) {
		let mut xs = xs;
		xs.truncate(12);
		xs.push(f32::NAN);
		strict_weak_order(Ascending, &xs);
		strict_weak_order(Descending, &xs);
	}
}
