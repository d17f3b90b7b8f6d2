//! Little-endian fixed-width representations.

use crate::Result;

/// Native types with a fixed-width little-endian wire representation.
///
/// `write_le` and `read_le` are given slices of exactly `SIZE` bytes.
pub trait FixedWidth: Copy {
	/// Number of bytes on the wire.
	const SIZE: usize;

	/// Write value into `dst`.
	fn write_le(&self, dst: &mut [u8]);

	/// Read value from `src`.
	fn read_le(src: &[u8]) -> Self;

	/// Read value from `src`, rejecting bit patterns which are not valid
	/// values of the type.
	#[inline]
	fn try_read_le(src: &[u8]) -> Result<Self> {
		Ok(Self::read_le(src))
	}
}

macro_rules! impl_fixed_width_int {
	($ty:ty) => {
		impl FixedWidth for $ty {
			const SIZE: usize = std::mem::size_of::<$ty>();

			#[inline]
			fn write_le(&self, dst: &mut [u8]) {
				dst.copy_from_slice(&self.to_le_bytes());
			}

			#[inline]
			fn read_le(src: &[u8]) -> Self {
				let mut bytes = [0u8; std::mem::size_of::<$ty>()];
				bytes.copy_from_slice(src);
				<$ty>::from_le_bytes(bytes)
			}
		}
	};
}

impl_fixed_width_int!(u8);
impl_fixed_width_int!(u16);
impl_fixed_width_int!(u32);
impl_fixed_width_int!(u64);

impl_fixed_width_int!(i8);
impl_fixed_width_int!(i16);
impl_fixed_width_int!(i32);
impl_fixed_width_int!(i64);

// Floats go via their IEEE-754 bit patterns, so NaN payloads and `-0.0`
// survive a round trip unchanged
impl FixedWidth for f32 {
	const SIZE: usize = 4;

	#[inline]
	fn write_le(&self, dst: &mut [u8]) {
		self.to_bits().write_le(dst);
	}

	#[inline]
	fn read_le(src: &[u8]) -> Self {
		f32::from_bits(u32::read_le(src))
	}
}

impl FixedWidth for f64 {
	const SIZE: usize = 8;

	#[inline]
	fn write_le(&self, dst: &mut [u8]) {
		self.to_bits().write_le(dst);
	}

	#[inline]
	fn read_le(src: &[u8]) -> Self {
		f64::from_bits(u64::read_le(src))
	}
}

impl FixedWidth for bool {
	const SIZE: usize = 1;

	#[inline]
	fn write_le(&self, dst: &mut [u8]) {
		dst[0] = *self as u8;
	}

	#[inline]
	fn read_le(src: &[u8]) -> Self {
		src[0] != 0
	}
}
