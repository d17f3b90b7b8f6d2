use crate::{primitives::FixedWidth, Error, Result};

impl_fixed_width_kind!(bool, Boolean, |v| !*v);

impl_fixed_width_kind!(u8, Byte, |v| *v == 0);
impl_fixed_width_kind!(u16, UInt16, |v| *v == 0);
impl_fixed_width_kind!(u32, UInt32, |v| *v == 0);
impl_fixed_width_kind!(u64, UInt64, |v| *v == 0);

impl_fixed_width_kind!(i8, SByte, |v| *v == 0);
impl_fixed_width_kind!(i16, Int16, |v| *v == 0);
impl_fixed_width_kind!(i32, Int32, |v| *v == 0);
impl_fixed_width_kind!(i64, Int64, |v| *v == 0);
impl_fixed_width_kind!(isize, IntPtr, |v| *v == 0);

// Bitwise, so `-0.0` is not a default and NaN is never equal to anything
impl_fixed_width_kind!(f32, Float, |v| v.to_bits() == 0);
impl_fixed_width_kind!(f64, Double, |v| v.to_bits() == 0);

impl_fixed_width_array!(u16, UInt16Array);
impl_fixed_width_array!(u32, UInt32Array);
impl_fixed_width_array!(u64, UInt64Array);

impl_fixed_width_array!(i16, Int16Array);
impl_fixed_width_array!(i32, Int32Array);
impl_fixed_width_array!(i64, Int64Array);
impl_fixed_width_array!(isize, IntPtrArray);

impl_fixed_width_array!(f32, FloatArray);
impl_fixed_width_array!(f64, DoubleArray);

// Pointer-sized integers are always 8 bytes on the wire
impl FixedWidth for isize {
	const SIZE: usize = 8;

	#[inline]
	fn write_le(&self, dst: &mut [u8]) {
		(*self as i64).write_le(dst);
	}

	#[inline]
	fn read_le(src: &[u8]) -> Self {
		i64::read_le(src) as isize
	}

	fn try_read_le(src: &[u8]) -> Result<Self> {
		let value = i64::read_le(src);
		isize::try_from(value)
			.map_err(|_| Error::malformed(format!("pointer-sized value {value} out of range")))
	}
}
