//! Native types for wire kinds which have no direct std equivalent.

use std::{fmt, time::Duration};

/// 128-bit decimal floating point number, in the 16-byte layout used on the
/// wire: 96-bit unsigned mantissa (`lo`, `mid`, `hi`), then a flags word
/// holding the scale (bits 16-23) and sign (bit 31).
///
/// Value is `(-1)^sign * mantissa / 10^scale`, with scale in `0..=28`.
///
/// Equality is representational: `1.0` and `1.00` are different values.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Decimal {
	lo: u32,
	mid: u32,
	hi: u32,
	flags: u32,
}

impl Decimal {
	pub const ZERO: Decimal = Decimal {
		lo: 0,
		mid: 0,
		hi: 0,
		flags: 0,
	};

	pub const MAX_SCALE: u8 = 28;

	const SCALE_SHIFT: u32 = 16;
	const SCALE_MASK: u32 = 0x00FF_0000;
	const SIGN_MASK: u32 = 0x8000_0000;
	const MAX_MANTISSA: u128 = (1 << 96) - 1;

	/// Create from signed mantissa and scale.
	///
	/// Returns `None` if `|mantissa|` does not fit in 96 bits or `scale` is
	/// greater than [`MAX_SCALE`](Self::MAX_SCALE).
	pub fn new(mantissa: i128, scale: u8) -> Option<Self> {
		let magnitude = mantissa.unsigned_abs();
		if magnitude > Self::MAX_MANTISSA || scale > Self::MAX_SCALE {
			return None;
		}
		Some(Self::from_parts(
			magnitude as u32,
			(magnitude >> 32) as u32,
			(magnitude >> 64) as u32,
			mantissa < 0,
			scale,
		))
	}

	/// Create from raw mantissa words, sign and scale.
	///
	/// # Panics
	///
	/// Panics if `scale` is greater than [`MAX_SCALE`](Self::MAX_SCALE).
	pub fn from_parts(lo: u32, mid: u32, hi: u32, negative: bool, scale: u8) -> Self {
		assert!(scale <= Self::MAX_SCALE, "decimal scale {scale} out of range");
		let mut flags = (scale as u32) << Self::SCALE_SHIFT;
		if negative {
			flags |= Self::SIGN_MASK;
		}
		Self { lo, mid, hi, flags }
	}

	/// Create from the 4 words of the wire layout.
	/// Returns `None` if flags word is not valid.
	pub fn from_words(words: [u32; 4]) -> Option<Self> {
		let [lo, mid, hi, flags] = words;
		let scale = (flags & Self::SCALE_MASK) >> Self::SCALE_SHIFT;
		if flags & !(Self::SCALE_MASK | Self::SIGN_MASK) != 0 || scale > Self::MAX_SCALE as u32 {
			return None;
		}
		Some(Self { lo, mid, hi, flags })
	}

	/// Create from the 4 words of the wire layout, without validating flags.
	#[inline]
	pub(crate) const fn from_words_unchecked(words: [u32; 4]) -> Self {
		let [lo, mid, hi, flags] = words;
		Self { lo, mid, hi, flags }
	}

	/// The 4 words of the wire layout.
	#[inline]
	pub fn words(&self) -> [u32; 4] {
		[self.lo, self.mid, self.hi, self.flags]
	}

	/// Signed mantissa.
	pub fn mantissa(&self) -> i128 {
		let magnitude = (self.lo as i128) | ((self.mid as i128) << 32) | ((self.hi as i128) << 64);
		if self.is_negative() {
			-magnitude
		} else {
			magnitude
		}
	}

	#[inline]
	pub fn scale(&self) -> u8 {
		((self.flags & Self::SCALE_MASK) >> Self::SCALE_SHIFT) as u8
	}

	#[inline]
	pub fn is_negative(&self) -> bool {
		self.flags & Self::SIGN_MASK != 0
	}

	/// Numerically zero, whatever the sign or scale.
	#[inline]
	pub fn is_zero(&self) -> bool {
		self.lo == 0 && self.mid == 0 && self.hi == 0
	}
}

impl From<i64> for Decimal {
	fn from(value: i64) -> Self {
		let magnitude = value.unsigned_abs();
		Self::from_parts(magnitude as u32, (magnitude >> 32) as u32, 0, value < 0, 0)
	}
}

impl From<i32> for Decimal {
	fn from(value: i32) -> Self {
		Self::from(value as i64)
	}
}

impl fmt::Display for Decimal {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let digits = self.mantissa().unsigned_abs().to_string();
		let scale = self.scale() as usize;
		if self.is_negative() {
			f.write_str("-")?;
		}
		if scale == 0 {
			return f.write_str(&digits);
		}
		if digits.len() <= scale {
			write!(f, "0.{}{}", "0".repeat(scale - digits.len()), digits)
		} else {
			let (int, frac) = digits.split_at(digits.len() - scale);
			write!(f, "{int}.{frac}")
		}
	}
}

impl fmt::Debug for Decimal {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Decimal({self})")
	}
}

/// Signed time interval, as a count of 100-nanosecond ticks.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSpan {
	ticks: i64,
}

impl TimeSpan {
	pub const ZERO: TimeSpan = TimeSpan { ticks: 0 };
	pub const TICKS_PER_MILLISECOND: i64 = 10_000;
	pub const TICKS_PER_SECOND: i64 = 10_000_000;

	#[inline]
	pub const fn from_ticks(ticks: i64) -> Self {
		Self { ticks }
	}

	#[inline]
	pub const fn ticks(&self) -> i64 {
		self.ticks
	}

	/// Returns `None` on overflow.
	pub fn from_millis(millis: i64) -> Option<Self> {
		millis.checked_mul(Self::TICKS_PER_MILLISECOND).map(Self::from_ticks)
	}

	/// Returns `None` on overflow.
	pub fn from_secs(secs: i64) -> Option<Self> {
		secs.checked_mul(Self::TICKS_PER_SECOND).map(Self::from_ticks)
	}

	#[inline]
	pub const fn is_negative(&self) -> bool {
		self.ticks < 0
	}
}

impl TryFrom<Duration> for TimeSpan {
	type Error = std::num::TryFromIntError;

	/// Sub-tick precision is truncated.
	fn try_from(duration: Duration) -> Result<Self, Self::Error> {
		i64::try_from(duration.as_nanos() / 100).map(Self::from_ticks)
	}
}

impl TryFrom<TimeSpan> for Duration {
	type Error = std::num::TryFromIntError;

	/// Fails for negative intervals.
	fn try_from(span: TimeSpan) -> Result<Self, Self::Error> {
		u64::try_from(span.ticks).map(|ticks| Duration::from_nanos(ticks.saturating_mul(100)))
	}
}

/// Set of 8 independent boolean flags, stored as one byte.
/// Flag `i` is bit `i`.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BitFlag(u8);

impl BitFlag {
	pub const LEN: usize = 8;

	#[inline]
	pub const fn from_bits(bits: u8) -> Self {
		Self(bits)
	}

	#[inline]
	pub const fn bits(&self) -> u8 {
		self.0
	}

	/// Get flag at `index`.
	///
	/// # Panics
	///
	/// Panics if `index >= 8`.
	#[inline]
	pub fn get(&self, index: usize) -> bool {
		assert!(index < Self::LEN, "flag index {index} out of range");
		self.0 & (1 << index) != 0
	}

	/// Set flag at `index`.
	///
	/// # Panics
	///
	/// Panics if `index >= 8`.
	#[inline]
	pub fn set(&mut self, index: usize, value: bool) {
		assert!(index < Self::LEN, "flag index {index} out of range");
		if value {
			self.0 |= 1 << index;
		} else {
			self.0 &= !(1 << index);
		}
	}

	/// Builder-style `set`.
	#[inline]
	pub fn with(mut self, index: usize, value: bool) -> Self {
		self.set(index, value);
		self
	}
}

impl From<[bool; 8]> for BitFlag {
	fn from(flags: [bool; 8]) -> Self {
		flags
			.iter()
			.enumerate()
			.fold(BitFlag::default(), |acc, (index, &value)| acc.with(index, value))
	}
}

impl fmt::Debug for BitFlag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "BitFlag({:08b})", self.0)
	}
}
