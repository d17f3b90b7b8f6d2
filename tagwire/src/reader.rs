use crate::{primitives::FixedWidth, Error, Result};

/// Bounds-checked read cursor over borrowed input.
///
/// Every read past the end of input is a `MalformedPayload` error.
pub struct Reader<'a> {
	data: &'a [u8],
	pos: usize,
}

impl<'a> Reader<'a> {
	#[inline]
	pub fn new(data: &'a [u8]) -> Self {
		Self { data, pos: 0 }
	}

	/// Offset of cursor from start of input.
	#[inline]
	pub fn position(&self) -> usize {
		self.pos
	}

	/// Number of unread bytes.
	#[inline]
	pub fn remaining(&self) -> usize {
		self.data.len() - self.pos
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.remaining() == 0
	}

	/// Take next `count` bytes.
	pub fn take(&mut self, count: usize) -> Result<&'a [u8]> {
		if count > self.remaining() {
			return Err(Error::malformed(format!(
				"needs {count} bytes at offset {}, only {} available",
				self.pos,
				self.remaining()
			)));
		}
		let bytes = &self.data[self.pos..self.pos + count];
		self.pos += count;
		Ok(bytes)
	}

	#[inline]
	pub fn read_u8(&mut self) -> Result<u8> {
		Ok(self.take(1)?[0])
	}

	#[inline]
	pub fn read_i32(&mut self) -> Result<i32> {
		self.read_fixed()
	}

	/// Read a fixed-width value.
	#[inline]
	pub fn read_fixed<T: FixedWidth>(&mut self) -> Result<T> {
		T::try_read_le(self.take(T::SIZE)?)
	}

	/// Read a 4-byte length or count field.
	/// Negative values, and values above `max`, are malformed.
	pub fn read_len(&mut self, max: usize) -> Result<usize> {
		let len = self.read_i32()?;
		let len = usize::try_from(len).map_err(|_| Error::malformed(format!("negative length {len}")))?;
		if len > max {
			return Err(Error::malformed(format!("length {len} exceeds limit {max}")));
		}
		Ok(len)
	}

	/// Read a 4-byte length, then take that many bytes.
	pub fn read_length_prefixed(&mut self, max: usize) -> Result<&'a [u8]> {
		let len = self.read_len(max)?;
		self.take(len)
	}

	/// Fail unless all input has been consumed.
	pub fn finish(&self) -> Result<()> {
		match self.remaining() {
			0 => Ok(()),
			remaining => Err(Error::malformed(format!("{remaining} trailing bytes"))),
		}
	}
}
