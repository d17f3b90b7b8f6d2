use smallvec::SmallVec;

use crate::{pos::Position, primitives::FixedWidth, Error, Result};

/// Number of bytes a [`BufferProxy`] holds inline before spilling to the heap.
pub const INLINE_CAPACITY: usize = 256;

/// Arrays with more elements than this are written in a single block
/// operation. Smaller arrays are written element by element.
///
/// Only a performance tuning. Output is identical either way.
pub const BULK_COPY_THRESHOLD: usize = 10;

/// Growable output buffer with a write cursor.
///
/// Storage is stack-allocated until output exceeds [`INLINE_CAPACITY`],
/// which keeps encoding of small messages free of heap allocation until
/// the final `into_vec`.
///
/// All multi-byte values are written little-endian.
///
/// Length fields which are not known up front are reserved with
/// [`skip`](Self::skip) at a captured [`Position`], and filled in afterwards
/// with [`write_back_i32`](Self::write_back_i32) or
/// [`write_back_length`](Self::write_back_length).
#[derive(Default)]
pub struct BufferProxy {
	buf: SmallVec<[u8; INLINE_CAPACITY]>,
}

impl BufferProxy {
	pub fn new() -> Self {
		Self {
			buf: SmallVec::new(),
		}
	}

	/// Create with at least `capacity` bytes of capacity.
	/// Capacity greater than [`INLINE_CAPACITY`] is allocated on heap
	/// immediately.
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			buf: SmallVec::with_capacity(capacity),
		}
	}

	/// Current cursor position (number of bytes written).
	#[inline]
	pub fn len(&self) -> usize {
		self.buf.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.buf.is_empty()
	}

	#[inline]
	pub fn capacity(&self) -> usize {
		self.buf.capacity()
	}

	/// Whether output has outgrown inline storage and moved to heap.
	#[inline]
	pub fn spilled(&self) -> bool {
		self.buf.spilled()
	}

	#[inline]
	pub fn as_slice(&self) -> &[u8] {
		self.buf.as_slice()
	}

	/// Consume proxy, returning output.
	pub fn into_vec(self) -> Vec<u8> {
		self.buf.into_vec()
	}

	/// Reset cursor to start, retaining capacity.
	pub fn clear(&mut self) {
		self.buf.clear();
	}

	#[inline]
	pub fn write_u8(&mut self, value: u8) {
		self.buf.push(value);
	}

	#[inline]
	pub fn write_i8(&mut self, value: i8) {
		self.buf.push(value as u8);
	}

	#[inline]
	pub fn write_i16(&mut self, value: i16) {
		self.write_bytes(&value.to_le_bytes());
	}

	#[inline]
	pub fn write_u16(&mut self, value: u16) {
		self.write_bytes(&value.to_le_bytes());
	}

	#[inline]
	pub fn write_i32(&mut self, value: i32) {
		self.write_bytes(&value.to_le_bytes());
	}

	#[inline]
	pub fn write_u32(&mut self, value: u32) {
		self.write_bytes(&value.to_le_bytes());
	}

	#[inline]
	pub fn write_i64(&mut self, value: i64) {
		self.write_bytes(&value.to_le_bytes());
	}

	#[inline]
	pub fn write_u64(&mut self, value: u64) {
		self.write_bytes(&value.to_le_bytes());
	}

	#[inline]
	pub fn write_f32(&mut self, value: f32) {
		self.write_u32(value.to_bits());
	}

	#[inline]
	pub fn write_f64(&mut self, value: f64) {
		self.write_u64(value.to_bits());
	}

	/// Write UTF-8 bytes of a string. No length is written.
	#[inline]
	pub fn write_str(&mut self, value: &str) {
		self.write_bytes(value.as_bytes());
	}

	/// Write raw bytes.
	#[inline]
	pub fn write_bytes(&mut self, bytes: &[u8]) {
		self.buf.extend_from_slice(bytes);
	}

	/// Write a 4-byte length, failing if it does not fit in an `i32`.
	pub fn write_len(&mut self, len: usize) -> Result<()> {
		let len = i32::try_from(len).map_err(|_| Error::malformed("length exceeds i32::MAX"))?;
		self.write_i32(len);
		Ok(())
	}

	/// Write a fixed-width value.
	#[inline]
	pub fn write_fixed<T: FixedWidth>(&mut self, value: &T) {
		let start = self.buf.len();
		self.buf.resize(start + T::SIZE, 0);
		value.write_le(&mut self.buf[start..]);
	}

	/// Write a slice of fixed-width values, choosing block copy or
	/// element-by-element writing according to [`BULK_COPY_THRESHOLD`].
	#[inline]
	pub fn write_array<T: FixedWidth>(&mut self, items: &[T]) {
		if items.len() > BULK_COPY_THRESHOLD {
			self.write_block(items);
		} else {
			self.write_elements(items);
		}
	}

	/// Write a slice of fixed-width values one at a time.
	pub fn write_elements<T: FixedWidth>(&mut self, items: &[T]) {
		for item in items {
			self.write_fixed(item);
		}
	}

	/// Write a slice of fixed-width values with a single reservation of the
	/// whole block.
	pub fn write_block<T: FixedWidth>(&mut self, items: &[T]) {
		let start = self.buf.len();
		self.buf.resize(start + items.len() * T::SIZE, 0);
		let block = &mut self.buf[start..];
		for (dst, item) in block.chunks_exact_mut(T::SIZE).zip(items) {
			item.write_le(dst);
		}
	}

	/// Capture current cursor position, without moving the cursor.
	#[inline]
	pub fn position(&self) -> Position {
		Position::new(self.buf.len())
	}

	/// Advance cursor by `count` bytes without writing anything meaningful.
	/// Skipped bytes are zeroed.
	#[inline]
	pub fn skip(&mut self, count: usize) {
		let len = self.buf.len();
		self.buf.resize(len + count, 0);
	}

	/// Overwrite the 4 bytes at `pos` with `value`.
	///
	/// # Panics
	///
	/// Panics if `pos` was not captured from this proxy, with at least 4 bytes
	/// written since.
	pub fn write_back_i32(&mut self, pos: Position, value: i32) {
		let offset = pos.offset();
		assert!(
			offset + 4 <= self.buf.len(),
			"write-back position {offset} is not behind cursor"
		);
		self.buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
	}

	/// Fill in the 4-byte length field reserved at `pos` with the number of
	/// bytes written after it.
	pub fn write_back_length(&mut self, pos: Position) -> Result<()> {
		let len = pos.distance_to(self.buf.len()) - 4;
		let len = i32::try_from(len).map_err(|_| Error::malformed("payload exceeds i32::MAX bytes"))?;
		self.write_back_i32(pos, len);
		Ok(())
	}

	/// Reserve a 4-byte length field, run `write`, then fill in the length
	/// of what `write` produced.
	pub fn write_length_prefixed<F>(&mut self, write: F) -> Result<()>
	where F: FnOnce(&mut Self) -> Result<()> {
		let pos = self.position();
		self.skip(4);
		write(self)?;
		self.write_back_length(pos)
	}
}
