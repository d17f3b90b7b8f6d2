/// Marker for a position in a [`BufferProxy`]'s output, captured so a length
/// field can be written later.
///
/// A `Position` is always at or behind the cursor of the proxy it was taken
/// from. It is only meaningful for that proxy.
///
/// [`BufferProxy`]: crate::BufferProxy
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
	offset: usize,
}

impl Position {
	/// Create position marker.
	#[inline]
	pub(crate) fn new(offset: usize) -> Self {
		Self { offset }
	}

	/// Offset of this position from start of output.
	#[inline]
	pub fn offset(&self) -> usize {
		self.offset
	}

	/// Number of bytes written between this position and `cursor`.
	#[inline]
	pub fn distance_to(&self, cursor: usize) -> usize {
		debug_assert!(cursor >= self.offset);
		cursor - self.offset
	}
}
