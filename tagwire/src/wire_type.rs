use std::fmt;

/// One-byte discriminator selecting the processor which handles an
/// attribute's payload.
///
/// Fixed-width kinds are written without any length prefix.
/// All other kinds are framed by a 4-byte little-endian payload length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum WireType {
	Boolean = 0x01,
	Byte = 0x02,
	SByte = 0x03,
	Int16 = 0x04,
	UInt16 = 0x05,
	Int32 = 0x06,
	UInt32 = 0x07,
	Int64 = 0x08,
	UInt64 = 0x09,
	Float = 0x0A,
	Double = 0x0B,
	Decimal = 0x0C,
	TimeSpan = 0x0D,
	IntPtr = 0x0E,
	BitFlag = 0x0F,
	String = 0x10,
	ByteArray = 0x11,
	Int16Array = 0x14,
	UInt16Array = 0x15,
	Int32Array = 0x16,
	UInt32Array = 0x17,
	Int64Array = 0x18,
	UInt64Array = 0x19,
	FloatArray = 0x1A,
	DoubleArray = 0x1B,
	DecimalArray = 0x1C,
	TimeSpanArray = 0x1D,
	IntPtrArray = 0x1E,
	StringArray = 0x1F,
	Record = 0x28,
	RecordArray = 0x29,
}

impl WireType {
	/// All wire types, in tag order.
	pub const ALL: [WireType; 31] = [
		WireType::Boolean,
		WireType::Byte,
		WireType::SByte,
		WireType::Int16,
		WireType::UInt16,
		WireType::Int32,
		WireType::UInt32,
		WireType::Int64,
		WireType::UInt64,
		WireType::Float,
		WireType::Double,
		WireType::Decimal,
		WireType::TimeSpan,
		WireType::IntPtr,
		WireType::BitFlag,
		WireType::String,
		WireType::ByteArray,
		WireType::Int16Array,
		WireType::UInt16Array,
		WireType::Int32Array,
		WireType::UInt32Array,
		WireType::Int64Array,
		WireType::UInt64Array,
		WireType::FloatArray,
		WireType::DoubleArray,
		WireType::DecimalArray,
		WireType::TimeSpanArray,
		WireType::IntPtrArray,
		WireType::StringArray,
		WireType::Record,
		WireType::RecordArray,
	];

	/// Get the wire type for a raw tag, if the tag denotes a known kind.
	pub fn from_tag(tag: u8) -> Option<Self> {
		Self::ALL.iter().copied().find(|wire_type| wire_type.tag() == tag)
	}

	/// Raw one-byte tag.
	#[inline]
	pub const fn tag(self) -> u8 {
		self as u8
	}

	/// Size of payload for fixed-width kinds. `None` for length-prefixed kinds.
	pub const fn fixed_size(self) -> Option<usize> {
		match self {
			WireType::Boolean | WireType::Byte | WireType::SByte | WireType::BitFlag => Some(1),
			WireType::Int16 | WireType::UInt16 => Some(2),
			WireType::Int32 | WireType::UInt32 | WireType::Float => Some(4),
			WireType::Int64
			| WireType::UInt64
			| WireType::Double
			| WireType::TimeSpan
			| WireType::IntPtr => Some(8),
			WireType::Decimal => Some(16),
			_ => None,
		}
	}
}

impl fmt::Display for WireType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:?}({:#04x})", self, self.tag())
	}
}

impl TryFrom<u8> for WireType {
	type Error = crate::Error;

	fn try_from(tag: u8) -> Result<Self, Self::Error> {
		Self::from_tag(tag).ok_or(crate::Error::UnknownWireType { tag })
	}
}
