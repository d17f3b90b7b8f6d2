use crate::{
	primitives::FixedWidth,
	processor::WireValue,
	types::{BitFlag, Decimal, TimeSpan},
	BufferProxy, Codec, Error, Result, WireType,
};

pub(super) fn decode_utf8(bytes: &[u8]) -> Result<String> {
	String::from_utf8(bytes.to_vec())
		.map_err(|err| Error::malformed(format!("invalid UTF-8: {}", err.utf8_error())))
}

// Empty string is written as a zero length, and decodes as an empty string
// (not as absent)
impl WireValue for String {
	const WIRE_TYPE: WireType = WireType::String;

	fn encode_payload(&self, _cx: &Codec<'_>, proxy: &mut BufferProxy) -> Result<()> {
		proxy.write_len(self.len())?;
		proxy.write_str(self);
		Ok(())
	}

	#[inline]
	fn decode_payload(_cx: &Codec<'_>, payload: &[u8]) -> Result<Self> {
		decode_utf8(payload)
	}
}

impl FixedWidth for Decimal {
	const SIZE: usize = 16;

	fn write_le(&self, dst: &mut [u8]) {
		for (dst, word) in dst.chunks_exact_mut(4).zip(self.words()) {
			word.write_le(dst);
		}
	}

	fn read_le(src: &[u8]) -> Self {
		Decimal::from_words_unchecked(read_words(src))
	}

	fn try_read_le(src: &[u8]) -> Result<Self> {
		let words = read_words(src);
		Decimal::from_words(words)
			.ok_or_else(|| Error::malformed(format!("invalid decimal flags {:#010x}", words[3])))
	}
}

fn read_words(src: &[u8]) -> [u32; 4] {
	let mut words = [0u32; 4];
	for (word, src) in words.iter_mut().zip(src.chunks_exact(4)) {
		*word = u32::read_le(src);
	}
	words
}

impl FixedWidth for TimeSpan {
	const SIZE: usize = 8;

	#[inline]
	fn write_le(&self, dst: &mut [u8]) {
		self.ticks().write_le(dst);
	}

	#[inline]
	fn read_le(src: &[u8]) -> Self {
		TimeSpan::from_ticks(i64::read_le(src))
	}
}

impl FixedWidth for BitFlag {
	const SIZE: usize = 1;

	#[inline]
	fn write_le(&self, dst: &mut [u8]) {
		dst[0] = self.bits();
	}

	#[inline]
	fn read_le(src: &[u8]) -> Self {
		BitFlag::from_bits(src[0])
	}
}

impl_fixed_width_kind!(Decimal, Decimal, |v| *v == Decimal::ZERO);
impl_fixed_width_kind!(TimeSpan, TimeSpan, |v| v.ticks() == 0);
impl_fixed_width_kind!(BitFlag, BitFlag, |v| v.bits() == 0);

impl_fixed_width_array!(Decimal, DecimalArray);
impl_fixed_width_array!(TimeSpan, TimeSpanArray);
