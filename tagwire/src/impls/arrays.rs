use crate::{
	processor::{decode_prefixed_elements, ArrayElement},
	BufferProxy, Codec, Error, Result, WireType,
};

use super::other::decode_utf8;

// Byte arrays are `[length][bytes...]`, with no separate element count
impl ArrayElement for u8 {
	const ARRAY_WIRE_TYPE: WireType = WireType::ByteArray;

	#[inline]
	fn encode_elements(_cx: &Codec<'_>, items: &[Self], proxy: &mut BufferProxy) -> Result<()> {
		proxy.write_bytes(items);
		Ok(())
	}

	fn decode_elements(_cx: &Codec<'_>, count: usize, body: &[u8]) -> Result<Vec<Self>> {
		if count != body.len() {
			return Err(Error::malformed(format!(
				"byte count {count} does not match {} bytes of payload",
				body.len()
			)));
		}
		Ok(body.to_vec())
	}

	fn encode_array(cx: &Codec<'_>, items: &[Self], proxy: &mut BufferProxy) -> Result<()> {
		proxy.write_len(items.len())?;
		Self::encode_elements(cx, items, proxy)
	}

	fn decode_array(cx: &Codec<'_>, payload: &[u8]) -> Result<Vec<Self>> {
		Self::decode_elements(cx, payload.len(), payload)
	}
}

impl ArrayElement for String {
	const ARRAY_WIRE_TYPE: WireType = WireType::StringArray;

	fn encode_elements(_cx: &Codec<'_>, items: &[Self], proxy: &mut BufferProxy) -> Result<()> {
		for item in items {
			proxy.write_len(item.len())?;
			proxy.write_str(item);
		}
		Ok(())
	}

	fn decode_elements(cx: &Codec<'_>, count: usize, body: &[u8]) -> Result<Vec<Self>> {
		decode_prefixed_elements(cx, count, body, decode_utf8)
	}
}
