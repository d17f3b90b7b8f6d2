/// Implement `WireValue` for a fixed-width native kind.
///
/// Payload is the value's little-endian bytes, with no length prefix.
/// `is_default` is given as a closure-like expression over the value:
///
/// ```ignore
/// impl_fixed_width_kind!(u32, UInt32, |v| *v == 0);
/// ```
macro_rules! impl_fixed_width_kind {
	($ty:ty, $kind:ident, |$v:ident| $is_default:expr) => {
		impl $crate::processor::WireValue for $ty {
			const WIRE_TYPE: $crate::WireType = $crate::WireType::$kind;

			#[inline]
			fn is_default(&self) -> bool {
				let $v = self;
				$is_default
			}

			#[inline]
			fn encode_fixed(&self, dst: &mut [u8]) -> $crate::Result<()> {
				if dst.len() != <$ty as $crate::primitives::FixedWidth>::SIZE {
					return Err($crate::Error::malformed(format!(
						"fixed-width region is {} bytes, expected {}",
						dst.len(),
						<$ty as $crate::primitives::FixedWidth>::SIZE
					)));
				}
				$crate::primitives::FixedWidth::write_le(self, dst);
				Ok(())
			}

			#[inline]
			fn encode_payload(
				&self,
				_cx: &$crate::Codec<'_>,
				proxy: &mut $crate::BufferProxy,
			) -> $crate::Result<()> {
				proxy.write_fixed(self);
				Ok(())
			}

			#[inline]
			fn decode_payload(_cx: &$crate::Codec<'_>, payload: &[u8]) -> $crate::Result<Self> {
				$crate::processor::check_fixed_len::<$ty>(payload)?;
				<$ty as $crate::primitives::FixedWidth>::try_read_le(payload)
			}
		}
	};
}

/// Implement `ArrayElement` for a fixed-width native kind, with the default
/// `[length][count][elements...]` array layout.
macro_rules! impl_fixed_width_array {
	($ty:ty, $kind:ident) => {
		impl $crate::processor::ArrayElement for $ty {
			const ARRAY_WIRE_TYPE: $crate::WireType = $crate::WireType::$kind;

			#[inline]
			fn encode_elements(
				_cx: &$crate::Codec<'_>,
				items: &[Self],
				proxy: &mut $crate::BufferProxy,
			) -> $crate::Result<()> {
				proxy.write_array(items);
				Ok(())
			}

			#[inline]
			fn decode_elements(
				_cx: &$crate::Codec<'_>,
				count: usize,
				body: &[u8],
			) -> $crate::Result<Vec<Self>> {
				$crate::processor::decode_fixed_elements(count, body)
			}
		}
	};
}
