//! Type processors.
//!
//! Each native kind implements [`WireValue`], which converts between the
//! native value and its payload. The free functions in this module wrap that
//! conversion into the four processor operations:
//!
//! * [`encode_fixed`] - raw fixed-width value into a byte region, no prefix.
//! * [`encode_attributed`] - `[id][payload]` into a [`BufferProxy`],
//!   honoring a field's policy.
//! * [`decode_standalone`] - payload region into a native value.
//! * [`decode_populate`] / [`decode_populate_nullable`] - as
//!   `decode_standalone`, but assigning into an existing field.
//!
//! [`Processor`] is the object-safe form of the same operations, working on
//! [`Value`] variants. It is what the [`Registry`] holds.
//!
//! [`Registry`]: crate::Registry

use std::{any, cmp, marker::PhantomData};

use crate::{
	container::Container,
	primitives::FixedWidth,
	proxy::BULK_COPY_THRESHOLD,
	reader::Reader,
	schema::FieldDef,
	variant::{Value, Variant},
	BufferProxy, Codec, Error, Result, WireType,
};

/// Native types which can be written as an attribute payload.
pub trait WireValue: Sized + Send + Sync + 'static {
	/// Wire type of this kind.
	const WIRE_TYPE: WireType;

	/// Whether value is the kind's zero/default.
	/// Only fixed-width kinds are ever considered default.
	#[inline]
	fn is_default(&self) -> bool {
		false
	}

	/// Write raw value into `dst`, which must be exactly the kind's fixed size.
	///
	/// Length-prefixed kinds do not support this.
	fn encode_fixed(&self, dst: &mut [u8]) -> Result<()> {
		let _ = dst;
		Err(Error::UnsupportedOperation {
			wire_type: Self::WIRE_TYPE,
			operation: "fixed-width encoding",
		})
	}

	/// Write payload (everything following the attribute id),
	/// including length prefix for length-prefixed kinds.
	fn encode_payload(&self, cx: &Codec<'_>, proxy: &mut BufferProxy) -> Result<()>;

	/// Read value from a framed payload.
	///
	/// For fixed-width kinds `payload` is exactly the kind's size.
	/// For length-prefixed kinds it is the bytes following the length prefix.
	fn decode_payload(cx: &Codec<'_>, payload: &[u8]) -> Result<Self>;
}

/// Types which can be elements of an array kind.
///
/// `Vec<T>` is a [`WireValue`] for every `T: ArrayElement`. Default array
/// layout is `[payload length:4][element count:4][elements...]`.
pub trait ArrayElement: Sized + Send + Sync + 'static {
	/// Wire type of `Vec<Self>`.
	const ARRAY_WIRE_TYPE: WireType;

	/// Write elements, following the element count.
	/// Every element is written, whatever its value.
	fn encode_elements(cx: &Codec<'_>, items: &[Self], proxy: &mut BufferProxy) -> Result<()>;

	/// Read `count` elements, which must fill `body` exactly.
	fn decode_elements(cx: &Codec<'_>, count: usize, body: &[u8]) -> Result<Vec<Self>>;

	/// Write array payload, including length prefix.
	fn encode_array(cx: &Codec<'_>, items: &[Self], proxy: &mut BufferProxy) -> Result<()> {
		proxy.write_length_prefixed(|proxy| {
			proxy.write_len(items.len())?;
			Self::encode_elements(cx, items, proxy)
		})
	}

	/// Read array from payload following the length prefix.
	fn decode_array(cx: &Codec<'_>, payload: &[u8]) -> Result<Vec<Self>> {
		let mut reader = Reader::new(payload);
		let count = reader.read_len(cx.config().max_array_len)?;
		Self::decode_elements(cx, count, &payload[reader.position()..])
	}
}

impl<T: ArrayElement> WireValue for Vec<T> {
	const WIRE_TYPE: WireType = T::ARRAY_WIRE_TYPE;

	#[inline]
	fn encode_payload(&self, cx: &Codec<'_>, proxy: &mut BufferProxy) -> Result<()> {
		T::encode_array(cx, self.as_slice(), proxy)
	}

	#[inline]
	fn decode_payload(cx: &Codec<'_>, payload: &[u8]) -> Result<Self> {
		T::decode_array(cx, payload)
	}
}

/// Write raw fixed-width `value` into `dst` at `offset`, with no id or length
/// prefix.
pub fn encode_fixed<T: WireValue>(dst: &mut [u8], offset: usize, value: &T) -> Result<()> {
	let size = T::WIRE_TYPE.fixed_size().ok_or(Error::UnsupportedOperation {
		wire_type: T::WIRE_TYPE,
		operation: "fixed-width encoding",
	})?;
	let region = offset
		.checked_add(size)
		.and_then(|end| dst.get_mut(offset..end))
		.ok_or_else(|| Error::malformed(format!("no room for {size} bytes at offset {offset}")))?;
	value.encode_fixed(region)
}

/// Write `[id][payload]` for a field into `proxy`, honoring field's policy.
///
/// * Absent value is written as nothing, unless field is required,
///   in which case it's an error.
/// * Default value of a field allowing default omission is written as nothing.
pub fn encode_attributed<T: WireValue>(
	cx: &Codec<'_>,
	proxy: &mut BufferProxy,
	field: &FieldDef,
	value: Option<&T>,
) -> Result<()> {
	let value = match value {
		Some(value) => value,
		None if field.policy.required => {
			return Err(Error::RequiredFieldMissing {
				id: field.id,
				name: field.name,
			});
		}
		None => return Ok(()),
	};

	if field.policy.omits_default() && value.is_default() {
		return Ok(());
	}

	proxy.write_u8(field.id);
	value.encode_payload(cx, proxy)
}

/// Decode a native value from payload region `data[offset..offset + length]`.
///
/// Fixed-width kinds read exactly their size from `offset`, and ignore
/// `length`.
pub fn decode_standalone<T: WireValue>(
	cx: &Codec<'_>,
	data: &[u8],
	offset: usize,
	length: usize,
) -> Result<T> {
	let length = T::WIRE_TYPE.fixed_size().unwrap_or(length);
	T::decode_payload(cx, payload_region(data, offset, length)?)
}

/// Get `data[offset..offset + length]`, failing if it's out of bounds.
pub(crate) fn payload_region(data: &[u8], offset: usize, length: usize) -> Result<&[u8]> {
	offset
		.checked_add(length)
		.and_then(|end| data.get(offset..end))
		.ok_or_else(|| {
			Error::malformed(format!(
				"payload of {length} bytes at offset {offset} exceeds {} bytes of input",
				data.len()
			))
		})
}

/// Decode a native value and assign it to a non-nullable field.
///
/// `dest` is untouched if decoding fails.
#[inline]
pub fn decode_populate<T: WireValue>(
	cx: &Codec<'_>,
	dest: &mut T,
	_field: &FieldDef,
	data: &[u8],
	offset: usize,
	length: usize,
) -> Result<()> {
	*dest = decode_standalone(cx, data, offset, length)?;
	Ok(())
}

/// Decode a native value and assign it to a nullable field.
///
/// `dest` is untouched if decoding fails.
#[inline]
pub fn decode_populate_nullable<T: WireValue>(
	cx: &Codec<'_>,
	dest: &mut Option<T>,
	_field: &FieldDef,
	data: &[u8],
	offset: usize,
	length: usize,
) -> Result<()> {
	*dest = Some(decode_standalone(cx, data, offset, length)?);
	Ok(())
}

/// Fail unless `payload` is exactly `T::SIZE` bytes.
#[inline]
pub(crate) fn check_fixed_len<T: FixedWidth>(payload: &[u8]) -> Result<()> {
	if payload.len() != T::SIZE {
		return Err(Error::malformed(format!(
			"fixed-width payload is {} bytes, expected {}",
			payload.len(),
			T::SIZE
		)));
	}
	Ok(())
}

/// Read `count` fixed-width elements filling `body` exactly.
///
/// Above [`BULK_COPY_THRESHOLD`] elements, the whole block is converted in one
/// pass. Otherwise elements are read one at a time.
pub fn decode_fixed_elements<T: FixedWidth>(count: usize, body: &[u8]) -> Result<Vec<T>> {
	let expected = count.checked_mul(T::SIZE);
	if expected != Some(body.len()) {
		return Err(Error::malformed(format!(
			"element count {count} does not match {} bytes of elements",
			body.len()
		)));
	}

	if count > BULK_COPY_THRESHOLD {
		body.chunks_exact(T::SIZE).map(T::try_read_le).collect()
	} else {
		let mut reader = Reader::new(body);
		(0..count).map(|_| reader.read_fixed::<T>()).collect()
	}
}

/// Read `count` elements, each prefixed with its own 4-byte length,
/// filling `body` exactly.
pub fn decode_prefixed_elements<T, F>(
	cx: &Codec<'_>,
	count: usize,
	body: &[u8],
	mut decode: F,
) -> Result<Vec<T>>
where
	F: FnMut(&[u8]) -> Result<T>,
{
	// Each element needs at least 4 bytes, so don't trust `count` for capacity
	let mut items = Vec::with_capacity(cmp::min(count, body.len() / 4));
	let mut reader = Reader::new(body);
	for _ in 0..count {
		let bytes = reader.read_length_prefixed(cx.config().max_payload_len)?;
		items.push(decode(bytes)?);
	}
	reader.finish()?;
	Ok(items)
}

/// Object-safe type processor, operating on [`Value`] variants.
///
/// One processor is registered per wire type in a [`Registry`].
///
/// [`Registry`]: crate::Registry
pub trait Processor: Send + Sync + 'static {
	/// Wire type this processor handles.
	fn wire_type(&self) -> WireType;

	/// Payload size for fixed-width kinds.
	#[inline]
	fn fixed_size(&self) -> Option<usize> {
		self.wire_type().fixed_size()
	}

	/// Write raw fixed-width value into `dst` at `offset`.
	fn encode_fixed(&self, dst: &mut [u8], offset: usize, value: &Value) -> Result<()>;

	/// Write `[id][payload]` into `proxy`, honoring field's policy.
	fn encode_attributed(
		&self,
		cx: &Codec<'_>,
		proxy: &mut BufferProxy,
		field: &FieldDef,
		value: &Value,
	) -> Result<()>;

	/// Decode payload region into a value.
	/// `template` is the placeholder variant the value is decoded against.
	fn decode_standalone(
		&self,
		cx: &Codec<'_>,
		template: &Value,
		data: &[u8],
		offset: usize,
		length: usize,
	) -> Result<Value>;

	/// Decode payload region and store result in `container` under `id`.
	/// `container` is untouched if decoding fails.
	fn decode_populate(
		&self,
		cx: &Codec<'_>,
		container: &mut Container,
		id: u8,
		template: &Value,
		data: &[u8],
		offset: usize,
		length: usize,
	) -> Result<()> {
		let value = self.decode_standalone(cx, template, data, offset, length)?;
		container.set(id, value);
		Ok(())
	}
}

/// [`Processor`] for a built-in native kind.
pub struct KindProcessor<T> {
	_marker: PhantomData<fn() -> T>,
}

impl<T: Variant> KindProcessor<T> {
	pub fn new() -> Self {
		Self {
			_marker: PhantomData,
		}
	}

	fn unwrap<'v>(&self, value: &'v Value) -> Result<Option<&'v T>> {
		T::from_value(value).ok_or(Error::TypeMismatch {
			wire_type: value.wire_type(),
			requested: any::type_name::<T>(),
		})
	}
}

impl<T: Variant> Default for KindProcessor<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T: Variant> Processor for KindProcessor<T> {
	#[inline]
	fn wire_type(&self) -> WireType {
		T::WIRE_TYPE
	}

	fn encode_fixed(&self, dst: &mut [u8], offset: usize, value: &Value) -> Result<()> {
		match self.unwrap(value)? {
			Some(value) => encode_fixed(dst, offset, value),
			None => Err(Error::UnsupportedOperation {
				wire_type: T::WIRE_TYPE,
				operation: "fixed-width encoding of null",
			}),
		}
	}

	fn encode_attributed(
		&self,
		cx: &Codec<'_>,
		proxy: &mut BufferProxy,
		field: &FieldDef,
		value: &Value,
	) -> Result<()> {
		encode_attributed(cx, proxy, field, self.unwrap(value)?)
	}

	fn decode_standalone(
		&self,
		cx: &Codec<'_>,
		_template: &Value,
		data: &[u8],
		offset: usize,
		length: usize,
	) -> Result<Value> {
		let value = decode_standalone::<T>(cx, data, offset, length)?;
		Ok(T::into_value(Some(value)))
	}
}
