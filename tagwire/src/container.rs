//! Dynamic attribute container.
//!
//! [`Container`] is the untyped counterpart of a `#[derive(Record)]` struct:
//! a map from attribute id to [`Value`]. As the wire carries no type tag per
//! attribute, decoding a container needs a [`Template`] declaring the kind of
//! each attribute id.

use std::{
	collections::{btree_map, BTreeMap},
	sync::Arc,
};

use crate::{
	processor::{decode_prefixed_elements, payload_region, Processor},
	reader::Reader,
	schema::FieldDef,
	variant::{Value, Variant},
	BufferProxy, Codec, Error, Result, WireType,
};

/// Map from attribute id to value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Container {
	attributes: BTreeMap<u8, Value>,
}

impl Container {
	pub fn new() -> Self {
		Self::default()
	}

	#[inline]
	pub fn get(&self, id: u8) -> Option<&Value> {
		self.attributes.get(&id)
	}

	/// Set attribute `id`, returning previous value if there was one.
	pub fn set(&mut self, id: u8, value: impl Into<Value>) -> Option<Value> {
		self.attributes.insert(id, value.into())
	}

	/// Builder-style `set`.
	pub fn with(mut self, id: u8, value: impl Into<Value>) -> Self {
		self.set(id, value);
		self
	}

	pub fn remove(&mut self, id: u8) -> Option<Value> {
		self.attributes.remove(&id)
	}

	#[inline]
	pub fn contains(&self, id: u8) -> bool {
		self.attributes.contains_key(&id)
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.attributes.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.attributes.is_empty()
	}

	/// Iterate over attributes, in id order.
	pub fn iter(&self) -> btree_map::Iter<'_, u8, Value> {
		self.attributes.iter()
	}

	/// Get native value of attribute `id`.
	///
	/// Fails with `RequiredFieldMissing` if attribute is absent or null,
	/// and `TypeMismatch` if `T` is not the attribute's kind.
	pub fn get_attribute_as_type<T: Variant + Clone>(&self, id: u8) -> Result<T> {
		self.try_get_as(id)?
			.ok_or(Error::RequiredFieldMissing { id, name: "" })
	}

	/// Get native value of attribute `id`, or `None` if absent or null.
	///
	/// Fails with `TypeMismatch` if `T` is not the attribute's kind.
	pub fn try_get_as<T: Variant + Clone>(&self, id: u8) -> Result<Option<T>> {
		match self.get(id) {
			Some(value) => value.to::<T>(),
			None => Ok(None),
		}
	}

	/// Template with an empty placeholder for each attribute.
	pub fn template(&self) -> Template {
		Template::of(self)
	}

	/// Write attribute stream into `proxy`. Null attributes write nothing.
	pub(crate) fn encode_into(&self, cx: &Codec<'_>, proxy: &mut BufferProxy) -> Result<()> {
		for (&id, value) in &self.attributes {
			value.to_bytes(cx, id, proxy)?;
		}
		Ok(())
	}

	/// Decode attribute stream `data` against `template`.
	pub(crate) fn decode_from(cx: &Codec<'_>, template: &Template, data: &[u8]) -> Result<Container> {
		let cx = &cx.nested()?;
		let mut container = Container::new();
		let mut reader = Reader::new(data);
		while !reader.is_empty() {
			let id = reader.read_u8()?;
			let placeholder = template.get(id).ok_or(Error::UnknownAttribute { id })?;
			let fixed_size = cx.registry().get(placeholder.wire_type().tag())?.fixed_size();
			let (offset, length) = cx.frame(&mut reader, fixed_size).map_err(|err| err.at(id))?;
			placeholder
				.to_data(cx, &mut container, id, data, offset, length)
				.map_err(|err| err.at(id))?;
		}
		Ok(container)
	}
}

impl<'a> IntoIterator for &'a Container {
	type Item = (&'a u8, &'a Value);
	type IntoIter = btree_map::Iter<'a, u8, Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl FromIterator<(u8, Value)> for Container {
	fn from_iter<I: IntoIterator<Item = (u8, Value)>>(iter: I) -> Self {
		Self {
			attributes: iter.into_iter().collect(),
		}
	}
}

/// Declared kind of each attribute id of a container, as empty placeholder
/// variants.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Template {
	placeholders: BTreeMap<u8, Value>,
}

impl Template {
	pub fn new() -> Self {
		Self::default()
	}

	/// Declare attribute `id` as `wire_type`.
	///
	/// `Record` and `RecordArray` fail with `UnsupportedOperation`, as they need
	/// a nested template. Use [`with_record`](Self::with_record) or
	/// [`with_record_array`](Self::with_record_array) for those.
	pub fn with(mut self, id: u8, wire_type: WireType) -> Result<Self> {
		let placeholder = Value::placeholder(wire_type).ok_or(Error::UnsupportedOperation {
			wire_type,
			operation: "placeholder without nested template",
		})?;
		self.placeholders.insert(id, placeholder);
		Ok(self)
	}

	/// Declare attribute `id` as a nested record decoded against `template`.
	pub fn with_record(mut self, id: u8, template: impl Into<Arc<Template>>) -> Self {
		self.placeholders.insert(id, Value::record_placeholder(template));
		self
	}

	/// Declare attribute `id` as an array of nested records, each decoded
	/// against `template`.
	pub fn with_record_array(mut self, id: u8, template: impl Into<Arc<Template>>) -> Self {
		self.placeholders.insert(id, Value::record_array_placeholder(template));
		self
	}

	/// Template matching the attributes of `container`.
	pub fn of(container: &Container) -> Self {
		Self {
			placeholders: container
				.iter()
				.map(|(&id, value)| (id, value.clone_empty()))
				.collect(),
		}
	}

	/// Placeholder for attribute `id`.
	#[inline]
	pub fn get(&self, id: u8) -> Option<&Value> {
		self.placeholders.get(&id)
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.placeholders.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.placeholders.is_empty()
	}

	pub fn iter(&self) -> btree_map::Iter<'_, u8, Value> {
		self.placeholders.iter()
	}
}

fn required_missing(field: &FieldDef) -> Error {
	Error::RequiredFieldMissing {
		id: field.id,
		name: field.name,
	}
}

fn type_mismatch(value: &Value, requested: &'static str) -> Error {
	Error::TypeMismatch {
		wire_type: value.wire_type(),
		requested,
	}
}

/// Processor for nested containers (`Record` kind).
pub struct RecordProcessor;

impl Processor for RecordProcessor {
	#[inline]
	fn wire_type(&self) -> WireType {
		WireType::Record
	}

	fn encode_fixed(&self, _dst: &mut [u8], _offset: usize, _value: &Value) -> Result<()> {
		Err(Error::UnsupportedOperation {
			wire_type: WireType::Record,
			operation: "fixed-width encoding",
		})
	}

	fn encode_attributed(
		&self,
		cx: &Codec<'_>,
		proxy: &mut BufferProxy,
		field: &FieldDef,
		value: &Value,
	) -> Result<()> {
		let record = match value {
			Value::Record(record) => record,
			_ => return Err(type_mismatch(value, "Container")),
		};
		match record.value() {
			Some(container) => {
				proxy.write_u8(field.id);
				proxy.write_length_prefixed(|proxy| container.encode_into(cx, proxy))
			}
			None if field.policy.required => Err(required_missing(field)),
			None => Ok(()),
		}
	}

	fn decode_standalone(
		&self,
		cx: &Codec<'_>,
		template: &Value,
		data: &[u8],
		offset: usize,
		length: usize,
	) -> Result<Value> {
		let record = match template {
			Value::Record(record) => record,
			_ => return Err(type_mismatch(template, "Container")),
		};
		let payload = payload_region(data, offset, length)?;
		let container = Container::decode_from(cx, record.template(), payload)?;
		template
			.with_record(container)
			.ok_or_else(|| type_mismatch(template, "Container"))
	}
}

/// Processor for arrays of nested containers (`RecordArray` kind).
pub struct RecordArrayProcessor;

impl Processor for RecordArrayProcessor {
	#[inline]
	fn wire_type(&self) -> WireType {
		WireType::RecordArray
	}

	fn encode_fixed(&self, _dst: &mut [u8], _offset: usize, _value: &Value) -> Result<()> {
		Err(Error::UnsupportedOperation {
			wire_type: WireType::RecordArray,
			operation: "fixed-width encoding",
		})
	}

	fn encode_attributed(
		&self,
		cx: &Codec<'_>,
		proxy: &mut BufferProxy,
		field: &FieldDef,
		value: &Value,
	) -> Result<()> {
		let records = match value {
			Value::RecordArray(records) => records,
			_ => return Err(type_mismatch(value, "Vec<Container>")),
		};
		let items = match records.value() {
			Some(items) => items,
			None if field.policy.required => return Err(required_missing(field)),
			None => return Ok(()),
		};

		proxy.write_u8(field.id);
		proxy.write_length_prefixed(|proxy| {
			proxy.write_len(items.len())?;
			for item in items {
				proxy.write_length_prefixed(|proxy| item.encode_into(cx, proxy))?;
			}
			Ok(())
		})
	}

	fn decode_standalone(
		&self,
		cx: &Codec<'_>,
		template: &Value,
		data: &[u8],
		offset: usize,
		length: usize,
	) -> Result<Value> {
		let records = match template {
			Value::RecordArray(records) => records,
			_ => return Err(type_mismatch(template, "Vec<Container>")),
		};
		let payload = payload_region(data, offset, length)?;

		let mut reader = Reader::new(payload);
		let count = reader.read_len(cx.config().max_array_len)?;
		let items = decode_prefixed_elements(cx, count, &payload[reader.position()..], |bytes| {
			Container::decode_from(cx, records.template(), bytes)
		})?;
		template
			.with_record_array(items)
			.ok_or_else(|| type_mismatch(template, "Vec<Container>"))
	}
}
