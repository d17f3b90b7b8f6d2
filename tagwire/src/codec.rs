use std::sync::{Arc, OnceLock};

use fixedbitset::FixedBitSet;
use tracing::debug;

use crate::{
	container::{Container, Template},
	reader::Reader,
	schema::{Schema, SchemaCache, ATTRIBUTE_ID_COUNT},
	BufferProxy, Config, Error, Record, Registry, Result,
};

/// Encoding / decoding context.
///
/// Holds the registry processors are taken from, the cache of schemas
/// resolved against it, and settings. Cheap to copy around by reference.
#[derive(Clone, Copy, Debug)]
pub struct Codec<'a> {
	registry: &'a Registry,
	schemas: &'a SchemaCache,
	config: Config,
	/// Number of records currently being decoded, outermost included.
	depth: usize,
}

impl<'a> Codec<'a> {
	/// Create codec. `schemas` must only ever be used with `registry`.
	pub fn new(registry: &'a Registry, schemas: &'a SchemaCache) -> Self {
		Self {
			registry,
			schemas,
			config: Config::default(),
			depth: 0,
		}
	}

	/// Codec using the standard registry and a process-wide schema cache.
	pub fn standard() -> Codec<'static> {
		static SCHEMAS: OnceLock<SchemaCache> = OnceLock::new();
		Codec::new(Registry::standard(), SCHEMAS.get_or_init(SchemaCache::new))
	}

	pub fn with_config(mut self, config: Config) -> Self {
		self.config = config;
		self
	}

	#[inline]
	pub fn registry(&self) -> &'a Registry {
		self.registry
	}

	#[inline]
	pub fn schemas(&self) -> &'a SchemaCache {
		self.schemas
	}

	#[inline]
	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Resolved schema of record type `R`.
	pub fn schema<R: Record>(&self) -> Result<Arc<Schema>> {
		self.schemas.get_or_resolve::<R>(self.registry)
	}

	/// Encode record to bytes.
	pub fn encode<R: Record>(&self, record: &R) -> Result<Vec<u8>> {
		let mut proxy = BufferProxy::with_capacity(self.config.initial_capacity);
		self.encode_record(record, &mut proxy)?;
		Ok(proxy.into_vec())
	}

	/// Write attribute stream of `record` into `proxy`, fields in id order.
	pub fn encode_record<R: Record>(&self, record: &R, proxy: &mut BufferProxy) -> Result<()> {
		let schema = self.schema::<R>()?;
		for field in schema.fields() {
			record.encode_field(self, &field.def, proxy)?;
		}
		Ok(())
	}

	/// Decode record from bytes.
	///
	/// Fields absent from input take their `Default` value.
	pub fn decode<R: Record>(&self, bytes: &[u8]) -> Result<R> {
		self.decode_record(bytes).inspect_err(|err| {
			debug!(record = std::any::type_name::<R>(), error = %err, "abandoned decode");
		})
	}

	/// Decode record from bytes into `dest`.
	///
	/// Fields absent from input keep their current value in `dest`.
	/// If decoding fails, `dest` is left unchanged.
	pub fn decode_into<R: Record + Clone>(&self, dest: &mut R, bytes: &[u8]) -> Result<()> {
		let mut record = dest.clone();
		self.nested()
			.and_then(|cx| cx.populate(&mut record, bytes))
			.inspect_err(|err| {
				debug!(record = std::any::type_name::<R>(), error = %err, "abandoned decode");
			})?;
		*dest = record;
		Ok(())
	}

	/// As [`decode`](Self::decode), but without logging failure.
	/// Used for nested records, so a failure is only logged once.
	pub fn decode_record<R: Record>(&self, bytes: &[u8]) -> Result<R> {
		let mut record = R::default();
		self.nested()?.populate(&mut record, bytes)?;
		Ok(record)
	}

	/// Codec for decoding one level of record nesting further down.
	/// Fails once `max_depth` would be exceeded.
	pub(crate) fn nested(&self) -> Result<Codec<'a>> {
		if self.depth >= self.config.max_depth {
			return Err(Error::malformed(format!(
				"nesting exceeds max_depth {}",
				self.config.max_depth
			)));
		}
		Ok(Codec {
			depth: self.depth + 1,
			..*self
		})
	}

	fn populate<R: Record>(&self, record: &mut R, bytes: &[u8]) -> Result<()> {
		let schema = self.schema::<R>()?;
		let mut seen = FixedBitSet::with_capacity(ATTRIBUTE_ID_COUNT);
		let mut reader = Reader::new(bytes);
		while !reader.is_empty() {
			let id = reader.read_u8()?;
			let field = schema.field(id).ok_or(Error::UnknownAttribute { id })?;
			let (offset, length) = self.frame(&mut reader, field.fixed_size).map_err(|err| err.at(id))?;
			record
				.decode_field(self, &field.def, &bytes[offset..offset + length])
				.map_err(|err| err.at(id))?;
			seen.insert(id as usize);
		}
		schema.check_required(&seen)
	}

	/// Read framing of the attribute payload at the reader's cursor,
	/// and move past it. Returns `(offset, length)` of the payload.
	///
	/// Fixed-width payloads are `fixed_size` bytes. Others are preceded by a
	/// 4-byte length.
	pub(crate) fn frame(&self, reader: &mut Reader<'_>, fixed_size: Option<usize>) -> Result<(usize, usize)> {
		let length = match fixed_size {
			Some(size) => size,
			None => reader.read_len(self.config.max_payload_len)?,
		};
		let offset = reader.position();
		reader.take(length)?;
		Ok((offset, length))
	}

	/// Encode a dynamic container to bytes.
	pub fn encode_container(&self, container: &Container) -> Result<Vec<u8>> {
		let mut proxy = BufferProxy::with_capacity(self.config.initial_capacity);
		container.encode_into(self, &mut proxy)?;
		Ok(proxy.into_vec())
	}

	/// Decode a dynamic container from bytes, with each attribute's kind taken
	/// from `template`.
	pub fn decode_container(&self, template: &Template, bytes: &[u8]) -> Result<Container> {
		Container::decode_from(self, template, bytes).inspect_err(|err| {
			debug!(error = %err, "abandoned container decode");
		})
	}
}
