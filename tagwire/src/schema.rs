//! Schema resolution.
//!
//! A record's declared fields ([`FieldDef`]s, produced by `#[derive(Record)]`)
//! are resolved against a [`Registry`] once per type, and the result cached in
//! a [`SchemaCache`].

use std::{
	any::{self, TypeId},
	fmt,
	sync::Arc,
};

use dashmap::{mapref::entry::Entry, DashMap};
use fixedbitset::FixedBitSet;
use tracing::debug;

use crate::{processor::Processor, Error, Record, Registry, Result, WireType};

/// Number of distinct attribute ids.
pub const ATTRIBUTE_ID_COUNT: usize = 256;

/// How a field is treated when absent or default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FieldPolicy {
	/// Absence is an error, on encode and on decode.
	pub required: bool,
	/// Field's native type has an "absent" state.
	pub nullable: bool,
	/// Default values may be left out of the output.
	pub allow_default_omission: bool,
}

impl FieldPolicy {
	/// Neither required nor omitting defaults.
	pub const OPTIONAL: FieldPolicy = FieldPolicy {
		required: false,
		nullable: false,
		allow_default_omission: false,
	};

	/// Whether default values are left out of the output.
	///
	/// A required field is always written, even if default omission is allowed.
	#[inline]
	pub const fn omits_default(&self) -> bool {
		self.allow_default_omission && !self.required
	}
}

/// Declared metadata of one serializable field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldDef {
	pub id: u8,
	pub name: &'static str,
	pub wire_type: WireType,
	pub policy: FieldPolicy,
}

impl FieldDef {
	pub const fn new(id: u8, name: &'static str, wire_type: WireType, policy: FieldPolicy) -> Self {
		Self {
			id,
			name,
			wire_type,
			policy,
		}
	}

	/// Unnamed optional field, for attributes of a dynamic container.
	pub const fn attribute(id: u8, wire_type: WireType) -> Self {
		Self::new(id, "", wire_type, FieldPolicy::OPTIONAL)
	}
}

/// A [`FieldDef`] with its processor resolved.
#[derive(Clone)]
pub struct FieldDescriptor {
	pub def: FieldDef,
	pub processor: Arc<dyn Processor>,
	/// Payload size, if field's kind is fixed-width.
	pub fixed_size: Option<usize>,
}

impl fmt::Debug for FieldDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FieldDescriptor")
			.field("def", &self.def)
			.field("fixed_size", &self.fixed_size)
			.finish_non_exhaustive()
	}
}

/// Resolved schema of a record type.
#[derive(Debug)]
pub struct Schema {
	record: &'static str,
	fields: Vec<FieldDescriptor>,
	/// Attribute id -> index into `fields`.
	index: [Option<u8>; ATTRIBUTE_ID_COUNT],
	required: FixedBitSet,
}

impl Schema {
	/// Resolve schema of record type `R` against `registry`.
	pub fn resolve<R: Record>(registry: &Registry) -> Result<Schema> {
		Self::from_fields(any::type_name::<R>(), R::fields(), registry)
	}

	/// Resolve schema from declared fields.
	///
	/// Fails with `DuplicateAttribute` if two fields share an id,
	/// or `UnknownWireType` if a field's wire type has no registered processor.
	pub fn from_fields(record: &'static str, defs: &[FieldDef], registry: &Registry) -> Result<Schema> {
		let mut defs = defs.to_vec();
		defs.sort_by_key(|def| def.id);

		let mut index = [None; ATTRIBUTE_ID_COUNT];
		let mut required = FixedBitSet::with_capacity(ATTRIBUTE_ID_COUNT);
		let mut fields = Vec::with_capacity(defs.len());
		for (position, def) in defs.into_iter().enumerate() {
			let slot = &mut index[def.id as usize];
			if slot.is_some() {
				return Err(Error::DuplicateAttribute { id: def.id, record });
			}
			// Ids are unique bytes, so there are at most 256 fields
			*slot = Some(position as u8);
			if def.policy.required {
				required.insert(def.id as usize);
			}

			let processor = registry.get_shared(def.wire_type.tag())?;
			fields.push(FieldDescriptor {
				fixed_size: processor.fixed_size(),
				processor,
				def,
			});
		}

		Ok(Schema {
			record,
			fields,
			index,
			required,
		})
	}

	/// Type name of the record.
	#[inline]
	pub fn record(&self) -> &'static str {
		self.record
	}

	/// Fields, sorted by attribute id.
	#[inline]
	pub fn fields(&self) -> &[FieldDescriptor] {
		&self.fields
	}

	/// Look up field by attribute id.
	#[inline]
	pub fn field(&self, id: u8) -> Option<&FieldDescriptor> {
		self.index[id as usize].map(|position| &self.fields[position as usize])
	}

	/// Ids of required fields.
	#[inline]
	pub fn required(&self) -> &FixedBitSet {
		&self.required
	}

	/// Fail with `RequiredFieldMissing` for the lowest-numbered required
	/// field whose id is not in `seen`.
	pub fn check_required(&self, seen: &FixedBitSet) -> Result<()> {
		match self.required.difference(seen).next() {
			Some(id) => {
				let id = id as u8;
				let name = self.field(id).map_or("", |field| field.def.name);
				Err(Error::RequiredFieldMissing { id, name })
			}
			None => Ok(()),
		}
	}
}

/// Concurrent cache of resolved schemas, keyed by record type.
///
/// A cache must only ever be used with a single [`Registry`], since cached
/// schemas hold processors resolved from it.
#[derive(Debug, Default)]
pub struct SchemaCache {
	schemas: DashMap<TypeId, Arc<Schema>>,
}

impl SchemaCache {
	pub fn new() -> Self {
		Self::default()
	}

	/// Get schema of record type `R`, resolving it against `registry` on first
	/// use.
	///
	/// Resolution happens while holding the map entry, so concurrent first uses
	/// resolve the type only once. Failed resolutions are not cached.
	pub fn get_or_resolve<R: Record>(&self, registry: &Registry) -> Result<Arc<Schema>> {
		let type_id = TypeId::of::<R>();
		if let Some(schema) = self.schemas.get(&type_id) {
			return Ok(Arc::clone(schema.value()));
		}

		match self.schemas.entry(type_id) {
			Entry::Occupied(occupied) => Ok(Arc::clone(occupied.get())),
			Entry::Vacant(vacant) => {
				let schema = Arc::new(Schema::resolve::<R>(registry)?);
				debug!(
					record = schema.record(),
					fields = schema.fields().len(),
					"resolved record schema"
				);
				vacant.insert(Arc::clone(&schema));
				Ok(schema)
			}
		}
	}

	/// Whether schema of `R` has been resolved.
	pub fn contains<R: Record>(&self) -> bool {
		self.schemas.contains_key(&TypeId::of::<R>())
	}

	/// Number of cached schemas.
	pub fn len(&self) -> usize {
		self.schemas.len()
	}

	pub fn is_empty(&self) -> bool {
		self.schemas.is_empty()
	}
}
