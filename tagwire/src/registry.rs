use std::{fmt, sync::{Arc, OnceLock}};

use tracing::trace;

use crate::{
	container::{RecordArrayProcessor, RecordProcessor},
	processor::{KindProcessor, Processor},
	types::{BitFlag, Decimal, TimeSpan},
	variant::Variant,
	Error, Result, WireType,
};

const TAG_COUNT: usize = 256;

/// Immutable map from wire type tag to the processor handling it.
///
/// Built once with a [`RegistryBuilder`], then shared read-only.
pub struct Registry {
	processors: Vec<Option<Arc<dyn Processor>>>,
	len: usize,
}

impl Registry {
	pub fn builder() -> RegistryBuilder {
		RegistryBuilder::new()
	}

	/// Process-wide registry holding processors for every built-in kind.
	pub fn standard() -> &'static Registry {
		static STANDARD: OnceLock<Registry> = OnceLock::new();
		STANDARD.get_or_init(|| {
			let registry = RegistryBuilder::new().with_standard_kinds().build();
			trace!(processors = registry.len(), "built standard registry");
			registry
		})
	}

	/// Get processor for `tag`.
	/// Fails with `UnknownWireType` if none is registered.
	#[inline]
	pub fn get(&self, tag: u8) -> Result<&dyn Processor> {
		match &self.processors[tag as usize] {
			Some(processor) => Ok(processor.as_ref()),
			None => Err(Error::UnknownWireType { tag }),
		}
	}

	/// As [`get`](Self::get), but returning a shared handle.
	pub fn get_shared(&self, tag: u8) -> Result<Arc<dyn Processor>> {
		self.processors[tag as usize]
			.clone()
			.ok_or(Error::UnknownWireType { tag })
	}

	#[inline]
	pub fn contains(&self, tag: u8) -> bool {
		self.processors[tag as usize].is_some()
	}

	/// Number of registered processors.
	#[inline]
	pub fn len(&self) -> usize {
		self.len
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Wire types with a registered processor, in tag order.
	pub fn wire_types(&self) -> impl Iterator<Item = WireType> + '_ {
		self.processors
			.iter()
			.filter_map(|processor| processor.as_ref().map(|processor| processor.wire_type()))
	}
}

impl fmt::Debug for Registry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.wire_types()).finish()
	}
}

/// Builder for a [`Registry`].
///
/// Registering a processor for a wire type which already has one replaces it.
pub struct RegistryBuilder {
	processors: Vec<Option<Arc<dyn Processor>>>,
}

impl RegistryBuilder {
	pub fn new() -> Self {
		Self {
			processors: vec![None; TAG_COUNT],
		}
	}

	pub fn register(mut self, processor: Box<dyn Processor>) -> Self {
		let tag = processor.wire_type().tag();
		self.processors[tag as usize] = Some(Arc::from(processor));
		self
	}

	/// Register processor for a built-in native kind.
	pub fn register_kind<T: Variant>(self) -> Self {
		self.register(Box::new(KindProcessor::<T>::new()))
	}

	/// Register processors for all built-in kinds.
	pub fn with_standard_kinds(self) -> Self {
		self.register_kind::<bool>()
			.register_kind::<u8>()
			.register_kind::<i8>()
			.register_kind::<i16>()
			.register_kind::<u16>()
			.register_kind::<i32>()
			.register_kind::<u32>()
			.register_kind::<i64>()
			.register_kind::<u64>()
			.register_kind::<f32>()
			.register_kind::<f64>()
			.register_kind::<Decimal>()
			.register_kind::<TimeSpan>()
			.register_kind::<isize>()
			.register_kind::<BitFlag>()
			.register_kind::<String>()
			.register_kind::<Vec<u8>>()
			.register_kind::<Vec<i16>>()
			.register_kind::<Vec<u16>>()
			.register_kind::<Vec<i32>>()
			.register_kind::<Vec<u32>>()
			.register_kind::<Vec<i64>>()
			.register_kind::<Vec<u64>>()
			.register_kind::<Vec<f32>>()
			.register_kind::<Vec<f64>>()
			.register_kind::<Vec<Decimal>>()
			.register_kind::<Vec<TimeSpan>>()
			.register_kind::<Vec<isize>>()
			.register_kind::<Vec<String>>()
			.register(Box::new(RecordProcessor))
			.register(Box::new(RecordArrayProcessor))
	}

	pub fn build(self) -> Registry {
		let len = self.processors.iter().filter(|processor| processor.is_some()).count();
		Registry {
			processors: self.processors,
			len,
		}
	}
}

impl Default for RegistryBuilder {
	fn default() -> Self {
		Self::new()
	}
}
