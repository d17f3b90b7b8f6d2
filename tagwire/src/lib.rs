//! Compact binary attribute-stream serialization.
//!
//! A record is written as a sequence of attributes `[id:1][payload]`, in
//! ascending id order. Payload of a fixed-width kind is its little-endian
//! bytes. Payload of any other kind is preceded by a 4-byte little-endian
//! length. The wire carries no type tags: the reader's schema decides how each
//! attribute id is framed.
//!
//! ```ignore
//! #[derive(Record, Default)]
//! struct Deploy {
//! 	#[field(id = 1, required)]
//! 	version: i32,
//! 	#[field(id = 2)]
//! 	name: Option<String>,
//! }
//!
//! let bytes = tagwire::encode(&deploy)?;
//! let deploy: Deploy = tagwire::decode(&bytes)?;
//! ```

#[cfg(feature = "derive")]
pub use tagwire_derive::{Record, WireEnum};

#[macro_use]
mod macros;

mod codec;
pub use codec::Codec;
mod config;
pub use config::Config;
mod error;
pub use error::{Error, Result};
mod pos;
pub use pos::Position;
mod proxy;
pub use proxy::{BufferProxy, BULK_COPY_THRESHOLD, INLINE_CAPACITY};
mod reader;
pub use reader::Reader;
mod registry;
pub use registry::{Registry, RegistryBuilder};
mod types;
pub use types::{BitFlag, Decimal, TimeSpan};
mod wire_type;
pub use wire_type::WireType;

pub mod container;
pub use container::{Container, Template};
pub mod primitives;
pub mod processor;
pub use processor::{ArrayElement, WireValue};
pub mod schema;
pub use schema::{FieldDef, FieldPolicy};
pub mod variant;
pub use variant::Value;

mod impls;

/// Types whose fields are serialized as an attribute stream.
///
/// Usually implemented with `#[derive(Record)]`.
pub trait Record: Default + Send + Sync + 'static {
	/// Declared fields.
	fn fields() -> &'static [FieldDef];

	/// Write `[id][payload]` for `field` into `proxy`, honoring its policy.
	fn encode_field(&self, cx: &Codec<'_>, field: &FieldDef, proxy: &mut BufferProxy) -> Result<()>;

	/// Decode framed `payload` of `field` into the field.
	fn decode_field(&mut self, cx: &Codec<'_>, field: &FieldDef, payload: &[u8]) -> Result<()>;
}

/// Encode record to bytes with the standard codec.
pub fn encode<R: Record>(record: &R) -> Result<Vec<u8>> {
	Codec::standard().encode(record)
}

/// Decode record from bytes with the standard codec.
pub fn decode<R: Record>(bytes: &[u8]) -> Result<R> {
	Codec::standard().decode(bytes)
}
