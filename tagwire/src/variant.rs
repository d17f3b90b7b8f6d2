use std::{any, sync::Arc};

use crate::{
	container::{Container, Template},
	processor::WireValue,
	schema::FieldDef,
	types::{BitFlag, Decimal, TimeSpan},
	BufferProxy, Codec, Error, Result, WireType,
};

/// Built-in native kinds which can be held in a [`Value`].
pub trait Variant: WireValue {
	/// Wrap value (or its absence) in a variant of this kind.
	fn into_value(value: Option<Self>) -> Value;

	/// Borrow native value from a variant.
	///
	/// Returns `None` if variant is of another kind,
	/// `Some(None)` if it's of this kind but null.
	fn from_value(value: &Value) -> Option<Option<&Self>>;
}

/// Nested record held in a [`Value`], together with the template it is
/// decoded against.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordValue {
	template: Arc<Template>,
	value: Option<Container>,
}

impl RecordValue {
	#[inline]
	pub fn template(&self) -> &Arc<Template> {
		&self.template
	}

	#[inline]
	pub fn value(&self) -> Option<&Container> {
		self.value.as_ref()
	}
}

/// Array of nested records held in a [`Value`], together with the template
/// each element is decoded against.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordArrayValue {
	template: Arc<Template>,
	value: Option<Vec<Container>>,
}

impl RecordArrayValue {
	#[inline]
	pub fn template(&self) -> &Arc<Template> {
		&self.template
	}

	#[inline]
	pub fn value(&self) -> Option<&[Container]> {
		self.value.as_deref()
	}
}

macro_rules! values {
	($($kind:ident($ty:ty)),* $(,)?) => {
		/// A single native value, or its absence, tagged with its wire type.
		///
		/// A variant's kind never changes after construction.
		#[derive(Clone, Debug, PartialEq)]
		pub enum Value {
			$($kind(Option<$ty>),)*
			Record(RecordValue),
			RecordArray(RecordArrayValue),
		}

		impl Value {
			/// Wire type of this variant.
			pub fn wire_type(&self) -> WireType {
				match self {
					$(Value::$kind(_) => WireType::$kind,)*
					Value::Record(_) => WireType::Record,
					Value::RecordArray(_) => WireType::RecordArray,
				}
			}

			/// Whether variant holds no value.
			pub fn is_null(&self) -> bool {
				match self {
					$(Value::$kind(value) => value.is_none(),)*
					Value::Record(record) => record.value.is_none(),
					Value::RecordArray(records) => records.value.is_none(),
				}
			}

			/// Create a variant of the same kind with no value.
			///
			/// Nested record variants keep their template, so the result can be
			/// used as a placeholder to decode into.
			pub fn clone_empty(&self) -> Value {
				match self {
					$(Value::$kind(_) => Value::$kind(None),)*
					Value::Record(record) => Value::Record(RecordValue {
						template: Arc::clone(&record.template),
						value: None,
					}),
					Value::RecordArray(records) => Value::RecordArray(RecordArrayValue {
						template: Arc::clone(&records.template),
						value: None,
					}),
				}
			}

			/// Create empty placeholder variant for a wire type.
			///
			/// Returns `None` for nested record kinds, which need a template.
			/// Use [`Value::record_placeholder`] or
			/// [`Value::record_array_placeholder`] for those.
			pub fn placeholder(wire_type: WireType) -> Option<Value> {
				match wire_type {
					$(WireType::$kind => Some(Value::$kind(None)),)*
					WireType::Record | WireType::RecordArray => None,
				}
			}
		}

		$(
			impl Variant for $ty {
				#[inline]
				fn into_value(value: Option<Self>) -> Value {
					Value::$kind(value)
				}

				#[inline]
				fn from_value(value: &Value) -> Option<Option<&Self>> {
					match value {
						Value::$kind(value) => Some(value.as_ref()),
						_ => None,
					}
				}
			}

			impl From<$ty> for Value {
				#[inline]
				fn from(value: $ty) -> Self {
					Value::$kind(Some(value))
				}
			}

			impl From<Option<$ty>> for Value {
				#[inline]
				fn from(value: Option<$ty>) -> Self {
					Value::$kind(value)
				}
			}
		)*
	};
}

values! {
	Boolean(bool),
	Byte(u8),
	SByte(i8),
	Int16(i16),
	UInt16(u16),
	Int32(i32),
	UInt32(u32),
	Int64(i64),
	UInt64(u64),
	Float(f32),
	Double(f64),
	Decimal(Decimal),
	TimeSpan(TimeSpan),
	IntPtr(isize),
	BitFlag(BitFlag),
	String(String),
	ByteArray(Vec<u8>),
	Int16Array(Vec<i16>),
	UInt16Array(Vec<u16>),
	Int32Array(Vec<i32>),
	UInt32Array(Vec<u32>),
	Int64Array(Vec<i64>),
	UInt64Array(Vec<u64>),
	FloatArray(Vec<f32>),
	DoubleArray(Vec<f64>),
	DecimalArray(Vec<Decimal>),
	TimeSpanArray(Vec<TimeSpan>),
	IntPtrArray(Vec<isize>),
	StringArray(Vec<String>),
}

impl From<&str> for Value {
	#[inline]
	fn from(value: &str) -> Self {
		Value::String(Some(value.to_owned()))
	}
}

impl Value {
	/// Nested record variant. Its template is derived from `container`.
	pub fn record(container: Container) -> Value {
		Value::Record(RecordValue {
			template: Arc::new(Template::of(&container)),
			value: Some(container),
		})
	}

	/// Empty nested record variant, to decode against `template`.
	pub fn record_placeholder(template: impl Into<Arc<Template>>) -> Value {
		Value::Record(RecordValue {
			template: template.into(),
			value: None,
		})
	}

	/// Array of nested records, each decoded against `template`.
	pub fn record_array(template: impl Into<Arc<Template>>, items: Vec<Container>) -> Value {
		Value::RecordArray(RecordArrayValue {
			template: template.into(),
			value: Some(items),
		})
	}

	/// Empty array of nested records, to decode against `template`.
	pub fn record_array_placeholder(template: impl Into<Arc<Template>>) -> Value {
		Value::RecordArray(RecordArrayValue {
			template: template.into(),
			value: None,
		})
	}

	/// Borrow native value.
	///
	/// Fails with `TypeMismatch` if `T` is not this variant's native kind.
	/// `Ok(None)` if variant is null.
	pub fn get<T: Variant>(&self) -> Result<Option<&T>> {
		T::from_value(self).ok_or(Error::TypeMismatch {
			wire_type: self.wire_type(),
			requested: any::type_name::<T>(),
		})
	}

	/// Clone native value out of variant. Same checks as [`get`](Self::get).
	pub fn to<T: Variant + Clone>(&self) -> Result<Option<T>> {
		self.get::<T>().map(|value| value.cloned())
	}

	/// Nested record, if this is a non-null `Record` variant.
	pub fn as_record(&self) -> Option<&Container> {
		match self {
			Value::Record(record) => record.value(),
			_ => None,
		}
	}

	/// Nested records, if this is a non-null `RecordArray` variant.
	pub fn as_record_array(&self) -> Option<&[Container]> {
		match self {
			Value::RecordArray(records) => records.value(),
			_ => None,
		}
	}

	pub(crate) fn with_record(&self, container: Container) -> Option<Value> {
		match self {
			Value::Record(record) => Some(Value::Record(RecordValue {
				template: Arc::clone(&record.template),
				value: Some(container),
			})),
			_ => None,
		}
	}

	pub(crate) fn with_record_array(&self, items: Vec<Container>) -> Option<Value> {
		match self {
			Value::RecordArray(records) => Some(Value::RecordArray(RecordArrayValue {
				template: Arc::clone(&records.template),
				value: Some(items),
			})),
			_ => None,
		}
	}

	/// Write `[id][payload]` into `proxy` through the registered processor for
	/// this variant's wire type. Null variants write nothing.
	pub fn to_bytes(&self, cx: &Codec<'_>, id: u8, proxy: &mut BufferProxy) -> Result<()> {
		let field = FieldDef::attribute(id, self.wire_type());
		cx.registry()
			.get(self.wire_type().tag())?
			.encode_attributed(cx, proxy, &field, self)
	}

	/// Decode payload region `data[offset..offset + length]` as this
	/// variant's kind, storing result in `container` under `id`.
	pub fn to_data(
		&self,
		cx: &Codec<'_>,
		container: &mut Container,
		id: u8,
		data: &[u8],
		offset: usize,
		length: usize,
	) -> Result<()> {
		cx.registry()
			.get(self.wire_type().tag())?
			.decode_populate(cx, container, id, self, data, offset, length)
	}
}
