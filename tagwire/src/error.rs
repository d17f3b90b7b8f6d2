use std::borrow::Cow;

use crate::WireType;

/// Errors produced while encoding or decoding.
///
/// The codec never retries, and never hands back a partially populated value
/// alongside an error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	/// A required attribute was absent from the input when decoding,
	/// or had no value when encoding.
	#[error("required attribute {id} (`{name}`) has no value")]
	RequiredFieldMissing { id: u8, name: &'static str },

	/// A value variant was accessed as a native type other than its own.
	#[error("value of wire type {wire_type} cannot be accessed as `{requested}`")]
	TypeMismatch {
		wire_type: WireType,
		requested: &'static str,
	},

	/// Operation is not available for this wire type
	/// (e.g. fixed-width encoding of a length-prefixed kind).
	#[error("{operation} is not supported by wire type {wire_type}")]
	UnsupportedOperation {
		wire_type: WireType,
		operation: &'static str,
	},

	/// No processor is registered for this tag.
	#[error("unknown wire type tag {tag:#04x}")]
	UnknownWireType { tag: u8 },

	/// Attribute id is not declared by the record schema or template,
	/// so its payload cannot be framed.
	///
	/// The wire carries no per-attribute type tag, so an unrecognised leading
	/// byte of a stream is reported as this, not as `UnknownWireType`.
	/// `UnknownWireType` arises when a schema or template names a kind the
	/// registry has no processor for.
	#[error("attribute {id} is not declared")]
	UnknownAttribute { id: u8 },

	/// Payload is inconsistent with the declared lengths / counts,
	/// or with the native kind.
	#[error("malformed payload{}: {reason}", fmt_id(.id))]
	MalformedPayload {
		id: Option<u8>,
		reason: Cow<'static, str>,
	},

	/// Two fields of one record declare the same attribute id.
	#[error("attribute {id} is declared more than once in `{record}`")]
	DuplicateAttribute { id: u8, record: &'static str },
}

fn fmt_id(id: &Option<u8>) -> String {
	match id {
		Some(id) => format!(" in attribute {id}"),
		None => String::new(),
	}
}

impl Error {
	/// Create a `MalformedPayload` error not yet tied to an attribute.
	#[inline]
	pub fn malformed(reason: impl Into<Cow<'static, str>>) -> Self {
		Error::MalformedPayload {
			id: None,
			reason: reason.into(),
		}
	}

	/// Attach attribute id to a `MalformedPayload` error which has none yet.
	/// Other errors are returned unchanged.
	pub fn at(self, attr_id: u8) -> Self {
		match self {
			Error::MalformedPayload { id: None, reason } => Error::MalformedPayload {
				id: Some(attr_id),
				reason,
			},
			err => err,
		}
	}
}

pub type Result<T> = std::result::Result<T, Error>;
