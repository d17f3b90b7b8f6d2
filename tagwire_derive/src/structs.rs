use proc_macro2::TokenStream;
use quote::{quote, quote_spanned};
use syn::{
	spanned::Spanned, DataStruct, Field, Fields, GenericArgument, Ident, Index, Lit, Meta, MetaList,
	NestedMeta, PathArguments, Type,
};

/// Options from a `#[field(...)]` attribute.
struct FieldOptions {
	id: u8,
	required: bool,
	omit_default: bool,
}

/// A serialized field.
struct WireField {
	/// `name` or tuple index
	accessor: TokenStream,
	name: String,
	options: FieldOptions,
	/// Type of value written. For `Option<T>` fields, this is `T`.
	value_type: Type,
	nullable: bool,
	span: proc_macro2::Span,
}

pub fn derive_record(data: DataStruct, ident: Ident) -> TokenStream {
	let mut fields: Vec<WireField> = match data.fields {
		Fields::Named(fields) => fields
			.named
			.iter()
			.filter_map(|field| {
				let field_name = field.ident.as_ref().expect("Missing field name");
				get_wire_field(quote! {#field_name}, field_name.to_string(), field)
			})
			.collect(),
		Fields::Unnamed(fields) => fields
			.unnamed
			.iter()
			.enumerate()
			.filter_map(|(index, field)| {
				let name = index.to_string();
				let index = Index::from(index);
				get_wire_field(quote! {#index}, name, field)
			})
			.collect(),
		Fields::Unit => vec![],
	};

	fields.sort_by_key(|field| field.options.id);
	for pair in fields.windows(2) {
		if pair[0].options.id == pair[1].options.id {
			panic!(
				"Attribute id {} used by both `{}` and `{}`",
				pair[0].options.id, pair[0].name, pair[1].name
			);
		}
	}

	let field_defs = fields.iter().map(get_field_def);
	let encode_arms = fields.iter().map(get_encode_arm);
	let decode_arms = fields.iter().map(get_decode_arm);

	quote! {
		#[automatically_derived]
		impl ::tagwire::Record for #ident {
			fn fields() -> &'static [::tagwire::FieldDef] {
				const FIELDS: &[::tagwire::FieldDef] = &[#(#field_defs),*];
				FIELDS
			}

			fn encode_field(
				&self,
				cx: &::tagwire::Codec<'_>,
				field: &::tagwire::FieldDef,
				proxy: &mut ::tagwire::BufferProxy,
			) -> ::tagwire::Result<()> {
				match field.id {
					#(#encode_arms)*
					id => Err(::tagwire::Error::UnknownAttribute { id }),
				}
			}

			fn decode_field(
				&mut self,
				cx: &::tagwire::Codec<'_>,
				field: &::tagwire::FieldDef,
				payload: &[u8],
			) -> ::tagwire::Result<()> {
				match field.id {
					#(#decode_arms)*
					id => Err(::tagwire::Error::UnknownAttribute { id }),
				}
			}
		}

		#[automatically_derived]
		impl ::tagwire::WireValue for #ident {
			const WIRE_TYPE: ::tagwire::WireType = ::tagwire::WireType::Record;

			fn encode_payload(
				&self,
				cx: &::tagwire::Codec<'_>,
				proxy: &mut ::tagwire::BufferProxy,
			) -> ::tagwire::Result<()> {
				proxy.write_length_prefixed(|proxy| cx.encode_record(self, proxy))
			}

			fn decode_payload(cx: &::tagwire::Codec<'_>, payload: &[u8]) -> ::tagwire::Result<Self> {
				cx.decode_record(payload)
			}
		}

		#[automatically_derived]
		impl ::tagwire::ArrayElement for #ident {
			const ARRAY_WIRE_TYPE: ::tagwire::WireType = ::tagwire::WireType::RecordArray;

			fn encode_elements(
				cx: &::tagwire::Codec<'_>,
				items: &[Self],
				proxy: &mut ::tagwire::BufferProxy,
			) -> ::tagwire::Result<()> {
				for item in items {
					::tagwire::WireValue::encode_payload(item, cx, proxy)?;
				}
				Ok(())
			}

			fn decode_elements(
				cx: &::tagwire::Codec<'_>,
				count: usize,
				body: &[u8],
			) -> ::tagwire::Result<::std::vec::Vec<Self>> {
				::tagwire::processor::decode_prefixed_elements(cx, count, body, |bytes| {
					cx.decode_record(bytes)
				})
			}
		}
	}
}

fn get_wire_field(accessor: TokenStream, name: String, field: &Field) -> Option<WireField> {
	let options = get_field_options(field, &name)?;
	let (value_type, nullable) = match option_inner_type(&field.ty) {
		Some(inner) => (inner.clone(), true),
		None => (field.ty.clone(), false),
	};
	Some(WireField {
		accessor,
		name,
		options,
		value_type,
		nullable,
		span: field.span(),
	})
}

fn get_field_def(field: &WireField) -> TokenStream {
	let WireField {
		name,
		value_type,
		nullable,
		span,
		..
	} = field;
	let FieldOptions {
		id,
		required,
		omit_default,
	} = field.options;
	quote_spanned! {*span=>
		::tagwire::FieldDef::new(
			#id,
			#name,
			<#value_type as ::tagwire::WireValue>::WIRE_TYPE,
			::tagwire::FieldPolicy {
				required: #required,
				nullable: #nullable,
				allow_default_omission: #omit_default,
			},
		)
	}
}

fn get_encode_arm(field: &WireField) -> TokenStream {
	let WireField {
		accessor,
		value_type,
		span,
		..
	} = field;
	let id = field.options.id;
	let value = if field.nullable {
		quote! {self.#accessor.as_ref()}
	} else {
		quote! {::std::option::Option::Some(&self.#accessor)}
	};
	quote_spanned! {*span=>
		#id => ::tagwire::processor::encode_attributed::<#value_type>(cx, proxy, field, #value),
	}
}

fn get_decode_arm(field: &WireField) -> TokenStream {
	let WireField {
		accessor,
		value_type,
		span,
		..
	} = field;
	let id = field.options.id;
	let populate = if field.nullable {
		quote! {decode_populate_nullable}
	} else {
		quote! {decode_populate}
	};
	quote_spanned! {*span=>
		#id => ::tagwire::processor::#populate::<#value_type>(
			cx, &mut self.#accessor, field, payload, 0, payload.len()
		),
	}
}

/// Parse `#[field(id = N, required, omit_default)]`.
/// Returns `None` if field has no `#[field]` attribute.
fn get_field_options(field: &Field, name: &str) -> Option<FieldOptions> {
	let attrs = field
		.attrs
		.iter()
		.filter(|attr| attr.path.is_ident("field"))
		.map(|attr| attr.parse_meta().expect("Malformed `field` attr"))
		.collect::<Vec<_>>();

	if attrs.is_empty() {
		return None;
	}
	if attrs.len() != 1 {
		panic!("Cannot have more than 1 `#[field]` attribute on field `{name}`");
	}

	let nested = match attrs.into_iter().next() {
		Some(Meta::List(MetaList { nested, .. })) => nested,
		_ => panic!("`#[field]` needs an id e.g. `#[field(id = 1)]`"),
	};

	let mut id: Option<u8> = None;
	let mut required = false;
	let mut omit_default = false;
	for meta in nested {
		match meta {
			NestedMeta::Meta(Meta::NameValue(name_value)) if name_value.path.is_ident("id") => {
				let parsed = match &name_value.lit {
					Lit::Int(lit) => lit
						.base10_parse::<u8>()
						.unwrap_or_else(|_| panic!("Attribute id of `{name}` must be in range 0-255")),
					_ => panic!("Attribute id of `{name}` must be an integer"),
				};
				if id.replace(parsed).is_some() {
					panic!("Attribute id of `{name}` given more than once");
				}
			}
			NestedMeta::Meta(Meta::Path(path)) if path.is_ident("required") => required = true,
			NestedMeta::Meta(Meta::Path(path)) if path.is_ident("omit_default") => omit_default = true,
			_ => panic!("Unknown option in `#[field]` on `{name}`. Expected `id = N`, `required` or `omit_default`."),
		}
	}

	let id = id.unwrap_or_else(|| panic!("`#[field]` on `{name}` needs an id e.g. `#[field(id = 1)]`"));
	Some(FieldOptions {
		id,
		required,
		omit_default,
	})
}

/// If `ty` is `Option<T>`, get `T`.
fn option_inner_type(ty: &Type) -> Option<&Type> {
	let path = match ty {
		Type::Path(type_path) if type_path.qself.is_none() => &type_path.path,
		_ => return None,
	};
	let segment = path.segments.last()?;
	if segment.ident != "Option" {
		return None;
	}
	match &segment.arguments {
		PathArguments::AngleBracketed(args) if args.args.len() == 1 => match args.args.first()? {
			GenericArgument::Type(inner) => Some(inner),
			_ => None,
		},
		_ => None,
	}
}
