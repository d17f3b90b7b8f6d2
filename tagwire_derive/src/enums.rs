use proc_macro2::TokenStream;
use quote::quote;
use syn::{DataEnum, Fields, Ident};

pub fn derive_wire_enum(data: DataEnum, ident: Ident) -> TokenStream {
	let variants = data
		.variants
		.into_iter()
		.map(|variant| {
			if !matches!(variant.fields, Fields::Unit) {
				panic!(
					"`WireEnum` variant `{}::{}` has fields. Only fieldless enums are supported.",
					ident, variant.ident
				);
			}
			variant.ident
		})
		.collect::<Vec<_>>();

	let name = ident.to_string();
	let to_discriminant = quote! {
		match self {
			#(Self::#variants => Self::#variants as i32,)*
		}
	};

	quote! {
		#[automatically_derived]
		impl ::tagwire::WireValue for #ident {
			const WIRE_TYPE: ::tagwire::WireType = ::tagwire::WireType::Int32;

			fn is_default(&self) -> bool {
				let discriminant: i32 = #to_discriminant;
				discriminant == 0
			}

			fn encode_fixed(&self, dst: &mut [u8]) -> ::tagwire::Result<()> {
				let discriminant: i32 = #to_discriminant;
				::tagwire::WireValue::encode_fixed(&discriminant, dst)
			}

			fn encode_payload(
				&self,
				_cx: &::tagwire::Codec<'_>,
				proxy: &mut ::tagwire::BufferProxy,
			) -> ::tagwire::Result<()> {
				let discriminant: i32 = #to_discriminant;
				proxy.write_i32(discriminant);
				Ok(())
			}

			fn decode_payload(cx: &::tagwire::Codec<'_>, payload: &[u8]) -> ::tagwire::Result<Self> {
				let discriminant = <i32 as ::tagwire::WireValue>::decode_payload(cx, payload)?;
				#(
					if discriminant == Self::#variants as i32 {
						return Ok(Self::#variants);
					}
				)*
				Err(::tagwire::Error::malformed(::std::format!(
					"{} is not a discriminant of `{}`",
					discriminant, #name
				)))
			}
		}
	}
}
