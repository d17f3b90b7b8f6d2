use syn::{parse_macro_input, Data, DeriveInput};

mod structs;
use structs::derive_record;
mod enums;
use enums::derive_wire_enum;

/// Derive `Record`, `WireValue` and `ArrayElement` for a struct.
///
/// Serialized fields are marked `#[field(id = N)]`, optionally with
/// `required` and / or `omit_default`. `Option<T>` fields are nullable.
/// Fields with no `#[field]` attribute are skipped, and take their default
/// value when decoding.
#[proc_macro_derive(Record, attributes(field))]
pub fn record(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
	let input = parse_macro_input!(input as DeriveInput);
	record_impl(input).into()
}

fn record_impl(input: DeriveInput) -> proc_macro2::TokenStream {
	if !input.generics.params.is_empty() {
		panic!("Deriving `Record` on generic types not supported");
	}

	match input.data {
		Data::Struct(data) => derive_record(data, input.ident),
		Data::Enum(_) => panic!("Deriving `Record` on enums not supported. Use `WireEnum` for fieldless enums."),
		Data::Union(_) => panic!("Deriving `Record` on unions not supported"),
	}
}

/// Derive `WireValue` for a fieldless enum, written as its `i32` discriminant.
#[proc_macro_derive(WireEnum)]
pub fn wire_enum(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
	let input = parse_macro_input!(input as DeriveInput);
	wire_enum_impl(input).into()
}

fn wire_enum_impl(input: DeriveInput) -> proc_macro2::TokenStream {
	if !input.generics.params.is_empty() {
		panic!("Deriving `WireEnum` on generic types not supported");
	}

	match input.data {
		Data::Enum(data) => derive_wire_enum(data, input.ident),
		_ => panic!("`WireEnum` can only be derived on enums"),
	}
}
