use tagwire::{
	processor::{decode_standalone, encode_fixed},
	BitFlag, BufferProxy, Codec, Decimal, Record, TimeSpan, BULK_COPY_THRESHOLD,
};

#[derive(Record, Default, Debug, PartialEq)]
struct Simple {
	#[field(id = 1)]
	number: i32,
	#[field(id = 2)]
	text: String,
}

#[derive(Record, Default, Debug, PartialEq)]
struct Omitting {
	#[field(id = 1, omit_default)]
	number: i32,
}

#[test]
fn int_and_string() {
	let bytes = tagwire::encode(&Simple {
		number: 42,
		text: "hi".to_string(),
	})
	.unwrap();
	assert_eq!(
		bytes,
		[0x01, 0x2A, 0x00, 0x00, 0x00, 0x02, 0x02, 0x00, 0x00, 0x00, b'h', b'i']
	);
}

#[test]
fn default_omitted() {
	let bytes = tagwire::encode(&Omitting { number: 0 }).unwrap();
	assert!(bytes.is_empty());

	let decoded: Omitting = tagwire::decode(&bytes).unwrap();
	assert_eq!(decoded, Omitting { number: 0 });

	let bytes = tagwire::encode(&Omitting { number: 1 }).unwrap();
	assert_eq!(bytes, [0x01, 0x01, 0x00, 0x00, 0x00]);
}

#[test]
fn required_beats_omit_default() {
	#[derive(Record, Default)]
	struct Foo {
		#[field(id = 3, required, omit_default)]
		number: u16,
	}

	let bytes = tagwire::encode(&Foo { number: 0 }).unwrap();
	assert_eq!(bytes, [0x03, 0x00, 0x00]);
}

#[test]
fn absent_nullable_not_written() {
	#[derive(Record, Default)]
	struct Foo {
		#[field(id = 1)]
		a: Option<i64>,
		#[field(id = 2)]
		b: Option<String>,
		#[field(id = 3)]
		c: Option<u8>,
	}

	let bytes = tagwire::encode(&Foo {
		a: None,
		b: None,
		c: Some(7),
	})
	.unwrap();
	assert_eq!(bytes, [0x03, 0x07]);
}

#[test]
fn empty_string_is_zero_length() {
	let bytes = tagwire::encode(&Simple::default()).unwrap();
	assert_eq!(bytes, [0x01, 0, 0, 0, 0, 0x02, 0, 0, 0, 0]);
}

#[test]
fn fields_written_in_id_order() {
	#[derive(Record, Default)]
	struct Foo {
		#[field(id = 9)]
		z: u8,
		#[field(id = 2)]
		a: u8,
		#[field(id = 5)]
		m: u8,
	}

	let bytes = tagwire::encode(&Foo { z: 3, a: 1, m: 2 }).unwrap();
	assert_eq!(bytes, [0x02, 1, 0x05, 2, 0x09, 3]);
}

#[test]
fn fixed_width_kinds() {
	#[derive(Record, Default)]
	struct Foo {
		#[field(id = 1)]
		flag: bool,
		#[field(id = 2)]
		signed: i8,
		#[field(id = 3)]
		double: f64,
		#[field(id = 4)]
		decimal: Decimal,
		#[field(id = 5)]
		span: TimeSpan,
		#[field(id = 6)]
		ptr: isize,
		#[field(id = 7)]
		flags: BitFlag,
	}

	let bytes = tagwire::encode(&Foo {
		flag: true,
		signed: -1,
		double: 1.0,
		decimal: Decimal::new(-15, 1).unwrap(),
		span: TimeSpan::from_millis(1).unwrap(),
		ptr: -2,
		flags: BitFlag::default().with(0, true).with(7, true),
	})
	.unwrap();

	let mut expected = vec![0x01, 0x01, 0x02, 0xFF, 0x03];
	expected.extend_from_slice(&1.0f64.to_le_bytes());
	expected.push(0x04);
	expected.extend_from_slice(&[15, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x00, 0x00, 0x01, 0x80]);
	expected.push(0x05);
	expected.extend_from_slice(&10_000i64.to_le_bytes());
	expected.push(0x06);
	expected.extend_from_slice(&(-2i64).to_le_bytes());
	expected.extend_from_slice(&[0x07, 0b1000_0001]);
	assert_eq!(bytes, expected);
}

#[test]
fn array_layouts() {
	#[derive(Record, Default)]
	struct Foo {
		#[field(id = 1)]
		ints: Vec<i32>,
		#[field(id = 2)]
		bytes: Vec<u8>,
		#[field(id = 3)]
		strings: Vec<String>,
	}

	let bytes = tagwire::encode(&Foo {
		ints: vec![0, 0, 0],
		bytes: vec![0xAA, 0xBB],
		strings: vec!["ab".to_string(), String::new()],
	})
	.unwrap();

	#[rustfmt::skip]
	let expected = [
		// Fixed-width array: [len][count][elements], zeros still written
		0x01, 16, 0, 0, 0, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
		// Byte array: [len][bytes], no count
		0x02, 2, 0, 0, 0, 0xAA, 0xBB,
		// String array: [len][count]{[len][utf8]}
		0x03, 14, 0, 0, 0, 2, 0, 0, 0, 2, 0, 0, 0, b'a', b'b', 0, 0, 0, 0,
	];
	assert_eq!(bytes, expected);
}

#[test]
fn empty_arrays() {
	#[derive(Record, Default)]
	struct Foo {
		#[field(id = 1, omit_default)]
		ints: Vec<u64>,
		#[field(id = 2)]
		bytes: Vec<u8>,
	}

	let bytes = tagwire::encode(&Foo::default()).unwrap();
	assert_eq!(bytes, [0x01, 4, 0, 0, 0, 0, 0, 0, 0, 0x02, 0, 0, 0, 0]);
}

#[test]
fn nested_record_layouts() {
	#[derive(Record, Default)]
	struct Outer {
		#[field(id = 1)]
		inner: Inner,
		#[field(id = 2)]
		inners: Vec<Inner>,
	}

	#[derive(Record, Default)]
	struct Inner {
		#[field(id = 5, omit_default)]
		value: u16,
	}

	let bytes = tagwire::encode(&Outer {
		inner: Inner { value: 0x0102 },
		inners: vec![Inner { value: 0 }, Inner { value: 3 }],
	})
	.unwrap();

	#[rustfmt::skip]
	let expected = [
		0x01, 3, 0, 0, 0, 0x05, 0x02, 0x01,
		// [len][count]{[len][stream]}, first element's stream is empty
		0x02, 15, 0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 3, 0, 0, 0, 0x05, 0x03, 0x00,
	];
	assert_eq!(bytes, expected);
}

#[test]
fn array_threshold_boundary() {
	assert_eq!(BULK_COPY_THRESHOLD, 10);

	for len in [0, 1, 9, 10, 11, 12, 64] {
		let items = (0..len).map(|i| i as u32 * 0x01010101).collect::<Vec<u32>>();

		let mut chosen = BufferProxy::new();
		chosen.write_array(&items);
		let mut elements = BufferProxy::new();
		elements.write_elements(&items);
		let mut block = BufferProxy::new();
		block.write_block(&items);

		assert_eq!(chosen.as_slice(), elements.as_slice());
		assert_eq!(block.as_slice(), elements.as_slice());
		assert_eq!(elements.len(), len * 4);
	}
}

#[test]
fn array_record_matches_element_reference() {
	#[derive(Record, Default)]
	struct Foo {
		#[field(id = 1)]
		values: Vec<i64>,
	}

	for len in [10usize, 11] {
		let values = (0..len as i64).map(|i| i - 3).collect::<Vec<_>>();
		let bytes = tagwire::encode(&Foo {
			values: values.clone(),
		})
		.unwrap();

		let mut expected = vec![0x01];
		expected.extend_from_slice(&((4 + len * 8) as i32).to_le_bytes());
		expected.extend_from_slice(&(len as i32).to_le_bytes());
		for value in &values {
			expected.extend_from_slice(&value.to_le_bytes());
		}
		assert_eq!(bytes, expected);
	}
}

#[test]
fn fixed_encode_at_offset() {
	let mut dst = [0xEEu8; 8];
	encode_fixed(&mut dst, 2, &0x0A0B0C0Du32).unwrap();
	assert_eq!(dst, [0xEE, 0xEE, 0x0D, 0x0C, 0x0B, 0x0A, 0xEE, 0xEE]);

	encode_fixed(&mut dst, 0, &true).unwrap();
	assert_eq!(dst[0], 0x01);
}

#[test]
fn standalone_decode() {
	let cx = Codec::standard();
	let data = [0xFF, 0x2A, 0x00, 0x00, 0x00, 0xFF];

	// Fixed-width kinds ignore the given length
	let value: i32 = decode_standalone(&cx, &data, 1, 0).unwrap();
	assert_eq!(value, 42);

	let data = [0x00, b'a', b'b', b'c'];
	let value: String = decode_standalone(&cx, &data, 1, 3).unwrap();
	assert_eq!(value, "abc");

	let value: String = decode_standalone(&cx, &data, 4, 0).unwrap();
	assert_eq!(value, "");
}

#[test]
fn proxy_write_back() {
	let mut proxy = BufferProxy::new();
	proxy.write_u8(0x07);
	let pos = proxy.position();
	proxy.skip(4);
	proxy.write_str("abc");
	proxy.write_back_length(pos).unwrap();
	assert_eq!(proxy.as_slice(), [0x07, 3, 0, 0, 0, b'a', b'b', b'c']);

	proxy.write_back_i32(pos, -1);
	assert_eq!(&proxy.as_slice()[1..5], [0xFF; 4]);
}

#[test]
fn proxy_spills_to_heap() {
	let mut proxy = BufferProxy::new();
	proxy.write_bytes(&[0; tagwire::INLINE_CAPACITY]);
	assert!(!proxy.spilled());
	proxy.write_u8(0);
	assert!(proxy.spilled());
	assert_eq!(proxy.len(), tagwire::INLINE_CAPACITY + 1);
}
