#![allow(dead_code)]

mod deploy_data;
pub use deploy_data::{
	generate_data as generate_deploy_data, DeployReport, Header, KeyDataRequest, ServiceState,
};

/// Round-trip tests, run against a `$test_round_trip` function which encodes
/// a record, decodes the output, and checks the two are equal.
macro_rules! tests {
	($test_round_trip:ident) => {
		#[test]
		fn scalars() {
			#[derive(Record, Clone, Default, Debug, PartialEq)]
			struct Foo {
				#[field(id = 1)]
				bool: bool,
				#[field(id = 2)]
				u8: u8,
				#[field(id = 3)]
				i8: i8,
				#[field(id = 4)]
				i16: i16,
				#[field(id = 5)]
				u16: u16,
				#[field(id = 6)]
				i32: i32,
				#[field(id = 7)]
				u32: u32,
				#[field(id = 8)]
				i64: i64,
				#[field(id = 9)]
				u64: u64,
				#[field(id = 10)]
				f32: f32,
				#[field(id = 11)]
				f64: f64,
				#[field(id = 12)]
				decimal: Decimal,
				#[field(id = 13)]
				time_span: TimeSpan,
				#[field(id = 14)]
				isize: isize,
				#[field(id = 15)]
				bit_flag: BitFlag,
			}

			$test_round_trip(&Foo {
				bool: true,
				u8: 0x01,
				i8: -0x02,
				i16: -0x0304,
				u16: 0x0506,
				i32: -0x0708090a,
				u32: 0x0b0c0d0e,
				i64: -0x0f10111213141516,
				u64: 0x1718191a1b1c1d1e,
				f32: f32::MAX,
				f64: f64::MIN_POSITIVE,
				decimal: Decimal::new(-123_456_789_012_345, 6).unwrap(),
				time_span: TimeSpan::from_secs(-90).unwrap(),
				isize: isize::MIN / 2,
				bit_flag: BitFlag::from_bits(0b1010_0101),
			});
			$test_round_trip(&Foo::default());
		}

		#[test]
		fn extreme_values() {
			#[derive(Record, Clone, Default, Debug, PartialEq)]
			struct Foo {
				#[field(id = 1)]
				min: i64,
				#[field(id = 2)]
				max: u64,
				#[field(id = 3)]
				neg_zero: f64,
				#[field(id = 4)]
				infinity: f32,
				#[field(id = 5)]
				decimal: Decimal,
			}

			$test_round_trip(&Foo {
				min: i64::MIN,
				max: u64::MAX,
				neg_zero: -0.0,
				infinity: f32::NEG_INFINITY,
				decimal: Decimal::new((1 << 96) - 1, 28).unwrap(),
			});
		}

		#[test]
		fn strings() {
			#[derive(Record, Clone, Default, Debug, PartialEq)]
			struct Foo {
				#[field(id = 1)]
				ascii: String,
				#[field(id = 2)]
				empty: String,
				#[field(id = 3)]
				multi_byte: String,
			}

			$test_round_trip(&Foo {
				ascii: "abc".to_string(),
				empty: String::new(),
				multi_byte: "héllo, 世界 🦀".to_string(),
			});
		}

		#[test]
		fn arrays() {
			#[derive(Record, Clone, Default, Debug, PartialEq)]
			struct Foo {
				#[field(id = 1)]
				i16: Vec<i16>,
				#[field(id = 2)]
				u16: Vec<u16>,
				#[field(id = 3)]
				i32: Vec<i32>,
				#[field(id = 4)]
				u32: Vec<u32>,
				#[field(id = 5)]
				i64: Vec<i64>,
				#[field(id = 6)]
				u64: Vec<u64>,
				#[field(id = 7)]
				f32: Vec<f32>,
				#[field(id = 8)]
				f64: Vec<f64>,
				#[field(id = 9)]
				decimal: Vec<Decimal>,
				#[field(id = 10)]
				time_span: Vec<TimeSpan>,
				#[field(id = 11)]
				isize: Vec<isize>,
			}

			// Either side of block copy threshold
			for len in [0, 1, 2, 9, 10, 11, 12, 100] {
				$test_round_trip(&Foo {
					i16: (0..len).map(|i| -(i as i16)).collect(),
					u16: (0..len).map(|i| i as u16 * 3).collect(),
					i32: (0..len).map(|i| i as i32 - 50).collect(),
					u32: (0..len).map(|i| u32::MAX - i as u32).collect(),
					i64: (0..len).map(|i| i64::MIN + i as i64).collect(),
					u64: (0..len).map(|i| (i as u64) << 40).collect(),
					f32: (0..len).map(|i| i as f32 / 3.0).collect(),
					f64: (0..len).map(|i| -(i as f64) * 1.5).collect(),
					decimal: (0..len).map(|i| Decimal::new(i as i128 * 1001, 2).unwrap()).collect(),
					time_span: (0..len).map(|i| TimeSpan::from_ticks(i as i64 - 5)).collect(),
					isize: (0..len).map(|i| i as isize * -7).collect(),
				});
			}
		}

		#[test]
		fn arrays_of_zeros() {
			#[derive(Record, Clone, Default, Debug, PartialEq)]
			struct Foo {
				#[field(id = 1, omit_default)]
				ints: Vec<i32>,
				#[field(id = 2, omit_default)]
				floats: Vec<f64>,
			}

			$test_round_trip(&Foo {
				ints: vec![0; 5],
				floats: vec![0.0; 20],
			});
		}

		#[test]
		fn byte_arrays() {
			#[derive(Record, Clone, Default, Debug, PartialEq)]
			struct Foo {
				#[field(id = 1)]
				empty: Vec<u8>,
				#[field(id = 2)]
				small: Vec<u8>,
				#[field(id = 3)]
				big: Vec<u8>,
			}

			$test_round_trip(&Foo {
				empty: vec![],
				small: vec![0x01, 0x02, 0x03],
				big: (0..=255).collect(),
			});
		}

		#[test]
		fn string_arrays() {
			#[derive(Record, Clone, Default, Debug, PartialEq)]
			struct Foo {
				#[field(id = 1)]
				empty: Vec<String>,
				#[field(id = 2)]
				strings: Vec<String>,
			}

			$test_round_trip(&Foo {
				empty: vec![],
				strings: vec!["id".to_string(), String::new(), "名前".to_string(), "state".to_string()],
			});
		}

		#[test]
		fn options() {
			#[derive(Record, Clone, Default, Debug, PartialEq)]
			struct Foo {
				#[field(id = 1)]
				int: Option<i32>,
				#[field(id = 2)]
				str: Option<String>,
				#[field(id = 3)]
				vec: Option<Vec<u64>>,
				#[field(id = 4)]
				bar: Option<Bar>,
			}

			#[derive(Record, Clone, Default, Debug, PartialEq)]
			struct Bar {
				#[field(id = 1)]
				small: u8,
				#[field(id = 2)]
				big: u32,
			}

			$test_round_trip(&Foo::default());
			$test_round_trip(&Foo {
				int: Some(0),
				str: Some(String::new()),
				vec: Some(vec![]),
				bar: Some(Bar::default()),
			});
			$test_round_trip(&Foo {
				int: Some(-1),
				str: Some("def".to_string()),
				vec: Some(vec![1, 2, 3]),
				bar: Some(Bar {
					small: 0x04,
					big: 0x0506,
				}),
			});
		}

		#[test]
		fn omitted_defaults() {
			#[derive(Record, Clone, Default, Debug, PartialEq)]
			struct Foo {
				#[field(id = 1, omit_default)]
				int: i32,
				#[field(id = 2, omit_default)]
				float: f64,
				#[field(id = 3, omit_default)]
				flag: bool,
				#[field(id = 4, omit_default)]
				span: TimeSpan,
				#[field(id = 5, omit_default)]
				str: String,
			}

			$test_round_trip(&Foo::default());
			$test_round_trip(&Foo {
				int: 7,
				float: 0.5,
				flag: true,
				span: TimeSpan::from_ticks(1),
				str: String::new(),
			});
		}

		#[test]
		fn nested_records() {
			#[derive(Record, Clone, Default, Debug, PartialEq)]
			struct Foo {
				#[field(id = 1)]
				bar: Bar,
				#[field(id = 2)]
				bars: Vec<Bar>,
				#[field(id = 3)]
				empty: Vec<Bar>,
			}

			#[derive(Record, Clone, Default, Debug, PartialEq)]
			struct Bar {
				#[field(id = 1)]
				name: String,
				#[field(id = 2)]
				qux: Qux,
			}

			#[derive(Record, Clone, Default, Debug, PartialEq)]
			struct Qux {
				#[field(id = 7, required)]
				values: Vec<i32>,
			}

			let bar = |name: &str, len: i32| Bar {
				name: name.to_string(),
				qux: Qux {
					values: (0..len).collect(),
				},
			};

			$test_round_trip(&Foo {
				bar: bar("first", 3),
				bars: vec![bar("a", 0), bar("b", 11), Bar::default()],
				empty: vec![],
			});
		}

		#[test]
		fn sparse_ids() {
			#[derive(Record, Clone, Default, Debug, PartialEq)]
			struct Foo {
				#[field(id = 255)]
				last: u8,
				#[field(id = 0)]
				first: u8,
				#[field(id = 128)]
				middle: String,
				not_serialized: u32,
			}

			$test_round_trip(&Foo {
				last: 0xff,
				first: 0x01,
				middle: "m".to_string(),
				not_serialized: 0,
			});
		}

		#[test]
		fn tuple_struct() {
			#[derive(Record, Clone, Default, Debug, PartialEq)]
			struct Foo(#[field(id = 1)] u32, #[field(id = 2)] String);

			$test_round_trip(&Foo(0x01020304, "tuple".to_string()));
		}

		#[test]
		fn enums() {
			#[derive(Record, Clone, Default, Debug, PartialEq)]
			struct Foo {
				#[field(id = 1)]
				state: ServiceState,
				#[field(id = 2)]
				previous: Option<ServiceState>,
			}

			$test_round_trip(&Foo {
				state: ServiceState::Faulted,
				previous: Some(ServiceState::Running),
			});
			$test_round_trip(&Foo::default());
		}

		#[test]
		fn key_data_request() {
			let request = KeyDataRequest {
				header: Header {
					protocol_id: 4,
					message_id: 1,
					session: None,
					sent_at: TimeSpan::ZERO,
				},
				database_name: "deploy".to_string(),
				table_name: "services;hosts".to_string(),
				column_names: vec!["id".to_string(), "name".to_string()],
				search_keys: vec!["agent".to_string()],
			};
			$test_round_trip(&request);
		}

		#[test]
		fn deploy_data() {
			let input = generate_deploy_data();
			$test_round_trip(&input);
		}
	};
}

pub(crate) use tests;
