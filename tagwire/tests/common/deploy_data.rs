// Pseudo-random deployment protocol messages, for round-trip tests over
// realistic nested data

use std::ops;

use rand::Rng;
use rand_pcg::Lcg64Xsh32;
use tagwire::{BitFlag, Decimal, Record, TimeSpan, WireEnum};

#[derive(WireEnum, Clone, Copy, Debug, Default, PartialEq)]
pub enum ServiceState {
	#[default]
	Unknown = 0,
	Starting = 1,
	Running = 2,
	Stopping = 3,
	Faulted = -1,
}

impl Generate for ServiceState {
	fn generate<R: Rng>(rng: &mut R) -> Self {
		match rng.gen_range(0..5) {
			0 => ServiceState::Unknown,
			1 => ServiceState::Starting,
			2 => ServiceState::Running,
			3 => ServiceState::Stopping,
			4 => ServiceState::Faulted,
			_ => unreachable!(),
		}
	}
}

#[derive(Record, Clone, Debug, Default, PartialEq)]
pub struct Header {
	#[field(id = 1, required)]
	pub protocol_id: i32,
	#[field(id = 2, required)]
	pub message_id: u64,
	#[field(id = 3)]
	pub session: Option<String>,
	#[field(id = 4, omit_default)]
	pub sent_at: TimeSpan,
}

impl Generate for Header {
	fn generate<R: Rng>(rng: &mut R) -> Self {
		Self {
			protocol_id: rng.gen_range(1..32),
			message_id: rng.gen(),
			session: <Option<()> as Generate>::generate(rng).map(|_| format!("session-{:08x}", rng.gen::<u32>())),
			sent_at: TimeSpan::from_ticks(rng.gen_range(0..i64::MAX / 2)),
		}
	}
}

#[derive(Record, Clone, Debug, Default, PartialEq)]
pub struct KeyDataRequest {
	#[field(id = 0, required)]
	pub header: Header,
	#[field(id = 11, required)]
	pub database_name: String,
	#[field(id = 12, required)]
	pub table_name: String,
	#[field(id = 13, required)]
	pub column_names: Vec<String>,
	#[field(id = 14, required)]
	pub search_keys: Vec<String>,
}

impl Generate for KeyDataRequest {
	fn generate<R: Rng>(rng: &mut R) -> Self {
		const DATABASES: [&str; 3] = ["config", "deploy", "metrics"];
		const TABLES: [&str; 4] = ["services", "hosts", "packages", "services;hosts"];
		const COLUMNS: [&str; 6] = ["id", "name", "version", "host", "state", "updated"];
		const MAX_COLUMNS: usize = 6;
		const MAX_KEYS: usize = 40;
		Self {
			header: Header::generate(rng),
			database_name: pick(rng, &DATABASES),
			table_name: pick(rng, &TABLES),
			column_names: generate_vec::<_, ()>(rng, 0..MAX_COLUMNS)
				.iter()
				.map(|_| pick(rng, &COLUMNS))
				.collect(),
			search_keys: generate_vec::<_, u32>(rng, 0..MAX_KEYS)
				.iter()
				.map(|key| format!("key-{key}"))
				.collect(),
		}
	}
}

#[derive(Record, Clone, Debug, Default, PartialEq)]
pub struct Package {
	#[field(id = 1, required)]
	pub name: String,
	#[field(id = 2)]
	pub version: u32,
	#[field(id = 3)]
	pub size: u64,
	#[field(id = 4)]
	pub checksum: Vec<u8>,
	#[field(id = 5, omit_default)]
	pub price: Decimal,
}

impl Generate for Package {
	fn generate<R: Rng>(rng: &mut R) -> Self {
		const NAMES: [&str; 6] = ["agent", "gateway", "scheduler", "cache", "indexer", "monitor"];
		Self {
			name: pick(rng, &NAMES),
			version: rng.gen(),
			size: rng.gen_range(0..1 << 32),
			checksum: generate_vec(rng, 32..33),
			price: Decimal::new(rng.gen_range(-1_000_000..1_000_000), rng.gen_range(0..=4)).unwrap(),
		}
	}
}

#[derive(Record, Clone, Debug, Default, PartialEq)]
pub struct ServiceStatus {
	#[field(id = 1, required)]
	pub service: String,
	#[field(id = 2)]
	pub state: ServiceState,
	#[field(id = 3)]
	pub uptime: TimeSpan,
	#[field(id = 4)]
	pub cpu_load: f32,
	#[field(id = 5)]
	pub memory: i64,
	#[field(id = 6)]
	pub options: BitFlag,
	#[field(id = 7)]
	pub latencies: Vec<f64>,
	#[field(id = 8)]
	pub restarts: Vec<TimeSpan>,
	#[field(id = 9)]
	pub handle: isize,
	#[field(id = 10)]
	pub last_error: Option<String>,
}

impl Generate for ServiceStatus {
	fn generate<R: Rng>(rng: &mut R) -> Self {
		const SERVICES: [&str; 5] = ["agent", "gateway", "scheduler", "cache", "indexer"];
		const MAX_LATENCIES: usize = 64;
		const MAX_RESTARTS: usize = 12;
		Self {
			service: pick(rng, &SERVICES),
			state: ServiceState::generate(rng),
			uptime: TimeSpan::from_ticks(rng.gen()),
			cpu_load: rng.gen(),
			memory: rng.gen(),
			options: BitFlag::from_bits(rng.gen()),
			latencies: generate_vec(rng, 0..MAX_LATENCIES),
			restarts: generate_vec::<_, i64>(rng, 0..MAX_RESTARTS)
				.into_iter()
				.map(TimeSpan::from_ticks)
				.collect(),
			handle: rng.gen(),
			last_error: <Option<()> as Generate>::generate(rng).map(|_| "connection reset".to_string()),
		}
	}
}

#[derive(Record, Clone, Debug, Default, PartialEq)]
pub struct DeployReport {
	#[field(id = 0, required)]
	pub header: Header,
	#[field(id = 1)]
	pub host: String,
	#[field(id = 2)]
	pub packages: Vec<Package>,
	#[field(id = 3)]
	pub statuses: Vec<ServiceStatus>,
	#[field(id = 4)]
	pub request: Option<KeyDataRequest>,
	#[field(id = 5)]
	pub ports: Vec<u16>,
	#[field(id = 6)]
	pub counters: Vec<i32>,
}

impl Generate for DeployReport {
	fn generate<R: Rng>(rng: &mut R) -> Self {
		const MAX_PACKAGES: usize = 20;
		const MAX_STATUSES: usize = 15;
		const MAX_PORTS: usize = 24;
		Self {
			header: Header::generate(rng),
			host: format!("host-{:03}.deploy.local", rng.gen_range(0..1000)),
			packages: generate_vec(rng, 0..MAX_PACKAGES),
			statuses: generate_vec(rng, 0..MAX_STATUSES),
			request: <Option<KeyDataRequest> as Generate>::generate(rng),
			ports: generate_vec(rng, 0..MAX_PORTS),
			counters: generate_vec(rng, 0..MAX_PORTS),
		}
	}
}

#[derive(Record, Clone, Debug, Default, PartialEq)]
pub struct DeployReports {
	#[field(id = 1)]
	pub reports: Vec<DeployReport>,
}

pub trait Generate {
	fn generate<R: Rng>(rng: &mut R) -> Self;
}

impl Generate for () {
	fn generate<R: Rng>(_: &mut R) -> Self {}
}

macro_rules! impl_generate {
	($ty:ty) => {
		impl Generate for $ty {
			fn generate<R: Rng>(rng: &mut R) -> Self {
				rng.gen()
			}
		}
	};
}

impl_generate!(u8);
impl_generate!(u16);
impl_generate!(u32);
impl_generate!(i32);
impl_generate!(i64);
impl_generate!(f64);

impl<T: Generate> Generate for Option<T> {
	fn generate<R: Rng>(rng: &mut R) -> Self {
		if rng.gen_bool(0.5) {
			Some(T::generate(rng))
		} else {
			None
		}
	}
}

fn pick<R: Rng>(rng: &mut R, choices: &[&str]) -> String {
	choices[rng.gen_range(0..choices.len())].to_string()
}

fn generate_vec<R: Rng, T: Generate>(rng: &mut R, range: ops::Range<usize>) -> Vec<T> {
	let len = rng.gen_range(range);
	let mut result = Vec::with_capacity(len);
	for _ in 0..len {
		result.push(T::generate(rng));
	}
	result
}

pub fn generate_data() -> DeployReports {
	const STATE: u64 = 3141592653;
	const STREAM: u64 = 5897932384;

	let mut rng = Lcg64Xsh32::new(STATE, STREAM);

	const REPORTS: usize = 100;
	DeployReports {
		reports: generate_vec::<_, DeployReport>(&mut rng, REPORTS..REPORTS + 1),
	}
}
