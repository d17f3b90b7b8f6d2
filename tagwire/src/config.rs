/// Codec settings.
///
/// Limits apply to declared lengths and counts read from input, and are
/// checked before anything is allocated for them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
	/// Capacity reserved by the encode buffer up front.
	/// 0 stays in inline storage until output outgrows it.
	pub initial_capacity: usize,
	/// Largest accepted payload length.
	pub max_payload_len: usize,
	/// Largest accepted array element count.
	pub max_array_len: usize,
	/// Deepest accepted nesting of records, counting the outermost as 1.
	pub max_depth: usize,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			initial_capacity: 0,
			max_payload_len: i32::MAX as usize,
			max_array_len: i32::MAX as usize,
			max_depth: 64,
		}
	}
}

impl Config {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
		self.initial_capacity = initial_capacity;
		self
	}

	pub fn with_max_payload_len(mut self, max_payload_len: usize) -> Self {
		self.max_payload_len = max_payload_len;
		self
	}

	pub fn with_max_array_len(mut self, max_array_len: usize) -> Self {
		self.max_array_len = max_array_len;
		self
	}

	pub fn with_max_depth(mut self, max_depth: usize) -> Self {
		self.max_depth = max_depth;
		self
	}
}
