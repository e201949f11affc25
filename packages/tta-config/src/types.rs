use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub filters: Filters,
	#[serde(default)]
	pub access: Access,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Filters {
	/// Longer value lists are truncated before dispatch.
	#[serde(default = "default_max_values_per_filter")]
	pub max_values_per_filter: usize,
	/// Single values longer than this are discarded.
	#[serde(default = "default_max_value_bytes")]
	pub max_value_bytes: usize,
	/// Topics removed from the registries, e.g. "goal.reportText".
	#[serde(default)]
	pub disabled_topics: Vec<String>,
}
impl Default for Filters {
	fn default() -> Self {
		Self {
			max_values_per_filter: default_max_values_per_filter(),
			max_value_bytes: default_max_value_bytes(),
			disabled_topics: Vec::new(),
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
pub struct Access {
	#[serde(default = "default_true")]
	pub enforce_region_filters: bool,
}
impl Default for Access {
	fn default() -> Self {
		Self { enforce_region_filters: true }
	}
}

fn default_max_values_per_filter() -> usize {
	64
}

fn default_max_value_bytes() -> usize {
	512
}

fn default_true() -> bool {
	true
}
