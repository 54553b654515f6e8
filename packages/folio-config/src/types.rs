use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub search: Search,
	pub security: Security,
	#[serde(default)]
	pub metrics: Metrics,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
	#[serde(default = "default_body_limit_bytes")]
	pub body_limit_bytes: usize,
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

#[derive(Debug, Deserialize)]
pub struct Search {
	/// Hard ceiling on `offset + page_size` for the unified search. Each kind is fetched up to
	/// this many rows, so it bounds per-request memory.
	#[serde(default = "default_max_window")]
	pub max_window: u32,
}
impl Default for Search {
	fn default() -> Self {
		Self { max_window: default_max_window() }
	}
}

#[derive(Debug, Deserialize)]
pub struct Security {
	pub jwt_secret: String,
	/// Accepted in addition to `jwt_secret` while signing keys rotate.
	pub jwt_previous_secret: Option<String>,
	#[serde(default = "default_cors_origins")]
	pub cors_origins: Vec<String>,
	#[serde(default)]
	pub hsts_enabled: bool,
}

#[derive(Debug, Deserialize)]
pub struct Metrics {
	#[serde(default = "default_true")]
	pub enabled: bool,
}
impl Default for Metrics {
	fn default() -> Self {
		Self { enabled: true }
	}
}

fn default_body_limit_bytes() -> usize {
	1_048_576
}

fn default_max_window() -> u32 {
	1_000
}

fn default_cors_origins() -> Vec<String> {
	vec!["*".to_string()]
}

fn default_true() -> bool {
	true
}
