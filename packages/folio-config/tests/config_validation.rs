use std::path::Path;

use toml::Value;

use folio_config::{Config, Error};

const SAMPLE_CONFIG_TOML: &str = include_str!("fixtures/sample_config.toml");

fn sample_with(section: &str, key: &str, value: Value) -> String {
	let mut root: Value = toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.");
	let mut table = root.as_table_mut().expect("Sample config must be a table.");

	for part in section.split('.') {
		table = table
			.get_mut(part)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Sample config must include [{section}]."));
	}

	table.insert(key.to_string(), value);

	toml::to_string(&root).expect("Failed to render sample config.")
}

fn parse(raw: &str) -> folio_config::Result<Config> {
	folio_config::parse(raw, Path::new("test.toml"))
}

fn invalid_key(result: folio_config::Result<Config>) -> &'static str {
	match result {
		Err(Error::InvalidValue { key, .. }) => key,
		other => panic!("Expected an invalid value error, got {other:?}."),
	}
}

#[test]
fn sample_config_parses_and_normalizes() {
	let cfg = parse(SAMPLE_CONFIG_TOML).expect("Sample config should be valid.");

	assert_eq!(cfg.service.http_bind, "127.0.0.1:5000");
	assert_eq!(cfg.storage.postgres.pool_max_conns, 4);
	assert_eq!(cfg.search.max_window, 1_000);
	assert!(cfg.security.jwt_previous_secret.is_none());
	assert_eq!(
		cfg.security.cors_origins,
		vec!["https://portfolio.example.org".to_string(), "http://localhost:3000".to_string()]
	);
	assert!(cfg.metrics.enabled);
}

#[test]
fn optional_sections_fall_back_to_defaults() {
	let raw = r#"
[service]
http_bind = "127.0.0.1:5000"
log_level = "debug"

[storage.postgres]
dsn = "postgres://localhost/folio"
pool_max_conns = 1

[security]
jwt_secret = "k3v9-Qz7p1-Lm4x8-Rt2w6-Yh5n0-Ub3c"
"#;
	let cfg = parse(raw).expect("Minimal config should be valid.");

	assert_eq!(cfg.service.body_limit_bytes, 1_048_576);
	assert_eq!(cfg.search.max_window, 1_000);
	assert_eq!(cfg.security.cors_origins, vec!["*".to_string()]);
	assert!(!cfg.security.hsts_enabled);
	assert!(cfg.metrics.enabled);
}

#[test]
fn short_jwt_secret_is_rejected() {
	let raw = sample_with("security", "jwt_secret", Value::String("too-short".to_string()));

	assert_eq!(invalid_key(parse(&raw)), "security.jwt_secret");
}

#[test]
fn short_previous_jwt_secret_is_rejected() {
	let raw = sample_with("security", "jwt_previous_secret", Value::String("old".to_string()));

	assert_eq!(invalid_key(parse(&raw)), "security.jwt_previous_secret");
}

#[test]
fn search_window_below_page_size_limit_is_rejected() {
	let raw = sample_with("search", "max_window", Value::Integer(50));

	assert_eq!(invalid_key(parse(&raw)), "search.max_window");
}

#[test]
fn zero_pool_size_is_rejected() {
	let raw = sample_with("storage.postgres", "pool_max_conns", Value::Integer(0));

	assert_eq!(invalid_key(parse(&raw)), "storage.postgres.pool_max_conns");
}

#[test]
fn wildcard_origin_cannot_be_mixed() {
	let origins = Value::Array(vec![
		Value::String("*".to_string()),
		Value::String("https://portfolio.example.org".to_string()),
	]);
	let raw = sample_with("security", "cors_origins", origins);

	assert_eq!(invalid_key(parse(&raw)), "security.cors_origins");
}

#[test]
fn non_http_origin_is_rejected() {
	let origins = Value::Array(vec![Value::String("portfolio.example.org".to_string())]);
	let raw = sample_with("security", "cors_origins", origins);

	assert_eq!(invalid_key(parse(&raw)), "security.cors_origins");
}

#[test]
fn malformed_toml_reports_parse_error() {
	let err = parse("[service").expect_err("Malformed TOML must fail.");

	assert!(matches!(err, Error::ParseConfig { .. }));
}

#[test]
fn missing_file_reports_read_error() {
	let err = folio_config::load(Path::new("/nonexistent/folio.toml"))
		.expect_err("Missing file must fail.");

	assert!(matches!(err, Error::ReadConfig { .. }));
}
