mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Metrics, Postgres, Search, Security, Service, Storage};

use std::{fs, path::Path};

pub const MIN_JWT_SECRET_LEN: usize = 32;
/// The largest page size any listing accepts; a window smaller than this would reject page 1.
pub const MIN_SEARCH_WINDOW: u32 = 100;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	parse(&raw, path)
}

pub fn parse(raw: &str, path: &Path) -> Result<Config> {
	let mut cfg: Config = toml::from_str(raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: Box::new(err) })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(invalid("service.http_bind", "must be non-empty."));
	}
	if cfg.service.log_level.trim().is_empty() {
		return Err(invalid("service.log_level", "must be non-empty."));
	}
	if cfg.service.body_limit_bytes == 0 {
		return Err(invalid("service.body_limit_bytes", "must be greater than zero."));
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(invalid("storage.postgres.dsn", "must be non-empty."));
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(invalid("storage.postgres.pool_max_conns", "must be greater than zero."));
	}
	if cfg.search.max_window < MIN_SEARCH_WINDOW {
		return Err(invalid(
			"search.max_window",
			format!("must be at least {MIN_SEARCH_WINDOW}."),
		));
	}

	for (key, secret) in [
		("security.jwt_secret", Some(&cfg.security.jwt_secret)),
		("security.jwt_previous_secret", cfg.security.jwt_previous_secret.as_ref()),
	] {
		if let Some(secret) = secret
			&& secret.chars().count() < MIN_JWT_SECRET_LEN
		{
			return Err(invalid(key, format!("must be at least {MIN_JWT_SECRET_LEN} characters.")));
		}
	}

	if cfg.security.cors_origins.is_empty() {
		return Err(invalid("security.cors_origins", "must list at least one origin or \"*\"."));
	}
	if cfg.security.cors_origins.len() > 1
		&& cfg.security.cors_origins.iter().any(|origin| origin == "*")
	{
		return Err(invalid("security.cors_origins", "\"*\" cannot be combined with other origins."));
	}

	for origin in &cfg.security.cors_origins {
		if origin != "*" && !origin.starts_with("http://") && !origin.starts_with("https://") {
			return Err(invalid(
				"security.cors_origins",
				format!("{origin:?} must be \"*\" or an http(s) origin."),
			));
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg
		.security
		.jwt_previous_secret
		.as_deref()
		.map(|secret| secret.trim().is_empty())
		.unwrap_or(false)
	{
		cfg.security.jwt_previous_secret = None;
	}

	cfg.security.cors_origins = cfg
		.security
		.cors_origins
		.iter()
		.map(|origin| origin.trim().trim_end_matches('/').to_string())
		.filter(|origin| !origin.is_empty())
		.collect();
}

fn invalid(key: &'static str, reason: impl Into<String>) -> Error {
	Error::InvalidValue { key, reason: reason.into() }
}
