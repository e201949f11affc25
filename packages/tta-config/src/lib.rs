mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Access, Config, Filters, Postgres, Service, Storage};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	parse(&raw).map_err(|err| match err {
		Error::ParseConfig { source, .. } =>
			Error::ParseConfig { path: path.to_path_buf(), source },
		other => other,
	})
}

/// Parses, normalizes and validates an in-memory TOML document.
pub fn parse(raw: &str) -> Result<Config> {
	let mut cfg: Config = toml::from_str(raw)
		.map_err(|err| Error::ParseConfig { path: Default::default(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.filters.max_values_per_filter == 0 {
		return Err(Error::Validation {
			message: "filters.max_values_per_filter must be greater than zero.".to_string(),
		});
	}
	if cfg.filters.max_value_bytes == 0 {
		return Err(Error::Validation {
			message: "filters.max_value_bytes must be greater than zero.".to_string(),
		});
	}

	for entry in &cfg.filters.disabled_topics {
		let Some((family, topic)) = entry.split_once('.') else {
			return Err(Error::Validation {
				message: format!(
					"filters.disabled_topics entry {entry:?} must look like <family>.<topic>."
				),
			});
		};

		if family.is_empty() {
			return Err(Error::Validation {
				message: format!("filters.disabled_topics entry {entry:?} has an empty family."),
			});
		}
		if topic.is_empty() || topic.contains('.') {
			return Err(Error::Validation {
				message: format!("filters.disabled_topics entry {entry:?} has an invalid topic."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.service.log_level = cfg.service.log_level.trim().to_string();

	let mut disabled = Vec::with_capacity(cfg.filters.disabled_topics.len());

	for entry in cfg.filters.disabled_topics.drain(..) {
		let trimmed = entry.trim();

		if trimmed.is_empty() || disabled.iter().any(|seen: &String| seen == trimmed) {
			continue;
		}

		disabled.push(trimmed.to_string());
	}

	cfg.filters.disabled_topics = disabled;
}
