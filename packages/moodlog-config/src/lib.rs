mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, LlmProviderConfig, Postgres, Providers, Security, Service, Storage};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
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

	let classifier = &cfg.providers.mood_classifier;

	for (label, value) in [
		("providers.mood_classifier.api_base", &classifier.api_base),
		("providers.mood_classifier.api_key", &classifier.api_key),
		("providers.mood_classifier.model", &classifier.model),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if classifier.max_tokens == 0 {
		return Err(Error::Validation {
			message: "providers.mood_classifier.max_tokens must be greater than zero.".to_string(),
		});
	}
	if classifier.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.mood_classifier.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if !classifier.temperature.is_finite() {
		return Err(Error::Validation {
			message: "providers.mood_classifier.temperature must be a finite number.".to_string(),
		});
	}
	if !(0.0..=2.0).contains(&classifier.temperature) {
		return Err(Error::Validation {
			message: "providers.mood_classifier.temperature must be in the range 0.0-2.0."
				.to_string(),
		});
	}
	if classifier.default_headers.values().any(|value| !value.is_string()) {
		return Err(Error::Validation {
			message: "providers.mood_classifier.default_headers values must be strings."
				.to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let classifier = &mut cfg.providers.mood_classifier;

	if classifier.api_base.ends_with('/') && classifier.path.starts_with('/') {
		classifier.api_base = classifier.api_base.trim_end_matches('/').to_string();
	}
	if cfg.service.log_level.trim().is_empty() {
		cfg.service.log_level = "info".to_string();
	}
}
