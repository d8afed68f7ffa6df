mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	AttachmentFailurePolicy, Blobs, Config, DEFAULT_BATCH_SIZE, DEFAULT_INTERVAL_HOURS,
	DEFAULT_MAX_BATCHES, DEFAULT_MAX_RUN_SECONDS, DEFAULT_RETENTION_DAYS, MAX_BATCH_SIZE,
	MAX_RETENTION_DAYS, Postgres, Purge, Schedule, Service, Storage,
};

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

pub fn parse(raw: &str) -> Result<Config> {
	let mut cfg: Config = toml::from_str(raw)
		.map_err(|err| Error::ParseConfig { path: Default::default(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(validation("service.log_level", "must be non-empty."));
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(validation("storage.postgres.dsn", "must be non-empty."));
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(validation("storage.postgres.pool_max_conns", "must be greater than zero."));
	}
	if cfg.storage.blobs.url.trim().is_empty() {
		return Err(validation("storage.blobs.url", "must be non-empty."));
	}

	validate_purge(&cfg.purge)?;

	if cfg.schedule.interval_hours == 0 {
		return Err(validation("schedule.interval_hours", "must be greater than zero."));
	}

	Ok(())
}

pub fn validate_purge(purge: &Purge) -> Result<()> {
	if purge.retention_days <= 0 {
		return Err(validation("purge.retention_days", "must be greater than zero."));
	}
	if purge.retention_days > MAX_RETENTION_DAYS {
		return Err(Error::Validation {
			key: "purge.retention_days",
			message: format!("must be {MAX_RETENTION_DAYS} or less."),
		});
	}
	if purge.batch_size == 0 {
		return Err(validation("purge.batch_size", "must be greater than zero."));
	}
	if purge.batch_size > MAX_BATCH_SIZE {
		return Err(Error::Validation {
			key: "purge.batch_size",
			message: format!("must be {MAX_BATCH_SIZE} or less."),
		});
	}

	if let Some(limit) = purge.max_concurrency
		&& limit == 0
	{
		return Err(validation("purge.max_concurrency", "must be greater than zero."));
	}

	if purge.max_batches == 0 {
		return Err(validation("purge.max_batches", "must be greater than zero."));
	}
	if purge.max_run_seconds == 0 {
		return Err(validation("purge.max_run_seconds", "must be greater than zero."));
	}

	Ok(())
}

fn validation(key: &'static str, message: &str) -> Error {
	Error::Validation { key, message: message.to_string() }
}

fn normalize(cfg: &mut Config) {
	cfg.service.log_level = cfg.service.log_level.trim().to_string();
	cfg.storage.blobs.url = cfg.storage.blobs.url.trim().to_string();
}
