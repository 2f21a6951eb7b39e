// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::env::load_secret_env;
use crate::error::ConfigError;
use crate::layer::WorkerConfigLayer;
use crate::secret::SecretString;
use crate::sections::{JobsConfigLayer, LogFormat, LoggingConfigLayer, StorageConfigLayer};

const SECRET_ACCESS_KEY_VAR: &str = "CURIO_STORAGE_SECRET_ACCESS_KEY";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<WorkerConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<WorkerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(WorkerConfigLayer::default())
	}
}

/// TOML file configuration source.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/curio/worker.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<WorkerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(WorkerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: WorkerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: CURIO_<SECTION>_<FIELD>. The S3 secret key may also be read
/// from a file named by `CURIO_STORAGE_SECRET_ACCESS_KEY_FILE`.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<WorkerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		let secret = load_secret_env(SECRET_ACCESS_KEY_VAR)?;
		layer_from_lookup(env_var, secret)
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn parse_i64(name: &str, value: Option<String>) -> Result<Option<i64>, ConfigError> {
	match value {
		Some(v) => v.trim().parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid integer value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn layer_from_lookup<F>(
	lookup: F,
	secret_access_key: Option<SecretString>,
) -> Result<WorkerConfigLayer, ConfigError>
where
	F: Fn(&str) -> Option<String>,
{
	Ok(WorkerConfigLayer {
		storage: Some(load_storage(&lookup, secret_access_key)?),
		jobs: Some(load_jobs(&lookup)?),
		logging: Some(load_logging(&lookup)?),
	})
}

fn load_storage<F>(
	lookup: &F,
	secret_access_key: Option<SecretString>,
) -> Result<StorageConfigLayer, ConfigError>
where
	F: Fn(&str) -> Option<String>,
{
	let adapter = match lookup("CURIO_STORAGE_ADAPTER") {
		Some(v) => Some(v.parse().map_err(|message| ConfigError::InvalidValue {
			key: "CURIO_STORAGE_ADAPTER".to_string(),
			message,
		})?),
		None => None,
	};

	Ok(StorageConfigLayer {
		adapter,
		access_key_id: lookup("CURIO_STORAGE_ACCESS_KEY_ID"),
		secret_access_key,
		region: lookup("CURIO_STORAGE_REGION"),
		bucket: lookup("CURIO_STORAGE_BUCKET"),
		expiration: parse_i64(
			"CURIO_STORAGE_EXPIRATION",
			lookup("CURIO_STORAGE_EXPIRATION"),
		)?,
		endpoint: lookup("CURIO_STORAGE_ENDPOINT"),
		local_dir: lookup("CURIO_STORAGE_LOCAL_DIR").map(PathBuf::from),
		web_dir: lookup("CURIO_STORAGE_WEB_DIR"),
	})
}

fn load_jobs<F>(lookup: &F) -> Result<JobsConfigLayer, ConfigError>
where
	F: Fn(&str) -> Option<String>,
{
	let options = match lookup("CURIO_JOBS_OPTIONS") {
		Some(raw) => {
			let parsed: Map<String, Value> =
				serde_json::from_str(&raw).map_err(|e| ConfigError::InvalidValue {
					key: "CURIO_JOBS_OPTIONS".to_string(),
					message: format!("expected a JSON object: {e}"),
				})?;
			Some(parsed)
		}
		None => None,
	};

	Ok(JobsConfigLayer { options })
}

fn load_logging<F>(lookup: &F) -> Result<LoggingConfigLayer, ConfigError>
where
	F: Fn(&str) -> Option<String>,
{
	let format = match lookup("CURIO_LOG_FORMAT") {
		Some(v) => match v.to_ascii_lowercase().as_str() {
			"text" | "pretty" => Some(LogFormat::Text),
			"json" => Some(LogFormat::Json),
			_ => {
				return Err(ConfigError::InvalidValue {
					key: "CURIO_LOG_FORMAT".to_string(),
					message: format!("unknown log format '{v}'"),
				})
			}
		},
		None => None,
	};

	Ok(LoggingConfigLayer {
		level: lookup("CURIO_LOG_LEVEL"),
		format,
	})
}
