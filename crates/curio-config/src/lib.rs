// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for Curio workers.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Storage adapter options shared with `curio-storage`
//! - Consistent environment variable naming (`CURIO_*`)
//!
//! # Usage
//!
//! ```ignore
//! use curio_config::load_config;
//!
//! let config = load_config()?;
//! println!("storage adapter: {:?}", config.storage.adapter);
//! ```

pub mod env;
pub mod error;
pub mod layer;
pub mod secret;
pub mod sections;
pub mod sources;

pub use env::{load_secret_env, SecretEnvError};
pub use error::ConfigError;
pub use layer::WorkerConfigLayer;
pub use secret::{Secret, SecretString, REDACTED};
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::debug;

/// Fully resolved worker configuration.
#[derive(Debug, Clone, Default)]
pub struct WorkerConfig {
	pub storage: StorageConfig,
	pub jobs: JobsConfig,
	pub logging: LoggingConfig,
	/// Names of the sources merged, lowest precedence first.
	pub sources: Vec<&'static str>,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`CURIO_*`)
/// 2. Config file (`/etc/curio/worker.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<WorkerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<WorkerConfig, ConfigError> {
	let mut merged = WorkerConfigLayer::default();
	merged.merge(EnvSource.load()?);
	Ok(finalize(merged, vec![EnvSource.name()]))
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<WorkerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<WorkerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = WorkerConfigLayer::default();
	let mut loaded = Vec::with_capacity(sources.len());
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
		loaded.push(source.name());
	}

	Ok(finalize(merged, loaded))
}

/// Finalize configuration layer into resolved config.
///
/// Nothing is logged here: callers usually configure tracing from the
/// result, so they report the summary once a subscriber exists.
fn finalize(layer: WorkerConfigLayer, sources: Vec<&'static str>) -> WorkerConfig {
	WorkerConfig {
		storage: layer.storage.unwrap_or_default().finalize(),
		jobs: layer.jobs.unwrap_or_default().finalize(),
		logging: layer.logging.unwrap_or_default().finalize(),
		sources,
	}
}
