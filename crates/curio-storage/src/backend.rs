// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Binds the storage contract to the backend named in configuration.

use std::sync::Arc;

use curio_config::{StorageBackend, StorageConfig};
use tracing::info;

use crate::adapter::StorageAdapter;
use crate::error::ConfigurationError;
use crate::filesystem::FilesystemAdapter;
use crate::s3::{S3Adapter, S3Client};

/// Construct the configured adapter.
///
/// The S3 backend gets a freshly built [`S3Client`]; use [`S3Adapter::new`]
/// directly to share a client between adapters.
pub fn adapter_from_config(
	config: &StorageConfig,
) -> Result<Arc<dyn StorageAdapter>, ConfigurationError> {
	let adapter: Arc<dyn StorageAdapter> = match config.adapter {
		StorageBackend::S3 => {
			let client = S3Client::new()?;
			Arc::new(S3Adapter::new(config.s3.clone(), client)?)
		}
		StorageBackend::Filesystem => Arc::new(FilesystemAdapter::new(config.filesystem.clone())?),
	};

	info!(adapter = adapter.name(), "storage adapter selected");
	Ok(adapter)
}
