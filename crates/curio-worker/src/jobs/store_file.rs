// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use curio_jobs::{BuildJob, Job, JobError, JobOptions, JobOutput};
use curio_storage::StorageAdapter;
use serde_json::json;
use tracing::warn;

/// Worker setting naming the directory `source` files must live under.
pub const UPLOAD_DIR_SETTING: &str = "upload_dir";

/// Uploads a local file (`source`) to the configured storage under `key`.
///
/// `source` must resolve to a file inside the worker's `upload_dir`
/// setting. The setting is read from the worker configuration only, so a
/// job message cannot widen it.
pub struct StoreFileJob {
	storage: Arc<dyn StorageAdapter>,
	upload_dir: PathBuf,
	source: PathBuf,
	key: String,
}

impl StoreFileJob {
	/// Canonical `source`, provided it sits under the canonical upload dir.
	async fn resolve_source(&self) -> Result<PathBuf, JobError> {
		let root = tokio::fs::canonicalize(&self.upload_dir)
			.await
			.map_err(|e| JobError::InvalidOption {
				key: UPLOAD_DIR_SETTING.to_string(),
				message: format!("cannot resolve {}: {e}", self.upload_dir.display()),
			})?;
		let source = tokio::fs::canonicalize(&self.source)
			.await
			.map_err(|e| JobError::InvalidOption {
				key: "source".to_string(),
				message: format!("cannot resolve {}: {e}", self.source.display()),
			})?;

		if !is_within(&source, &root) {
			warn!(
				source = %self.source.display(),
				upload_dir = %root.display(),
				"rejected source outside upload directory"
			);
			return Err(JobError::InvalidOption {
				key: "source".to_string(),
				message: format!("{} is outside the upload directory", self.source.display()),
			});
		}
		Ok(source)
	}
}

fn is_within(path: &Path, root: &Path) -> bool {
	path != root && path.starts_with(root)
}

impl BuildJob for StoreFileJob {
	const CLASS_NAME: &'static str = "StoreFileJob";

	fn from_options(options: JobOptions) -> Result<Self, JobError> {
		let upload_dir = options
			.setting_str(UPLOAD_DIR_SETTING)
			.map(PathBuf::from)
			.ok_or_else(|| JobError::InvalidOption {
				key: UPLOAD_DIR_SETTING.to_string(),
				message: "must be set in the worker's jobs.options".to_string(),
			})?;

		Ok(Self {
			source: PathBuf::from(options.require_str("source")?),
			key: options.require_str("key")?.to_string(),
			storage: options.require_storage()?,
			upload_dir,
		})
	}
}

#[async_trait]
impl Job for StoreFileJob {
	fn name(&self) -> &str {
		"Store file"
	}

	async fn perform(&self) -> Result<JobOutput, JobError> {
		let source = self.resolve_source().await?;
		self.storage.store(&source, &self.key).await?;
		let uri = self.storage.uri(&self.key);

		Ok(JobOutput {
			message: format!("stored {}", self.key),
			metadata: Some(json!({
				"key": self.key,
				"uri": uri,
				"adapter": self.storage.name(),
			})),
		})
	}
}
