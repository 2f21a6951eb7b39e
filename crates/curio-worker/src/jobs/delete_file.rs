// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use async_trait::async_trait;
use curio_jobs::{BuildJob, Job, JobError, JobOptions, JobOutput};
use curio_storage::{DeleteOutcome, StorageAdapter};
use serde_json::json;

/// Deletes a stored object. An object that is already gone counts as done.
pub struct DeleteFileJob {
	storage: Arc<dyn StorageAdapter>,
	key: String,
}

impl BuildJob for DeleteFileJob {
	const CLASS_NAME: &'static str = "DeleteFileJob";

	fn from_options(options: JobOptions) -> Result<Self, JobError> {
		Ok(Self {
			key: options.require_str("key")?.to_string(),
			storage: options.require_storage()?,
		})
	}
}

#[async_trait]
impl Job for DeleteFileJob {
	fn name(&self) -> &str {
		"Delete file"
	}

	async fn perform(&self) -> Result<JobOutput, JobError> {
		let outcome = self.storage.delete(&self.key).await?;
		let outcome = match outcome {
			DeleteOutcome::Deleted => "deleted",
			DeleteOutcome::AlreadyAbsent => "already_absent",
		};

		Ok(JobOutput {
			message: format!("{} {outcome}", self.key),
			metadata: Some(json!({ "key": self.key, "outcome": outcome })),
		})
	}
}
