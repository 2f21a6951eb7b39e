// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use async_trait::async_trait;
use curio_jobs::{BuildJob, Job, JobError, JobOptions, JobOutput};
use curio_storage::StorageAdapter;
use serde_json::json;

/// Moves a stored object from `from` to `to`.
pub struct MoveFileJob {
	storage: Arc<dyn StorageAdapter>,
	from: String,
	to: String,
}

impl BuildJob for MoveFileJob {
	const CLASS_NAME: &'static str = "MoveFileJob";

	fn from_options(options: JobOptions) -> Result<Self, JobError> {
		Ok(Self {
			from: options.require_str("from")?.to_string(),
			to: options.require_str("to")?.to_string(),
			storage: options.require_storage()?,
		})
	}
}

#[async_trait]
impl Job for MoveFileJob {
	fn name(&self) -> &str {
		"Move file"
	}

	async fn perform(&self) -> Result<JobOutput, JobError> {
		self.storage.move_file(&self.from, &self.to).await?;

		Ok(JobOutput {
			message: format!("moved {} to {}", self.from, self.to),
			metadata: Some(json!({
				"from": self.from,
				"to": self.to,
				"uri": self.storage.uri(&self.to),
			})),
		})
	}
}
