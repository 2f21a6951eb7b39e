// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::JobError;
use crate::options::JobOptions;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobOutput {
	pub message: String,
	pub metadata: Option<serde_json::Value>,
}

#[async_trait]
pub trait Job: Send + Sync {
	fn name(&self) -> &str;
	async fn perform(&self) -> Result<JobOutput, JobError>;
}

/// A job type that can be registered by class name.
pub trait BuildJob: Job + Sized + 'static {
	/// Name carried in the `className` field of job messages.
	const CLASS_NAME: &'static str;

	fn from_options(options: JobOptions) -> Result<Self, JobError>;
}
