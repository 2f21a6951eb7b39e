// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Builds runnable jobs from descriptors.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::descriptor::JobDescriptor;
use crate::error::JobError;
use crate::job::Job;
use crate::options::{JobOptions, ProcessOptions};
use crate::registry::JobRegistry;

#[derive(Debug, Clone)]
pub struct JobFactory {
	registry: Arc<JobRegistry>,
	process: ProcessOptions,
}

impl JobFactory {
	pub fn new(registry: Arc<JobRegistry>, process: ProcessOptions) -> Self {
		Self { registry, process }
	}

	pub fn registry(&self) -> &JobRegistry {
		&self.registry
	}

	/// Decode `raw` and build the job it describes.
	pub async fn from_message(&self, raw: &str) -> Result<Box<dyn Job>, JobError> {
		let descriptor = JobDescriptor::decode(raw)?;
		self.build(descriptor).await
	}

	/// Construct the job named by `descriptor`.
	///
	/// When a user directory is configured and the descriptor names a
	/// creator, the creator must exist; it is passed to the job under the
	/// `user` option. Process settings then override the job's own options.
	#[instrument(skip(self, descriptor), fields(class_name = %descriptor.class_name))]
	pub async fn build(&self, descriptor: JobDescriptor) -> Result<Box<dyn Job>, JobError> {
		let constructor = self
			.registry
			.constructor(&descriptor.class_name)
			.ok_or_else(|| JobError::MissingClass(descriptor.class_name.clone()))?;

		let options = descriptor.options.unwrap_or_default();

		let user = match (&self.process.users, descriptor.created_by) {
			(Some(users), Some(user_id)) => {
				let found = users
					.find_user(user_id)
					.await
					.map_err(|e| JobError::UserLookup(format!("user {user_id}: {e}")))?;
				match found {
					Some(user) => Some(user),
					None => {
						return Err(JobError::MalformedJob(format!(
							"creating user {user_id} does not exist"
						)))
					}
				}
			}
			_ => None,
		};

		let merged = JobOptions::merge(options, user, &self.process);
		debug!(option_count = merged.values().len(), "constructing job");

		constructor(merged)
	}
}
