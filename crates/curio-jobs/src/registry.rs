// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The closed set of job classes a worker can build.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::{JobError, RegistryError};
use crate::job::{BuildJob, Job};
use crate::options::JobOptions;

pub type JobConstructor =
	Arc<dyn Fn(JobOptions) -> Result<Box<dyn Job>, JobError> + Send + Sync>;

/// Class name to constructor table.
///
/// Filled once at startup, then shared read-only behind an `Arc`.
#[derive(Default)]
pub struct JobRegistry {
	constructors: HashMap<String, JobConstructor>,
}

impl JobRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register<F>(&mut self, class_name: impl Into<String>, constructor: F) -> Result<(), RegistryError>
	where
		F: Fn(JobOptions) -> Result<Box<dyn Job>, JobError> + Send + Sync + 'static,
	{
		let class_name = class_name.into();
		if self.constructors.contains_key(&class_name) {
			return Err(RegistryError::AlreadyRegistered(class_name));
		}

		debug!(class_name = %class_name, "registering job class");
		self.constructors.insert(class_name, Arc::new(constructor));
		Ok(())
	}

	pub fn register_job<J: BuildJob>(&mut self) -> Result<(), RegistryError> {
		self.register(J::CLASS_NAME, |options| {
			J::from_options(options).map(|job| Box::new(job) as Box<dyn Job>)
		})
	}

	pub fn contains(&self, class_name: &str) -> bool {
		self.constructors.contains_key(class_name)
	}

	pub fn constructor(&self, class_name: &str) -> Option<&JobConstructor> {
		self.constructors.get(class_name)
	}

	/// Registered class names, sorted.
	pub fn registered_classes(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
		names.sort_unstable();
		names
	}

	pub fn len(&self) -> usize {
		self.constructors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.constructors.is_empty()
	}
}

impl std::fmt::Debug for JobRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("JobRegistry")
			.field("classes", &self.registered_classes())
			.finish()
	}
}
