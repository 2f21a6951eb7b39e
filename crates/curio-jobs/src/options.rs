// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Options handed to jobs at construction.

use std::sync::Arc;

use curio_storage::StorageAdapter;
use serde_json::{Map, Value};

use crate::error::JobError;
use crate::user::{User, UserDirectory};

/// Key under which the resolved creating user is placed in the options map.
pub const USER_KEY: &str = "user";

/// Process-wide settings and handles shared by every job a factory builds.
#[derive(Clone, Default)]
pub struct ProcessOptions {
	/// Overrides any same-named option in a job message.
	pub settings: Map<String, Value>,
	pub users: Option<Arc<dyn UserDirectory>>,
	pub storage: Option<Arc<dyn StorageAdapter>>,
}

impl ProcessOptions {
	pub fn new(settings: Map<String, Value>) -> Self {
		Self {
			settings,
			..Default::default()
		}
	}

	pub fn with_users(mut self, users: Arc<dyn UserDirectory>) -> Self {
		self.users = Some(users);
		self
	}

	pub fn with_storage(mut self, storage: Arc<dyn StorageAdapter>) -> Self {
		self.storage = Some(storage);
		self
	}
}

impl std::fmt::Debug for ProcessOptions {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ProcessOptions")
			.field("settings", &self.settings)
			.field("users", &self.users.is_some())
			.field("storage", &self.storage.as_ref().map(|s| s.name()))
			.finish()
	}
}

/// Merged options for a single job.
#[derive(Clone, Default)]
pub struct JobOptions {
	values: Map<String, Value>,
	/// Operator settings only; a job message cannot populate these.
	settings: Map<String, Value>,
	user: Option<User>,
	users: Option<Arc<dyn UserDirectory>>,
	storage: Option<Arc<dyn StorageAdapter>>,
}

impl JobOptions {
	/// Overlay `process` on top of the per-job `options`; process settings
	/// win on collision. A resolved `user` is written under [`USER_KEY`]
	/// before the overlay.
	pub fn merge(
		mut options: Map<String, Value>,
		user: Option<User>,
		process: &ProcessOptions,
	) -> Self {
		if let Some(user) = &user {
			if let Ok(value) = serde_json::to_value(user) {
				options.insert(USER_KEY.to_string(), value);
			}
		}

		for (key, value) in &process.settings {
			options.insert(key.clone(), value.clone());
		}

		Self {
			values: options,
			settings: process.settings.clone(),
			user,
			users: process.users.clone(),
			storage: process.storage.clone(),
		}
	}

	/// Options built from a plain map, with no process handles.
	pub fn from_values(values: Map<String, Value>) -> Self {
		Self {
			values,
			..Default::default()
		}
	}

	pub fn values(&self) -> &Map<String, Value> {
		&self.values
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.values.get(key)
	}

	pub fn get_str(&self, key: &str) -> Option<&str> {
		self.values.get(key).and_then(Value::as_str)
	}

	pub fn get_i64(&self, key: &str) -> Option<i64> {
		self.values.get(key).and_then(Value::as_i64)
	}

	/// A string from the worker's own settings, ignoring the job message.
	pub fn setting_str(&self, key: &str) -> Option<&str> {
		self.settings
			.get(key)
			.and_then(Value::as_str)
			.filter(|s| !s.is_empty())
	}

	/// A string option that must be present and non-empty.
	pub fn require_str(&self, key: &str) -> Result<&str, JobError> {
		match self.values.get(key) {
			Some(Value::String(s)) if !s.is_empty() => Ok(s),
			Some(Value::String(_)) | None => Err(JobError::InvalidOption {
				key: key.to_string(),
				message: "is required".to_string(),
			}),
			Some(_) => Err(JobError::InvalidOption {
				key: key.to_string(),
				message: "must be a string".to_string(),
			}),
		}
	}

	/// The user who created the job, when one was resolved.
	pub fn user(&self) -> Option<&User> {
		self.user.as_ref()
	}

	pub fn users(&self) -> Option<&Arc<dyn UserDirectory>> {
		self.users.as_ref()
	}

	pub fn storage(&self) -> Option<&Arc<dyn StorageAdapter>> {
		self.storage.as_ref()
	}

	pub fn require_storage(&self) -> Result<Arc<dyn StorageAdapter>, JobError> {
		self.storage.clone().ok_or_else(|| JobError::InvalidOption {
			key: "storage".to_string(),
			message: "no storage adapter is configured for this worker".to_string(),
		})
	}
}

impl std::fmt::Debug for JobOptions {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("JobOptions")
			.field("values", &self.values)
			.field("user", &self.user)
			.field("storage", &self.storage.as_ref().map(|s| s.name()))
			.finish()
	}
}
