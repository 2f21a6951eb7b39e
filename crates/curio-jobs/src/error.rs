// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use curio_storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum JobError {
	#[error("Malformed job: {0}")]
	MalformedJob(String),

	#[error("Job class not found: {0}")]
	MissingClass(String),

	#[error("User lookup failed: {0}")]
	UserLookup(String),

	#[error("Invalid option {key}: {message}")]
	InvalidOption { key: String, message: String },

	#[error("Job failed: {message}")]
	Failed { message: String, retryable: bool },

	#[error("Storage error: {0}")]
	Storage(#[from] StorageError),
}

impl JobError {
	/// Short stable label for logs.
	pub fn kind(&self) -> &'static str {
		match self {
			JobError::MalformedJob(_) => "malformed_job",
			JobError::MissingClass(_) => "missing_class",
			JobError::UserLookup(_) => "user_lookup",
			JobError::InvalidOption { .. } => "invalid_option",
			JobError::Failed { .. } => "failed",
			JobError::Storage(_) => "storage",
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
	#[error("Job class already registered: {0}")]
	AlreadyRegistered(String),
}

pub type Result<T> = std::result::Result<T, JobError>;
