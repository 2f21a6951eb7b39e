// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for storage adapters.

use std::path::PathBuf;

use curio_common_http::RetryableError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Raised when an adapter cannot be constructed from its options.
#[derive(Debug, Error)]
pub enum ConfigurationError {
	#[error("storage credentials are missing: accessKeyId and secretAccessKey are required")]
	MissingCredentials,

	#[error("storage bucket is missing")]
	MissingBucket,

	#[error("filesystem storage requires localDir")]
	MissingLocalDir,

	#[error("invalid storage endpoint '{endpoint}': {reason}")]
	InvalidEndpoint { endpoint: String, reason: String },

	#[error("expiration of {minutes} minutes exceeds the maximum of {max}")]
	InvalidExpiration { minutes: i64, max: i64 },

	#[error("failed to build HTTP client: {0}")]
	HttpClient(#[source] reqwest::Error),
}

/// Errors returned by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
	#[error("failed to store {} as {key}: {reason}", path.display())]
	StoreFailed {
		path: PathBuf,
		key: String,
		reason: String,
	},

	#[error("failed to move {from} to {to}: {reason}")]
	MoveFailed {
		from: String,
		to: String,
		reason: String,
	},

	#[error("failed to delete {key}: {reason}")]
	DeleteFailed { key: String, reason: String },

	#[error("invalid storage key '{key}': {reason}")]
	InvalidKey { key: String, reason: &'static str },

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("Network error: {0}")]
	Network(#[source] reqwest::Error),

	#[error("Request timed out")]
	Timeout,

	#[error("unexpected status {status}: {body}")]
	UnexpectedStatus { status: u16, body: String },
}

impl From<reqwest::Error> for StorageError {
	fn from(e: reqwest::Error) -> Self {
		if e.is_timeout() {
			StorageError::Timeout
		} else {
			StorageError::Network(e)
		}
	}
}

impl RetryableError for StorageError {
	fn is_retryable(&self) -> bool {
		match self {
			StorageError::Timeout => true,
			StorageError::Network(e) => e.is_retryable(),
			_ => false,
		}
	}
}
