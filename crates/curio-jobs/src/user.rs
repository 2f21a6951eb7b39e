// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Lookup of the user who created a job.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
	pub id: i64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct UserLookupError {
	pub message: String,
}

impl UserLookupError {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}
}

/// Data-access handle used to resolve `createdBy`.
#[async_trait]
pub trait UserDirectory: Send + Sync {
	/// `Ok(None)` means the user does not exist.
	async fn find_user(&self, id: i64) -> Result<Option<User>, UserLookupError>;
}
