// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The storage contract every backend implements.

use std::path::Path;

use async_trait::async_trait;

use crate::error::{Result, StorageError};

/// Result of a successful [`StorageAdapter::delete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
	/// The backend removed the object.
	Deleted,
	/// The remove call failed but the object is confirmed not to exist.
	AlreadyAbsent,
}

/// A place files can be stored, moved, deleted and linked to.
///
/// Keys are `/`-separated relative paths within the backend's namespace.
#[async_trait]
pub trait StorageAdapter: Send + Sync {
	/// Short backend name used in logs.
	fn name(&self) -> &'static str;

	/// One-time initialization before first use.
	async fn set_up(&self) -> Result<()> {
		Ok(())
	}

	/// Whether the backend is currently reachable and writable.
	async fn can_store(&self) -> bool;

	/// Upload the local file at `source` under `dest`.
	///
	/// The local file is removed on success and left untouched on failure.
	async fn store(&self, source: &Path, dest: &str) -> Result<()>;

	/// Move an object between keys without downloading it.
	async fn move_file(&self, source: &str, dest: &str) -> Result<()>;

	/// Remove the object at `key`.
	///
	/// A failed remove is followed by an existence check: a confirmed absent
	/// object yields [`DeleteOutcome::AlreadyAbsent`], anything else is
	/// [`StorageError::DeleteFailed`].
	async fn delete(&self, key: &str) -> Result<DeleteOutcome>;

	/// Public URL for `key`, signed when the backend is configured to expire
	/// links.
	fn uri(&self, key: &str) -> String;
}

/// Reject keys that are empty, absolute, or escape the namespace.
pub fn validate_key(key: &str) -> Result<()> {
	let reason = if key.is_empty() {
		"key is empty"
	} else if key.starts_with('/') || key.starts_with('\\') {
		"key must be relative"
	} else if key.split(['/', '\\']).any(|segment| segment == "..") {
		"key must not contain '..'"
	} else if key.contains('\0') {
		"key must not contain NUL"
	} else {
		return Ok(());
	};

	Err(StorageError::InvalidKey {
		key: key.to_string(),
		reason,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn test_accepts_nested_relative_keys() {
		assert!(validate_key("files/1/original.jpg").is_ok());
		assert!(validate_key("a..b/c").is_ok());
	}

	#[test]
	fn test_rejects_bad_keys() {
		for key in ["", "/etc/passwd", "files/../../etc", "..", "a\\..\\b"] {
			assert!(
				matches!(validate_key(key), Err(StorageError::InvalidKey { .. })),
				"expected {key:?} to be rejected"
			);
		}
	}

	proptest! {
		#[test]
		fn prop_keys_with_parent_segment_rejected(prefix in "[a-z]{1,8}", suffix in "[a-z]{1,8}") {
			let key = format!("{prefix}/../{suffix}");
			prop_assert!(validate_key(&key).is_err());
		}
	}
}
