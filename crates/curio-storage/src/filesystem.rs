// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! [`StorageAdapter`] that keeps files in a local directory served under a
//! web path.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use curio_config::FilesystemOptions;
use tracing::{debug, info, instrument, warn};

use crate::adapter::{validate_key, DeleteOutcome, StorageAdapter};
use crate::error::{ConfigurationError, Result, StorageError};

const DEFAULT_WEB_DIR: &str = "/files";

#[derive(Debug, Clone)]
pub struct FilesystemAdapter {
	local_dir: PathBuf,
	web_dir: String,
}

impl FilesystemAdapter {
	pub fn new(options: FilesystemOptions) -> std::result::Result<Self, ConfigurationError> {
		let local_dir = options
			.local_dir
			.filter(|d| !d.as_os_str().is_empty())
			.ok_or(ConfigurationError::MissingLocalDir)?;
		let web_dir = options
			.web_dir
			.filter(|w| !w.is_empty())
			.unwrap_or_else(|| DEFAULT_WEB_DIR.to_string())
			.trim_end_matches('/')
			.to_string();

		Ok(Self { local_dir, web_dir })
	}

	pub fn local_dir(&self) -> &Path {
		&self.local_dir
	}

	fn path_for(&self, key: &str) -> Result<PathBuf> {
		validate_key(key)?;
		Ok(self.local_dir.join(key))
	}
}

async fn ensure_parent(path: &Path) -> std::io::Result<()> {
	match path.parent() {
		Some(parent) => tokio::fs::create_dir_all(parent).await,
		None => Ok(()),
	}
}

/// Rename `from` to `to`, falling back to copy and remove when the rename is
/// refused (for instance across filesystems).
async fn relocate(from: &Path, to: &Path) -> std::io::Result<()> {
	match tokio::fs::rename(from, to).await {
		Ok(()) => Ok(()),
		Err(rename_err) => {
			debug!(error = %rename_err, "rename failed, falling back to copy");
			if let Err(copy_err) = tokio::fs::copy(from, to).await {
				let _ = tokio::fs::remove_file(to).await;
				return Err(copy_err);
			}
			tokio::fs::remove_file(from).await
		}
	}
}

#[async_trait]
impl StorageAdapter for FilesystemAdapter {
	fn name(&self) -> &'static str {
		"filesystem"
	}

	async fn set_up(&self) -> Result<()> {
		tokio::fs::create_dir_all(&self.local_dir).await?;
		debug!(local_dir = %self.local_dir.display(), "storage directory ready");
		Ok(())
	}

	async fn can_store(&self) -> bool {
		match tokio::fs::metadata(&self.local_dir).await {
			Ok(meta) => meta.is_dir() && !meta.permissions().readonly(),
			Err(_) => false,
		}
	}

	#[instrument(skip(self, source), fields(source = %source.display()))]
	async fn store(&self, source: &Path, dest: &str) -> Result<()> {
		let target = self.path_for(dest)?;
		let store_failed = |e: std::io::Error| StorageError::StoreFailed {
			path: source.to_path_buf(),
			key: dest.to_string(),
			reason: e.to_string(),
		};

		tokio::fs::metadata(source).await.map_err(store_failed)?;
		ensure_parent(&target).await.map_err(store_failed)?;
		relocate(source, &target).await.map_err(store_failed)?;

		info!(source = %source.display(), target = %target.display(), "stored file");
		Ok(())
	}

	#[instrument(skip(self))]
	async fn move_file(&self, source: &str, dest: &str) -> Result<()> {
		let from = self.path_for(source)?;
		let to = self.path_for(dest)?;
		let move_failed = |e: std::io::Error| StorageError::MoveFailed {
			from: source.to_string(),
			to: dest.to_string(),
			reason: e.to_string(),
		};

		ensure_parent(&to).await.map_err(move_failed)?;
		relocate(&from, &to).await.map_err(move_failed)?;

		info!(from = %from.display(), to = %to.display(), "moved file");
		Ok(())
	}

	#[instrument(skip(self))]
	async fn delete(&self, key: &str) -> Result<DeleteOutcome> {
		let path = self.path_for(key)?;

		match tokio::fs::remove_file(&path).await {
			Ok(()) => {
				info!(path = %path.display(), "deleted file");
				Ok(DeleteOutcome::Deleted)
			}
			Err(e) if e.kind() == ErrorKind::NotFound => {
				warn!(path = %path.display(), "delete target is already absent");
				Ok(DeleteOutcome::AlreadyAbsent)
			}
			Err(e) => match tokio::fs::try_exists(&path).await {
				Ok(false) => {
					warn!(
						path = %path.display(),
						error = %e,
						"delete reported failure but file is already absent"
					);
					Ok(DeleteOutcome::AlreadyAbsent)
				}
				Ok(true) => Err(StorageError::DeleteFailed {
					key: key.to_string(),
					reason: e.to_string(),
				}),
				Err(check) => Err(StorageError::DeleteFailed {
					key: key.to_string(),
					reason: format!("{e}; existence check failed: {check}"),
				}),
			},
		}
	}

	fn uri(&self, key: &str) -> String {
		format!("{}/{}", self.web_dir, key)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn adapter_in(dir: &tempfile::TempDir) -> FilesystemAdapter {
		FilesystemAdapter::new(FilesystemOptions {
			local_dir: Some(dir.path().join("store")),
			web_dir: None,
		})
		.unwrap()
	}

	#[test]
	fn test_missing_local_dir_rejected() {
		let err = FilesystemAdapter::new(FilesystemOptions::default()).unwrap_err();
		assert!(matches!(err, ConfigurationError::MissingLocalDir));
	}

	#[test]
	fn test_uri_uses_web_dir() {
		let adapter = FilesystemAdapter::new(FilesystemOptions {
			local_dir: Some(PathBuf::from("/srv/files")),
			web_dir: Some("https://cdn.example.com/media/".to_string()),
		})
		.unwrap();
		assert_eq!(
			adapter.uri("files/1/a.jpg"),
			"https://cdn.example.com/media/files/1/a.jpg"
		);
	}

	#[test]
	fn test_uri_default_web_dir() {
		let dir = tempfile::tempdir().unwrap();
		assert_eq!(adapter_in(&dir).uri("a.jpg"), "/files/a.jpg");
	}

	#[tokio::test]
	async fn test_set_up_creates_directory_and_can_store() {
		let dir = tempfile::tempdir().unwrap();
		let adapter = adapter_in(&dir);

		assert!(!adapter.can_store().await);
		adapter.set_up().await.unwrap();
		assert!(adapter.can_store().await);
	}

	#[tokio::test]
	async fn test_store_moves_file_into_place() {
		let dir = tempfile::tempdir().unwrap();
		let adapter = adapter_in(&dir);
		adapter.set_up().await.unwrap();

		let source = dir.path().join("upload.jpg");
		std::fs::write(&source, b"jpeg").unwrap();

		adapter.store(&source, "files/1/original.jpg").await.unwrap();

		assert!(!source.exists());
		let stored = adapter.local_dir().join("files/1/original.jpg");
		assert_eq!(std::fs::read(stored).unwrap(), b"jpeg");
	}

	#[tokio::test]
	async fn test_store_missing_source_fails() {
		let dir = tempfile::tempdir().unwrap();
		let adapter = adapter_in(&dir);

		let err = adapter
			.store(&dir.path().join("nope.jpg"), "files/nope.jpg")
			.await
			.unwrap_err();
		assert!(matches!(err, StorageError::StoreFailed { .. }));
	}

	#[tokio::test]
	async fn test_store_rejects_escaping_key_and_keeps_source() {
		let dir = tempfile::tempdir().unwrap();
		let adapter = adapter_in(&dir);
		let source = dir.path().join("upload.jpg");
		std::fs::write(&source, b"jpeg").unwrap();

		let err = adapter.store(&source, "../outside.jpg").await.unwrap_err();
		assert!(matches!(err, StorageError::InvalidKey { .. }));
		assert!(source.exists());
	}

	#[tokio::test]
	async fn test_move_between_keys() {
		let dir = tempfile::tempdir().unwrap();
		let adapter = adapter_in(&dir);
		adapter.set_up().await.unwrap();
		std::fs::write(adapter.local_dir().join("a.txt"), b"x").unwrap();

		adapter.move_file("a.txt", "archive/a.txt").await.unwrap();

		assert!(!adapter.local_dir().join("a.txt").exists());
		assert!(adapter.local_dir().join("archive/a.txt").exists());
	}

	#[tokio::test]
	async fn test_move_missing_source_fails() {
		let dir = tempfile::tempdir().unwrap();
		let adapter = adapter_in(&dir);
		adapter.set_up().await.unwrap();

		let err = adapter.move_file("missing.txt", "b.txt").await.unwrap_err();
		assert!(matches!(err, StorageError::MoveFailed { .. }));
	}

	#[tokio::test]
	async fn test_delete_existing_and_absent() {
		let dir = tempfile::tempdir().unwrap();
		let adapter = adapter_in(&dir);
		adapter.set_up().await.unwrap();
		std::fs::write(adapter.local_dir().join("a.txt"), b"x").unwrap();

		assert_eq!(adapter.delete("a.txt").await.unwrap(), DeleteOutcome::Deleted);
		assert_eq!(
			adapter.delete("a.txt").await.unwrap(),
			DeleteOutcome::AlreadyAbsent
		);
	}

	#[tokio::test]
	async fn test_delete_directory_is_error() {
		let dir = tempfile::tempdir().unwrap();
		let adapter = adapter_in(&dir);
		adapter.set_up().await.unwrap();
		std::fs::create_dir_all(adapter.local_dir().join("folder")).unwrap();

		let err = adapter.delete("folder").await.unwrap_err();
		assert!(matches!(err, StorageError::DeleteFailed { .. }));
	}
}
