// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration layer for merging from multiple sources.

use serde::Deserialize;

use crate::sections::{JobsConfigLayer, LoggingConfigLayer, StorageConfigLayer};

/// Worker configuration layer - all fields are Option for merging.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkerConfigLayer {
	#[serde(default)]
	pub storage: Option<StorageConfigLayer>,
	#[serde(default)]
	pub jobs: Option<JobsConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
}

impl WorkerConfigLayer {
	/// Merge another layer into this one. Other layer takes precedence.
	pub fn merge(&mut self, other: WorkerConfigLayer) {
		merge_option(&mut self.storage, other.storage, StorageConfigLayer::merge);
		merge_option(&mut self.jobs, other.jobs, JobsConfigLayer::merge);
		merge_option(&mut self.logging, other.logging, LoggingConfigLayer::merge);
	}
}

fn merge_option<T, F>(target: &mut Option<T>, source: Option<T>, merge_fn: F)
where
	F: FnOnce(&mut T, T),
{
	match (target.as_mut(), source) {
		(Some(t), Some(s)) => merge_fn(t, s),
		(None, Some(s)) => *target = Some(s),
		_ => {}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::sections::StorageBackend;

	#[test]
	fn test_merge_empty_layers() {
		let mut base = WorkerConfigLayer::default();
		base.merge(WorkerConfigLayer::default());
		assert!(base.storage.is_none());
		assert!(base.jobs.is_none());
	}

	#[test]
	fn test_merge_other_overwrites() {
		let mut base = WorkerConfigLayer {
			storage: Some(StorageConfigLayer {
				adapter: Some(StorageBackend::Filesystem),
				web_dir: Some("/files".to_string()),
				..Default::default()
			}),
			..Default::default()
		};
		let other = WorkerConfigLayer {
			storage: Some(StorageConfigLayer {
				adapter: Some(StorageBackend::S3),
				..Default::default()
			}),
			..Default::default()
		};
		base.merge(other);
		let storage = base.storage.unwrap();
		assert_eq!(storage.adapter, Some(StorageBackend::S3));
		assert_eq!(storage.web_dir.as_deref(), Some("/files"));
	}

	#[test]
	fn test_merge_adds_missing_sections() {
		let mut base = WorkerConfigLayer::default();
		let other = WorkerConfigLayer {
			logging: Some(LoggingConfigLayer {
				level: Some("debug".to_string()),
				format: None,
			}),
			..Default::default()
		};
		base.merge(other);
		assert_eq!(
			base.logging.as_ref().and_then(|l| l.level.as_deref()),
			Some("debug")
		);
	}

	#[test]
	fn test_deserialize_full_file() {
		let toml_str = r#"
[storage]
adapter = "filesystem"
localDir = "/srv/curio/files"

[jobs.options]
tmp_dir = "/var/tmp"

[logging]
level = "debug"
format = "json"
"#;
		let layer: WorkerConfigLayer = toml::from_str(toml_str).unwrap();
		let storage = layer.storage.unwrap();
		assert_eq!(
			storage.local_dir.as_deref(),
			Some(std::path::Path::new("/srv/curio/files"))
		);
		assert!(layer.jobs.unwrap().options.unwrap().contains_key("tmp_dir"));
		assert_eq!(layer.logging.unwrap().level.as_deref(), Some("debug"));
	}
}
