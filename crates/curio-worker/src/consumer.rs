// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Line-delimited job message consumer.
//!
//! Each non-blank input line is one job message. A failing message is logged
//! and the consumer moves on to the next one.

use curio_jobs::{JobError, JobFactory, JobOutput};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{error, info, instrument};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumeSummary {
	pub processed: usize,
	pub failed: usize,
}

impl ConsumeSummary {
	pub fn succeeded(&self) -> usize {
		self.processed - self.failed
	}
}

pub struct Consumer {
	factory: JobFactory,
	dry_run: bool,
}

impl Consumer {
	pub fn new(factory: JobFactory) -> Self {
		Self {
			factory,
			dry_run: false,
		}
	}

	/// Decode and build jobs without performing them.
	pub fn dry_run(mut self, dry_run: bool) -> Self {
		self.dry_run = dry_run;
		self
	}

	/// Handle one message. `Ok(None)` means the job was built but not run.
	#[instrument(skip(self, raw))]
	pub async fn process(&self, line: usize, raw: &str) -> Result<Option<JobOutput>, JobError> {
		let job = self.factory.from_message(raw).await?;

		if self.dry_run {
			info!(job = job.name(), "dry run, job built but not performed");
			return Ok(None);
		}

		let output = job.perform().await?;
		info!(job = job.name(), message = %output.message, "job completed");
		Ok(Some(output))
	}

	/// Consume every line of `reader` until end of input.
	pub async fn run<R>(&self, reader: R) -> std::io::Result<ConsumeSummary>
	where
		R: AsyncBufRead + Unpin,
	{
		let mut summary = ConsumeSummary::default();
		let mut lines = reader.lines();
		let mut line_number = 0;

		while let Some(raw) = lines.next_line().await? {
			line_number += 1;
			if raw.trim().is_empty() {
				continue;
			}

			summary.processed += 1;
			if let Err(e) = self.process(line_number, &raw).await {
				summary.failed += 1;
				error!(line = line_number, kind = e.kind(), error = %e, "job failed");
			}
		}

		info!(
			processed = summary.processed,
			failed = summary.failed,
			"input exhausted"
		);
		Ok(summary)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Arc;

	use curio_config::FilesystemOptions;
	use curio_jobs::ProcessOptions;
	use curio_storage::{FilesystemAdapter, StorageAdapter};

	use crate::jobs::builtin_registry;

	fn consumer_for(dir: &tempfile::TempDir) -> Consumer {
		let storage: Arc<dyn StorageAdapter> = Arc::new(
			FilesystemAdapter::new(FilesystemOptions {
				local_dir: Some(dir.path().join("store")),
				web_dir: None,
			})
			.unwrap(),
		);
		let uploads = dir.path().join("uploads");
		std::fs::create_dir_all(&uploads).unwrap();
		let settings = serde_json::json!({"upload_dir": uploads.to_str().unwrap()});
		let factory = JobFactory::new(
			Arc::new(builtin_registry().unwrap()),
			ProcessOptions::new(settings.as_object().cloned().unwrap()).with_storage(storage),
		);
		Consumer::new(factory)
	}

	#[tokio::test]
	async fn test_runs_each_line_and_counts_failures() {
		let dir = tempfile::tempdir().unwrap();
		let consumer = consumer_for(&dir);
		let source = dir.path().join("uploads/upload.txt");
		std::fs::write(&source, b"hello").unwrap();

		let input = format!(
			"{}\n\n{}\nnot json\n{}\n",
			serde_json::json!({
				"className": "StoreFileJob",
				"options": {"source": source.to_str().unwrap(), "key": "a/upload.txt"}
			}),
			r#"{"className":"NoSuchJob","options":{}}"#,
			r#"{"className":"DeleteFileJob","options":{"key":"a/upload.txt"}}"#,
		);

		let summary = consumer.run(input.as_bytes()).await.unwrap();

		assert_eq!(
			summary,
			ConsumeSummary {
				processed: 4,
				failed: 2
			}
		);
		assert_eq!(summary.succeeded(), 2);
		assert!(!dir.path().join("store/a/upload.txt").exists());
	}

	#[tokio::test]
	async fn test_dry_run_builds_without_performing() {
		let dir = tempfile::tempdir().unwrap();
		let consumer = consumer_for(&dir).dry_run(true);
		let source = dir.path().join("uploads/upload.txt");
		std::fs::write(&source, b"hello").unwrap();

		let raw = serde_json::json!({
			"className": "StoreFileJob",
			"options": {"source": source.to_str().unwrap(), "key": "upload.txt"}
		})
		.to_string();

		let output = consumer.process(1, &raw).await.unwrap();
		assert!(output.is_none());
		assert!(source.exists());
	}

	#[tokio::test]
	async fn test_process_reports_error_kind() {
		let dir = tempfile::tempdir().unwrap();
		let err = consumer_for(&dir).process(1, "{}").await.unwrap_err();
		assert_eq!(err.kind(), "malformed_job");
	}
}
