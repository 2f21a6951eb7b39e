// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections for curio workers.

pub mod jobs;
pub mod logging;
pub mod storage;

pub use jobs::{JobsConfig, JobsConfigLayer};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
pub use storage::{
	FilesystemOptions, S3Options, StorageBackend, StorageConfig, StorageConfigLayer,
};
