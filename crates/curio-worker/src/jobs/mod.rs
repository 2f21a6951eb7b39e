// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Jobs every worker can run.

mod delete_file;
mod move_file;
mod store_file;

pub use delete_file::DeleteFileJob;
pub use move_file::MoveFileJob;
pub use store_file::{StoreFileJob, UPLOAD_DIR_SETTING};

use curio_jobs::{JobRegistry, RegistryError};

/// Registry holding the built-in storage jobs.
pub fn builtin_registry() -> Result<JobRegistry, RegistryError> {
	let mut registry = JobRegistry::new();
	registry.register_job::<StoreFileJob>()?;
	registry.register_job::<MoveFileJob>()?;
	registry.register_job::<DeleteFileJob>()?;
	Ok(registry)
}
