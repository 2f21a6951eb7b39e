// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! File storage for Curio.
//!
//! Callers work against [`StorageAdapter`] and hold it as
//! `Arc<dyn StorageAdapter>`; [`adapter_from_config`] binds it to either the
//! S3-compatible backend or the local filesystem backend.
//!
//! # Example
//!
//! ```ignore
//! use curio_storage::adapter_from_config;
//!
//! let storage = adapter_from_config(&config.storage)?;
//! storage.store(Path::new("/tmp/upload-1.jpg"), "files/1/original.jpg").await?;
//! println!("{}", storage.uri("files/1/original.jpg"));
//! ```

pub mod adapter;
pub mod backend;
pub mod error;
pub mod filesystem;
pub mod s3;

pub use adapter::{validate_key, DeleteOutcome, StorageAdapter};
pub use backend::adapter_from_config;
pub use error::{ConfigurationError, Result, StorageError};
pub use filesystem::FilesystemAdapter;
pub use s3::{S3Adapter, S3Client};
