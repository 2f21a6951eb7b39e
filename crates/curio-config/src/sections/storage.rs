// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Storage configuration section.
//!
//! Keys use camelCase names (`accessKeyId`, `secretAccessKey`, ...). Required
//! values are not enforced here; the adapter rejects an incomplete
//! configuration when it is constructed.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::secret::SecretString;

/// Which storage backend the worker binds the storage contract to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
	#[default]
	Filesystem,
	S3,
}

impl std::str::FromStr for StorageBackend {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"filesystem" | "local" => Ok(Self::Filesystem),
			"s3" => Ok(Self::S3),
			other => Err(format!("unknown storage adapter '{other}'")),
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfigLayer {
	pub adapter: Option<StorageBackend>,
	pub access_key_id: Option<String>,
	pub secret_access_key: Option<SecretString>,
	pub region: Option<String>,
	pub bucket: Option<String>,
	pub expiration: Option<i64>,
	pub endpoint: Option<String>,
	pub local_dir: Option<PathBuf>,
	pub web_dir: Option<String>,
}

impl StorageConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.adapter.is_some() {
			self.adapter = other.adapter;
		}
		if other.access_key_id.is_some() {
			self.access_key_id = other.access_key_id;
		}
		if other.secret_access_key.is_some() {
			self.secret_access_key = other.secret_access_key;
		}
		if other.region.is_some() {
			self.region = other.region;
		}
		if other.bucket.is_some() {
			self.bucket = other.bucket;
		}
		if other.expiration.is_some() {
			self.expiration = other.expiration;
		}
		if other.endpoint.is_some() {
			self.endpoint = other.endpoint;
		}
		if other.local_dir.is_some() {
			self.local_dir = other.local_dir;
		}
		if other.web_dir.is_some() {
			self.web_dir = other.web_dir;
		}
	}

	pub fn finalize(self) -> StorageConfig {
		StorageConfig {
			adapter: self.adapter.unwrap_or_default(),
			s3: S3Options {
				access_key_id: self.access_key_id,
				secret_access_key: self.secret_access_key,
				region: self.region,
				bucket: self.bucket,
				expiration: self.expiration,
				endpoint: self.endpoint,
			},
			filesystem: FilesystemOptions {
				local_dir: self.local_dir,
				web_dir: self.web_dir,
			},
		}
	}
}

/// Options for the S3-compatible adapter.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct S3Options {
	pub access_key_id: Option<String>,
	pub secret_access_key: Option<SecretString>,
	pub region: Option<String>,
	pub bucket: Option<String>,
	/// Signed URL lifetime in minutes. Zero, negative or absent means objects
	/// are public and URLs are unsigned.
	pub expiration: Option<i64>,
	pub endpoint: Option<String>,
}

/// Options for the local filesystem adapter.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilesystemOptions {
	pub local_dir: Option<PathBuf>,
	pub web_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
	pub adapter: StorageBackend,
	pub s3: S3Options,
	pub filesystem: FilesystemOptions,
}
