// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! [`StorageAdapter`] backed by an S3-compatible object store.
//!
//! API calls use path-style addressing (`{endpoint}/{bucket}/{key}`) and the
//! HMAC-SHA1 `Authorization` header scheme. Links returned by
//! [`S3Adapter::uri`] are query-string signed when an expiration is
//! configured; the object identifier inside them is form-encoded as a whole
//! so previously issued links keep their exact shape.

use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use curio_common_signing::{
	authorization_header, encode_path, form_encode, presigned_get_url, string_to_sign, AmzHeaders,
};
use curio_config::{S3Options, SecretString};
use reqwest::{Method, StatusCode};
use tracing::{debug, info, instrument, warn};

use super::client::{S3Client, S3Request};
use super::mime::content_type_for;
use crate::adapter::{validate_key, DeleteOutcome, StorageAdapter};
use crate::error::{ConfigurationError, Result, StorageError};

const DEFAULT_ENDPOINT: &str = "https://s3.amazonaws.com";
const DEFAULT_REGION: &str = "us-east-1";

/// Longest signed URL lifetime accepted, ten years in minutes.
pub const MAX_EXPIRATION_MINUTES: i64 = 60 * 24 * 365 * 10;

const ACL_PRIVATE: &str = "private";
const ACL_PUBLIC_READ: &str = "public-read";

pub struct S3Adapter {
	client: S3Client,
	access_key_id: String,
	secret_access_key: SecretString,
	bucket: String,
	endpoint: String,
	/// Signed URL lifetime in minutes; zero means public, unsigned links.
	expiration: i64,
}

impl std::fmt::Debug for S3Adapter {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("S3Adapter")
			.field("access_key_id", &self.access_key_id)
			.field("secret_access_key", &self.secret_access_key)
			.field("bucket", &self.bucket)
			.field("endpoint", &self.endpoint)
			.field("expiration", &self.expiration)
			.finish()
	}
}

impl S3Adapter {
	/// Validate `options` and bind them to `client`.
	pub fn new(options: S3Options, client: S3Client) -> std::result::Result<Self, ConfigurationError> {
		let access_key_id = options
			.access_key_id
			.filter(|k| !k.is_empty())
			.ok_or(ConfigurationError::MissingCredentials)?;
		let secret_access_key = options
			.secret_access_key
			.filter(|s| !s.expose().is_empty())
			.ok_or(ConfigurationError::MissingCredentials)?;
		let bucket = options
			.bucket
			.filter(|b| !b.is_empty())
			.ok_or(ConfigurationError::MissingBucket)?;

		let endpoint = resolve_endpoint(options.endpoint.as_deref(), options.region.as_deref())?;
		let expiration = options.expiration.filter(|m| *m > 0).unwrap_or(0);
		if expiration > MAX_EXPIRATION_MINUTES {
			return Err(ConfigurationError::InvalidExpiration {
				minutes: expiration,
				max: MAX_EXPIRATION_MINUTES,
			});
		}

		debug!(
			bucket = %bucket,
			endpoint = %endpoint,
			expiration_minutes = expiration,
			"configured S3 adapter"
		);

		Ok(Self {
			client,
			access_key_id,
			secret_access_key,
			bucket,
			endpoint,
			expiration,
		})
	}

	pub fn bucket(&self) -> &str {
		&self.bucket
	}

	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	/// Backend-native identifier for `key`.
	fn object_name(&self, key: &str) -> String {
		format!("{}/{}", self.bucket, key)
	}

	fn acl(&self) -> &'static str {
		if self.expiration > 0 {
			ACL_PRIVATE
		} else {
			ACL_PUBLIC_READ
		}
	}

	/// URL for `key` as of `now`.
	///
	/// With no expiration this is the stable public URL. Otherwise the URL
	/// carries `AWSAccessKeyId`, `Expires` (`now` plus the configured minutes)
	/// and `Signature`.
	pub fn uri_at(&self, key: &str, now: DateTime<Utc>) -> String {
		let object_name = self.object_name(key);

		if self.expiration <= 0 {
			return format!("{}/{}", self.endpoint, form_encode(&object_name));
		}

		let expires = now
			.timestamp()
			.saturating_add(self.expiration.saturating_mul(60));
		presigned_get_url(
			&self.endpoint,
			&object_name,
			&self.access_key_id,
			self.secret_access_key.expose(),
			expires,
		)
	}

	/// Build a signed API request. `key` of `None` addresses the bucket itself.
	fn signed_request(
		&self,
		method: Method,
		key: Option<&str>,
		content_type: Option<&str>,
		amz_headers: AmzHeaders,
		body: Option<Bytes>,
		now: DateTime<Utc>,
	) -> S3Request {
		let resource = match key {
			Some(key) => format!("/{}/{}", self.bucket, encode_path(key)),
			None => format!("/{}", self.bucket),
		};
		let date = now.format("%a, %d %b %Y %H:%M:%S GMT").to_string();
		let to_sign = string_to_sign(
			method.as_str(),
			"",
			content_type.unwrap_or(""),
			&date,
			&amz_headers,
			&resource,
		);
		let authorization = authorization_header(
			&self.access_key_id,
			self.secret_access_key.expose(),
			&to_sign,
		);

		let mut headers = vec![
			("Date".to_string(), date),
			("Authorization".to_string(), authorization),
		];
		if let Some(content_type) = content_type {
			headers.push(("Content-Type".to_string(), content_type.to_string()));
		}
		headers.extend(amz_headers);

		S3Request {
			method,
			url: format!("{}{}", self.endpoint, resource),
			headers,
			body,
		}
	}

	/// HEAD the object: `Ok(true)` on 2xx, `Ok(false)` on 404.
	async fn object_exists(&self, key: &str) -> Result<bool> {
		let request = self.signed_request(
			Method::HEAD,
			Some(key),
			None,
			AmzHeaders::new(),
			None,
			Utc::now(),
		);
		let response = self.client.execute(&request).await?;
		let status = response.status();

		if status.is_success() {
			Ok(true)
		} else if status == StatusCode::NOT_FOUND {
			Ok(false)
		} else {
			Err(StorageError::UnexpectedStatus {
				status: status.as_u16(),
				body: String::new(),
			})
		}
	}

	async fn copy_object(&self, source: &str, dest: &str) -> Result<()> {
		let mut amz = AmzHeaders::new();
		amz.insert("x-amz-acl".to_string(), self.acl().to_string());
		amz.insert(
			"x-amz-copy-source".to_string(),
			format!("/{}/{}", self.bucket, encode_path(source)),
		);

		let request = self.signed_request(
			Method::PUT,
			Some(dest),
			None,
			amz,
			Some(Bytes::new()),
			Utc::now(),
		);
		let response = self.client.execute(&request).await?;
		ensure_success(response).await
	}

	async fn delete_object(&self, key: &str) -> Result<()> {
		let request = self.signed_request(
			Method::DELETE,
			Some(key),
			None,
			AmzHeaders::new(),
			None,
			Utc::now(),
		);
		let response = self.client.execute(&request).await?;
		ensure_success(response).await
	}
}

async fn ensure_success(response: reqwest::Response) -> Result<()> {
	let status = response.status();
	if status.is_success() {
		return Ok(());
	}
	let body = response.text().await.unwrap_or_default();
	Err(StorageError::UnexpectedStatus {
		status: status.as_u16(),
		body,
	})
}

fn resolve_endpoint(
	endpoint: Option<&str>,
	region: Option<&str>,
) -> std::result::Result<String, ConfigurationError> {
	if let Some(endpoint) = endpoint.filter(|e| !e.is_empty()) {
		if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
			return Err(ConfigurationError::InvalidEndpoint {
				endpoint: endpoint.to_string(),
				reason: "must start with http:// or https://".to_string(),
			});
		}
		return Ok(endpoint.trim_end_matches('/').to_string());
	}

	match region.filter(|r| !r.is_empty() && *r != DEFAULT_REGION) {
		Some(region) => Ok(format!("https://s3-{region}.amazonaws.com")),
		None => Ok(DEFAULT_ENDPOINT.to_string()),
	}
}

#[async_trait]
impl StorageAdapter for S3Adapter {
	fn name(&self) -> &'static str {
		"s3"
	}

	#[instrument(skip(self), fields(bucket = %self.bucket))]
	async fn can_store(&self) -> bool {
		let request = self.signed_request(
			Method::HEAD,
			None,
			None,
			AmzHeaders::new(),
			None,
			Utc::now(),
		);
		match self.client.execute(&request).await {
			Ok(response) if response.status() == StatusCode::OK => true,
			Ok(response) => {
				warn!(status = %response.status(), "bucket is not reachable");
				false
			}
			Err(e) => {
				warn!(error = %e, "bucket reachability check failed");
				false
			}
		}
	}

	#[instrument(skip(self, source), fields(source = %source.display()))]
	async fn store(&self, source: &Path, dest: &str) -> Result<()> {
		validate_key(dest)?;
		let store_failed = |reason: String| StorageError::StoreFailed {
			path: source.to_path_buf(),
			key: dest.to_string(),
			reason,
		};

		let contents = tokio::fs::read(source)
			.await
			.map_err(|e| store_failed(e.to_string()))?;
		let content_type = content_type_for(source);

		let mut amz = AmzHeaders::new();
		amz.insert("x-amz-acl".to_string(), self.acl().to_string());

		let request = self.signed_request(
			Method::PUT,
			Some(dest),
			Some(content_type),
			amz,
			Some(Bytes::from(contents)),
			Utc::now(),
		);
		let response = self
			.client
			.execute(&request)
			.await
			.map_err(|e| store_failed(e.to_string()))?;
		ensure_success(response)
			.await
			.map_err(|e| store_failed(e.to_string()))?;

		info!(
			source = %source.display(),
			object = %self.object_name(dest),
			acl = self.acl(),
			"stored file"
		);

		if let Err(e) = tokio::fs::remove_file(source).await {
			warn!(error = %e, source = %source.display(), "stored file but could not remove local copy");
		}
		Ok(())
	}

	#[instrument(skip(self))]
	async fn move_file(&self, source: &str, dest: &str) -> Result<()> {
		validate_key(source)?;
		validate_key(dest)?;
		let move_failed = |reason: String| StorageError::MoveFailed {
			from: source.to_string(),
			to: dest.to_string(),
			reason,
		};

		self.copy_object(source, dest)
			.await
			.map_err(|e| move_failed(format!("copy failed: {e}")))?;
		self.delete_object(source)
			.await
			.map_err(|e| move_failed(format!("removing source failed: {e}")))?;

		info!(
			from = %self.object_name(source),
			to = %self.object_name(dest),
			"moved file"
		);
		Ok(())
	}

	#[instrument(skip(self))]
	async fn delete(&self, key: &str) -> Result<DeleteOutcome> {
		validate_key(key)?;

		let failure = match self.delete_object(key).await {
			Ok(()) => {
				info!(object = %self.object_name(key), "deleted file");
				return Ok(DeleteOutcome::Deleted);
			}
			Err(e) => e,
		};

		match self.object_exists(key).await {
			Ok(false) => {
				warn!(
					object = %self.object_name(key),
					error = %failure,
					"delete reported failure but object is already absent"
				);
				Ok(DeleteOutcome::AlreadyAbsent)
			}
			Ok(true) => Err(StorageError::DeleteFailed {
				key: key.to_string(),
				reason: failure.to_string(),
			}),
			Err(check) => Err(StorageError::DeleteFailed {
				key: key.to_string(),
				reason: format!("{failure}; existence check failed: {check}"),
			}),
		}
	}

	fn uri(&self, key: &str) -> String {
		self.uri_at(key, Utc::now())
	}
}
