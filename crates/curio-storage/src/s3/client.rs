// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP transport for the S3 REST API.

use std::time::Duration;

use bytes::Bytes;
use curio_common_http::{retry, RetryConfig};
use reqwest::{Client, Method, Response};
use tracing::{debug, error};

use crate::error::{ConfigurationError, StorageError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_ATTEMPTS: u32 = 3;

/// A fully signed request, replayable across retry attempts.
#[derive(Debug, Clone)]
pub(crate) struct S3Request {
	pub method: Method,
	pub url: String,
	pub headers: Vec<(String, String)>,
	pub body: Option<Bytes>,
}

/// Shared HTTP client for S3 calls.
///
/// Transport timeouts are retried up to three attempts in total. HTTP error
/// statuses are handed back to the adapter unchanged.
#[derive(Debug, Clone)]
pub struct S3Client {
	http_client: Client,
	retry_config: RetryConfig,
}

impl S3Client {
	pub fn new() -> Result<Self, ConfigurationError> {
		Self::with_timeout(REQUEST_TIMEOUT)
	}

	/// Build a client whose individual requests time out after `timeout`.
	pub fn with_timeout(timeout: Duration) -> Result<Self, ConfigurationError> {
		let http_client = curio_common_http::new_client_with_timeout(timeout)
			.map_err(ConfigurationError::HttpClient)?;
		Ok(Self::from_http_client(http_client))
	}

	pub fn from_http_client(http_client: Client) -> Self {
		Self {
			http_client,
			retry_config: RetryConfig::with_max_attempts(MAX_ATTEMPTS),
		}
	}

	/// Sets a custom retry configuration.
	pub fn with_retry_config(mut self, config: RetryConfig) -> Self {
		self.retry_config = config;
		self
	}

	pub(crate) async fn execute(&self, request: &S3Request) -> Result<Response, StorageError> {
		retry(&self.retry_config, || self.execute_once(request)).await
	}

	async fn execute_once(&self, request: &S3Request) -> Result<Response, StorageError> {
		debug!(method = %request.method, url = %request.url, "sending S3 request");

		let mut builder = self
			.http_client
			.request(request.method.clone(), &request.url);
		for (name, value) in &request.headers {
			builder = builder.header(name.as_str(), value.as_str());
		}
		if let Some(body) = &request.body {
			builder = builder.body(body.clone());
		}

		let response = builder.send().await.map_err(|e| {
			if e.is_timeout() {
				error!(method = %request.method, url = %request.url, "S3 request timed out");
			} else {
				error!(error = %e, method = %request.method, "network error during S3 request");
			}
			StorageError::from(e)
		})?;

		debug!(status = %response.status(), "received S3 response");
		Ok(response)
	}
}
