// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for Curio.
//!
//! This crate provides:
//! - A pre-configured HTTP client with a consistent User-Agent header
//! - Bounded retry with exponential backoff for transient timeouts
//!
//! Clients built here are meant to be constructed once at startup and passed
//! into the components that need them. Nothing in this crate holds a
//! process-wide default client.

mod client;
mod retry;

pub use client::new_client_with_timeout;
pub use retry::{retry, RetryConfig, RetryableError};
