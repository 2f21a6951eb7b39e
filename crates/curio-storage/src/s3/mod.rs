// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! S3-compatible object storage backend.

mod adapter;
mod client;
mod mime;

pub use adapter::S3Adapter;
pub use client::S3Client;
pub use mime::content_type_for;
