// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Curio worker: consumes job messages and runs the built-in storage jobs.

pub mod consumer;
pub mod jobs;

pub use consumer::{ConsumeSummary, Consumer};
pub use jobs::{builtin_registry, UPLOAD_DIR_SETTING};
