// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Jobs configuration section.
//!
//! `options` holds the process-wide settings handed to every job the worker
//! builds. They override any same-named option carried in a job message.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JobsConfigLayer {
	pub options: Option<Map<String, Value>>,
}

impl JobsConfigLayer {
	/// Option tables merge key by key; `other` wins on collision.
	pub fn merge(&mut self, other: Self) {
		match (self.options.as_mut(), other.options) {
			(Some(mine), Some(theirs)) => mine.extend(theirs),
			(None, Some(theirs)) => self.options = Some(theirs),
			_ => {}
		}
	}

	pub fn finalize(self) -> JobsConfig {
		JobsConfig {
			options: self.options.unwrap_or_default(),
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct JobsConfig {
	pub options: Map<String, Value>,
}
