// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Job messages as they travel on the queue.
//!
//! A message is a JSON object:
//!
//! ```json
//! {"className": "ExportJob", "options": {"format": "csv"}, "createdBy": 42}
//! ```
//!
//! `className` and `options` are required; `createdBy` is optional.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::JobError;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescriptor {
	pub class_name: String,
	/// `None` when the message carried `"options": null` or `"options": []`.
	pub options: Option<Map<String, Value>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub created_by: Option<i64>,
}

impl JobDescriptor {
	pub fn new(class_name: impl Into<String>, options: Map<String, Value>) -> Self {
		Self {
			class_name: class_name.into(),
			options: Some(options),
			created_by: None,
		}
	}

	pub fn created_by(mut self, user_id: i64) -> Self {
		self.created_by = Some(user_id);
		self
	}

	/// Serialize for publishing onto a queue.
	pub fn encode(&self) -> String {
		// A struct of strings, integers and JSON maps always serializes.
		serde_json::to_string(self).unwrap_or_default()
	}

	/// Parse a raw queue message.
	///
	/// Does not check that the class is registered.
	pub fn decode(raw: &str) -> Result<Self, JobError> {
		let value: Value = serde_json::from_str(raw)
			.map_err(|e| JobError::MalformedJob(format!("message is not valid JSON: {e}")))?;

		if is_empty_value(&value) {
			return Err(JobError::MalformedJob("message is empty".to_string()));
		}

		let Value::Object(mut fields) = value else {
			return Err(JobError::MalformedJob(
				"message must be a JSON object".to_string(),
			));
		};

		let class_name = match fields.remove("className") {
			Some(Value::String(name)) => name,
			Some(_) => {
				return Err(JobError::MalformedJob(
					"className must be a string".to_string(),
				))
			}
			None => return Err(JobError::MalformedJob("className is missing".to_string())),
		};

		let options = match fields.remove("options") {
			Some(Value::Object(options)) => Some(options),
			// PHP producers encode an empty options map as `[]`.
			Some(Value::Array(items)) if items.is_empty() => None,
			Some(Value::Null) => None,
			Some(_) => {
				return Err(JobError::MalformedJob(
					"options must be an object".to_string(),
				))
			}
			None => return Err(JobError::MalformedJob("options is missing".to_string())),
		};

		let created_by = match fields.remove("createdBy") {
			None | Some(Value::Null) => None,
			Some(Value::Number(n)) => Some(n.as_i64().ok_or_else(|| {
				JobError::MalformedJob("createdBy must be an integer".to_string())
			})?),
			Some(_) => {
				return Err(JobError::MalformedJob(
					"createdBy must be an integer".to_string(),
				))
			}
		};

		Ok(Self {
			class_name,
			options,
			created_by,
		})
	}
}

/// Values a loosely typed producer would treat as "nothing".
fn is_empty_value(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::Bool(b) => !b,
		Value::Number(n) => n.as_f64() == Some(0.0),
		Value::String(s) => s.is_empty() || s == "0",
		Value::Array(items) => items.is_empty(),
		Value::Object(fields) => fields.is_empty(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	fn assert_malformed(raw: &str) {
		match JobDescriptor::decode(raw) {
			Err(JobError::MalformedJob(_)) => {}
			other => panic!("expected MalformedJob for {raw:?}, got {other:?}"),
		}
	}

	#[test]
	fn test_decode_valid_message() {
		let descriptor =
			JobDescriptor::decode(r#"{"className":"ExportJob","options":{"format":"csv"}}"#).unwrap();
		assert_eq!(descriptor.class_name, "ExportJob");
		assert_eq!(
			descriptor.options.unwrap().get("format"),
			Some(&json!("csv"))
		);
		assert!(descriptor.created_by.is_none());
	}

	#[test]
	fn test_decode_created_by() {
		let descriptor =
			JobDescriptor::decode(r#"{"className":"ExportJob","options":{},"createdBy":42}"#)
				.unwrap();
		assert_eq!(descriptor.created_by, Some(42));
	}

	#[test]
	fn test_decode_null_options_and_created_by() {
		let descriptor =
			JobDescriptor::decode(r#"{"className":"A","options":null,"createdBy":null}"#).unwrap();
		assert!(descriptor.options.is_none());
		assert!(descriptor.created_by.is_none());
	}

	#[test]
	fn test_decode_empty_array_options_as_absent() {
		let descriptor = JobDescriptor::decode(r#"{"className":"ExportJob","options":[]}"#).unwrap();
		assert_eq!(descriptor.class_name, "ExportJob");
		assert!(descriptor.options.is_none());
	}

	#[test]
	fn test_decode_rejects_empty_and_falsy_messages() {
		for raw in ["", "null", "false", "0", "\"\"", "[]", "{}"] {
			assert_malformed(raw);
		}
	}

	#[test]
	fn test_decode_rejects_non_objects() {
		for raw in ["[1,2]", "\"ExportJob\"", "true", "12"] {
			assert_malformed(raw);
		}
	}

	#[test]
	fn test_decode_rejects_missing_fields() {
		assert_malformed(r#"{"className":"ExportJob"}"#);
		assert_malformed(r#"{"options":{}}"#);
	}

	#[test]
	fn test_decode_rejects_wrong_field_types() {
		assert_malformed(r#"{"className":7,"options":{}}"#);
		assert_malformed(r#"{"className":"A","options":[1]}"#);
		assert_malformed(r#"{"className":"A","options":{},"createdBy":"42"}"#);
		assert_malformed(r#"{"className":"A","options":{},"createdBy":4.2}"#);
	}

	#[test]
	fn test_decode_rejects_invalid_json() {
		assert_malformed("{className:");
	}

	#[test]
	fn test_encode_uses_wire_names() {
		let options = json!({"format": "csv"}).as_object().cloned().unwrap();
		let encoded = JobDescriptor::new("ExportJob", options).created_by(7).encode();
		let value: Value = serde_json::from_str(&encoded).unwrap();
		assert_eq!(
			value,
			json!({"className": "ExportJob", "options": {"format": "csv"}, "createdBy": 7})
		);
	}

	#[test]
	fn test_encode_omits_absent_creator() {
		let encoded = JobDescriptor::new("ExportJob", Map::new()).encode();
		assert!(!encoded.contains("createdBy"));
		assert_eq!(
			JobDescriptor::decode(&encoded).unwrap().class_name,
			"ExportJob"
		);
	}
}
