// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! S3 REST authentication (HMAC-SHA1, signature version 2).

use std::collections::BTreeMap;

use crate::encoding::form_encode;
use crate::compute_hmac_sha1;

/// `x-amz-*` headers that take part in the signature.
///
/// Keys must already be lowercase; the map keeps them in the sorted order the
/// canonical form requires.
pub type AmzHeaders = BTreeMap<String, String>;

/// Build the canonical string-to-sign for a request.
///
/// ```text
/// VERB \n Content-MD5 \n Content-Type \n Date-or-Expires \n
/// x-amz-header:value \n ... Resource
/// ```
pub fn string_to_sign(
	method: &str,
	content_md5: &str,
	content_type: &str,
	date: &str,
	amz_headers: &AmzHeaders,
	resource: &str,
) -> String {
	let mut out = format!("{method}\n{content_md5}\n{content_type}\n{date}\n");
	for (name, value) in amz_headers {
		out.push_str(name);
		out.push(':');
		out.push_str(value.trim());
		out.push('\n');
	}
	out.push_str(resource);
	out
}

/// Value for the `Authorization` header of an API request.
pub fn authorization_header(access_key_id: &str, secret_key: &str, string_to_sign: &str) -> String {
	let signature = compute_hmac_sha1(secret_key.as_bytes(), string_to_sign.as_bytes());
	format!("AWS {access_key_id}:{signature}")
}

/// Build a query-string authenticated GET URL for `object_name`.
///
/// `object_name` is the backend-native identifier (bucket-prefixed key) and
/// `expires` is an absolute Unix timestamp in seconds.
pub fn presigned_get_url(
	endpoint: &str,
	object_name: &str,
	access_key_id: &str,
	secret_key: &str,
	expires: i64,
) -> String {
	let object = form_encode(object_name);
	let resource = format!("/{object}");
	let to_sign = string_to_sign("GET", "", "", &expires.to_string(), &AmzHeaders::new(), &resource);
	let signature = compute_hmac_sha1(secret_key.as_bytes(), to_sign.as_bytes());

	format!(
		"{}/{object}?AWSAccessKeyId={}&Expires={expires}&Signature={}",
		endpoint.trim_end_matches('/'),
		form_encode(access_key_id),
		form_encode(&signature)
	)
}
