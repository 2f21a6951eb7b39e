// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HMAC-SHA1 signing for the S3 REST API.
//!
//! Two flavours of the same scheme are provided:
//!
//! - [`authorization_header`]: signs an API request and produces the value
//!   of the `Authorization` header.
//! - [`presigned_get_url`]: builds a query-string authenticated URL that grants
//!   time-limited read access to a private object.
//!
//! Both use [`string_to_sign`] and [`compute_hmac_sha1`]. The signed URL has
//! to match URLs already handed out for stored content, so its encoding
//! follows [`form_encode`] exactly.

mod encoding;
mod s3;

pub use encoding::{encode_path, form_encode};
pub use s3::{authorization_header, presigned_get_url, string_to_sign, AmzHeaders};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Compute an HMAC-SHA1 over `payload` and return the raw digest base64-encoded.
pub fn compute_hmac_sha1(secret: &[u8], payload: &[u8]) -> String {
	let mut mac = HmacSha1::new_from_slice(secret).expect("HMAC can take key of any size");
	mac.update(payload);
	STANDARD.encode(mac.finalize().into_bytes())
}

/// Verify a base64-encoded HMAC-SHA1 signature in constant time.
#[cfg(test)]
pub(crate) fn verify_hmac_sha1(secret: &[u8], payload: &[u8], signature: &str) -> bool {
	let expected_bytes = match STANDARD.decode(signature) {
		Ok(bytes) => bytes,
		Err(_) => return false,
	};

	let mut mac = match HmacSha1::new_from_slice(secret) {
		Ok(m) => m,
		Err(_) => return false,
	};

	mac.update(payload);
	mac.verify_slice(&expected_bytes).is_ok()
}

#[cfg(test)]
mod tests {
	use super::*;

	/// RFC 2202 test case 2.
	#[test]
	fn test_compute_hmac_sha1_known_vector() {
		let sig = compute_hmac_sha1(b"Jefe", b"what do ya want for nothing?");
		// effcdf6ae5eb2fa2d27416d5f184df9c259a7c79
		assert_eq!(sig, "7/zfauXrL6LSdBbV8YTfnCWafHk=");
	}

	#[test]
	fn test_signature_is_28_chars() {
		let sig = compute_hmac_sha1(b"secret", b"payload");
		assert_eq!(sig.len(), 28);
		assert!(sig.ends_with('='));
	}

	#[test]
	fn test_verify_valid() {
		let sig = compute_hmac_sha1(b"secret", b"GET\n\n\n1\n/a");
		assert!(verify_hmac_sha1(b"secret", b"GET\n\n\n1\n/a", &sig));
	}

	#[test]
	fn test_verify_wrong_secret() {
		let sig = compute_hmac_sha1(b"secret", b"payload");
		assert!(!verify_hmac_sha1(b"other", b"payload", &sig));
	}

	#[test]
	fn test_verify_invalid_base64() {
		assert!(!verify_hmac_sha1(b"secret", b"payload", "***not base64***"));
	}
}
