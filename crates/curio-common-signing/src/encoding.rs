// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! `application/x-www-form-urlencoded` encoding as used by signed URLs.

/// Percent-encode `input` the way HTML form encoding does.
///
/// ASCII alphanumerics and `-`, `_`, `.` pass through, a space becomes `+`,
/// and every other byte (including `/` and `~`) becomes `%XX` with uppercase
/// hex digits. This differs from RFC 3986 path encoding in the handling of
/// space, `/` and `~`.
pub fn form_encode(input: &str) -> String {
	// urlencoding leaves `~` alone and writes a space as `%20`; every `%` in its
	// output starts an escape triple, so the `%20` replacement cannot misfire.
	urlencoding::encode(input)
		.replace("%20", "+")
		.replace('~', "%7E")
}

/// Percent-encode a `/`-separated object path for use in a request URL.
///
/// Each segment is encoded on its own so the separators survive.
pub fn encode_path(path: &str) -> String {
	path.split('/')
		.map(|segment| urlencoding::encode(segment).into_owned())
		.collect::<Vec<_>>()
		.join("/")
}
