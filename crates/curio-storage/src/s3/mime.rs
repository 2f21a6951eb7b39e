// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::Path;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Content-Type sent with an upload, chosen by file extension.
pub fn content_type_for(path: &Path) -> &'static str {
	let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
		return DEFAULT_CONTENT_TYPE;
	};

	match ext.to_ascii_lowercase().as_str() {
		"jpg" | "jpeg" => "image/jpeg",
		"png" => "image/png",
		"gif" => "image/gif",
		"webp" => "image/webp",
		"svg" => "image/svg+xml",
		"bmp" => "image/bmp",
		"tif" | "tiff" => "image/tiff",
		"ico" => "image/x-icon",
		"mp3" => "audio/mpeg",
		"wav" => "audio/wav",
		"ogg" => "audio/ogg",
		"mp4" => "video/mp4",
		"webm" => "video/webm",
		"mov" => "video/quicktime",
		"pdf" => "application/pdf",
		"zip" => "application/zip",
		"gz" => "application/gzip",
		"json" => "application/json",
		"xml" => "application/xml",
		"csv" => "text/csv",
		"txt" => "text/plain",
		"html" | "htm" => "text/html",
		"css" => "text/css",
		"js" => "application/javascript",
		_ => DEFAULT_CONTENT_TYPE,
	}
}
