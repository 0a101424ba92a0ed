// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use crate::request::PreviewRequest;
use flate2::read::GzDecoder;
use pdp_core::{Error, Result};
use std::io::Read;

/// The two body encodings a preview request may arrive in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyFormat {
	Json,
	Yaml,
}

/// Decodes a preview request body. `gzip` mirrors the `Content-Encoding:
/// gzip` case; the HTTP layer is responsible for detecting it from
/// headers and passing the flag through. Routing and header parsing
/// themselves are handled by a thinner layer above this crate.
pub fn decode_request(bytes: &[u8], format: BodyFormat, gzip: bool) -> Result<PreviewRequest> {
	let plain;
	let body: &[u8] = if gzip {
		let mut decoder = GzDecoder::new(bytes);
		let mut out = Vec::new();
		decoder.read_to_end(&mut out).map_err(|e| Error::internal(format!("gzip decode failed: {e}")))?;
		plain = out;
		&plain
	} else {
		bytes
	};

	match format {
		BodyFormat::Json => {
			serde_json::from_slice(body).map_err(|e| Error::internal(format!("invalid JSON preview body: {e}")))
		}
		BodyFormat::Yaml => {
			serde_yaml::from_slice(body).map_err(|e| Error::internal(format!("invalid YAML preview body: {e}")))
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use flate2::Compression;
	use flate2::write::GzEncoder;
	use std::io::Write;

	#[test]
	fn decodes_plain_json_body() {
		let body = br#"{"plan_name": "test/p", "data": {}}"#;
		let request = decode_request(body, BodyFormat::Json, false).unwrap();
		assert_eq!(request.plan_name, "test/p");
	}

	#[test]
	fn decodes_gzipped_yaml_body() {
		let yaml = "plan_name: test/p\ndata: {}\n";
		let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
		encoder.write_all(yaml.as_bytes()).unwrap();
		let gzipped = encoder.finish().unwrap();

		let request = decode_request(&gzipped, BodyFormat::Yaml, true).unwrap();
		assert_eq!(request.plan_name, "test/p");
	}

	#[test]
	fn malformed_json_is_an_internal_error() {
		assert!(decode_request(b"{not json", BodyFormat::Json, false).is_err());
	}
}
