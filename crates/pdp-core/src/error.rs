// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The stable wire error codes. These are serialized verbatim in the
/// `{"code": "...", "message": "..."}` error body and must never be renamed
/// once shipped.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireCode {
	NotFound,
	InvalidPatch,
	WriteConflict,
	InvalidTransaction,
	WritesNotSupported,
	ReadsNotSupported,
	Internal,
	EvalConflictError,
	EvalBuiltinError,
	EvalCancel,
	QuotaExceeded,
	Unauthorized,
}

impl Display for WireCode {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let s = match self {
			WireCode::NotFound => "not_found",
			WireCode::InvalidPatch => "invalid_patch",
			WireCode::WriteConflict => "write_conflict",
			WireCode::InvalidTransaction => "invalid_transaction",
			WireCode::WritesNotSupported => "writes_not_supported",
			WireCode::ReadsNotSupported => "reads_not_supported",
			WireCode::Internal => "internal",
			WireCode::EvalConflictError => "eval_conflict_error",
			WireCode::EvalBuiltinError => "eval_builtin_error",
			WireCode::EvalCancel => "eval_cancel",
			WireCode::QuotaExceeded => "quota_exceeded",
			WireCode::Unauthorized => "unauthorized",
		};
		f.write_str(s)
	}
}

/// The top-level error type every component crate's error converts into at
/// its boundary, carrying a stable wire code alongside a free-form message.
#[derive(Clone, Debug, thiserror::Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct Error {
	pub code: WireCode,
	pub message: String,
}

impl Error {
	pub fn new(code: WireCode, message: impl Into<String>) -> Self {
		Self { code, message: message.into() }
	}

	pub fn not_found(message: impl Into<String>) -> Self {
		Self::new(WireCode::NotFound, message)
	}

	pub fn invalid_patch(message: impl Into<String>) -> Self {
		Self::new(WireCode::InvalidPatch, message)
	}

	pub fn write_conflict(message: impl Into<String>) -> Self {
		Self::new(WireCode::WriteConflict, message)
	}

	pub fn owned_by_plugin(path: &str, plugin: &str) -> Self {
		Self::new(WireCode::WriteConflict, format!("path \"{path}\" is owned by plugin \"{plugin}\""))
	}

	pub fn invalid_transaction(message: impl Into<String>) -> Self {
		Self::new(WireCode::InvalidTransaction, message)
	}

	pub fn writes_not_supported(message: impl Into<String>) -> Self {
		Self::new(WireCode::WritesNotSupported, message)
	}

	pub fn reads_not_supported(message: impl Into<String>) -> Self {
		Self::new(WireCode::ReadsNotSupported, message)
	}

	pub fn internal(message: impl Into<String>) -> Self {
		Self::new(WireCode::Internal, message)
	}

	pub fn eval_conflict(message: impl Into<String>) -> Self {
		Self::new(WireCode::EvalConflictError, message)
	}

	pub fn eval_builtin(message: impl Into<String>) -> Self {
		Self::new(WireCode::EvalBuiltinError, message)
	}

	pub fn eval_cancel() -> Self {
		Self::new(WireCode::EvalCancel, "evaluation cancelled")
	}

	pub fn quota_exceeded(message: impl Into<String>) -> Self {
		Self::new(WireCode::QuotaExceeded, message)
	}

	pub fn unauthorized(message: impl Into<String>) -> Self {
		Self::new(WireCode::Unauthorized, message)
	}

	/// HTTP status this error maps to.
	pub fn http_status(&self) -> u16 {
		match self.code {
			WireCode::NotFound => 404,
			WireCode::InvalidPatch => 400,
			WireCode::WriteConflict | WireCode::InvalidTransaction => 409,
			WireCode::WritesNotSupported | WireCode::ReadsNotSupported => 400,
			WireCode::EvalConflictError => 500,
			WireCode::EvalBuiltinError => 500,
			WireCode::EvalCancel => 499,
			WireCode::QuotaExceeded => 429,
			WireCode::Unauthorized => 401,
			WireCode::Internal => 500,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn wire_code_renders_stable_snake_case() {
		assert_eq!(WireCode::EvalConflictError.to_string(), "eval_conflict_error");
		assert_eq!(serde_json::to_string(&WireCode::NotFound).unwrap(), "\"not_found\"");
	}

	#[test]
	fn owned_by_plugin_message_names_path_and_plugin() {
		let err = Error::owned_by_plugin("/kafka/messages", "kafka");
		assert_eq!(err.message, "path \"/kafka/messages\" is owned by plugin \"kafka\"");
	}

	#[test]
	fn http_status_mapping() {
		assert_eq!(Error::not_found("x").http_status(), 404);
		assert_eq!(Error::invalid_patch("x").http_status(), 400);
		assert_eq!(Error::write_conflict("x").http_status(), 409);
		assert_eq!(Error::eval_conflict("x").http_status(), 500);
	}
}
