// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use serde::{Deserialize, Serialize};

/// The query-string knobs a preview request accepts, each defaulting to
/// `false`.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PreviewFlags {
	/// Unbinds the live primary layer entirely; only overlay data is
	/// visible, and bundle provenance is omitted from the response.
	pub sandbox: bool,
	/// Forwarded to `EvalOptions::strict_builtin_errors`.
	pub strict_builtin_errors: bool,
	/// Reserved for a future `print` instruction; captured now so the
	/// request shape is stable once one lands.
	pub print: bool,
	/// Include `EvalStats` in the response.
	pub metrics: bool,
	/// Wrap the evaluation in a tracing span, independent of whether
	/// `metrics` is also requested.
	pub instrument: bool,
	/// Include bundle revision provenance in the response.
	pub provenance: bool,
	/// Consumed entirely by the HTTP layer's serializer; carried here so
	/// callers have one flags struct to build from a query string.
	pub pretty: bool,
}
