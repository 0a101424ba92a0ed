// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use pdp_core::{Error, Result};
use pdp_value::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsoleStream {
	Stdout,
	Stderr,
}

#[derive(Clone, Debug)]
pub struct ConsoleLogConfig {
	pub stream: ConsoleStream,
}

#[derive(Clone, Debug)]
pub struct RemoteLogConfig {
	pub url: String,
	pub max_retries: u32,
}

/// The `decision_logs` config section. Either sink is independently
/// optional; both may be configured at once to fan a decision out to both.
#[derive(Clone, Debug, Default)]
pub struct DecisionLogsConfig {
	pub console: Option<ConsoleLogConfig>,
	pub remote: Option<RemoteLogConfig>,
}

impl DecisionLogsConfig {
	/// `raw` is the already-parsed `decision_logs` subtree; absent
	/// entirely is valid (no logging configured).
	pub fn from_raw(raw: Option<&Value>) -> Result<Self> {
		let Some(raw) = raw else { return Ok(Self::default()) };

		let console = match raw.get_key("console") {
			Some(console_raw) => {
				let stream = match console_raw.get_key("stream").and_then(Value::as_str) {
					Some("stderr") => ConsoleStream::Stderr,
					Some("stdout") | None => ConsoleStream::Stdout,
					Some(other) => return Err(Error::internal(format!("decision_logs.console.stream: unknown value \"{other}\""))),
				};
				Some(ConsoleLogConfig { stream })
			}
			None => None,
		};

		let remote = match raw.get_key("remote") {
			Some(remote_raw) => {
				let url = remote_raw
					.get_key("url")
					.and_then(Value::as_str)
					.ok_or_else(|| Error::internal("decision_logs.remote.url is required"))?
					.to_string();
				let max_retries = remote_raw
					.get_key("max_retries")
					.and_then(Value::as_number)
					.and_then(|n| n.to_i64())
					.map(|n| n.max(0) as u32)
					.unwrap_or(3);
				Some(RemoteLogConfig { url, max_retries })
			}
			None => None,
		};

		Ok(Self { console, remote })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn absent_section_yields_no_sinks() {
		let config = DecisionLogsConfig::from_raw(None).unwrap();
		assert!(config.console.is_none());
		assert!(config.remote.is_none());
	}

	#[test]
	fn remote_without_url_fails() {
		let raw = Value::object(vec![("remote".into(), Value::empty_object())]);
		assert!(DecisionLogsConfig::from_raw(Some(&raw)).is_err());
	}

	#[test]
	fn parses_console_stderr() {
		let raw = Value::object(vec![(
			"console".into(),
			Value::object(vec![("stream".into(), Value::string("stderr"))]),
		)]);
		let config = DecisionLogsConfig::from_raw(Some(&raw)).unwrap();
		assert_eq!(config.console.unwrap().stream, ConsoleStream::Stderr);
	}
}
