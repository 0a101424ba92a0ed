// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use pdp_core::Error;

#[derive(Debug, thiserror::Error)]
pub enum KafkaConfigError {
	#[error("malformed kafka plugin configuration: {0}")]
	Malformed(#[from] serde_json::Error),
	#[error("unknown SASL mechanism \"{0}\", expected one of PLAIN, SCRAM-SHA-256, SCRAM-SHA-512")]
	UnknownSaslMechanism(String),
	#[error("tls client_cert configured without client_key, or vice versa")]
	CertWithoutKey,
	#[error("kafka plugin requires at least one broker")]
	NoBrokers,
	#[error("kafka plugin requires at least one topic")]
	NoTopics,
}

impl From<KafkaConfigError> for Error {
	fn from(err: KafkaConfigError) -> Self {
		Error::internal(err.to_string())
	}
}
