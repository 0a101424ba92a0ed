// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use crate::config::KafkaConfig;
use pdp_core::Result;
use pdp_plugin::Fetcher;
use pdp_value::Value;
use std::future::Future;
use std::time::Duration;

/// Stands in for a real consumer-group client against `config.brokers`.
/// Owns nothing but the config it was built from; a vendor client would
/// replace this with a long-lived consumer handle and translate `fetch`
/// into a bounded `poll`.
pub struct KafkaFetcher {
	config: KafkaConfig,
}

impl KafkaFetcher {
	pub fn new(config: KafkaConfig) -> Self {
		Self { config }
	}
}

impl Fetcher for KafkaFetcher {
	fn fetch(&mut self, _timeout: Duration) -> impl Future<Output = Result<Value>> + Send {
		let topics = self.config.topics.clone();
		async move {
			tracing::trace!(topics = ?topics, "kafka fetch stand-in: no messages");
			Ok(Value::array(Vec::new()))
		}
	}
}
