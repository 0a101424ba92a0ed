// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

//! Kafka data plugin: polls configured topics into an owned store subtree,
//! optionally passing each batch through a `rego_transform` rule first.
//! `KafkaFetcher` stands in for a real consumer-group client.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod plugin;

pub use config::KafkaConfig;
pub use fetcher::KafkaFetcher;
pub use plugin::{KafkaFactory, KafkaPlugin};
