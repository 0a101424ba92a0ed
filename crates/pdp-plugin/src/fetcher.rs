// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use pdp_core::Result;
use pdp_value::Value;
use std::future::Future;
use std::time::Duration;

/// A plugin's connection to its external source. `pdp-plugin-kafka` and
/// `pdp-plugin-ldap` each implement this over their own wire protocol;
/// [`crate::pollloop::PollLoop`] is generic over this trait, so the shared
/// loop, transform invocation, and write-back logic are identical across
/// plugin types.
pub trait Fetcher: Send {
	/// Fetches the next batch, bounded by `timeout`. A timeout or a
	/// single malformed batch is transient: return `Ok` with an empty
	/// marker the caller can distinguish, or a non-fatal `Err` that the
	/// loop logs and continues past. A fatal configuration error (lost
	/// credentials, unreachable after exhausting retries per the
	/// fetcher's own policy) should be surfaced as `Err` and will stop
	/// the loop.
	fn fetch(&mut self, timeout: Duration) -> impl Future<Output = Result<Value>> + Send;
}
