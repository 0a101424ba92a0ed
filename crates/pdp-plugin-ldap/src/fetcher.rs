// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use crate::config::LdapConfig;
use pdp_core::Result;
use pdp_plugin::Fetcher;
use pdp_value::Value;
use std::future::Future;
use std::time::Duration;

/// Stands in for a real directory client bound to `config.url`. A vendor
/// client would replace `fetch` with a bounded search against `base_dn`/
/// `filter`, projecting `attributes` off each entry keyed by its DN.
pub struct LdapFetcher {
	config: LdapConfig,
}

impl LdapFetcher {
	pub fn new(config: LdapConfig) -> Self {
		Self { config }
	}
}

impl Fetcher for LdapFetcher {
	fn fetch(&mut self, _timeout: Duration) -> impl Future<Output = Result<Value>> + Send {
		let base_dn = self.config.base_dn.clone();
		async move {
			tracing::trace!(base_dn = %base_dn, "ldap fetch stand-in: no entries");
			Ok(Value::empty_object())
		}
	}
}
