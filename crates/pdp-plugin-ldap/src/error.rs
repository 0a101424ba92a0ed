// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use pdp_core::Error;

#[derive(Debug, thiserror::Error)]
pub enum LdapConfigError {
	#[error("malformed ldap plugin configuration: {0}")]
	Malformed(#[from] serde_json::Error),
	#[error("ldap plugin requires a non-empty url")]
	NoUrl,
	#[error("ldap plugin requires a non-empty base_dn")]
	NoBaseDn,
	#[error("ldap plugin requires at least one attribute")]
	NoAttributes,
}

impl From<LdapConfigError> for Error {
	fn from(err: LdapConfigError) -> Self {
		Error::internal(err.to_string())
	}
}
