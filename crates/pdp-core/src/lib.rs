// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

//! Shared kernel for the policy decision point: the wire error taxonomy,
//! request/decision identifiers, and the cancellation primitive threaded
//! through every store transaction, VM evaluation, and plugin poll loop.

pub mod error;
pub mod ids;

pub use error::{Error, WireCode};
pub use ids::{DecisionId, NodeId, RequestId};

pub type Result<T> = std::result::Result<T, Error>;

/// Cooperative cancellation token, polled by the VM at block entry and by
/// store transactions between patch steps.
pub type CancellationToken = tokio_util::sync::CancellationToken;
