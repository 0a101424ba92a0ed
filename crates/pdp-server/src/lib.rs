// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

mod batch;
mod decision;
mod error;
mod lia;
mod preview;
mod router;
mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::{AppState, DecisionLogSinks};
