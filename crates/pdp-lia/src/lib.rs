// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

mod bundle;
mod hook;
mod record;
mod session;
mod stats;
mod stream;

pub use bundle::CandidateBundle;
pub use hook::{DecisionContext, SecondaryEval, on_decision};
pub use record::{CSV_COLUMNS, DiffRecord, EvalOutcome, TABLE_COLUMNS};
pub use session::{ActiveSession, LiaSession, SessionConfig};
pub use stats::{GROUP_CSV_COLUMNS, GroupAggregator, GroupStats, Side};
pub use stream::{RecordSink, StreamFormat, StreamOutcome, run_stream};
