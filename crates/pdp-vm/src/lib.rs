// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

//! Register-based virtual machine executing compiled policy IR (`pdp-ir`)
//! against a data namespace (`pdp-store`). Evaluation is synchronous and
//! deterministic given a pinned clock, seed, and input; callers running in
//! an async context should dispatch through `spawn_blocking`.

pub mod emptyloop;
pub mod interp;
pub mod licm;
pub mod locals;
pub mod namespace;
pub mod options;

pub use interp::{DATA_LOCAL, INPUT_LOCAL, eval};
pub use locals::Locals;
pub use namespace::{Namespace, StaticNamespace};
pub use options::{EvalOptions, EvalStats, InterQueryBuiltinCache, NdbCache, PrintHook};
