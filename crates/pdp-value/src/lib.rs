// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

pub mod cowvec;
pub mod number;
pub mod patch;
pub mod path;
pub mod value;

pub use cowvec::CowVec;
pub use number::Number;
pub use patch::{PatchOp, apply as apply_patch};
pub use path::Path;
pub use value::{Entry, Value};
