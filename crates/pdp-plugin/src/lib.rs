// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

//! Lifecycle framework shared by every data and sink plugin: a
//! factory/plugin contract, path-ownership claims against the composite
//! store, a bound `rego_transform` runner built on `pdp-vm`, and the
//! polling-loop state machine `pdp-plugin-kafka`/`pdp-plugin-ldap` drive
//! over their own `Fetcher` implementations.

pub mod factory;
pub mod fetcher;
pub mod manager;
pub mod plugin;
pub mod pollloop;
pub mod status;
pub mod transform;

pub use factory::{Factory, FactoryRegistry};
pub use fetcher::Fetcher;
pub use manager::PluginManager;
pub use plugin::{reconfigure_via_restart, Plugin};
pub use pollloop::{PollLoop, WriteMode};
pub use status::PluginStatus;
pub use transform::{run_transform, CompiledTransform, TransformHandle};
