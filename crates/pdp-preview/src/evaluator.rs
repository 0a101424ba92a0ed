// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use crate::request::PreviewRequest;
use crate::response::{BundleProvenance, PreviewResponse, Provenance};
use crate::storage::PreviewStorage;
use pdp_core::Result;
use pdp_store::{NamespaceTree, PathOwnershipRegistry};
use pdp_vm::EvalOptions;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::SystemTime;

/// Runs preview evaluations against a live namespace, composing each
/// request's overlay data over a fresh read-only transaction unless the
/// request is sandboxed.
pub struct PreviewEvaluator {
	namespace: Arc<NamespaceTree>,
	ownership: Arc<PathOwnershipRegistry>,
}

impl PreviewEvaluator {
	pub fn new(namespace: Arc<NamespaceTree>, ownership: Arc<PathOwnershipRegistry>) -> Self {
		Self { namespace, ownership }
	}

	/// The linear preview lifecycle: open storage, build eval options,
	/// run exactly one `Eval`, assemble the response, then discard the
	/// storage by aborting rather than committing it.
	pub fn evaluate(&self, request: PreviewRequest) -> Result<PreviewResponse> {
		let _span = request.flags.instrument.then(|| tracing::info_span!("pdp_preview::evaluate", plan = %request.plan_name).entered());

		let primary = if request.flags.sandbox {
			None
		} else {
			Some(pdp_store::Transaction::new(self.namespace.clone(), self.ownership.clone(), false))
		};
		let mut storage = PreviewStorage::new(request.data.clone(), primary);

		let printed = Arc::new(Mutex::new(Vec::new()));
		let mut opts = EvalOptions::new(SystemTime::now());
		opts.input = request.input.clone();
		opts.strict_builtin_errors = request.flags.strict_builtin_errors;
		if request.flags.print {
			let sink = printed.clone();
			opts.print_hook = Some(Arc::new(move |location: &str, text: &str| {
				sink.lock().push(format!("{location}: {text}"));
			}));
		}

		let eval_result = pdp_vm::eval(&request.policy, &request.plan_name, &mut storage, &opts);
		storage.finish();
		let (results, stats) = eval_result?;

		let provenance = (request.flags.provenance && !request.flags.sandbox)
			.then(|| request.bundle.map(|b| Provenance { bundles: vec![BundleProvenance { id: b.id, revision: b.revision }] }))
			.flatten();

		Ok(PreviewResponse {
			result: results.into_iter().next(),
			printed: request.flags.print.then(|| Arc::try_unwrap(printed).map(Mutex::into_inner).unwrap_or_default()),
			metrics: request.flags.metrics.then_some(stats),
			provenance,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::flags::PreviewFlags;
	use crate::request::BundleRevision;
	use pdp_ir::{Operand, Plan, Policy, Statement, Static};
	use pdp_store::MemoryStore;
	use pdp_value::{PatchOp, Path, Value};

	fn namespace_with(path: &str, value: Value) -> (Arc<NamespaceTree>, Arc<PathOwnershipRegistry>) {
		let namespace = Arc::new(NamespaceTree::new(Arc::new(MemoryStore::new())));
		let ownership = Arc::new(PathOwnershipRegistry::new());
		let mut txn = pdp_store::Transaction::new(namespace.clone(), ownership.clone(), true);
		txn.write(PatchOp::Add, &Path::parse(path), value).unwrap();
		txn.commit().unwrap();
		(namespace, ownership)
	}

	/// `p := data.foo.bar`, compiled by hand: local 2 holds `data.foo`,
	/// local 3 holds `data.foo.bar`, added to the result set.
	fn data_foo_bar_policy() -> Policy {
		Policy {
			static_data: Static { strings: vec!["foo".into(), "bar".into()], functions: vec![] },
			plans: vec![Plan {
				name: "test/p".into(),
				blocks: vec![vec![
					Statement::Dot { target: 2, source: pdp_vm::DATA_LOCAL, key: Operand::StringIndex(0) },
					Statement::Dot { target: 3, source: 2, key: Operand::StringIndex(1) },
					Statement::ResultSetAdd { value: 3 },
				]],
			}],
			functions: vec![],
		}
	}

	#[test]
	fn preview_overlay_shadows_live_data_without_mutating_it() {
		let (namespace, ownership) = namespace_with("/foo/bar", Value::string("live"));
		let evaluator = PreviewEvaluator::new(namespace.clone(), ownership.clone());

		let request = PreviewRequest {
			policy: data_foo_bar_policy(),
			plan_name: "test/p".into(),
			input: None,
			data: Value::object(vec![("foo".into(), Value::object(vec![("bar".into(), Value::string("overlay"))]))]),
			bundle: Some(BundleRevision { id: "bundle1".into(), revision: "rev1".into() }),
			flags: PreviewFlags { provenance: true, ..Default::default() },
		};

		let response = evaluator.evaluate(request).unwrap();
		assert_eq!(response.result, Some(Value::string("overlay")));
		assert!(response.provenance.is_some());

		let mut read_txn = pdp_store::Transaction::new(namespace, ownership, false);
		assert_eq!(read_txn.read(&Path::parse("/foo/bar")).unwrap(), Value::string("live"));
	}

	#[test]
	fn sandboxed_preview_omits_provenance_and_ignores_live_data() {
		let (namespace, ownership) = namespace_with("/foo/bar", Value::string("live"));
		let evaluator = PreviewEvaluator::new(namespace, ownership);

		let request = PreviewRequest {
			policy: data_foo_bar_policy(),
			plan_name: "test/p".into(),
			input: None,
			data: Value::object(vec![("foo".into(), Value::object(vec![("bar".into(), Value::string("sandboxed"))]))]),
			bundle: Some(BundleRevision { id: "bundle1".into(), revision: "rev1".into() }),
			flags: PreviewFlags { sandbox: true, provenance: true, metrics: true, ..Default::default() },
		};

		let response = evaluator.evaluate(request).unwrap();
		assert_eq!(response.result, Some(Value::string("sandboxed")));
		assert!(response.provenance.is_none());
		assert!(response.metrics.is_some());
	}
}
