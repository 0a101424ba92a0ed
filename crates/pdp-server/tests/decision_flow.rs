// Copyright (c) 2026 PDP contributors
// This file is licensed under the Apache-2.0

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use pdp_ir::{Plan, Policy, Statement, Static};
use pdp_store::{MemoryStore, NamespaceTree, PathOwnershipRegistry};
use pdp_value::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn policy_returning(path: &str, n: i64) -> Policy {
	Policy {
		static_data: Static { strings: vec![n.to_string()], functions: vec![] },
		plans: vec![Plan { name: path.into(), blocks: vec![vec![Statement::MakeNumber { target: 0, value: 0 }, Statement::ResultSetAdd { value: 0 }]] }],
		functions: vec![],
	}
}

fn router(path: &str, n: i64) -> axum::Router {
	let namespace = Arc::new(NamespaceTree::new(Arc::new(MemoryStore::new())));
	let ownership = Arc::new(PathOwnershipRegistry::new());
	let state = pdp_server::AppState::new(namespace, ownership, policy_returning(path, n));
	pdp_server::build_router(state)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
	let bytes = response.into_body().collect().await.unwrap().to_bytes();
	serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn decide_evaluates_the_active_policy() {
	let app = router("test/allow", 1);
	let request = Request::builder()
		.method("POST")
		.uri("/v1/data/test/allow")
		.header("content-type", "application/json")
		.body(Body::from(r#"{"input": null}"#))
		.unwrap();

	let response = app.oneshot(request).await.unwrap();
	assert_eq!(response.status(), StatusCode::OK);
	let body = body_json(response).await;
	assert_eq!(body["result"], serde_json::json!(1));
	assert!(body["decision_id"].is_string());
}

#[tokio::test]
async fn decide_unknown_path_is_not_found() {
	let app = router("test/allow", 1);
	let request =
		Request::builder().method("POST").uri("/v1/data/no/such/plan").header("content-type", "application/json").body(Body::from("{}")).unwrap();

	let response = app.oneshot(request).await.unwrap();
	assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn batch_decide_evaluates_every_input_independently() {
	let app = router("test/allow", 7);
	let request = Request::builder()
		.method("POST")
		.uri("/v1/batch/data/test/allow")
		.header("content-type", "application/json")
		.body(Body::from(r#"{"inputs": {"a": null, "b": {"x": 1}}}"#))
		.unwrap();

	let response = app.oneshot(request).await.unwrap();
	assert_eq!(response.status(), StatusCode::OK);
	let body = body_json(response).await;
	assert_eq!(body["responses"]["a"]["result"], serde_json::json!(7));
	assert_eq!(body["responses"]["b"]["result"], serde_json::json!(7));
	assert_ne!(body["responses"]["a"]["decision_id"], body["responses"]["b"]["decision_id"]);
}

#[tokio::test]
async fn preview_overlays_request_data_over_the_live_document() {
	let app = router("test/allow", 1);
	let policy = serde_json::to_value(policy_returning("test/allow", 1)).unwrap();
	let payload = serde_json::json!({ "policy": policy, "plan_name": "test/allow" });

	let request = Request::builder()
		.method("POST")
		.uri("/v0/preview/test/allow")
		.header("content-type", "application/json")
		.body(Body::from(payload.to_string()))
		.unwrap();

	let response = app.oneshot(request).await.unwrap();
	assert_eq!(response.status(), StatusCode::OK);
	let body = body_json(response).await;
	assert_eq!(body["result"], serde_json::json!(1));
}
