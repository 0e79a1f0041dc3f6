// SPDX-License-Identifier: MIT

use std::sync::Arc;

use adapter_core::error::ErrorKind;
use adapter_engine::NullEngine;
use tokio::io::DuplexStream;

use super::*;
use crate::context::SessionContext;

fn ctx() -> Arc<SessionContext<DuplexStream>> {
    let (_client, server) = tokio::io::duplex(8192);
    Arc::new(SessionContext::new(Arc::new(NullEngine::new()), server, 1024 * 1024))
}

#[tokio::test]
async fn unknown_variant_tag_yields_unknown_request_but_keeps_the_hash() {
    let ctx = ctx();
    let raw = serde_json::json!({"hash": [1, 2, 3], "type": "TotallyMadeUp"});
    let bytes = serde_json::to_vec(&raw).unwrap();

    let response = handle_frame(&ctx, &bytes).await;

    assert_eq!(response.hash, vec![1, 2, 3]);
    match response.body {
        ResponseBody::Error { error_kind, .. } => assert_eq!(error_kind, ErrorKind::UnknownRequest),
        other => panic!("expected Error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_json_still_recovers_the_hash_if_present() {
    let ctx = ctx();
    let raw = serde_json::json!({"hash": [9], "type": "CreateTarget"}); // missing required field_path
    let bytes = serde_json::to_vec(&raw).unwrap();

    let response = handle_frame(&ctx, &bytes).await;

    assert_eq!(response.hash, vec![9]);
    assert!(matches!(response.body, ResponseBody::Error { error_kind: ErrorKind::UnknownRequest, .. }));
}

#[tokio::test]
async fn create_target_request_round_trips_through_the_dispatcher() {
    let ctx = ctx();
    let request =
        Request { hash: vec![0xAB], body: RequestBody::CreateTarget { file_path: "a.out".to_string() } };
    let bytes = adapter_wire::encode(&request).unwrap();

    let response = handle_frame(&ctx, &bytes).await;

    assert_eq!(response.hash, vec![0xAB]);
    assert!(matches!(response.body, ResponseBody::TargetCreated));
}

#[tokio::test]
async fn failing_handler_produces_an_error_response_not_a_panic() {
    let ctx = ctx();
    let request = Request { hash: vec![1], body: RequestBody::CreateTarget { file_path: String::new() } };
    let bytes = adapter_wire::encode(&request).unwrap();

    let response = handle_frame(&ctx, &bytes).await;

    assert_eq!(response.hash, vec![1]);
    assert!(matches!(
        response.body,
        ResponseBody::Error { error_kind: ErrorKind::InvalidArgument, .. }
    ));
}

#[tokio::test]
async fn handler_precondition_failure_surfaces_through_the_dispatcher() {
    let ctx = ctx();
    let request = Request { hash: vec![2], body: RequestBody::GetThreads };
    let bytes = adapter_wire::encode(&request).unwrap();

    let response = handle_frame(&ctx, &bytes).await;

    assert!(matches!(
        response.body,
        ResponseBody::Error { error_kind: ErrorKind::NoProcess, .. }
    ));
}

#[test]
fn every_request_variant_name_is_distinct_and_non_empty() {
    let bodies = [
        RequestBody::CreateTarget { file_path: String::new() },
        RequestBody::Detach,
        RequestBody::Continue,
        RequestBody::GetThreads,
        RequestBody::DumpSections,
        RequestBody::GetArchitecture,
        RequestBody::CancelSymbolsDownload,
    ];
    let names: Vec<&str> = bodies.iter().map(request_variant_name).collect();
    assert!(names.iter().all(|n| !n.is_empty()));
    let unique: std::collections::HashSet<&&str> = names.iter().collect();
    assert_eq!(unique.len(), names.len());
}
