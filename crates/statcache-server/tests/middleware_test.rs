//! Tests de middleware.

mod helpers;

use std::sync::Arc;

use helpers::{FakeUpstream, bedwars_document, client, player_client};
use uuid::Uuid;

// === Request ID ===

#[tokio::test]
async fn request_id_is_uuid_v4() {
    let response = client().get("/health").await;

    let id = response.header("x-request-id").unwrap();
    let parsed = Uuid::parse_str(id).unwrap();

    assert_eq!(parsed.get_version_num(), 4);
}

#[tokio::test]
async fn propagates_incoming_request_id() {
    let custom_id = "my-custom-request-id-12345";

    let response = client()
        .get_with_headers("/health", vec![("x-request-id", custom_id)])
        .await;

    response.assert_header("x-request-id", custom_id);
}

#[tokio::test]
async fn replaces_oversized_request_id() {
    let oversized = "a".repeat(500);

    let response = client()
        .get_with_headers("/health", vec![("x-request-id", oversized.as_str())])
        .await;

    let id = response.header("x-request-id").unwrap();
    assert_ne!(id, oversized);
    assert!(Uuid::parse_str(id).is_ok());
}

#[tokio::test]
async fn generates_different_ids_for_each_request() {
    let response1 = client().get("/health").await;
    let response2 = client().get("/health").await;

    let id1 = response1.header("x-request-id").unwrap();
    let id2 = response2.header("x-request-id").unwrap();

    assert_ne!(id1, id2);
}

// === Request ID en otros endpoints ===

#[tokio::test]
async fn request_id_present_in_player_endpoint() {
    let upstream =
        Arc::new(FakeUpstream::new().with_player("alice", bedwars_document("Alice")));

    let response = player_client(upstream).get("/player?username=alice").await;

    response.assert_header_exists("x-request-id");
}

#[tokio::test]
async fn request_id_present_on_errors() {
    let response = player_client(Arc::new(FakeUpstream::new()))
        .get("/player")
        .await;

    response.assert_header_exists("x-request-id");
}
