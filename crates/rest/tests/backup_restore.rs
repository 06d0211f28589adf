//! Backup and restore tests.
//!
//! Exported documents must re-post unchanged as restore payloads. Scoped
//! endpoints exchange `application/octet-stream` files; the platform pair
//! speaks JSON.

mod common;

use std::collections::HashSet;

use axum::body::Bytes;
use axum::http::{HeaderValue, StatusCode};
use axum_test::TestResponse;
use serde_json::{Value, json};

use common::*;

fn octet_stream() -> HeaderValue {
    HeaderValue::from_static("application/octet-stream")
}

async fn download(harness: &HubHarness, path: &str, token: &str) -> Bytes {
    let response = authorized(harness.server.get(path), token).await;
    response.assert_status_ok();
    response.into_bytes()
}

async fn upload(harness: &HubHarness, path: &str, token: &str, body: Bytes) -> TestResponse {
    authorized(harness.server.post(path), token)
        .add_header(CONTENT_TYPE, octet_stream())
        .bytes(body)
        .await
}

fn document(value: &Value) -> Bytes {
    Bytes::from(serde_json::to_vec(value).expect("serialize document"))
}

async fn thing_ids(harness: &HubHarness, profile_id: &str) -> HashSet<String> {
    let response = authorized(
        harness.server.get(&format!("/profiles/{profile_id}/things")),
        ADMIN_TOKEN,
    )
    .await;
    response.assert_status_ok();
    response.json::<Value>()["things"]
        .as_array()
        .map(|things| things.iter().map(id_of).collect())
        .unwrap_or_default()
}

// ============================================================================
// Scoped round trips
// ============================================================================

#[tokio::test]
async fn test_group_things_round_trip() {
    let harness = HubHarness::new();
    let (group_id, profile_id) = harness.create_hierarchy().await;
    let things = harness
        .create_things(OWNER_TOKEN, &profile_id, &["t1", "t2", "t3"])
        .await;
    let before = thing_ids(&harness, &profile_id).await;

    let file = download(&harness, &format!("/groups/{group_id}/things/backup"), OWNER_TOKEN).await;

    let ids: Vec<String> = things.iter().map(id_of).collect();
    authorized(harness.server.patch("/things"), OWNER_TOKEN)
        .json(&json!({ "thing_ids": ids }))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    assert!(thing_ids(&harness, &profile_id).await.is_empty());

    let response = upload(
        &harness,
        &format!("/groups/{group_id}/things/restore"),
        OWNER_TOKEN,
        file,
    )
    .await;
    response.assert_status(StatusCode::CREATED);

    assert_eq!(thing_ids(&harness, &profile_id).await, before);

    // Restored keys still identify their devices
    let key = things[0]["key"].as_str().unwrap_or_default();
    let response = harness
        .server
        .get("/metadata")
        .add_header(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Thing {key}")).expect("Invalid key header"),
        )
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["id"], things[0]["id"]);
}

#[tokio::test]
async fn test_org_profiles_round_trip() {
    let harness = HubHarness::new();
    let (group_id, profile_id) = harness.create_hierarchy().await;

    let file = download(&harness, &format!("/orgs/{ORG_ID}/profiles/backup"), OWNER_TOKEN).await;
    let exported: Value = serde_json::from_slice(&file).expect("backup is not JSON");
    assert_eq!(exported["profiles"][0]["id"], profile_id.as_str());
    assert_eq!(exported["profiles"][0]["group_id"], group_id.as_str());
    assert!(exported.get("things").is_none());

    authorized(harness.server.delete(&format!("/profiles/{profile_id}")), OWNER_TOKEN)
        .await
        .assert_status(StatusCode::NO_CONTENT);

    upload(
        &harness,
        &format!("/orgs/{ORG_ID}/profiles/restore"),
        OWNER_TOKEN,
        file,
    )
    .await
    .assert_status(StatusCode::CREATED);

    let response = authorized(harness.server.get(&format!("/profiles/{profile_id}")), OWNER_TOKEN).await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["config"]["interval"], 30);
}

#[tokio::test]
async fn test_group_memberships_round_trip() {
    let harness = HubHarness::new();
    let (group_id, _) = harness.create_hierarchy().await;
    authorized(
        harness.server.post(&format!("/groups/{group_id}/memberships")),
        OWNER_TOKEN,
    )
    .json(&json!({
        "group_memberships": [{ "member_id": MEMBER_ID, "role": "editor" }]
    }))
    .await
    .assert_status(StatusCode::CREATED);

    let file = download(
        &harness,
        &format!("/groups/{group_id}/memberships/backup"),
        OWNER_TOKEN,
    )
    .await;
    let exported: Value = serde_json::from_slice(&file).expect("backup is not JSON");
    let rows = exported["group_memberships"].as_array().cloned().unwrap_or_default();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["member_id"], MEMBER_ID);

    authorized(
        harness.server.patch(&format!("/groups/{group_id}/memberships")),
        OWNER_TOKEN,
    )
    .json(&json!({ "member_ids": [MEMBER_ID] }))
    .await
    .assert_status(StatusCode::NO_CONTENT);

    upload(
        &harness,
        &format!("/groups/{group_id}/memberships/restore"),
        OWNER_TOKEN,
        file,
    )
    .await
    .assert_status(StatusCode::CREATED);

    let response = authorized(
        harness.server.get(&format!("/groups/{group_id}/memberships")),
        OWNER_TOKEN,
    )
    .await;
    let page = response.json::<Value>();
    assert_eq!(page["total"], 2);
    assert_eq!(page["group_memberships"][1]["role"], "editor");
    assert_eq!(page["group_memberships"][1]["email"], MEMBER_EMAIL);
}

// ============================================================================
// Restore rules
// ============================================================================

#[tokio::test]
async fn test_restore_is_all_or_nothing() {
    let harness = HubHarness::new();
    let (group_id, profile_id) = harness.create_hierarchy().await;
    let existing = harness.create_things(OWNER_TOKEN, &profile_id, &["t1"]).await;

    let body = document(&json!({
        "things": [
            { "name": "fresh", "key": "fresh-key", "profile_id": profile_id },
            existing[0]
        ]
    }));

    let response = upload(
        &harness,
        &format!("/groups/{group_id}/things/restore"),
        OWNER_TOKEN,
        body,
    )
    .await;
    response.assert_status(StatusCode::CONFLICT);

    assert_eq!(thing_ids(&harness, &profile_id).await.len(), 1);
}

#[tokio::test]
async fn test_restore_outside_scope_rejected() {
    let harness = HubHarness::new();
    let (group_id, _) = harness.create_hierarchy().await;
    let other_group = id_of(&harness.create_group(OWNER_TOKEN, ORG_ID, "annex").await);
    let other_profile = id_of(&harness.create_profile(OWNER_TOKEN, &other_group, "relay").await);

    let body = document(&json!({
        "things": [{ "name": "stray", "profile_id": other_profile }]
    }));

    let response = upload(
        &harness,
        &format!("/groups/{group_id}/things/restore"),
        OWNER_TOKEN,
        body,
    )
    .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_group_restore_rejects_foreign_profile_group() {
    let harness = HubHarness::new();
    let (group_id, _) = harness.create_hierarchy().await;
    let other_group = id_of(&harness.create_group(OWNER_TOKEN, ORG_ID, "annex").await);

    let body = document(&json!({
        "profiles": [{ "name": "moved", "group_id": other_group }]
    }));

    let response = upload(
        &harness,
        &format!("/groups/{group_id}/profiles/restore"),
        OWNER_TOKEN,
        body,
    )
    .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_restore_rejected() {
    let harness = HubHarness::new();
    let (group_id, _) = harness.create_hierarchy().await;

    let response = upload(
        &harness,
        &format!("/groups/{group_id}/things/restore"),
        OWNER_TOKEN,
        document(&json!({ "things": [] })),
    )
    .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_restore_rejects_unnamed_entities() {
    let harness = HubHarness::new();
    let (group_id, profile_id) = harness.create_hierarchy().await;

    let response = upload(
        &harness,
        &format!("/groups/{group_id}/profiles/restore"),
        OWNER_TOKEN,
        document(&json!({ "profiles": [{ "name": "" }] })),
    )
    .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = upload(
        &harness,
        &format!("/groups/{group_id}/things/restore"),
        OWNER_TOKEN,
        document(&json!({ "things": [{ "name": " ", "profile_id": profile_id }] })),
    )
    .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = authorized(
        harness.server.get(&format!("/groups/{group_id}/profiles")),
        OWNER_TOKEN,
    )
    .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["total"], 1);
}

#[tokio::test]
async fn test_restore_owner_membership_rejected() {
    let harness = HubHarness::new();
    let (group_id, _) = harness.create_hierarchy().await;

    let response = upload(
        &harness,
        &format!("/groups/{group_id}/memberships/restore"),
        OWNER_TOKEN,
        document(&json!({
            "group_memberships": [{ "member_id": MEMBER_ID, "role": "owner" }]
        })),
    )
    .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_scoped_restore_requires_octet_stream() {
    let harness = HubHarness::new();
    let (group_id, profile_id) = harness.create_hierarchy().await;

    let response = authorized(
        harness.server.post(&format!("/groups/{group_id}/things/restore")),
        OWNER_TOKEN,
    )
    .json(&json!({ "things": [{ "name": "t1", "profile_id": profile_id }] }))
    .await;

    response.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_malformed_backup_file_rejected() {
    let harness = HubHarness::new();
    let (group_id, _) = harness.create_hierarchy().await;

    let response = upload(
        &harness,
        &format!("/groups/{group_id}/things/restore"),
        OWNER_TOKEN,
        Bytes::from_static(b"not a backup"),
    )
    .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

// ============================================================================
// Platform backup
// ============================================================================

#[tokio::test]
async fn test_platform_backup_requires_platform_admin() {
    let harness = HubHarness::new();

    authorized(harness.server.get("/backup"), OWNER_TOKEN)
        .await
        .assert_status(StatusCode::FORBIDDEN);
    harness
        .server
        .get("/backup")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_platform_backup_restores_into_empty_platform() {
    let source = HubHarness::new();
    let (group_id, profile_id) = source.create_hierarchy().await;
    source
        .create_things(OWNER_TOKEN, &profile_id, &["t1", "t2"])
        .await;
    authorized(
        source.server.post(&format!("/groups/{group_id}/memberships")),
        OWNER_TOKEN,
    )
    .json(&json!({ "group_memberships": [{ "member_id": MEMBER_ID, "role": "viewer" }] }))
    .await
    .assert_status(StatusCode::CREATED);
    let expected = thing_ids(&source, &profile_id).await;

    let response = authorized(source.server.get("/backup"), ADMIN_TOKEN).await;
    response.assert_status_ok();
    let backup = response.json::<Value>();
    for collection in ["groups", "profiles", "things", "group_memberships"] {
        assert!(backup[collection].is_array(), "missing {collection}");
    }

    let target = HubHarness::new();
    let response = authorized(target.server.post("/restore"), ADMIN_TOKEN)
        .json(&backup)
        .await;
    response.assert_status(StatusCode::CREATED);

    assert_eq!(thing_ids(&target, &profile_id).await, expected);
    let response = authorized(
        target.server.get(&format!("/groups/{group_id}")),
        OWNER_TOKEN,
    )
    .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["owner_id"], OWNER_ID);
}

#[tokio::test]
async fn test_platform_restore_requires_json() {
    let harness = HubHarness::new();

    let response = upload(
        &harness,
        "/restore",
        ADMIN_TOKEN,
        document(&json!({ "groups": [] })),
    )
    .await;

    response.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
}
