//! Group, profile, and thing endpoint tests.
//!
//! Tests per-entity behaviors:
//! - HTTP status codes (200, 201, 204, 400, 401, 403, 404, 409, 415)
//! - Access levels for viewing, editing, and administering
//! - Thing keys, reparenting, and device self-identification

mod common;

use axum::http::{HeaderValue, StatusCode};
use serde_json::{Value, json};

use common::*;

const UNKNOWN_ID: &str = "3f2504e0-4f89-41d3-9a0c-0305e82c3301";

fn thing_key(key: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Thing {key}")).expect("Invalid key header")
}

// ============================================================================
// System
// ============================================================================

#[tokio::test]
async fn test_health_reports_backend() {
    let harness = HubHarness::new();

    let response = harness.server.get("/health").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["backend"], "memory");
    assert_eq!(body["version"], hub_rest::VERSION);
}

// ============================================================================
// Groups
// ============================================================================

#[tokio::test]
async fn test_create_group_makes_caller_owner() {
    let harness = HubHarness::new();

    let group = harness.create_group(OWNER_TOKEN, ORG_ID, "plant").await;

    assert_eq!(group["name"], "plant");
    assert_eq!(group["org_id"], ORG_ID);
    assert_eq!(group["owner_id"], OWNER_ID);
    assert!(uuid::Uuid::parse_str(&id_of(&group)).is_ok());
}

#[tokio::test]
async fn test_create_group_requires_org_admin() {
    let harness = HubHarness::new();

    let response = authorized(
        harness.server.post(&format!("/orgs/{ORG_ID}/groups")),
        MEMBER_TOKEN,
    )
    .json(&json!({ "groups": [{ "name": "plant" }] }))
    .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_group_rejects_empty_list() {
    let harness = HubHarness::new();

    let response = authorized(
        harness.server.post(&format!("/orgs/{ORG_ID}/groups")),
        OWNER_TOKEN,
    )
    .json(&json!({ "groups": [] }))
    .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_group_requires_json() {
    let harness = HubHarness::new();

    let response = authorized(
        harness.server.post(&format!("/orgs/{ORG_ID}/groups")),
        OWNER_TOKEN,
    )
    .text("groups")
    .await;

    response.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(response.json::<Value>()["code"], "unsupported_media_type");
}

#[tokio::test]
async fn test_duplicate_group_id_conflicts() {
    let harness = HubHarness::new();
    let id = "0f8fad5b-d9cb-469f-a165-70867728950e";
    let path = format!("/orgs/{ORG_ID}/groups");
    let body = json!({ "groups": [{ "id": id, "name": "plant" }] });

    let response = authorized(harness.server.post(&path), OWNER_TOKEN)
        .json(&body)
        .await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["groups"][0]["id"], id);

    let response = authorized(harness.server.post(&path), OWNER_TOKEN)
        .json(&body)
        .await;
    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_view_group_access() {
    let harness = HubHarness::new();
    let (group_id, _) = harness.create_hierarchy().await;
    let path = format!("/groups/{group_id}");

    authorized(harness.server.get(&path), MEMBER_TOKEN)
        .await
        .assert_status_ok();
    authorized(harness.server.get(&path), ADMIN_TOKEN)
        .await
        .assert_status_ok();
    authorized(harness.server.get(&path), OUTSIDER_TOKEN)
        .await
        .assert_status(StatusCode::FORBIDDEN);
    authorized(harness.server.get(&format!("/groups/{UNKNOWN_ID}")), OWNER_TOKEN)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_group_keeps_owner() {
    let harness = HubHarness::new();
    let (group_id, _) = harness.create_hierarchy().await;

    let response = authorized(
        harness.server.put(&format!("/groups/{group_id}")),
        OWNER_TOKEN,
    )
    .json(&json!({ "name": "renamed", "description": "east wing", "metadata": { "floor": 2 } }))
    .await;

    response.assert_status_ok();
    let group = response.json::<Value>();
    assert_eq!(group["name"], "renamed");
    assert_eq!(group["description"], "east wing");
    assert_eq!(group["metadata"]["floor"], 2);
    assert_eq!(group["owner_id"], OWNER_ID);
    assert_eq!(group["org_id"], ORG_ID);
}

#[tokio::test]
async fn test_update_group_requires_admin() {
    let harness = HubHarness::new();
    let (group_id, _) = harness.create_hierarchy().await;

    let response = authorized(
        harness.server.put(&format!("/groups/{group_id}")),
        MEMBER_TOKEN,
    )
    .json(&json!({ "name": "renamed" }))
    .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_remove_group_cascades() {
    let harness = HubHarness::new();
    let (group_id, profile_id) = harness.create_hierarchy().await;
    let things = harness.create_things(OWNER_TOKEN, &profile_id, &["t1"]).await;

    let response = authorized(
        harness.server.delete(&format!("/groups/{group_id}")),
        OWNER_TOKEN,
    )
    .await;
    response.assert_status(StatusCode::NO_CONTENT);

    authorized(harness.server.get(&format!("/profiles/{profile_id}")), OWNER_TOKEN)
        .await
        .assert_status(StatusCode::NOT_FOUND);
    authorized(
        harness.server.get(&format!("/things/{}", id_of(&things[0]))),
        OWNER_TOKEN,
    )
    .await
    .assert_status(StatusCode::NOT_FOUND);
}

// ============================================================================
// Profiles
// ============================================================================

#[tokio::test]
async fn test_group_editor_may_create_profiles() {
    let harness = HubHarness::new();
    let (group_id, _) = harness.create_hierarchy().await;
    let path = format!("/groups/{group_id}/profiles");
    let body = json!({ "profiles": [{ "name": "actuator" }] });

    authorized(harness.server.post(&path), MEMBER_TOKEN)
        .json(&body)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    authorized(
        harness.server.post(&format!("/groups/{group_id}/memberships")),
        OWNER_TOKEN,
    )
    .json(&json!({
        "group_memberships": [{ "member_id": MEMBER_ID, "role": "editor" }]
    }))
    .await
    .assert_status(StatusCode::CREATED);

    let response = authorized(harness.server.post(&path), MEMBER_TOKEN)
        .json(&body)
        .await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["profiles"][0]["group_id"], group_id);
}

#[tokio::test]
async fn test_update_profile_replaces_config() {
    let harness = HubHarness::new();
    let (group_id, profile_id) = harness.create_hierarchy().await;

    let response = authorized(
        harness.server.put(&format!("/profiles/{profile_id}")),
        OWNER_TOKEN,
    )
    .json(&json!({ "name": "sensor-v2", "config": { "interval": 60 } }))
    .await;

    response.assert_status_ok();
    let profile = response.json::<Value>();
    assert_eq!(profile["name"], "sensor-v2");
    assert_eq!(profile["config"]["interval"], 60);
    assert_eq!(profile["group_id"], group_id);
}

#[tokio::test]
async fn test_update_profile_requires_name() {
    let harness = HubHarness::new();
    let (_, profile_id) = harness.create_hierarchy().await;

    let response = authorized(
        harness.server.put(&format!("/profiles/{profile_id}")),
        OWNER_TOKEN,
    )
    .json(&json!({ "name": "  " }))
    .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bulk_remove_profiles_all_or_nothing() {
    let harness = HubHarness::new();
    let (_, mine) = harness.create_hierarchy().await;
    let theirs_group = id_of(
        &harness
            .create_group(OUTSIDER_TOKEN, OTHER_ORG_ID, "theirs")
            .await,
    );
    let theirs = id_of(
        &harness
            .create_profile(OUTSIDER_TOKEN, &theirs_group, "foreign")
            .await,
    );

    let response = authorized(harness.server.patch("/profiles"), OWNER_TOKEN)
        .json(&json!({ "profile_ids": [mine, theirs] }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    authorized(harness.server.get(&format!("/profiles/{mine}")), OWNER_TOKEN)
        .await
        .assert_status_ok();

    let response = authorized(harness.server.patch("/profiles"), OWNER_TOKEN)
        .json(&json!({ "profile_ids": [mine] }))
        .await;
    response.assert_status(StatusCode::NO_CONTENT);
}

// ============================================================================
// Things
// ============================================================================

#[tokio::test]
async fn test_created_things_get_keys_and_group() {
    let harness = HubHarness::new();
    let (group_id, profile_id) = harness.create_hierarchy().await;

    let things = harness
        .create_things(OWNER_TOKEN, &profile_id, &["t1", "t2"])
        .await;

    assert_eq!(things.len(), 2);
    for thing in &things {
        assert_eq!(thing["profile_id"], profile_id);
        assert_eq!(thing["group_id"], group_id);
        assert!(!thing["key"].as_str().unwrap_or_default().is_empty());
    }
    assert_ne!(things[0]["key"], things[1]["key"]);
}

#[tokio::test]
async fn test_update_thing_sets_and_clears_external_key() {
    let harness = HubHarness::new();
    let (_, profile_id) = harness.create_hierarchy().await;
    let things = harness.create_things(OWNER_TOKEN, &profile_id, &["t1"]).await;
    let path = format!("/things/{}", id_of(&things[0]));

    let response = authorized(harness.server.put(&path), OWNER_TOKEN)
        .json(&json!({ "name": "t1", "external_key": "ext-1", "metadata": { "site": "a" } }))
        .await;
    response.assert_status_ok();
    let updated = response.json::<Value>();
    assert_eq!(updated["external_key"], "ext-1");
    assert_eq!(updated["metadata"]["site"], "a");
    assert_eq!(updated["key"], things[0]["key"]);

    let response = authorized(harness.server.put(&path), OWNER_TOKEN)
        .json(&json!({ "name": "t1", "external_key": "" }))
        .await;
    response.assert_status_ok();
    assert!(response.json::<Value>().get("external_key").is_none());
}

#[tokio::test]
async fn test_rotate_key_conflict() {
    let harness = HubHarness::new();
    let (_, profile_id) = harness.create_hierarchy().await;
    let things = harness
        .create_things(OWNER_TOKEN, &profile_id, &["t1", "t2"])
        .await;
    let path = format!("/things/{}/key", id_of(&things[0]));

    let response = authorized(harness.server.patch(&path), OWNER_TOKEN)
        .json(&json!({ "key": things[1]["key"] }))
        .await;
    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["code"], "conflict");

    let response = authorized(harness.server.patch(&path), OWNER_TOKEN)
        .json(&json!({ "key": "fresh-key" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["key"], "fresh-key");
}

#[tokio::test]
async fn test_rotate_key_requires_key() {
    let harness = HubHarness::new();
    let (_, profile_id) = harness.create_hierarchy().await;
    let things = harness.create_things(OWNER_TOKEN, &profile_id, &["t1"]).await;

    let response = authorized(
        harness
            .server
            .patch(&format!("/things/{}/key", id_of(&things[0]))),
        OWNER_TOKEN,
    )
    .json(&json!({ "key": "" }))
    .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reparent_within_org() {
    let harness = HubHarness::new();
    let (_, source) = harness.create_hierarchy().await;
    let other_group = id_of(&harness.create_group(OWNER_TOKEN, ORG_ID, "annex").await);
    let target = id_of(&harness.create_profile(OWNER_TOKEN, &other_group, "relay").await);
    let things = harness.create_things(OWNER_TOKEN, &source, &["t1"]).await;

    let response = authorized(
        harness
            .server
            .patch(&format!("/things/{}/profile", id_of(&things[0]))),
        OWNER_TOKEN,
    )
    .json(&json!({ "profile_id": target }))
    .await;

    response.assert_status_ok();
    let moved = response.json::<Value>();
    assert_eq!(moved["profile_id"], target);
    assert_eq!(moved["group_id"], other_group);
    assert_eq!(moved["key"], things[0]["key"]);
}

#[tokio::test]
async fn test_reparent_across_orgs_rejected() {
    let harness = HubHarness::new();
    let (_, source) = harness.create_hierarchy().await;
    let foreign_group = id_of(
        &harness
            .create_group(ADMIN_TOKEN, OTHER_ORG_ID, "foreign")
            .await,
    );
    let target = id_of(
        &harness
            .create_profile(ADMIN_TOKEN, &foreign_group, "remote")
            .await,
    );
    let things = harness.create_things(OWNER_TOKEN, &source, &["t1"]).await;

    let response = authorized(
        harness
            .server
            .patch(&format!("/things/{}/profile", id_of(&things[0]))),
        ADMIN_TOKEN,
    )
    .json(&json!({ "profile_id": target }))
    .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bulk_remove_things() {
    let harness = HubHarness::new();
    let (_, profile_id) = harness.create_hierarchy().await;
    let things = harness
        .create_things(OWNER_TOKEN, &profile_id, &["t1", "t2", "t3"])
        .await;

    let response = authorized(harness.server.patch("/things"), OWNER_TOKEN)
        .json(&json!({ "thing_ids": [id_of(&things[0]), id_of(&things[2])] }))
        .await;
    response.assert_status(StatusCode::NO_CONTENT);

    let response = authorized(
        harness.server.get(&format!("/profiles/{profile_id}/things")),
        OWNER_TOKEN,
    )
    .await;
    assert_eq!(common::names(&response.json::<Value>(), "things"), vec!["t2"]);
}

#[tokio::test]
async fn test_remove_unknown_thing_not_found() {
    let harness = HubHarness::new();

    let response = authorized(
        harness.server.delete(&format!("/things/{UNKNOWN_ID}")),
        OWNER_TOKEN,
    )
    .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

// ============================================================================
// Device identification
// ============================================================================

#[tokio::test]
async fn test_thing_reads_own_metadata() {
    let harness = HubHarness::new();
    let (_, profile_id) = harness.create_hierarchy().await;

    let response = authorized(
        harness.server.post(&format!("/profiles/{profile_id}/things")),
        OWNER_TOKEN,
    )
    .json(&json!({ "things": [{ "name": "t1", "key": "device-key", "metadata": { "fw": "1.2" } }] }))
    .await;
    response.assert_status(StatusCode::CREATED);
    let thing = response.json::<Value>()["things"][0].clone();

    let response = harness
        .server
        .get("/metadata")
        .add_header(AUTHORIZATION, thing_key("device-key"))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["id"], thing["id"]);
    assert_eq!(body["metadata"]["fw"], "1.2");
}

#[tokio::test]
async fn test_unknown_thing_key_unauthorized() {
    let harness = HubHarness::new();

    let response = harness
        .server
        .get("/metadata")
        .add_header(AUTHORIZATION, thing_key("nobody"))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = harness.server.get("/metadata").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}
