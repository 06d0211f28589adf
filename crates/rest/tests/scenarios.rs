//! End-to-end API scenarios.
//!
//! Each test walks one user-visible flow through the full router:
//! paging things, granting and listing memberships, and scoped backup and
//! restore under the access rules.

mod common;

use std::collections::HashSet;

use axum::body::Bytes;
use axum::http::{HeaderValue, StatusCode};
use serde_json::{Value, json};

use common::*;

fn octet_stream() -> HeaderValue {
    HeaderValue::from_static("application/octet-stream")
}

// ============================================================================
// Paging
// ============================================================================

#[tokio::test]
async fn test_things_page_in_creation_order() {
    let harness = HubHarness::new();
    let (_, profile_id) = harness.create_hierarchy().await;

    let names: Vec<String> = (1..=10).map(|i| format!("name_{i:03}")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    harness.create_things(OWNER_TOKEN, &profile_id, &refs).await;

    let response = authorized(harness.server.get("/things"), OWNER_TOKEN)
        .add_query_param("offset", 0)
        .add_query_param("limit", 5)
        .await;

    response.assert_status_ok();
    let page = response.json::<Value>();
    assert_eq!(page["total"], 10);
    assert_eq!(page["offset"], 0);
    assert_eq!(page["limit"], 5);
    assert_eq!(
        common::names(&page, "things"),
        vec!["name_001", "name_002", "name_003", "name_004", "name_005"]
    );
}

#[tokio::test]
async fn test_second_page_continues_where_first_ended() {
    let harness = HubHarness::new();
    let (_, profile_id) = harness.create_hierarchy().await;
    harness
        .create_things(OWNER_TOKEN, &profile_id, &["a", "b", "c", "d", "e", "f", "g"])
        .await;

    let response = authorized(harness.server.get("/things"), OWNER_TOKEN)
        .add_query_param("offset", 5)
        .add_query_param("limit", 5)
        .await;

    response.assert_status_ok();
    let page = response.json::<Value>();
    assert_eq!(page["total"], 7);
    assert_eq!(common::names(&page, "things"), vec!["f", "g"]);
}

// ============================================================================
// Memberships
// ============================================================================

#[tokio::test]
async fn test_granted_membership_listed_with_owner() {
    let harness = HubHarness::new();
    let (group_id, _) = harness.create_hierarchy().await;

    let response = authorized(
        harness.server.post(&format!("/groups/{group_id}/memberships")),
        OWNER_TOKEN,
    )
    .json(&json!({
        "group_memberships": [
            { "member_id": "U", "email": "e@x", "role": "editor" }
        ]
    }))
    .await;
    response.assert_status(StatusCode::CREATED);

    let response = authorized(
        harness.server.get(&format!("/groups/{group_id}/memberships")),
        OWNER_TOKEN,
    )
    .await;
    response.assert_status_ok();

    let page = response.json::<Value>();
    assert_eq!(page["total"], 2);
    let memberships = page["group_memberships"].as_array().cloned().unwrap_or_default();
    assert_eq!(memberships[0]["member_id"], OWNER_ID);
    assert_eq!(memberships[0]["role"], "owner");
    assert_eq!(memberships[0]["email"], OWNER_EMAIL);
    assert_eq!(memberships[1]["member_id"], "U");
    assert_eq!(memberships[1]["email"], "e@x");
    assert_eq!(memberships[1]["role"], "editor");
}

#[tokio::test]
async fn test_owner_role_cannot_be_assigned() {
    let harness = HubHarness::new();
    let (group_id, _) = harness.create_hierarchy().await;

    let response = authorized(
        harness.server.put(&format!("/groups/{group_id}/memberships")),
        OWNER_TOKEN,
    )
    .json(&json!({
        "group_memberships": [
            { "member_id": MEMBER_ID, "email": MEMBER_EMAIL, "role": "owner" }
        ]
    }))
    .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "bad_request");
}

// ============================================================================
// Backup and restore
// ============================================================================

#[tokio::test]
async fn test_group_things_backup_requires_admin() {
    let harness = HubHarness::new();
    let (group_id, profile_id) = harness.create_hierarchy().await;

    let response = authorized(
        harness.server.post(&format!("/profiles/{profile_id}/things")),
        OWNER_TOKEN,
    )
    .json(&json!({
        "things": [
            { "name": "boiler", "external_key": "ext-boiler" },
            { "name": "pump" },
            { "name": "valve", "external_key": "ext-valve" }
        ]
    }))
    .await;
    response.assert_status(StatusCode::CREATED);
    let created = response.json::<Value>()["things"]
        .as_array()
        .cloned()
        .unwrap_or_default();

    let path = format!("/groups/{group_id}/things/backup");

    let response = authorized(harness.server.get(&path), MEMBER_TOKEN).await;
    response.assert_status(StatusCode::FORBIDDEN);

    for token in [OWNER_TOKEN, ADMIN_TOKEN] {
        let response = authorized(harness.server.get(&path), token).await;
        response.assert_status_ok();
        assert_eq!(response.header(CONTENT_TYPE), octet_stream());

        let document: Value =
            serde_json::from_slice(response.as_bytes()).expect("backup is not JSON");
        let things = document["things"].as_array().cloned().unwrap_or_default();

        let exported: HashSet<String> = things.iter().map(id_of).collect();
        let expected: HashSet<String> = created.iter().map(id_of).collect();
        assert_eq!(exported, expected);

        for thing in &created {
            let backed_up = things
                .iter()
                .find(|t| t["id"] == thing["id"])
                .expect("thing missing from backup");
            assert_eq!(backed_up["external_key"], thing["external_key"]);
            assert_eq!(backed_up["key"], thing["key"]);
        }
    }
}

#[tokio::test]
async fn test_org_things_restore_requires_org_admin() {
    let harness = HubHarness::new();
    let (_, profile_id) = harness.create_hierarchy().await;

    let document = json!({
        "things": [
            { "name": "restored-1", "key": "restore-key-1", "profile_id": profile_id },
            { "name": "restored-2", "key": "restore-key-2", "profile_id": profile_id }
        ]
    });
    let body = Bytes::from(serde_json::to_vec(&document).expect("serialize document"));
    let path = format!("/orgs/{ORG_ID}/things/restore");

    let response = authorized(harness.server.post(&path), MEMBER_TOKEN)
        .add_header(CONTENT_TYPE, octet_stream())
        .bytes(body.clone())
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = authorized(harness.server.post(&path), OWNER_TOKEN)
        .add_header(CONTENT_TYPE, octet_stream())
        .bytes(body)
        .await;
    response.assert_status(StatusCode::CREATED);

    let response = authorized(
        harness.server.get(&format!("/profiles/{profile_id}/things")),
        OWNER_TOKEN,
    )
    .await;
    response.assert_status_ok();
    let page = response.json::<Value>();
    assert_eq!(page["total"], 2);
    assert_eq!(
        common::names(&page, "things"),
        vec!["restored-1", "restored-2"]
    );
}
