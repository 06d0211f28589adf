//! Common test utilities for hub API testing.
//!
//! Every harness starts from the same seeded platform:
//!
//! | Token | User | Relation |
//! |-------|------|----------|
//! | [`ADMIN_TOKEN`] | [`ADMIN_ID`] | platform administrator |
//! | [`OWNER_TOKEN`] | [`OWNER_ID`] | owner of [`ORG_ID`] |
//! | [`MEMBER_TOKEN`] | [`MEMBER_ID`] | viewer in [`ORG_ID`] |
//! | [`OUTSIDER_TOKEN`] | [`OUTSIDER_ID`] | owner of [`OTHER_ORG_ID`] |

#![allow(dead_code)]

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::{TestRequest, TestServer};
use chrono::Utc;
use hub_persistence::backends::memory::{InMemoryAuth, InMemoryBackend};
use hub_persistence::identity::Identity;
use hub_persistence::types::{OrgMember, Organization, Role};
use hub_rest::{ServerConfig, create_app_with_config};
use serde_json::{Value, json};

pub const AUTHORIZATION: HeaderName = HeaderName::from_static("authorization");
pub const CONTENT_TYPE: HeaderName = HeaderName::from_static("content-type");

pub const ADMIN_TOKEN: &str = "admin-token";
pub const OWNER_TOKEN: &str = "owner-token";
pub const MEMBER_TOKEN: &str = "member-token";
pub const OUTSIDER_TOKEN: &str = "outsider-token";

pub const ADMIN_ID: &str = "5d1c0f4e-0a5b-4c8e-9b1f-2a6e7d3c9f01";
pub const OWNER_ID: &str = "5d1c0f4e-0a5b-4c8e-9b1f-2a6e7d3c9f02";
pub const MEMBER_ID: &str = "5d1c0f4e-0a5b-4c8e-9b1f-2a6e7d3c9f03";
pub const OUTSIDER_ID: &str = "5d1c0f4e-0a5b-4c8e-9b1f-2a6e7d3c9f04";

pub const ORG_ID: &str = "9a7e3b21-6c4d-4f0a-8e2b-1d5c7a9e0b01";
pub const OTHER_ORG_ID: &str = "9a7e3b21-6c4d-4f0a-8e2b-1d5c7a9e0b02";

pub const OWNER_EMAIL: &str = "owner@example.com";
pub const MEMBER_EMAIL: &str = "member@example.com";

/// A test server over a seeded in-memory platform.
pub struct HubHarness {
    /// The test server instance.
    pub server: TestServer,

    /// The storage backend, shared with the server.
    pub backend: InMemoryBackend,

    /// The identity provider, shared with the server.
    pub auth: InMemoryAuth,
}

impl HubHarness {
    /// Creates a harness with the test configuration.
    pub fn new() -> Self {
        Self::with_config(ServerConfig::for_testing())
    }

    /// Creates a harness with a custom configuration.
    pub fn with_config(config: ServerConfig) -> Self {
        let backend = InMemoryBackend::new();
        seed_orgs(&backend);

        let auth = InMemoryAuth::new()
            .with_token(ADMIN_TOKEN, Identity::admin(ADMIN_ID, "admin@example.com"))
            .with_token(OWNER_TOKEN, Identity::user(OWNER_ID, OWNER_EMAIL))
            .with_token(MEMBER_TOKEN, Identity::user(MEMBER_ID, MEMBER_EMAIL))
            .with_token(
                OUTSIDER_TOKEN,
                Identity::user(OUTSIDER_ID, "outsider@example.com"),
            );

        let app = create_app_with_config(backend.clone(), Arc::new(auth.clone()), config);
        let server = TestServer::new(app).expect("Failed to create test server");

        Self {
            server,
            backend,
            auth,
        }
    }

    /// Creates one group in `org_id` and returns it.
    pub async fn create_group(&self, token: &str, org_id: &str, name: &str) -> Value {
        let response = authorized(self.server.post(&format!("/orgs/{org_id}/groups")), token)
            .json(&json!({ "groups": [{ "name": name }] }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()["groups"][0].clone()
    }

    /// Creates one profile in `group_id` and returns it.
    pub async fn create_profile(&self, token: &str, group_id: &str, name: &str) -> Value {
        let response = authorized(
            self.server.post(&format!("/groups/{group_id}/profiles")),
            token,
        )
        .json(&json!({ "profiles": [{ "name": name, "config": { "interval": 30 } }] }))
        .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()["profiles"][0].clone()
    }

    /// Creates things under `profile_id` and returns them in request order.
    pub async fn create_things(&self, token: &str, profile_id: &str, names: &[&str]) -> Vec<Value> {
        let things: Vec<Value> = names.iter().map(|name| json!({ "name": name })).collect();
        let response = authorized(
            self.server.post(&format!("/profiles/{profile_id}/things")),
            token,
        )
        .json(&json!({ "things": things }))
        .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()["things"]
            .as_array()
            .cloned()
            .unwrap_or_default()
    }

    /// Creates an owner-held group with one profile, returning their ids.
    pub async fn create_hierarchy(&self) -> (String, String) {
        let group = self.create_group(OWNER_TOKEN, ORG_ID, "plant").await;
        let group_id = id_of(&group);
        let profile = self.create_profile(OWNER_TOKEN, &group_id, "sensor").await;
        (group_id, id_of(&profile))
    }
}

/// Adds a bearer credential to a request.
pub fn authorized(request: TestRequest, token: &str) -> TestRequest {
    request.add_header(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).expect("Invalid token header"),
    )
}

/// The `id` field of an entity.
pub fn id_of(entity: &Value) -> String {
    entity["id"].as_str().unwrap_or_default().to_string()
}

/// The `name` fields of a listing page, in page order.
pub fn names(page: &Value, field: &str) -> Vec<String> {
    page[field]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item["name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

fn seed_orgs(backend: &InMemoryBackend) {
    for (id, owner) in [(ORG_ID, OWNER_ID), (OTHER_ORG_ID, OUTSIDER_ID)] {
        backend
            .insert_org(Organization {
                id: id.to_string(),
                name: format!("org {id}"),
                owner_id: owner.to_string(),
                created_at: Utc::now(),
            })
            .expect("Failed to seed organization");
    }
    backend
        .add_org_member(OrgMember {
            org_id: ORG_ID.to_string(),
            member_id: MEMBER_ID.to_string(),
            email: MEMBER_EMAIL.to_string(),
            role: Role::Viewer,
        })
        .expect("Failed to seed organization member");
}
