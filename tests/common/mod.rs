// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use coach_onboarding::models::TokenPair;
use coach_onboarding::negotiation::Session;
use coach_onboarding::services::{CredentialStore, MemoryCredentialStore, PlanningClient};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Access token handed to every authenticated test client.
#[allow(dead_code)]
pub const TEST_ACCESS_TOKEN: &str = "test-access-token";

/// Token pair as the service would issue it.
#[allow(dead_code)]
pub fn test_tokens() -> TokenPair {
    TokenPair {
        access_token: TEST_ACCESS_TOKEN.to_string(),
        refresh_token: "test-refresh-token".to_string(),
        token_type: "bearer".to_string(),
    }
}

/// Client against `server` holding valid test tokens.
/// Returns the client and its credential store.
#[allow(dead_code)]
pub fn authed_client(server: &MockServer) -> (PlanningClient, Arc<MemoryCredentialStore>) {
    let store = Arc::new(MemoryCredentialStore::with_tokens(test_tokens()));
    let client = PlanningClient::new(server.uri(), store.clone() as Arc<dyn CredentialStore>);
    (client, store)
}

/// Client against `server` with no credentials.
#[allow(dead_code)]
pub fn anonymous_client(server: &MockServer) -> (PlanningClient, Arc<MemoryCredentialStore>) {
    let store = Arc::new(MemoryCredentialStore::new());
    let client = PlanningClient::new(server.uri(), store.clone() as Arc<dyn CredentialStore>);
    (client, store)
}

/// Mount an authenticated JSON endpoint.
#[allow(dead_code)]
pub async fn mount_json(server: &MockServer, verb: &str, route: &str, status: u16, body: Value) {
    Mock::given(method(verb))
        .and(path(route))
        .and(header("authorization", format!("Bearer {}", TEST_ACCESS_TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

/// Capability record response.
#[allow(dead_code)]
pub fn capability_record() -> Value {
    json!({
        "id": "cap-1",
        "date": "2023-12-01",
        "comfortable_distance_m": 4828,
        "comfortable_time_sec": 1800,
        "projection": {"predictions": {"10000": 3900}}
    })
}

/// Plan response with a few workouts.
#[allow(dead_code)]
pub fn plan_body() -> Value {
    json!({
        "id": "plan-1",
        "start_date": "2023-12-01",
        "end_date": "2024-02-26",
        "status": "active",
        "workouts": [
            {"id": "w1", "wdate": "2023-12-02", "wtype": "easy", "target_distance_m": 5000,
             "target_duration_sec": null, "target_zone": "Z2", "description": "Easy run", "is_key": false},
            {"id": "w2", "wdate": "2023-12-03", "wtype": "long", "target_distance_m": 12000,
             "target_duration_sec": null, "target_zone": "Z2", "description": "Long run", "is_key": true}
        ]
    })
}

/// Session that has already picked up a recorded capability.
#[allow(dead_code)]
pub async fn drafted_session(server: &MockServer) -> Session {
    mount_json(server, "GET", "/capability/latest", 200, capability_record()).await;
    let (client, _) = authed_client(server);
    let mut session = Session::new(client);
    session
        .resume()
        .await
        .expect("resume should find the capability");
    session
}
