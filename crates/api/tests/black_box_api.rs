use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;

use servicedesk_api::config::ApiConfig;
use servicedesk_auth::{ACCESS_TOKEN, CallerPayload, RoleKind, RoleLookup, RoleRecord};
use servicedesk_core::TenantId;
use servicedesk_infra::InMemoryRoleDirectory;

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(config: ApiConfig, lookup: Arc<dyn RoleLookup>) -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let app = servicedesk_api::app::build_app(&config, lookup);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    /// Server backed by the default roles plus one employee and one customer role.
    async fn with_directory() -> Self {
        let dir = InMemoryRoleDirectory::with_default_roles();
        dir.upsert(RoleRecord::new("r1", RoleKind::Employee));
        dir.upsert(RoleRecord::new("c1", RoleKind::Customer));
        Self::spawn(ApiConfig::new(JWT_SECRET), Arc::new(dir)).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint(roles: &[&str], home_tenant: Option<&str>, token_type: &str) -> String {
    let now = Utc::now();
    let claims = CallerPayload {
        subject_id: "user-42".to_string(),
        role_ids: roles.iter().map(|r| r.to_string()).collect(),
        home_tenant: home_tenant.map(|t| TenantId::parse(t).unwrap()),
        token_type: token_type.to_string(),
        issued_at: now - ChronoDuration::seconds(5),
        expires_at: now + ChronoDuration::minutes(10),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("failed to encode jwt")
}

fn access(roles: &[&str], home_tenant: Option<&str>) -> String {
    mint(roles, home_tenant, ACCESS_TOKEN)
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::with_directory().await;
    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_token_is_unauthenticated() {
    let srv = TestServer::with_directory().await;

    let res = reqwest::get(srv.url("/whoami")).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "unauthenticated");
}

#[tokio::test]
async fn invalid_tokens_are_rejected() {
    let srv = TestServer::with_directory().await;
    let client = reqwest::Client::new();

    for token in ["garbage".to_string(), mint(&["SA"], None, "REFRESH_TOKEN")] {
        let res = client.get(srv.url("/whoami")).bearer_auth(token).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn whoami_reflects_token() {
    let srv = TestServer::with_directory().await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/whoami"))
        .bearer_auth(access(&["EU"], Some("acme")))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["subject_id"], "user-42");
    assert_eq!(body["home_tenant"], "acme");
    assert_eq!(body["roles"], json!(["EU"]));
}

#[tokio::test]
async fn admin_routes_require_super_admin() {
    let srv = TestServer::with_directory().await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/admin/ping"))
        .bearer_auth(access(&["SA"], None))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(srv.url("/admin/ping"))
        .bearer_auth(access(&["TA"], Some("acme")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "forbidden");
}

#[tokio::test]
async fn unknown_role_ids_are_forbidden() {
    let srv = TestServer::with_directory().await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/whoami"))
        .bearer_auth(access(&["ghost"], Some("acme")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn non_admin_tenant_is_pinned() {
    let srv = TestServer::with_directory().await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/scope?tenant=other"))
        .bearer_auth(access(&["EU"], Some("acme")))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["tenant"], "acme");
}

#[tokio::test]
async fn super_admin_may_choose_tenant() {
    let srv = TestServer::with_directory().await;
    let client = reqwest::Client::new();
    let token = access(&["SA"], Some("acme"));

    let res = client
        .get(srv.url("/scope?tenant=other"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["tenant"], "other");

    // Nothing supplied: the mandatory-field check rejects it.
    let res = client.get(srv.url("/scope")).bearer_auth(&token).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_tenant_scope");
}

#[tokio::test]
async fn bulk_import_scopes_each_row() {
    let srv = TestServer::with_directory().await;
    let client = reqwest::Client::new();

    let payload = json!({
        "items": [
            { "name": "printer", "tenant": "other" },
            { "name": "laptop" }
        ]
    });

    // Tenant-defined employee role passes the L* declaration.
    let res = client
        .post(srv.url("/scope/bulk"))
        .bearer_auth(access(&["r1"], Some("acme")))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["items"][0]["tenant"], "acme");
    assert_eq!(body["items"][1]["tenant"], "acme");
    assert_eq!(body["items"][1]["name"], "laptop");

    // SA keeps per-row tenants, so the row without one fails validation.
    let res = client
        .post(srv.url("/scope/bulk"))
        .bearer_auth(access(&["SA"], None))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().starts_with("items[1].tenant"));

    // Customers are not staff.
    let res = client
        .post(srv.url("/scope/bulk"))
        .bearer_auth(access(&["c1"], Some("acme")))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn bulk_import_resolves_tenant_before_type_check() {
    let srv = TestServer::with_directory().await;
    let client = reqwest::Client::new();
    let payload = json!({ "items": [{ "name": "x", "tenant": 42 }] });

    // A pinned caller's value is replaced whatever its type.
    let res = client
        .post(srv.url("/scope/bulk"))
        .bearer_auth(access(&["r1"], Some("acme")))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["items"][0]["tenant"], "acme");
    assert_eq!(body["items"][0]["name"], "x");

    // SA keeps the value, which then fails as a non-string.
    let res = client
        .post(srv.url("/scope/bulk"))
        .bearer_auth(access(&["SA"], Some("acme")))
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "invalid_tenant_scope");
    assert_eq!(body["message"], "items[0].tenant: tenant must be a string");
}

#[tokio::test]
async fn explain_reports_decision() {
    let srv = TestServer::with_directory().await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/authz/explain?require=SA,TA"))
        .bearer_auth(access(&["EU"], Some("acme")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["granted"], false);
    assert_eq!(body["denial"], "forbidden");
    assert_eq!(body["roles"][0]["role"]["id"], "EU");

    let res = client
        .get(srv.url("/authz/explain?require=%20"))
        .bearer_auth(access(&["EU"], Some("acme")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unreachable_role_service_fails_closed() {
    // Bind and drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead = listener.local_addr().unwrap();
    drop(listener);

    let mut config = ApiConfig::new(JWT_SECRET);
    config.role_service_url = Some(format!("http://{}", dead));
    config.role_lookup_timeout = Duration::from_millis(500);
    let lookup = servicedesk_api::app::role_lookup_from_config(&config).unwrap();
    let srv = TestServer::spawn(config, lookup).await;

    let res = reqwest::Client::new()
        .get(srv.url("/admin/ping"))
        .bearer_auth(access(&["SA"], None))
        .send()
        .await
        .unwrap();

    // Indistinguishable from an ordinary role mismatch.
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "forbidden");
}
