//! Shared setup for onpremises-web integration tests.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use http_body_util::BodyExt;
use onpremises_web::config::FeatureSettings;
use onpremises_web::context::RequestContextEnricher;
use onpremises_web::models::SiteConfiguration;
use onpremises_web::search::{ConfiguredSearchComponent, SearchComponent};
use onpremises_web::startup::build_router;
use onpremises_web::workspace::{InMemoryWorkspaceComponent, WorkspaceMetadata};
use onpremises_web::AppState;
use secrecy::Secret;
use std::sync::Arc;
use tower::util::ServiceExt;
use web_core::middleware::signature::{CONTENT_MD5, NONCE, X_AUTHORIZATION};
use web_core::utils::signature::{
    content_md5, encode_header_value, generate_signature, hmac_content,
};

pub const WEB_URL: &str = "http://localhost:8080";

/// Workspace 1 is open; workspace 2 is readable by `auditors` and writable by `architects`.
pub fn workspaces() -> Vec<WorkspaceMetadata> {
    let mut open = WorkspaceMetadata::new(1, "Getting Started");
    open.description = "Open workspace".to_string();
    open.api_key = "key-1".to_string();
    open.api_secret = Secret::new("secret-1".to_string());

    let mut bank = WorkspaceMetadata::new(2, "Big Bank plc");
    bank.description = "Internet banking system".to_string();
    bank.api_key = "key-2".to_string();
    bank.api_secret = Secret::new("secret-2".to_string());
    bank.read_users = vec!["auditors".to_string()];
    bank.write_users = vec!["architects".to_string()];
    bank.public = true;

    vec![open, bank]
}

pub fn state_with(features: FeatureSettings, search_enabled: bool) -> AppState {
    let search: Arc<dyn SearchComponent> = Arc::new(ConfiguredSearchComponent::new(
        &onpremises_web::config::SearchSettings {
            enabled: search_enabled,
        },
    ));
    let configuration = SiteConfiguration {
        web_url: WEB_URL.to_string(),
        workspace_api: features.workspace_api,
    };
    let enricher = Arc::new(
        RequestContextEnricher::new("UTC", Some(search)).with_configuration(configuration),
    );
    let workspaces = Arc::new(InMemoryWorkspaceComponent::new(workspaces()));

    AppState::new(enricher, workspaces, features, format!("{}/", WEB_URL))
}

pub fn state() -> AppState {
    state_with(FeatureSettings::default(), false)
}

pub fn app() -> Router {
    build_router(state(), false)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// A GET signed the way API clients sign requests.
pub fn signed_get(uri: &str, api_key: &str, api_secret: &str, nonce: u64) -> Request<Body> {
    let md5 = content_md5(b"");
    let nonce = nonce.to_string();
    let content = hmac_content("GET", uri, &md5, "", &nonce);
    let signature = generate_signature(api_secret, &content).unwrap();

    Request::builder()
        .uri(uri)
        .header(CONTENT_MD5, encode_header_value(&md5))
        .header(NONCE, nonce)
        .header(
            X_AUTHORIZATION,
            format!("{}:{}", api_key, encode_header_value(&signature)),
        )
        .body(Body::empty())
        .unwrap()
}

/// Replays a session cookie on a GET.
pub async fn get_with_cookie(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .uri(uri)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// The nonce carried by a `script-src 'self' 'nonce-...'` policy.
pub fn nonce_from_policy(policy: &str) -> &str {
    policy
        .strip_prefix("script-src 'self' 'nonce-")
        .and_then(|rest| rest.strip_suffix('\''))
        .expect("unexpected Content-Security-Policy format")
}
