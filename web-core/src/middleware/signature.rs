use crate::error::AppError;
use crate::utils::signature::{
    constant_time_eq, content_md5, decode_header_value, hmac_content, verify_signature,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use http_body_util::BodyExt;
use std::sync::Arc;

pub const X_AUTHORIZATION: &str = "X-Authorization";
pub const CONTENT_MD5: &str = "Content-MD5";
pub const NONCE: &str = "Nonce";

/// Resolves API secrets and tracks the nonces already used with each key.
#[async_trait]
pub trait ApiKeyStore: Send + Sync {
    async fn get_api_secret(&self, api_key: &str) -> Result<Option<String>, AppError>;
    async fn accept_nonce(&self, api_key: &str, nonce: u64) -> Result<bool, AppError>;
}

/// Inserted into the request extensions once a signed request has been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiClient {
    pub api_key: String,
}

/// Accepts a nonce only when it is greater than the last one seen for the key.
#[derive(Debug, Clone, Default)]
pub struct NonceTracker {
    last_seen: Arc<DashMap<String, u64>>,
}

impl NonceTracker {
    pub fn accept(&self, api_key: &str, nonce: u64) -> bool {
        let mut last = self.last_seen.entry(api_key.to_string()).or_insert(0);
        if nonce > *last {
            *last = nonce;
            true
        } else {
            false
        }
    }
}

/// Verifies `X-Authorization: <key>:<base64 signature>` requests.
///
/// Requests without the header pass through untouched, leaving the decision to
/// the handler's own authentication.
pub async fn api_signature_middleware<S>(
    State(store): State<S>,
    req: Request,
    next: Next,
) -> Result<Response, AppError>
where
    S: ApiKeyStore + Clone + Send + Sync + 'static,
{
    if !req.headers().contains_key(X_AUTHORIZATION) {
        return Ok(next.run(req).await);
    }

    let headers = req.headers();
    let authorization = get_header(headers, X_AUTHORIZATION)?;
    let (api_key, encoded_signature) = authorization
        .split_once(':')
        .ok_or_else(|| unauthorized("Malformed X-Authorization header"))?;
    let (api_key, encoded_signature) = (api_key.to_string(), encoded_signature.to_string());

    let nonce_str = get_header(headers, NONCE)?;
    let nonce: u64 = nonce_str
        .trim()
        .parse()
        .map_err(|_| unauthorized("Invalid nonce format"))?;
    let encoded_md5 = get_header(headers, CONTENT_MD5)?;
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let secret = store
        .get_api_secret(&api_key)
        .await?
        .ok_or_else(|| unauthorized("Invalid API key"))?;

    let (parts, body) = req.into_parts();
    let bytes = body
        .collect()
        .await
        .map_err(|e| AppError::InternalError(anyhow::anyhow!("Failed to read body: {}", e)))?
        .to_bytes();

    let body_md5 = content_md5(&bytes);
    let claimed_md5 = decode_header_value(&encoded_md5).unwrap_or_default();
    if !constant_time_eq(body_md5.as_bytes(), claimed_md5.as_bytes()) {
        return Err(unauthorized("Content-MD5 does not match the request body"));
    }

    let path = parts
        .uri
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_else(|| parts.uri.path());
    let content = hmac_content(
        parts.method.as_str(),
        path,
        &body_md5,
        &content_type,
        nonce_str.trim(),
    );

    let signature = decode_header_value(&encoded_signature).unwrap_or_default();
    let is_valid = verify_signature(&secret, &content, &signature).map_err(|e| {
        AppError::InternalError(anyhow::anyhow!("Signature verification error: {}", e))
    })?;
    if !is_valid {
        tracing::warn!(api_key = %api_key, "Invalid API request signature");
        return Err(unauthorized("Invalid signature"));
    }

    if !store.accept_nonce(&api_key, nonce).await? {
        tracing::warn!(api_key = %api_key, nonce, "API nonce replayed");
        return Err(unauthorized("Nonce has already been used"));
    }

    let mut req = Request::from_parts(parts, Body::from(bytes));
    req.extensions_mut().insert(ApiClient { api_key });
    Ok(next.run(req).await)
}

fn get_header(headers: &HeaderMap, key: &str) -> Result<String, AppError> {
    headers
        .get(key)
        .ok_or_else(|| AppError::Unauthorized(anyhow::anyhow!("Missing header: {}", key)))?
        .to_str()
        .map(|s| s.to_string())
        .map_err(|_| AppError::Unauthorized(anyhow::anyhow!("Invalid header format: {}", key)))
}

fn unauthorized(message: &'static str) -> AppError {
    AppError::Unauthorized(anyhow::anyhow!(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::signature::{encode_header_value, generate_signature};
    use axum::{
        Extension, Router,
        http::{Request, StatusCode},
        middleware::from_fn_with_state,
        routing::post,
    };
    use tower::ServiceExt;

    #[derive(Clone, Default)]
    struct TestStore {
        nonces: NonceTracker,
    }

    #[async_trait]
    impl ApiKeyStore for TestStore {
        async fn get_api_secret(&self, api_key: &str) -> Result<Option<String>, AppError> {
            Ok((api_key == "key-1").then(|| "secret-1".to_string()))
        }

        async fn accept_nonce(&self, api_key: &str, nonce: u64) -> Result<bool, AppError> {
            Ok(self.nonces.accept(api_key, nonce))
        }
    }

    fn app(store: TestStore) -> Router {
        Router::new()
            .route(
                "/api/things",
                post(|client: Option<Extension<ApiClient>>| async move {
                    client.map(|Extension(c)| c.api_key).unwrap_or_default()
                }),
            )
            .layer(from_fn_with_state(store, api_signature_middleware::<TestStore>))
    }

    fn signed(api_key: &str, secret: &str, nonce: u64, body: &'static str) -> Request<Body> {
        let md5 = content_md5(body.as_bytes());
        let nonce = nonce.to_string();
        let content = hmac_content("POST", "/api/things", &md5, "application/json", &nonce);
        let signature = generate_signature(secret, &content).unwrap();

        Request::builder()
            .method("POST")
            .uri("/api/things")
            .header(header::CONTENT_TYPE, "application/json")
            .header(CONTENT_MD5, encode_header_value(&md5))
            .header(NONCE, nonce)
            .header(
                X_AUTHORIZATION,
                format!("{}:{}", api_key, encode_header_value(&signature)),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[test]
    fn nonces_must_increase_per_key() {
        let tracker = NonceTracker::default();
        assert!(tracker.accept("key-1", 10));
        assert!(!tracker.accept("key-1", 10));
        assert!(!tracker.accept("key-1", 9));
        assert!(tracker.accept("key-1", 11));
        assert!(tracker.accept("key-2", 1));
    }

    #[tokio::test]
    async fn unsigned_requests_pass_through() {
        let response = app(TestStore::default())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/things")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn valid_signature_identifies_the_client() {
        let response = app(TestStore::default())
            .oneshot(signed("key-1", "secret-1", 1, "{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"key-1");
    }

    #[tokio::test]
    async fn replayed_nonce_is_rejected() {
        let app = app(TestStore::default());

        let first = app.clone().oneshot(signed("key-1", "secret-1", 5, "{}")).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let replay = app.oneshot(signed("key-1", "secret-1", 5, "{}")).await.unwrap();
        assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_secret_or_unknown_key_is_unauthorized() {
        let wrong_secret = app(TestStore::default())
            .oneshot(signed("key-1", "secret-2", 1, "{}"))
            .await
            .unwrap();
        assert_eq!(wrong_secret.status(), StatusCode::UNAUTHORIZED);

        let unknown_key = app(TestStore::default())
            .oneshot(signed("key-9", "secret-1", 1, "{}"))
            .await
            .unwrap();
        assert_eq!(unknown_key.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn body_must_match_content_md5() {
        let mut request = signed("key-1", "secret-1", 1, "{}");
        *request.body_mut() = Body::from("{\"tampered\":true}");

        let response = app(TestStore::default()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn missing_nonce_is_unauthorized() {
        let mut request = signed("key-1", "secret-1", 1, "{}");
        request.headers_mut().remove(NONCE);

        let response = app(TestStore::default()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
