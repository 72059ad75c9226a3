use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::IntoResponse,
};
use base64::{Engine as _, engine::general_purpose};
use rand::RngCore;
use std::fmt;

pub const REFERRER_POLICY_VALUE: &str = "strict-origin-when-cross-origin";
pub const FRAME_OPTIONS_SAMEORIGIN: &str = "sameorigin";

/// Number of random bytes behind each script nonce.
const NONCE_BYTES: usize = 24;

/// Single-use token tying inline scripts to the Content-Security-Policy of one response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptNonce(String);

impl ScriptNonce {
    /// Base64 of fresh bytes from the thread-local CSPRNG; safe to call from any worker.
    pub fn generate() -> Self {
        let mut bytes = [0u8; NONCE_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(general_purpose::STANDARD.encode(bytes))
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn content_security_policy(&self) -> String {
        format!("script-src 'self' 'nonce-{}'", self.0)
    }
}

impl fmt::Display for ScriptNonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sets the Referrer-Policy and a nonce-scoped Content-Security-Policy for an HTML page.
///
/// The returned nonce must be rendered on every inline script of the same response.
pub fn apply_page_security_headers(headers: &mut HeaderMap) -> ScriptNonce {
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static(REFERRER_POLICY_VALUE),
    );

    let nonce = ScriptNonce::generate();
    match HeaderValue::from_str(&nonce.content_security_policy()) {
        Ok(value) => {
            headers.insert(header::CONTENT_SECURITY_POLICY, value);
        }
        Err(e) => tracing::error!(error = %e, "Script nonce produced an invalid header value"),
    }

    nonce
}

pub fn apply_frame_options_header(headers: &mut HeaderMap) {
    headers.insert(
        header::X_FRAME_OPTIONS,
        HeaderValue::from_static(FRAME_OPTIONS_SAMEORIGIN),
    );
}

/// Strict headers for JSON endpoints: nothing may be loaded or framed.
pub async fn api_security_headers_middleware(req: Request, next: Next) -> impl IntoResponse {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static(REFERRER_POLICY_VALUE),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));

    response
}
