use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use time::Duration;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use web_core::middleware::{
    metrics::metrics_middleware,
    security_headers::api_security_headers_middleware,
    signature::api_signature_middleware,
    tracing::{extract_request_id, request_id_middleware},
};

use crate::handlers::{
    api::get_workspace,
    app::{health_check, home},
    auth::sign_out_handler,
    errors::not_found,
    metrics::metrics,
    workspace::{workspace_api_page, workspace_page},
};
use crate::middleware::page_context::page_context_middleware;
use crate::AppState;

/// Builds the application router.
///
/// Page routes (and the not-found fallback) run through the page-context
/// middleware, which sets the nonce-scoped CSP, Referrer-Policy and
/// X-Frame-Options headers before the handler populates its model. JSON routes
/// get the strict API headers instead, and accept HMAC-signed requests.
pub fn build_router(state: AppState, secure_cookies: bool) -> Router {
    // Sessions are held in memory only
    build_router_with_sessions(state, MemoryStore::default(), secure_cookies)
}

/// Same as [`build_router`], sharing an existing session store.
pub fn build_router_with_sessions(
    state: AppState,
    session_store: MemoryStore,
    secure_cookies: bool,
) -> Router {
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_expiry(Expiry::OnInactivity(Duration::hours(24)));

    let pages = Router::new()
        .route("/", get(home))
        .route("/workspace/:workspace_id", get(workspace_page))
        .route("/workspace/:workspace_id/api", get(workspace_api_page))
        .route("/signout", get(sign_out_handler))
        .fallback(not_found)
        .layer(from_fn_with_state(
            state.enricher.clone(),
            page_context_middleware,
        ));

    let api = Router::new()
        .route("/api/workspace/:workspace_id", get(get_workspace))
        .route_layer(from_fn_with_state(
            state.clone(),
            api_signature_middleware::<AppState>,
        ))
        .layer(from_fn(api_security_headers_middleware));

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .merge(api)
        .merge(pages)
        .layer(session_layer)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = extract_request_id(request.headers()).unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
