use crate::context::ErrorPage;
use crate::middleware::page_context::PageRequest;
use crate::AppState;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};

/// Fallback for unmatched paths.
pub async fn not_found(State(state): State<AppState>, page: PageRequest) -> Response {
    state
        .enricher
        .error_page(ErrorPage::NotFound, page.model, page.authentication.as_ref())
        .into_response()
}
