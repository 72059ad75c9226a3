use crate::middleware::page_context::PageRequest;
use crate::security::authenticated_user;
use crate::views::{HomeTemplate, WorkspaceSummary};
use crate::workspace::can_access_workspace;
use crate::{context::ErrorPage, AppState};
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};

pub async fn health_check() -> &'static str {
    "OK"
}

/// Lists the workspaces the current user may open.
pub async fn home(State(state): State<AppState>, page: PageRequest) -> Response {
    let PageRequest {
        mut model,
        authentication,
    } = page;
    let authentication = authentication.as_ref();

    let workspaces = match state.workspaces.get_workspaces().await {
        Ok(workspaces) => workspaces,
        Err(e) => {
            tracing::error!(error = %e, "Failed to list workspaces");
            return state
                .enricher
                .error_page(ErrorPage::ServerError, model, authentication)
                .into_response();
        }
    };

    let user = authenticated_user(authentication);
    let workspaces: Vec<WorkspaceSummary> = workspaces
        .iter()
        .filter(|workspace| can_access_workspace(user, *workspace))
        .map(WorkspaceSummary::from)
        .collect();

    state
        .enricher
        .populate_common_attributes(&mut model, authentication, None, true);

    HomeTemplate { model, workspaces }.into_response()
}
