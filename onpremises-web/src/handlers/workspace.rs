use crate::context::ErrorPage;
use crate::handlers::api::describe_workspace;
use crate::middleware::page_context::PageRequest;
use crate::security::{authenticated_user, is_authenticated};
use crate::views::{WorkspaceApiTemplate, WorkspaceSummary, WorkspaceTemplate};
use crate::workspace::{can_access_workspace, can_write_workspace, WorkspaceMetadata};
use crate::AppState;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};

/// Resolves a workspace id from the path, mapping each failure to the page it should render.
async fn load_workspace(state: &AppState, raw_id: &str) -> Result<WorkspaceMetadata, ErrorPage> {
    let id: i64 = raw_id.parse().map_err(|_| {
        tracing::debug!(workspace_id = %raw_id, "Malformed workspace id");
        ErrorPage::Error
    })?;

    match state.workspaces.get_workspace_metadata(id).await {
        Ok(Some(workspace)) => Ok(workspace),
        Ok(None) => Err(ErrorPage::NotFound),
        Err(e) => {
            tracing::error!(workspace_id = id, error = %e, "Failed to load workspace metadata");
            Err(ErrorPage::ServerError)
        }
    }
}

pub async fn workspace_page(
    State(state): State<AppState>,
    page: PageRequest,
    Path(workspace_id): Path<String>,
) -> Response {
    let PageRequest {
        mut model,
        authentication,
    } = page;
    let authentication = authentication.as_ref();

    let workspace = match load_workspace(&state, &workspace_id).await {
        Ok(workspace) => workspace,
        Err(error_page) => {
            return state
                .enricher
                .error_page(error_page, model, authentication)
                .into_response()
        }
    };

    let user = authenticated_user(authentication);
    if !can_access_workspace(user, &workspace) {
        tracing::info!(
            workspace_id = workspace.id,
            username = user.map(|u| u.username.as_str()).unwrap_or("-"),
            "Workspace access denied"
        );
        return state
            .enricher
            .error_page(ErrorPage::NotFound, model, authentication)
            .into_response();
    }

    let show_api_link = state.features.workspace_api
        && is_authenticated(authentication)
        && can_write_workspace(user, &workspace);

    state
        .enricher
        .populate_common_attributes(&mut model, authentication, Some(&workspace.name), true);

    WorkspaceTemplate {
        model,
        workspace: WorkspaceSummary::from(&workspace),
        show_api_link,
    }
    .into_response()
}

/// API credentials and URLs of a workspace, for its signed-in write users.
pub async fn workspace_api_page(
    State(state): State<AppState>,
    page: PageRequest,
    Path(workspace_id): Path<String>,
) -> Response {
    let PageRequest {
        mut model,
        authentication,
    } = page;
    let authentication = authentication.as_ref();

    if !state.features.workspace_api {
        return state
            .enricher
            .error_page(ErrorPage::FeatureNotAvailable, model, authentication)
            .into_response();
    }

    let workspace = match load_workspace(&state, &workspace_id).await {
        Ok(workspace) => workspace,
        Err(error_page) => {
            return state
                .enricher
                .error_page(error_page, model, authentication)
                .into_response()
        }
    };

    if !is_authenticated(authentication)
        || !can_write_workspace(authenticated_user(authentication), &workspace)
    {
        return state
            .enricher
            .error_page(ErrorPage::NotFound, model, authentication)
            .into_response();
    }

    let title = format!("{} - API", workspace.name);
    state
        .enricher
        .populate_common_attributes(&mut model, authentication, Some(&title), true);

    WorkspaceApiTemplate {
        model,
        api: describe_workspace(&workspace, &state.web_url),
    }
    .into_response()
}
