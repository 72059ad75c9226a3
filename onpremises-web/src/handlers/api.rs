use crate::models::WorkspaceApiResponse;
use crate::security::{authenticated_user, is_authenticated, session::SessionAuthentication};
use crate::workspace::{can_write_workspace, WorkspaceMetadata};
use crate::AppState;
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use secrecy::ExposeSecret;
use web_core::error::AppError;
use web_core::middleware::signature::ApiClient;

/// Builds the API description of a workspace. Public and shareable URLs stay
/// empty unless the workspace is public or has a sharing token.
pub fn describe_workspace(workspace: &WorkspaceMetadata, web_url: &str) -> WorkspaceApiResponse {
    let mut response = WorkspaceApiResponse::new();
    response.set_id(workspace.id);
    response.set_name(workspace.name.as_str());
    response.set_description(workspace.description.as_str());
    response.set_api_key(workspace.api_key.as_str());
    response.set_api_secret(workspace.api_secret.expose_secret().as_str());
    response.set_private_url(format!("{}/workspace/{}", web_url, workspace.id));

    if workspace.public {
        response.set_public_url(format!("{}/share/{}", web_url, workspace.id));
    }

    if let Some(token) = workspace.sharing_token.as_deref().filter(|t| !t.is_empty()) {
        response.set_shareable_url(format!("{}/share/{}/{}", web_url, workspace.id, token));
    }

    response
}

/// Signed API clients may read the workspace their key belongs to. Everyone else
/// needs a signed-in session with write access.
pub async fn get_workspace(
    State(state): State<AppState>,
    client: Option<Extension<ApiClient>>,
    SessionAuthentication(authentication): SessionAuthentication,
    Path(workspace_id): Path<String>,
) -> Result<Json<WorkspaceApiResponse>, AppError> {
    if !state.features.workspace_api {
        return Err(AppError::NotFound(anyhow::anyhow!(
            "The workspace API is not enabled"
        )));
    }

    let id: i64 = workspace_id.parse().map_err(|_| {
        AppError::BadRequest(anyhow::anyhow!("Invalid workspace id: {}", workspace_id))
    })?;

    let workspace = state
        .workspaces
        .get_workspace_metadata(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Workspace {} not found", id)))?;

    match client {
        Some(Extension(client)) => {
            if client.api_key != workspace.api_key {
                return Err(AppError::Forbidden(anyhow::anyhow!(
                    "API key does not belong to workspace {}",
                    id
                )));
            }
        }
        None => {
            let authentication = authentication.as_ref();
            if !is_authenticated(authentication) {
                return Err(AppError::Unauthorized(anyhow::anyhow!(
                    "Authentication required"
                )));
            }
            if !can_write_workspace(authenticated_user(authentication), &workspace) {
                return Err(AppError::Forbidden(anyhow::anyhow!(
                    "Access to workspace {} denied",
                    id
                )));
            }
        }
    }

    tracing::info!(workspace_id = id, "Workspace API details requested");

    Ok(Json(describe_workspace(&workspace, &state.web_url)))
}
