use crate::context::ErrorPage;
use crate::models::{PageModel, WorkspaceApiResponse};
use crate::workspace::WorkspaceMetadata;
use askama::Template;
use axum::response::{IntoResponse, Response};

#[derive(Debug, Clone)]
pub struct WorkspaceSummary {
    pub id: i64,
    pub name: String,
    pub description: String,
}

impl From<&WorkspaceMetadata> for WorkspaceSummary {
    fn from(workspace: &WorkspaceMetadata) -> Self {
        Self {
            id: workspace.id,
            name: workspace.name.clone(),
            description: workspace.description.clone(),
        }
    }
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub model: PageModel,
    pub workspaces: Vec<WorkspaceSummary>,
}

#[derive(Template)]
#[template(path = "workspace.html")]
pub struct WorkspaceTemplate {
    pub model: PageModel,
    pub workspace: WorkspaceSummary,
    pub show_api_link: bool,
}

#[derive(Template)]
#[template(path = "workspace-api.html")]
pub struct WorkspaceApiTemplate {
    pub model: PageModel,
    pub api: WorkspaceApiResponse,
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate {
    model: PageModel,
}

#[derive(Template)]
#[template(path = "404.html")]
struct NotFoundTemplate {
    model: PageModel,
}

#[derive(Template)]
#[template(path = "500.html")]
struct ServerErrorTemplate {
    model: PageModel,
}

#[derive(Template)]
#[template(path = "feature-not-available.html")]
struct FeatureNotAvailableTemplate {
    model: PageModel,
}

/// A static error view together with its populated model.
pub struct ErrorView {
    page: ErrorPage,
    model: PageModel,
}

impl ErrorView {
    pub(crate) fn new(page: ErrorPage, model: PageModel) -> Self {
        Self { page, model }
    }

    pub fn view_name(&self) -> &'static str {
        self.page.view()
    }

    pub fn model(&self) -> &PageModel {
        &self.model
    }
}

impl IntoResponse for ErrorView {
    fn into_response(self) -> Response {
        let status = self.page.status();
        let model = self.model;
        match self.page {
            ErrorPage::Error => (status, ErrorTemplate { model }).into_response(),
            ErrorPage::NotFound => (status, NotFoundTemplate { model }).into_response(),
            ErrorPage::ServerError => (status, ServerErrorTemplate { model }).into_response(),
            ErrorPage::FeatureNotAvailable => {
                (status, FeatureNotAvailableTemplate { model }).into_response()
            }
        }
    }
}
