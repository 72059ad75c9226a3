//! Cross-cutting request enrichment for page handlers.
//!
//! Stages run in a fixed order: security headers, frame options (both in
//! [`crate::middleware::page_context`]), then common attributes, which each
//! handler applies with its own page title.

use crate::models::{PageModel, SiteConfiguration, Version};
use crate::search::SearchComponent;
use crate::security::{current_user, is_authenticated, Authentication};
use crate::views::ErrorView;
use axum::http::{HeaderMap, Request, StatusCode};
use std::sync::Arc;
use web_core::middleware::security_headers::{
    apply_frame_options_header, apply_page_security_headers,
};

pub const PRODUCT_NAME: &str = "Structurizr";

/// Terminal error outcomes a page handler can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPage {
    Error,
    NotFound,
    ServerError,
    FeatureNotAvailable,
}

impl ErrorPage {
    pub fn view(self) -> &'static str {
        match self {
            ErrorPage::Error => "error",
            ErrorPage::NotFound => "404",
            ErrorPage::ServerError => "500",
            ErrorPage::FeatureNotAvailable => "feature-not-available",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ErrorPage::Error => "",
            ErrorPage::NotFound => "Not found",
            ErrorPage::ServerError => "Error",
            ErrorPage::FeatureNotAvailable => "Feature not available",
        }
    }

    pub fn status(self) -> StatusCode {
        match self {
            ErrorPage::Error => StatusCode::BAD_REQUEST,
            ErrorPage::NotFound | ErrorPage::FeatureNotAvailable => StatusCode::NOT_FOUND,
            ErrorPage::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub struct RequestContextEnricher {
    time_zone: String,
    version: Version,
    search: Option<Arc<dyn SearchComponent>>,
    configuration: SiteConfiguration,
}

impl RequestContextEnricher {
    pub fn new(time_zone: impl Into<String>, search: Option<Arc<dyn SearchComponent>>) -> Self {
        Self {
            time_zone: time_zone.into(),
            version: Version::current(),
            search,
            configuration: SiteConfiguration::default(),
        }
    }

    pub fn with_configuration(mut self, configuration: SiteConfiguration) -> Self {
        self.configuration = configuration;
        self
    }

    /// Exposes the read-only server settings as `structurizrConfiguration`.
    pub fn apply_configuration(&self, model: &mut PageModel) {
        model.structurizr_configuration = Some(self.configuration.clone());
    }

    /// Referrer-Policy plus a Content-Security-Policy scoped to a fresh nonce,
    /// which is also stored in the model for the renderer.
    pub fn apply_security_headers(&self, headers: &mut HeaderMap, model: &mut PageModel) {
        let nonce = apply_page_security_headers(headers);
        model.script_nonce = Some(nonce.into_string());
    }

    pub fn apply_frame_options_header<B>(&self, _request: &Request<B>, headers: &mut HeaderMap) {
        apply_frame_options_header(headers);
    }

    /// Search is on only when a component is present and reports itself enabled.
    pub fn search_enabled(&self) -> bool {
        self.search.as_ref().is_some_and(|search| search.is_enabled())
    }

    pub fn populate_common_attributes(
        &self,
        model: &mut PageModel,
        authentication: Option<&Authentication>,
        page_title: Option<&str>,
        show_header_and_footer: bool,
    ) {
        model.time_zone = Some(self.time_zone.clone());
        if model.show_header.is_none() {
            model.show_header = Some(show_header_and_footer);
        }
        if model.show_footer.is_none() {
            model.show_footer = Some(show_header_and_footer);
        }
        model.version = Some(self.version.clone());
        model.authenticated = is_authenticated(authentication);
        model.user = current_user(authentication).cloned();
        model.search_enabled = self.search_enabled();

        model.page_title = Some(match page_title {
            Some(title) if !title.is_empty() => format!("{} - {}", PRODUCT_NAME, title),
            _ => PRODUCT_NAME.to_string(),
        });
    }

    pub fn error_page(
        &self,
        page: ErrorPage,
        mut model: PageModel,
        authentication: Option<&Authentication>,
    ) -> ErrorView {
        self.populate_common_attributes(&mut model, authentication, Some(page.title()), true);
        ErrorView::new(page, model)
    }
}
