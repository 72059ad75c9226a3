pub mod config;
pub mod context;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod search;
pub mod security;
pub mod services;
pub mod startup;
pub mod views;
pub mod workspace;

use crate::config::{FeatureSettings, Settings};
use crate::context::RequestContextEnricher;
use crate::models::SiteConfiguration;
use crate::search::{ConfiguredSearchComponent, SearchComponent};
use crate::workspace::{InMemoryWorkspaceComponent, WorkspaceComponent, WorkspaceMetadata};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use std::sync::Arc;
use web_core::error::AppError;
use web_core::middleware::signature::{ApiKeyStore, NonceTracker};

/// Shared application state; only the API nonce tracker changes after start-up.
#[derive(Clone)]
pub struct AppState {
    pub enricher: Arc<RequestContextEnricher>,
    pub workspaces: Arc<dyn WorkspaceComponent>,
    pub features: FeatureSettings,
    /// Externally visible base URL without a trailing slash.
    pub web_url: String,
    pub nonces: NonceTracker,
}

impl AppState {
    pub fn new(
        enricher: Arc<RequestContextEnricher>,
        workspaces: Arc<dyn WorkspaceComponent>,
        features: FeatureSettings,
        web_url: impl Into<String>,
    ) -> Self {
        Self {
            enricher,
            workspaces,
            features,
            web_url: web_url.into().trim_end_matches('/').to_string(),
            nonces: NonceTracker::default(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let search: Arc<dyn SearchComponent> =
            Arc::new(ConfiguredSearchComponent::new(&settings.search));
        let enricher = Arc::new(
            RequestContextEnricher::new(settings.application.resolved_time_zone(), Some(search))
                .with_configuration(SiteConfiguration::from(settings)),
        );
        let workspaces = Arc::new(InMemoryWorkspaceComponent::new(
            settings
                .workspaces
                .iter()
                .cloned()
                .map(WorkspaceMetadata::from),
        ));

        Self::new(
            enricher,
            workspaces,
            settings.features.clone(),
            settings.application.web_url.clone(),
        )
    }
}

#[async_trait]
impl ApiKeyStore for AppState {
    async fn get_api_secret(&self, api_key: &str) -> Result<Option<String>, AppError> {
        if api_key.is_empty() {
            return Ok(None);
        }

        let workspaces = self.workspaces.get_workspaces().await?;
        Ok(workspaces
            .into_iter()
            .find(|workspace| workspace.api_key == api_key)
            .map(|workspace| workspace.api_secret.expose_secret().clone()))
    }

    async fn accept_nonce(&self, api_key: &str, nonce: u64) -> Result<bool, AppError> {
        Ok(self.nonces.accept(api_key, nonce))
    }
}
