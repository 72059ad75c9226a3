use crate::config::Settings;
use crate::security::User;
use serde::Serialize;

/// Build descriptor shown in page footers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Version {
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<&'static str>,
}

impl Version {
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            build: option_env!("BUILD_NUMBER"),
        }
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.build {
            Some(build) => write!(f, "{} (build {})", self.version, build),
            None => f.write_str(self.version),
        }
    }
}

/// Read-only server settings exposed to every page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfiguration {
    pub web_url: String,
    pub workspace_api: bool,
}

impl From<&Settings> for SiteConfiguration {
    fn from(settings: &Settings) -> Self {
        Self {
            web_url: settings
                .application
                .web_url
                .trim_end_matches('/')
                .to_string(),
            workspace_api: settings.features.workspace_api,
        }
    }
}

/// Attributes shared by every rendered page.
///
/// `show_header`/`show_footer` stay `None` until either a handler or
/// `populate_common_attributes` decides them; the other attributes are
/// overwritten on every population.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageModel {
    pub script_nonce: Option<String>,
    pub time_zone: Option<String>,
    pub version: Option<Version>,
    pub authenticated: bool,
    pub user: Option<User>,
    pub search_enabled: bool,
    pub page_title: Option<String>,
    pub show_header: Option<bool>,
    pub show_footer: Option<bool>,
    pub structurizr_configuration: Option<SiteConfiguration>,
}

impl PageModel {
    pub fn nonce(&self) -> &str {
        self.script_nonce.as_deref().unwrap_or_default()
    }

    pub fn time_zone_id(&self) -> &str {
        self.time_zone.as_deref().unwrap_or_default()
    }

    pub fn title(&self) -> &str {
        self.page_title.as_deref().unwrap_or_default()
    }

    pub fn header_visible(&self) -> bool {
        self.show_header.unwrap_or(true)
    }

    pub fn footer_visible(&self) -> bool {
        self.show_footer.unwrap_or(true)
    }

    pub fn username(&self) -> &str {
        self.user
            .as_ref()
            .map(|u| u.username.as_str())
            .unwrap_or_default()
    }

    pub fn web_url(&self) -> &str {
        self.structurizr_configuration
            .as_ref()
            .map(|c| c.web_url.as_str())
            .unwrap_or_default()
    }

    pub fn version_label(&self) -> String {
        self.version
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }
}
