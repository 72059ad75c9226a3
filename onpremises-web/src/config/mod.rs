use secrecy::Secret;
use serde::Deserialize;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub application: ApplicationSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub features: FeatureSettings,
    #[serde(default)]
    pub workspaces: Vec<WorkspaceSettings>,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Marks the session cookie `Secure`; enable behind HTTPS.
    #[serde(default)]
    pub secure_cookies: bool,
}

#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    /// Externally visible base URL, used to build workspace URLs (no trailing slash).
    pub web_url: String,
    /// IANA zone identifier exposed to templates; falls back to `TZ`, then `UTC`.
    #[serde(default)]
    pub time_zone: Option<String>,
}

impl ApplicationSettings {
    pub fn resolved_time_zone(&self) -> String {
        self.time_zone
            .clone()
            .filter(|tz| !tz.trim().is_empty())
            .or_else(|| std::env::var("TZ").ok().filter(|tz| !tz.trim().is_empty()))
            .unwrap_or_else(|| "UTC".to_string())
    }
}

#[derive(Deserialize, Clone)]
pub struct TelemetrySettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP gRPC endpoint (e.g., http://tempo:4317); spans are not exported when unset.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Clone, Default)]
pub struct SearchSettings {
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Deserialize, Clone)]
pub struct FeatureSettings {
    /// Exposes workspace API credentials to write users (page and JSON endpoint).
    #[serde(default = "default_true")]
    pub workspace_api: bool,
}

impl Default for FeatureSettings {
    fn default() -> Self {
        Self {
            workspace_api: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize, Clone)]
pub struct WorkspaceSettings {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub api_key: String,
    pub api_secret: Secret<String>,
    /// Usernames or roles with read access.
    #[serde(default)]
    pub read_users: Vec<String>,
    /// Usernames or roles with write access.
    #[serde(default)]
    pub write_users: Vec<String>,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub sharing_token: Option<String>,
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path =
        std::env::current_dir().map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;

    // Check if we're already in onpremises-web directory or need to navigate to it
    let configuration_directory = if base_path.ends_with("onpremises-web") {
        base_path.join("config")
    } else {
        base_path.join("onpremises-web").join("config")
    };

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    const SAMPLE: &str = r#"
server:
  host: 127.0.0.1
  port: 8080
application:
  web_url: http://localhost:8080
  time_zone: Europe/London
workspaces:
  - id: 1
    name: Big Bank plc
    api_key: key-1
    api_secret: secret-1
    write_users: [alice]
"#;

    fn parse(yaml: &str) -> Settings {
        config::Config::builder()
            .add_source(config::File::from_str(yaml, config::FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn optional_sections_take_defaults() {
        let settings = parse(SAMPLE);

        assert!(!settings.server.secure_cookies);
        assert_eq!(settings.telemetry.log_level, "info");
        assert!(settings.telemetry.otlp_endpoint.is_none());
        assert!(!settings.search.enabled);
        assert!(settings.features.workspace_api);

        let workspace = &settings.workspaces[0];
        assert_eq!(workspace.api_secret.expose_secret(), "secret-1");
        assert!(workspace.read_users.is_empty());
        assert_eq!(workspace.write_users, vec!["alice".to_string()]);
        assert!(!workspace.public);
        assert!(workspace.sharing_token.is_none());
    }

    #[test]
    fn site_configuration_is_read_from_settings() {
        let mut settings = parse(SAMPLE);
        settings.application.web_url = "https://docs.example.com/".to_string();
        settings.features.workspace_api = false;

        let configuration = crate::models::SiteConfiguration::from(&settings);
        assert_eq!(configuration.web_url, "https://docs.example.com");
        assert!(!configuration.workspace_api);
    }

    #[test]
    fn configured_time_zone_wins() {
        let settings = parse(SAMPLE);
        assert_eq!(settings.application.resolved_time_zone(), "Europe/London");
    }

    #[test]
    fn blank_time_zone_falls_back() {
        let application = ApplicationSettings {
            web_url: "http://localhost".to_string(),
            time_zone: Some("  ".to_string()),
        };
        assert!(!application.resolved_time_zone().trim().is_empty());
    }
}
