use crate::config::SearchSettings;

pub trait SearchComponent: Send + Sync {
    fn is_enabled(&self) -> bool;
}

/// Search switched on or off by configuration.
#[derive(Debug, Clone)]
pub struct ConfiguredSearchComponent {
    enabled: bool,
}

impl ConfiguredSearchComponent {
    pub fn new(settings: &SearchSettings) -> Self {
        Self {
            enabled: settings.enabled,
        }
    }
}

impl SearchComponent for ConfiguredSearchComponent {
    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
