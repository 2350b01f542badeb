use crate::errors::{BrewError, ConfigError};

#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("Cannot build panel '{panel}': {source}")]
    InvalidConfig {
        panel: &'static str,
        #[source]
        source: ConfigError,
    },
}

impl PanelError {
    pub(crate) fn invalid_config(panel: &'static str) -> impl FnOnce(ConfigError) -> Self {
        move |source| PanelError::InvalidConfig { panel, source }
    }
}

impl BrewError for PanelError {
    fn error_code(&self) -> &'static str {
        match self {
            PanelError::InvalidConfig { .. } => "PANEL_INVALID_CONFIG",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, PanelError::InvalidConfig { .. })
    }
}
