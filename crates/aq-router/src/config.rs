//! Router configuration

use std::time::Duration;

use aq_link::ConnectionParams;
use aq_panels::PanelKind;
use serde::{Deserialize, Serialize};

/// Startup behaviour of the router
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Panel shown at startup
    pub startup_panel: PanelKind,
    /// Connection restored by the startup auto-connect
    pub last_connection: Option<ConnectionParams>,
    /// Message shown while the application starts
    pub startup_message: String,
    /// How long the startup message stays visible (seconds)
    pub startup_message_secs: u64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            startup_panel: PanelKind::Connect,
            last_connection: None,
            startup_message: "Ready to connect to the AeroQuad...".to_string(),
            startup_message_secs: 10,
        }
    }
}

impl RouterConfig {
    /// Default configuration that reconnects to `params` at startup
    pub fn with_last_connection(params: ConnectionParams) -> Self {
        Self {
            last_connection: Some(params),
            ..Default::default()
        }
    }

    /// How long the startup message stays visible
    pub fn startup_message_duration(&self) -> Duration {
        Duration::from_secs(self.startup_message_secs)
    }
}
