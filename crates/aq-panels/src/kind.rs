//! Panel variant tags

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the fixed panel kinds the router can host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PanelKind {
    /// Landing page
    #[default]
    Home,
    /// Connection setup
    Connect,
    /// Serial terminal
    Monitor,
    /// Live sensor plots
    Plot,
    /// Flight configuration
    Config,
    /// Firmware upload
    Firmware,
    /// Route planning
    Route,
}

/// A variant name that does not match any [`PanelKind`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown panel: {0}")]
pub struct UnknownPanel(pub String);

impl PanelKind {
    /// All variants in toolbar order
    pub const ALL: [PanelKind; 7] = [
        PanelKind::Home,
        PanelKind::Connect,
        PanelKind::Monitor,
        PanelKind::Plot,
        PanelKind::Config,
        PanelKind::Firmware,
        PanelKind::Route,
    ];

    /// Variant name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Connect => "Connect",
            Self::Monitor => "Monitor",
            Self::Plot => "Plot",
            Self::Config => "Config",
            Self::Firmware => "Firmware",
            Self::Route => "Route",
        }
    }

    /// Human-readable title shown above the panel
    pub fn title(&self) -> &'static str {
        match self {
            Self::Home => "AeroQuad Communicator",
            Self::Connect => "Connect to AeroQuad",
            Self::Monitor => "Serial Monitor",
            Self::Plot => "Sensor Plots",
            Self::Config => "Flight Configuration",
            Self::Firmware => "Firmware Upload",
            Self::Route => "Route Planner",
        }
    }
}

impl fmt::Display for PanelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PanelKind {
    type Err = UnknownPanel;

    /// Exact, case-sensitive match on the variant name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownPanel(s.to_string()))
    }
}
