//! Connection parameters

use std::fmt;

use serde::{Deserialize, Serialize};

/// Baud rate used by AeroQuad flight software
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Everything needed to open a link to the flight controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionParams {
    /// Serial port path (e.g. /dev/ttyUSB0, COM3)
    pub port: String,
    /// Baud rate
    #[serde(default = "default_baud")]
    pub baud_rate: u32,
}

fn default_baud() -> u32 {
    DEFAULT_BAUD_RATE
}

impl ConnectionParams {
    /// Create parameters for a port and baud rate
    pub fn new(port: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            port: port.into(),
            baud_rate,
        }
    }
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self {
            port: String::new(),
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }
}

impl fmt::Display for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {} baud", self.port, self.baud_rate)
    }
}
