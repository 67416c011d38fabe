//! Serial port enumeration
//!
//! Lists the ports the Connect panel offers to the user.

use serialport::{available_ports, SerialPortType};
use tracing::debug;

use crate::error::LinkError;

/// Port names containing any of these are never a flight controller
const SKIP_PATTERNS: &[&str] = &["Bluetooth", "debug"];

/// Information about a serial port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortInfo {
    /// Port name (e.g., /dev/ttyUSB0, COM3)
    pub port: String,
    /// USB product string
    pub product: Option<String>,
    /// USB manufacturer string
    pub manufacturer: Option<String>,
}

impl PortInfo {
    fn from_serialport(name: String, port_type: &SerialPortType) -> Self {
        match port_type {
            SerialPortType::UsbPort(usb) => Self {
                port: name,
                product: usb.product.clone(),
                manufacturer: usb.manufacturer.clone(),
            },
            _ => Self {
                port: name,
                product: None,
                manufacturer: None,
            },
        }
    }

    /// Label for pickers: the port name plus the USB product, if known
    pub fn label(&self) -> String {
        match &self.product {
            Some(product) => format!("{} ({})", self.port, product),
            None => self.port.clone(),
        }
    }
}

fn should_skip(name: &str) -> bool {
    SKIP_PATTERNS.iter().any(|pattern| name.contains(pattern))
}

/// Enumerate serial ports that could host a flight controller
pub fn enumerate_ports() -> Result<Vec<PortInfo>, LinkError> {
    let ports = available_ports()?;

    let mut result: Vec<PortInfo> = ports
        .into_iter()
        .filter(|p| !should_skip(&p.port_name))
        .map(|p| PortInfo::from_serialport(p.port_name, &p.port_type))
        .collect();
    result.sort_by(|a, b| a.port.cmp(&b.port));

    debug!("Found {} serial ports", result.len());
    Ok(result)
}
