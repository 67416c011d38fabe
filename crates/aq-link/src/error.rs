//! Error types for the serial link

use thiserror::Error;

/// Errors that can occur while opening or driving a link
#[derive(Debug, Error)]
pub enum LinkError {
    /// The port could not be opened
    #[error("failed to open {port}: {reason}")]
    OpenFailed { port: String, reason: String },

    /// Serial port error
    #[error("serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
