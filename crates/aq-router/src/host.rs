//! Window host contract
//!
//! The router never draws anything. Status text, window content and window
//! geometry are delegated to a [`WindowHost`] supplied by the application.

use std::time::Duration;

use aq_panels::PanelKind;

/// How long a status message stays visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusDuration {
    /// Until replaced
    Persistent,
    /// For a fixed time
    For(Duration),
}

/// Single-line status display
pub trait StatusSink {
    /// Show `text`, replacing whatever was shown before
    fn show(&mut self, text: &str, duration: StatusDuration);
}

/// The window hosting the router's active panel
pub trait WindowHost: StatusSink {
    /// Remove the current panel from the window
    fn detach_content(&mut self);

    /// Show the panel of the given kind as the window content
    fn set_content(&mut self, kind: PanelKind);

    /// Restore the persisted window size and position
    fn restore_geometry(&mut self);

    /// Persist the current window size and position
    fn save_geometry(&mut self);
}
