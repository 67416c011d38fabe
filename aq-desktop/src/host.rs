//! Window host backed by the egui viewport

use std::time::{Duration, Instant};

use aq_panels::PanelKind;
use aq_router::{StatusDuration, StatusSink, WindowHost};
use egui::{Context, ViewportCommand};
use tracing::{debug, warn};

use crate::settings::{Settings, WindowGeometry};

/// Status text with its display deadline
#[derive(Debug, Clone)]
struct StatusMessage {
    text: String,
    expires: Option<Instant>,
}

/// The application window as seen by the router
pub struct DesktopHost {
    ctx: Context,
    settings: Settings,
    status: Option<StatusMessage>,
    content: Option<PanelKind>,
    geometry: Option<WindowGeometry>,
}

impl DesktopHost {
    /// Create a host for the window behind `ctx`
    pub fn new(ctx: Context, settings: Settings) -> Self {
        let geometry = settings.window;
        Self {
            ctx,
            settings,
            status: None,
            content: None,
            geometry,
        }
    }

    /// Status text to show now, if any
    pub fn status_text(&self) -> Option<&str> {
        let status = self.status.as_ref()?;
        match status.expires {
            Some(deadline) if Instant::now() >= deadline => None,
            _ => Some(status.text.as_str()),
        }
    }

    /// Time until the current status expires
    pub fn status_remaining(&self) -> Option<Duration> {
        self.status
            .as_ref()
            .and_then(|s| s.expires)
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Panel currently shown
    pub fn content(&self) -> Option<PanelKind> {
        self.content
    }

    /// Mutable access to the settings saved with the geometry
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Remember the window geometry from the latest frame
    pub fn track_geometry(&mut self) {
        let rects = self
            .ctx
            .input(|i| (i.viewport().outer_rect, i.viewport().inner_rect));
        if let (Some(outer), Some(inner)) = rects {
            let geometry = WindowGeometry {
                x: outer.min.x,
                y: outer.min.y,
                width: inner.width(),
                height: inner.height(),
            };
            if geometry.is_usable() {
                self.geometry = Some(geometry);
            }
        }
    }
}

impl StatusSink for DesktopHost {
    fn show(&mut self, text: &str, duration: StatusDuration) {
        let expires = match duration {
            StatusDuration::Persistent => None,
            StatusDuration::For(d) => Some(Instant::now() + d),
        };
        self.status = Some(StatusMessage {
            text: text.to_string(),
            expires,
        });
        self.ctx.request_repaint();
    }
}

impl WindowHost for DesktopHost {
    fn detach_content(&mut self) {
        self.content = None;
    }

    fn set_content(&mut self, kind: PanelKind) {
        self.content = Some(kind);
        self.ctx
            .send_viewport_cmd(ViewportCommand::Title(format!("AeroQuad Communicator - {}", kind.title())));
    }

    fn restore_geometry(&mut self) {
        let Some(geometry) = self.settings.window.filter(WindowGeometry::is_usable) else {
            debug!("No saved window geometry");
            return;
        };
        self.ctx
            .send_viewport_cmd(ViewportCommand::OuterPosition(egui::pos2(geometry.x, geometry.y)));
        self.ctx
            .send_viewport_cmd(ViewportCommand::InnerSize(egui::vec2(geometry.width, geometry.height)));
    }

    fn save_geometry(&mut self) {
        self.settings.window = self.geometry;
        if let Err(e) = self.settings.save() {
            warn!(source = "Settings", "Failed to save settings: {}", e);
        }
    }
}
