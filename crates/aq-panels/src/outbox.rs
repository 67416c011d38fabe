//! Panel notifications
//!
//! A panel reports everything it wants done by pushing [`PanelEvent`]s into
//! the [`Outbox`] it is handed. The host drains the outbox after every call
//! and decides, based on the panel's wiring, what actually reaches the channel
//! or the status bar.

use aq_link::ConnectionParams;

use crate::kind::PanelKind;

/// A notification emitted by a panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    /// Bytes for the flight controller
    MessageOut(Vec<u8>),
    /// Status text for the status bar
    Status(String),
    /// Ask the host to open the channel
    OpenLink(ConnectionParams),
    /// Ask the host to close the channel
    CloseLink,
    /// Ask the host to switch to another panel once the current call returns
    RequestPanel(PanelKind),
}

/// Buffer of notifications emitted during one panel call
#[derive(Debug, Default)]
pub struct Outbox {
    events: Vec<PanelEvent>,
}

impl Outbox {
    /// Create an empty outbox
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit outbound bytes
    pub fn send(&mut self, data: impl Into<Vec<u8>>) {
        self.events.push(PanelEvent::MessageOut(data.into()));
    }

    /// Emit status text
    pub fn status(&mut self, text: impl Into<String>) {
        self.events.push(PanelEvent::Status(text.into()));
    }

    /// Request that the channel be opened
    pub fn open_link(&mut self, params: ConnectionParams) {
        self.events.push(PanelEvent::OpenLink(params));
    }

    /// Request that the channel be closed
    pub fn close_link(&mut self) {
        self.events.push(PanelEvent::CloseLink);
    }

    /// Request a panel switch
    pub fn request_panel(&mut self, kind: PanelKind) {
        self.events.push(PanelEvent::RequestPanel(kind));
    }

    /// Events emitted so far
    pub fn events(&self) -> &[PanelEvent] {
        &self.events
    }

    /// Check if nothing was emitted
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Take all events, leaving the outbox empty
    pub fn take(&mut self) -> Vec<PanelEvent> {
        std::mem::take(&mut self.events)
    }

    /// Outbound payloads emitted so far
    pub fn messages(&self) -> impl Iterator<Item = &[u8]> {
        self.events.iter().filter_map(|e| match e {
            PanelEvent::MessageOut(data) => Some(data.as_slice()),
            _ => None,
        })
    }

    /// Status texts emitted so far
    pub fn statuses(&self) -> impl Iterator<Item = &str> {
        self.events.iter().filter_map(|e| match e {
            PanelEvent::Status(text) => Some(text.as_str()),
            _ => None,
        })
    }
}
