//! Connect panel
//!
//! Owns the user's choice of port and baud rate and asks the host to open or
//! close the link. Once a link opens it queries the flight software version
//! and reports it.

use aq_link::{ConnectionParams, LinkState};
use tracing::{debug, info};

use crate::commands::QUERY_VERSION;
use crate::kind::PanelKind;
use crate::line_codec::LineCodec;
use crate::outbox::Outbox;
use crate::panel::{Panel, PanelContext};

/// Connection setup panel
#[derive(Debug)]
pub struct ConnectPanel {
    selected: ConnectionParams,
    last_known: Option<ConnectionParams>,
    link: LinkState,
    lines: LineCodec,
    awaiting_version: bool,
    flight_software: Option<String>,
    /// Set between a user disconnect and the resulting close
    disconnect_requested: bool,
}

impl ConnectPanel {
    /// Create the panel, preselecting the last known connection
    pub fn new(context: &PanelContext) -> Self {
        Self {
            selected: context.last_connection.clone().unwrap_or_default(),
            last_known: context.last_connection.clone(),
            link: context.link,
            lines: LineCodec::new(),
            awaiting_version: false,
            flight_software: None,
            disconnect_requested: false,
        }
    }

    /// Currently selected parameters
    pub fn selected(&self) -> &ConnectionParams {
        &self.selected
    }

    /// Change the selected parameters
    pub fn select(&mut self, params: ConnectionParams) {
        self.selected = params;
    }

    /// Link state as last reported by the host
    pub fn link_state(&self) -> LinkState {
        self.link
    }

    /// Flight software version reported by the board, once known
    pub fn flight_software(&self) -> Option<&str> {
        self.flight_software.as_deref()
    }

    /// Ask the host to open the link with the selected parameters
    pub fn connect(&mut self, out: &mut Outbox) {
        if self.selected.port.is_empty() {
            out.status("Select a serial port first");
            return;
        }
        self.disconnect_requested = false;
        out.status(format!("Connecting to {}...", self.selected));
        out.open_link(self.selected.clone());
    }

    /// Ask the host to close the link
    pub fn disconnect(&mut self, out: &mut Outbox) {
        self.disconnect_requested = true;
        out.close_link();
    }
}

impl Panel for ConnectPanel {
    fn kind(&self) -> PanelKind {
        PanelKind::Connect
    }

    fn on_message_in(&mut self, data: &[u8], out: &mut Outbox) {
        self.lines.push_bytes(data);
        while let Some(line) = self.lines.next_line() {
            if self.awaiting_version {
                self.awaiting_version = false;
                info!("Flight software version {}", line);
                out.status(format!("Connected to AeroQuad flight software v{}", line));
                self.flight_software = Some(line);
            } else {
                debug!("Connect panel ignoring line: {}", line);
            }
        }
    }

    fn auto_connect(&mut self, out: &mut Outbox) {
        match self.last_known.clone() {
            Some(params) => {
                self.selected = params.clone();
                out.status(format!("Connecting to {}...", params));
                out.open_link(params);
            }
            None => debug!("No previous connection to restore"),
        }
    }

    fn on_link_state(&mut self, state: LinkState, out: &mut Outbox) {
        self.link = state;
        match state {
            LinkState::Open => {
                self.last_known = Some(self.selected.clone());
                self.awaiting_version = true;
                self.lines.clear();
                out.status(format!("Connected to {}", self.selected));
                out.send(QUERY_VERSION);
            }
            LinkState::Closed => {
                self.awaiting_version = false;
                self.flight_software = None;
                // An unrequested close was already reported with its error text
                if std::mem::take(&mut self.disconnect_requested) {
                    out.status("Disconnected");
                } else {
                    debug!("Link lost without a disconnect request");
                }
            }
        }
    }
}
