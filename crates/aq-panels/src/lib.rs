//! AeroQuad Communicator Panels
//!
//! Each panel is a self-contained unit hosted by the router: it may consume
//! inbound bytes from the flight controller, emit outbound bytes, and emit
//! status text. Panels never touch the channel directly. Everything they want
//! to happen is written into an [`Outbox`] and routed by the host, which keeps
//! a panel unable to reach the wire once it has been unwired.
//!
//! # Variants
//!
//! - **Home**: landing page, no channel interaction
//! - **Connect**: port selection, auto-connect, flight software identification
//! - **Monitor**: raw terminal onto the serial stream
//! - **Plot**: live sensor series
//! - **Config**: read/write of flight configuration values
//! - **Firmware**: firmware image upload
//! - **Route**: waypoint route planning
//!
//! Plot, Config and Route expect the literal [`INITIALIZE`] payload through
//! [`Panel::on_message_in`] right after activation.

pub mod commands;
pub mod config;
pub mod connect;
pub mod firmware;
pub mod home;
pub mod kind;
pub mod line_codec;
pub mod monitor;
pub mod outbox;
pub mod panel;
pub mod plot;
pub mod route;

pub use config::ConfigPanel;
pub use connect::ConnectPanel;
pub use firmware::{FirmwarePanel, UploadState};
pub use home::HomePanel;
pub use kind::{PanelKind, UnknownPanel};
pub use line_codec::LineCodec;
pub use monitor::MonitorPanel;
pub use outbox::{Outbox, PanelEvent};
pub use panel::{AsAny, Panel, PanelContext, INITIALIZE};
pub use plot::PlotPanel;
pub use route::{RoutePanel, Waypoint};
