//! AeroQuad Panel Router
//!
//! This crate hosts the communicator's panels over a single serial channel.
//! The [`Router`] owns the channel and exactly one active panel, and is the
//! only place where bytes move between the two.
//!
//! # Panel Switching
//!
//! Every switch writes the [`CONNECTION_STOP`] sentinel to the channel first,
//! then destroys the outgoing panel (which drops its [`Subscription`]s), then
//! builds, wires and initialises the incoming panel. Requests made while a
//! switch is running are queued and applied in order afterwards.
//!
//! # Wiring
//!
//! What a panel may do is decided by its [`PanelTraits`]:
//!
//! - **wired**: receives inbound bytes and may write outbound bytes
//! - **needs_initialize**: receives the `initialize` payload once wired
//! - **forwards_status**: status text reaches the status bar
//! - **controls_link**: may open and close the channel
//!
//! # Example
//!
//! ```rust,no_run
//! use aq_link::create_virtual_link;
//! use aq_panels::PanelKind;
//! use aq_router::{Router, RouterConfig, StatusDuration, StatusSink, WindowHost};
//!
//! struct Headless;
//!
//! impl StatusSink for Headless {
//!     fn show(&mut self, text: &str, _duration: StatusDuration) {
//!         println!("{}", text);
//!     }
//! }
//!
//! impl WindowHost for Headless {
//!     fn detach_content(&mut self) {}
//!     fn set_content(&mut self, _kind: PanelKind) {}
//!     fn restore_geometry(&mut self) {}
//!     fn save_geometry(&mut self) {}
//! }
//!
//! let (channel, _probe) = create_virtual_link();
//! let mut router = Router::new(channel, Headless, RouterConfig::default());
//! router.switch_panel_by_token("Plots");
//! router.process_channel_events();
//! ```

pub mod config;
pub mod host;
pub mod registry;
pub mod router;
pub mod toolbar;
pub mod wiring;

pub use config::RouterConfig;
pub use host::{StatusDuration, StatusSink, WindowHost};
pub use registry::{PanelFactory, PanelRegistry, PanelTraits};
pub use router::Router;
pub use toolbar::{lookup_token, resolve_token, ToolbarAction, TOOLBAR_ACTIONS};
pub use wiring::{Route, Subscription, Wiring, WiringBus};

/// Byte written to the channel before every panel switch so the flight
/// software stops whatever the outgoing panel had it streaming
pub const CONNECTION_STOP: &[u8] = b"X";
