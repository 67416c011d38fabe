//! AeroQuad serial link
//!
//! This crate provides the transport side of the communicator: the
//! [`Channel`] contract the router depends on, a serial implementation built on
//! tokio-serial, serial port enumeration, and an in-memory virtual link for
//! simulation and tests.
//!
//! # Event Model
//!
//! A channel never calls back into its owner. Inbound data and operational
//! errors are queued as [`ChannelEvent`]s and drained by the owner with
//! [`Channel::poll_event`], so every notification is handled on the owner's
//! thread, in order, one at a time.
//!
//! # Example
//!
//! ```rust,no_run
//! use aq_link::{Channel, ConnectionParams, SerialChannel};
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! let mut channel = SerialChannel::new(runtime.handle().clone());
//! channel.open(&ConnectionParams::new("/dev/ttyUSB0", 115_200)).unwrap();
//! channel.write(b"!");
//!
//! while let Some(event) = channel.poll_event() {
//!     println!("{:?}", event);
//! }
//! ```

pub mod channel;
pub mod error;
pub mod params;
pub mod ports;
pub mod serial;
pub mod virtual_link;

pub use channel::{Channel, ChannelEvent, LinkState};
pub use error::LinkError;
pub use params::{ConnectionParams, DEFAULT_BAUD_RATE};
pub use ports::{enumerate_ports, PortInfo};
pub use serial::{run_link_io, SerialChannel};
pub use virtual_link::{create_virtual_link, VirtualChannel, VirtualLinkProbe};
