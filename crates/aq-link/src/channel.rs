//! The channel contract
//!
//! The router talks to the flight controller exclusively through [`Channel`].
//! Both the serial transport and the virtual link implement it.

use crate::error::LinkError;
use crate::params::ConnectionParams;

/// Whether the transport currently has an open session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkState {
    /// No session; writes are dropped
    #[default]
    Closed,
    /// Session open; writes go to the wire
    Open,
}

impl LinkState {
    /// Check if the link is open
    pub fn is_open(&self) -> bool {
        *self == LinkState::Open
    }
}

/// Notification raised by a channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    /// Bytes arrived from the flight controller
    DataAvailable(Vec<u8>),
    /// An operational transport error (e.g. device unplugged)
    Error(String),
}

/// Duplex byte-stream transport with an open/close lifecycle
///
/// Notifications are queued by the implementation and drained with
/// [`poll_event`](Channel::poll_event); nothing is delivered re-entrantly.
pub trait Channel {
    /// Open a session, closing any session that is already open
    fn open(&mut self, params: &ConnectionParams) -> Result<(), LinkError>;

    /// Close the session without draining pending writes
    fn close(&mut self);

    /// Queue bytes for the wire. Fire-and-forget: there is no acknowledgment
    /// and bytes written while closed are dropped.
    fn write(&mut self, data: &[u8]);

    /// Current session state as reported by the transport
    fn state(&self) -> LinkState;

    /// Text of the most recent operational error, if any
    fn last_error(&self) -> Option<&str>;

    /// Take the next pending notification, if any
    fn poll_event(&mut self) -> Option<ChannelEvent>;
}
