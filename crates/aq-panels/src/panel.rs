//! The panel contract

use std::any::Any;

use aq_link::{ConnectionParams, LinkState};

use crate::kind::PanelKind;
use crate::outbox::Outbox;

/// Control payload delivered through [`Panel::on_message_in`] right after a
/// panel that needs priming has been wired
pub const INITIALIZE: &[u8] = b"initialize";

/// What a panel gets to see when it is constructed
#[derive(Debug, Clone, Default)]
pub struct PanelContext {
    /// Link state at the moment of construction
    pub link: LinkState,
    /// Parameters of the last successful connection, if any
    pub last_connection: Option<ConnectionParams>,
}

/// Upcasting helper so hosts can reach a panel's concrete type
pub trait AsAny {
    /// Borrow as `Any`
    fn as_any(&self) -> &dyn Any;
    /// Mutably borrow as `Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A hosted functional unit
///
/// Every hook is optional. Notifications go into `out`; the host routes them
/// according to how the panel is wired.
pub trait Panel: AsAny {
    /// Variant tag
    fn kind(&self) -> PanelKind;

    /// Title shown above the panel
    fn title(&self) -> &'static str {
        self.kind().title()
    }

    /// Inbound bytes, or the [`INITIALIZE`] control payload
    fn on_message_in(&mut self, _data: &[u8], _out: &mut Outbox) {}

    /// Invoked once at startup to reconnect with previously known parameters
    fn auto_connect(&mut self, _out: &mut Outbox) {}

    /// The link opened or closed. Only delivered to panels that control the link.
    fn on_link_state(&mut self, _state: LinkState, _out: &mut Outbox) {}
}
