//! Wiring bus
//!
//! A panel is connected to the channel by holding [`Subscription`]s on the
//! router's [`WiringBus`]. Routing consults the bus, not the panel, so the
//! only way to disconnect a panel is to drop its subscriptions, and dropping
//! the panel drops them.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::registry::PanelTraits;

/// A message path between the channel and a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Channel data to the panel
    Inbound,
    /// Panel data to the channel
    Outbound,
    /// Panel status to the status bar
    Status,
}

#[derive(Debug, Default)]
struct BusState {
    next_id: u64,
    live: Vec<(u64, Route)>,
}

/// Registry of live subscriptions
#[derive(Debug, Clone, Default)]
pub struct WiringBus {
    state: Rc<RefCell<BusState>>,
}

impl WiringBus {
    /// Create an empty bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscription for `route`. It stays live until dropped.
    pub fn subscribe(&self, route: Route) -> Subscription {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state.live.push((id, route));
        Subscription {
            id,
            route,
            bus: Rc::downgrade(&self.state),
        }
    }

    /// Number of live subscriptions on `route`
    pub fn subscriber_count(&self, route: Route) -> usize {
        self.state
            .borrow()
            .live
            .iter()
            .filter(|(_, r)| *r == route)
            .count()
    }

    /// Check if nothing is subscribed at all
    pub fn is_idle(&self) -> bool {
        self.state.borrow().live.is_empty()
    }
}

/// Handle to one live route. Dropping it removes the route from the bus.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    route: Route,
    bus: Weak<RefCell<BusState>>,
}

impl Subscription {
    /// The route this subscription carries
    pub fn route(&self) -> Route {
        self.route
    }

    /// Check if the subscription is still registered on its bus
    pub fn is_live(&self) -> bool {
        self.bus
            .upgrade()
            .is_some_and(|bus| bus.borrow().live.iter().any(|(id, _)| *id == self.id))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            bus.borrow_mut().live.retain(|(id, _)| *id != self.id);
        }
    }
}

/// All subscriptions held on behalf of one panel
#[derive(Debug, Default)]
pub struct Wiring {
    subscriptions: Vec<Subscription>,
}

impl Wiring {
    /// Subscribe the routes a panel with `traits` is entitled to
    pub fn connect(bus: &WiringBus, traits: PanelTraits) -> Self {
        let mut subscriptions = Vec::new();
        if traits.wired {
            subscriptions.push(bus.subscribe(Route::Inbound));
            subscriptions.push(bus.subscribe(Route::Outbound));
        }
        if traits.forwards_status {
            subscriptions.push(bus.subscribe(Route::Status));
        }
        debug!("Wired {} routes", subscriptions.len());
        Self { subscriptions }
    }

    /// Check if a live subscription carries `route`
    pub fn carries(&self, route: Route) -> bool {
        self.subscriptions
            .iter()
            .any(|s| s.route() == route && s.is_live())
    }

    /// Check if the panel is connected to the channel
    pub fn is_wired(&self) -> bool {
        self.carries(Route::Inbound)
    }
}
