//! The router
//!
//! Owns the channel and the active panel, and is the single consumer of
//! channel events and the single producer of status updates. All work runs
//! on the caller's thread; each public entry point runs to completion before
//! any queued panel switch is applied.

use std::collections::VecDeque;

use aq_link::{Channel, ChannelEvent, ConnectionParams, LinkState};
use aq_panels::{Outbox, Panel, PanelContext, PanelEvent, PanelKind, INITIALIZE};
use tracing::{debug, info, warn};

use crate::config::RouterConfig;
use crate::host::{StatusDuration, WindowHost};
use crate::registry::{PanelRegistry, PanelTraits};
use crate::toolbar::resolve_token;
use crate::wiring::{Route, Wiring, WiringBus};
use crate::CONNECTION_STOP;

/// The active panel together with its subscriptions
///
/// Fields drop in declaration order, so the wiring is severed before the
/// panel itself is destroyed.
struct HostedPanel {
    wiring: Wiring,
    traits: PanelTraits,
    panel: Box<dyn Panel>,
}

impl HostedPanel {
    fn kind(&self) -> PanelKind {
        self.panel.kind()
    }
}

/// Panel host and message router
pub struct Router<C: Channel, H: WindowHost> {
    channel: C,
    host: H,
    registry: PanelRegistry,
    bus: WiringBus,
    /// `None` only while a switch is in progress or after shutdown
    active: Option<HostedPanel>,
    pending: VecDeque<PanelKind>,
    switching: bool,
    link: LinkState,
    last_status: Option<String>,
    last_connection: Option<ConnectionParams>,
    shut_down: bool,
}

impl<C: Channel, H: WindowHost> Router<C, H> {
    /// Create a router hosting the built-in panels
    pub fn new(channel: C, host: H, config: RouterConfig) -> Self {
        Self::with_registry(channel, host, config, PanelRegistry::builtin())
    }

    /// Create a router hosting the panels in `registry`
    pub fn with_registry(
        channel: C,
        host: H,
        config: RouterConfig,
        registry: PanelRegistry,
    ) -> Self {
        let link = channel.state();
        let mut router = Self {
            channel,
            host,
            registry,
            bus: WiringBus::new(),
            active: None,
            pending: VecDeque::new(),
            switching: false,
            link,
            last_status: None,
            last_connection: config.last_connection.clone(),
            shut_down: false,
        };

        router.host.show(
            &config.startup_message,
            StatusDuration::For(config.startup_message_duration()),
        );
        router.last_status = Some(config.startup_message.clone());

        router.switching = true;
        router.install(config.startup_panel);
        router.dispatch(|panel, out| panel.auto_connect(out));
        router.switching = false;

        router.host.restore_geometry();
        router.run_pending_switches();
        info!("Router started on {:?}", router.active_kind());
        router
    }

    /// Replace the active panel with one of kind `target`
    ///
    /// Requests made while a switch is already running are queued and applied
    /// in order once it completes.
    pub fn switch_panel(&mut self, target: PanelKind) {
        if self.shut_down {
            debug!("Ignoring switch to {} after shutdown", target);
            return;
        }
        self.pending.push_back(target);
        self.run_pending_switches();
    }

    /// Switch to the panel a toolbar token opens. Unknown tokens open Home.
    pub fn switch_panel_by_token(&mut self, token: &str) {
        let target = resolve_token(token);
        debug!("Toolbar token {:?} opens {}", token, target);
        self.switch_panel(target);
    }

    /// Show status text until replaced
    pub fn forward_status(&mut self, text: &str) {
        info!(source = "Status", "{}", text);
        self.host.show(text, StatusDuration::Persistent);
        self.last_status = Some(text.to_string());
    }

    /// Handle one notification from the channel
    pub fn handle_channel_event(&mut self, event: ChannelEvent) {
        match event {
            ChannelEvent::DataAvailable(data) => {
                if self.active_carries(Route::Inbound) {
                    self.dispatch(|panel, out| panel.on_message_in(&data, out));
                } else {
                    debug!("No panel wired, dropping {} inbound bytes", data.len());
                }
            }
            ChannelEvent::Error(text) => {
                warn!("Channel error: {}", text);
                self.forward_status(&text);
            }
        }
        self.run_pending_switches();
    }

    /// Drain and handle every pending channel event, in order
    ///
    /// Returns the number of events handled. Afterwards the link state is
    /// compared with the channel's, and link-controlling panels are told
    /// about any change.
    pub fn process_channel_events(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.channel.poll_event() {
            self.handle_channel_event(event);
            handled += 1;
        }
        self.reconcile_link_state();
        self.run_pending_switches();
        handled
    }

    /// Run a UI action against the active panel if it is a `P`
    ///
    /// Whatever the panel emits is routed as if the panel had emitted it in
    /// response to channel data. Returns `None` if the active panel is not a `P`.
    pub fn with_panel<P, R>(&mut self, f: impl FnOnce(&mut P, &mut Outbox) -> R) -> Option<R>
    where
        P: Panel + 'static,
    {
        let mut out = Outbox::new();
        let result = {
            let hosted = self.active.as_mut()?;
            let panel: &mut dyn Panel = &mut *hosted.panel;
            let panel = panel.as_any_mut().downcast_mut::<P>()?;
            f(panel, &mut out)
        };
        self.route_outbox(out);
        self.run_pending_switches();
        Some(result)
    }

    /// Borrow the active panel if it is a `P`
    pub fn panel<P: Panel + 'static>(&self) -> Option<&P> {
        let panel: &dyn Panel = &*self.active.as_ref()?.panel;
        panel.as_any().downcast_ref::<P>()
    }

    /// Kind of the active panel
    pub fn active_kind(&self) -> Option<PanelKind> {
        self.active.as_ref().map(HostedPanel::kind)
    }

    /// Title of the active panel
    pub fn active_title(&self) -> Option<&'static str> {
        self.active.as_ref().map(|h| h.panel.title())
    }

    /// Traits the active panel was wired with
    pub fn active_traits(&self) -> Option<PanelTraits> {
        self.active.as_ref().map(|h| h.traits)
    }

    /// Most recent status text shown
    pub fn last_status(&self) -> Option<&str> {
        self.last_status.as_deref()
    }

    /// Number of panels currently connected to the channel
    pub fn wired_panel_count(&self) -> usize {
        self.bus.subscriber_count(Route::Inbound)
    }

    /// The wiring bus, for inspection
    pub fn bus(&self) -> &WiringBus {
        &self.bus
    }

    /// Parameters of the last successful connection
    pub fn last_connection(&self) -> Option<&ConnectionParams> {
        self.last_connection.as_ref()
    }

    /// Link state as last seen by the router
    pub fn link_state(&self) -> LinkState {
        self.link
    }

    /// The owned channel
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// The window host
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the window host
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Check if [`shutdown`](Self::shutdown) has run
    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Save geometry, close the channel and release the active panel
    ///
    /// Runs once; later calls do nothing. Also run on drop.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        self.pending.clear();

        self.host.save_geometry();
        self.channel.close();
        self.link = LinkState::Closed;
        if let Some(hosted) = self.active.take() {
            self.host.detach_content();
            debug!("Released {} panel", hosted.kind());
        }
        info!("Router shut down");
    }

    fn run_pending_switches(&mut self) {
        if self.switching {
            return;
        }
        self.switching = true;
        while let Some(target) = self.pending.pop_front() {
            if self.shut_down {
                self.pending.clear();
                break;
            }
            self.switch_now(target);
        }
        self.switching = false;
    }

    fn switch_now(&mut self, target: PanelKind) {
        let from = self.active_kind();
        self.channel.write(CONNECTION_STOP);

        self.host.detach_content();
        if let Some(outgoing) = self.active.take() {
            debug!("Destroying {} panel", outgoing.kind());
            drop(outgoing);
        }

        self.install(target);
        info!("Switched panel {:?} -> {:?}", from, self.active_kind());
    }

    /// Build, wire and initialise the panel for `target`, then show it
    fn install(&mut self, target: PanelKind) {
        let context = PanelContext {
            link: self.link,
            last_connection: self.last_connection.clone(),
        };
        let (traits, panel) = self.registry.build(target, &context);
        let wiring = Wiring::connect(&self.bus, traits);
        let kind = panel.kind();
        self.active = Some(HostedPanel {
            wiring,
            traits,
            panel,
        });

        if traits.wired && traits.needs_initialize {
            debug!("Initializing {} panel", kind);
            self.dispatch(|panel, out| panel.on_message_in(INITIALIZE, out));
        }

        self.host.set_content(kind);
    }

    /// Call into the active panel and route what it emitted
    fn dispatch(&mut self, f: impl FnOnce(&mut dyn Panel, &mut Outbox)) {
        let mut out = Outbox::new();
        match self.active.as_mut() {
            Some(hosted) => f(&mut *hosted.panel, &mut out),
            None => return,
        }
        self.route_outbox(out);
    }

    fn active_carries(&self, route: Route) -> bool {
        self.active
            .as_ref()
            .is_some_and(|hosted| hosted.wiring.carries(route))
    }

    fn active_controls_link(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|hosted| hosted.traits.controls_link)
    }

    fn route_outbox(&mut self, mut out: Outbox) {
        for event in out.take() {
            match event {
                PanelEvent::MessageOut(data) => {
                    if self.active_carries(Route::Outbound) {
                        self.channel.write(&data);
                    } else {
                        debug!("Panel not wired, dropping {} outbound bytes", data.len());
                    }
                }
                PanelEvent::Status(text) => {
                    if self.active_carries(Route::Status) {
                        self.forward_status(&text);
                    } else {
                        debug!("Panel status not forwarded: {}", text);
                    }
                }
                PanelEvent::OpenLink(params) => {
                    if self.active_controls_link() {
                        self.open_link(params);
                    } else {
                        warn!("Panel may not open the link, ignoring request for {}", params);
                    }
                }
                PanelEvent::CloseLink => {
                    if self.active_controls_link() {
                        self.close_link();
                    } else {
                        warn!("Panel may not close the link, ignoring request");
                    }
                }
                PanelEvent::RequestPanel(kind) => {
                    debug!("Panel requested switch to {}", kind);
                    self.pending.push_back(kind);
                }
            }
        }
    }

    fn open_link(&mut self, params: ConnectionParams) {
        match self.channel.open(&params) {
            Ok(()) => {
                info!("Link open on {}", params);
                self.last_connection = Some(params);
                self.set_link_state(LinkState::Open);
            }
            Err(e) => {
                warn!("Failed to open link: {}", e);
                self.forward_status(&e.to_string());
                self.set_link_state(self.channel.state());
            }
        }
    }

    fn close_link(&mut self) {
        self.channel.close();
        info!("Link closed");
        self.set_link_state(LinkState::Closed);
    }

    fn reconcile_link_state(&mut self) {
        let state = self.channel.state();
        if state != self.link {
            debug!("Channel reports link {:?}", state);
            self.set_link_state(state);
        }
    }

    /// Record a link state and tell a link-controlling panel about it
    ///
    /// An open is always reported, since reopening starts a new session.
    fn set_link_state(&mut self, state: LinkState) {
        let changed = state != self.link;
        self.link = state;
        if (changed || state.is_open()) && self.active_controls_link() {
            self.dispatch(|panel, out| panel.on_link_state(state, out));
        }
    }
}

impl<C: Channel, H: WindowHost> Drop for Router<C, H> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
