//! Panel registry
//!
//! Data-driven dispatch from [`PanelKind`] to a constructor plus the
//! [`PanelTraits`] that decide how the router wires the result.

use std::collections::HashMap;

use aq_panels::{
    ConfigPanel, ConnectPanel, FirmwarePanel, HomePanel, MonitorPanel, Panel, PanelContext,
    PanelKind, PlotPanel, RoutePanel,
};
use tracing::warn;

/// How the router treats a panel kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelTraits {
    /// Connected to channel inbound and outbound
    pub wired: bool,
    /// Receives `initialize` once after wiring
    pub needs_initialize: bool,
    /// Status text reaches the status bar
    pub forwards_status: bool,
    /// May open and close the channel, and hears about link changes
    pub controls_link: bool,
}

impl PanelTraits {
    /// No channel interaction at all
    pub const UNWIRED: Self = Self {
        wired: false,
        needs_initialize: false,
        forwards_status: false,
        controls_link: false,
    };

    /// Traits of the built-in panel kinds
    pub const fn builtin(kind: PanelKind) -> Self {
        let (wired, needs_initialize, forwards_status, controls_link) = match kind {
            PanelKind::Home => (false, false, false, false),
            PanelKind::Connect => (true, false, true, true),
            PanelKind::Monitor => (true, false, false, false),
            PanelKind::Plot => (true, true, true, false),
            PanelKind::Config => (true, true, true, false),
            PanelKind::Firmware => (true, false, true, true),
            PanelKind::Route => (true, true, true, false),
        };
        Self {
            wired,
            needs_initialize,
            forwards_status,
            controls_link,
        }
    }
}

/// Constructor for a panel
pub type PanelFactory = Box<dyn Fn(&PanelContext) -> Box<dyn Panel>>;

struct RegistryEntry {
    traits: PanelTraits,
    factory: PanelFactory,
}

/// Maps panel kinds to their constructors
#[derive(Default)]
pub struct PanelRegistry {
    entries: HashMap<PanelKind, RegistryEntry>,
}

impl PanelRegistry {
    /// Registry with nothing registered. Every kind builds Home.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry holding the seven built-in panels
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register_builtin(PanelKind::Home, |_| Box::new(HomePanel));
        registry.register_builtin(PanelKind::Connect, |ctx| Box::new(ConnectPanel::new(ctx)));
        registry.register_builtin(PanelKind::Monitor, |_| Box::new(MonitorPanel::new()));
        registry.register_builtin(PanelKind::Plot, |_| Box::new(PlotPanel::new()));
        registry.register_builtin(PanelKind::Config, |_| Box::new(ConfigPanel::new()));
        registry.register_builtin(PanelKind::Firmware, |ctx| {
            Box::new(FirmwarePanel::new(ctx))
        });
        registry.register_builtin(PanelKind::Route, |_| Box::new(RoutePanel::new()));
        registry
    }

    fn register_builtin<F>(&mut self, kind: PanelKind, factory: F)
    where
        F: Fn(&PanelContext) -> Box<dyn Panel> + 'static,
    {
        self.register(kind, PanelTraits::builtin(kind), factory);
    }

    /// Register or replace the constructor for `kind`
    pub fn register<F>(&mut self, kind: PanelKind, traits: PanelTraits, factory: F)
    where
        F: Fn(&PanelContext) -> Box<dyn Panel> + 'static,
    {
        self.entries.insert(
            kind,
            RegistryEntry {
                traits,
                factory: Box::new(factory),
            },
        );
    }

    /// Check if `kind` has a constructor
    pub fn contains(&self, kind: PanelKind) -> bool {
        self.entries.contains_key(&kind)
    }

    fn resolve(&self, kind: PanelKind) -> (PanelTraits, Option<&PanelFactory>) {
        match self
            .entries
            .get(&kind)
            .or_else(|| self.entries.get(&PanelKind::Home))
        {
            Some(entry) => (entry.traits, Some(&entry.factory)),
            None => (PanelTraits::UNWIRED, None),
        }
    }

    /// Build the panel for `kind`. Kinds without a constructor build Home.
    pub fn build(&self, kind: PanelKind, context: &PanelContext) -> (PanelTraits, Box<dyn Panel>) {
        if !self.contains(kind) {
            warn!("No panel registered for {}, showing Home", kind);
        }
        match self.resolve(kind) {
            (traits, Some(factory)) => (traits, factory(context)),
            (traits, None) => (traits, Box::new(HomePanel)),
        }
    }
}
