//! Integration tests for the panel router
//!
//! These tests verify end-to-end behavior of the router including:
//! - The connection-stop sentinel written before every switch
//! - Wiring and unwiring of panels, never more than one wired
//! - The initialize handshake for Plot, Config and Route
//! - Toolbar token resolution and the Home fallback
//! - Channel errors, link control and shutdown

use aq_link::{create_virtual_link, ConnectionParams, LinkState, VirtualChannel, VirtualLinkProbe};
use aq_panels::{PanelKind, INITIALIZE};
use aq_router::{PanelRegistry, PanelTraits, Router, RouterConfig, CONNECTION_STOP};

// ============================================================================
// Helper Functions
// ============================================================================

mod helpers {
    use std::cell::RefCell;
    use std::rc::Rc;

    use aq_link::{ConnectionParams, VirtualLinkProbe};
    use aq_panels::{Outbox, Panel, PanelKind, INITIALIZE};
    use aq_router::{PanelRegistry, PanelTraits, StatusDuration, StatusSink, WindowHost};

    /// Something the window host was asked to do
    #[derive(Debug, Clone, PartialEq)]
    pub enum HostEvent {
        Status(String, StatusDuration),
        Detach,
        SetContent(PanelKind),
        RestoreGeometry,
        SaveGeometry,
    }

    /// Window host that records every call
    #[derive(Clone, Default)]
    pub struct RecordingHost {
        events: Rc<RefCell<Vec<HostEvent>>>,
    }

    impl RecordingHost {
        pub fn events(&self) -> Vec<HostEvent> {
            self.events.borrow().clone()
        }

        pub fn statuses(&self) -> Vec<String> {
            self.events
                .borrow()
                .iter()
                .filter_map(|e| match e {
                    HostEvent::Status(text, _) => Some(text.clone()),
                    _ => None,
                })
                .collect()
        }

        pub fn count(&self, event: &HostEvent) -> usize {
            self.events.borrow().iter().filter(|e| *e == event).count()
        }
    }

    impl StatusSink for RecordingHost {
        fn show(&mut self, text: &str, duration: StatusDuration) {
            self.events
                .borrow_mut()
                .push(HostEvent::Status(text.to_string(), duration));
        }
    }

    impl WindowHost for RecordingHost {
        fn detach_content(&mut self) {
            self.events.borrow_mut().push(HostEvent::Detach);
        }

        fn set_content(&mut self, kind: PanelKind) {
            self.events.borrow_mut().push(HostEvent::SetContent(kind));
        }

        fn restore_geometry(&mut self) {
            self.events.borrow_mut().push(HostEvent::RestoreGeometry);
        }

        fn save_geometry(&mut self) {
            self.events.borrow_mut().push(HostEvent::SaveGeometry);
        }
    }

    /// Lifecycle record of a probe panel. `writes` is the number of channel
    /// writes recorded at that moment.
    #[derive(Debug, Clone, PartialEq)]
    pub enum Entry {
        Created { kind: PanelKind, writes: usize },
        Received { kind: PanelKind, data: Vec<u8>, writes: usize },
        Dropped { kind: PanelKind, writes: usize },
    }

    pub type Journal = Rc<RefCell<Vec<Entry>>>;

    /// Panel that journals its lifecycle and reacts to a few scripted payloads:
    ///
    /// - `switch:<token>` requests Home, then sends `after`
    /// - `status:<text>` emits status text
    /// - `open` asks for the link to be opened
    /// - `initialize` is acknowledged with `ack` and status `ready`
    pub struct ProbePanel {
        kind: PanelKind,
        journal: Journal,
        link: VirtualLinkProbe,
    }

    impl Panel for ProbePanel {
        fn kind(&self) -> PanelKind {
            self.kind
        }

        fn on_message_in(&mut self, data: &[u8], out: &mut Outbox) {
            self.journal.borrow_mut().push(Entry::Received {
                kind: self.kind,
                data: data.to_vec(),
                writes: self.link.write_count(),
            });

            if data == INITIALIZE {
                out.send("ack");
                out.status("ready");
            } else if data.starts_with(b"switch") {
                out.request_panel(PanelKind::Home);
                out.send("after");
            } else if let Some(text) = data.strip_prefix(b"status:") {
                out.status(String::from_utf8_lossy(text).into_owned());
            } else if data == b"open" {
                out.open_link(ConnectionParams::new("COM7", 115_200));
            }
        }
    }

    impl Drop for ProbePanel {
        fn drop(&mut self) {
            self.journal.borrow_mut().push(Entry::Dropped {
                kind: self.kind,
                writes: self.link.write_count(),
            });
        }
    }

    /// Registry where every kind is a probe panel with the built-in traits
    pub fn probe_registry(journal: &Journal, link: &VirtualLinkProbe) -> PanelRegistry {
        let mut registry = PanelRegistry::empty();
        for kind in PanelKind::ALL {
            let journal = Rc::clone(journal);
            let link = link.clone();
            registry.register(kind, PanelTraits::builtin(kind), move |_| {
                journal.borrow_mut().push(Entry::Created {
                    kind,
                    writes: link.write_count(),
                });
                Box::new(ProbePanel {
                    kind,
                    journal: Rc::clone(&journal),
                    link: link.clone(),
                })
            });
        }
        registry
    }

    pub fn sentinel_count(writes: &[Vec<u8>]) -> usize {
        writes.iter().filter(|w| w.as_slice() == b"X").count()
    }

    /// Messages received by panels of `kind`
    pub fn received_by(journal: &Journal, kind: PanelKind) -> Vec<Vec<u8>> {
        journal
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Entry::Received { kind: k, data, .. } if *k == kind => Some(data.clone()),
                _ => None,
            })
            .collect()
    }
}

use helpers::{Entry, HostEvent, Journal, RecordingHost};

type ProbeRouter = Router<VirtualChannel, RecordingHost>;

/// Router over probe panels, starting on `startup`
fn probe_router(startup: PanelKind) -> (ProbeRouter, VirtualLinkProbe, RecordingHost, Journal) {
    let (channel, link) = create_virtual_link();
    let host = RecordingHost::default();
    let journal = Journal::default();
    let config = RouterConfig {
        startup_panel: startup,
        ..Default::default()
    };
    let router = Router::with_registry(
        channel,
        host.clone(),
        config,
        helpers::probe_registry(&journal, &link),
    );
    (router, link, host, journal)
}

/// Router over the built-in panels
fn builtin_router(config: RouterConfig) -> (Router<VirtualChannel, RecordingHost>, VirtualLinkProbe, RecordingHost) {
    let (channel, link) = create_virtual_link();
    let host = RecordingHost::default();
    let router = Router::new(channel, host.clone(), config);
    (router, link, host)
}

// ============================================================================
// Sentinel Tests
// ============================================================================

mod sentinel_tests {
    use super::*;

    #[test]
    fn sentinel_is_the_single_stop_byte() {
        assert_eq!(CONNECTION_STOP, b"X");
    }

    #[test]
    fn one_sentinel_per_switch() {
        let (mut router, link, _host, _journal) = probe_router(PanelKind::Connect);
        assert!(link.writes().is_empty());

        router.switch_panel(PanelKind::Monitor);
        router.switch_panel(PanelKind::Home);
        router.switch_panel(PanelKind::Firmware);

        assert_eq!(helpers::sentinel_count(&link.writes()), 3);
    }

    #[test]
    fn sentinel_precedes_destruction() {
        let (mut router, _link, _host, journal) = probe_router(PanelKind::Connect);

        router.switch_panel(PanelKind::Monitor);
        router.switch_panel(PanelKind::Firmware);

        let drops: Vec<usize> = journal
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Entry::Dropped { writes, .. } => Some(*writes),
                _ => None,
            })
            .collect();
        // The n-th destroyed panel saw exactly n sentinels written
        assert_eq!(drops, vec![1, 2]);
    }

    #[test]
    fn sentinel_written_even_when_closed() {
        let (mut router, link, _host, _journal) = probe_router(PanelKind::Home);
        assert!(!link.is_open());

        router.switch_panel(PanelKind::Home);

        assert_eq!(link.writes(), vec![b"X".to_vec()]);
    }

    #[test]
    fn switch_to_same_kind_still_rebuilds() {
        let (mut router, link, _host, journal) = probe_router(PanelKind::Monitor);

        router.switch_panel(PanelKind::Monitor);

        assert_eq!(link.write_count(), 1);
        let created = journal
            .borrow()
            .iter()
            .filter(|e| matches!(e, Entry::Created { .. }))
            .count();
        assert_eq!(created, 2);
    }
}

// ============================================================================
// Wiring Tests
// ============================================================================

mod wiring_tests {
    use super::*;

    #[test]
    fn outgoing_panel_destroyed_before_incoming_created() {
        let (mut router, _link, _host, journal) = probe_router(PanelKind::Connect);

        router.switch_panel(PanelKind::Monitor);

        let lifecycle: Vec<Entry> = journal
            .borrow()
            .iter()
            .filter(|e| !matches!(e, Entry::Received { .. }))
            .cloned()
            .collect();
        assert_eq!(
            lifecycle,
            vec![
                Entry::Created {
                    kind: PanelKind::Connect,
                    writes: 0
                },
                Entry::Dropped {
                    kind: PanelKind::Connect,
                    writes: 1
                },
                Entry::Created {
                    kind: PanelKind::Monitor,
                    writes: 1
                },
            ]
        );
    }

    #[test]
    fn at_most_one_panel_wired() {
        let (mut router, _link, _host, _journal) = probe_router(PanelKind::Connect);
        assert_eq!(router.wired_panel_count(), 1);

        for kind in PanelKind::ALL {
            router.switch_panel(kind);
            let expected = usize::from(kind != PanelKind::Home);
            assert_eq!(router.wired_panel_count(), expected, "after switching to {}", kind);
        }
    }

    #[test]
    fn home_unwires_the_channel() {
        let (mut router, link, _host, journal) = probe_router(PanelKind::Monitor);

        router.switch_panel_by_token("Home");
        assert!(router.bus().is_idle());

        link.inject_data(b"stray bytes");
        router.process_channel_events();

        assert!(helpers::received_by(&journal, PanelKind::Home).is_empty());
        assert!(helpers::received_by(&journal, PanelKind::Monitor).is_empty());
    }

    #[test]
    fn only_active_panel_receives_data() {
        let (mut router, link, _host, journal) = probe_router(PanelKind::Connect);
        router.switch_panel(PanelKind::Monitor);

        link.inject_data(b"telemetry");
        router.process_channel_events();

        assert!(helpers::received_by(&journal, PanelKind::Connect).is_empty());
        assert_eq!(
            helpers::received_by(&journal, PanelKind::Monitor),
            vec![b"telemetry".to_vec()]
        );
    }

    #[test]
    fn host_content_follows_switches() {
        let (mut router, _link, host, _journal) = probe_router(PanelKind::Connect);

        router.switch_panel(PanelKind::Route);

        let content: Vec<HostEvent> = host
            .events()
            .into_iter()
            .filter(|e| matches!(e, HostEvent::Detach | HostEvent::SetContent(_)))
            .collect();
        assert_eq!(
            content,
            vec![
                HostEvent::SetContent(PanelKind::Connect),
                HostEvent::Detach,
                HostEvent::SetContent(PanelKind::Route),
            ]
        );
    }

    #[test]
    fn status_only_from_status_panels() {
        let (mut router, link, host, _journal) = probe_router(PanelKind::Monitor);

        link.inject_data(b"status:from monitor");
        router.process_channel_events();
        assert!(!host.statuses().contains(&"from monitor".to_string()));

        router.switch_panel(PanelKind::Firmware);
        link.inject_data(b"status:from firmware");
        router.process_channel_events();
        assert_eq!(router.last_status(), Some("from firmware"));
    }
}

// ============================================================================
// Initialize Tests
// ============================================================================

mod initialize_tests {
    use super::*;

    #[test]
    fn initialized_kinds_receive_exactly_one() {
        for kind in [PanelKind::Plot, PanelKind::Config, PanelKind::Route] {
            let (mut router, _link, _host, journal) = probe_router(PanelKind::Home);

            router.switch_panel(kind);

            assert_eq!(
                helpers::received_by(&journal, kind),
                vec![INITIALIZE.to_vec()],
                "{} should be initialized once",
                kind
            );
        }
    }

    #[test]
    fn other_kinds_receive_no_initialize() {
        for kind in [
            PanelKind::Home,
            PanelKind::Connect,
            PanelKind::Monitor,
            PanelKind::Firmware,
        ] {
            let (mut router, _link, _host, journal) = probe_router(PanelKind::Home);

            router.switch_panel(kind);

            assert!(helpers::received_by(&journal, kind).is_empty(), "{}", kind);
        }
    }

    #[test]
    fn initialize_goes_to_new_panel_only() {
        let (mut router, _link, _host, journal) = probe_router(PanelKind::Config);
        journal.borrow_mut().clear();

        router.switch_panel(PanelKind::Plot);

        assert!(helpers::received_by(&journal, PanelKind::Config).is_empty());
        assert_eq!(helpers::received_by(&journal, PanelKind::Plot).len(), 1);
    }

    #[test]
    fn initialize_arrives_after_wiring() {
        let (mut router, link, _host, _journal) = probe_router(PanelKind::Home);

        router.switch_panel(PanelKind::Route);

        // The acknowledgement only reaches the wire if outbound is wired, and
        // the status only reaches the host if status is wired
        assert_eq!(link.writes(), vec![b"X".to_vec(), b"ack".to_vec()]);
        assert_eq!(router.last_status(), Some("ready"));
    }

    #[test]
    fn startup_panel_is_initialized() {
        let (router, link, _host, journal) = probe_router(PanelKind::Plot);

        assert_eq!(
            helpers::received_by(&journal, PanelKind::Plot),
            vec![INITIALIZE.to_vec()]
        );
        assert_eq!(link.writes(), vec![b"ack".to_vec()]);
        assert_eq!(router.active_kind(), Some(PanelKind::Plot));
    }
}

// ============================================================================
// Toolbar Token Tests
// ============================================================================

mod token_tests {
    use super::*;

    #[test]
    fn unknown_token_activates_home() {
        let (mut router, link, _host, _journal) = probe_router(PanelKind::Connect);

        router.switch_panel_by_token("Bogus");

        assert_eq!(router.active_kind(), Some(PanelKind::Home));
        assert_eq!(router.wired_panel_count(), 0);
        assert_eq!(link.writes(), vec![b"X".to_vec()]);
    }

    #[test]
    fn tokens_without_panel_activate_home() {
        for token in ["Status", "Calibrate"] {
            let (mut router, _link, _host, _journal) = probe_router(PanelKind::Monitor);

            router.switch_panel_by_token(token);

            assert_eq!(router.active_kind(), Some(PanelKind::Home), "{}", token);
        }
    }

    #[test]
    fn toolbar_names_map_to_kinds() {
        let (mut router, _link, _host, _journal) = probe_router(PanelKind::Home);

        let cases = [
            ("Setup", PanelKind::Config),
            ("Terminal", PanelKind::Monitor),
            ("Plots", PanelKind::Plot),
            ("Route", PanelKind::Route),
            ("Firmware", PanelKind::Firmware),
            ("Connect", PanelKind::Connect),
        ];
        for (token, kind) in cases {
            router.switch_panel_by_token(token);
            assert_eq!(router.active_kind(), Some(kind), "{}", token);
        }
    }
}

// ============================================================================
// Channel Error Tests
// ============================================================================

mod channel_error_tests {
    use super::*;

    #[test]
    fn error_text_shown_verbatim() {
        let (mut router, link, host, journal) = probe_router(PanelKind::Monitor);
        let lifecycle_before = journal.borrow().len();

        link.inject_error("Device unplugged: /dev/ttyUSB0 (errno 5)");
        assert_eq!(router.process_channel_events(), 1);

        assert_eq!(
            router.last_status(),
            Some("Device unplugged: /dev/ttyUSB0 (errno 5)")
        );
        assert!(host
            .events()
            .contains(&HostEvent::Status(
                "Device unplugged: /dev/ttyUSB0 (errno 5)".to_string(),
                aq_router::StatusDuration::Persistent
            )));
        assert_eq!(router.active_kind(), Some(PanelKind::Monitor));
        assert_eq!(journal.borrow().len(), lifecycle_before);
        assert_eq!(link.write_count(), 0);
    }

    #[test]
    fn error_on_home_is_still_shown() {
        let (mut router, link, _host, _journal) = probe_router(PanelKind::Home);

        link.inject_error("framing error");
        router.process_channel_events();

        assert_eq!(router.last_status(), Some("framing error"));
    }

    #[test]
    fn events_handled_in_order() {
        let (mut router, link, _host, journal) = probe_router(PanelKind::Monitor);

        link.inject_data(b"one");
        link.inject_error("glitch");
        link.inject_data(b"two");
        assert_eq!(router.process_channel_events(), 3);

        assert_eq!(
            helpers::received_by(&journal, PanelKind::Monitor),
            vec![b"one".to_vec(), b"two".to_vec()]
        );
        assert_eq!(router.last_status(), Some("glitch"));
    }
}

// ============================================================================
// Re-entrant Switch Tests
// ============================================================================

mod reentrant_tests {
    use super::*;

    #[test]
    fn switch_requested_by_panel_runs_after_handler() {
        let (mut router, link, _host, journal) = probe_router(PanelKind::Monitor);

        link.inject_data(b"switch");
        router.process_channel_events();

        // "after" was emitted by the handler after the request, while the
        // panel was still wired
        assert_eq!(link.writes(), vec![b"after".to_vec(), b"X".to_vec()]);
        assert_eq!(router.active_kind(), Some(PanelKind::Home));
        assert!(matches!(
            journal.borrow().last(),
            Some(Entry::Created {
                kind: PanelKind::Home,
                ..
            })
        ));
    }

    #[test]
    fn switch_requested_during_initialize_is_queued() {
        let (channel, link) = create_virtual_link();
        let mut registry = PanelRegistry::builtin();
        registry.register(PanelKind::Plot, PanelTraits::builtin(PanelKind::Plot), |_| {
            Box::new(RedirectPanel)
        });
        let config = RouterConfig {
            startup_panel: PanelKind::Home,
            ..Default::default()
        };
        let mut router = Router::with_registry(channel, RecordingHost::default(), config, registry);

        router.switch_panel(PanelKind::Plot);

        assert_eq!(router.active_kind(), Some(PanelKind::Monitor));
        assert_eq!(link.writes(), vec![b"X".to_vec(), b"X".to_vec()]);
        assert_eq!(router.wired_panel_count(), 1);
    }

    struct RedirectPanel;

    impl aq_panels::Panel for RedirectPanel {
        fn kind(&self) -> PanelKind {
            PanelKind::Plot
        }

        fn on_message_in(&mut self, data: &[u8], out: &mut aq_panels::Outbox) {
            if data == INITIALIZE {
                out.request_panel(PanelKind::Monitor);
            }
        }
    }
}

// ============================================================================
// Link Control Tests
// ============================================================================

mod link_tests {
    use super::*;

    #[test]
    fn only_link_panels_open_the_channel() {
        let (mut router, link, _host, _journal) = probe_router(PanelKind::Monitor);

        link.inject_data(b"open");
        router.process_channel_events();
        assert!(link.opens().is_empty());

        router.switch_panel(PanelKind::Connect);
        link.inject_data(b"open");
        router.process_channel_events();

        assert_eq!(link.opens(), vec![ConnectionParams::new("COM7", 115_200)]);
        assert_eq!(router.link_state(), LinkState::Open);
        assert_eq!(
            router.last_connection(),
            Some(&ConnectionParams::new("COM7", 115_200))
        );
    }

    #[test]
    fn connect_panel_survives_link_loss() {
        let params = ConnectionParams::new("/dev/ttyUSB0", 115_200);
        let (mut router, link, host) = builtin_router(RouterConfig::with_last_connection(params));
        assert!(link.is_open());

        link.unplug("Connection closed by device");
        router.process_channel_events();

        // The error text stays on screen after the link-state change
        let statuses = host.statuses();
        assert_eq!(
            statuses.last().map(String::as_str),
            Some("Connection closed by device")
        );
        assert!(!statuses.contains(&"Disconnected".to_string()));
        assert_eq!(router.last_status(), Some("Connection closed by device"));
        assert_eq!(router.active_kind(), Some(PanelKind::Connect));
        // No reconnection attempt from the router
        assert_eq!(link.opens().len(), 1);
    }
}

// ============================================================================
// Lifecycle Tests
// ============================================================================

mod lifecycle_tests {
    use super::*;

    #[test]
    fn construction_order() {
        let params = ConnectionParams::new("COM3", 115_200);
        let (router, link, host) = builtin_router(RouterConfig::with_last_connection(params));

        let events = host.events();
        assert!(matches!(
            &events[0],
            HostEvent::Status(text, aq_router::StatusDuration::For(d))
                if text == "Ready to connect to the AeroQuad..." && d.as_secs() == 10
        ));
        assert_eq!(events[1], HostEvent::SetContent(PanelKind::Connect));
        assert_eq!(events.last(), Some(&HostEvent::RestoreGeometry));
        assert_eq!(router.active_kind(), Some(PanelKind::Connect));
        assert!(link.is_open());
    }

    #[test]
    fn shutdown_closes_channel_once() {
        let (mut router, link, host) = builtin_router(RouterConfig::default());

        router.shutdown();
        router.shutdown();
        assert!(router.is_shut_down());
        assert_eq!(router.active_kind(), None);
        drop(router);

        assert_eq!(link.close_count(), 1);
        assert_eq!(host.count(&HostEvent::SaveGeometry), 1);
    }

    #[test]
    fn drop_runs_shutdown() {
        let (router, link, host, journal) = probe_router(PanelKind::Monitor);

        drop(router);

        assert_eq!(link.close_count(), 1);
        assert_eq!(host.count(&HostEvent::SaveGeometry), 1);
        assert!(matches!(
            journal.borrow().last(),
            Some(Entry::Dropped {
                kind: PanelKind::Monitor,
                ..
            })
        ));
    }
}

// ============================================================================
// Scenario Tests
// ============================================================================

mod scenario_tests {
    use super::*;

    #[test]
    fn home_connect_terminal_plots() {
        let config = RouterConfig {
            startup_panel: PanelKind::Home,
            ..Default::default()
        };
        let (mut router, link, _host) = builtin_router(config);
        assert_eq!(router.wired_panel_count(), 0);

        router.switch_panel_by_token("Connect");
        router.switch_panel_by_token("Terminal");
        router.switch_panel_by_token("Plots");

        // Three sentinels, then the stream request issued by the plot panel's
        // initialize, which therefore ran after wiring
        assert_eq!(
            link.writes(),
            vec![b"X".to_vec(), b"X".to_vec(), b"X".to_vec(), b"Q".to_vec()]
        );
        assert_eq!(router.active_kind(), Some(PanelKind::Plot));
        assert_eq!(router.wired_panel_count(), 1);
        assert_eq!(router.last_status(), Some("Requesting sensor data stream"));
    }

    #[test]
    fn plot_receives_stream_after_switch() {
        let (mut router, link, _host) = builtin_router(RouterConfig::default());
        router.switch_panel_by_token("Plots");

        link.inject_data(b"1.0,2.0,3.0\r\n4.0,5.0,6.0\r\n");
        router.process_channel_events();

        let channels = router.panel::<aq_panels::PlotPanel>().map(|p| p.channel_count());
        assert_eq!(channels, Some(3));
        assert_eq!(router.last_status(), Some("Plotting 3 values"));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Switch(PanelKind),
        Token(&'static str),
        Data(Vec<u8>),
        Error(String),
    }

    fn panel_kind() -> impl Strategy<Value = PanelKind> {
        prop::sample::select(PanelKind::ALL.to_vec())
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            panel_kind().prop_map(Op::Switch),
            prop::sample::select(vec![
                "Home", "Connect", "Status", "Route", "Calibrate", "Setup", "Terminal", "Plots",
                "Firmware", "Bogus", "",
            ])
            .prop_map(Op::Token),
            prop::collection::vec(b'0'..=b'9', 1..16).prop_map(Op::Data),
            "[a-z ]{1,20}".prop_map(Op::Error),
        ]
    }

    proptest! {
        #[test]
        fn switch_invariants_hold(ops in prop::collection::vec(op(), 1..40)) {
            let (mut router, link, _host, journal) = probe_router(PanelKind::Connect);
            let mut switches = 0;

            for op in ops {
                match op {
                    Op::Switch(kind) => {
                        router.switch_panel(kind);
                        switches += 1;
                    }
                    Op::Token(token) => {
                        router.switch_panel_by_token(token);
                        switches += 1;
                    }
                    Op::Data(data) => {
                        link.inject_data(&data);
                        router.process_channel_events();
                    }
                    Op::Error(text) => {
                        link.inject_error(text.clone());
                        router.process_channel_events();
                        prop_assert_eq!(router.last_status(), Some(text.as_str()));
                    }
                }

                let active = router.active_kind();
                prop_assert!(active.is_some());
                prop_assert!(router.wired_panel_count() <= 1);
                if active == Some(PanelKind::Home) {
                    prop_assert_eq!(router.wired_panel_count(), 0);
                }
            }

            prop_assert_eq!(helpers::sentinel_count(&link.writes()), switches);

            // Every panel saw all sentinels for its own teardown before it was destroyed
            let mut destroyed = 0;
            for entry in journal.borrow().iter() {
                if let Entry::Dropped { writes, .. } = entry {
                    destroyed += 1;
                    let seen = helpers::sentinel_count(&link.writes()[..*writes]);
                    prop_assert_eq!(seen, destroyed);
                }
            }
        }
    }
}
