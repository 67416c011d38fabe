//! Main application state and UI

use std::time::Duration;

use aq_link::{enumerate_ports, ConnectionParams, PortInfo, SerialChannel, DEFAULT_BAUD_RATE};
use aq_panels::{ConnectPanel, MonitorPanel, PanelKind};
use aq_router::{Router, TOOLBAR_ACTIONS};
use eframe::CreationContext;
use egui::{Color32, RichText, Ui};

use crate::host::DesktopHost;
use crate::settings::Settings;

/// Something the user asked for this frame
enum UiAction {
    Toolbar(&'static str),
    RefreshPorts,
    Connect(ConnectionParams),
    Disconnect,
    SendCommand(String),
}

/// Main application state
pub struct CommunicatorApp {
    router: Router<SerialChannel, DesktopHost>,
    ports: Vec<PortInfo>,
    selected_port: String,
    baud_rate: u32,
    command_input: String,
    /// Tokio runtime (must be kept alive for the serial I/O task)
    _runtime: tokio::runtime::Runtime,
}

impl CommunicatorApp {
    /// Create the application
    pub fn new(cc: &CreationContext<'_>, settings: Settings, runtime: tokio::runtime::Runtime) -> Self {
        let channel = SerialChannel::new(runtime.handle().clone());
        let config = settings.router.clone();
        let (selected_port, baud_rate) = match &config.last_connection {
            Some(params) => (params.port.clone(), params.baud_rate),
            None => (String::new(), DEFAULT_BAUD_RATE),
        };

        let host = DesktopHost::new(cc.egui_ctx.clone(), settings);
        let router = Router::new(channel, host, config);

        let mut app = Self {
            router,
            ports: Vec::new(),
            selected_port,
            baud_rate,
            command_input: String::new(),
            _runtime: runtime,
        };
        app.refresh_ports();
        app
    }

    fn refresh_ports(&mut self) {
        match enumerate_ports() {
            Ok(ports) => self.ports = ports,
            Err(e) => self
                .router
                .forward_status(&format!("Failed to enumerate ports: {}", e)),
        }
    }

    fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::Toolbar(token) => self.router.switch_panel_by_token(token),
            UiAction::RefreshPorts => self.refresh_ports(),
            UiAction::Connect(params) => {
                self.router.with_panel::<ConnectPanel, _>(|panel, out| {
                    panel.select(params);
                    panel.connect(out);
                });
            }
            UiAction::Disconnect => {
                self.router
                    .with_panel::<ConnectPanel, _>(|panel, out| panel.disconnect(out));
            }
            UiAction::SendCommand(command) => {
                self.router
                    .with_panel::<MonitorPanel, _>(|panel, out| panel.send_command(&command, out));
            }
        }
    }

    fn draw_toolbar(&self, ui: &mut Ui, actions: &mut Vec<UiAction>) {
        ui.vertical(|ui| {
            for action in TOOLBAR_ACTIONS {
                let active = action.target.is_some() && action.target == self.router.active_kind();
                if ui.selectable_label(active, action.token).clicked() {
                    actions.push(UiAction::Toolbar(action.token));
                }
            }
        });
    }

    fn draw_status_bar(&self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            let (label, color) = if self.router.link_state().is_open() {
                ("Connected", Color32::GREEN)
            } else {
                ("Disconnected", Color32::GRAY)
            };
            ui.label(RichText::new(label).color(color));
            ui.separator();
            if let Some(text) = self.router.host().status_text() {
                ui.label(text);
            }
        });
    }

    fn draw_connect(&mut self, ui: &mut Ui, actions: &mut Vec<UiAction>) {
        ui.horizontal(|ui| {
            egui::ComboBox::from_label("Port")
                .selected_text(if self.selected_port.is_empty() {
                    "Select port"
                } else {
                    self.selected_port.as_str()
                })
                .show_ui(ui, |ui| {
                    for port in &self.ports {
                        ui.selectable_value(&mut self.selected_port, port.port.clone(), port.label());
                    }
                });
            if ui.button("Refresh").clicked() {
                actions.push(UiAction::RefreshPorts);
            }
        });

        ui.horizontal(|ui| {
            ui.label("Baud rate:");
            ui.add(egui::DragValue::new(&mut self.baud_rate).range(1200..=1_000_000));
        });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if self.router.link_state().is_open() {
                if ui.button("Disconnect").clicked() {
                    actions.push(UiAction::Disconnect);
                }
            } else if ui.button("Connect").clicked() {
                actions.push(UiAction::Connect(ConnectionParams::new(
                    self.selected_port.clone(),
                    self.baud_rate,
                )));
            }
        });

        if let Some(version) = self
            .router
            .panel::<ConnectPanel>()
            .and_then(ConnectPanel::flight_software)
        {
            ui.label(format!("Flight software: {}", version));
        }
    }

    fn draw_monitor(&mut self, ui: &mut Ui, actions: &mut Vec<UiAction>) {
        ui.horizontal(|ui| {
            let response = ui.text_edit_singleline(&mut self.command_input);
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if (ui.button("Send").clicked() || submitted) && !self.command_input.is_empty() {
                actions.push(UiAction::SendCommand(std::mem::take(&mut self.command_input)));
            }
        });

        ui.separator();
        egui::ScrollArea::vertical()
            .stick_to_bottom(true)
            .show(ui, |ui| {
                if let Some(monitor) = self.router.panel::<MonitorPanel>() {
                    for line in monitor.history() {
                        ui.monospace(line);
                    }
                }
            });
    }

    fn draw_central(&mut self, ui: &mut Ui, actions: &mut Vec<UiAction>) {
        if let Some(title) = self.router.active_title() {
            ui.heading(title);
            ui.separator();
        }
        match self.router.active_kind() {
            Some(PanelKind::Connect) => self.draw_connect(ui, actions),
            Some(PanelKind::Monitor) => self.draw_monitor(ui, actions),
            _ => {}
        }
    }
}

impl eframe::App for CommunicatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.router.process_channel_events();
        self.router.host_mut().track_geometry();

        let mut actions = Vec::new();

        egui::SidePanel::left("toolbar")
            .resizable(false)
            .default_width(110.0)
            .show(ctx, |ui| {
                self.draw_toolbar(ui, &mut actions);
            });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            self.draw_status_bar(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_central(ui, &mut actions);
        });

        for action in actions {
            self.apply(action);
        }

        // Keep polling the channel while a link is open, and wake up for status expiry
        if self.router.link_state().is_open() {
            ctx.request_repaint_after(Duration::from_millis(50));
        } else if let Some(remaining) = self.router.host().status_remaining() {
            ctx.request_repaint_after(remaining);
        }
    }
}

impl Drop for CommunicatorApp {
    fn drop(&mut self) {
        let last_connection = self.router.last_connection().cloned();
        if last_connection.is_some() {
            self.router.host_mut().settings_mut().router.last_connection = last_connection;
        }
        self.router.shutdown();
    }
}
