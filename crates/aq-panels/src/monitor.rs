//! Serial monitor panel

use std::collections::VecDeque;

use crate::kind::PanelKind;
use crate::line_codec::LineCodec;
use crate::outbox::Outbox;
use crate::panel::Panel;

/// Maximum lines kept in the terminal history
pub const HISTORY_LIMIT: usize = 500;

/// Raw terminal onto the serial stream. Emits no status.
#[derive(Debug, Default)]
pub struct MonitorPanel {
    lines: LineCodec,
    history: VecDeque<String>,
}

impl MonitorPanel {
    /// Create an empty monitor
    pub fn new() -> Self {
        Self::default()
    }

    /// Received lines, oldest first
    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    /// Number of lines held
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Check if nothing has been received
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Forget the history
    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Send a command typed by the user
    pub fn send_command(&mut self, command: &str, out: &mut Outbox) {
        if command.is_empty() {
            return;
        }
        out.send(command.as_bytes().to_vec());
    }
}

impl Panel for MonitorPanel {
    fn kind(&self) -> PanelKind {
        PanelKind::Monitor
    }

    fn on_message_in(&mut self, data: &[u8], _out: &mut Outbox) {
        self.lines.push_bytes(data);
        while let Some(line) = self.lines.next_line() {
            if self.history.len() >= HISTORY_LIMIT {
                self.history.pop_front();
            }
            self.history.push_back(line);
        }
    }
}
