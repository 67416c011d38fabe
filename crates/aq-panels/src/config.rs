//! Flight configuration panel

use tracing::debug;

use crate::commands::{COMMAND_END, READ_CONFIG, WRITE_CONFIG};
use crate::kind::PanelKind;
use crate::line_codec::LineCodec;
use crate::outbox::Outbox;
use crate::panel::{Panel, INITIALIZE};

/// Reads and writes the flight software's configuration values
#[derive(Debug, Default)]
pub struct ConfigPanel {
    lines: LineCodec,
    values: Vec<f32>,
    loaded: bool,
    awaiting_values: bool,
}

fn parse_values(line: &str) -> Option<Vec<f32>> {
    line.split(',')
        .map(|field| field.trim().parse::<f32>().ok())
        .collect()
}

impl ConfigPanel {
    /// Create an empty configuration view
    pub fn new() -> Self {
        Self::default()
    }

    /// Values as last read or edited
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Check if values have been read from the board
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Edit one value. Returns false if the index is out of range.
    pub fn set_value(&mut self, index: usize, value: f32) -> bool {
        match self.values.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Encode the write command for the current values
    fn encode_write(&self) -> Vec<u8> {
        let body = self
            .values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let mut data = Vec::with_capacity(body.len() + 2);
        data.push(WRITE_CONFIG);
        data.extend_from_slice(body.as_bytes());
        data.push(COMMAND_END);
        data
    }

    /// Send the current values back to the board
    pub fn write_config(&mut self, out: &mut Outbox) {
        if !self.loaded {
            out.status("Read the configuration before writing it");
            return;
        }
        out.send(self.encode_write());
        out.status(format!("Wrote {} configuration values", self.values.len()));
    }
}

impl Panel for ConfigPanel {
    fn kind(&self) -> PanelKind {
        PanelKind::Config
    }

    fn on_message_in(&mut self, data: &[u8], out: &mut Outbox) {
        if data == INITIALIZE {
            self.awaiting_values = true;
            self.lines.clear();
            out.send(READ_CONFIG);
            out.status("Reading configuration");
            return;
        }

        self.lines.push_bytes(data);
        while let Some(line) = self.lines.next_line() {
            if !self.awaiting_values {
                debug!("Config panel ignoring line: {}", line);
                continue;
            }
            self.awaiting_values = false;
            match parse_values(&line) {
                Some(values) => {
                    out.status(format!("Loaded {} configuration values", values.len()));
                    self.values = values;
                    self.loaded = true;
                }
                None => out.status(format!("Unexpected configuration response: {}", line)),
            }
        }
    }
}
