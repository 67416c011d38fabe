//! Sensor plot panel
//!
//! Requests the sensor stream when initialised and keeps a bounded series per
//! value column.

use std::collections::VecDeque;

use tracing::debug;

use crate::commands::STREAM_SENSORS;
use crate::kind::PanelKind;
use crate::line_codec::LineCodec;
use crate::outbox::Outbox;
use crate::panel::{Panel, INITIALIZE};

/// Samples kept per series
pub const SAMPLE_LIMIT: usize = 1000;

/// Live sensor plots
#[derive(Debug, Default)]
pub struct PlotPanel {
    lines: LineCodec,
    series: Vec<VecDeque<f64>>,
    streaming: bool,
    skipped: usize,
}

/// Parse one sample line into its values
fn parse_sample(line: &str) -> Option<Vec<f64>> {
    let values = line
        .split(',')
        .map(|field| field.trim().parse::<f64>().ok())
        .collect::<Option<Vec<_>>>()?;
    (!values.is_empty()).then_some(values)
}

impl PlotPanel {
    /// Create an idle plot
    pub fn new() -> Self {
        Self::default()
    }

    /// One series per value column
    pub fn series(&self) -> &[VecDeque<f64>] {
        &self.series
    }

    /// Number of value columns in the stream
    pub fn channel_count(&self) -> usize {
        self.series.len()
    }

    /// Check if the stream has been requested
    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    /// Lines that could not be parsed as samples
    pub fn skipped_lines(&self) -> usize {
        self.skipped
    }

    fn push_sample(&mut self, values: Vec<f64>, out: &mut Outbox) {
        if values.len() != self.series.len() {
            self.series = vec![VecDeque::with_capacity(SAMPLE_LIMIT); values.len()];
            out.status(format!("Plotting {} values", values.len()));
        }
        for (series, value) in self.series.iter_mut().zip(values) {
            if series.len() >= SAMPLE_LIMIT {
                series.pop_front();
            }
            series.push_back(value);
        }
    }
}

impl Panel for PlotPanel {
    fn kind(&self) -> PanelKind {
        PanelKind::Plot
    }

    fn on_message_in(&mut self, data: &[u8], out: &mut Outbox) {
        if data == INITIALIZE {
            self.streaming = true;
            out.send(STREAM_SENSORS);
            out.status("Requesting sensor data stream");
            return;
        }

        self.lines.push_bytes(data);
        while let Some(line) = self.lines.next_line() {
            match parse_sample(&line) {
                Some(values) => self.push_sample(values, out),
                None => {
                    self.skipped += 1;
                    debug!("Skipping malformed sample: {}", line);
                }
            }
        }
    }
}
