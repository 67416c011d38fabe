//! Waypoint route panel

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::commands::{COMMAND_END, READ_WAYPOINTS, WRITE_WAYPOINT};
use crate::kind::PanelKind;
use crate::line_codec::LineCodec;
use crate::outbox::Outbox;
use crate::panel::{Panel, INITIALIZE};

/// One point of a route
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// Altitude in metres
    pub alt: f32,
}

/// Error parsing a waypoint line
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid waypoint: {0}")]
pub struct InvalidWaypoint(String);

impl Waypoint {
    /// Create a waypoint
    pub fn new(lat: f64, lon: f64, alt: f32) -> Self {
        Self { lat, lon, alt }
    }

    fn in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }

    /// Encode as a waypoint write command
    pub fn encode(&self) -> Vec<u8> {
        let mut data = vec![WRITE_WAYPOINT];
        data.extend_from_slice(format!("{:.7},{:.7},{:.1}", self.lat, self.lon, self.alt).as_bytes());
        data.push(COMMAND_END);
        data
    }
}

impl FromStr for Waypoint {
    type Err = InvalidWaypoint;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidWaypoint(s.to_string());
        let mut fields = s.split(',').map(str::trim);
        let (Some(lat), Some(lon), Some(alt), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(invalid());
        };

        let waypoint = Waypoint {
            lat: lat.parse().map_err(|_| invalid())?,
            lon: lon.parse().map_err(|_| invalid())?,
            alt: alt.parse().map_err(|_| invalid())?,
        };
        if waypoint.in_range() {
            Ok(waypoint)
        } else {
            Err(invalid())
        }
    }
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.7}, {:.7} @ {:.1} m", self.lat, self.lon, self.alt)
    }
}

/// Reads, edits and uploads the waypoint route
#[derive(Debug, Default)]
pub struct RoutePanel {
    lines: LineCodec,
    waypoints: Vec<Waypoint>,
    receiving: bool,
}

impl RoutePanel {
    /// Create an empty route
    pub fn new() -> Self {
        Self::default()
    }

    /// Current route
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Append a waypoint. Returns false if it is out of range.
    pub fn add_waypoint(&mut self, waypoint: Waypoint) -> bool {
        if !waypoint.in_range() {
            return false;
        }
        self.waypoints.push(waypoint);
        true
    }

    /// Remove every waypoint
    pub fn clear(&mut self) {
        self.waypoints.clear();
    }

    /// Write the whole route to the flight controller
    pub fn upload(&mut self, out: &mut Outbox) {
        if self.waypoints.is_empty() {
            out.status("Route is empty");
            return;
        }
        for waypoint in &self.waypoints {
            out.send(waypoint.encode());
        }
        out.status(format!("Uploaded {} waypoints", self.waypoints.len()));
    }
}

impl Panel for RoutePanel {
    fn kind(&self) -> PanelKind {
        PanelKind::Route
    }

    fn on_message_in(&mut self, data: &[u8], out: &mut Outbox) {
        if data == INITIALIZE {
            self.waypoints.clear();
            self.lines.clear();
            self.receiving = true;
            out.send(READ_WAYPOINTS);
            out.status("Reading route");
            return;
        }

        if !self.receiving {
            return;
        }
        self.lines.push_bytes(data);
        while let Some(line) = self.lines.next_line() {
            match line.parse::<Waypoint>() {
                Ok(waypoint) => {
                    self.waypoints.push(waypoint);
                    out.status(format!("Received {} waypoints", self.waypoints.len()));
                }
                Err(e) => debug!("{}", e),
            }
        }
    }
}
