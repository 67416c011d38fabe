//! Single-character commands understood by AeroQuad flight software

/// Ask for the flight software version string
pub const QUERY_VERSION: &[u8] = b"!";

/// Start streaming raw sensor values, one comma-separated line per sample
pub const STREAM_SENSORS: &[u8] = b"Q";

/// Ask for the stored configuration values
pub const READ_CONFIG: &[u8] = b"a";

/// Prefix of a configuration write, followed by comma-separated values and `;`
pub const WRITE_CONFIG: u8 = b'A';

/// Ask for the stored waypoint route, one `lat,lon,alt` line per waypoint
pub const READ_WAYPOINTS: &[u8] = b"w";

/// Prefix of a waypoint write, followed by `lat,lon,alt` and `;`
pub const WRITE_WAYPOINT: u8 = b'W';

/// Terminator for multi-byte commands
pub const COMMAND_END: u8 = b';';
