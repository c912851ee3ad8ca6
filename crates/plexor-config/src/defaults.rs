//! Default values shared by the configuration loader and the client.

use crate::logging::LogFormat;

pub use plexor::client::{DEFAULT_HOST, DEFAULT_IDENTIFIER, DEFAULT_PORT};

/// Seconds to wait for the TCP handshake before giving up.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Default log filter expression used by the binary.
const DEFAULT_LOG_FILTER: &str = "info";

/// Owned default host, for serde.
pub fn default_host() -> String {
    DEFAULT_HOST.to_owned()
}

/// Default port, for serde.
pub const fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Owned default sender identifier, for serde.
pub fn default_identifier() -> String {
    DEFAULT_IDENTIFIER.to_owned()
}

/// Default connect timeout, for serde.
pub const fn default_connect_timeout_secs() -> Option<u64> {
    Some(DEFAULT_CONNECT_TIMEOUT_SECS)
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binary.
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}
