//! Default value functions for configuration.

/// Returns `true` (for serde defaults).
pub fn default_true() -> bool {
    true
}

// =============================================================================
// Server Defaults
// =============================================================================

pub fn default_port() -> u16 {
    6667
}

// =============================================================================
// Identity Defaults
// =============================================================================

pub fn default_version() -> String {
    format!("tickirc {}", env!("CARGO_PKG_VERSION"))
}

// =============================================================================
// Rate Limit Defaults
// =============================================================================

pub fn default_max_messages() -> usize {
    100
}

pub fn default_max_bytes() -> usize {
    2500
}

pub fn default_burst_bytes() -> usize {
    250
}

pub fn default_refill_rate() -> f64 {
    10.0
}

// =============================================================================
// Chat Defaults
// =============================================================================

pub fn default_history_bytes() -> usize {
    4096
}

pub fn default_max_line_len() -> usize {
    tickirc_proto::MAX_IRC_LINE_LEN
}
