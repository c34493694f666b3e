// Runtime configuration
// Values come from environment variables with defaults matching a local
// gateway deployment.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct DeskConfig {
    /// Base URL of the ticketing gateway, e.g. `http://localhost:3000/api`.
    pub api_base: String,
    /// Directory holding the operator profile files (credential, read state, theme).
    pub profile_dir: PathBuf,
    /// Transport timeout applied to every gateway request.
    pub request_timeout_ms: u64,
    /// Cadence of the customer feedback poll.
    pub feedback_poll_secs: u64,
    /// Idle time before the session warning fires.
    pub idle_timeout_secs: u64,
    /// Number of announcements surfaced in the notification bell.
    pub display_limit: usize,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            api_base: std::env::var("METRODESK_API_BASE")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "http://localhost:3000/api".to_string()),
            profile_dir: std::env::var("METRODESK_PROFILE_DIR")
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".metrodesk")),
            request_timeout_ms: std::env::var("METRODESK_REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30_000),
            feedback_poll_secs: std::env::var("METRODESK_FEEDBACK_POLL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            idle_timeout_secs: std::env::var("METRODESK_IDLE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(600),
            display_limit: std::env::var("METRODESK_BELL_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
        }
    }
}
