use std::fs;
use std::path::{Path, PathBuf};

use metrodesk_core::DeskConfig;

/// High-level configuration for the console demo
#[derive(Clone, Debug)]
pub struct ConsoleConfig {
    pub desk: DeskConfig,
    /// Operator credentials used when no stored session exists.
    pub login: Option<LoginConfig>,
    /// Cadence of the status line printed to the log.
    pub status_every_secs: u64,
    /// Days of history pulled for the statistics demo.
    pub report_days: i64,
}

#[derive(Clone, Debug)]
pub struct LoginConfig {
    pub email: String,
    pub password: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        let email = std::env::var("METRODESK_EMAIL")
            .ok()
            .filter(|s| !s.is_empty());
        let password = std::env::var("METRODESK_PASSWORD")
            .ok()
            .filter(|s| !s.is_empty());
        let login = match (email, password) {
            (Some(email), Some(password)) => Some(LoginConfig { email, password }),
            _ => None,
        };
        Self {
            desk: DeskConfig::default(),
            login,
            status_every_secs: std::env::var("METRODESK_STATUS_EVERY_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60),
            report_days: std::env::var("METRODESK_REPORT_DAYS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(7),
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from a TOML file (path via METRODESK_CONSOLE_CONFIG or
    /// ./metrodesk.toml), overlaying values onto env-driven defaults.
    pub fn load() -> Self {
        let default = Self::default();
        let path =
            std::env::var("METRODESK_CONSOLE_CONFIG").unwrap_or_else(|_| "metrodesk.toml".into());
        let p = Path::new(&path);
        if !p.exists() {
            tracing::info!(target = "admin_console", path = %path, "No TOML config found; using defaults/env");
            return default;
        }
        match fs::read_to_string(p) {
            Ok(s) => match toml::from_str::<ConsoleToml>(&s) {
                Ok(t) => t.overlay(default),
                Err(e) => {
                    tracing::warn!(target = "admin_console", error = %e, "Failed to parse TOML; using defaults");
                    default
                }
            },
            Err(e) => {
                tracing::warn!(target = "admin_console", error = %e, "Failed to read TOML; using defaults");
                default
            }
        }
    }
}

// =========================
// TOML overlay definitions
// =========================

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct ConsoleToml {
    pub status_every_secs: Option<u64>,
    pub report_days: Option<i64>,
    pub desk: Option<DeskToml>,
    pub login: Option<LoginToml>,
}

impl ConsoleToml {
    fn overlay(self, mut base: ConsoleConfig) -> ConsoleConfig {
        if let Some(v) = self.status_every_secs {
            base.status_every_secs = v;
        }
        if let Some(v) = self.report_days {
            base.report_days = v;
        }
        if let Some(d) = self.desk {
            d.apply(&mut base.desk);
        }
        if let Some(l) = self.login {
            if let (Some(email), Some(password)) = (l.email, l.password) {
                base.login = Some(LoginConfig { email, password });
            }
        }
        base
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct DeskToml {
    pub api_base: Option<String>,
    pub profile_dir: Option<PathBuf>,
    pub request_timeout_ms: Option<u64>,
    pub feedback_poll_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
    pub display_limit: Option<usize>,
}
impl DeskToml {
    fn apply(self, c: &mut DeskConfig) {
        if let Some(v) = self.api_base {
            c.api_base = v;
        }
        if let Some(v) = self.profile_dir {
            c.profile_dir = v;
        }
        if let Some(v) = self.request_timeout_ms {
            c.request_timeout_ms = v;
        }
        if let Some(v) = self.feedback_poll_secs {
            c.feedback_poll_secs = v;
        }
        if let Some(v) = self.idle_timeout_secs {
            c.idle_timeout_secs = v;
        }
        if let Some(v) = self.display_limit {
            c.display_limit = v;
        }
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
struct LoginToml {
    pub email: Option<String>,
    pub password: Option<String>,
}
