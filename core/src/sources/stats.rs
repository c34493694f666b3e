//! Dashboard headline statistics.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use chrono::{Duration as ChronoDuration, SecondsFormat, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use metrodesk_api::ops::{parse_audit_logs, AuditLog};
use metrodesk_api::report::{parse_sales, parse_scan_total, parse_traffic};

use crate::gateway::Backend;

use super::{run_refresh, FetchState};

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardStats {
    /// Ticket revenue taken today.
    pub revenue_today: f64,
    /// Gate validations counted today.
    pub passengers_today: u64,
    /// QR scans over the backend's dashboard window.
    pub scans: u64,
    /// Latest administrative actions, up to one week back.
    pub recent_logs: Vec<AuditLog>,
}

#[derive(Debug, Clone)]
pub struct StatsSnapshot {
    pub stats: DashboardStats,
    pub loading: bool,
    pub last_error: Option<String>,
}

pub struct StatsSource {
    backend: Arc<dyn Backend>,
    state: RwLock<FetchState<DashboardStats>>,
    seq: AtomicU64,
}

impl StatsSource {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            state: RwLock::new(FetchState::default()),
            seq: AtomicU64::new(0),
        }
    }

    /// Refreshes all four panels concurrently.
    ///
    /// One failed request fails the whole refresh and keeps the prior
    /// numbers; a request that succeeds with an unexpected shape contributes
    /// its zero value instead.
    pub async fn refresh(&self) {
        run_refresh(&self.state, &self.seq, "dashboard_stats", || async {
            let today = Utc::now().format("%Y-%m-%d").to_string();
            let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
            let week_ago = (Utc::now() - ChronoDuration::days(7))
                .to_rfc3339_opts(SecondsFormat::Millis, true);

            let sales_path = format!("/admin/report/sales?from_date={today}&to_date={today}");
            let traffic_path = format!("/admin/report/traffic?from_date={today}&to_date={today}");
            let audit_path = format!("/admin/audit?from_ts={week_ago}&to_ts={now}");

            let (sales, traffic, scans, audit) = tokio::join!(
                self.backend.get(&sales_path),
                self.backend.get(&traffic_path),
                self.backend.get("/admin/dashboard-stats"),
                self.backend.get(&audit_path),
            );

            let sales = sales?;
            let traffic = traffic?;
            let scans = scans?;
            let audit = audit?;

            let revenue_today = parse_sales(&sales)
                .map(|rows| rows.iter().map(|r| r.amount).sum())
                .unwrap_or(0.0);
            let passengers_today = parse_traffic(&traffic)
                .map(|rows| rows.iter().map(|r| r.validations_count).sum())
                .unwrap_or(0);
            let scans = parse_scan_total(&scans);
            let recent_logs = parse_audit_logs(&audit).unwrap_or_default();

            Ok(DashboardStats {
                revenue_today,
                passengers_today,
                scans,
                recent_logs,
            })
        })
        .await;
    }

    pub async fn snapshot(&self) -> StatsSnapshot {
        let st = self.state.read().await;
        StatsSnapshot {
            stats: st.payload.clone(),
            loading: st.loading,
            last_error: st.last_error.clone(),
        }
    }
}
