//! Settings area: announcements plus the system activity panels.

use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, SecondsFormat, Utc};
use tracing::info;

use metrodesk_api::announcement::{parse_announcements, Announcement, NewAnnouncement};
use metrodesk_api::envelope;
use metrodesk_api::ops::{parse_audit_logs, parse_payments, AuditLog, PaymentRecord};

use crate::gateway::Backend;
use crate::signal::{Signal, SignalBus};
use crate::{DeskError, Result};

/// The three panels of the settings screen in one fetch.
#[derive(Debug, Clone, Default)]
pub struct SystemOverview {
    pub announcements: Vec<Announcement>,
    pub audit_logs: Vec<AuditLog>,
    pub payments: Vec<PaymentRecord>,
}

pub struct SettingsResource {
    backend: Arc<dyn Backend>,
    bus: Arc<SignalBus>,
}

impl SettingsResource {
    pub fn new(backend: Arc<dyn Backend>, bus: Arc<SignalBus>) -> Self {
        Self { backend, bus }
    }

    /// Fetches all three panels concurrently over the given window.
    ///
    /// A panel whose response is not OK comes back empty rather than taking
    /// the other two down; transport errors still fail the whole call.
    pub async fn overview(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<SystemOverview> {
        let from_ts = from.to_rfc3339_opts(SecondsFormat::Millis, true);
        let to_ts = to.to_rfc3339_opts(SecondsFormat::Millis, true);
        let audit_path = format!("/admin/audit?from_ts={from_ts}&to_ts={to_ts}");
        let payments_path = format!("/admin/payments?from_ts={from_ts}&to_ts={to_ts}");

        let (ann, audit, payments) = tokio::join!(
            self.backend.get("/admin/announcements"),
            self.backend.get(&audit_path),
            self.backend.get(&payments_path),
        );
        let ann = ann?;
        let audit = audit?;
        let payments = payments?;

        Ok(SystemOverview {
            announcements: if envelope::succeeded(&ann) {
                parse_announcements(&ann)?
            } else {
                Vec::new()
            },
            audit_logs: if envelope::succeeded(&audit) {
                parse_audit_logs(&audit)?
            } else {
                Vec::new()
            },
            payments: if envelope::succeeded(&payments) {
                parse_payments(&payments)?
            } else {
                Vec::new()
            },
        })
    }

    /// Overview over the default window, the last 30 days.
    pub async fn overview_recent(&self) -> Result<SystemOverview> {
        let to = Utc::now();
        self.overview(to - ChronoDuration::days(30), to).await
    }

    /// Publishes an announcement visible from now, then signals the bell
    /// feed to refresh itself.
    pub async fn create_announcement(&self, title: &str, content_md: &str) -> Result<()> {
        if title.trim().is_empty() || content_md.trim().is_empty() {
            return Err(DeskError::InvalidInput(
                "announcement title and content are required".to_string(),
            ));
        }
        let body = NewAnnouncement::now(title, content_md);
        let v = self
            .backend
            .post("/admin/announcements", serde_json::to_value(&body)?)
            .await?;
        if !envelope::succeeded(&v) {
            return Err(DeskError::Rejected(envelope::failure_message(&v)));
        }
        info!("announcement published: {}", title);
        self.bus.emit(Signal::AnnouncementAdded);
        Ok(())
    }
}
