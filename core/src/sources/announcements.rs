//! Announcement feed behind the notification bell.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use metrodesk_api::announcement::{parse_announcements, Announcement};

use crate::gateway::Backend;
use crate::readstate::{Channel, ReadStateStore};
use crate::signal::{Signal, SignalBus, SubscriptionId};
use crate::task::TaskHandle;
use crate::Result;

use super::{run_refresh, FetchState};

/// Point-in-time view of the bell feed.
#[derive(Debug, Clone)]
pub struct AnnouncementsSnapshot {
    /// Newest active announcements, capped to the bell display limit.
    pub display: Vec<Announcement>,
    /// Total number of active announcements behind the capped view.
    pub active_total: usize,
    /// Unread count over the full active set, not just the displayed slice.
    pub unread: usize,
    pub loading: bool,
    pub last_error: Option<String>,
}

pub struct AnnouncementsSource {
    backend: Arc<dyn Backend>,
    read_state: Arc<ReadStateStore>,
    state: RwLock<FetchState<Vec<Announcement>>>,
    seq: AtomicU64,
    display_limit: usize,
}

impl AnnouncementsSource {
    pub fn new(
        backend: Arc<dyn Backend>,
        read_state: Arc<ReadStateStore>,
        display_limit: usize,
    ) -> Self {
        Self {
            backend,
            read_state,
            state: RwLock::new(FetchState::default()),
            seq: AtomicU64::new(0),
            display_limit,
        }
    }

    /// Fetches the active announcements, newest first. Failures keep the
    /// previous feed and surface through the snapshot's `last_error`.
    pub async fn refresh(&self) {
        run_refresh(&self.state, &self.seq, "announcements", || async {
            let v = self.backend.get("/admin/announcements").await?;
            let mut items = parse_announcements(&v)?;
            items.retain(|a| a.is_active);
            items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(items)
        })
        .await;
    }

    /// Current view. Unread is recomputed against the read set on every call.
    pub async fn snapshot(&self) -> AnnouncementsSnapshot {
        let st = self.state.read().await;
        let read = self.read_state.read_ids(Channel::Announcements);
        let unread = st.payload.iter().filter(|a| !read.contains(&a.id)).count();
        AnnouncementsSnapshot {
            display: st.payload.iter().take(self.display_limit).cloned().collect(),
            active_total: st.payload.len(),
            unread,
            loading: st.loading,
            last_error: st.last_error.clone(),
        }
    }

    pub fn mark_read(&self, id: &str) -> Result<()> {
        self.read_state.mark_read(Channel::Announcements, id)
    }

    /// Marks every currently fetched announcement as read.
    pub async fn mark_all_read(&self) -> Result<()> {
        let ids: Vec<String> = {
            let st = self.state.read().await;
            st.payload.iter().map(|a| a.id.clone()).collect()
        };
        self.read_state.mark_all_read(Channel::Announcements, ids)
    }

    /// Wires the source to the signal bus: one refresh right away, then one
    /// for every [`Signal::AnnouncementAdded`].
    pub fn attach_bus(self: &Arc<Self>, bus: &SignalBus) -> (SubscriptionId, TaskHandle) {
        let (sub_id, mut rx) = bus.subscribe(Signal::AnnouncementAdded);
        let source = Arc::clone(self);
        let task = TaskHandle::spawn("announcements_refresh", async move {
            source.refresh().await;
            while rx.recv().await.is_some() {
                debug!("announcement added, refreshing bell feed");
                source.refresh().await;
            }
        });
        (sub_id, task)
    }
}
