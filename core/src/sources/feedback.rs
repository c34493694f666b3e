//! Customer feedback inbox.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use metrodesk_api::feedback::{parse_feedbacks, Feedback};

use crate::gateway::Backend;
use crate::readstate::{Channel, ReadStateStore};
use crate::task::{spawn_periodic, TaskHandle};
use crate::Result;

use super::{run_refresh, FetchState};

/// One feedback with its read flag, computed at snapshot time.
#[derive(Debug, Clone)]
pub struct FeedbackEntry {
    pub item: Feedback,
    pub is_read: bool,
}

#[derive(Debug, Clone)]
pub struct FeedbackSnapshot {
    pub entries: Vec<FeedbackEntry>,
    pub unread: usize,
    pub loading: bool,
    pub last_error: Option<String>,
}

pub struct FeedbackSource {
    backend: Arc<dyn Backend>,
    read_state: Arc<ReadStateStore>,
    state: RwLock<FetchState<Vec<Feedback>>>,
    seq: AtomicU64,
}

impl FeedbackSource {
    pub fn new(backend: Arc<dyn Backend>, read_state: Arc<ReadStateStore>) -> Self {
        Self {
            backend,
            read_state,
            state: RwLock::new(FetchState::default()),
            seq: AtomicU64::new(0),
        }
    }

    /// Fetches the inbox in backend order. Failures keep the previous list.
    pub async fn refresh(&self) {
        run_refresh(&self.state, &self.seq, "feedback", || async {
            let v = self.backend.get("/admin/feedbacks").await?;
            Ok(parse_feedbacks(&v)?)
        })
        .await;
    }

    pub async fn snapshot(&self) -> FeedbackSnapshot {
        let st = self.state.read().await;
        let read = self.read_state.read_ids(Channel::Feedback);
        let entries: Vec<FeedbackEntry> = st
            .payload
            .iter()
            .map(|f| FeedbackEntry {
                is_read: read.contains(&f.id),
                item: f.clone(),
            })
            .collect();
        let unread = entries.iter().filter(|e| !e.is_read).count();
        FeedbackSnapshot {
            entries,
            unread,
            loading: st.loading,
            last_error: st.last_error.clone(),
        }
    }

    pub fn mark_read(&self, id: &str) -> Result<()> {
        self.read_state.mark_read(Channel::Feedback, id)
    }

    pub async fn mark_all_read(&self) -> Result<()> {
        let ids: Vec<String> = {
            let st = self.state.read().await;
            st.payload.iter().map(|f| f.id.clone()).collect()
        };
        self.read_state.mark_all_read(Channel::Feedback, ids)
    }

    /// Polls on a fixed cadence. The first poll fires immediately.
    pub fn start_polling(self: &Arc<Self>, every: Duration) -> TaskHandle {
        let source = Arc::clone(self);
        spawn_periodic("feedback_poll", every, move || {
            let source = Arc::clone(&source);
            async move { source.refresh().await }
        })
    }
}
