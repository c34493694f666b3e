//! Shared data sources.
//!
//! Each source owns one slice of backend state and refreshes it on a timer,
//! on a signal, or on demand. Every refresh claims a sequence number before
//! its request leaves, and a completion only lands if nothing newer landed
//! first, so overlapping refreshes can never roll state backwards.

pub mod announcements;
pub mod feedback;
pub mod stats;

pub use announcements::{AnnouncementsSnapshot, AnnouncementsSource};
pub use feedback::{FeedbackEntry, FeedbackSnapshot, FeedbackSource};
pub use stats::{DashboardStats, StatsSnapshot, StatsSource};

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::DeskError;

/// Fetched payload plus the bookkeeping every source shares.
pub(crate) struct FetchState<T> {
    pub payload: T,
    pub loading: bool,
    pub last_error: Option<String>,
    pub applied_seq: u64,
}

impl<T: Default> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            payload: T::default(),
            loading: false,
            last_error: None,
            applied_seq: 0,
        }
    }
}

impl<T> FetchState<T> {
    /// Lands a completed fetch.
    ///
    /// Completions apply in claim order: anything at or below the last
    /// applied sequence is discarded. An error records its message and keeps
    /// the previous payload.
    pub fn complete(
        &mut self,
        seq: u64,
        outcome: Result<T, DeskError>,
        what: &'static str,
    ) -> bool {
        self.loading = false;
        if seq <= self.applied_seq {
            debug!(
                "{} fetch #{} discarded, #{} already applied",
                what, seq, self.applied_seq
            );
            return false;
        }
        self.applied_seq = seq;
        match outcome {
            Ok(payload) => {
                self.payload = payload;
                self.last_error = None;
                true
            }
            Err(e) => {
                warn!("{} fetch #{} failed: {}", what, seq, e);
                self.last_error = Some(e.to_string());
                false
            }
        }
    }
}

/// Claims a sequence number, runs the fetch, lands the outcome.
///
/// The claim happens before the request leaves, so two overlapping calls
/// resolve by claim order no matter which response returns first.
pub(crate) async fn run_refresh<T, F, Fut>(
    state: &RwLock<FetchState<T>>,
    seq: &AtomicU64,
    what: &'static str,
    fetch: F,
) -> bool
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, DeskError>>,
{
    let claimed = seq.fetch_add(1, Ordering::SeqCst) + 1;
    state.write().await.loading = true;

    let outcome = fetch().await;

    state.write().await.complete(claimed, outcome, what)
}
