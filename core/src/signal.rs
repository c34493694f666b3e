// Signal bus implementation
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Cross-component notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    /// An announcement was created through the settings screen.
    AnnouncementAdded,
    /// The gateway saw a 401 and dropped the credential.
    SessionExpired,
    /// The idle monitor reached its timeout.
    IdleWarning,
    /// The operator signed out, explicitly or via the idle monitor.
    LoggedOut,
}

impl Signal {
    pub fn name(&self) -> &'static str {
        match self {
            Signal::AnnouncementAdded => "announcement_added",
            Signal::SessionExpired => "session_expired",
            Signal::IdleWarning => "idle_warning",
            Signal::LoggedOut => "logged_out",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Subscription information
#[derive(Debug, Clone)]
struct Subscription {
    serial: u64,
    sender: mpsc::Sender<Signal>,
}

/// Handle returned by [`SignalBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId {
    signal: Signal,
    serial: u64,
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub_{}_{}", self.signal.name(), self.serial)
    }
}

/// Signal bus statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignalBusStats {
    pub total_emitted: u64,
    pub total_delivered: u64,
    pub active_subscriptions: usize,
    pub dropped_signals: u64,
}

// Queue depth per subscriber. Signals are rare, so a small bound is plenty;
// a subscriber that falls this far behind misses signals rather than
// stalling the emitter.
const CHANNEL_CAPACITY: usize = 16;

/// Per-signal subscriber registry with bounded, non-blocking fan-out.
pub struct SignalBus {
    // Signal -> subscriber list
    subscriptions: Arc<DashMap<Signal, Vec<Subscription>>>,

    // Statistics
    stats: Arc<DashMap<Signal, SignalBusStats>>,

    next_serial: AtomicU64,
}

impl SignalBus {
    pub fn new() -> Self {
        Self {
            subscriptions: Arc::new(DashMap::new()),
            stats: Arc::new(DashMap::new()),
            next_serial: AtomicU64::new(0),
        }
    }

    /// Emit a signal to every subscriber of that signal.
    ///
    /// Never blocks: a subscriber whose queue is full misses the signal,
    /// which is counted and logged. Returns the number of deliveries.
    pub fn emit(&self, signal: Signal) -> u64 {
        debug!("Emitting signal {}", signal.name());

        self.update_stats(signal, |stats| {
            stats.total_emitted += 1;
        });

        if let Some(subs) = self.subscriptions.get(&signal) {
            let mut delivered: u64 = 0;
            let mut dropped: u64 = 0;

            for sub in subs.value() {
                if sub.sender.try_send(signal).is_ok() {
                    delivered += 1;
                } else {
                    dropped += 1;
                    warn!(
                        "Dropped signal {} for subscription {}",
                        signal.name(),
                        sub.serial
                    );
                }
            }

            self.update_stats(signal, |stats| {
                stats.total_delivered += delivered;
                stats.dropped_signals += dropped;
            });

            delivered
        } else {
            debug!("No subscriptions for signal {}", signal.name());
            0
        }
    }

    /// Subscribe to one signal.
    ///
    /// Signals emitted before this call are not replayed.
    pub fn subscribe(&self, signal: Signal) -> (SubscriptionId, mpsc::Receiver<Signal>) {
        let serial = self.next_serial.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        self.subscriptions
            .entry(signal)
            .or_insert_with(Vec::new)
            .push(Subscription { serial, sender: tx });

        self.update_stats(signal, |stats| {
            stats.active_subscriptions += 1;
        });

        let id = SubscriptionId { signal, serial };
        info!("Created subscription {}", id);
        (id, rx)
    }

    /// Drop a subscription. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: &SubscriptionId) {
        if let Some(mut subs) = self.subscriptions.get_mut(&id.signal) {
            let before = subs.len();
            subs.retain(|sub| sub.serial != id.serial);
            if subs.len() < before {
                self.update_stats(id.signal, |stats| {
                    stats.active_subscriptions = stats.active_subscriptions.saturating_sub(1);
                });
                info!("Unsubscribed {}", id);
            }
        }
    }

    /// Get stats
    pub fn stats(&self, signal: Signal) -> Option<SignalBusStats> {
        self.stats.get(&signal).map(|s| s.clone())
    }

    // Update stats helper
    fn update_stats<F>(&self, signal: Signal, f: F)
    where
        F: FnOnce(&mut SignalBusStats),
    {
        let mut entry = self.stats.entry(signal).or_default();
        f(entry.value_mut());
    }
}

impl Default for SignalBus {
    fn default() -> Self {
        Self::new()
    }
}
