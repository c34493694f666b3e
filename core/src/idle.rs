//! Session idle monitor.
//!
//! Watches operator input and walks a one-way state machine:
//! `Active -> WarningShown -> LoggedOut`. Input resets the timer only while
//! `Active`; once the warning is up, the only way forward is
//! [`IdleMonitor::acknowledge`], which clears the credential.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{info, trace, warn};

use crate::session::Session;
use crate::signal::{Signal, SignalBus};
use crate::task::TaskHandle;

/// Operator input classes that count as activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    PointerMove,
    PointerDown,
    KeyPress,
    Scroll,
    Touch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleState {
    Active,
    WarningShown,
    LoggedOut,
}

pub struct IdleMonitor {
    activity_tx: mpsc::Sender<InputKind>,
    ack_tx: mpsc::Sender<()>,
    state_rx: watch::Receiver<IdleState>,
    task: TaskHandle,
}

impl IdleMonitor {
    /// Starts the monitor with its timer already running.
    pub fn start(session: Arc<Session>, bus: Arc<SignalBus>, timeout: Duration) -> Self {
        let (activity_tx, mut activity_rx) = mpsc::channel::<InputKind>(64);
        let (ack_tx, mut ack_rx) = mpsc::channel::<()>(4);
        let (state_tx, state_rx) = watch::channel(IdleState::Active);

        let task = TaskHandle::spawn("idle_monitor", async move {
            // Active: any input rewinds the deadline.
            let deadline = tokio::time::sleep(timeout);
            tokio::pin!(deadline);
            loop {
                tokio::select! {
                    _ = &mut deadline => break,
                    Some(kind) = activity_rx.recv() => {
                        trace!("activity {:?}, idle timer reset", kind);
                        deadline.as_mut().reset(Instant::now() + timeout);
                    }
                    // an acknowledge with no warning on screen means nothing
                    Some(_) = ack_rx.recv() => {}
                }
            }

            warn!("idle timeout reached, session warning shown");
            let _ = state_tx.send(IdleState::WarningShown);
            bus.emit(Signal::IdleWarning);

            // WarningShown: input no longer resets anything, only the
            // acknowledgement moves the machine forward.
            loop {
                tokio::select! {
                    Some(_) = ack_rx.recv() => {
                        if let Err(e) = session.clear().await {
                            warn!("failed to clear session on idle logout: {}", e);
                        }
                        bus.emit(Signal::LoggedOut);
                        let _ = state_tx.send(IdleState::LoggedOut);
                        info!("idle warning acknowledged, operator logged out");
                        return;
                    }
                    Some(kind) = activity_rx.recv() => {
                        trace!("ignoring {:?} while warning shown", kind);
                    }
                    else => return,
                }
            }
        });

        Self {
            activity_tx,
            ack_tx,
            state_rx,
            task,
        }
    }

    /// Reports one unit of operator input. Cheap and non-blocking.
    pub fn note_activity(&self, kind: InputKind) {
        let _ = self.activity_tx.try_send(kind);
    }

    /// Confirms the idle warning. Clears the credential and emits
    /// [`Signal::LoggedOut`]. Ignored while no warning is shown.
    pub fn acknowledge(&self) {
        let _ = self.ack_tx.try_send(());
    }

    pub fn state(&self) -> IdleState {
        *self.state_rx.borrow()
    }

    /// Watch handle for observing state transitions.
    pub fn state_watch(&self) -> watch::Receiver<IdleState> {
        self.state_rx.clone()
    }

    pub fn shutdown(&self) {
        self.task.cancel();
    }
}
