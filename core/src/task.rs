//! Background task handles.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

/// Owned handle to a spawned background task.
///
/// Dropping the handle aborts the task, so teardown needs no bookkeeping
/// beyond letting handles go out of scope.
pub struct TaskHandle {
    name: &'static str,
    handle: JoinHandle<()>,
}

impl TaskHandle {
    /// Spawns a future under a named handle.
    pub fn spawn<F>(name: &'static str, future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        debug!("Spawning task {}", name);
        Self {
            name,
            handle: tokio::spawn(future),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Aborts the task. Calling this more than once is harmless.
    pub fn cancel(&self) {
        debug!("Cancelling task {}", self.name);
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Runs `tick` immediately and then once per interval until the returned
/// handle is cancelled or dropped.
pub fn spawn_periodic<F, Fut>(name: &'static str, every: Duration, mut tick: F) -> TaskHandle
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    TaskHandle::spawn(name, async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            tick().await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    async fn settle() {
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
    }

    fn counting_task(every: Duration) -> (Arc<AtomicU32>, TaskHandle) {
        let count = Arc::new(AtomicU32::new(0));
        let inner = Arc::clone(&count);
        let task = spawn_periodic("test_tick", every, move || {
            let inner = Arc::clone(&inner);
            async move {
                inner.fetch_add(1, Ordering::SeqCst);
            }
        });
        (count, task)
    }

    #[tokio::test(start_paused = true)]
    async fn runs_immediately_then_on_cadence() {
        let (count, _task) = counting_task(Duration::from_secs(30));

        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 1, "first run is immediate");

        tokio::time::advance(Duration::from_secs(30)).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        tokio::time::advance(Duration::from_secs(30)).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_future_ticks() {
        let (count, task) = counting_task(Duration::from_secs(10));

        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        task.cancel();
        settle().await;
        tokio::time::advance(Duration::from_secs(60)).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 1, "no ticks after cancel");
    }

    #[tokio::test(start_paused = true)]
    async fn drop_aborts_the_task() {
        let (count, task) = counting_task(Duration::from_secs(10));

        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        drop(task);
        settle().await;
        tokio::time::advance(Duration::from_secs(60)).await;
        settle().await;
        assert_eq!(count.load(Ordering::SeqCst), 1, "no ticks after drop");
    }
}
