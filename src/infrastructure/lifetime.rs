//! View Lifetime
//!
//! Ties in-flight requests to the lifetime of the view that started them.
//! Once a view is closed, responses that arrive late are dropped instead of
//! being applied to torn-down state.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Cancellation handle shared by a view and its tasks.
#[derive(Clone)]
pub struct ViewLifetime {
    /// Whether the view has been closed
    closed: Arc<AtomicBool>,
    /// Number of tasks currently awaiting a response
    in_flight: Arc<AtomicUsize>,
    /// Broadcast channel for the close signal
    close_tx: broadcast::Sender<()>,
}

impl ViewLifetime {
    pub fn new() -> Self {
        let (close_tx, _) = broadcast::channel(1);
        Self {
            closed: Arc::new(AtomicBool::new(false)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            close_tx,
        }
    }

    /// Close the view. Idempotent.
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            let pending = self.in_flight();
            if pending > 0 {
                tracing::debug!("view closed with {} task(s) in flight", pending);
            }
            let _ = self.close_tx.send(());
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Drive `task` unless the view closes first.
    ///
    /// Returns `None` when the view was already closed, closes while the
    /// task is pending, or closes before the output can be handed back.
    pub async fn run<F>(&self, task: F) -> Option<F::Output>
    where
        F: Future,
    {
        // Subscribe before checking the flag so a concurrent close is never missed.
        let mut close_rx = self.close_tx.subscribe();
        if self.is_closed() {
            return None;
        }

        let _guard = TaskGuard::new(self.clone());
        tokio::select! {
            output = task => {
                if self.is_closed() {
                    tracing::debug!("discarding late response for closed view");
                    None
                } else {
                    Some(output)
                }
            }
            _ = close_rx.recv() => {
                tracing::debug!("view closed, abandoning in-flight request");
                None
            }
        }
    }
}

impl Default for ViewLifetime {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII guard for tracking in-flight tasks.
struct TaskGuard {
    lifetime: ViewLifetime,
}

impl TaskGuard {
    fn new(lifetime: ViewLifetime) -> Self {
        lifetime.in_flight.fetch_add(1, Ordering::SeqCst);
        Self { lifetime }
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.lifetime.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
