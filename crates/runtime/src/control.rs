//! External control signals: operator resume and cancellation.
//!
//! Both are cheap cloneable handles. The resolver holds one end; whoever owns
//! the session (a CLI, a training loop, a test) holds the other.
use std::sync::Arc;

use tokio::sync::{Notify, watch};

/// Blocks the resolver until a human operator releases it.
///
/// Used when a phase cannot be resolved automatically. A resume issued while
/// nobody is waiting releases the next wait.
#[derive(Clone, Debug, Default)]
pub struct OperatorGate {
    notify: Arc<Notify>,
}

impl OperatorGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Release the current (or next) waiter.
    pub fn resume(&self) {
        self.notify.notify_one();
    }

    /// Wait for [`OperatorGate::resume`]. Unbounded; callers race it against
    /// cancellation.
    pub async fn wait(&self) {
        self.notify.notified().await;
    }
}

/// Cooperative cancellation for a resolution in progress.
#[derive(Clone, Debug)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            rx,
        }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once [`CancelToken::cancel`] has been called on any clone.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        // Sender lives in `self`, so `wait_for` only errors if it is dropped.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}
