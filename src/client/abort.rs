//! Per-call cancellation plumbing.
//!
//! Each wrapped call owns one [`AbortController`]. Both cancellation sources
//! (the configured timeout and manual [`AbortHandle::abort`] invocations)
//! feed the same flag, so whichever fires first wins and every later trigger
//! is a no-op.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

/// Coordinator for one call's cancellation state.
///
/// Hands out [`AbortHandle`]s (trigger side) and [`AbortSignal`]s (observe
/// side). The flag only ever transitions `false -> true`.
pub struct AbortController {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl AbortController {
    /// Create a controller with the flag unset.
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self { tx: Arc::new(tx), rx }
    }

    /// A handle that can trigger cancellation.
    pub fn handle(&self) -> AbortHandle {
        AbortHandle {
            tx: Arc::clone(&self.tx),
        }
    }

    /// A signal that observes cancellation.
    pub fn signal(&self) -> AbortSignal {
        AbortSignal {
            rx: self.rx.clone(),
        }
    }
}

impl Default for AbortController {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AbortController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbortController")
            .field("aborted", &*self.rx.borrow())
            .finish()
    }
}

/// Trigger side of a call's cancellation.
///
/// Cloneable; every clone refers to the same call. Calling [`abort`] more
/// than once, or after the call has settled, has no observable effect.
///
/// [`abort`]: AbortHandle::abort
#[derive(Clone)]
pub struct AbortHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl AbortHandle {
    /// Trigger cancellation. Idempotent.
    pub fn abort(&self) {
        self.tx.send_replace(true);
    }

    /// Whether cancellation has fired.
    pub fn is_aborted(&self) -> bool {
        *self.tx.borrow()
    }
}

impl fmt::Debug for AbortHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbortHandle")
            .field("aborted", &self.is_aborted())
            .finish()
    }
}

/// Observe side of a call's cancellation, carried inside
/// [`CallParams`](crate::http::CallParams) so generated methods can react to
/// it mid-flight.
#[derive(Clone)]
pub struct AbortSignal {
    rx: watch::Receiver<bool>,
}

impl AbortSignal {
    /// Whether cancellation has fired.
    pub fn is_aborted(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once cancellation fires.
    ///
    /// If every handle is dropped without firing, cancellation can no longer
    /// happen and this future stays pending forever.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|aborted| *aborted).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

impl fmt::Debug for AbortSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbortSignal")
            .field("aborted", &self.is_aborted())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn abort_resolves_cancelled() {
        let controller = AbortController::new();
        let signal = controller.signal();
        controller.handle().abort();

        tokio::time::timeout(Duration::from_millis(100), signal.cancelled())
            .await
            .expect("cancelled() should resolve after abort");
        assert!(signal.is_aborted());
    }

    #[tokio::test]
    async fn cancelled_stays_pending_without_abort() {
        let controller = AbortController::new();
        let signal = controller.signal();

        let result =
            tokio::time::timeout(Duration::from_millis(50), signal.cancelled()).await;
        assert!(result.is_err(), "cancelled() must not resolve on its own");
        assert!(!signal.is_aborted());
    }

    #[tokio::test]
    async fn abort_is_idempotent() {
        let controller = AbortController::new();
        let handle = controller.handle();

        handle.abort();
        handle.abort();
        handle.abort();
        assert!(handle.is_aborted());
        assert!(controller.signal().is_aborted());
    }

    #[tokio::test]
    async fn cloned_handles_share_state() {
        let controller = AbortController::new();
        let a = controller.handle();
        let b = a.clone();

        b.abort();
        assert!(a.is_aborted());
    }

    #[tokio::test]
    async fn late_subscriber_sees_aborted_flag() {
        let controller = AbortController::new();
        controller.handle().abort();

        // Signal taken after the fact still observes the transition.
        let signal = controller.signal();
        assert!(signal.is_aborted());
        tokio::time::timeout(Duration::from_millis(100), signal.cancelled())
            .await
            .expect("already-set flag resolves immediately");
    }
}
