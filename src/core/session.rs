//! Session State
//!
//! Single-flight token refresh. The first caller to observe a rejected token
//! becomes the leader and performs the refresh; every caller arriving while
//! the refresh is in flight is parked in a FIFO queue and settled with the
//! leader's outcome.
//!
//! ```text
//!            acquire()                      resolve(token) / reject(err) / drop
//!   Idle ─────────────────► Refreshing ─────────────────────────────────────► Idle
//!                            │  ▲
//!                  acquire() │  │ parked in FIFO order
//!                            ▼  │
//!                           Waiter
//! ```

use parking_lot::Mutex;
use std::collections::VecDeque;
use tokio::sync::oneshot;
use tracing::debug;

use crate::error::{AuthError, DealershipError};

/// Outcome delivered to every waiter: the new access token or the failure.
pub type RefreshOutcome = Result<String, DealershipError>;

#[derive(Default)]
struct Inner {
    refreshing: bool,
    waiters: VecDeque<oneshot::Sender<RefreshOutcome>>,
}

/// Refresh state shared by every call made through one client.
#[derive(Default)]
pub struct SessionState {
    inner: Mutex<Inner>,
}

/// Role handed out by [`SessionState::acquire`].
pub enum RefreshTicket<'a> {
    /// No refresh was in flight; the holder must perform it.
    Leader(RefreshLease<'a>),
    /// A refresh is in flight; wait for its outcome.
    Waiter(PendingRefresh),
}

impl SessionState {
    /// Fresh state in `Idle`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Become the refresh leader, or join the queue of the refresh in flight.
    pub fn acquire(&self) -> RefreshTicket<'_> {
        let mut inner = self.inner.lock();
        if inner.refreshing {
            let (tx, rx) = oneshot::channel();
            inner.waiters.push_back(tx);
            let position = inner.waiters.len();
            debug!(position, "Queued behind in-flight token refresh");
            RefreshTicket::Waiter(PendingRefresh { rx, position })
        } else {
            inner.refreshing = true;
            debug!("Token refresh started");
            RefreshTicket::Leader(RefreshLease {
                state: self,
                settled: false,
            })
        }
    }

    /// Whether a refresh is in flight.
    pub fn is_refreshing(&self) -> bool {
        self.inner.lock().refreshing
    }

    /// Number of callers parked behind the refresh in flight.
    pub fn queued(&self) -> usize {
        self.inner.lock().waiters.len()
    }

    fn settle(&self, outcome: RefreshOutcome) {
        let waiters = {
            let mut inner = self.inner.lock();
            inner.refreshing = false;
            std::mem::take(&mut inner.waiters)
        };

        debug!(
            waiters = waiters.len(),
            success = outcome.is_ok(),
            "Token refresh settled"
        );

        for waiter in waiters {
            // A waiter whose caller went away has nothing left to settle.
            let _ = waiter.send(outcome.clone());
        }
    }
}

/// Exclusive right to perform the refresh in flight.
///
/// Dropping an unsettled lease rejects every waiter with
/// [`AuthError::RefreshAborted`] and returns the state to `Idle`.
#[must_use = "an unsettled lease aborts the refresh when dropped"]
pub struct RefreshLease<'a> {
    state: &'a SessionState,
    settled: bool,
}

impl RefreshLease<'_> {
    /// Settle every waiter, in arrival order, with the new access token.
    pub fn resolve(mut self, access_token: String) {
        self.settled = true;
        self.state.settle(Ok(access_token));
    }

    /// Settle every waiter, in arrival order, with the refresh failure.
    pub fn reject(mut self, error: DealershipError) {
        self.settled = true;
        self.state.settle(Err(error));
    }
}

impl Drop for RefreshLease<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.state.settle(Err(AuthError::RefreshAborted.into()));
        }
    }
}

/// A caller parked behind the refresh in flight.
pub struct PendingRefresh {
    rx: oneshot::Receiver<RefreshOutcome>,
    position: usize,
}

impl PendingRefresh {
    /// 1-based position in the queue at the time of arrival.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Wait for the leader's outcome.
    pub async fn wait(self) -> RefreshOutcome {
        self.rx
            .await
            .unwrap_or_else(|_| Err(AuthError::RefreshAborted.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use futures::future::join_all;
    use tokio_test::{assert_err, assert_ok};

    fn leader(state: &SessionState) -> RefreshLease<'_> {
        match state.acquire() {
            RefreshTicket::Leader(lease) => lease,
            RefreshTicket::Waiter(_) => panic!("expected to lead the refresh"),
        }
    }

    fn waiter(state: &SessionState) -> PendingRefresh {
        match state.acquire() {
            RefreshTicket::Waiter(pending) => pending,
            RefreshTicket::Leader(_) => panic!("expected to wait for the refresh"),
        }
    }

    #[tokio::test]
    async fn test_only_first_caller_leads() {
        let state = SessionState::new();
        assert!(!state.is_refreshing());

        let lease = leader(&state);
        assert!(state.is_refreshing());

        let first = waiter(&state);
        let second = waiter(&state);
        assert_eq!(first.position(), 1);
        assert_eq!(second.position(), 2);
        assert_eq!(state.queued(), 2);

        lease.resolve("A2".to_string());
        assert!(!state.is_refreshing());
        assert_eq!(state.queued(), 0);

        assert_eq!(assert_ok!(first.wait().await), "A2");
        assert_eq!(assert_ok!(second.wait().await), "A2");
    }

    #[tokio::test]
    async fn test_reject_reaches_every_waiter() {
        let state = SessionState::new();
        let lease = leader(&state);
        let pending: Vec<_> = (0..3).map(|_| waiter(&state)).collect();

        lease.reject(DealershipError::Api(ApiError {
            status: 403,
            message: "refresh token revoked".to_string(),
            details: None,
        }));

        let outcomes = join_all(pending.into_iter().map(PendingRefresh::wait)).await;
        for outcome in outcomes {
            let err = assert_err!(outcome);
            assert_eq!(err.status(), Some(403));
        }
        assert!(!state.is_refreshing());
    }

    #[tokio::test]
    async fn test_dropped_lease_aborts_waiters_and_resets() {
        let state = SessionState::new();
        let lease = leader(&state);
        let pending = waiter(&state);

        drop(lease);

        assert!(matches!(
            pending.wait().await,
            Err(DealershipError::Auth(AuthError::RefreshAborted))
        ));
        assert!(!state.is_refreshing());

        // The next caller starts a new refresh.
        let _next = leader(&state);
    }

    #[tokio::test]
    async fn test_settled_waiters_receive_in_arrival_order() {
        let state = SessionState::new();
        let lease = leader(&state);
        let mut pending: Vec<_> = (0..4).map(|_| waiter(&state)).collect();

        lease.resolve("A2".to_string());

        // Every receiver is already settled; none has to wait on another.
        for (index, p) in pending.iter_mut().enumerate() {
            assert_eq!(p.position(), index + 1);
            assert_eq!(p.rx.try_recv().unwrap().unwrap(), "A2");
        }
    }
}
