//! Single-flight coordination of token refreshes
//!
//! When several requests hit a 401 at once only the first one (the leader)
//! calls the refresh endpoint. Everyone arriving while that call is in flight
//! parks on a oneshot channel and receives the leader's outcome. The
//! `refreshing` flag and the waiter list live under one lock, and the flag is
//! cleared in the same critical section that takes the waiters, so a request
//! can never enqueue behind a refresh that has already drained its queue.

use super::types::AuthError;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::debug;

/// Outcome shared with every request that waited on a refresh: the new
/// access token, or the failure that ended the session.
pub type RefreshOutcome = Result<String, Arc<AuthError>>;

#[derive(Default)]
struct RefreshState {
    refreshing: bool,
    waiters: Vec<oneshot::Sender<RefreshOutcome>>,
}

/// Single-flight lock around the refresh call
#[derive(Default)]
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("RefreshCoordinator")
            .field("refreshing", &state.refreshing)
            .field("pending", &state.waiters.len())
            .finish()
    }
}

enum Ticket<'a> {
    Leader(LeaderGuard<'a>),
    Waiter(oneshot::Receiver<RefreshOutcome>),
}

/// Held by the request running the refresh. Dropping it without completing
/// (the leader's future was cancelled) releases the waiters with an error.
struct LeaderGuard<'a> {
    coordinator: &'a RefreshCoordinator,
    completed: bool,
}

impl LeaderGuard<'_> {
    fn complete(mut self, outcome: &RefreshOutcome) -> usize {
        self.completed = true;
        self.coordinator.release(outcome)
    }
}

impl Drop for LeaderGuard<'_> {
    fn drop(&mut self) {
        if !self.completed {
            self.coordinator
                .release(&Err(Arc::new(AuthError::RefreshAbandoned)));
        }
    }
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a refresh is currently in flight
    pub fn is_refreshing(&self) -> bool {
        self.state.lock().refreshing
    }

    /// Number of requests parked behind the refresh in flight
    pub fn pending(&self) -> usize {
        self.state.lock().waiters.len()
    }

    /// Run `refresh` unless one is already in flight, in which case wait for
    /// that one's outcome instead.
    pub async fn run<F, Fut>(&self, refresh: F) -> RefreshOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RefreshOutcome>,
    {
        match self.join() {
            Ticket::Leader(guard) => {
                let outcome = refresh().await;
                let released = guard.complete(&outcome);
                debug!(
                    released,
                    success = outcome.is_ok(),
                    "Refresh finished, released waiting requests"
                );
                outcome
            }
            Ticket::Waiter(receiver) => {
                debug!("Refresh already in flight, waiting for its outcome");
                receiver
                    .await
                    .unwrap_or_else(|_| Err(Arc::new(AuthError::RefreshAbandoned)))
            }
        }
    }

    fn join(&self) -> Ticket<'_> {
        let mut state = self.state.lock();
        if state.refreshing {
            let (sender, receiver) = oneshot::channel();
            state.waiters.push(sender);
            Ticket::Waiter(receiver)
        } else {
            state.refreshing = true;
            Ticket::Leader(LeaderGuard {
                coordinator: self,
                completed: false,
            })
        }
    }

    fn release(&self, outcome: &RefreshOutcome) -> usize {
        let waiters = {
            let mut state = self.state.lock();
            state.refreshing = false;
            std::mem::take(&mut state.waiters)
        };

        let count = waiters.len();
        for waiter in waiters {
            // A waiter whose request was dropped no longer cares.
            let _ = waiter.send(outcome.clone());
        }
        count
    }
}
