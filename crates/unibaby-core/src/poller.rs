//! Payment status polling after the hosted payment page returns.
//!
//! The poll loop is sequential: a request, then (if the session is still
//! pending) a fixed delay, then the next request. It stops on the first
//! terminal reply, on the first failed request, or once the attempt budget
//! is spent, so the user never waits longer than `interval * max_attempts`.
//!
//! `spawn_poller` runs the loop as a tokio task behind a `PollHandle`.
//! Dropping the handle aborts the task, so a torn-down view never receives
//! a late update.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::api::StorefrontBackend;
use crate::models::{CheckoutStatus, PaymentStatus};

// ============================================================================
// Constants
// ============================================================================

/// Delay between two status polls
pub const POLL_INTERVAL_MS: u64 = 2000;

/// Attempt ceiling before giving up with a timeout
pub const MAX_POLL_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(POLL_INTERVAL_MS),
            max_attempts: MAX_POLL_ATTEMPTS,
        }
    }
}

/// How a poll chain ended.
#[derive(Debug, Clone, PartialEq)]
pub struct PollReport {
    /// Always terminal
    pub status: PaymentStatus,
    /// Status requests issued
    pub attempts: u32,
    /// The last successful reply, if any
    pub last_reply: Option<CheckoutStatus>,
}

/// Progress messages from a spawned poll chain
#[derive(Debug, Clone, PartialEq)]
pub enum PollUpdate {
    /// About to issue request number `n` (1-based)
    Attempt(u32),
    Finished(PollReport),
}

/// Poll `session_id` until a terminal status. Each attempt is announced on
/// `updates` when given; the final report is returned, not sent.
pub async fn poll_payment_status<B>(
    backend: &B,
    session_id: &str,
    policy: PollPolicy,
    updates: Option<&mpsc::Sender<PollUpdate>>,
) -> PollReport
where
    B: StorefrontBackend + ?Sized,
{
    info!(session_id, "Checking payment status");

    let mut attempts: u32 = 0;
    let mut last_reply = None;

    loop {
        if attempts >= policy.max_attempts {
            warn!(session_id, attempts, "Payment status still pending, giving up");
            return PollReport {
                status: PaymentStatus::Timeout,
                attempts,
                last_reply,
            };
        }

        if let Some(tx) = updates {
            if tx.send(PollUpdate::Attempt(attempts + 1)).await.is_err() {
                debug!(session_id, "Poll update receiver dropped");
            }
        }

        match backend.fetch_checkout_status(session_id).await {
            Ok(reply) => {
                let outcome = reply.outcome();
                debug!(
                    session_id,
                    attempt = attempts + 1,
                    status = ?reply.status,
                    payment_status = ?reply.payment_status,
                    "Payment status received"
                );
                if let Some(status) = outcome {
                    info!(session_id, %status, "Payment status resolved");
                    return PollReport {
                        status,
                        attempts: attempts + 1,
                        last_reply: Some(reply),
                    };
                }
                last_reply = Some(reply);
            }
            Err(e) => {
                error!(error = %e, session_id, "Error checking payment status");
                return PollReport {
                    status: PaymentStatus::Error,
                    attempts: attempts + 1,
                    last_reply,
                };
            }
        }

        tokio::time::sleep(policy.interval).await;
        attempts += 1;
    }
}

/// A running poll chain. Dropping it cancels the chain.
#[derive(Debug)]
pub struct PollHandle {
    session_id: String,
    task: JoinHandle<()>,
}

impl PollHandle {
    #[cfg(test)]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    #[cfg(test)]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub fn cancel(&self) {
        if !self.task.is_finished() {
            debug!(session_id = %self.session_id, "Cancelling payment poll");
        }
        self.task.abort();
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Run `poll_payment_status` on a tokio task, reporting every attempt and
/// the final report through `tx`.
pub fn spawn_poller(
    backend: Arc<dyn StorefrontBackend>,
    session_id: String,
    policy: PollPolicy,
    tx: mpsc::Sender<PollUpdate>,
) -> PollHandle {
    let task_session = session_id.clone();
    let task = tokio::spawn(async move {
        let report = poll_payment_status(backend.as_ref(), &task_session, policy, Some(&tx)).await;
        if tx.send(PollUpdate::Finished(report)).await.is_err() {
            debug!(session_id = %task_session, "Poll update receiver dropped before completion");
        }
    });

    PollHandle { session_id, task }
}

#[cfg(test)]
mod tests {
    use tokio::time::Instant;

    use super::*;
    use crate::api::fake::{expired, paid, pending, FakeBackend};

    #[tokio::test(start_paused = true)]
    async fn test_always_pending_times_out_after_five_attempts() {
        let backend = FakeBackend::new();
        let start = Instant::now();

        let report = poll_payment_status(&backend, "cs_test_1", PollPolicy::default(), None).await;

        assert_eq!(report.status, PaymentStatus::Timeout);
        assert_eq!(report.attempts, 5);
        assert_eq!(backend.status_calls(), 5);
        assert_eq!(start.elapsed(), Duration::from_millis(5 * POLL_INTERVAL_MS));
        assert!(report.last_reply.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_four_pending_then_silence_never_sends_sixth_request() {
        let backend = FakeBackend::new().with_statuses(vec![pending(), pending(), pending(), pending()]);

        let report = poll_payment_status(&backend, "cs_test_1", PollPolicy::default(), None).await;
        assert_eq!(report.status, PaymentStatus::Timeout);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(backend.status_calls(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_paid_on_second_attempt_stops() {
        let backend = FakeBackend::new().with_statuses(vec![pending(), paid()]);
        let start = Instant::now();

        let report = poll_payment_status(&backend, "cs_test_1", PollPolicy::default(), None).await;

        assert_eq!(report.status, PaymentStatus::Success);
        assert_eq!(report.attempts, 2);
        assert_eq!(backend.status_calls(), 2);
        assert_eq!(start.elapsed(), Duration::from_millis(POLL_INTERVAL_MS));
        assert_eq!(report.last_reply.unwrap().amount_total, Some(1_800_000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_on_first_attempt_stops() {
        let backend = FakeBackend::new().with_statuses(vec![expired()]);
        let start = Instant::now();

        let report = poll_payment_status(&backend, "cs_test_1", PollPolicy::default(), None).await;

        assert_eq!(report.status, PaymentStatus::Expired);
        assert_eq!(backend.status_calls(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_failure_is_terminal_error() {
        let backend = FakeBackend::new().with_statuses(vec![pending(), Err("Payment transaction not found".into())]);

        let report = poll_payment_status(&backend, "cs_test_1", PollPolicy::default(), None).await;

        assert_eq!(report.status, PaymentStatus::Error);
        assert_eq!(report.attempts, 2);
        assert_eq!(backend.status_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_the_given_session() {
        let backend = FakeBackend::new().with_statuses(vec![paid()]);
        poll_payment_status(&backend, "cs_live_xyz", PollPolicy::default(), None).await;
        assert_eq!(*backend.polled_sessions.lock().unwrap(), vec!["cs_live_xyz".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_poller_reports_attempts_then_result() {
        let backend = Arc::new(FakeBackend::new().with_statuses(vec![pending(), pending(), paid()]));
        let (tx, mut rx) = mpsc::channel(16);

        let handle = spawn_poller(backend.clone(), "cs_test_1".into(), PollPolicy::default(), tx);
        assert_eq!(handle.session_id(), "cs_test_1");

        let mut updates = Vec::new();
        while let Some(update) = rx.recv().await {
            updates.push(update);
        }

        assert_eq!(updates.len(), 4);
        assert_eq!(updates[0], PollUpdate::Attempt(1));
        assert_eq!(updates[2], PollUpdate::Attempt(3));
        match &updates[3] {
            PollUpdate::Finished(report) => {
                assert_eq!(report.status, PaymentStatus::Success);
                assert_eq!(report.attempts, 3);
            }
            other => panic!("expected Finished, got {:?}", other),
        }
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_stops_polling() {
        let backend = Arc::new(FakeBackend::new());
        let (tx, mut rx) = mpsc::channel(16);

        let handle = spawn_poller(backend.clone(), "cs_test_1".into(), PollPolicy::default(), tx);
        assert_eq!(rx.recv().await, Some(PollUpdate::Attempt(1)));

        drop(handle);
        let calls_at_drop = backend.status_calls();
        assert!(calls_at_drop <= 1);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(backend.status_calls(), calls_at_drop);
        // The aborted task dropped its sender without a final report
        assert_eq!(rx.recv().await, None);
    }
}
