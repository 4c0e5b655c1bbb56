//! One-shot completion handle passed to authenticators.

use crate::auth::{AuthFailure, AuthResult};
use std::fmt::{Debug, Formatter};
use std::sync::mpsc::Sender;
use std::sync::Arc;

/// Hook that schedules `process_auth_events` on the UI context.
///
/// Called from whatever thread completed the reply, right after the outcome
/// is queued. Hosts typically post a task to their main loop here.
pub type UiWaker = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug)]
pub(crate) struct AuthCompletion {
    pub(crate) attempt: u64,
    pub(crate) result: AuthResult,
}

/// Reply slot for exactly one unlock attempt.
///
/// Completing consumes the reply. Dropping it unanswered reports
/// `AuthFailure::Abandoned` so the gate cannot stay `Authenticating`.
pub struct AuthReply {
    attempt: u64,
    tx: Option<Sender<AuthCompletion>>,
    waker: Option<UiWaker>,
}

impl AuthReply {
    pub(crate) fn new(attempt: u64, tx: Sender<AuthCompletion>, waker: Option<UiWaker>) -> Self {
        Self {
            attempt,
            tx: Some(tx),
            waker,
        }
    }

    pub fn succeed(self) {
        self.complete(Ok(()));
    }

    pub fn fail(self, failure: AuthFailure) {
        self.complete(Err(failure));
    }

    pub fn complete(mut self, result: AuthResult) {
        self.deliver(result);
    }

    fn deliver(&mut self, result: AuthResult) {
        let Some(tx) = self.tx.take() else {
            return;
        };
        // Store gone: nobody left to unlock.
        if tx
            .send(AuthCompletion {
                attempt: self.attempt,
                result,
            })
            .is_err()
        {
            return;
        }
        if let Some(waker) = &self.waker {
            waker();
        }
    }
}

impl Drop for AuthReply {
    fn drop(&mut self) {
        self.deliver(Err(AuthFailure::Abandoned));
    }
}

impl Debug for AuthReply {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthReply")
            .field("attempt", &self.attempt)
            .field("pending", &self.tx.is_some())
            .finish_non_exhaustive()
    }
}
