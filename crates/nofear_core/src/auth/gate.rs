//! Gate state machine driven by authenticator completions.

use crate::auth::reply::{AuthCompletion, AuthReply, UiWaker};
use crate::auth::{AuthFailure, AuthResult, Authenticator, BiometryAvailability, GateState};
use log::{debug, info, warn};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

/// Result of asking the gate to start an unlock attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BeginOutcome {
    Started,
    /// Already authenticating or unlocked.
    Ignored,
    Unavailable(AuthFailure),
}

pub(crate) struct Gate {
    state: GateState,
    attempt: u64,
    last_failure: Option<AuthFailure>,
    tx: Sender<AuthCompletion>,
    rx: Receiver<AuthCompletion>,
    waker: Option<UiWaker>,
}

impl Gate {
    pub(crate) fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            state: GateState::Locked,
            attempt: 0,
            last_failure: None,
            tx,
            rx,
            waker: None,
        }
    }

    pub(crate) fn state(&self) -> GateState {
        self.state
    }

    pub(crate) fn last_failure(&self) -> Option<&AuthFailure> {
        self.last_failure.as_ref()
    }

    pub(crate) fn set_waker(&mut self, waker: Option<UiWaker>) {
        self.waker = waker;
    }

    pub(crate) fn begin(
        &mut self,
        authenticator: &dyn Authenticator,
        reason: &str,
    ) -> BeginOutcome {
        if self.state != GateState::Locked {
            debug!(
                "event=auth_begin module=auth status=ignored state={}",
                self.state.as_str()
            );
            return BeginOutcome::Ignored;
        }

        if let BiometryAvailability::Unavailable(detail) = authenticator.availability() {
            info!("event=auth_begin module=auth status=unavailable");
            let failure = AuthFailure::Unavailable(detail);
            self.last_failure = Some(failure.clone());
            return BeginOutcome::Unavailable(failure);
        }

        self.attempt += 1;
        self.state = GateState::Authenticating;
        self.last_failure = None;
        info!(
            "event=auth_begin module=auth status=started attempt={}",
            self.attempt
        );

        let reply = AuthReply::new(self.attempt, self.tx.clone(), self.waker.clone());
        authenticator.evaluate(reason, reply);
        BeginOutcome::Started
    }

    /// Applies every queued completion; returns the ones that changed state.
    pub(crate) fn drain(&mut self) -> Vec<AuthResult> {
        let mut applied = Vec::new();
        loop {
            let completion = match self.rx.try_recv() {
                Ok(completion) => completion,
                // The gate holds a sender itself, so Disconnected cannot occur.
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            };

            if self.state != GateState::Authenticating || completion.attempt != self.attempt {
                debug!(
                    "event=auth_complete module=auth status=stale attempt={} current={}",
                    completion.attempt, self.attempt
                );
                continue;
            }

            match &completion.result {
                Ok(()) => {
                    self.state = GateState::Unlocked;
                    info!(
                        "event=auth_complete module=auth status=ok attempt={}",
                        completion.attempt
                    );
                }
                Err(failure) => {
                    self.state = GateState::Locked;
                    self.last_failure = Some(failure.clone());
                    warn!(
                        "event=auth_complete module=auth status=error attempt={} error_code={}",
                        completion.attempt,
                        failure.code()
                    );
                }
            }
            applied.push(completion.result);
        }
        applied
    }
}
