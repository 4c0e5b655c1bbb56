//! Biometric unlock gate.
//!
//! # Responsibility
//! - Model the `locked -> authenticating -> unlocked` access state machine.
//! - Define the seam to the platform biometric authenticator.
//! - Carry authenticator completions from any thread back to the store.
//!
//! # Invariants
//! - The gate starts `Locked` for every store instance.
//! - `Unlocked` is terminal for a session; there is no re-lock.
//! - Gate state changes only while draining completions on the store's
//!   owning context, never inside an authenticator callback.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub(crate) mod gate;
pub mod reply;

pub use reply::{AuthReply, UiWaker};

/// Prompt shown by the platform biometric dialog.
pub const UNLOCK_REASON: &str = "Please authenticate yourself to unlock your places.";

/// Access gate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    Locked,
    /// A challenge is in flight; waiting for the authenticator reply.
    Authenticating,
    Unlocked,
}

impl GateState {
    /// Stable lowercase label for FFI and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Locked => "locked",
            Self::Authenticating => "authenticating",
            Self::Unlocked => "unlocked",
        }
    }
}

/// Answer to the platform capability query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BiometryAvailability {
    Available,
    /// Not enrolled, no hardware, or disabled by policy.
    Unavailable(String),
}

/// Why an unlock attempt did not unlock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    /// Capability query said no; no challenge was started.
    Unavailable(String),
    UserCancel,
    /// Biometric did not match.
    Rejected,
    System(String),
    /// The authenticator dropped its reply without answering.
    Abandoned,
}

impl Display for AuthFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(detail) => write!(f, "biometric unlock unavailable: {detail}"),
            Self::UserCancel => write!(f, "unlock cancelled by user"),
            Self::Rejected => write!(f, "biometric check failed"),
            Self::System(detail) => write!(f, "authenticator error: {detail}"),
            Self::Abandoned => write!(f, "authenticator never replied"),
        }
    }
}

impl Error for AuthFailure {}

impl AuthFailure {
    /// Stable snake_case code for FFI and logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "unavailable",
            Self::UserCancel => "user_cancel",
            Self::Rejected => "rejected",
            Self::System(_) => "system",
            Self::Abandoned => "abandoned",
        }
    }
}

pub type AuthResult = Result<(), AuthFailure>;

/// Platform identity check (Face ID, Touch ID, fingerprint, ...).
///
/// `evaluate` may answer synchronously or hand `reply` to another thread and
/// answer later. Either way the store only observes the outcome when its
/// owner calls `PlaceStore::process_auth_events`.
pub trait Authenticator {
    fn availability(&self) -> BiometryAvailability;
    fn evaluate(&self, reason: &str, reply: AuthReply);
}

#[cfg(test)]
mod tests {
    use super::{AuthFailure, GateState};

    #[test]
    fn gate_defaults_to_locked() {
        assert_eq!(GateState::default(), GateState::Locked);
    }

    #[test]
    fn failure_codes_are_stable() {
        assert_eq!(AuthFailure::UserCancel.code(), "user_cancel");
        assert_eq!(AuthFailure::System("x".to_string()).code(), "system");
        assert_eq!(AuthFailure::Abandoned.code(), "abandoned");
    }
}
