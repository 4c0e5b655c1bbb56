//! Core domain logic for No Fear List.
//! This crate is the single source of truth for the place list, its file
//! and the unlock gate; UI layers only read state and call operations.

pub mod auth;
pub mod config;
pub mod logging;
pub mod model;
pub mod store;

pub use auth::{
    AuthFailure, AuthReply, AuthResult, Authenticator, BiometryAvailability, GateState, UiWaker,
    UNLOCK_REASON,
};
pub use config::{ConfigError, StoreConfig, DATA_DIR_ENV, SAVE_FILE_NAME};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel};
pub use model::place::{Place, PlaceId, DEFAULT_PLACE_NAME};
pub use model::region::{Coordinate, CoordinateSpan, MapRegion};
pub use store::events::StoreEvent;
pub use store::file::PlaceFile;
pub use store::place_store::PlaceStore;
pub use store::{PersistError, PersistResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
