//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the place store and unlock gate as sync, use-case level calls.
//! - Bridge the Dart-side biometric prompt into the core `Authenticator`
//!   seam.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - One store instance per process, owned behind a mutex; Dart calls it
//!   from the UI isolate only.
//! - `unlock_complete` never touches the store, so it is safe from any
//!   isolate or platform thread.

use log::{info, warn};
use nofear_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AuthFailure, AuthReply, Authenticator, BiometryAvailability, Coordinate, GateState, Place,
    PlaceFile, PlaceId, PlaceStore, StoreConfig,
};
use std::sync::Mutex;
use uuid::Uuid;

static STORE: Mutex<Option<PlaceStore>> = Mutex::new(None);
static PENDING_REPLY: Mutex<Option<AuthReply>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Place row as seen by Dart.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceItem {
    /// Stable place ID in string form.
    pub id: String,
    pub name: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Snapshot of the whole place list.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacesResponse {
    pub ok: bool,
    pub items: Vec<PlaceItem>,
    pub message: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceActionResponse {
    pub ok: bool,
    /// Affected place ID, when the action targets one place.
    pub place_id: Option<String>,
    pub message: String,
}

impl PlaceActionResponse {
    fn success(message: impl Into<String>, place_id: Option<String>) -> Self {
        Self {
            ok: true,
            place_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            place_id: None,
            message: message.into(),
        }
    }
}

/// Unlock gate snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateResponse {
    /// `locked|authenticating|unlocked`.
    pub state: String,
    /// Reason code of the last failed attempt (`user_cancel`, `rejected`, ...).
    pub failure_code: Option<String>,
    pub message: String,
}

/// Opens (or reopens) the place store.
///
/// `data_dir` overrides the configured location; `None` or blank uses
/// `NOFEAR_DATA_DIR` and then the platform data directory. A missing or
/// corrupt file opens as an empty list.
#[flutter_rust_bridge::frb(sync)]
pub fn places_open(data_dir: Option<String>) -> PlacesResponse {
    let config = match data_dir.as_deref().map(str::trim) {
        Some(dir) if !dir.is_empty() => StoreConfig::in_dir(dir),
        _ => match StoreConfig::from_env() {
            Ok(config) => config,
            Err(err) => return places_failure(format!("places_open failed: {err}")),
        },
    };

    let store = PlaceStore::initialize(PlaceFile::from_config(&config));
    let items = store.places().iter().map(to_place_item).collect::<Vec<_>>();
    let message = format!("Opened {} place(s).", items.len());

    match STORE.lock() {
        Ok(mut slot) => {
            *slot = Some(store);
            PlacesResponse {
                ok: true,
                items,
                message,
            }
        }
        Err(_) => places_failure("places_open failed: store lock poisoned"),
    }
}

/// Lists places in insertion order.
#[flutter_rust_bridge::frb(sync)]
pub fn places_list() -> PlacesResponse {
    match with_store(|store| store.places().iter().map(to_place_item).collect::<Vec<_>>()) {
        Ok(items) => PlacesResponse {
            ok: true,
            message: format!("{} place(s).", items.len()),
            items,
        },
        Err(err) => places_failure(format!("places_list failed: {err}")),
    }
}

/// Drops a default place at the map center the UI currently shows.
///
/// Not persisted until `places_save`.
#[flutter_rust_bridge::frb(sync)]
pub fn place_add(latitude: f64, longitude: f64) -> PlaceActionResponse {
    let center = match finite_coordinate(latitude, longitude) {
        Ok(center) => center,
        Err(err) => return PlaceActionResponse::failure(format!("place_add failed: {err}")),
    };
    match with_store(|store| store.add_at(center)) {
        Ok(id) => PlaceActionResponse::success("Place added.", Some(id.to_string())),
        Err(err) => PlaceActionResponse::failure(format!("place_add failed: {err}")),
    }
}

/// Opens (`Some(id)`) or closes (`None`) the edit surface selection.
#[flutter_rust_bridge::frb(sync)]
pub fn place_select(place_id: Option<String>) -> PlaceActionResponse {
    let id = match place_id.as_deref().map(parse_place_id).transpose() {
        Ok(id) => id,
        Err(err) => return PlaceActionResponse::failure(format!("place_select failed: {err}")),
    };

    let result = with_store(|store| -> Result<Option<String>, &'static str> {
        let Some(id) = id else {
            store.select(None);
            return Ok(None);
        };
        let place = store.place(id).cloned().ok_or("place not found")?;
        store.select(Some(place));
        Ok(Some(id.to_string()))
    });

    match result {
        Ok(Ok(selected)) => PlaceActionResponse::success("Selection updated.", selected),
        Ok(Err(reason)) => PlaceActionResponse::failure(format!("place_select failed: {reason}")),
        Err(err) => PlaceActionResponse::failure(format!("place_select failed: {err}")),
    }
}

/// Writes back the edited place into the selected slot.
///
/// Mirrors core `update`: the slot is the current selection, and `item`
/// replaces it in full. `ok=false` when nothing was selected, when the
/// coordinate is not finite, or when `item.id` belongs to another place.
#[flutter_rust_bridge::frb(sync)]
pub fn place_update(item: PlaceItem) -> PlaceActionResponse {
    let place = match from_place_item(&item) {
        Ok(place) => place,
        Err(err) => return PlaceActionResponse::failure(format!("place_update failed: {err}")),
    };

    match with_store(|store| store.update(place)) {
        Ok(true) => PlaceActionResponse::success("Place updated.", Some(item.id)),
        Ok(false) => {
            PlaceActionResponse::failure("place_update skipped: no matching selection or id in use")
        }
        Err(err) => PlaceActionResponse::failure(format!("place_update failed: {err}")),
    }
}

/// Removes one place by ID.
#[flutter_rust_bridge::frb(sync)]
pub fn place_remove(place_id: String) -> PlaceActionResponse {
    let id = match parse_place_id(&place_id) {
        Ok(id) => id,
        Err(err) => return PlaceActionResponse::failure(format!("place_remove failed: {err}")),
    };

    match with_store(|store| store.remove(id)) {
        Ok(Some(_)) => PlaceActionResponse::success("Place removed.", Some(id.to_string())),
        Ok(None) => PlaceActionResponse::failure("place_remove failed: place not found"),
        Err(err) => PlaceActionResponse::failure(format!("place_remove failed: {err}")),
    }
}

/// Persists the whole list atomically.
#[flutter_rust_bridge::frb(sync)]
pub fn places_save() -> PlaceActionResponse {
    // `try_save` logs and publishes `Saved`/`SaveFailed` itself.
    match with_store(|store| store.try_save().map(|()| store.places().len())) {
        Ok(Ok(count)) => PlaceActionResponse::success(format!("Saved {count} place(s)."), None),
        Ok(Err(err)) => PlaceActionResponse::failure(format!("places_save failed: {err}")),
        Err(err) => PlaceActionResponse::failure(format!("places_save failed: {err}")),
    }
}

/// Current unlock gate state.
#[flutter_rust_bridge::frb(sync)]
pub fn gate_state() -> GateResponse {
    match with_store(|store| gate_snapshot(store)) {
        Ok(response) => response,
        Err(err) => gate_failure(format!("gate_state failed: {err}")),
    }
}

/// Starts an unlock attempt.
///
/// Dart first asks the platform whether biometrics can be used and passes
/// the answer here. When the gate moves to `authenticating`, Dart shows the
/// system prompt and reports back through `unlock_complete`.
#[flutter_rust_bridge::frb(sync)]
pub fn unlock_begin(
    biometry_available: bool,
    unavailable_reason: Option<String>,
) -> GateResponse {
    let authenticator = DartAuthenticator {
        available: biometry_available,
        unavailable_reason: unavailable_reason.unwrap_or_default(),
    };

    match with_store(|store| {
        store.authenticate(&authenticator);
        gate_snapshot(store)
    }) {
        Ok(response) => response,
        Err(err) => gate_failure(format!("unlock_begin failed: {err}")),
    }
}

/// Reports the result of the Dart-side biometric prompt.
///
/// May be called from any thread. The gate changes on the next `gate_poll`.
#[flutter_rust_bridge::frb(sync)]
pub fn unlock_complete(
    success: bool,
    failure_code: Option<String>,
    detail: Option<String>,
) -> bool {
    let reply = match PENDING_REPLY.lock() {
        Ok(mut slot) => slot.take(),
        Err(_) => {
            warn!("event=ffi_unlock_complete module=ffi status=error reason=lock_poisoned");
            return false;
        }
    };

    let Some(reply) = reply else {
        warn!("event=ffi_unlock_complete module=ffi status=skipped reason=no_pending_attempt");
        return false;
    };

    if success {
        reply.succeed();
    } else {
        reply.fail(parse_failure(failure_code.as_deref(), detail));
    }
    true
}

/// Applies pending unlock results and returns the gate state.
#[flutter_rust_bridge::frb(sync)]
pub fn gate_poll() -> GateResponse {
    match with_store(|store| {
        store.process_auth_events();
        gate_snapshot(store)
    }) {
        Ok(response) => response,
        Err(err) => gate_failure(format!("gate_poll failed: {err}")),
    }
}

/// Authenticator whose prompt runs on the Dart side.
///
/// `evaluate` parks the reply until `unlock_complete` claims it.
struct DartAuthenticator {
    available: bool,
    unavailable_reason: String,
}

impl Authenticator for DartAuthenticator {
    fn availability(&self) -> BiometryAvailability {
        if self.available {
            BiometryAvailability::Available
        } else {
            BiometryAvailability::Unavailable(self.unavailable_reason.clone())
        }
    }

    fn evaluate(&self, _reason: &str, reply: AuthReply) {
        match PENDING_REPLY.lock() {
            Ok(mut slot) => {
                info!("event=ffi_unlock_begin module=ffi status=pending");
                *slot = Some(reply);
            }
            // Dropping the reply reports an abandoned attempt.
            Err(_) => warn!("event=ffi_unlock_begin module=ffi status=error reason=lock_poisoned"),
        }
    }
}

fn with_store<T>(f: impl FnOnce(&mut PlaceStore) -> T) -> Result<T, String> {
    let mut slot = STORE
        .lock()
        .map_err(|_| "store lock poisoned".to_string())?;
    let store = slot
        .as_mut()
        .ok_or_else(|| "store not opened; call places_open first".to_string())?;
    Ok(f(store))
}

fn gate_snapshot(store: &PlaceStore) -> GateResponse {
    let state = store.gate();
    let failure = store.last_auth_failure();
    let message = match (state, failure) {
        (GateState::Unlocked, _) => "Places unlocked.".to_string(),
        (_, Some(failure)) => failure.to_string(),
        (GateState::Authenticating, None) => "Waiting for authentication.".to_string(),
        (GateState::Locked, None) => "Places locked.".to_string(),
    };
    GateResponse {
        state: state.as_str().to_string(),
        failure_code: failure.map(|failure| failure.code().to_string()),
        message,
    }
}

fn parse_failure(code: Option<&str>, detail: Option<String>) -> AuthFailure {
    let detail = detail.unwrap_or_default();
    match code.map(str::trim) {
        Some("user_cancel") => AuthFailure::UserCancel,
        Some("rejected") => AuthFailure::Rejected,
        Some("unavailable") => AuthFailure::Unavailable(detail),
        Some("abandoned") => AuthFailure::Abandoned,
        _ => AuthFailure::System(detail),
    }
}

fn parse_place_id(raw: &str) -> Result<PlaceId, String> {
    Uuid::parse_str(raw.trim()).map_err(|_| format!("invalid place id `{raw}`"))
}

fn to_place_item(place: &Place) -> PlaceItem {
    PlaceItem {
        id: place.id.to_string(),
        name: place.name.clone(),
        description: place.description.clone(),
        latitude: place.latitude(),
        longitude: place.longitude(),
    }
}

fn finite_coordinate(latitude: f64, longitude: f64) -> Result<Coordinate, String> {
    let coordinate = Coordinate::new(latitude, longitude);
    if coordinate.is_finite() {
        Ok(coordinate)
    } else {
        Err(format!("non-finite coordinate ({latitude}, {longitude})"))
    }
}

fn from_place_item(item: &PlaceItem) -> Result<Place, String> {
    Ok(Place::with_id(
        parse_place_id(&item.id)?,
        item.name.clone(),
        item.description.clone(),
        finite_coordinate(item.latitude, item.longitude)?,
    ))
}

fn places_failure(message: impl Into<String>) -> PlacesResponse {
    PlacesResponse {
        ok: false,
        items: Vec::new(),
        message: message.into(),
    }
}

fn gate_failure(message: impl Into<String>) -> GateResponse {
    GateResponse {
        state: GateState::Locked.as_str().to_string(),
        failure_code: None,
        message: message.into(),
    }
}
