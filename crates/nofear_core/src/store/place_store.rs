//! Place store use-case entry points.
//!
//! # Responsibility
//! - Own the place collection, selection cursor, viewport and unlock gate.
//! - Load once at construction and save on explicit request.
//! - Notify subscribers after every observable change.
//!
//! # Invariants
//! - `places` keeps insertion order and holds each id at most once after
//!   load; `add` always mints a fresh id and `update` refuses ids held by
//!   another slot.
//! - No public operation returns an error; failures are logged, recorded
//!   and published as events.
//! - Gate transitions from authenticator replies are applied only in
//!   `process_auth_events`, on the context that owns the store.

use crate::auth::gate::{BeginOutcome, Gate};
use crate::auth::{AuthFailure, Authenticator, GateState, UiWaker, UNLOCK_REASON};
use crate::model::place::{Place, PlaceId};
use crate::model::region::{Coordinate, MapRegion};
use crate::store::events::{StoreEvent, Subscribers};
use crate::store::file::PlaceFile;
use crate::store::PersistResult;
use log::{debug, error, info, warn};
use std::sync::mpsc::Receiver;

/// Single owner of the durable place list and the unlock gate.
pub struct PlaceStore {
    file: PlaceFile,
    places: Vec<Place>,
    selection: Option<Place>,
    viewport: MapRegion,
    gate: Gate,
    subscribers: Subscribers,
}

impl PlaceStore {
    /// Opens the store, loading whatever `file` currently holds.
    ///
    /// A missing, unreadable or corrupt file yields an empty collection.
    /// The gate always starts `Locked`.
    pub fn initialize(file: PlaceFile) -> Self {
        let places = match file.load() {
            Ok(places) => {
                info!(
                    "event=places_load module=store status=ok count={}",
                    places.len()
                );
                places
            }
            Err(err) if err.is_not_found() => {
                info!("event=places_load module=store status=empty reason=not_found");
                Vec::new()
            }
            Err(err) => {
                warn!(
                    "event=places_load module=store status=error error_code=load_failed error={}",
                    err
                );
                Vec::new()
            }
        };

        Self {
            file,
            places,
            selection: None,
            viewport: MapRegion::default(),
            gate: Gate::new(),
            subscribers: Subscribers::default(),
        }
    }

    pub fn file(&self) -> &PlaceFile {
        &self.file
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn place(&self, id: PlaceId) -> Option<&Place> {
        self.places.iter().find(|place| place.id == id)
    }

    /// Receives every event published after this call.
    pub fn subscribe(&mut self) -> Receiver<StoreEvent> {
        self.subscribers.subscribe()
    }

    pub fn viewport(&self) -> MapRegion {
        self.viewport
    }

    pub fn set_viewport(&mut self, region: MapRegion) {
        self.viewport = region;
    }

    pub fn selection(&self) -> Option<&Place> {
        self.selection.as_ref()
    }

    /// Sets or clears the place being edited.
    pub fn select(&mut self, place: Option<Place>) {
        self.selection = place;
        self.subscribers.publish(StoreEvent::SelectionChanged);
    }

    /// Appends a default place at the current viewport center.
    ///
    /// Not persisted until `save`.
    pub fn add(&mut self) -> PlaceId {
        self.add_at(self.viewport.center)
    }

    /// Appends a default place at `center`.
    pub fn add_at(&mut self, center: Coordinate) -> PlaceId {
        let place = Place::new(center);
        let id = place.id;
        self.places.push(place);
        debug!(
            "event=place_add module=store status=ok count={}",
            self.places.len()
        );
        self.subscribers.publish(StoreEvent::PlacesChanged);
        id
    }

    /// Replaces the selected place with `place`.
    ///
    /// The slot is found by the *selection's* id, not by `place.id`, and
    /// `place` is written in full. The stored id can therefore change.
    /// Returns `false` (and changes nothing) when there is no selection,
    /// the selected id is not in the collection, or `place.id` already
    /// belongs to a different slot.
    pub fn update(&mut self, place: Place) -> bool {
        let Some(selected) = self.selection.as_ref() else {
            debug!("event=place_update module=store status=skipped reason=no_selection");
            return false;
        };
        let Some(index) = self.places.iter().position(|item| item == selected) else {
            debug!("event=place_update module=store status=skipped reason=not_found");
            return false;
        };
        if let Some(other) = self.places.iter().position(|item| item.id == place.id) {
            if other != index {
                warn!(
                    "event=place_update module=store status=rejected reason=duplicate_id index={index} other={other}"
                );
                return false;
            }
        }

        self.places[index] = place;
        debug!("event=place_update module=store status=ok index={index}");
        self.subscribers.publish(StoreEvent::PlacesChanged);
        true
    }

    /// Removes one place by id, keeping the order of the rest.
    ///
    /// Clears the selection if it pointed at the removed place.
    pub fn remove(&mut self, id: PlaceId) -> Option<Place> {
        let index = self.places.iter().position(|place| place.id == id)?;
        let removed = self.places.remove(index);
        debug!(
            "event=place_remove module=store status=ok count={}",
            self.places.len()
        );
        self.subscribers.publish(StoreEvent::PlacesChanged);

        if self.selection.as_ref().is_some_and(|selected| selected.id == id) {
            self.select(None);
        }
        Some(removed)
    }

    /// Writes the whole collection to disk.
    ///
    /// Failures are logged and published as `StoreEvent::SaveFailed`.
    pub fn save(&mut self) {
        let _ = self.try_save();
    }

    /// Same as `save`, but also hands the error back to the caller.
    ///
    /// Subscribers see `Saved`/`SaveFailed` either way.
    pub fn try_save(&mut self) -> PersistResult<()> {
        let result = self.file.save(&self.places);
        match &result {
            Ok(()) => self.subscribers.publish(StoreEvent::Saved {
                count: self.places.len(),
            }),
            Err(err) => {
                error!(
                    "event=places_save module=store status=error error_code=save_failed error={}",
                    err
                );
                self.subscribers
                    .publish(StoreEvent::SaveFailed(err.to_string()));
            }
        }
        result
    }

    pub fn gate(&self) -> GateState {
        self.gate.state()
    }

    pub fn is_unlocked(&self) -> bool {
        self.gate.state() == GateState::Unlocked
    }

    /// Reason the most recent unlock attempt did not unlock, if any.
    pub fn last_auth_failure(&self) -> Option<&AuthFailure> {
        self.gate.last_failure()
    }

    /// Installs the hook called when an authenticator reply is queued.
    pub fn set_ui_waker(&mut self, waker: Option<UiWaker>) {
        self.gate.set_waker(waker);
    }

    /// Starts an unlock attempt if locked and biometrics are available.
    ///
    /// The outcome is applied by a later `process_auth_events` call, even
    /// when the authenticator answers synchronously.
    pub fn authenticate(&mut self, authenticator: &dyn Authenticator) {
        match self.gate.begin(authenticator, UNLOCK_REASON) {
            BeginOutcome::Started => self
                .subscribers
                .publish(StoreEvent::GateChanged(GateState::Authenticating)),
            BeginOutcome::Ignored => {}
            BeginOutcome::Unavailable(failure) => {
                self.subscribers.publish(StoreEvent::AuthFailed(failure))
            }
        }
    }

    /// Applies queued authenticator replies to the gate.
    ///
    /// Call on the store's owning context, typically from the `UiWaker`
    /// hand-off. Returns how many replies changed the gate.
    pub fn process_auth_events(&mut self) -> usize {
        let applied = self.gate.drain();
        for result in &applied {
            match result {
                Ok(()) => self
                    .subscribers
                    .publish(StoreEvent::GateChanged(GateState::Unlocked)),
                Err(failure) => {
                    self.subscribers
                        .publish(StoreEvent::GateChanged(GateState::Locked));
                    self.subscribers
                        .publish(StoreEvent::AuthFailed(failure.clone()));
                }
            }
        }
        applied.len()
    }
}

impl std::fmt::Debug for PlaceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaceStore")
            .field("file", &self.file)
            .field("places", &self.places.len())
            .field("gate", &self.gate.state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::PlaceStore;
    use crate::model::region::{Coordinate, CoordinateSpan, MapRegion};
    use crate::store::events::StoreEvent;
    use crate::store::file::PlaceFile;
    use tempfile::TempDir;

    fn empty_store(dir: &TempDir) -> PlaceStore {
        PlaceStore::initialize(PlaceFile::at(dir.path().join("SavedPlaces")))
    }

    #[test]
    fn add_uses_viewport_center() {
        let dir = TempDir::new().expect("temp dir");
        let mut store = empty_store(&dir);
        store.set_viewport(MapRegion::new(
            Coordinate::new(-33.86, 151.21),
            CoordinateSpan {
                latitude_delta: 1.0,
                longitude_delta: 1.0,
            },
        ));

        let id = store.add();
        let place = store.place(id).expect("added place");
        assert_eq!(place.coordinate(), Coordinate::new(-33.86, 151.21));
    }

    #[test]
    fn add_does_not_touch_disk() {
        let dir = TempDir::new().expect("temp dir");
        let mut store = empty_store(&dir);
        store.add();
        assert!(!store.file().path().exists());
    }

    #[test]
    fn update_publishes_places_changed() {
        let dir = TempDir::new().expect("temp dir");
        let mut store = empty_store(&dir);
        let id = store.add();
        let selected = store.place(id).cloned();
        store.select(selected.clone());
        let events = store.subscribe();

        let edited = selected.expect("selected").renamed("Home", "");
        assert!(store.update(edited));
        assert_eq!(events.try_recv(), Ok(StoreEvent::PlacesChanged));
    }

    #[test]
    fn try_save_publishes_the_same_events_as_save() {
        let dir = TempDir::new().expect("temp dir");
        let mut store = empty_store(&dir);
        store.add();
        let events = store.subscribe();

        store.try_save().expect("save");
        assert_eq!(events.try_recv(), Ok(StoreEvent::Saved { count: 1 }));

        store.add_at(Coordinate::new(f64::NAN, 0.0));
        let _ = events.try_recv();
        assert!(store.try_save().is_err());
        assert!(matches!(events.try_recv(), Ok(StoreEvent::SaveFailed(_))));
    }
}
