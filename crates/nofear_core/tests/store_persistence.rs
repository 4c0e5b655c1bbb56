use nofear_core::{
    Coordinate, PersistError, Place, PlaceFile, PlaceStore, StoreConfig, StoreEvent,
    SAVE_FILE_NAME,
};
use std::fs;
use tempfile::TempDir;
use uuid::Uuid;

fn file_in(dir: &TempDir) -> PlaceFile {
    PlaceFile::from_config(&StoreConfig::in_dir(dir.path()))
}

#[test]
fn save_then_initialize_roundtrips_order_ids_and_fields() {
    let dir = TempDir::new().unwrap();
    let mut store = PlaceStore::initialize(file_in(&dir));

    let coordinates = [
        Coordinate::new(51.501, -0.141),
        Coordinate::new(-33.856_784_123_456_78, 151.215_297_987_654_32),
        Coordinate::new(0.1 + 0.2, -179.999_999_999),
    ];
    for coordinate in coordinates {
        store.add_at(coordinate);
    }
    let expected = store.places().to_vec();
    store.try_save().unwrap();

    let reloaded = PlaceStore::initialize(file_in(&dir));
    assert_eq!(reloaded.places().len(), expected.len());
    for (loaded, original) in reloaded.places().iter().zip(&expected) {
        assert_eq!(loaded.id, original.id);
        assert_eq!(loaded.name, original.name);
        assert_eq!(loaded.description, original.description);
        assert_eq!(loaded.latitude(), original.latitude());
        assert_eq!(loaded.longitude(), original.longitude());
    }
}

#[test]
fn save_writes_to_fixed_file_name() {
    let dir = TempDir::new().unwrap();
    let mut store = PlaceStore::initialize(file_in(&dir));
    store.add();
    store.save();

    assert!(dir.path().join(SAVE_FILE_NAME).is_file());
}

#[test]
fn missing_file_initializes_empty() {
    let dir = TempDir::new().unwrap();
    let store = PlaceStore::initialize(file_in(&dir));
    assert!(store.places().is_empty());
}

#[test]
fn corrupt_file_initializes_empty() {
    let dir = TempDir::new().unwrap();
    let file = file_in(&dir);

    for content in [
        "not json".to_string(),
        "{\"id\": 1}".to_string(),
        "[{\"id\":\"not-a-uuid\",\"name\":\"\",\"description\":\"\",\"latitude\":0,\"longitude\":0}]"
            .to_string(),
        String::from_utf8_lossy(&[0xff, 0xfe, 0x00]).into_owned(),
    ] {
        fs::write(file.path(), content).unwrap();
        let store = PlaceStore::initialize(file.clone());
        assert!(store.places().is_empty());
    }
}

#[test]
fn duplicate_ids_on_disk_keep_first_record_and_the_rest() {
    let dir = TempDir::new().unwrap();
    let file = file_in(&dir);
    let id = Uuid::new_v4();
    let other = Place::new(Coordinate::new(3.0, 3.0));
    let places = vec![
        Place::with_id(id, "a", "", Coordinate::new(1.0, 1.0)),
        other.clone(),
        Place::with_id(id, "b", "", Coordinate::new(2.0, 2.0)),
    ];
    fs::write(file.path(), serde_json::to_vec(&places).unwrap()).unwrap();

    let store = PlaceStore::initialize(file);
    let ids: Vec<_> = store.places().iter().map(|place| place.id).collect();
    assert_eq!(ids, vec![id, other.id]);
    assert_eq!(store.places()[0].name, "a");
}

#[test]
fn non_finite_coordinate_fails_save_and_keeps_previous_file() {
    let dir = TempDir::new().unwrap();
    let mut store = PlaceStore::initialize(file_in(&dir));
    store.add();
    store.add();
    store.try_save().unwrap();

    for bad in [
        Coordinate::new(f64::NAN, 0.0),
        Coordinate::new(0.0, f64::INFINITY),
        Coordinate::new(f64::NEG_INFINITY, f64::NAN),
    ] {
        let id = store.add_at(bad);
        let err = store.try_save().unwrap_err();
        assert!(matches!(err, PersistError::NonFiniteCoordinate(rejected) if rejected == id));
        store.remove(id).unwrap();

        let reloaded = PlaceStore::initialize(file_in(&dir));
        assert_eq!(reloaded.places().len(), 2);
    }
}

#[test]
fn boundary_numbers_and_unicode_text_roundtrip_exactly() {
    let dir = TempDir::new().unwrap();
    let mut store = PlaceStore::initialize(file_in(&dir));

    let coordinates = [
        Coordinate::new(90.0, 180.0),
        Coordinate::new(-90.0, -180.0),
        Coordinate::new(f64::MIN_POSITIVE / 2.0, -f64::MIN_POSITIVE / 4.0),
        Coordinate::new(0.1 + 0.2, 1.0 / 3.0),
        Coordinate::new(f64::MAX, f64::MIN),
        Coordinate::new(f64::EPSILON, 5e-324),
    ];
    let texts = [
        ("Café Zürich ☕", "große Straße"),
        ("東京タワー", "芝公園 4-2-8"),
        ("🏔️ base camp", "\"quoted\"\nline\tbreak"),
        ("", ""),
        ("Ελληνικά", "\u{0}nul and \u{7f}del"),
        ("مرحبا", "עברית"),
    ];
    for (coordinate, (name, description)) in coordinates.into_iter().zip(texts) {
        let id = store.add_at(coordinate);
        let selected = store.place(id).cloned().unwrap();
        store.select(Some(selected.clone()));
        assert!(store.update(selected.renamed(name, description)));
    }
    let expected = store.places().to_vec();
    store.try_save().unwrap();

    let reloaded = PlaceStore::initialize(file_in(&dir));
    assert_eq!(reloaded.places().len(), expected.len());
    for (loaded, original) in reloaded.places().iter().zip(&expected) {
        assert_eq!(loaded.id, original.id);
        assert_eq!(loaded.name, original.name);
        assert_eq!(loaded.description, original.description);
        assert_eq!(loaded.latitude().to_bits(), original.latitude().to_bits());
        assert_eq!(loaded.longitude().to_bits(), original.longitude().to_bits());
    }
}

#[test]
fn save_replaces_previous_content_and_leaves_no_temp_files() {
    let dir = TempDir::new().unwrap();
    let mut store = PlaceStore::initialize(file_in(&dir));
    store.add();
    store.add();
    store.try_save().unwrap();

    let first = store.places()[0].id;
    store.remove(first).unwrap();
    store.try_save().unwrap();

    let reloaded = PlaceStore::initialize(file_in(&dir));
    assert_eq!(reloaded.places().len(), 1);

    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[cfg(unix)]
#[test]
fn saved_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let mut store = PlaceStore::initialize(file_in(&dir));
    store.add();
    store.try_save().unwrap();

    let mode = fs::metadata(store.file().path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn save_failure_is_published_not_raised() {
    let dir = TempDir::new().unwrap();
    // A regular file where the parent directory should be.
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, b"x").unwrap();
    let mut store = PlaceStore::initialize(PlaceFile::at(blocker.join(SAVE_FILE_NAME)));
    let events = store.subscribe();

    store.add();
    store.save();

    let received: Vec<_> = events.try_iter().collect();
    assert!(received.contains(&StoreEvent::PlacesChanged));
    assert!(received
        .iter()
        .any(|event| matches!(event, StoreEvent::SaveFailed(_))));
}

#[test]
fn successful_save_publishes_count() {
    let dir = TempDir::new().unwrap();
    let mut store = PlaceStore::initialize(file_in(&dir));
    store.add();
    store.add();
    let events = store.subscribe();

    store.save();

    assert_eq!(events.try_recv(), Ok(StoreEvent::Saved { count: 2 }));
}
