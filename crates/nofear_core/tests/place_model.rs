use nofear_core::{Coordinate, Place, DEFAULT_PLACE_NAME};
use std::collections::HashSet;
use uuid::Uuid;

#[test]
fn same_id_means_equal_regardless_of_fields() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let a = Place::with_id(id, "Home", "front door", Coordinate::new(1.0, 2.0));
    let b = Place::with_id(id, "Work", "", Coordinate::new(-40.0, 170.0));

    assert_eq!(a, b);

    let mut set = HashSet::new();
    set.insert(a);
    assert!(!set.insert(b));
}

#[test]
fn different_id_means_unequal_with_identical_fields() {
    let a = Place::with_id(Uuid::new_v4(), "Park", "", Coordinate::new(3.0, 4.0));
    let b = Place::with_id(Uuid::new_v4(), "Park", "", Coordinate::new(3.0, 4.0));

    assert_ne!(a, b);
}

#[test]
fn serialization_uses_expected_wire_fields() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let place = Place::with_id(id, "Pier", "fish & chips", Coordinate::new(50.8225, -0.1372));

    let json = serde_json::to_value(&place).unwrap();
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), 5);
    assert_eq!(json["id"], id.to_string());
    assert_eq!(json["name"], "Pier");
    assert_eq!(json["description"], "fish & chips");
    assert_eq!(json["latitude"], 50.8225);
    assert_eq!(json["longitude"], -0.1372);
}

#[test]
fn decode_rejects_unknown_and_missing_keys() {
    let extra = serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "name": "x",
        "description": "",
        "latitude": 1.0,
        "longitude": 2.0,
        "version": 2
    });
    assert!(serde_json::from_value::<Place>(extra).is_err());

    let missing = serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "name": "x",
        "latitude": 1.0,
        "longitude": 2.0
    });
    assert!(serde_json::from_value::<Place>(missing).is_err());
}

#[test]
fn new_places_get_fresh_ids_and_default_name() {
    let center = Coordinate::new(0.0, 0.0);
    let ids: HashSet<_> = (0..32).map(|_| Place::new(center).id).collect();
    assert_eq!(ids.len(), 32);
    assert_eq!(Place::new(center).name, DEFAULT_PLACE_NAME);
}
