//! Domain model for pinned places and the map viewport.
//!
//! # Responsibility
//! - Define the canonical place record persisted by the store.
//! - Define transient map geometry used to position new places.
//!
//! # Invariants
//! - Every place is identified by a stable `PlaceId`.
//! - Place equality is identity equality; field values never participate.

pub mod place;
pub mod region;
