//! Flutter-facing bindings for No Fear List core.

pub mod api;
