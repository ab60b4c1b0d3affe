//! Canonicalization of a snapshot into unique systems and connections.

use std::collections::BTreeMap;

use chainmap_core::{MapConnection, MapSnapshot, MapSystem};

/// Collapses duplicate systems and connections, keeping first occurrences.
///
/// Systems are keyed by solar system ID; an ID of 0 is dropped. Connections
/// are keyed by their normalized unordered endpoint pair, so `(a, b)` and
/// `(b, a)` collapse into whichever was seen first. Structurally invalid
/// connections (zero endpoint or self-loop) are discarded. Output order is
/// the keyed maps' iteration order; callers must only rely on set equality.
pub fn dedup(snapshot: MapSnapshot) -> MapSnapshot {
    let mut systems: BTreeMap<i64, MapSystem> = BTreeMap::new();
    for system in snapshot.systems {
        if system.solar_system_id == 0 {
            continue;
        }
        systems.entry(system.solar_system_id).or_insert(system);
    }

    let mut connections: BTreeMap<(i64, i64), MapConnection> = BTreeMap::new();
    for connection in snapshot.connections {
        if !connection.is_valid() {
            continue;
        }
        connections.entry(connection.pair()).or_insert(connection);
    }

    MapSnapshot {
        systems: systems.into_values().collect(),
        connections: connections.into_values().collect(),
    }
}
