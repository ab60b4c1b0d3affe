//! Reconciliation of a fresh snapshot against the previously published map.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use chainmap_core::{MapSnapshot, MapSystem};
use serde::Serialize;

/// Position drift below this threshold is treated as unchanged.
const POSITION_TOLERANCE: f64 = 0.01;

/// Systems and connections that should be removed from the target map.
///
/// Systems are addressed by their natural key; connections by the opaque
/// identity the target assigned to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct Deletions {
    /// Solar system IDs to delete.
    pub system_ids: Vec<i64>,
    /// Target-assigned connection IDs to delete.
    pub connection_ids: Vec<String>,
}

impl Deletions {
    /// Returns whether there is nothing to delete.
    pub fn is_empty(&self) -> bool {
        self.system_ids.is_empty() && self.connection_ids.is_empty()
    }
}

/// Expands every locked system into its whole connected component.
///
/// The `locked` flag is authoritative only on the previously published
/// snapshot. Everything reachable from a locked system, the locked system
/// included, is protected: it survives reconciliation even when it no longer
/// appears in the freshly built chain.
pub fn protected_set(current: &MapSnapshot) -> BTreeSet<i64> {
    let mut adjacency: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
    for connection in &current.connections {
        adjacency
            .entry(connection.solar_system_source)
            .or_default()
            .push(connection.solar_system_target);
        adjacency
            .entry(connection.solar_system_target)
            .or_default()
            .push(connection.solar_system_source);
    }

    let mut protected: BTreeSet<i64> = BTreeSet::new();
    let mut queue: VecDeque<i64> = current
        .systems
        .iter()
        .filter(|system| system.locked)
        .map(|system| system.solar_system_id)
        .collect();

    while let Some(system_id) = queue.pop_front() {
        if !protected.insert(system_id) {
            continue;
        }
        if let Some(neighbors) = adjacency.get(&system_id) {
            queue.extend(neighbors.iter().copied());
        }
    }
    protected
}

/// Reports whether publishing `fresh` would change the target map.
///
/// True on any added system or connection, any removal that is not shielded
/// by the protected set, and any common system whose position drifted more
/// than the tolerance on either axis.
pub fn has_changes(current: &MapSnapshot, fresh: &MapSnapshot) -> bool {
    let protected = protected_set(current);

    let current_ids = current.system_ids();
    let fresh_ids = fresh.system_ids();
    if fresh_ids.difference(&current_ids).next().is_some() {
        return true;
    }
    if current_ids
        .difference(&fresh_ids)
        .any(|id| !protected.contains(id))
    {
        return true;
    }

    let current_pairs = current.connection_pairs();
    let fresh_pairs = fresh.connection_pairs();
    if fresh_pairs.difference(&current_pairs).next().is_some() {
        return true;
    }
    if current_pairs
        .difference(&fresh_pairs)
        .any(|(a, b)| !protected.contains(a) && !protected.contains(b))
    {
        return true;
    }

    let fresh_by_id: BTreeMap<i64, &MapSystem> = fresh
        .systems
        .iter()
        .map(|system| (system.solar_system_id, system))
        .collect();
    for system in &current.systems {
        if let Some(updated) = fresh_by_id.get(&system.solar_system_id) {
            if (system.position_x - updated.position_x).abs() > POSITION_TOLERANCE
                || (system.position_y - updated.position_y).abs() > POSITION_TOLERANCE
            {
                return true;
            }
        }
    }

    false
}

/// Computes the minimal removal set taking `current` to `fresh`.
///
/// A system leaves when it is absent from `fresh` and not protected. A
/// connection leaves when its unordered endpoint pair is absent from `fresh`
/// and neither endpoint is protected.
pub fn compute_deletions(current: &MapSnapshot, fresh: &MapSnapshot) -> Deletions {
    let protected = protected_set(current);
    let fresh_ids = fresh.system_ids();
    let fresh_pairs = fresh.connection_pairs();

    let mut deletions = Deletions::default();
    for system in &current.systems {
        let id = system.solar_system_id;
        if !fresh_ids.contains(&id) && !protected.contains(&id) {
            deletions.system_ids.push(id);
        }
    }
    for connection in &current.connections {
        let (a, b) = connection.pair();
        if !fresh_pairs.contains(&(a, b)) && !protected.contains(&a) && !protected.contains(&b) {
            deletions.connection_ids.push(connection.id.clone());
        }
    }
    deletions
}
