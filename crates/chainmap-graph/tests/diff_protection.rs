use chainmap_core::{MapConnection, MapSnapshot, MapSystem};
use chainmap_graph::{compute_deletions, has_changes, protected_set};

fn system(id: i64, locked: bool) -> MapSystem {
    let mut system = MapSystem::new(id);
    system.locked = locked;
    system
}

fn connection(id: &str, a: i64, b: i64) -> MapConnection {
    let mut connection = MapConnection::new(a, b);
    connection.id = id.to_string();
    connection
}

#[test]
fn identical_snapshots_report_no_changes() {
    let snapshot = MapSnapshot {
        systems: vec![system(1, false), system(2, false)],
        connections: vec![connection("c1", 1, 2)],
    };
    assert!(!has_changes(&snapshot, &snapshot.clone()));
    assert!(compute_deletions(&snapshot, &snapshot).is_empty());
}

#[test]
fn added_system_is_a_change() {
    let current = MapSnapshot {
        systems: vec![system(1, false)],
        connections: vec![],
    };
    let fresh = MapSnapshot {
        systems: vec![system(1, false), system(2, false)],
        connections: vec![],
    };
    assert!(has_changes(&current, &fresh));
}

#[test]
fn unprotected_removal_is_a_change_and_a_deletion() {
    let current = MapSnapshot {
        systems: vec![system(1, false), system(2, false)],
        connections: vec![connection("c1", 1, 2)],
    };
    let fresh = MapSnapshot {
        systems: vec![system(1, false)],
        connections: vec![],
    };
    assert!(has_changes(&current, &fresh));
    let deletions = compute_deletions(&current, &fresh);
    assert_eq!(deletions.system_ids, vec![2]);
    assert_eq!(deletions.connection_ids, vec!["c1".to_string()]);
}

#[test]
fn locked_component_survives_removal() {
    // H is locked and connected to K; K disappearing from the fresh build
    // must not schedule K (or the H-K connection) for deletion.
    let current = MapSnapshot {
        systems: vec![system(1, true), system(2, false)],
        connections: vec![connection("c1", 1, 2)],
    };
    let fresh = MapSnapshot {
        systems: vec![system(1, true)],
        connections: vec![],
    };
    let deletions = compute_deletions(&current, &fresh);
    assert!(deletions.is_empty());
    assert!(!has_changes(&current, &fresh));
}

#[test]
fn protection_expands_across_the_whole_component() {
    // locked 1 - 2 - 3 chain, plus an unrelated system 9.
    let current = MapSnapshot {
        systems: vec![
            system(1, true),
            system(2, false),
            system(3, false),
            system(9, false),
        ],
        connections: vec![connection("c1", 1, 2), connection("c2", 2, 3)],
    };
    let protected = protected_set(&current);
    assert_eq!(protected.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);

    let fresh = MapSnapshot::default();
    let deletions = compute_deletions(&current, &fresh);
    assert_eq!(deletions.system_ids, vec![9]);
    assert!(deletions.connection_ids.is_empty());
}

#[test]
fn no_locked_systems_means_nothing_is_protected() {
    let current = MapSnapshot {
        systems: vec![system(1, false), system(2, false)],
        connections: vec![connection("c1", 1, 2)],
    };
    assert!(protected_set(&current).is_empty());
}

#[test]
fn reversed_connection_is_not_an_edge_change() {
    let current = MapSnapshot {
        systems: vec![system(1, false), system(2, false)],
        connections: vec![connection("c1", 1, 2)],
    };
    let fresh = MapSnapshot {
        systems: vec![system(1, false), system(2, false)],
        connections: vec![connection("", 2, 1)],
    };
    assert!(!has_changes(&current, &fresh));
    assert!(compute_deletions(&current, &fresh).is_empty());
}

#[test]
fn position_drift_beyond_tolerance_is_a_change() {
    let mut moved = system(1, false);
    moved.position_y = 0.02;
    let current = MapSnapshot {
        systems: vec![system(1, false)],
        connections: vec![],
    };
    let fresh = MapSnapshot {
        systems: vec![moved],
        connections: vec![],
    };
    assert!(has_changes(&current, &fresh));
}

#[test]
fn position_drift_within_tolerance_is_ignored() {
    let mut nudged = system(1, false);
    nudged.position_x = 0.005;
    nudged.position_y = -0.009;
    let current = MapSnapshot {
        systems: vec![system(1, false)],
        connections: vec![],
    };
    let fresh = MapSnapshot {
        systems: vec![nudged],
        connections: vec![],
    };
    assert!(!has_changes(&current, &fresh));
}

#[test]
fn added_connection_between_existing_systems_is_a_change() {
    let current = MapSnapshot {
        systems: vec![system(1, false), system(2, false)],
        connections: vec![],
    };
    let fresh = MapSnapshot {
        systems: vec![system(1, false), system(2, false)],
        connections: vec![connection("", 1, 2)],
    };
    assert!(has_changes(&current, &fresh));
}
