use std::collections::BTreeSet;

use chainmap_core::{MapSnapshot, Signature, WormholeLink};
use chainmap_graph::{build_from_home, compute_deletions, dedup, has_changes, layout};
use proptest::prelude::*;

const BASE_SYSTEM: i64 = 31000000;

/// Builds source records for an arbitrary pairing list: one signature per
/// link endpoint, systems drawn from a small pool so cycles and duplicate
/// pairings occur frequently.
fn source_records(pairs: &[(u8, u8)]) -> (Vec<Signature>, Vec<WormholeLink>) {
    let mut signatures = Vec::new();
    let mut links = Vec::new();
    for (idx, &(a, b)) in pairs.iter().enumerate() {
        let near = format!("s{idx}a");
        let far = format!("s{idx}b");
        signatures.push(Signature {
            id: near.clone(),
            system_id: (BASE_SYSTEM + i64::from(a % 12)).to_string(),
            ..Signature::default()
        });
        signatures.push(Signature {
            id: far.clone(),
            system_id: (BASE_SYSTEM + i64::from(b % 12)).to_string(),
            ..Signature::default()
        });
        links.push(WormholeLink {
            id: format!("w{idx}"),
            initial_signature_id: near,
            secondary_signature_id: far,
        });
    }
    (signatures, links)
}

fn check_canonical(snapshot: &MapSnapshot) {
    let ids: Vec<i64> = snapshot.systems.iter().map(|s| s.solar_system_id).collect();
    let unique: BTreeSet<i64> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len(), "duplicate system after dedup");
    assert!(!unique.contains(&0));

    let pairs: Vec<(i64, i64)> = snapshot.connections.iter().map(|c| c.pair()).collect();
    let unique_pairs: BTreeSet<(i64, i64)> = pairs.iter().copied().collect();
    assert_eq!(unique_pairs.len(), pairs.len(), "duplicate pair after dedup");
    for connection in &snapshot.connections {
        assert!(connection.is_valid());
    }
}

proptest! {
    #[test]
    fn random_pairings_build_canonical_stable_snapshots(pairs in prop::collection::vec((any::<u8>(), any::<u8>()), 1..24)) {
        let (signatures, links) = source_records(&pairs);
        let home = BASE_SYSTEM + i64::from(pairs[0].0 % 12);

        let built = dedup(build_from_home(home, &signatures, &links));
        check_canonical(&built);

        let laid = layout(built, home, 195.0, 60.0);
        let home_system = laid.system(home).expect("home is always discovered");
        prop_assert_eq!(home_system.position_x, 0.0);
        prop_assert_eq!(home_system.position_y, 0.0);

        // The pipeline is deterministic for a given input ordering.
        let again = layout(
            dedup(build_from_home(home, &signatures, &links)),
            home,
            195.0,
            60.0,
        );
        prop_assert_eq!(&laid, &again);

        // A published snapshot reconciled against itself is a fixed point.
        prop_assert!(!has_changes(&laid, &again));
        prop_assert!(compute_deletions(&laid, &again).is_empty());
    }
}
