use chainmap_core::MapSnapshot;
use chainmap_graph::{build_from_home, compute_deletions, dedup, has_changes, layout};

mod common;
use common::{link, sig};

#[test]
fn one_link_chain_flows_through_the_whole_pipeline() {
    let signatures = vec![
        sig("sig1", "30000001", "ABC123"),
        sig("sig2", "30000142", "XYZ456"),
    ];
    let links = vec![link("wh1", "sig1", "sig2")];
    let home = 30000001;

    let built = dedup(build_from_home(home, &signatures, &links));
    assert_eq!(
        built.system_ids().into_iter().collect::<Vec<_>>(),
        vec![30000001, 30000142]
    );
    assert_eq!(
        built.connection_pairs().into_iter().collect::<Vec<_>>(),
        vec![(30000001, 30000142)]
    );

    let laid = layout(built, home, 195.0, 60.0);
    let home_system = laid.system(30000001).unwrap();
    assert_eq!((home_system.position_x, home_system.position_y), (0.0, 0.0));
    let neighbor = laid.system(30000142).unwrap();
    assert_eq!((neighbor.position_x, neighbor.position_y), (195.0, 0.0));

    // First publish: everything is new, nothing to delete.
    let current = MapSnapshot::default();
    assert!(has_changes(&current, &laid));
    assert!(compute_deletions(&current, &laid).is_empty());

    // Re-running the pipeline against the published result is a no-op.
    assert!(!has_changes(&laid, &laid.clone()));
}

#[test]
fn laid_out_snapshot_survives_the_map_wire_format() {
    let signatures = vec![
        sig("sig1", "30000001", "ABC123"),
        sig("sig2", "30000142", "XYZ456"),
    ];
    let links = vec![link("wh1", "sig1", "sig2")];
    let home = 30000001;

    let laid = layout(dedup(build_from_home(home, &signatures, &links)), home, 195.0, 60.0);

    let wire = serde_json::to_value(&laid).unwrap();
    assert_eq!(wire["systems"][0]["solar_system_id"], 30000001);
    assert_eq!(wire["systems"][1]["position_x"], 195.0);
    // Freshly built connections have no target identity on the wire.
    assert!(wire["connections"][0].get("id").is_none());

    let read_back: MapSnapshot = serde_json::from_value(wire).unwrap();
    assert_eq!(read_back, laid);
}
