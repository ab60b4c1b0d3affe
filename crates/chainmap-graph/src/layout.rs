//! Deterministic tree layout for chain snapshots.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use chainmap_core::MapSnapshot;

/// Vertical grid unit parent midpoints are snapped to. The value comes from
/// the visualization target's pixel grid and must not be changed.
const GRID_UNIT: f64 = 15.0;

/// Computes (x, y) coordinates for every system reachable from the home
/// system. No-op when the home system is absent from the snapshot.
///
/// A breadth-first spanning tree is grown from `home_system_id` over the
/// connection set (first discovered edge wins, neighbor order follows
/// connection insertion order), then positions are assigned depth-first:
/// `x = depth * x_step`, `y` from the next free slot of that depth level.
/// A parent with children is re-centered on its first and last child,
/// snapped to the grid; the home system itself is never re-centered. After
/// placement the home system is pinned to the origin and its subtrees are
/// shifted so the first chain level balances around `y = 0`. Systems only
/// reachable through back-edges keep the coordinates of the tree they were
/// first discovered in.
pub fn layout(
    snapshot: MapSnapshot,
    home_system_id: i64,
    x_step: f64,
    y_separation: f64,
) -> MapSnapshot {
    let mut snapshot = snapshot;
    if !snapshot.contains_system(home_system_id) {
        return snapshot;
    }

    // Undirected adjacency, neighbor lists in connection insertion order.
    let mut adjacency: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
    for connection in &snapshot.connections {
        adjacency
            .entry(connection.solar_system_source)
            .or_default()
            .push(connection.solar_system_target);
        adjacency
            .entry(connection.solar_system_target)
            .or_default()
            .push(connection.solar_system_source);
    }

    let children = spanning_children(&adjacency, home_system_id);

    let mut positions: BTreeMap<i64, (f64, f64)> = BTreeMap::new();
    let mut next_y: BTreeMap<usize, f64> = BTreeMap::new();
    place(
        home_system_id,
        0,
        home_system_id,
        &children,
        x_step,
        y_separation,
        &mut positions,
        &mut next_y,
    );

    positions.insert(home_system_id, (0.0, 0.0));

    if let Some(offset) = centering_offset(&positions, &children, home_system_id, y_separation) {
        for (system_id, position) in positions.iter_mut() {
            if *system_id != home_system_id {
                position.1 += offset;
            }
        }
    }

    for system in &mut snapshot.systems {
        if let Some(&(x, y)) = positions.get(&system.solar_system_id) {
            system.position_x = x;
            system.position_y = y;
        }
    }
    snapshot
}

/// Grows the BFS spanning tree and returns the children relation.
fn spanning_children(
    adjacency: &BTreeMap<i64, Vec<i64>>,
    home_system_id: i64,
) -> BTreeMap<i64, Vec<i64>> {
    let mut visited: BTreeSet<i64> = BTreeSet::new();
    visited.insert(home_system_id);
    let mut children: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
    let mut queue: VecDeque<i64> = VecDeque::new();
    queue.push_back(home_system_id);

    while let Some(current) = queue.pop_front() {
        if let Some(neighbors) = adjacency.get(&current) {
            for &neighbor in neighbors {
                if visited.insert(neighbor) {
                    children.entry(current).or_default().push(neighbor);
                    queue.push_back(neighbor);
                }
            }
        }
    }
    children
}

/// Places `system_id` and its subtree, returning the vertical space the
/// subtree consumed. Leaves consume exactly one `y_separation` slot.
#[allow(clippy::too_many_arguments)]
fn place(
    system_id: i64,
    level: usize,
    home_system_id: i64,
    children: &BTreeMap<i64, Vec<i64>>,
    x_step: f64,
    y_separation: f64,
    positions: &mut BTreeMap<i64, (f64, f64)>,
    next_y: &mut BTreeMap<usize, f64>,
) -> f64 {
    let x = level as f64 * x_step;
    let y = next_y.get(&level).copied().unwrap_or(0.0);
    positions.insert(system_id, (x, y));

    let kids = children.get(&system_id).map(Vec::as_slice).unwrap_or(&[]);
    if kids.is_empty() {
        next_y.insert(level, y + y_separation);
        return y_separation;
    }

    // The first child starts level with its parent.
    next_y.insert(level + 1, y);

    let mut total_height = 0.0;
    let mut first_child_y = 0.0;
    let mut last_child_y = 0.0;
    for (idx, &child) in kids.iter().enumerate() {
        total_height += place(
            child,
            level + 1,
            home_system_id,
            children,
            x_step,
            y_separation,
            positions,
            next_y,
        );
        let child_y = positions.get(&child).map(|p| p.1).unwrap_or(0.0);
        if idx == 0 {
            first_child_y = child_y;
        }
        last_child_y = child_y;
    }

    // Re-center the parent on its children; the home system stays put.
    if system_id != home_system_id {
        if kids.len() == 1 {
            positions.insert(system_id, (x, first_child_y));
        } else {
            let midpoint = (first_child_y + last_child_y) / 2.0;
            positions.insert(system_id, (x, round_to_multiple(midpoint, GRID_UNIT)));
        }
    }

    next_y.insert(level, y + total_height);
    total_height
}

/// Vertical shift applied to every non-home system after placement.
///
/// One direct child: the child lands on `y = 0`. Several: the children
/// balance around `y = 0`, with the midpoint snapped to `y_separation`.
fn centering_offset(
    positions: &BTreeMap<i64, (f64, f64)>,
    children: &BTreeMap<i64, Vec<i64>>,
    home_system_id: i64,
    y_separation: f64,
) -> Option<f64> {
    let kids = children.get(&home_system_id)?;
    let first_y = positions.get(kids.first()?).map(|p| p.1)?;
    match kids.len() {
        1 => Some(-first_y),
        _ => {
            let last_y = positions.get(kids.last()?).map(|p| p.1)?;
            let midpoint = (first_y + last_y) / 2.0;
            Some(-round_to_multiple(midpoint, y_separation))
        }
    }
}

fn round_to_multiple(value: f64, unit: f64) -> f64 {
    (value / unit).round() * unit
}
