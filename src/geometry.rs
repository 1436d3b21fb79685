//! Grid predicates over unit positions

use crate::snapshot::{Pos, Snapshot, UnitId};

/// Chebyshev (king-move) distance: `max(|Δx|, |Δy|)`
pub fn chebyshev_distance(p: Pos, q: Pos) -> i32 {
    (p.0 - q.0).abs().max((p.1 - q.1).abs())
}

/// Whether `q` lies in the 8-neighbourhood of `p`, the cell itself included
pub fn is_adjacent(p: Pos, q: Pos) -> bool {
    (p.0 - q.0).abs() <= 1 && (p.1 - q.1).abs() <= 1
}

/// Whether no enemy in `snapshot` is strictly closer to `actor` than `target`
///
/// **Panics** if any of the involved units has no position in `snapshot`
pub fn is_closest(snapshot: &Snapshot, actor: UnitId, target: UnitId) -> bool {
    let origin = snapshot.position(actor);
    let distance = chebyshev_distance(origin, snapshot.position(target));
    snapshot
        .enemies()
        .iter()
        .all(|&enemy| chebyshev_distance(origin, snapshot.position(enemy)) >= distance)
}

/// Number of enemies standing next to `actor`
///
/// **Panics** if any of the involved units has no position in `snapshot`
pub fn adjacent_enemy_count(snapshot: &Snapshot, actor: UnitId) -> usize {
    let origin = snapshot.position(actor);
    snapshot
        .enemies()
        .iter()
        .filter(|&&enemy| is_adjacent(origin, snapshot.position(enemy)))
        .count()
}
