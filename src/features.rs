//! Hand-designed features of a `(footman, target)` pair
//!
//! | index | feature |
//! |---|---|
//! | 0 | bias, always 1 |
//! | 1 | footman health |
//! | 2 | negated target health |
//! | 3 | target preference: nearest enemy, unassigned, or otherwise assigned |
//! | 4 | teammates focusing the same target |
//! | 5 | footman health over target health |
//! | 6 | team survivability |
//! | 7 | target in attack range |
//! | 8 | threat from adjacent enemies |

use crate::{
    assignment::Assignment,
    geometry::{adjacent_enemy_count, is_adjacent, is_closest},
    snapshot::{Snapshot, UnitId},
};

/// Length of every feature vector and of the weight vector
pub const NUM_FEATURES: usize = 9;

/// A feature vector
pub type Features = [f64; NUM_FEATURES];

/// Friendly units with more health than this count as healthy for the survivability feature
pub const HEALTHY_THRESHOLD: i32 = 0;

const NEAREST_TARGET: f64 = 100.0;
const UNASSIGNED: f64 = -100.0;
const OTHER_TARGET: f64 = 50.0;
const SHARED_TARGET: f64 = 10.0;
const SPLIT_TARGET: f64 = 0.1;
const HEALTHY: f64 = 10.0;
const WOUNDED: f64 = 0.1;
const IN_RANGE: f64 = 10.0;
const FLANK_WEIGHT: f64 = 10.0;
const MAX_TOLERATED_FLANKERS: usize = 2;

/// Compute the feature vector of `footman` attacking `target` given the current `assignment`
///
/// Deterministic in its inputs.
///
/// **Panics** if `footman`, `target`, or any unit of `snapshot` lacks a health or position entry
pub fn extract(
    snapshot: &Snapshot,
    footman: UnitId,
    target: UnitId,
    assignment: &Assignment,
) -> Features {
    let footman_health = snapshot.health(footman);
    let target_health = snapshot.health(target);

    let preference = if is_closest(snapshot, footman, target) {
        NEAREST_TARGET
    } else if !assignment.contains(footman) {
        UNASSIGNED
    } else {
        OTHER_TARGET
    };

    let focus = assignment
        .iter()
        .filter(|&(ally, _)| ally != footman)
        .map(|(_, ally_target)| {
            if ally_target == target {
                SHARED_TARGET
            } else {
                SPLIT_TARGET
            }
        })
        .sum::<f64>();

    let ratio = footman_health as f64 / target_health.max(1) as f64;

    let survivability = snapshot
        .friendly()
        .iter()
        .map(|&ally| {
            if snapshot.health(ally) > HEALTHY_THRESHOLD {
                HEALTHY
            } else {
                WOUNDED
            }
        })
        .sum::<f64>();

    let in_range = if is_adjacent(snapshot.position(footman), snapshot.position(target)) {
        IN_RANGE
    } else {
        -IN_RANGE
    };

    let flankers = adjacent_enemy_count(snapshot, footman);
    let threat = if flankers <= MAX_TOLERATED_FLANKERS {
        flankers as f64 * FLANK_WEIGHT
    } else {
        -(flankers as f64) * FLANK_WEIGHT
    };

    [
        1.0,
        footman_health as f64,
        -(target_health as f64),
        preference,
        focus,
        ratio,
        survivability,
        in_range,
        threat,
    ]
}
