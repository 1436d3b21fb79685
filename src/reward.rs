//! Per-footman reward of a transition between two snapshots
//!
//! `r = -0.1 - health lost (or -100 on death) + damage dealt (or +100 on a kill)`, where
//! damage and kills only count while the footman stands next to the target it was
//! ordered to attack.

use crate::{
    assignment::Assignment,
    geometry::is_adjacent,
    snapshot::{Pos, Snapshot, UnitId},
};

/// Constant per-step cost
pub const STEP_COST: f64 = 0.1;
/// Penalty for losing the footman
pub const DEATH_PENALTY: f64 = 100.0;
/// Bonus for killing the ordered target
pub const KILL_BONUS: f64 = 100.0;

/// Reward earned by `footman` for carrying out `previous_assignment` between
/// `previous` and `current`
///
/// Positions of units that disappeared from `current` are looked up in `previous`; those
/// lookups are local to this computation and never written back.
///
/// **Panics** if `footman` or its target is unknown to `previous`
pub fn reward(
    previous: &Snapshot,
    current: &Snapshot,
    previous_assignment: &Assignment,
    footman: UnitId,
) -> f64 {
    let mut reward = -STEP_COST;

    if current.is_friendly(footman) {
        reward -= (previous.health(footman) - current.health(footman)) as f64;
    } else {
        reward -= DEATH_PENALTY;
    }

    let Some(target) = previous_assignment.target(footman) else {
        return reward;
    };

    let footman_pos = last_known_position(previous, current, footman);
    let target_pos = last_known_position(previous, current, target);
    if is_adjacent(footman_pos, target_pos) {
        if current.is_enemy(target) {
            reward += (previous.health(target) - current.health(target)) as f64;
        } else {
            reward += KILL_BONUS;
        }
    }

    reward
}

fn last_known_position(previous: &Snapshot, current: &Snapshot, id: UnitId) -> Pos {
    current
        .try_position(id)
        .unwrap_or_else(|| previous.position(id))
}
