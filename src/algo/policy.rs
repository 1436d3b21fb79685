use log::trace;
use rand::{seq::SliceRandom, Rng};

use crate::{
    assignment::Assignment,
    exploration::Choice,
    features,
    snapshot::{Snapshot, UnitId},
};

use super::{linear_q::LinearQ, schedule::Mode};

/// The enemy of `snapshot` that maximises `Q(footman, enemy)` given `context`
///
/// Ties keep the first enemy in enumeration order.
///
/// **Returns** `(target, q_value)`, or `None` when no enemy remains
pub fn greedy_target(
    q: &LinearQ,
    snapshot: &Snapshot,
    footman: UnitId,
    context: &Assignment,
) -> Option<(UnitId, f64)> {
    snapshot
        .enemies()
        .iter()
        .map(|&enemy| {
            let f = features::extract(snapshot, footman, enemy, context);
            (enemy, q.q_value(&f))
        })
        .fold(None, |best, (enemy, value)| match best {
            Some((_, best_value)) if value <= best_value => best,
            _ => Some((enemy, value)),
        })
}

/// Greedy target of every friendly unit of `snapshot`
pub fn greedy_assignment(q: &LinearQ, snapshot: &Snapshot, context: &Assignment) -> Assignment {
    snapshot
        .friendly()
        .iter()
        .filter_map(|&footman| {
            greedy_target(q, snapshot, footman, context).map(|(target, _)| (footman, target))
        })
        .collect()
}

/// Epsilon-greedy target selection for every friendly unit of `snapshot`
///
/// In [`Mode::Training`] each footman independently explores with probability `epsilon`,
/// attacking a uniformly random enemy; otherwise, and always in [`Mode::Evaluation`], it
/// takes its [greedy target](greedy_target) scored against `previous`. Footmen get no entry
/// when no enemy remains.
pub fn select_actions<R: Rng>(
    q: &LinearQ,
    snapshot: &Snapshot,
    previous: &Assignment,
    epsilon: f64,
    mode: Mode,
    rng: &mut R,
) -> Assignment {
    let mut assignment = Assignment::new();
    for &footman in snapshot.friendly() {
        let choice = match mode {
            Mode::Training => Choice::draw(epsilon, rng),
            Mode::Evaluation => Choice::Exploit,
        };

        let target = match choice {
            Choice::Explore => snapshot.enemies().choose(rng).copied(),
            Choice::Exploit => greedy_target(q, snapshot, footman, previous).map(|(t, _)| t),
        };

        if let Some(target) = target {
            trace!("{footman} -> {target} ({choice:?})");
            assignment.assign(footman, target);
        }
    }

    assignment
}
