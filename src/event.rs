use crate::snapshot::Snapshot;

/// Whether anything happened between `previous` and `current` that warrants a learning
/// update and a fresh target selection
///
/// That is the case when an enemy was eliminated, when a friendly unit died, or when any
/// unit tracked by both snapshots lost health.
pub fn has_significant_event(current: &Snapshot, previous: &Snapshot) -> bool {
    if current.enemies().len() < previous.enemies().len()
        || current.casualties() > previous.casualties()
    {
        return true;
    }

    current
        .friendly()
        .iter()
        .chain(current.enemies())
        .any(|&id| {
            previous
                .try_health(id)
                .is_some_and(|before| current.health(id) < before)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::tests::{skirmish, skirmish_with_casualties};

    #[test]
    fn nothing_happened() {
        let previous = skirmish(&[(1, 10, (0, 0))], &[(10, 20, (5, 5))]);
        let current = skirmish(&[(1, 10, (1, 1))], &[(10, 20, (4, 4))]);
        assert!(!has_significant_event(&current, &previous));
    }

    #[test]
    fn healing_is_not_an_event() {
        let previous = skirmish(&[(1, 10, (0, 0))], &[(10, 20, (5, 5))]);
        let current = skirmish(&[(1, 11, (0, 0))], &[(10, 20, (5, 5))]);
        assert!(!has_significant_event(&current, &previous));
    }

    #[test]
    fn enemy_eliminated() {
        let previous = skirmish(&[(1, 10, (0, 0))], &[(10, 20, (5, 5)), (11, 1, (1, 1))]);
        let current = skirmish(&[(1, 10, (0, 0))], &[(10, 20, (5, 5))]);
        assert!(has_significant_event(&current, &previous));
    }

    #[test]
    fn friendly_casualty() {
        let previous = skirmish(&[(1, 10, (0, 0)), (2, 1, (0, 1))], &[(10, 20, (5, 5))]);
        let current = skirmish_with_casualties(&[(1, 10, (0, 0))], &[(10, 20, (5, 5))], 1);
        assert!(has_significant_event(&current, &previous));
    }

    #[test]
    fn damage_on_either_side() {
        let previous = skirmish(&[(1, 10, (0, 0))], &[(10, 20, (1, 1))]);
        let hurt_friend = skirmish(&[(1, 9, (0, 0))], &[(10, 20, (1, 1))]);
        let hurt_enemy = skirmish(&[(1, 10, (0, 0))], &[(10, 19, (1, 1))]);
        assert!(has_significant_event(&hurt_friend, &previous));
        assert!(has_significant_event(&hurt_enemy, &previous));
    }
}
