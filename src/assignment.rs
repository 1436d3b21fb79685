use std::{collections::BTreeMap, fmt};

use crate::snapshot::UnitId;

/// Attack targets of the friendly units: friendly id → enemy id
///
/// A friendly unit without an entry has no target this step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    targets: BTreeMap<UnitId, UnitId>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&mut self, footman: UnitId, target: UnitId) {
        self.targets.insert(footman, target);
    }

    pub fn target(&self, footman: UnitId) -> Option<UnitId> {
        self.targets.get(&footman).copied()
    }

    pub fn contains(&self, footman: UnitId) -> bool {
        self.targets.contains_key(&footman)
    }

    /// `(footman, target)` pairs ordered by footman id
    pub fn iter(&self) -> impl Iterator<Item = (UnitId, UnitId)> + '_ {
        self.targets.iter().map(|(&f, &t)| (f, t))
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl FromIterator<(UnitId, UnitId)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (UnitId, UnitId)>>(iter: I) -> Self {
        Self {
            targets: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (footman, target) in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{footman}->{target}")?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_overwrites_previous_target() {
        let mut assignment = Assignment::new();
        assignment.assign(UnitId(1), UnitId(10));
        assignment.assign(UnitId(1), UnitId(11));
        assert_eq!(assignment.target(UnitId(1)), Some(UnitId(11)));
        assert_eq!(assignment.len(), 1);
        assert_eq!(assignment.target(UnitId(2)), None);
    }

    #[test]
    fn display_lists_pairs_in_id_order() {
        let assignment: Assignment = [(UnitId(2), UnitId(10)), (UnitId(1), UnitId(11))]
            .into_iter()
            .collect();
        assert_eq!(assignment.to_string(), "#1->#11, #2->#10");
    }
}
