use std::{collections::BTreeMap, fmt};

use crate::env::{Side, UnitObservation};

/// Grid coordinates `(x, y)`
pub type Pos = (i32, i32);

/// Identity of a unit as reported by the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitId(pub u32);

impl From<u32> for UnitId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Immutable record of every tracked unit's health and position at one decision step
///
/// Every id listed in [`friendly`](Self::friendly) or [`enemies`](Self::enemies) has exactly
/// one health entry and one position entry. The only way to derive a modified snapshot is
/// [`with_fallen`](Self::with_fallen), which returns a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    friendly: Vec<UnitId>,
    enemies: Vec<UnitId>,
    health: BTreeMap<UnitId, i32>,
    positions: BTreeMap<UnitId, Pos>,
    casualties: u32,
}

impl Snapshot {
    /// Build a snapshot from the live units reported by the environment
    ///
    /// Unit order is preserved, so enumeration order (and with it greedy tie-breaking)
    /// follows the order of `units`. Negative health is clamped to zero.
    pub fn observe(units: &[UnitObservation], casualties: u32) -> Self {
        let mut snapshot = Self {
            friendly: Vec::new(),
            enemies: Vec::new(),
            health: BTreeMap::new(),
            positions: BTreeMap::new(),
            casualties,
        };

        for unit in units {
            let ids = match unit.side {
                Side::Friendly => &mut snapshot.friendly,
                Side::Enemy => &mut snapshot.enemies,
            };
            if snapshot.health.insert(unit.id, unit.health.max(0)).is_none() {
                ids.push(unit.id);
            }
            snapshot.positions.insert(unit.id, unit.pos);
        }

        snapshot
    }

    /// Build the snapshot that follows `previous`, carrying its casualty count forward and
    /// adding every friendly unit of `previous` that is no longer observed
    pub fn observe_after(units: &[UnitObservation], previous: &Snapshot) -> Self {
        let mut snapshot = Self::observe(units, previous.casualties);
        snapshot.casualties += snapshot.fallen_since(previous);
        snapshot
    }

    pub fn friendly(&self) -> &[UnitId] {
        &self.friendly
    }

    pub fn enemies(&self) -> &[UnitId] {
        &self.enemies
    }

    pub fn is_friendly(&self, id: UnitId) -> bool {
        self.friendly.contains(&id)
    }

    pub fn is_enemy(&self, id: UnitId) -> bool {
        self.enemies.contains(&id)
    }

    /// Friendly units that died so far this episode
    pub fn casualties(&self) -> u32 {
        self.casualties
    }

    /// Health of a tracked unit
    ///
    /// **Panics** if `id` is not tracked by this snapshot
    pub fn health(&self, id: UnitId) -> i32 {
        match self.health.get(&id) {
            Some(&health) => health,
            None => panic!("Unit {id} has no health entry in this snapshot"),
        }
    }

    /// Position of a tracked unit
    ///
    /// **Panics** if `id` is not tracked by this snapshot
    pub fn position(&self, id: UnitId) -> Pos {
        self.try_position(id)
            .unwrap_or_else(|| panic!("Unit {id} has no position entry in this snapshot"))
    }

    pub fn try_position(&self, id: UnitId) -> Option<Pos> {
        self.positions.get(&id).copied()
    }

    pub fn try_health(&self, id: UnitId) -> Option<i32> {
        self.health.get(&id).copied()
    }

    /// Number of friendly units of `previous` that are no longer present
    pub fn fallen_since(&self, previous: &Snapshot) -> u32 {
        previous
            .friendly
            .iter()
            .filter(|&&id| !self.is_friendly(id))
            .count() as u32
    }

    /// A copy that tracks `footman` as a dead friendly unit at `pos`, with the death
    /// counted in [`casualties`](Self::casualties)
    ///
    /// Keeps the feature vector of a unit that died this step well defined.
    pub fn with_fallen(&self, footman: UnitId, pos: Pos) -> Self {
        let mut snapshot = self.clone();
        if !snapshot.is_friendly(footman) {
            snapshot.friendly.push(footman);
        }
        snapshot.health.insert(footman, 0);
        snapshot.positions.insert(footman, pos);
        snapshot.casualties += 1;
        snapshot
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "friendly:")?;
        for &id in &self.friendly {
            write!(f, " {id}({}hp)", self.health(id))?;
        }
        write!(f, " | enemies:")?;
        for &id in &self.enemies {
            write!(f, " {id}({}hp)", self.health(id))?;
        }
        Ok(())
    }
}
