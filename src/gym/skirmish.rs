use std::collections::{BTreeMap, HashSet};

use log::debug;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use strum::{EnumIter, IntoEnumIterator, VariantArray};

use crate::{
    assignment::Assignment,
    env::{Environment, Observation, Outcome, Side, UnitObservation},
    geometry::{chebyshev_distance, is_adjacent},
    snapshot::{Pos, UnitId},
};

/// One step in the 8-neighbourhood
#[derive(EnumIter, VariantArray, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dir {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Dir {
    fn delta(self) -> (i32, i32) {
        match self {
            Dir::North => (0, -1),
            Dir::NorthEast => (1, -1),
            Dir::East => (1, 0),
            Dir::SouthEast => (1, 1),
            Dir::South => (0, 1),
            Dir::SouthWest => (-1, 1),
            Dir::West => (-1, 0),
            Dir::NorthWest => (-1, -1),
        }
    }

    fn apply(self, (x, y): Pos) -> Pos {
        let (dx, dy) = self.delta();
        (x + dx, y + dy)
    }
}

/// Battlefield layout and unit statistics for a [`Skirmish`]
#[derive(Debug, Clone, PartialEq)]
pub struct SkirmishConfig {
    pub width: i32,
    pub height: i32,
    pub friendly: u32,
    pub enemies: u32,
    /// Starting health of every footman
    pub health: i32,
    /// Mean damage of one attack
    pub damage: f64,
    /// Standard deviation of one attack's damage
    pub damage_std: f64,
    /// Decision steps after which the episode ends in a draw
    pub turn_limit: u32,
}

impl Default for SkirmishConfig {
    fn default() -> Self {
        Self {
            width: 16,
            height: 12,
            friendly: 5,
            enemies: 5,
            health: 40,
            damage: 6.0,
            damage_std: 2.0,
            turn_limit: 300,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Unit {
    id: UnitId,
    side: Side,
    pos: Pos,
    health: i32,
}

/// Small melee battle between two lines of footmen
///
/// Friendly footmen follow the orders they are given: attack the target when adjacent,
/// otherwise step towards it. Enemy footmen always go for the nearest friendly footman.
/// Attacks of one step resolve simultaneously, so two units may kill each other.
pub struct Skirmish<R: Rng> {
    config: SkirmishConfig,
    damage: Normal<f64>,
    rng: R,
    units: Vec<Unit>,
    turn: u32,
    outcome: Outcome,
}

impl<R: Rng> Skirmish<R> {
    /// **Panics** if either side would not fit in a column of the field, or if the damage
    /// distribution is invalid
    pub fn new(config: SkirmishConfig, rng: R) -> Self {
        assert!(
            config.width >= 4 && config.friendly.max(config.enemies) as i32 <= config.height,
            "A {}x{} field cannot deploy {} against {} footmen",
            config.width,
            config.height,
            config.friendly,
            config.enemies
        );
        let damage = Normal::new(config.damage, config.damage_std)
            .unwrap_or_else(|e| panic!("Invalid damage distribution: {e}"));
        Self {
            config,
            damage,
            rng,
            units: Vec::new(),
            turn: 0,
            outcome: Outcome::Draw,
        }
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    fn deploy(&mut self) {
        let SkirmishConfig {
            width,
            height,
            friendly,
            enemies,
            health,
            ..
        } = self.config;

        let column = |side, x: i32, count: u32, first_id: u32| {
            let top = (height - count as i32) / 2;
            (0..count).map(move |i| Unit {
                id: UnitId(first_id + i),
                side,
                pos: (x, top + i as i32),
                health,
            })
        };

        self.units = column(Side::Friendly, 1, friendly, 1)
            .chain(column(Side::Enemy, width - 2, enemies, friendly + 1))
            .collect();
    }

    fn observe(&self) -> Observation {
        self.units
            .iter()
            .map(|u| UnitObservation {
                id: u.id,
                side: u.side,
                pos: u.pos,
                health: u.health,
            })
            .collect()
    }

    fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    fn nearest_friendly(&self, from: Pos) -> Option<UnitId> {
        self.units
            .iter()
            .filter(|u| u.side == Side::Friendly)
            .min_by_key(|u| chebyshev_distance(from, u.pos))
            .map(|u| u.id)
    }

    fn target_of(&self, unit: &Unit, orders: &Assignment) -> Option<UnitId> {
        match unit.side {
            Side::Friendly => orders
                .target(unit.id)
                .filter(|&t| self.get(t).is_some_and(|e| e.side == Side::Enemy)),
            Side::Enemy => self.nearest_friendly(unit.pos),
        }
    }

    fn in_bounds(&self, (x, y): Pos) -> bool {
        (0..self.config.width).contains(&x) && (0..self.config.height).contains(&y)
    }

    /// The free neighbouring cell that brings `from` closest to `to`, if any improves on
    /// staying put
    fn step_towards(&self, from: Pos, to: Pos, occupied: &HashSet<Pos>) -> Option<Pos> {
        Dir::iter()
            .map(|dir| dir.apply(from))
            .filter(|&p| self.in_bounds(p) && !occupied.contains(&p))
            .min_by_key(|&p| chebyshev_distance(p, to))
            .filter(|&p| chebyshev_distance(p, to) < chebyshev_distance(from, to))
    }

    fn roll_damage(&mut self) -> i32 {
        (self.damage.sample(&mut self.rng).round() as i32).max(1)
    }

    fn settle(&mut self) -> Option<Outcome> {
        let friendly = self.units.iter().any(|u| u.side == Side::Friendly);
        let enemies = self.units.iter().any(|u| u.side == Side::Enemy);
        match (friendly, enemies) {
            (true, false) => Some(Outcome::Victory),
            (false, true) => Some(Outcome::Defeat),
            (false, false) => Some(Outcome::Draw),
            (true, true) if self.turn >= self.config.turn_limit => Some(Outcome::Draw),
            (true, true) => None,
        }
    }
}

impl<R: Rng> Environment for Skirmish<R> {
    fn reset(&mut self) -> Observation {
        self.turn = 0;
        self.outcome = Outcome::Draw;
        self.deploy();
        self.observe()
    }

    fn step(&mut self, orders: &Assignment) -> Option<Observation> {
        self.turn += 1;

        let mut hits = BTreeMap::<UnitId, i32>::new();
        let mut moves = Vec::new();
        for unit in self.units.clone() {
            let Some(target) = self.target_of(&unit, orders).and_then(|t| self.get(t).copied())
            else {
                continue;
            };
            if is_adjacent(unit.pos, target.pos) {
                let damage = self.roll_damage();
                *hits.entry(target.id).or_default() += damage;
            } else {
                moves.push((unit.id, target.pos));
            }
        }

        for unit in &mut self.units {
            if let Some(damage) = hits.get(&unit.id) {
                unit.health -= damage;
            }
        }
        self.units.retain(|u| u.health > 0);

        let mut occupied = self.units.iter().map(|u| u.pos).collect::<HashSet<_>>();
        for (id, to) in moves {
            let Some(from) = self.get(id).map(|u| u.pos) else {
                continue;
            };
            if let Some(next) = self.step_towards(from, to, &occupied) {
                occupied.remove(&from);
                occupied.insert(next);
                if let Some(unit) = self.units.iter_mut().find(|u| u.id == id) {
                    unit.pos = next;
                }
            }
        }

        match self.settle() {
            Some(outcome) => {
                debug!("Skirmish over after {} turns: {outcome:?}", self.turn);
                self.outcome = outcome;
                None
            }
            None => Some(self.observe()),
        }
    }

    fn outcome(&self) -> Outcome {
        self.outcome
    }
}
