use crate::{
    assignment::Assignment,
    snapshot::{Pos, UnitId},
};

/// Which side controls a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Friendly,
    Enemy,
}

/// A read-only view of one live unit at the current decision step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitObservation {
    pub id: UnitId,
    pub side: Side,
    pub pos: Pos,
    pub health: i32,
}

/// Every live unit at one decision step
pub type Observation = Vec<UnitObservation>;

/// How an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Victory,
    Defeat,
    Draw,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Victory => "won",
            Outcome::Defeat => "lost",
            Outcome::Draw => "drew",
        }
    }
}

/// A turn-driven combat simulation in which friendly units receive attack orders
///
/// The environment delivers one observation per decision step and blocks until the
/// controller answers with an [`Assignment`]. Every friendly unit with an entry in the
/// assignment is ordered to attack its target; units without one receive no order.
pub trait Environment {
    /// Reset the environment to its initial deployment
    ///
    /// **Returns** the first observation of the episode
    fn reset(&mut self) -> Observation;

    /// Carry out `orders` for one decision step
    ///
    /// **Returns** the next observation, or `None` once the episode is terminal
    fn step(&mut self, orders: &Assignment) -> Option<Observation>;

    /// The result of the episode, meaningful once [`step`](Self::step) returned `None`
    fn outcome(&self) -> Outcome;
}
