use rand::Rng;

/// Exploration policy result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Explore,
    Exploit,
}

impl Choice {
    /// Explore when a draw from `U[0,1)` falls below `epsilon`
    pub fn draw<R: Rng>(epsilon: f64, rng: &mut R) -> Self {
        if rng.gen::<f64>() < epsilon {
            Choice::Explore
        } else {
            Choice::Exploit
        }
    }
}

mod epsilon_greedy;

pub use epsilon_greedy::EpsilonGreedy;
