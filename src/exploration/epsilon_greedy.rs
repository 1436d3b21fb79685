use crate::{assert_interval, decay::Decay};

/// Epsilon greedy exploration policy with time-decaying epsilon threshold
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<D: Decay> {
    epsilon: D,
}

impl<D: Decay> EpsilonGreedy<D> {
    /// Initialize epsilon greedy policy with a decay strategy
    pub fn new(decay: D) -> Self {
        Self { epsilon: decay }
    }

    /// The exploration probability at time `t`
    ///
    /// **Panics** if the decay strategy leaves the interval `[0,1]`
    pub fn epsilon(&self, t: f64) -> f64 {
        let epsilon = self.epsilon.evaluate(t);
        assert_interval!(epsilon, 0.0, 1.0);
        epsilon
    }
}
