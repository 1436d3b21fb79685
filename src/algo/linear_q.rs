use rand::{
    distributions::{Distribution, Uniform},
    Rng,
};

use crate::features::{Features, NUM_FEATURES};

/// How a temporal-difference error is turned into a weight change
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdateRule {
    /// `w[i] += α·δ` for every weight, ignoring the feature values
    #[default]
    Uniform,
    /// The textbook semi-gradient step `w[i] += α·δ·f[i]`
    SemiGradient,
}

/// Linear action-value approximator: `Q(s,a) = w · f(s,a)`
#[derive(Debug, Clone, PartialEq)]
pub struct LinearQ {
    weights: [f64; NUM_FEATURES],
    rule: UpdateRule,
}

impl LinearQ {
    /// Wrap an existing weight vector, e.g. one restored from storage
    pub fn new(weights: [f64; NUM_FEATURES], rule: UpdateRule) -> Self {
        Self { weights, rule }
    }

    /// Draw every weight independently from `U[-1, 1)`
    pub fn random<R: Rng>(rng: &mut R, rule: UpdateRule) -> Self {
        let dist = Uniform::<f64>::new(-1.0, 1.0);
        let weights = std::array::from_fn(|_| dist.sample(rng));
        Self { weights, rule }
    }

    pub fn weights(&self) -> &[f64; NUM_FEATURES] {
        &self.weights
    }

    pub fn rule(&self) -> UpdateRule {
        self.rule
    }

    /// Estimated value of the action described by `features`
    pub fn q_value(&self, features: &Features) -> f64 {
        self.weights
            .iter()
            .zip(features)
            .map(|(w, f)| w * f)
            .sum()
    }

    /// Move the weights by `learning_rate * td_error` according to the update rule
    pub fn apply_update(&mut self, features: &Features, td_error: f64, learning_rate: f64) {
        let step = learning_rate * td_error;
        match self.rule {
            UpdateRule::Uniform => self.weights.iter_mut().for_each(|w| *w += step),
            UpdateRule::SemiGradient => self
                .weights
                .iter_mut()
                .zip(features)
                .for_each(|(w, f)| *w += step * f),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn q_value_is_dot_product() {
        let q = LinearQ::new([1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0], UpdateRule::Uniform);
        assert_eq!(q.q_value(&[1.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0, 5.0]), 1.0);

        let q = LinearQ::new([0.5, -1.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0], UpdateRule::Uniform);
        let f = [2.0, 3.0, 0.25, 9.0, 9.0, 9.0, 9.0, 9.0, -4.0];
        assert_eq!(q.q_value(&f), 1.0 - 3.0 + 0.5 - 4.0);
    }

    #[test]
    fn zero_error_leaves_weights_unchanged() {
        let mut rng = StdRng::seed_from_u64(7);
        for rule in [UpdateRule::Uniform, UpdateRule::SemiGradient] {
            let mut q = LinearQ::random(&mut rng, rule);
            let before = q.clone();
            let f = [1.0, 30.0, -20.0, 100.0, 10.0, 1.5, 10.1, 10.0, 10.0];
            q.apply_update(&f, 0.0, 1e-4);
            q.apply_update(&f, 0.0, 1e-4);
            assert_eq!(q, before);
        }
    }

    #[test]
    fn uniform_rule_ignores_features() {
        let mut q = LinearQ::new([0.0; NUM_FEATURES], UpdateRule::Uniform);
        q.apply_update(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0], 2.0, 0.5);
        assert_eq!(q.weights(), &[1.0; NUM_FEATURES]);
    }

    #[test]
    fn semi_gradient_rule_scales_by_features() {
        let mut q = LinearQ::new([0.0; NUM_FEATURES], UpdateRule::SemiGradient);
        q.apply_update(&[1.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -1.0], 2.0, 0.5);
        assert_eq!(q.weights(), &[1.0, 2.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -1.0]);
    }

    #[test]
    fn random_weights_in_range_and_reproducible() {
        let a = LinearQ::random(&mut StdRng::seed_from_u64(42), UpdateRule::Uniform);
        let b = LinearQ::random(&mut StdRng::seed_from_u64(42), UpdateRule::Uniform);
        assert_eq!(a, b);
        assert!(a.weights().iter().all(|w| (-1.0..1.0).contains(w)));
    }
}
