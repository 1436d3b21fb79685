use rand::Rng;

use crate::{
    algo::{EpisodeSummary, QAgent},
    decay::Decay,
    env::Environment,
};

/// A controller that can play whole episodes in an [`Environment`]
pub trait Agent<E>
where
    E: Environment,
{
    /// Play one episode from reset to terminal
    fn go(&mut self, env: &mut E) -> EpisodeSummary;
}

impl<E, D, R> Agent<E> for QAgent<D, R>
where
    E: Environment,
    D: Decay,
    R: Rng,
{
    fn go(&mut self, env: &mut E) -> EpisodeSummary {
        self.begin_episode();
        let mut observation = env.reset();
        loop {
            let orders = self.step(&observation);
            match env.step(&orders) {
                Some(next) => observation = next,
                None => break,
            }
        }
        self.end_episode(env.outcome())
    }
}
