use std::{borrow::Cow, mem};

use log::{debug, info};
use rand::Rng;

use crate::{
    assert_interval,
    assignment::Assignment,
    decay::{self, Decay},
    env::{Outcome, UnitObservation},
    event::has_significant_event,
    exploration::EpsilonGreedy,
    features::{self, NUM_FEATURES},
    report::RewardHistory,
    reward::reward,
    snapshot::{Snapshot, UnitId},
};

use super::{
    linear_q::{LinearQ, UpdateRule},
    policy,
    schedule::{Mode, Schedule},
};

/// Configuration for the [`QAgent`]
#[derive(Debug, Clone)]
pub struct QAgentConfig<D: Decay> {
    /// Exploration policy, with time counted in completed training/evaluation cycles
    pub exploration: EpsilonGreedy<D>,
    /// The discount factor
    pub gamma: f64,
    /// The learning rate
    pub alpha: f64,
    pub schedule: Schedule,
    pub update_rule: UpdateRule,
    /// Number of training episodes to play before the run is finished
    pub episodes: u32,
}

impl Default for QAgentConfig<decay::Linear> {
    fn default() -> Self {
        Self {
            exploration: EpsilonGreedy::new(decay::Linear::new(0.002, 0.1, 0.0).unwrap()),
            gamma: 0.9,
            alpha: 1e-4,
            schedule: Schedule::default(),
            update_rule: UpdateRule::default(),
            episodes: 100,
        }
    }
}

/// What happened in one finished episode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeSummary {
    /// 0-based index of the episode over the whole run
    pub episode: u32,
    pub mode: Mode,
    pub outcome: Outcome,
    /// Sum of every footman's reward over the episode
    pub reward: f64,
    /// Whether this episode closed a training/evaluation cycle
    pub cycle_end: bool,
}

enum Phase {
    AwaitingFirstObservation,
    Active {
        previous: Snapshot,
        assignment: Assignment,
    },
}

/// Q-learning controller that assigns every friendly footman an enemy to attack
///
/// Action values are approximated linearly over hand-crafted [features](crate::features).
/// Learning is event driven: the agent only computes rewards, updates its weights and
/// re-selects targets when [something significant](has_significant_event) happened since
/// its last decision. Episodes alternate between training and evaluation according to the
/// configured [`Schedule`].
///
/// ### Generics
/// - `D`: The epsilon [`Decay`] strategy
/// - `R`: The source of randomness for exploration
pub struct QAgent<D: Decay, R: Rng> {
    q: LinearQ,
    exploration: EpsilonGreedy<D>,
    gamma: f64,
    alpha: f64,
    schedule: Schedule,
    episodes: u32,
    rng: R,
    episode: u32, // episodes finished
    phase: Phase,
    episode_reward: f64,
    eval_average: f64,
    eval_played: u32,
    history: RewardHistory,
}

impl<D: Decay, R: Rng> QAgent<D, R> {
    /// Initialize a new `QAgent` with weights drawn uniformly from `[-1, 1)`
    ///
    /// **Panics** if `alpha` or `gamma` is not in the interval `[0,1]`
    pub fn new(config: QAgentConfig<D>, mut rng: R) -> Self {
        let q = LinearQ::random(&mut rng, config.update_rule);
        Self::with_estimator(config, q, rng)
    }

    /// Initialize a new `QAgent` that resumes from stored `weights`
    ///
    /// **Panics** if `alpha` or `gamma` is not in the interval `[0,1]`
    pub fn with_weights(config: QAgentConfig<D>, weights: [f64; NUM_FEATURES], rng: R) -> Self {
        let q = LinearQ::new(weights, config.update_rule);
        Self::with_estimator(config, q, rng)
    }

    fn with_estimator(config: QAgentConfig<D>, q: LinearQ, rng: R) -> Self {
        assert_interval!(config.alpha, 0.0, 1.0);
        assert_interval!(config.gamma, 0.0, 1.0);
        Self {
            q,
            exploration: config.exploration,
            gamma: config.gamma,
            alpha: config.alpha,
            schedule: config.schedule,
            episodes: config.episodes,
            rng,
            episode: 0,
            phase: Phase::AwaitingFirstObservation,
            episode_reward: 0.0,
            eval_average: 0.0,
            eval_played: 0,
            history: RewardHistory::new(config.schedule.training_per_cycle()),
        }
    }

    pub fn estimator(&self) -> &LinearQ {
        &self.q
    }

    pub fn weights(&self) -> &[f64; NUM_FEATURES] {
        self.q.weights()
    }

    pub fn history(&self) -> &RewardHistory {
        &self.history
    }

    /// Mode of the episode currently being played
    pub fn mode(&self) -> Mode {
        self.schedule.mode(self.episode)
    }

    /// Number of episodes finished so far
    pub fn episodes_played(&self) -> u32 {
        self.episode
    }

    /// Reward accumulated in the current episode so far
    pub fn episode_reward(&self) -> f64 {
        self.episode_reward
    }

    /// Current exploration probability, decayed once per completed cycle
    pub fn epsilon(&self) -> f64 {
        let t = self.schedule.completed_cycles(self.episode);
        self.exploration.epsilon(t as f64)
    }

    /// Whether the training budget has been spent and the last cycle has been evaluated
    pub fn is_finished(&self) -> bool {
        let cycles = self.schedule.completed_cycles(self.episode);
        cycles * self.schedule.training_per_cycle() >= self.episodes
    }

    /// Prepare for a fresh episode; the next observation is treated as its first
    pub fn begin_episode(&mut self) {
        self.phase = Phase::AwaitingFirstObservation;
        self.episode_reward = 0.0;
        debug!(
            "Starting episode {} in {:?} mode (epsilon {:.3})",
            self.episode,
            self.mode(),
            self.epsilon()
        );
    }

    /// Decide the attack orders for one decision step
    ///
    /// The first observation of an episode only selects targets. Afterwards the previous
    /// orders are repeated unchanged until a significant event occurs; on an event every
    /// footman of the previous step is rewarded, the weights are updated in training mode,
    /// and targets are selected again.
    pub fn step(&mut self, units: &[UnitObservation]) -> Assignment {
        let phase = mem::replace(&mut self.phase, Phase::AwaitingFirstObservation);
        let (current, assignment) = match phase {
            Phase::AwaitingFirstObservation => {
                let current = Snapshot::observe(units, 0);
                let assignment = self.select(&current, &Assignment::new());
                (current, assignment)
            }
            Phase::Active {
                previous,
                assignment,
            } => {
                let current = Snapshot::observe_after(units, &previous);
                if !has_significant_event(&current, &previous) {
                    // later steps are still measured against the last decision point
                    self.phase = Phase::Active {
                        previous,
                        assignment: assignment.clone(),
                    };
                    return assignment;
                }

                let mode = self.mode();
                for &footman in previous.friendly() {
                    let r = reward(&previous, &current, &assignment, footman);
                    debug!("Reward for {footman}: {r:.2}");
                    self.episode_reward += r;
                    if mode == Mode::Training {
                        self.learn(&previous, &current, &assignment, footman, r);
                    }
                }

                let next = self.select(&current, &assignment);
                (current, next)
            }
        };

        self.phase = Phase::Active {
            previous: current,
            assignment: assignment.clone(),
        };
        assignment
    }

    /// Close the current episode, folding an evaluation reward into the cycle average
    pub fn end_episode(&mut self, outcome: Outcome) -> EpisodeSummary {
        let episode = self.episode;
        let mode = self.schedule.mode(episode);
        let reward = self.episode_reward;

        match mode {
            Mode::Training => info!(
                "Played training game {} and {}",
                self.schedule.training_played(episode + 1),
                outcome.as_str()
            ),
            Mode::Evaluation => {
                self.eval_played += 1;
                self.eval_average += (reward - self.eval_average) / self.eval_played as f64;
                info!(
                    "Played evaluation game {} and {} (cumulative reward: {reward:.2})",
                    self.schedule.index_in_phase(episode),
                    outcome.as_str()
                );
            }
        }

        let cycle_end = self.schedule.is_cycle_end(episode);
        if cycle_end {
            self.history.push(self.eval_average);
            info!(
                "Games trained on: {}, average reward: {:.2}",
                self.schedule.training_played(episode + 1),
                self.eval_average
            );
            self.eval_average = 0.0;
            self.eval_played = 0;
        }

        self.episode += 1;
        self.phase = Phase::AwaitingFirstObservation;
        EpisodeSummary {
            episode,
            mode,
            outcome,
            reward,
            cycle_end,
        }
    }

    fn select(&mut self, snapshot: &Snapshot, previous: &Assignment) -> Assignment {
        let epsilon = self.epsilon();
        let mode = self.mode();
        policy::select_actions(&self.q, snapshot, previous, epsilon, mode, &mut self.rng)
    }

    /// One temporal-difference update for `footman`
    ///
    /// A footman that died this step is evaluated on a working copy of `current` that tracks
    /// it with zero health at its last known position. With no enemy left the bootstrap
    /// value is zero.
    fn learn(
        &mut self,
        previous: &Snapshot,
        current: &Snapshot,
        assignment: &Assignment,
        footman: UnitId,
        reward: f64,
    ) {
        let Some(target) = assignment.target(footman) else {
            return;
        };

        let previous_features = features::extract(previous, footman, target, assignment);
        let previous_q = self.q.q_value(&previous_features);

        let working = if current.is_friendly(footman) {
            Cow::Borrowed(current)
        } else {
            Cow::Owned(current.with_fallen(footman, previous.position(footman)))
        };

        let current_action = policy::greedy_assignment(&self.q, &working, assignment);
        let max_current_q = current_action
            .target(footman)
            .map(|t| {
                let f = features::extract(&working, footman, t, &current_action);
                self.q.q_value(&f)
            })
            .unwrap_or(0.0);

        let td_error = reward + self.gamma * max_current_q - previous_q;
        self.q.apply_update(&previous_features, td_error, self.alpha);
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::{
        agent::Agent,
        env::{
            tests::{unit, MockEnv},
            Environment,
            Side::{Enemy, Friendly},
        },
    };

    fn config(schedule: Schedule, episodes: u32) -> QAgentConfig<decay::Constant> {
        QAgentConfig {
            exploration: EpsilonGreedy::new(decay::Constant::new(0.0)),
            gamma: 0.9,
            alpha: 0.5,
            schedule,
            update_rule: UpdateRule::Uniform,
            episodes,
        }
    }

    fn agent(schedule: Schedule, episodes: u32) -> QAgent<decay::Constant, StdRng> {
        QAgent::with_weights(
            config(schedule, episodes),
            [0.0; NUM_FEATURES],
            StdRng::seed_from_u64(0),
        )
    }

    fn ordered(pairs: &[(u32, u32)]) -> Assignment {
        pairs.iter().map(|&(f, t)| (UnitId(f), UnitId(t))).collect()
    }

    /// One footman trading blows with an adjacent enemy, then a quiet step
    fn duel() -> MockEnv {
        MockEnv::new(
            vec![
                vec![unit(1, Friendly, 10, (0, 0)), unit(10, Enemy, 20, (1, 0))],
                vec![unit(1, Friendly, 8, (0, 0)), unit(10, Enemy, 14, (1, 0))],
                vec![unit(1, Friendly, 8, (0, 0)), unit(10, Enemy, 14, (1, 0))],
            ],
            Outcome::Draw,
        )
    }

    fn quiet() -> MockEnv {
        MockEnv::new(
            vec![vec![unit(1, Friendly, 10, (0, 0)), unit(10, Enemy, 20, (5, 5))]],
            Outcome::Draw,
        )
    }

    #[test]
    fn event_triggers_td_update() {
        let mut agent = agent(Schedule::new(2, 1), 1);
        let mut env = duel();
        agent.begin_episode();

        let first = agent.step(&env.reset());
        assert_eq!(first, ordered(&[(1, 10)]));
        assert_eq!(agent.weights(), &[0.0; NUM_FEATURES]);

        // reward -0.1 - 2 + 6, both Q estimates are zero
        let frame = env.step(&first).unwrap();
        let second = agent.step(&frame);
        assert_eq!(second, ordered(&[(1, 10)]));
        assert!(agent.weights().iter().all(|w| (w - 0.5 * 3.9).abs() < 1e-9));
        assert!((agent.episode_reward() - 3.9).abs() < 1e-9);
    }

    #[test]
    fn quiet_step_repeats_orders_without_learning() {
        let mut agent = agent(Schedule::new(2, 1), 1);
        let mut env = duel();
        agent.begin_episode();

        let first = agent.step(&env.reset());
        let frame = env.step(&first).unwrap();
        let second = agent.step(&frame);
        let weights = *agent.weights();

        let frame = env.step(&second).unwrap();
        assert_eq!(agent.step(&frame), second);
        assert_eq!(agent.weights(), &weights);
        assert!((agent.episode_reward() - 3.9).abs() < 1e-9);
    }

    #[test]
    fn evaluation_freezes_weights() {
        let mut agent = agent(Schedule::new(2, 1), 1);
        let mut env = duel();

        let training = agent.go(&mut env);
        assert_eq!(training.mode, Mode::Training);
        assert!(!training.cycle_end);
        assert_eq!(env.orders.len(), 3);
        let weights = *agent.weights();

        assert_eq!(agent.mode(), Mode::Evaluation);
        let evaluation = agent.go(&mut env);
        assert_eq!(evaluation.mode, Mode::Evaluation);
        assert!(evaluation.cycle_end);
        assert!((evaluation.reward - 3.9).abs() < 1e-9);
        assert_eq!(agent.weights(), &weights);

        assert_eq!(agent.history().averages().len(), 2);
        assert!((agent.history().latest() - 3.9).abs() < 1e-9);
        assert!(agent.is_finished());
    }

    #[test]
    fn evaluation_rewards_are_averaged_per_cycle() {
        let mut agent = agent(Schedule::new(3, 2), 2);
        agent.go(&mut quiet());
        agent.go(&mut duel());
        let last = agent.go(&mut quiet());
        assert!(last.cycle_end);
        assert!((agent.history().latest() - 1.95).abs() < 1e-9);
        assert!(!agent.is_finished());

        // the next cycle starts from a fresh average
        agent.go(&mut quiet());
        agent.go(&mut quiet());
        agent.go(&mut quiet());
        assert_eq!(agent.history().latest(), 0.0);
        assert!(agent.is_finished());
    }

    #[test]
    fn fallen_footman_is_still_rewarded_and_updated() {
        let mut agent = agent(Schedule::new(2, 1), 1);
        agent.begin_episode();
        agent.step(&[
            unit(1, Friendly, 5, (0, 0)),
            unit(2, Friendly, 10, (0, 2)),
            unit(10, Enemy, 20, (0, 1)),
        ]);

        // footman 1 dies next to its target, which loses 3 health
        let orders = agent.step(&[unit(2, Friendly, 10, (0, 2)), unit(10, Enemy, 17, (0, 1))]);
        assert_eq!(orders, ordered(&[(2, 10)]));
        assert!((agent.episode_reward() - (-97.1 + 2.9)).abs() < 1e-9);
        assert_ne!(agent.weights(), &[0.0; NUM_FEATURES]);
    }

    #[test]
    fn terminal_transition_is_not_rewarded() {
        // the script ends right after the first orders, as if the enemy fell at once
        let mut env = MockEnv::new(
            vec![vec![unit(1, Friendly, 10, (0, 0)), unit(10, Enemy, 1, (1, 0))]],
            Outcome::Victory,
        );
        let mut agent = agent(Schedule::new(2, 1), 1);
        let summary = agent.go(&mut env);
        assert_eq!(summary.outcome, Outcome::Victory);
        assert_eq!(summary.reward, 0.0);
        assert_eq!(agent.weights(), &[0.0; NUM_FEATURES]);
    }

    #[test]
    fn no_enemies_means_no_orders() {
        let mut agent = agent(Schedule::default(), 10);
        agent.begin_episode();
        assert!(agent.step(&[unit(1, Friendly, 10, (0, 0))]).is_empty());
    }

    #[test]
    fn epsilon_decays_per_completed_cycle() {
        let config = QAgentConfig {
            schedule: Schedule::new(2, 1),
            ..QAgentConfig::<decay::Linear>::default()
        };
        let mut agent = QAgent::new(config, StdRng::seed_from_u64(7));
        assert!((agent.epsilon() - 0.1).abs() < 1e-12);

        agent.go(&mut quiet());
        assert!((agent.epsilon() - 0.1).abs() < 1e-12);
        agent.go(&mut quiet());
        assert!((agent.epsilon() - 0.098).abs() < 1e-12);
    }

    #[test]
    fn default_config() {
        let config = QAgentConfig::<decay::Linear>::default();
        assert_eq!(config.gamma, 0.9);
        assert_eq!(config.alpha, 1e-4);
        assert_eq!(config.schedule, Schedule::new(15, 5));
        assert_eq!(config.update_rule, UpdateRule::Uniform);
        assert!((config.exploration.epsilon(0.0) - 0.1).abs() < 1e-12);
    }

    #[test]
    #[should_panic]
    fn rejects_learning_rate_above_one() {
        let config = QAgentConfig {
            alpha: 1.5,
            ..config(Schedule::default(), 1)
        };
        QAgent::new(config, StdRng::seed_from_u64(0));
    }
}
