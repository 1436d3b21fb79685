/// Whether the controller learns from the current episode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Epsilon-greedy selection and TD updates
    Training,
    /// Greedy selection with frozen weights, played only to measure the policy
    Evaluation,
}

/// Alternation of training and evaluation episodes
///
/// Episodes are grouped in cycles of `cycle` episodes; the last `evaluation` episodes of
/// every cycle run in [`Mode::Evaluation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    cycle: u32,
    evaluation: u32,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            cycle: 15,
            evaluation: 5,
        }
    }
}

impl Schedule {
    /// **Panics** if `evaluation` does not leave at least one training episode per cycle
    pub fn new(cycle: u32, evaluation: u32) -> Self {
        assert!(
            evaluation < cycle,
            "A cycle of {cycle} episodes cannot hold {evaluation} evaluation episodes."
        );
        Self { cycle, evaluation }
    }

    pub fn cycle_len(&self) -> u32 {
        self.cycle
    }

    pub fn training_per_cycle(&self) -> u32 {
        self.cycle - self.evaluation
    }

    /// Mode of the 0-based `episode`
    pub fn mode(&self, episode: u32) -> Mode {
        if episode % self.cycle >= self.training_per_cycle() {
            Mode::Evaluation
        } else {
            Mode::Training
        }
    }

    /// Position of `episode` inside its phase, counted from 1
    pub fn index_in_phase(&self, episode: u32) -> u32 {
        match self.mode(episode) {
            Mode::Training => episode % self.cycle + 1,
            Mode::Evaluation => episode % self.cycle - self.training_per_cycle() + 1,
        }
    }

    /// Whether `episode` closes a full training/evaluation cycle
    pub fn is_cycle_end(&self, episode: u32) -> bool {
        (episode + 1) % self.cycle == 0
    }

    /// Number of full cycles contained in the first `played` episodes
    pub fn completed_cycles(&self, played: u32) -> u32 {
        played / self.cycle
    }

    /// Number of training episodes among the first `played` episodes
    pub fn training_played(&self, played: u32) -> u32 {
        self.completed_cycles(played) * self.training_per_cycle()
            + (played % self.cycle).min(self.training_per_cycle())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule_ends_cycles_with_five_evaluations() {
        let schedule = Schedule::default();
        let modes = (0..15).map(|e| schedule.mode(e)).collect::<Vec<_>>();
        assert!(modes[..10].iter().all(|&m| m == Mode::Training));
        assert!(modes[10..].iter().all(|&m| m == Mode::Evaluation));
        assert_eq!(schedule.mode(15), Mode::Training);
        assert_eq!(schedule.mode(29), Mode::Evaluation);
    }

    #[test]
    fn cycle_bookkeeping() {
        let schedule = Schedule::default();
        assert!(!schedule.is_cycle_end(13));
        assert!(schedule.is_cycle_end(14));
        assert!(schedule.is_cycle_end(29));
        assert_eq!(schedule.completed_cycles(30), 2);
        assert_eq!(schedule.training_played(15), 10);
        assert_eq!(schedule.training_played(18), 13);
        assert_eq!(schedule.training_played(27), 20);
        assert_eq!(schedule.index_in_phase(3), 4);
        assert_eq!(schedule.index_in_phase(10), 1);
        assert_eq!(schedule.index_in_phase(14), 5);
    }

    #[test]
    #[should_panic(expected = "cannot hold")]
    fn rejects_cycle_without_training() {
        Schedule::new(5, 5);
    }
}
