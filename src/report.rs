use std::{fmt, path::Path};

use crate::error::Result;

const GAMES_HEADER: &str = "Games Played      ";
const SEPARATOR: &str = "-------------     ";

/// Average cumulative evaluation reward after every training/evaluation cycle
///
/// The first entry is the `0.0` baseline recorded before any training.
#[derive(Debug, Clone, PartialEq)]
pub struct RewardHistory {
    averages: Vec<f64>,
    games_per_cycle: u32,
}

impl RewardHistory {
    pub fn new(games_per_cycle: u32) -> Self {
        Self {
            averages: vec![0.0],
            games_per_cycle,
        }
    }

    pub fn push(&mut self, average: f64) {
        self.averages.push(average);
    }

    pub fn averages(&self) -> &[f64] {
        &self.averages
    }

    pub fn latest(&self) -> f64 {
        self.averages.last().copied().unwrap_or_default()
    }

    /// `(training games played, average reward)` rows
    pub fn rows(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.averages
            .iter()
            .enumerate()
            .map(|(i, &avg)| (i as u32 * self.games_per_cycle, avg))
    }

    /// Export the rows as CSV with a `games_played,average_reward` header
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)?;
        wtr.write_record(["games_played", "average_reward"])?;
        for (games, avg) in self.rows() {
            wtr.write_record(&[games.to_string(), format!("{avg:.2}")])?;
        }
        wtr.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

impl fmt::Display for RewardHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{GAMES_HEADER}Average Cumulative Reward")?;
        writeln!(f, "{SEPARATOR}-------------------------")?;
        for (games, avg) in self.rows() {
            writeln!(f, "{:<width$}{avg:.2}", games, width = SEPARATOR.len())?;
        }
        Ok(())
    }
}
