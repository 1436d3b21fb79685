use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised outside the learning loop itself: weight storage, report export and
/// hyperparameter schedules
#[derive(Debug, Error)]
pub enum Error {
    #[error("`vi - vf` must have same sign as `rate` (rate: {rate}, vi: {vi}, vf: {vf})")]
    InvalidDecay { rate: f64, vi: f64, vf: f64 },

    #[error("Failed to access weights at {path}: {source}")]
    WeightIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid weight on line {line} of {path}: {value:?}")]
    MalformedWeight {
        path: PathBuf,
        line: usize,
        value: String,
    },

    #[error("Expected {expected} weights in {path}, found {found}")]
    WeightCount {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("Failed to export reward history: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_count_display() {
        let e = Error::WeightCount {
            path: PathBuf::from("agent_weights/weights.txt"),
            expected: 9,
            found: 4,
        };
        assert_eq!(
            e.to_string(),
            "Expected 9 weights in agent_weights/weights.txt, found 4"
        );
    }

    #[test]
    fn malformed_weight_display() {
        let e = Error::MalformedWeight {
            path: PathBuf::from("w.txt"),
            line: 3,
            value: String::from("abc"),
        };
        assert!(e.to_string().contains("line 3"));
    }
}
