use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use log::{debug, warn};

use crate::{
    error::{Error, Result},
    features::NUM_FEATURES,
};

/// Durable storage for the weight vector
pub trait WeightStore {
    /// **Returns** the stored weights, or `None` if nothing has been stored yet
    fn load(&self) -> Result<Option<[f64; NUM_FEATURES]>>;

    /// Overwrite the stored weights
    fn save(&self, weights: &[f64; NUM_FEATURES]) -> Result<()>;
}

/// Plain text file holding one weight per line
#[derive(Debug, Clone)]
pub struct TextFileStore {
    path: PathBuf,
}

impl TextFileStore {
    pub const DEFAULT_PATH: &'static str = "agent_weights/weights.txt";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> Error {
        Error::WeightIo {
            path: self.path.clone(),
            source,
        }
    }
}

impl Default for TextFileStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PATH)
    }
}

impl WeightStore for TextFileStore {
    fn load(&self) -> Result<Option<[f64; NUM_FEATURES]>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("No weights found at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let weights = contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                line.trim()
                    .parse::<f64>()
                    .map_err(|_| Error::MalformedWeight {
                        path: self.path.clone(),
                        line: i + 1,
                        value: line.to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let found = weights.len();
        let weights = weights.try_into().map_err(|_| Error::WeightCount {
            path: self.path.clone(),
            expected: NUM_FEATURES,
            found,
        })?;

        debug!("Loaded weights from {}", self.path.display());
        Ok(Some(weights))
    }

    fn save(&self, weights: &[f64; NUM_FEATURES]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let mut file = fs::File::create(&self.path).map_err(|e| self.io_error(e))?;
        for weight in weights {
            writeln!(file, "{weight:.6}").map_err(|e| self.io_error(e))?;
        }
        file.flush().map_err(|e| self.io_error(e))
    }
}
