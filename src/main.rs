//! Train the footman controller against the built-in skirmish simulator.
use std::{error::Error, path::PathBuf};

use clap::Parser;
use log::{info, warn};
use rand::{rngs::StdRng, SeedableRng};
use skirmish::{
    agent::Agent,
    algo::{QAgent, QAgentConfig},
    decay::Linear,
    features::NUM_FEATURES,
    gym::{Skirmish, SkirmishConfig},
    persist::{TextFileStore, WeightStore},
};
use tracing_subscriber::EnvFilter;

const DEFAULT_EPISODES: u32 = 100;

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Number of training episodes to play
    episodes: Option<u32>,

    /// Resume from stored weights (true/false)
    load_weights: Option<String>,

    /// Weight file
    #[arg(long, default_value = TextFileStore::DEFAULT_PATH)]
    weights: PathBuf,

    /// Seed for weight initialisation, exploration and the simulator
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Export the reward history as CSV when the run is over
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn parse_flag(value: Option<&str>) -> bool {
    match value.map(str::to_ascii_lowercase).as_deref() {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        Some(other) => {
            warn!("Unrecognised load flag {other:?}, not loading weights");
            false
        }
        None => {
            warn!("No load flag given, not loading weights");
            false
        }
    }
}

fn episode_budget(episodes: Option<u32>) -> u32 {
    episodes.unwrap_or_else(|| {
        warn!("No episode budget given, defaulting to {DEFAULT_EPISODES}");
        DEFAULT_EPISODES
    })
}

/// Stored weights, if requested and readable
///
/// An unreadable file is logged and treated as absent; a malformed one is an error.
fn restore(
    store: &impl WeightStore,
    load: bool,
) -> skirmish::Result<Option<[f64; NUM_FEATURES]>> {
    if !load {
        return Ok(None);
    }
    match store.load() {
        Ok(weights) => Ok(weights),
        Err(e @ skirmish::Error::WeightIo { .. }) => {
            warn!("{e}");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// **Returns** whether the weights were written; failures are logged and training goes on
fn persist(store: &impl WeightStore, weights: &[f64; NUM_FEATURES]) -> bool {
    match store.save(weights) {
        Ok(()) => true,
        Err(e) => {
            warn!("{e}");
            false
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let episodes = episode_budget(args.episodes);
    let load = parse_flag(args.load_weights.as_deref());
    let store = TextFileStore::new(args.weights);

    let mut rng = StdRng::seed_from_u64(args.seed);
    let agent_rng = StdRng::from_rng(&mut rng)?;
    let env_rng = StdRng::from_rng(&mut rng)?;

    let config = QAgentConfig {
        episodes,
        ..QAgentConfig::<Linear>::default()
    };
    let stored = restore(&store, load)?;
    let mut agent = match stored {
        Some(weights) => {
            info!("Resuming from {}", store.path().display());
            QAgent::with_weights(config, weights, agent_rng)
        }
        None => {
            if load {
                warn!("Falling back to random weights");
            }
            QAgent::new(config, agent_rng)
        }
    };

    let mut env = Skirmish::new(SkirmishConfig::default(), env_rng);
    while !agent.is_finished() {
        let summary = agent.go(&mut env);
        persist(&store, agent.weights());
        if summary.cycle_end {
            println!("{}", agent.history());
        }
    }

    if let Some(path) = args.csv {
        agent.history().write_csv(&path)?;
        info!("Wrote reward history to {}", path.display());
    }

    Ok(())
}
