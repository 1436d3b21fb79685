pub mod linear_q;
pub mod policy;
pub mod q_agent;
pub mod schedule;

pub use linear_q::{LinearQ, UpdateRule};
pub use q_agent::{EpisodeSummary, QAgent, QAgentConfig};
pub use schedule::{Mode, Schedule};
