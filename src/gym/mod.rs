pub mod skirmish;

pub use skirmish::{Skirmish, SkirmishConfig};
