//! The fetch → merge → persist cycle and the loop that drives it.

pub mod cycle;
pub mod scheduler;

pub use cycle::{CycleOutcome, Pipeline};
pub use scheduler::{Schedule, Scheduler};
