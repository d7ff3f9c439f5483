pub mod runner;

pub use runner::{CommandRunner, RunOutcome, DEFAULT_TIMEOUT};
