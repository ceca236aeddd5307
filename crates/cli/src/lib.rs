mod app;
pub mod command;
mod logging;

/// Re-exports.
pub use app::{Args, Outcome, RunCmd};
