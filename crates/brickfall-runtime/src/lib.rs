//! Asynchronous host for the brickfall rules engine.
//!
//! [`GameRuntime`] owns the only mutable game snapshot. Actions from any
//! number of [`GameHandle`]s are applied one at a time, animated transitions
//! are played back with their pacing, and every new snapshot is published to
//! subscribers. An optional ticker feeds `GameTick` at the current level's
//! speed.

pub use self::{
    config::RuntimeConfig,
    runtime::{GameHandle, GameRuntime},
    sink::{SilentSink, SoundSink},
};

mod actor;
mod config;
mod runtime;
mod sink;
mod ticker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum RuntimeError {
    #[display("game runtime has shut down")]
    Closed,
}
