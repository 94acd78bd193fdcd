//! Random B-roll gap filling.
//!
//! A fill draws segments at random from a project's media pool and lays them
//! end to end on one video track until a target length is reached, either
//! matching where a reference track ends or adding a fixed duration.

pub mod catalog;
pub mod cli;
mod commands;
pub mod config;
pub mod error;
pub mod executor;
pub mod host;
pub mod model;
pub mod planner;
pub mod project;
mod report;
pub mod settings;
pub mod target;
pub mod timecode;

pub use cli::BrollCommands;
pub use commands::handle_broll_command;
