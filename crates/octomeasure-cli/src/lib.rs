//! Command-line front end for the OctoMeasure engine.
//!
//! A measure JSON file is mounted into an in-memory repository, one engine
//! operation runs against it and the saved aggregate is written back.

pub mod cli;
pub mod commands;
pub mod config;
pub mod measure_file;
pub mod observability;
pub mod output;

pub use commands::{CommandContext, Outcome};
pub use config::AppConfig;
pub use measure_file::MeasureFile;
