use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "octomeasure")]
#[command(about = "OctoMeasure CLI: keep measure groups, test cases and versions consistent")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Measure JSON file to operate on
    #[arg(short, long, global = true, env = "OCTOMEASURE_MEASURE")]
    pub measure: Option<PathBuf>,

    /// Acting user (checked against the measure owner and ACLs)
    #[arg(short, long, global = true, env = "OCTOMEASURE_USER")]
    pub user: Option<String>,

    /// Configuration file (defaults to octomeasure.toml)
    #[arg(short, long, global = true, env = "OCTOMEASURE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Run the operation without writing the measure file back
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect and edit measure groups
    Group(GroupArgs),
    /// Finalize a draft measure under a new version
    Version(VersionArgs),
    /// Reset test-case expectations for a group to its current scoring
    Reconcile(ReconcileArgs),
    /// Show the effective configuration
    Config,
}

#[derive(clap::Args)]
pub struct GroupArgs {
    #[command(subcommand)]
    pub command: GroupCommands,
}

#[derive(Subcommand)]
pub enum GroupCommands {
    /// List the measure's groups
    List,
    /// Insert a group or replace the one with the same id
    Upsert(GroupInput),
    /// Delete a group by id
    Delete {
        /// Group id
        group_id: String,
    },
    /// Validate a group without saving it
    Validate(GroupInput),
}

#[derive(clap::Args)]
pub struct GroupInput {
    /// Path to group JSON file (reads from stdin if omitted)
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct VersionArgs {
    /// MAJOR, MINOR or PATCH
    pub increment: String,
}

#[derive(clap::Args)]
pub struct ReconcileArgs {
    /// Group id
    pub group_id: String,
}
