//! Command execution against a mounted measure file.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use octomeasure_core::{Group, Measure, TestCase};
use octomeasure_cql::ElmOracle;
use octomeasure_engine::MeasureEngine;

use crate::cli::{Commands, GroupCommands};
use crate::config::AppConfig;
use crate::measure_file::MeasureFile;

/// What a command produced, for rendering.
#[derive(Debug)]
pub enum Outcome {
    Groups(Vec<Group>),
    Group(Group),
    Measure(Measure),
    TestCases(Vec<TestCase>),
}

pub struct CommandContext {
    file: MeasureFile,
    engine: MeasureEngine,
    user: Option<String>,
}

impl CommandContext {
    pub fn new(file: MeasureFile, config: &AppConfig, user: Option<String>) -> Self {
        let oracle = Arc::new(ElmOracle::new(&config.cql));
        let engine = MeasureEngine::new(file.repository(), oracle, &config.engine);
        Self { file, engine, user }
    }

    pub fn file(&self) -> &MeasureFile {
        &self.file
    }

    fn acting_user(&self) -> Result<&str> {
        self.user
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .context("This command changes the measure; pass --user or set OCTOMEASURE_USER")
    }

    pub async fn execute(&self, command: &Commands) -> Result<Outcome> {
        let measure_id = self.file.measure_id();
        let outcome = match command {
            Commands::Group(args) => match &args.command {
                GroupCommands::List => {
                    Outcome::Groups(self.engine.groups().list_groups(measure_id).await?)
                }
                GroupCommands::Upsert(input) => {
                    let group = read_group(&input.file)?;
                    let user = self.acting_user()?;
                    Outcome::Group(self.engine.groups().upsert_group(group, measure_id, user).await?)
                }
                GroupCommands::Delete { group_id } => {
                    let user = self.acting_user()?;
                    Outcome::Measure(
                        self.engine
                            .groups()
                            .delete_group(measure_id, group_id, user)
                            .await?,
                    )
                }
                GroupCommands::Validate(input) => {
                    let group = read_group(&input.file)?;
                    Outcome::Group(self.engine.groups().validate_group(group, measure_id).await?)
                }
            },
            Commands::Version(args) => {
                let user = self.acting_user()?;
                Outcome::Measure(
                    self.engine
                        .versions()
                        .create_version(measure_id, &args.increment, user)
                        .await?,
                )
            }
            Commands::Reconcile(args) => {
                let user = self.acting_user()?;
                Outcome::TestCases(
                    self.engine
                        .groups()
                        .reconcile_group(measure_id, &args.group_id, user)
                        .await?,
                )
            }
            Commands::Config => anyhow::bail!("config does not operate on a measure"),
        };
        Ok(outcome)
    }
}

fn read_group(file: &Option<PathBuf>) -> Result<Group> {
    let content = match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            buf
        }
    };
    serde_json::from_str(&content).context("Invalid group JSON")
}
