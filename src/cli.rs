//! CLI interface for chiefr.

use std::fmt::Display;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use crate::config::{MaintainersConfig, DEFAULT_MAINTAINERS_FILE};
use crate::data::to_yaml;

pub mod list;
pub mod submit;
pub mod update_pr;

pub use list::ListCommand;
pub use submit::SubmitCommand;
pub use update_pr::UpdatePullRequestCommand;

/// chiefr: route patches and pull requests to the segments that own them.
#[derive(Parser)]
#[command(name = "chiefr")]
#[command(about = "Distributed source code maintenance toolkit", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Maintainers configuration file.
    #[arg(short = 'm', long, global = true, default_value = DEFAULT_MAINTAINERS_FILE)]
    pub maintainers_file: PathBuf,

    /// Path of the git repository to inspect.
    #[arg(long, global = true, default_value = ".")]
    pub repo_path: PathBuf,

    /// The command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Lists project segments.
    List(ListCommand),
    /// Shows where a patch should be submitted.
    Submit(SubmitCommand),
    /// Updates pull request chiefs and topics according to the maintainers file.
    #[command(name = "update-pull-request")]
    UpdatePullRequest(UpdatePullRequestCommand),
}

/// Output formats for reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text for people.
    #[default]
    Text,
    /// YAML for scripts.
    Yaml,
}

impl OutputFormat {
    /// Renders `report` in this format.
    pub fn render<T: Serialize + Display>(self, report: &T) -> Result<String> {
        match self {
            Self::Text => Ok(report.to_string()),
            Self::Yaml => to_yaml(report),
        }
    }
}

impl Cli {
    /// Executes the CLI command.
    pub fn execute(self) -> Result<()> {
        let config = MaintainersConfig::load(&self.maintainers_file).with_context(|| {
            format!(
                "Failed to load maintainers file '{}'",
                self.maintainers_file.display()
            )
        })?;

        match self.command {
            Commands::List(cmd) => cmd.execute(&config),
            Commands::Submit(cmd) => cmd.execute(&config, &self.repo_path),
            Commands::UpdatePullRequest(cmd) => cmd.execute(&config, &self.repo_path),
        }
    }
}
