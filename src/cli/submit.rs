//! Submit command.

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use tracing::warn;

use super::OutputFormat;
use crate::config::MaintainersConfig;
use crate::data::SubmitReport;
use crate::git::GitRepository;
use crate::resolve::resolve;

/// Reports which repositories a patch should be submitted to.
#[derive(Parser)]
pub struct SubmitCommand {
    /// Git revision of the patch's first commit.
    #[arg(default_value = "HEAD")]
    pub revision: String,

    /// Diff against the working tree and index instead of HEAD.
    #[arg(long)]
    pub worktree: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

impl SubmitCommand {
    /// Executes the submit command.
    pub fn execute(self, config: &MaintainersConfig, repo_path: &Path) -> Result<()> {
        let output = self.render(config, repo_path)?;
        print!("{output}");
        Ok(())
    }

    /// Resolves the changeset and builds the report text.
    pub fn render(&self, config: &MaintainersConfig, repo_path: &Path) -> Result<String> {
        let repo = GitRepository::open_at(repo_path)?;
        let patches = repo.changeset(&self.revision, self.worktree)?;

        let resolution = resolve(config, &patches);
        let unowned_paths = resolution.unowned_paths().to_vec();
        for path in &unowned_paths {
            warn!(path = %path, "No segment owns this file");
        }

        let segments = resolution.into_owned()?;
        let report = SubmitReport::new(&self.revision, self.worktree, &segments, unowned_paths);
        self.format.render(&report)
    }
}
