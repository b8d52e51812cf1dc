//! Update-pull-request command.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, warn};

use crate::config::MaintainersConfig;
use crate::data::UpdateSummary;
use crate::error::ChiefrError;
use crate::git::GitRepository;
use crate::resolve::resolve;
use crate::tracker::{update_pull_request, TrackerKind};
use crate::utils::get_env_vars;

/// Labels and assigns a pull request, or redirects it to the right repository.
#[derive(Parser)]
pub struct UpdatePullRequestCommand {
    /// Git revision of the patch's first commit.
    pub revision: String,

    /// URL of the pull request.
    pub pull_request_url: String,

    /// API key of the project; read from the environment when omitted.
    pub api_key: Option<String>,

    /// Close pull requests sent to a repository no resolved segment owns.
    #[arg(long)]
    pub close_unowned: bool,

    /// Only inspect the working tree changes against REVISION.
    #[arg(long)]
    pub worktree: bool,
}

impl UpdatePullRequestCommand {
    /// Executes the update-pull-request command.
    pub fn execute(self, config: &MaintainersConfig, repo_path: &Path) -> Result<()> {
        let kind = TrackerKind::from_url(&self.pull_request_url)?;
        let token = self.token(kind)?;

        let repo = GitRepository::open_at(repo_path)?;
        let patches = repo.changeset(&self.revision, self.worktree)?;
        let resolution = resolve(config, &patches);
        for path in resolution.unowned_paths() {
            warn!(path = %path, "No segment owns this file");
        }
        let segments = resolution.into_owned()?;

        let tracker = kind.client(token)?;
        let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
        let update = rt
            .block_on(update_pull_request(
                tracker.as_ref(),
                &self.pull_request_url,
                &segments,
                self.close_unowned,
            ))
            .with_context(|| format!("Failed to update pull request {}", self.pull_request_url))?;

        print!("{}", UpdateSummary(&update));
        Ok(())
    }

    fn token(&self, kind: TrackerKind) -> Result<String> {
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) {
            return Ok(key.to_string());
        }

        let vars = kind.token_env_vars();
        debug!(tracker = %kind, ?vars, "No API key given, checking environment");
        get_env_vars(vars).map_err(|_| ChiefrError::MissingToken(vars.join(", ")).into())
    }
}
