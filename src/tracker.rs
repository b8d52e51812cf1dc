//! Issue-tracker integration.
//!
//! [`update_pull_request`] decides what a pull request needs once its
//! changeset has been resolved, and drives a [`TrackerClient`] to do it.

pub mod github;
mod pull_request;
#[cfg(test)]
pub(crate) mod test_utils;

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};
use url::Url;

use crate::error::ChiefrError;
use crate::resolve::ResolvedSet;
pub use github::GitHubTracker;
pub use pull_request::PullRequestRef;

/// Future returned by every [`TrackerClient`] operation.
pub type TrackerFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Open/closed state of a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestState {
    /// Accepting review.
    Open,
    /// Closed without merging.
    Closed,
}

impl PullRequestState {
    /// Wire name of the state.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for PullRequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remote operations the update driver needs from a tracker.
pub trait TrackerClient: Send + Sync {
    /// Adds labels to the pull request.
    fn add_labels<'a>(&'a self, pr: &'a PullRequestRef, labels: &'a [String])
        -> TrackerFuture<'a>;

    /// Adds assignees to the pull request.
    fn add_assignees<'a>(
        &'a self,
        pr: &'a PullRequestRef,
        assignees: &'a [String],
    ) -> TrackerFuture<'a>;

    /// Posts a comment on the pull request.
    fn post_comment<'a>(&'a self, pr: &'a PullRequestRef, body: &'a str) -> TrackerFuture<'a>;

    /// Opens or closes the pull request.
    fn set_state<'a>(&'a self, pr: &'a PullRequestRef, state: PullRequestState)
        -> TrackerFuture<'a>;
}

/// Tracker services chiefr knows how to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerKind {
    /// github.com
    GitHub,
}

impl TrackerKind {
    /// Picks the tracker serving `pr_url`, judged by its host.
    pub fn from_url(pr_url: &str) -> Result<Self, ChiefrError> {
        let url = Url::parse(pr_url)
            .map_err(|_| ChiefrError::InvalidPullRequestUrl(pr_url.to_string()))?;
        match url.host_str() {
            Some("github.com" | "www.github.com") => Ok(Self::GitHub),
            _ => Err(ChiefrError::UnsupportedTracker(pr_url.to_string())),
        }
    }

    /// Environment variables consulted for a token when none is given.
    pub fn token_env_vars(self) -> &'static [&'static str] {
        match self {
            Self::GitHub => &["CHIEFR_GITHUB_TOKEN", "GITHUB_TOKEN"],
        }
    }

    /// Builds an authenticated client for this tracker.
    pub fn client(self, token: String) -> Result<Box<dyn TrackerClient>> {
        match self {
            Self::GitHub => Ok(Box::new(GitHubTracker::from_env(token)?)),
        }
    }
}

impl fmt::Display for TrackerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GitHub => f.write_str("GitHub"),
        }
    }
}

/// What [`update_pull_request`] did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PullRequestUpdate {
    /// The pull request targets an owned repository and was labelled and
    /// assigned.
    Assigned {
        /// Repository the pull request was matched to.
        repository: String,
        /// Labels added.
        labels: Vec<String>,
        /// Assignees added.
        assignees: Vec<String>,
    },
    /// The pull request targets the wrong repository and was closed with a
    /// pointer to the right one.
    Redirected {
        /// Repository the author was pointed at.
        repository: String,
    },
}

/// Text of the comment left on a pull request sent to the wrong repository.
pub fn redirect_comment(repository: &str) -> String {
    format!(
        "This pull request does not belong to this repository. \
         Please submit it to {repository} instead."
    )
}

/// Labels, assigns, or redirects the pull request at `pr_url` according to
/// the resolved segments.
///
/// Calls are made one at a time and the first failure ends the update;
/// mutations that already succeeded are not undone.
pub async fn update_pull_request(
    tracker: &dyn TrackerClient,
    pr_url: &str,
    segments: &ResolvedSet<'_>,
    close_if_unowned: bool,
) -> Result<PullRequestUpdate> {
    if segments.is_empty() {
        return Err(ChiefrError::NoSegments.into());
    }

    let assignees: Vec<String> = segments.chiefs().into_iter().map(String::from).collect();
    if assignees.is_empty() {
        return Err(ChiefrError::NoChiefsResolved.into());
    }
    let labels: Vec<String> = segments.topics().into_iter().map(String::from).collect();

    let pr = PullRequestRef::parse(pr_url)?;
    let ordered = segments.ordered();
    let target = ordered
        .iter()
        .find(|s| !s.repository.is_empty() && pr_url.starts_with(s.repository.as_str()));

    if let Some(segment) = target {
        info!(
            pr = %pr,
            repository = %segment.repository,
            "Pull request targets an owned repository"
        );

        if labels.is_empty() {
            debug!(pr = %pr, "No topics resolved, skipping labels");
        } else {
            tracker.add_labels(&pr, &labels).await?;
        }
        tracker.add_assignees(&pr, &assignees).await?;

        return Ok(PullRequestUpdate::Assigned {
            repository: segment.repository.clone(),
            labels,
            assignees,
        });
    }

    if !close_if_unowned {
        return Err(ChiefrError::NoRepositoryFound.into());
    }

    let Some(canonical) = ordered.iter().find(|s| !s.repository.is_empty()) else {
        return Err(ChiefrError::NoRepositoryFound.into());
    };

    info!(pr = %pr, repository = %canonical.repository, "Redirecting pull request");
    tracker
        .post_comment(&pr, &redirect_comment(&canonical.repository))
        .await?;
    tracker.set_state(&pr, PullRequestState::Closed).await?;

    Ok(PullRequestUpdate::Redirected {
        repository: canonical.repository.clone(),
    })
}
