//! Pull request URL decomposition.

use std::fmt;

use url::Url;

use crate::error::ChiefrError;

/// A pull request addressed as `{host}/{owner}/{repo}/pull/{number}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    /// Host serving the pull request, e.g. `github.com`.
    pub host: String,
    /// Owning user or organisation.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Pull request number.
    pub number: u64,
}

impl PullRequestRef {
    /// Parses a pull request URL.
    ///
    /// The path must be exactly `/{owner}/{repo}/pull/{number}`. Anything
    /// else is rejected before any tracker is contacted.
    pub fn parse(pr_url: &str) -> Result<Self, ChiefrError> {
        let invalid = || ChiefrError::InvalidPullRequestUrl(pr_url.to_string());

        let url = Url::parse(pr_url).map_err(|_| invalid())?;
        let host = url.host_str().filter(|h| !h.is_empty()).ok_or_else(invalid)?;

        let parts: Vec<&str> = url.path().split('/').collect();
        let [root, owner, repo, marker, number] = parts.as_slice() else {
            return Err(invalid());
        };
        if !root.is_empty() || owner.is_empty() || repo.is_empty() || *marker != "pull" {
            return Err(invalid());
        }
        if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let number = number.parse().map_err(|_| invalid())?;

        Ok(Self {
            host: host.to_string(),
            owner: (*owner).to_string(),
            repo: (*repo).to_string(),
            number,
        })
    }
}

impl fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}
