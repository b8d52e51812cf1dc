//! GitHub REST implementation of [`TrackerClient`].

use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use tracing::{debug, info};

use super::{PullRequestRef, PullRequestState, TrackerClient, TrackerFuture};
use crate::error::ChiefrError;
use crate::utils::settings::get_env_var;

/// Public GitHub API root.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Environment variable overriding [`DEFAULT_API_URL`].
pub const API_URL_ENV: &str = "CHIEFR_GITHUB_API_URL";

/// HTTP request timeout for tracker calls.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const API_VERSION: &str = "2022-11-28";

#[derive(Serialize)]
struct LabelsBody<'a> {
    labels: &'a [String],
}

#[derive(Serialize)]
struct AssigneesBody<'a> {
    assignees: &'a [String],
}

#[derive(Serialize)]
struct CommentBody<'a> {
    body: &'a str,
}

#[derive(Serialize)]
struct StateBody {
    state: PullRequestState,
}

/// GitHub tracker client authenticated with a personal access token.
pub struct GitHubTracker {
    client: Client,
    base_api: String,
    token: String,
}

impl GitHubTracker {
    /// Creates a client against the public GitHub API.
    pub fn new(token: String) -> Result<Self> {
        Self::with_base_url(token, DEFAULT_API_URL)
    }

    /// Creates a client against `base_api`, e.g. a GitHub Enterprise root.
    pub fn with_base_url(token: String, base_api: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("chiefr/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ChiefrError::TrackerRequest {
                operation: "build HTTP client",
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_api: base_api.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Creates a client, honouring an API root override from the
    /// environment or settings file.
    pub fn from_env(token: String) -> Result<Self> {
        match get_env_var(API_URL_ENV) {
            Ok(base) if !base.trim().is_empty() => {
                debug!(base = %base, "Using GitHub API override");
                Self::with_base_url(token, base.trim())
            }
            _ => Self::new(token),
        }
    }

    fn issue_url(&self, pr: &PullRequestRef, suffix: &str) -> String {
        format!(
            "{}/repos/{}/{}/issues/{}/{suffix}",
            self.base_api, pr.owner, pr.repo, pr.number
        )
    }

    fn pull_url(&self, pr: &PullRequestRef) -> String {
        format!(
            "{}/repos/{}/{}/pulls/{}",
            self.base_api, pr.owner, pr.repo, pr.number
        )
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    async fn send(&self, operation: &'static str, builder: RequestBuilder) -> Result<()> {
        let response = self
            .authorized(builder)
            .send()
            .await
            .map_err(|e| ChiefrError::TrackerRequest {
                operation,
                message: e.to_string(),
            })?;
        check_error_response(operation, response).await
    }
}

async fn check_error_response(operation: &'static str, response: Response) -> Result<()> {
    if response.status().is_success() {
        return Ok(());
    }
    let status = response.status();
    let error_text = response.text().await.unwrap_or_else(|e| {
        debug!("Failed to read error response body: {e}");
        String::new()
    });
    Err(ChiefrError::TrackerRequest {
        operation,
        message: format!("HTTP {status}: {error_text}"),
    }
    .into())
}

impl TrackerClient for GitHubTracker {
    fn add_labels<'a>(
        &'a self,
        pr: &'a PullRequestRef,
        labels: &'a [String],
    ) -> TrackerFuture<'a> {
        Box::pin(async move {
            info!(pr = %pr, ?labels, "Adding labels");
            let request = self
                .client
                .post(self.issue_url(pr, "labels"))
                .json(&LabelsBody { labels });
            self.send("add labels to pull request", request).await
        })
    }

    fn add_assignees<'a>(
        &'a self,
        pr: &'a PullRequestRef,
        assignees: &'a [String],
    ) -> TrackerFuture<'a> {
        Box::pin(async move {
            info!(pr = %pr, ?assignees, "Adding assignees");
            let request = self
                .client
                .post(self.issue_url(pr, "assignees"))
                .json(&AssigneesBody { assignees });
            self.send("add assignees to pull request", request).await
        })
    }

    fn post_comment<'a>(&'a self, pr: &'a PullRequestRef, body: &'a str) -> TrackerFuture<'a> {
        Box::pin(async move {
            info!(pr = %pr, "Posting comment");
            let request = self
                .client
                .post(self.issue_url(pr, "comments"))
                .json(&CommentBody { body });
            self.send("comment on pull request", request).await
        })
    }

    fn set_state<'a>(
        &'a self,
        pr: &'a PullRequestRef,
        state: PullRequestState,
    ) -> TrackerFuture<'a> {
        Box::pin(async move {
            info!(pr = %pr, %state, "Setting pull request state");
            let request = self
                .client
                .patch(self.pull_url(pr))
                .json(&StateBody { state });
            self.send("change pull request state", request).await
        })
    }
}
