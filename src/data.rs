//! Report types printed by the command layer.

use std::fmt;

use serde::Serialize;

use crate::resolve::ResolvedSet;
use crate::segment::Segment;
use crate::tracker::PullRequestUpdate;

pub mod yaml;

pub use yaml::to_yaml;

/// Output of `chiefr list`.
#[derive(Debug, Serialize)]
pub struct ListReport<'a> {
    /// Path the listing was filtered by, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<&'a str>,
    /// Matching segments in priority order.
    pub segments: Vec<&'a Segment>,
}

impl<'a> ListReport<'a> {
    /// Builds the report from segments already filtered by the caller.
    pub fn new(path: Option<&'a str>, segments: &ResolvedSet<'a>) -> Self {
        Self {
            path,
            segments: segments.ordered(),
        }
    }
}

impl fmt::Display for ListReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// Output of `chiefr submit`.
#[derive(Debug, Serialize)]
pub struct SubmitReport<'a> {
    /// Starting revision of the changeset.
    pub revision: &'a str,
    /// Whether uncommitted changes were included.
    pub worktree: bool,
    /// Distinct repositories to submit to, highest priority first.
    pub repositories: Vec<&'a str>,
    /// Chiefs of every resolved segment.
    pub chiefs: Vec<&'a str>,
    /// Reviewers of every resolved segment.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reviewers: Vec<&'a str>,
    /// Names of the resolved segments, highest priority first.
    pub segments: Vec<&'a str>,
    /// Changed files that no segment owns.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unowned_paths: Vec<String>,
}

impl<'a> SubmitReport<'a> {
    /// Summarizes a resolved changeset.
    pub fn new(
        revision: &'a str,
        worktree: bool,
        segments: &ResolvedSet<'a>,
        unowned_paths: Vec<String>,
    ) -> Self {
        Self {
            revision,
            worktree,
            repositories: segments.repositories(),
            chiefs: segments.chiefs(),
            reviewers: segments.reviewers(),
            segments: segments.ordered().iter().map(|s| s.name.as_str()).collect(),
            unowned_paths,
        }
    }
}

impl fmt::Display for SubmitReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.repositories.is_empty() {
            writeln!(
                f,
                "No repository is configured for the owning segments; contact their chiefs:"
            )?;
            for chief in &self.chiefs {
                writeln!(f, " - {chief}")?;
            }
            return Ok(());
        }

        writeln!(f, "Please submit your patch to one of the following repositories:")?;
        writeln!(f)?;
        for repository in &self.repositories {
            writeln!(f, " - {repository}")?;
        }
        Ok(())
    }
}

/// Human-readable summary of a pull request update.
pub struct UpdateSummary<'a>(pub &'a PullRequestUpdate);

impl fmt::Display for UpdateSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            PullRequestUpdate::Assigned {
                repository,
                labels,
                assignees,
            } => {
                writeln!(f, "Pull request matches {repository}")?;
                if !labels.is_empty() {
                    writeln!(f, " Labels: {}", labels.join(", "))?;
                }
                writeln!(f, " Assignees: {}", assignees.join(", "))
            }
            PullRequestUpdate::Redirected { repository } => {
                writeln!(f, "Pull request closed; author asked to resubmit to {repository}")
            }
        }
    }
}
