//! Domain errors and their process exit codes.

use thiserror::Error;

/// Failures that the command layer reports with a dedicated exit code.
#[derive(Error, Debug)]
pub enum ChiefrError {
    /// The maintainers file could not be read or is malformed.
    #[error("Failed to initialize maintainers: {0}")]
    InvalidConfig(String),

    /// A segment was defined without any chiefs.
    #[error("Invalid config section '{segment}': missing 'Chiefs' property")]
    MissingChiefs {
        /// Name of the offending section.
        segment: String,
    },

    /// No tracker credential was supplied on the command line or environment.
    #[error("No API key provided. Pass API_KEY or set one of: {0}")]
    MissingToken(String),

    /// The git repository could not be opened or diffed.
    #[error("{0}")]
    Repository(String),

    /// The starting revision did not resolve to a commit.
    #[error("Failed to resolve revision '{0}'")]
    UnknownRevision(String),

    /// The changeset does not touch any file.
    #[error("Nothing to submit: no changed files found")]
    NothingToSubmit,

    /// Files changed, but no segment claims any of them.
    #[error("No matching segments found for this patch ({0} changed file(s) without an owner). Please edit your maintainers file")]
    NoOwnerFound(usize),

    /// The tracker driver was handed an empty segment set.
    #[error("No matching segments found for this pull request. Please edit your maintainers file")]
    NoSegments,

    /// The resolved segments did not yield a single chief.
    #[error("Chiefs not found for this pull request")]
    NoChiefsResolved,

    /// The pull request URL is not of the form `host/owner/repo/pull/number`.
    #[error("Invalid pull request URL '{0}'")]
    InvalidPullRequestUrl(String),

    /// No tracker implementation exists for the URL's host.
    #[error("Cannot find tracker handler for url '{0}'")]
    UnsupportedTracker(String),

    /// The pull request is not hosted under any resolved segment's repository.
    #[error("No repository found for this pull request")]
    NoRepositoryFound,

    /// A remote tracker call failed.
    #[error("Failed to {operation}: {message}")]
    TrackerRequest {
        /// Human-readable name of the failed operation.
        operation: &'static str,
        /// Transport error or HTTP status and body.
        message: String,
    },
}

/// Exit code for command-line usage errors, such as an unknown subcommand or
/// a missing argument.
pub const USAGE_EXIT_CODE: i32 = 10;

impl ChiefrError {
    /// Returns the process exit code for this failure class.
    ///
    /// | Code | Class |
    /// |---|---|
    /// | 2 | configuration, missing chiefs, missing token |
    /// | 3 | repository or revision |
    /// | 4 | nothing to submit |
    /// | 5 | no owner found, no segments |
    /// | 6 | malformed pull request URL, unsupported tracker |
    /// | 7 | no repository found for the pull request |
    /// | 8 | no chiefs resolved |
    /// | 9 | tracker request |
    ///
    /// Errors outside this enum exit with 1, and usage errors with
    /// [`USAGE_EXIT_CODE`].
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidConfig(_) | Self::MissingChiefs { .. } | Self::MissingToken(_) => 2,
            Self::Repository(_) | Self::UnknownRevision(_) => 3,
            Self::NothingToSubmit => 4,
            Self::NoOwnerFound(_) | Self::NoSegments => 5,
            Self::InvalidPullRequestUrl(_) | Self::UnsupportedTracker(_) => 6,
            Self::NoRepositoryFound => 7,
            Self::NoChiefsResolved => 8,
            Self::TrackerRequest { .. } => 9,
        }
    }
}

/// Returns the exit code for an error chain, or 1 when no domain error is in it.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ChiefrError>())
        .map_or(1, ChiefrError::exit_code)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn empty_changeset_and_missing_owner_are_distinct() {
        assert_ne!(
            ChiefrError::NothingToSubmit.exit_code(),
            ChiefrError::NoOwnerFound(3).exit_code()
        );
    }

    #[test]
    fn exit_code_found_through_context() {
        let err = Err::<(), _>(ChiefrError::NoRepositoryFound)
            .context("Failed to update pull request")
            .unwrap_err();
        assert_eq!(exit_code_for(&err), 7);
    }

    #[test]
    fn usage_code_is_distinct_from_every_domain_code() {
        let errors = [
            ChiefrError::InvalidConfig(String::new()),
            ChiefrError::MissingToken(String::new()),
            ChiefrError::UnknownRevision(String::new()),
            ChiefrError::NothingToSubmit,
            ChiefrError::NoOwnerFound(1),
            ChiefrError::InvalidPullRequestUrl(String::new()),
            ChiefrError::NoRepositoryFound,
            ChiefrError::NoChiefsResolved,
            ChiefrError::TrackerRequest {
                operation: "comment on pull request",
                message: String::new(),
            },
        ];
        for err in &errors {
            assert_ne!(err.exit_code(), USAGE_EXIT_CODE, "{err}");
            assert_ne!(err.exit_code(), 1, "{err}");
        }
    }

    #[test]
    fn foreign_errors_exit_with_one() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(exit_code_for(&err), 1);
    }

    #[test]
    fn tracker_error_message_names_operation() {
        let err = ChiefrError::TrackerRequest {
            operation: "add labels to pull request",
            message: "HTTP 403 Forbidden".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to add labels to pull request: HTTP 403 Forbidden"
        );
    }
}
