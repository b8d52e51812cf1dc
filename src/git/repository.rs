//! Git repository operations

use std::path::Path;

use git2::{Commit, Oid, Repository};
use tracing::{debug, info};

use crate::error::ChiefrError;
use crate::git::{changeset::file_patches, SHORT_HASH_LEN};
use crate::patch::FilePatch;

/// Git repository wrapper
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Open repository at specified path
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self, ChiefrError> {
        let path = path.as_ref();
        let repo = Repository::open(path).map_err(|err| {
            ChiefrError::Repository(format!(
                "Failed to open git repository at '{}': {}",
                path.display(),
                err.message()
            ))
        })?;

        Ok(Self { repo })
    }

    /// Get the commit HEAD points at
    pub fn head_commit(&self) -> Result<Commit<'_>, ChiefrError> {
        self.repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .map_err(|err| {
                ChiefrError::Repository(format!(
                    "Failed to get HEAD commit: {}",
                    err.message()
                ))
            })
    }

    /// Resolve a revision to a commit.
    ///
    /// Tried in order: full or abbreviated hash of a commit reachable from
    /// HEAD, any revspec git understands, a local branch name, and a
    /// remote-tracking ref such as `origin/main`.
    pub fn resolve_revision(&self, revision: &str) -> Result<Commit<'_>, ChiefrError> {
        let revision = revision.trim();
        if revision.is_empty() {
            return Err(ChiefrError::UnknownRevision(revision.to_string()));
        }

        if let Some(commit) = self.find_by_hash_prefix(revision)? {
            debug!(revision, commit = %short_id(commit.id()), "Resolved revision by hash");
            return Ok(commit);
        }

        if let Ok(commit) = self
            .repo
            .revparse_single(revision)
            .and_then(|obj| obj.peel_to_commit())
        {
            debug!(revision, commit = %short_id(commit.id()), "Resolved revision by revspec");
            return Ok(commit);
        }

        for reference in [
            format!("refs/heads/{revision}"),
            format!("refs/remotes/{revision}"),
        ] {
            if let Ok(commit) = self
                .repo
                .find_reference(&reference)
                .and_then(|r| r.peel_to_commit())
            {
                debug!(
                    revision,
                    reference = %reference,
                    commit = %short_id(commit.id()),
                    "Resolved revision by reference"
                );
                return Ok(commit);
            }
        }

        Err(ChiefrError::UnknownRevision(revision.to_string()))
    }

    /// Walk history from HEAD looking for a commit whose hash starts with
    /// `prefix`.
    fn find_by_hash_prefix(&self, prefix: &str) -> Result<Option<Commit<'_>>, ChiefrError> {
        if !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(None);
        }
        let prefix = prefix.to_ascii_lowercase();

        let head = self.head_commit()?;
        let mut walker = self.repo.revwalk().map_err(history_error)?;
        walker.push(head.id()).map_err(history_error)?;

        for oid in walker {
            let oid = oid.map_err(history_error)?;
            if oid.to_string().starts_with(&prefix) {
                return self.repo.find_commit(oid).map(Some).map_err(history_error);
            }
        }

        Ok(None)
    }

    /// Collect the file patches between `revision` and HEAD.
    ///
    /// With `include_worktree`, the diff runs from `revision` to the working
    /// tree (index included) instead, so uncommitted changes count too.
    pub fn changeset(
        &self,
        revision: &str,
        include_worktree: bool,
    ) -> Result<Vec<FilePatch>, ChiefrError> {
        let base = self.resolve_revision(revision)?;
        let base_tree = base.tree().map_err(diff_error)?;

        let diff = if include_worktree {
            self.repo
                .diff_tree_to_workdir_with_index(Some(&base_tree), None)
                .map_err(diff_error)?
        } else {
            let head_tree = self.head_commit()?.tree().map_err(diff_error)?;
            self.repo
                .diff_tree_to_tree(Some(&base_tree), Some(&head_tree), None)
                .map_err(diff_error)?
        };

        let patches = file_patches(&diff).map_err(diff_error)?;
        info!(
            base = %short_id(base.id()),
            worktree = include_worktree,
            files = patches.len(),
            "Collected changeset"
        );
        Ok(patches)
    }
}

fn short_id(oid: Oid) -> String {
    let mut id = oid.to_string();
    id.truncate(SHORT_HASH_LEN);
    id
}

fn history_error(err: git2::Error) -> ChiefrError {
    ChiefrError::Repository(format!("Failed to walk history: {}", err.message()))
}

fn diff_error(err: git2::Error) -> ChiefrError {
    ChiefrError::Repository(format!("Failed to create patch: {}", err.message()))
}
