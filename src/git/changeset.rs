//! Conversion of `git2` diffs into [`FilePatch`] values.

use std::path::Path;

use git2::{Delta, Diff, Patch};
use tracing::debug;

use crate::patch::{push_line, Chunk, ChunkKind, FilePatch};

/// Builds one [`FilePatch`] per delta in `diff`.
///
/// Context, added and deleted lines become chunks, with adjacent lines of
/// the same kind merged. Binary files produce a patch with no chunks.
pub fn file_patches(diff: &Diff<'_>) -> Result<Vec<FilePatch>, git2::Error> {
    let count = diff.deltas().len();
    let mut patches = Vec::with_capacity(count);

    for idx in 0..count {
        let Some(delta) = diff.get_delta(idx) else {
            continue;
        };

        let old_path = match delta.status() {
            Delta::Added | Delta::Untracked => None,
            _ => path_string(delta.old_file().path()),
        };
        let new_path = match delta.status() {
            Delta::Deleted => None,
            _ => path_string(delta.new_file().path()),
        };

        let chunks = match Patch::from_diff(diff, idx)? {
            Some(patch) => patch_chunks(&patch)?,
            None => Vec::new(),
        };

        debug!(
            status = ?delta.status(),
            old = old_path.as_deref().unwrap_or("-"),
            new = new_path.as_deref().unwrap_or("-"),
            chunks = chunks.len(),
            "Collected file patch"
        );
        patches.push(FilePatch::new(old_path, new_path, chunks));
    }

    Ok(patches)
}

fn patch_chunks(patch: &Patch<'_>) -> Result<Vec<Chunk>, git2::Error> {
    let mut chunks = Vec::new();

    for hunk_idx in 0..patch.num_hunks() {
        for line_idx in 0..patch.num_lines_in_hunk(hunk_idx)? {
            let line = patch.line_in_hunk(hunk_idx, line_idx)?;
            let kind = match line.origin() {
                ' ' => ChunkKind::Equal,
                '+' => ChunkKind::Added,
                '-' => ChunkKind::Deleted,
                // File/hunk headers and end-of-file markers.
                _ => continue,
            };
            push_line(&mut chunks, kind, &String::from_utf8_lossy(line.content()));
        }
    }

    Ok(chunks)
}

fn path_string(path: Option<&Path>) -> Option<String> {
    path.map(|p| p.to_string_lossy().into_owned())
}
