//! File-level diffs as consumed by the resolution engine.

use std::cell::OnceCell;

/// Role of a run of diff lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    /// Context shared by both sides.
    Equal,
    /// Lines present only on the new side.
    Added,
    /// Lines present only on the old side.
    Deleted,
}

/// A run of consecutive diff lines of the same kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Kind shared by every line in the chunk.
    pub kind: ChunkKind,
    /// Line text, newlines included.
    pub content: String,
}

impl Chunk {
    /// Creates a chunk.
    pub fn new(kind: ChunkKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }
}

/// One file's diff within a changeset.
///
/// Either path may be absent: added files have no old path and deleted
/// files have no new path.
#[derive(Debug, Clone)]
pub struct FilePatch {
    old_path: Option<String>,
    new_path: Option<String>,
    chunks: Vec<Chunk>,
    text: OnceCell<String>,
}

impl FilePatch {
    /// Creates a patch from its two sides and its chunks.
    pub fn new(old_path: Option<String>, new_path: Option<String>, chunks: Vec<Chunk>) -> Self {
        Self {
            old_path,
            new_path,
            chunks,
            text: OnceCell::new(),
        }
    }

    /// A newly created file whose whole content is `content`.
    pub fn added(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(
            None,
            Some(path.into()),
            vec![Chunk::new(ChunkKind::Added, content)],
        )
    }

    /// A removed file whose previous content was `content`.
    pub fn deleted(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(
            Some(path.into()),
            None,
            vec![Chunk::new(ChunkKind::Deleted, content)],
        )
    }

    /// An in-place modification of `path`.
    pub fn modified(path: impl Into<String>, chunks: Vec<Chunk>) -> Self {
        let path = path.into();
        Self::new(Some(path.clone()), Some(path), chunks)
    }

    /// Path before the change, if the file existed.
    pub fn old_path(&self) -> Option<&str> {
        self.old_path.as_deref()
    }

    /// Path after the change, if the file still exists.
    pub fn new_path(&self) -> Option<&str> {
        self.new_path.as_deref()
    }

    /// True when the file no longer exists after the change.
    pub fn is_deletion(&self) -> bool {
        self.new_path.is_none()
    }

    /// The path rules are evaluated against: the new path, or the old path
    /// for a deletion.
    pub fn effective_path(&self) -> Option<&str> {
        self.new_path().or_else(|| self.old_path())
    }

    /// Text of every chunk (equal, added and deleted) concatenated in order.
    ///
    /// Computed on first use and cached for the lifetime of the patch.
    pub fn text(&self) -> &str {
        self.text
            .get_or_init(|| self.chunks.iter().map(|c| c.content.as_str()).collect())
    }
}

/// Appends one diff line to `chunks`, extending the last chunk when it has
/// the same kind.
pub(crate) fn push_line(chunks: &mut Vec<Chunk>, kind: ChunkKind, line: &str) {
    match chunks.last_mut() {
        Some(last) if last.kind == kind => last.content.push_str(line),
        _ => chunks.push(Chunk::new(kind, line)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deletion_uses_old_path() {
        let patch = FilePatch::deleted("docs/old.md", "gone\n");
        assert!(patch.is_deletion());
        assert_eq!(patch.effective_path(), Some("docs/old.md"));
    }

    #[test]
    fn addition_uses_new_path() {
        let patch = FilePatch::added("src/new.rs", "fn main() {}\n");
        assert_eq!(patch.old_path(), None);
        assert_eq!(patch.effective_path(), Some("src/new.rs"));
    }

    #[test]
    fn text_concatenates_every_chunk_kind() {
        let patch = FilePatch::modified(
            "a.txt",
            vec![
                Chunk::new(ChunkKind::Equal, "keep\n"),
                Chunk::new(ChunkKind::Deleted, "old\n"),
                Chunk::new(ChunkKind::Added, "new\n"),
            ],
        );
        assert_eq!(patch.text(), "keep\nold\nnew\n");
    }

    #[test]
    fn push_line_merges_runs() {
        let mut chunks = Vec::new();
        push_line(&mut chunks, ChunkKind::Equal, "a\n");
        push_line(&mut chunks, ChunkKind::Added, "b\n");
        push_line(&mut chunks, ChunkKind::Added, "c\n");
        push_line(&mut chunks, ChunkKind::Equal, "d\n");

        assert_eq!(
            chunks,
            vec![
                Chunk::new(ChunkKind::Equal, "a\n"),
                Chunk::new(ChunkKind::Added, "b\nc\n"),
                Chunk::new(ChunkKind::Equal, "d\n"),
            ]
        );
    }

    #[test]
    fn pathless_patch_has_no_effective_path() {
        let patch = FilePatch::new(None, None, Vec::new());
        assert_eq!(patch.effective_path(), None);
        assert_eq!(patch.text(), "");
    }
}
