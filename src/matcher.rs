//! Regex-based matching of file patches against segment rules.
//!
//! A segment is *concerned* by a patch when its file rules accept the
//! patch's effective path, or, failing that, when its content rules accept
//! the concatenated diff text. Each rule is an include list minus an exclude
//! list: some include pattern must match and no exclude pattern may match.
//!
//! Patterns that fail to compile never match. They are reported once, at
//! compile time, and the remaining patterns keep working.

use std::fmt;

use regex::Regex;
use serde::{Serialize, Serializer};
use tracing::{trace, warn};

use crate::patch::FilePatch;
use crate::segment::Segment;

/// Which rule list a pattern belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Include pattern over file paths.
    File,
    /// Exclude pattern over file paths.
    FileExclude,
    /// Include pattern over diff text.
    Content,
    /// Exclude pattern over diff text.
    ContentExclude,
}

impl PatternKind {
    /// Configuration key the pattern list is read from.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "FilePatterns",
            Self::FileExclude => "FileExcludePatterns",
            Self::Content => "ContentPatterns",
            Self::ContentExclude => "ContentExcludePatterns",
        }
    }

    fn is_content(self) -> bool {
        matches!(self, Self::Content | Self::ContentExclude)
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
struct Pattern {
    source: String,
    regex: Option<Regex>,
}

/// An ordered list of compiled patterns.
#[derive(Debug, Clone, Default)]
pub struct PatternList {
    patterns: Vec<Pattern>,
}

impl PatternList {
    /// Compiles `sources` for the given rule list of `segment`.
    ///
    /// Content patterns are compiled in multi-line mode so `^` and `$`
    /// match at line boundaries of the diff text.
    pub fn compile<S: AsRef<str>>(segment: &str, kind: PatternKind, sources: &[S]) -> Self {
        let patterns = sources
            .iter()
            .map(|source| {
                let source = source.as_ref();
                let compiled = if kind.is_content() {
                    Regex::new(&format!("(?m){source}"))
                } else {
                    Regex::new(source)
                };
                let regex = match compiled {
                    Ok(regex) => Some(regex),
                    Err(err) => {
                        warn!(
                            segment,
                            kind = %kind,
                            pattern = source,
                            error = %err,
                            "Ignoring malformed pattern; it will never match"
                        );
                        None
                    }
                };
                Pattern {
                    source: source.to_string(),
                    regex,
                }
            })
            .collect();

        Self { patterns }
    }

    /// Returns true if some valid pattern matches anywhere in `haystack`.
    ///
    /// Patterns are tried in configured order and the first hit wins.
    pub fn is_match(&self, haystack: &str) -> bool {
        self.patterns
            .iter()
            .filter_map(|p| p.regex.as_ref())
            .any(|regex| regex.is_match(haystack))
    }

    /// Source strings in configured order, malformed ones included.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.source.as_str())
    }

    /// Source strings of the patterns that failed to compile.
    pub fn invalid_sources(&self) -> impl Iterator<Item = &str> {
        self.patterns
            .iter()
            .filter(|p| p.regex.is_none())
            .map(|p| p.source.as_str())
    }

    /// Number of patterns, malformed ones included.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True when the list has no patterns at all.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Serialize for PatternList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.sources())
    }
}

/// Returns true if `path` is accepted by the segment's file rules.
pub fn is_file_name_match(segment: &Segment, path: &str) -> bool {
    segment.file_patterns.is_match(path) && !segment.file_exclude_patterns.is_match(path)
}

/// Returns true if `text` is accepted by the segment's content rules.
pub fn is_content_match(segment: &Segment, text: &str) -> bool {
    segment.content_patterns.is_match(text) && !segment.content_exclude_patterns.is_match(text)
}

/// Returns true if the segment is responsible for `patch`.
///
/// File rules are checked against the patch's effective path first; the
/// diff text is only built and scanned when they do not accept it.
pub fn is_concerned(segment: &Segment, patch: &FilePatch) -> bool {
    if let Some(path) = patch.effective_path() {
        if is_file_name_match(segment, path) {
            trace!(segment = %segment.name, path, "Matched by file pattern");
            return true;
        }
    }

    if segment.content_patterns.is_empty() {
        return false;
    }

    let matched = is_content_match(segment, patch.text());
    if matched {
        trace!(
            segment = %segment.name,
            path = patch.effective_path().unwrap_or_default(),
            "Matched by content pattern"
        );
    }
    matched
}
