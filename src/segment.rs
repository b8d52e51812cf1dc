//! Project segments: named ownership rules for one area of a codebase.

use std::fmt;

use serde::Serialize;

use crate::error::ChiefrError;
use crate::matcher::{PatternKind, PatternList};

/// Raw field values of one segment, as read from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentDefinition {
    /// Section name.
    pub name: String,
    /// Repository to submit patches to.
    pub repository: String,
    /// URL of the chat service.
    pub chat: String,
    /// URL of the mailing list.
    pub mail_list: String,
    /// URL of the issue tracker.
    pub issue_tracker: String,
    /// Members responsible for the segment.
    pub chiefs: Vec<String>,
    /// Members responsible only for code review.
    pub reviewers: Vec<String>,
    /// Regexes selecting file paths.
    pub file_patterns: Vec<String>,
    /// Regexes selecting diff content.
    pub content_patterns: Vec<String>,
    /// Regexes removing paths selected by `file_patterns`.
    pub file_exclude_patterns: Vec<String>,
    /// Regexes removing content selected by `content_patterns`.
    pub content_exclude_patterns: Vec<String>,
    /// Ordering weight when several segments apply; higher first.
    pub priority: i64,
    /// Labels describing the segment's subject area.
    pub topics: Vec<String>,
}

/// A validated segment with compiled patterns.
#[derive(Debug, Clone, Serialize)]
pub struct Segment {
    /// Unique segment name.
    pub name: String,
    /// Repository to submit patches to; empty for advisory segments.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub repository: String,
    /// URL of the chat service.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub chat: String,
    /// URL of the mailing list.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mail_list: String,
    /// URL of the issue tracker.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub issue_tracker: String,
    /// Members responsible for the segment. Never empty.
    pub chiefs: Vec<String>,
    /// Members responsible only for code review.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reviewers: Vec<String>,
    /// Compiled `FilePatterns`.
    #[serde(skip_serializing_if = "PatternList::is_empty")]
    pub file_patterns: PatternList,
    /// Compiled `ContentPatterns`.
    #[serde(skip_serializing_if = "PatternList::is_empty")]
    pub content_patterns: PatternList,
    /// Compiled `FileExcludePatterns`.
    #[serde(skip_serializing_if = "PatternList::is_empty")]
    pub file_exclude_patterns: PatternList,
    /// Compiled `ContentExcludePatterns`.
    #[serde(skip_serializing_if = "PatternList::is_empty")]
    pub content_exclude_patterns: PatternList,
    /// Ordering weight when several segments apply; higher first.
    pub priority: i64,
    /// Labels describing the segment's subject area.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<String>,
}

impl Segment {
    /// Validates a definition and compiles its patterns.
    ///
    /// Fails when the name is empty or no chiefs are listed. Malformed
    /// patterns do not fail construction.
    pub fn new(def: SegmentDefinition) -> Result<Self, ChiefrError> {
        if def.name.trim().is_empty() {
            return Err(ChiefrError::InvalidConfig(
                "segment name must not be empty".to_string(),
            ));
        }
        if def.chiefs.is_empty() {
            return Err(ChiefrError::MissingChiefs { segment: def.name });
        }

        let name = def.name;
        let file_patterns = PatternList::compile(&name, PatternKind::File, &def.file_patterns);
        let content_patterns =
            PatternList::compile(&name, PatternKind::Content, &def.content_patterns);
        let file_exclude_patterns =
            PatternList::compile(&name, PatternKind::FileExclude, &def.file_exclude_patterns);
        let content_exclude_patterns = PatternList::compile(
            &name,
            PatternKind::ContentExclude,
            &def.content_exclude_patterns,
        );

        Ok(Self {
            name,
            repository: def.repository,
            chat: def.chat,
            mail_list: def.mail_list,
            issue_tracker: def.issue_tracker,
            chiefs: def.chiefs,
            reviewers: def.reviewers,
            file_patterns,
            content_patterns,
            file_exclude_patterns,
            content_exclude_patterns,
            priority: def.priority,
            topics: def.topics,
        })
    }

    /// True when the segment names no repository to submit to.
    pub fn is_advisory(&self) -> bool {
        self.repository.is_empty()
    }
}

fn write_list<'a>(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    items: impl IntoIterator<Item = &'a str>,
) -> fmt::Result {
    let items: Vec<&str> = items.into_iter().collect();
    if items.is_empty() {
        return Ok(());
    }
    writeln!(f, " {label}: {}", items.join(", "))
}

fn write_field(f: &mut fmt::Formatter<'_>, label: &str, value: &str) -> fmt::Result {
    if value.is_empty() {
        return Ok(());
    }
    writeln!(f, " {label}: {value}")
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}]", self.name)?;
        writeln!(f, " Chiefs: {}", self.chiefs.join(", "))?;
        writeln!(f, " Priority: {}", self.priority)?;
        write_list(f, "Topics", self.topics.iter().map(String::as_str))?;
        write_list(f, "Reviewers", self.reviewers.iter().map(String::as_str))?;
        write_field(f, "Repository", &self.repository)?;
        write_field(f, "Issue tracker", &self.issue_tracker)?;
        write_field(f, "Mailing list", &self.mail_list)?;
        write_field(f, "Chat", &self.chat)?;
        write_list(f, "File patterns", self.file_patterns.sources())?;
        write_list(f, "Content patterns", self.content_patterns.sources())?;
        write_list(f, "File exclude patterns", self.file_exclude_patterns.sources())?;
        write_list(
            f,
            "Content exclude patterns",
            self.content_exclude_patterns.sources(),
        )
    }
}
