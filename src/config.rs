//! Maintainers file loading.
//!
//! The maintainers file lists one section per project segment:
//!
//! ```ini
//! [docs]
//! Repository = https://github.com/acme/docs
//! Chiefs = alice, bob
//! FilePatterns = .*\.md, ^docs/
//! Priority = 1
//! ```

pub mod ini;

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::ChiefrError;
use crate::segment::{Segment, SegmentDefinition};
use ini::{normalize_key, split_list, Section, DEFAULT_SECTION};

/// Maintainers file looked up when none is given on the command line.
pub const DEFAULT_MAINTAINERS_FILE: &str = ".maintainers.ini";

/// The validated set of segments for a project, in file order.
#[derive(Debug, Clone, Default)]
pub struct MaintainersConfig {
    segments: Vec<Segment>,
}

impl MaintainersConfig {
    /// Reads and validates the maintainers file at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ChiefrError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading maintainers file");

        let source = fs::read_to_string(path).map_err(|err| {
            ChiefrError::InvalidConfig(format!("cannot read '{}': {err}", path.display()))
        })?;

        let config = Self::parse(&source)?;
        if config.is_empty() {
            warn!(path = %path.display(), "No project segments defined");
        }
        Ok(config)
    }

    /// Parses maintainers file contents.
    pub fn parse(source: &str) -> Result<Self, ChiefrError> {
        let definitions = ini::parse_sections(source)?
            .iter()
            .filter(|section| !section.name.eq_ignore_ascii_case(DEFAULT_SECTION))
            .map(definition_from_section)
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_definitions(definitions)
    }

    /// Validates definitions into segments, rejecting duplicate names.
    pub fn from_definitions<I>(definitions: I) -> Result<Self, ChiefrError>
    where
        I: IntoIterator<Item = SegmentDefinition>,
    {
        let mut seen = HashSet::new();
        let mut segments = Vec::new();

        for def in definitions {
            if !seen.insert(def.name.clone()) {
                return Err(ChiefrError::InvalidConfig(format!(
                    "duplicate segment '{}'",
                    def.name
                )));
            }
            segments.push(Segment::new(def)?);
        }

        debug!(count = segments.len(), "Loaded project segments");
        Ok(Self { segments })
    }

    /// All segments, in file order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Looks a segment up by name.
    pub fn get(&self, name: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.name == name)
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True when no segment is defined.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

fn definition_from_section(section: &Section) -> Result<SegmentDefinition, ChiefrError> {
    let mut def = SegmentDefinition {
        name: section.name.clone(),
        ..Default::default()
    };
    let mut seen = HashSet::new();

    for entry in &section.entries {
        let key = normalize_key(&entry.key);
        if !seen.insert(key.clone()) {
            return Err(ChiefrError::InvalidConfig(format!(
                "section '{}', line {}: duplicate key '{}'",
                section.name, entry.line, entry.key
            )));
        }

        let value = entry.value.as_str();
        match key.as_str() {
            "repository" => def.repository = value.to_string(),
            "chat" => def.chat = value.to_string(),
            "maillist" => def.mail_list = value.to_string(),
            "issuetracker" => def.issue_tracker = value.to_string(),
            "chiefs" => def.chiefs = split_list(value),
            "reviewers" => def.reviewers = split_list(value),
            "filepatterns" => def.file_patterns = split_list(value),
            "contentpatterns" => def.content_patterns = split_list(value),
            "fileexcludepatterns" => def.file_exclude_patterns = split_list(value),
            "contentexcludepatterns" => def.content_exclude_patterns = split_list(value),
            "topics" => def.topics = split_list(value),
            "priority" => {
                def.priority = value.parse().map_err(|_| {
                    ChiefrError::InvalidConfig(format!(
                        "section '{}', line {}: Priority must be an integer, got '{value}'",
                        section.name, entry.line
                    ))
                })?;
            }
            _ => warn!(
                section = %section.name,
                key = %entry.key,
                line = entry.line,
                "Ignoring unknown maintainers key"
            ),
        }
    }

    Ok(def)
}
