//! Parser for the flat `[section]` / `key = value` maintainers format.

use crate::error::ChiefrError;

/// A `[name]` block and the entries that follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Text between the brackets, trimmed.
    pub name: String,
    /// 1-based line of the header.
    pub line: usize,
    /// Entries in file order.
    pub entries: Vec<Entry>,
}

/// A single `key = value` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Key as written.
    pub key: String,
    /// Value with surrounding whitespace and quotes removed.
    pub value: String,
    /// 1-based line number.
    pub line: usize,
}

/// Name of the implicit section holding entries that precede every header.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Splits `source` into sections.
///
/// Blank lines and lines starting with `#` or `;` are skipped. Entries may
/// use `=` or `:` as separator. Entries before the first header are
/// collected into a section named [`DEFAULT_SECTION`].
pub fn parse_sections(source: &str) -> Result<Vec<Section>, ChiefrError> {
    let mut sections: Vec<Section> = Vec::new();

    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(rest) = line.strip_prefix('[') {
            let name = rest.strip_suffix(']').ok_or_else(|| {
                syntax_error(line_no, format!("unterminated section header '{line}'"))
            })?;
            let name = name.trim();
            if name.is_empty() {
                return Err(syntax_error(line_no, "empty section name".to_string()));
            }
            if sections.iter().any(|s| s.name == name) {
                return Err(syntax_error(line_no, format!("duplicate section '{name}'")));
            }
            sections.push(Section {
                name: name.to_string(),
                line: line_no,
                entries: Vec::new(),
            });
            continue;
        }

        let (key, value) = split_entry(line)
            .ok_or_else(|| syntax_error(line_no, format!("expected 'key = value', got '{line}'")))?;

        if sections.is_empty() {
            sections.push(Section {
                name: DEFAULT_SECTION.to_string(),
                line: line_no,
                entries: Vec::new(),
            });
        }
        if let Some(section) = sections.last_mut() {
            section.entries.push(Entry {
                key: key.to_string(),
                value: unquote(value).to_string(),
                line: line_no,
            });
        }
    }

    Ok(sections)
}

/// Lower-cases a key and drops `_` and `-`, so `FilePatterns`,
/// `file_patterns` and `file-patterns` compare equal.
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Splits a comma-separated value, trimming items and dropping blanks.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn split_entry(line: &str) -> Option<(&str, &str)> {
    // The first separator wins; values may contain '=' or ':' themselves.
    let pos = line.find(['=', ':'])?;
    let key = line[..pos].trim();
    if key.is_empty() {
        return None;
    }
    Some((key, line[pos + 1..].trim()))
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn syntax_error(line: usize, message: String) -> ChiefrError {
    ChiefrError::InvalidConfig(format!("line {line}: {message}"))
}
