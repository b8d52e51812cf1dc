//! Resolution of a changeset to the segments responsible for it.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashSet};

use tracing::{debug, info};

use crate::config::MaintainersConfig;
use crate::error::ChiefrError;
use crate::matcher::is_concerned;
use crate::patch::FilePatch;
use crate::segment::Segment;

/// Segments responsible for a changeset, keyed by name.
///
/// Iteration order of the underlying map carries no meaning; use
/// [`ResolvedSet::ordered`] whenever order matters.
#[derive(Debug, Clone, Default)]
pub struct ResolvedSet<'a> {
    segments: BTreeMap<&'a str, &'a Segment>,
}

impl<'a> ResolvedSet<'a> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a segment; returns false if it was already present.
    pub fn insert(&mut self, segment: &'a Segment) -> bool {
        self.segments.insert(segment.name.as_str(), segment).is_none()
    }

    /// True if a segment with this name was resolved.
    pub fn contains(&self, name: &str) -> bool {
        self.segments.contains_key(name)
    }

    /// Number of resolved segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True when nothing was resolved.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Resolved segment names, sorted alphabetically.
    pub fn names(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.segments.keys().copied()
    }

    /// Segments by descending priority.
    ///
    /// The sort is stable over name order, so equal priorities always come
    /// out in the same order.
    pub fn ordered(&self) -> Vec<&'a Segment> {
        let mut ordered: Vec<&'a Segment> = self.segments.values().copied().collect();
        ordered.sort_by_key(|s| Reverse(s.priority));
        ordered
    }

    /// Distinct non-empty repositories in priority order.
    pub fn repositories(&self) -> Vec<&'a str> {
        let mut out = Vec::new();
        for segment in self.ordered() {
            if !segment.repository.is_empty() {
                push_unique(&mut out, segment.repository.as_str());
            }
        }
        out
    }

    /// Union of every segment's chiefs in priority order.
    pub fn chiefs(&self) -> Vec<&'a str> {
        self.union(|s| &s.chiefs)
    }

    /// Union of every segment's reviewers in priority order.
    pub fn reviewers(&self) -> Vec<&'a str> {
        self.union(|s| &s.reviewers)
    }

    /// Union of every segment's topics in priority order.
    pub fn topics(&self) -> Vec<&'a str> {
        self.union(|s| &s.topics)
    }

    fn union(&self, field: impl Fn(&'a Segment) -> &'a Vec<String>) -> Vec<&'a str> {
        let mut out = Vec::new();
        for segment in self.ordered() {
            for item in field(segment) {
                push_unique(&mut out, item.as_str());
            }
        }
        out
    }
}

impl<'a> FromIterator<&'a Segment> for ResolvedSet<'a> {
    fn from_iter<I: IntoIterator<Item = &'a Segment>>(iter: I) -> Self {
        let mut set = Self::new();
        for segment in iter {
            set.insert(segment);
        }
        set
    }
}

fn push_unique<'a>(items: &mut Vec<&'a str>, item: &'a str) {
    if !items.contains(&item) {
        items.push(item);
    }
}

/// The outcome of resolving one changeset.
#[derive(Debug, Clone, Default)]
pub struct Resolution<'a> {
    segments: ResolvedSet<'a>,
    affected_paths: Vec<String>,
    unowned_paths: Vec<String>,
}

impl<'a> Resolution<'a> {
    /// Segments responsible for the changeset.
    pub fn segments(&self) -> &ResolvedSet<'a> {
        &self.segments
    }

    /// Every effective path in the changeset, first-seen order.
    pub fn affected_paths(&self) -> &[String] {
        &self.affected_paths
    }

    /// Affected paths that no segment claimed.
    pub fn unowned_paths(&self) -> &[String] {
        &self.unowned_paths
    }

    /// Returns the segments, or the error telling an empty changeset apart
    /// from one that nobody owns.
    pub fn into_owned(self) -> Result<ResolvedSet<'a>, ChiefrError> {
        if self.affected_paths.is_empty() {
            return Err(ChiefrError::NothingToSubmit);
        }
        if self.segments.is_empty() {
            return Err(ChiefrError::NoOwnerFound(self.affected_paths.len()));
        }
        Ok(self.segments)
    }
}

/// Matches every patch against every segment of `config`.
///
/// Each patch is judged on its own; the result does not depend on patch
/// order beyond the order of the recorded paths.
pub fn resolve<'a>(config: &'a MaintainersConfig, patches: &[FilePatch]) -> Resolution<'a> {
    let mut resolution = Resolution::default();
    let mut seen_paths = HashSet::new();
    let mut owned_paths = HashSet::new();

    for patch in patches {
        let Some(path) = patch.effective_path() else {
            debug!("Skipping file patch without a path");
            continue;
        };
        if seen_paths.insert(path.to_string()) {
            resolution.affected_paths.push(path.to_string());
        }

        for segment in config.segments() {
            if is_concerned(segment, patch) {
                owned_paths.insert(path.to_string());
                if resolution.segments.insert(segment) {
                    debug!(segment = %segment.name, path, "Segment resolved");
                }
            }
        }
    }

    resolution.unowned_paths = resolution
        .affected_paths
        .iter()
        .filter(|path| !owned_paths.contains(*path))
        .cloned()
        .collect();

    info!(
        files = resolution.affected_paths.len(),
        segments = resolution.segments.len(),
        unowned = resolution.unowned_paths.len(),
        "Resolved changeset"
    );
    resolution
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::patch::{Chunk, ChunkKind};
    use crate::segment::SegmentDefinition;

    fn def(name: &str, priority: i64, patterns: &[&str], chiefs: &[&str]) -> SegmentDefinition {
        SegmentDefinition {
            name: name.to_string(),
            repository: format!("https://x/{name}"),
            chiefs: chiefs.iter().map(ToString::to_string).collect(),
            file_patterns: patterns.iter().map(ToString::to_string).collect(),
            priority,
            ..Default::default()
        }
    }

    fn docs_and_code() -> MaintainersConfig {
        MaintainersConfig::from_definitions(vec![
            def("docs", 0, &[r".*\.md"], &["alice"]),
            def("code", 1, &[r".*\.go"], &["bob"]),
        ])
        .unwrap()
    }

    #[test]
    fn resolves_docs_and_code_scenario() {
        let config = docs_and_code();
        let patches = vec![
            FilePatch::modified("README.md", vec![Chunk::new(ChunkKind::Added, "hi\n")]),
            FilePatch::modified("main.go", vec![Chunk::new(ChunkKind::Added, "x\n")]),
        ];

        let set = resolve(&config, &patches).into_owned().unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.repositories(), vec!["https://x/code", "https://x/docs"]);
        assert_eq!(set.chiefs(), vec!["bob", "alice"]);
    }

    #[test]
    fn segment_matched_twice_appears_once() {
        let config = docs_and_code();
        let patches = vec![
            FilePatch::added("a.md", "a\n"),
            FilePatch::added("b.md", "b\n"),
            FilePatch::added("a.md", "again\n"),
        ];
        let resolution = resolve(&config, &patches);
        assert_eq!(resolution.segments().names().collect::<Vec<_>>(), vec!["docs"]);
        assert_eq!(resolution.affected_paths(), ["a.md", "b.md"]);
    }

    #[test]
    fn empty_changeset_is_nothing_to_submit() {
        let config = docs_and_code();
        let err = resolve(&config, &[]).into_owned().unwrap_err();
        assert!(matches!(err, ChiefrError::NothingToSubmit));
    }

    #[test]
    fn unowned_changeset_is_no_owner_found() {
        let config = docs_and_code();
        let resolution = resolve(&config, &[FilePatch::added("Makefile", "all:\n")]);
        assert_eq!(resolution.unowned_paths(), ["Makefile"]);
        let err = resolution.into_owned().unwrap_err();
        assert!(matches!(err, ChiefrError::NoOwnerFound(1)));
    }

    #[test]
    fn records_unowned_paths_alongside_owned_ones() {
        let config = docs_and_code();
        let resolution = resolve(
            &config,
            &[FilePatch::added("a.md", "a\n"), FilePatch::added("LICENSE", "")],
        );
        assert_eq!(resolution.unowned_paths(), ["LICENSE"]);
        assert_eq!(resolution.segments().len(), 1);
    }

    #[test]
    fn ordering_groups_by_priority() {
        let config = MaintainersConfig::from_definitions(vec![
            def("p3a", 3, &["."], &["a"]),
            def("p1", 1, &["."], &["b"]),
            def("p3b", 3, &["."], &["c"]),
            def("p0", 0, &["."], &["d"]),
        ])
        .unwrap();
        let set: ResolvedSet = config.segments().iter().collect();

        let first: Vec<_> = set.ordered().iter().map(|s| s.name.clone()).collect();
        let second: Vec<_> = set.ordered().iter().map(|s| s.name.clone()).collect();
        assert_eq!(first, second);
        assert_eq!(&first[2..], ["p1", "p0"]);
        assert!(first[..2].contains(&"p3a".to_string()));
        assert!(first[..2].contains(&"p3b".to_string()));
    }

    #[test]
    fn repositories_collapse_duplicates() {
        let mut a = def("a", 2, &["."], &["x"]);
        let mut b = def("b", 1, &["."], &["y"]);
        let mut c = def("c", 0, &["."], &["z"]);
        a.repository = "https://x/shared".to_string();
        b.repository = String::new();
        c.repository = "https://x/shared".to_string();
        let config = MaintainersConfig::from_definitions(vec![a, b, c]).unwrap();
        let set: ResolvedSet = config.segments().iter().collect();
        assert_eq!(set.repositories(), vec!["https://x/shared"]);
    }

    #[test]
    fn unions_deduplicate_in_priority_order() {
        let mut low = def("low", 0, &["."], &["carol", "alice"]);
        low.topics = vec!["docs".to_string(), "shared".to_string()];
        low.reviewers = vec!["erin".to_string()];
        let mut high = def("high", 5, &["."], &["alice", "bob"]);
        high.topics = vec!["shared".to_string(), "core".to_string()];
        let config = MaintainersConfig::from_definitions(vec![low, high]).unwrap();
        let set: ResolvedSet = config.segments().iter().collect();

        assert_eq!(set.chiefs(), vec!["alice", "bob", "carol"]);
        assert_eq!(set.topics(), vec!["shared", "core", "docs"]);
        assert_eq!(set.reviewers(), vec!["erin"]);
        assert_eq!(set.ordered()[0].name, "high");
    }

    #[test]
    fn content_only_segment_resolves() {
        let config = MaintainersConfig::from_definitions(vec![SegmentDefinition {
            name: "todo".to_string(),
            chiefs: vec!["tess".to_string()],
            content_patterns: vec!["TODO".to_string()],
            ..Default::default()
        }])
        .unwrap();
        let patch = FilePatch::modified(
            "src/anything.rs",
            vec![
                Chunk::new(ChunkKind::Equal, "fn f() {}\n"),
                Chunk::new(ChunkKind::Added, "    // TODO later\n"),
            ],
        );
        let set = resolve(&config, &[patch]).into_owned().unwrap();
        assert!(set.contains("todo"));
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        fn config() -> MaintainersConfig {
            MaintainersConfig::from_definitions(vec![
                def("docs", 0, &[r"\.md$"], &["alice"]),
                def("code", 1, &[r"\.go$"], &["bob"]),
                def("tests", 1, &["^tests/"], &["carol"]),
                def("vendor", 2, &["^vendor/"], &["dave"]),
            ])
            .unwrap()
        }

        fn paths() -> impl Strategy<Value = Vec<String>> {
            proptest::collection::vec("(src|tests|vendor|docs)/[a-z]{1,5}\\.(go|md|txt)", 0..8)
        }

        fn added(paths: &[String]) -> Vec<FilePatch> {
            paths.iter().map(|p| FilePatch::added(p.clone(), "x\n")).collect()
        }

        fn names(resolution: &Resolution<'_>) -> Vec<String> {
            resolution.segments().names().map(ToString::to_string).collect()
        }

        fn path_set(resolution: &Resolution<'_>) -> HashSet<String> {
            resolution.affected_paths().iter().cloned().collect()
        }

        proptest! {
            #[test]
            fn patch_order_does_not_change_result(
                (paths, shuffled) in paths()
                    .prop_flat_map(|p| (Just(p.clone()), Just(p).prop_shuffle()))
            ) {
                let config = config();
                let forward = added(&paths);
                let permuted = added(&shuffled);

                let a = resolve(&config, &forward);
                let b = resolve(&config, &permuted);
                prop_assert_eq!(names(&a), names(&b));
                prop_assert_eq!(path_set(&a), path_set(&b));
            }

            #[test]
            fn resolving_twice_is_idempotent(paths in paths()) {
                let config = config();
                let patches = added(&paths);
                let a = resolve(&config, &patches);
                let b = resolve(&config, &patches);
                prop_assert_eq!(names(&a), names(&b));
                prop_assert_eq!(path_set(&a), path_set(&b));
            }
        }
    }
}
