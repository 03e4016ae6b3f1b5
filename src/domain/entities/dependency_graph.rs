//! Dependency graph entity
//!
//! Records, for each asset path, the assets that must be recompiled when it
//! changes, and the last modification time observed for dependency-only
//! files. It's a pure data structure - persistence is handled by
//! the dependency repository.

use std::collections::BTreeMap;

use crate::domain::value_objects::{normalize_path, FileTime};

/// Dependency information stored for one asset path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyEntry {
    dependents: Vec<String>,
    last_modified: Option<FileTime>,
}

impl DependencyEntry {
    pub fn dependents(&self) -> &[String] {
        &self.dependents
    }

    pub fn last_modified(&self) -> Option<FileTime> {
        self.last_modified
    }
}

/// Map from asset path to its [`DependencyEntry`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    entries: BTreeMap<String, DependencyEntry>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `dependent` must be rebuilt whenever `resource` changes.
    ///
    /// Idempotent: an edge is stored at most once.
    pub fn add_dependent(&mut self, resource: &str, dependent: &str) {
        let entry = self.entries.entry(normalize_path(resource)).or_default();
        let dependent = normalize_path(dependent);
        if !entry.dependents.contains(&dependent) {
            entry.dependents.push(dependent);
        }
    }

    /// Copy of the dependents of `resource`, empty if unknown
    pub fn dependents(&self, resource: &str) -> Vec<String> {
        self.entries
            .get(&normalize_path(resource))
            .map(|entry| entry.dependents.clone())
            .unwrap_or_default()
    }

    pub fn update_modified_time(&mut self, resource: &str, time: FileTime) {
        self.entries
            .entry(normalize_path(resource))
            .or_default()
            .last_modified = Some(time);
    }

    /// Recorded modification time, `None` if never recorded
    pub fn modified_time(&self, resource: &str) -> Option<FileTime> {
        self.entries
            .get(&normalize_path(resource))
            .and_then(|entry| entry.last_modified)
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &DependencyEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_dependent_is_idempotent() {
        let mut graph = DependencyGraph::new();
        graph.add_dependent("tex/a.png", "mat/x.material");
        graph.add_dependent("tex/a.png", "mat/x.material");
        graph.add_dependent("tex\\a.png", "mat\\x.material");

        assert_eq!(graph.dependents("tex/a.png"), vec!["mat/x.material"]);
    }

    #[test]
    fn dependents_of_unknown_resource_is_empty() {
        let graph = DependencyGraph::new();
        assert!(graph.dependents("missing.png").is_empty());
    }

    #[test]
    fn dependents_keep_insertion_order() {
        let mut graph = DependencyGraph::new();
        graph.add_dependent("common.hlsl", "b.shader_src");
        graph.add_dependent("common.hlsl", "a.shader_src");

        assert_eq!(
            graph.dependents("common.hlsl"),
            vec!["b.shader_src", "a.shader_src"]
        );
    }

    #[test]
    fn entry_may_hold_only_a_timestamp() {
        let mut graph = DependencyGraph::new();
        graph.update_modified_time("raw/rock.png", FileTime::from_nanos(42));

        assert_eq!(
            graph.modified_time("raw/rock.png"),
            Some(FileTime::from_nanos(42))
        );
        assert!(graph.dependents("raw/rock.png").is_empty());
        assert_eq!(graph.modified_time("raw/other.png"), None);
    }

    #[test]
    fn entry_created_by_dependent_has_no_timestamp() {
        let mut graph = DependencyGraph::new();
        graph.add_dependent("a.png", "b.material");
        assert_eq!(graph.modified_time("a.png"), None);
    }

    #[test]
    fn clear_drops_everything() {
        let mut graph = DependencyGraph::new();
        graph.add_dependent("a.png", "b.material");
        graph.update_modified_time("c.png", FileTime::from_nanos(1));
        graph.clear();

        assert!(graph.is_empty());
        assert!(graph.dependents("a.png").is_empty());
    }
}
