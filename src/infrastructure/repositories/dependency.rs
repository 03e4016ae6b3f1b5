//! JSON Dependency Repository
//!
//! Persists the dependency graph as
//! `{ "<path>": { "time": [high, low], "dependents": [...] } }`.
//! A time of `[0, 0]` means no time was recorded.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{write_pretty, METADATA_DIR};
use crate::domain::entities::DependencyGraph;
use crate::domain::ports::{FileSource, StoreRepository, StoreResult};
use crate::domain::value_objects::FileTime;

#[derive(Debug, Serialize, Deserialize)]
struct JsonDependencyEntry {
    #[serde(default)]
    time: [u32; 2],
    #[serde(default)]
    dependents: Vec<String>,
}

/// Dependency graph stored at `.builder/dependency_database`
pub struct JsonDependencyRepository {
    fs: Arc<dyn FileSource>,
    path: String,
}

impl JsonDependencyRepository {
    pub fn new(fs: Arc<dyn FileSource>) -> Self {
        Self {
            fs,
            path: format!("{METADATA_DIR}/dependency_database"),
        }
    }
}

impl StoreRepository for JsonDependencyRepository {
    type Store = DependencyGraph;

    fn load(&self) -> StoreResult<DependencyGraph> {
        let content = self.fs.read(&self.path)?;
        let entries: BTreeMap<String, JsonDependencyEntry> = serde_json::from_slice(&content)?;

        let mut graph = DependencyGraph::new();
        for (resource, entry) in entries {
            for dependent in &entry.dependents {
                graph.add_dependent(&resource, dependent);
            }
            let time = FileTime::from_parts(entry.time[0], entry.time[1]);
            if !time.is_zero() {
                graph.update_modified_time(&resource, time);
            }
        }
        Ok(graph)
    }

    fn save(&self, graph: &DependencyGraph) -> StoreResult<()> {
        let entries: BTreeMap<&str, JsonDependencyEntry> = graph
            .entries()
            .map(|(resource, entry)| {
                let time = entry.last_modified().unwrap_or_default();
                (
                    resource,
                    JsonDependencyEntry {
                        time: [time.high(), time.low()],
                        dependents: entry.dependents().to_vec(),
                    },
                )
            })
            .collect();
        write_pretty(self.fs.as_ref(), &self.path, &entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::StoreError;
    use crate::infrastructure::fs::{LocalFileSource, MemoryFileSource};
    use tempfile::tempdir;

    #[test]
    fn save_then_load_in_fresh_instance() {
        let fs: Arc<dyn FileSource> = Arc::new(MemoryFileSource::new());
        let mut graph = DependencyGraph::new();
        graph.add_dependent("tex/a.png", "mat/x.material");
        JsonDependencyRepository::new(fs.clone()).save(&graph).unwrap();

        let loaded = JsonDependencyRepository::new(fs).load().unwrap();
        assert_eq!(loaded.dependents("tex/a.png"), vec!["mat/x.material"]);
        assert_eq!(loaded.modified_time("tex/a.png"), None);
    }

    #[test]
    fn times_round_trip() {
        let dir = tempdir().unwrap();
        let fs: Arc<dyn FileSource> = Arc::new(LocalFileSource::new(dir.path()));
        let repo = JsonDependencyRepository::new(fs);

        let mut graph = DependencyGraph::new();
        let time = FileTime::from_nanos(0x0000_0001_2345_6789);
        graph.update_modified_time("include/common.hlsl", time);
        graph.add_dependent("include/common.hlsl", "shaders/lit.shader_src");
        repo.save(&graph).unwrap();

        let loaded = repo.load().unwrap();
        assert_eq!(loaded.modified_time("include/common.hlsl"), Some(time));
        assert!(dir.path().join(".builder/dependency_database").exists());
    }

    #[test]
    fn missing_store_is_not_found() {
        let fs: Arc<dyn FileSource> = Arc::new(MemoryFileSource::new());
        let err = JsonDependencyRepository::new(fs).load().unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[test]
    fn corrupt_store_is_invalid_format() {
        let memory = MemoryFileSource::new();
        memory.insert(".builder/dependency_database", "{ not json");
        let fs: Arc<dyn FileSource> = Arc::new(memory);

        let err = JsonDependencyRepository::new(fs).load().unwrap_err();
        assert!(matches!(err, StoreError::InvalidFormat(_)));
    }
}
