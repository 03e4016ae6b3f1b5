//! Property tests for dependency graph persistence.

use std::sync::Arc;

use proptest::prelude::*;

use mason::domain::entities::DependencyGraph;
use mason::domain::ports::StoreRepository;
use mason::domain::value_objects::FileTime;
use mason::infrastructure::{JsonDependencyRepository, MemoryFileSource};

fn asset_path() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z]{1,6}/[a-z0-9_]{1,8}\\.(png|material|shader_src)").unwrap()
}

fn graph() -> impl Strategy<Value = DependencyGraph> {
    let edges = proptest::collection::vec((asset_path(), asset_path()), 0..24);
    let times = proptest::collection::vec((asset_path(), 1u64..u64::MAX), 0..8);
    (edges, times).prop_map(|(edges, times)| {
        let mut graph = DependencyGraph::new();
        for (resource, dependent) in edges {
            graph.add_dependent(&resource, &dependent);
        }
        for (resource, nanos) in times {
            graph.update_modified_time(&resource, FileTime::from_nanos(nanos));
        }
        graph
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Save then load restores dependents and times for every path.
    #[test]
    fn property_round_trip(graph in graph()) {
        let fs = Arc::new(MemoryFileSource::new());
        let repo = JsonDependencyRepository::new(fs);
        repo.save(&graph).unwrap();
        let loaded = repo.load().unwrap();

        for (path, entry) in graph.entries() {
            prop_assert_eq!(loaded.dependents(path), entry.dependents().to_vec());
            prop_assert_eq!(loaded.modified_time(path), entry.last_modified());
        }
        prop_assert_eq!(loaded.len(), graph.len());
    }
}

#[test]
fn saved_edge_survives_fresh_instance() {
    let fs = Arc::new(MemoryFileSource::new());
    let mut graph = DependencyGraph::new();
    graph.add_dependent("tex/a.png", "mat/x.material");
    JsonDependencyRepository::new(fs.clone()).save(&graph).unwrap();

    let loaded = JsonDependencyRepository::new(fs).load().unwrap();
    assert_eq!(loaded.dependents("tex/a.png"), vec!["mat/x.material"]);
}
