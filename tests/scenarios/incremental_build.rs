//! Scenario: incremental builds of a small content tree
//!
//! Journey: an artist edits textures and shaders between builds.
//!
//! Success Criteria:
//! - The first build compiles everything and persists metadata
//! - Unchanged trees compile nothing
//! - Editing a dependency recompiles exactly its dependents

use std::sync::Arc;

use mason::{BuildEvent, BuildServer, BuilderParams};

use crate::common::*;

fn content() -> TestEnv {
    let env = TestEnv::with_settings(BUILDER_SETTINGS);
    env.write_source("docs/readme.txt", "hello");
    env.write_source("docs/draft.txt", "not yet");
    env.write_source("textures/stone.png", "pixels");
    env.write_source("shaders/lit.shader_src", LIT_SHADER);
    env.write_source("shaders/common.hlsl", COMMON_HLSL);
    env.write_source("mat/stone.material", STONE_MATERIAL);
    env.write_source("levels/intro.pkg", r#"{ "material": ["mat/stone"] }"#);
    env
}

fn build(env: &TestEnv, sink: &Arc<RecordingSink>, force: bool) {
    let params = BuilderParams {
        source_path: env.source(),
        target_path: env.target(),
        server: false,
        force_recompile: force,
    };
    BuildServer::open(&params)
        .unwrap()
        .with_event_sink(sink.clone())
        .run()
        .unwrap();
}

/// SCENARIO: first build, then a no-op rebuild
#[test]
fn scenario_first_build_then_nothing_to_do() {
    let env = content();
    let sink = Arc::new(RecordingSink::default());

    // Step 1: first build compiles every asset with a compiler
    build(&env, &sink, false);
    let mut compiled = sink.take_compiled();
    compiled.sort();
    compiled.dedup();
    assert_eq!(
        compiled,
        vec![
            "docs/readme.txt",
            "levels/intro.pkg",
            "mat/stone.material",
            "shaders/lit.shader_src",
        ]
    );
    assert_eq!(env.read_target("docs/readme.txt"), "hello");
    assert!(!env.target_exists("docs/draft.txt"));
    assert!(env.target_exists("levels/intro.package"));

    // Step 2: metadata is persisted with the recorded edges
    let dependencies = env.metadata("dependency_database");
    assert_eq!(
        dependencies["textures/stone.png"]["dependents"],
        serde_json::json!(["mat/stone.material"])
    );
    assert_eq!(
        dependencies["shaders/common.hlsl"]["dependents"],
        serde_json::json!(["shaders/lit.shader_src"])
    );
    let shaders = env.metadata("shader_database");
    assert_eq!(
        shaders["shaders/lit"]["permutations"],
        serde_json::json!([[], ["ALPHA_TEST"]])
    );

    // Step 3: nothing changed, nothing compiles
    build(&env, &sink, false);
    assert!(sink.take_compiled().is_empty());
}

/// SCENARIO: editing a texture recompiles the material using it
#[test]
fn scenario_texture_edit_recompiles_material() {
    let env = content();
    let sink = Arc::new(RecordingSink::default());
    build(&env, &sink, false);
    sink.take();

    env.touch_source("textures/stone.png");
    build(&env, &sink, false);

    assert_eq!(sink.take_compiled(), vec!["mat/stone.material"]);
}

/// SCENARIO: editing a shader include recompiles the shader, then its materials
#[test]
fn scenario_include_edit_cascades() {
    let env = content();
    let sink = Arc::new(RecordingSink::default());
    build(&env, &sink, false);
    sink.take();

    env.touch_source("shaders/common.hlsl");
    build(&env, &sink, false);

    assert_eq!(
        sink.take_compiled(),
        vec!["shaders/lit.shader_src", "mat/stone.material"]
    );
}

/// SCENARIO: a broken asset fails alone
#[test]
fn scenario_failure_does_not_stop_the_build() {
    let env = content();
    env.write_source("levels/broken.pkg", "{ nope");
    let sink = Arc::new(RecordingSink::default());

    build(&env, &sink, false);

    let failed: Vec<String> = sink
        .take()
        .into_iter()
        .filter_map(|event| match event {
            BuildEvent::CompileFailed { source, .. } => Some(source),
            _ => None,
        })
        .collect();
    assert_eq!(failed, vec!["levels/broken.pkg"]);
    assert_eq!(env.read_target("docs/readme.txt"), "hello");
    assert!(env.target_exists("levels/intro.package"));
}

/// SCENARIO: a deleted texture does not keep its edge across a full rebuild
#[test]
fn scenario_full_rebuild_forgets_deleted_files() {
    let env = content();
    let sink = Arc::new(RecordingSink::default());
    build(&env, &sink, false);

    env.remove_source("textures/stone.png");
    env.write_source(
        "mat/stone.material",
        r#"{ "shader": { "name": "shaders/lit", "options": ["ALPHA_TEST"] } }"#,
    );
    build(&env, &sink, true);

    let dependencies = env.metadata("dependency_database");
    assert!(dependencies.get("textures/stone.png").is_none());
}

/// SCENARIO: metadata files are never treated as assets
#[test]
fn scenario_metadata_is_not_scanned() {
    let env = content();
    let sink = Arc::new(RecordingSink::default());
    build(&env, &sink, false);
    build(&env, &sink, true);

    let touched_metadata = sink.take().into_iter().any(|event| match event {
        BuildEvent::CompileSkip { source, .. } | BuildEvent::Compile { source, .. } => {
            source.starts_with(".builder")
        }
        _ => false,
    });
    assert!(!touched_metadata);
}
