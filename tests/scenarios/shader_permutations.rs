//! Scenario: materials request shader permutations
//!
//! Success Criteria:
//! - Every permutation requested by a material ends up in the shader library
//! - The active profile controls optimization level and debug defines

use std::sync::Arc;

use mason::{BuildServer, BuilderParams};

use crate::common::*;

fn shader_library(env: &TestEnv) -> serde_json::Value {
    serde_json::from_str(&env.read_target("shaders/lit.shader")).unwrap()
}

fn permutation_names(library: &serde_json::Value) -> Vec<String> {
    library["permutations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap().to_string())
        .collect()
}

fn open(env: &TestEnv, force: bool) -> BuildServer {
    let params = BuilderParams {
        source_path: env.source(),
        target_path: env.target(),
        server: false,
        force_recompile: force,
    };
    BuildServer::open(&params)
        .unwrap()
        .with_event_sink(Arc::new(RecordingSink::default()))
}

/// SCENARIO: two materials, two permutations, canonical order
#[test]
fn scenario_requested_permutations_are_compiled() {
    let env = TestEnv::with_settings(BUILDER_SETTINGS);
    env.write_source("shaders/lit.shader_src", LIT_SHADER);
    env.write_source("shaders/common.hlsl", COMMON_HLSL);
    env.write_source("mat/stone.material", STONE_MATERIAL);
    env.write_source(
        "mat/skin.material",
        r#"{ "shader": { "name": "shaders/lit", "options": ["ALPHA_TEST", "SKINNED"] } }"#,
    );

    open(&env, false).run().unwrap();

    let library = shader_library(&env);
    assert_eq!(
        permutation_names(&library),
        vec![
            "shaders/lit",
            "shaders/lit:ALPHA_TEST",
            "shaders/lit:SKINNED:ALPHA_TEST",
        ]
    );
    assert_eq!(library["debug"], true);

    let material: serde_json::Value =
        serde_json::from_str(&env.read_target("mat/skin.material")).unwrap();
    assert_eq!(material["shader"], "shaders/lit:SKINNED:ALPHA_TEST");
}

/// SCENARIO: the release profile changes the compiled shader
#[test]
fn scenario_release_profile() {
    let env = TestEnv::with_settings(BUILDER_SETTINGS);
    env.write_source("shaders/lit.shader_src", LIT_SHADER);
    env.write_source("shaders/common.hlsl", COMMON_HLSL);
    env.write_source("mat/stone.material", STONE_MATERIAL);

    let mut server = open(&env, true);
    assert_eq!(server.setting_profiles(), vec!["development", "release"]);
    assert!(server.select_profile("release"));
    server.run().unwrap();

    let library = shader_library(&env);
    assert_eq!(library["optimization_level"], 3);
    assert_eq!(library["debug"], false);
    let code = library["permutations"][1]["code"].as_str().unwrap();
    assert!(code.contains("#define ALPHA_TEST 1"));
    assert!(!code.contains("DEBUG"));
}
