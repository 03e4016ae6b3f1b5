//! Domain Entities
//!
//! Core data structures of the build: the dependency graph, the shader
//! permutation store, the settings profiles and the string-id repository.

mod build_settings;
mod dependency_graph;
mod shader;
mod string_ids;

pub use build_settings::{
    BuildSettings, SettingProfiles, DEFAULT_PROFILE_NAME, MAX_OPTIMIZATION_LEVEL,
};
pub use dependency_graph::{DependencyEntry, DependencyGraph};
pub use shader::{
    read_shader_config, Permutation, PermutationSet, Shader, ShaderDatabase,
    SHADER_SOURCE_EXTENSION,
};
pub use string_ids::StringIdRepository;
