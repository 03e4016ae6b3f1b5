/// Copy text files, compile materials and shaders, two profiles
pub const BUILDER_SETTINGS: &str = r#"{
    "compilers": [
        { "action": "copy", "source_type": "txt" },
        { "action": "package_compiler", "source_type": "pkg" },
        { "action": "material_compiler", "source_type": "material" },
        { "action": "shader_compiler", "source_type": "shader_src" },
        { "action": "texture_compiler", "source_type": "png", "type": "texture" }
    ],
    "ignore_list": ["docs/draft.txt"],
    "setting_profiles": {
        "development": { "optimization_level": 0, "debug": true },
        "release": { "hlsl_optimization_level": 3, "hlsl_debug": false }
    }
}"#;

pub const LIT_SHADER: &str = r#"{
    "options": [{ "define": "SKINNED" }, { "define": "ALPHA_TEST" }],
    "includes": ["common.hlsl"],
    "code": "float4 main() { return helper(); }"
}"#;

pub const COMMON_HLSL: &str = "float4 helper() { return 1; }";

pub const STONE_MATERIAL: &str = r#"{
    "shader": { "name": "shaders/lit", "options": ["ALPHA_TEST"] },
    "textures": { "diffuse_map": "textures/stone.png" },
    "variables": [{ "name": "tint", "type": "vector3", "value": [1.0, 0.5, 0.25] }]
}"#;
