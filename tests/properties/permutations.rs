//! Property tests for shader permutation names.

use proptest::prelude::*;
use serde_json::json;

use mason::domain::entities::Shader;

const OPTIONS: [&str; 4] = ["SKINNED", "ALPHA_TEST", "INSTANCED", "FOG"];

fn shader() -> Shader {
    let options: Vec<_> = OPTIONS.iter().map(|o| json!({ "define": o })).collect();
    Shader::new("shaders/lit.shader_src", json!({ "options": options }))
}

fn option_subset() -> impl Strategy<Value = Vec<&'static str>> {
    proptest::sample::subsequence(OPTIONS.to_vec(), 0..=OPTIONS.len()).prop_shuffle()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: The permutation name ignores request order.
    #[test]
    fn property_name_is_order_independent(options in option_subset()) {
        let shader = shader();
        let mut reversed = options.clone();
        reversed.reverse();
        prop_assert_eq!(shader.build_name(&options), shader.build_name(&reversed));
    }

    /// PROPERTY: Options appear in declaration order.
    #[test]
    fn property_name_follows_declaration_order(options in option_subset()) {
        let expected: Vec<&str> = OPTIONS
            .iter()
            .copied()
            .filter(|declared| options.contains(declared))
            .collect();
        let mut name = "shaders/lit".to_string();
        for option in expected {
            name.push(':');
            name.push_str(option);
        }
        prop_assert_eq!(shader().build_name(&options), name);
    }

    /// PROPERTY: An undeclared option is rejected and changes nothing.
    #[test]
    fn property_undeclared_option_is_rejected(
        options in option_subset(),
        undeclared in "[a-z]{1,12}",
    ) {
        let mut shader = shader();
        let mut requested: Vec<&str> = options.clone();
        requested.push(&undeclared);
        prop_assert!(!shader.preload_permutation(&requested));
        prop_assert_eq!(shader.permutations().len(), 1);
        prop_assert!(!shader.is_dirty());
    }

    /// PROPERTY: Requesting the same permutation twice stores it once.
    #[test]
    fn property_preload_is_idempotent(options in option_subset()) {
        let mut shader = shader();
        prop_assert!(shader.preload_permutation(&options));
        let count = shader.permutations().len();
        prop_assert!(shader.preload_permutation(&options));
        prop_assert_eq!(shader.permutations().len(), count);
        prop_assert!(shader.permutations().contains_key(&shader.build_name(&options)));
    }
}

#[test]
fn zero_option_shader_has_one_permutation() {
    let shader = Shader::new("shaders/flat.shader_src", json!({}));
    assert_eq!(shader.permutations().len(), 1);
    assert!(shader.permutations().contains_key("shaders/flat"));
}
