//! Property tests for asset path normalization.

use proptest::prelude::*;

use mason::domain::value_objects::{normalize_path, AssetSource};

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9_-]{1,10}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Normalization never panics and is idempotent.
    #[test]
    fn property_normalize_is_idempotent(s in "(?s).{0,128}") {
        let once = normalize_path(&s);
        prop_assert!(!once.contains('\\'));
        prop_assert_eq!(normalize_path(&once), once);
    }

    /// PROPERTY: Backslash and slash separated paths name the same asset.
    #[test]
    fn property_separators_are_equivalent(
        dirs in proptest::collection::vec(segment(), 0..4),
        stem in segment(),
        ext in "[a-z]{1,6}",
    ) {
        let mut parts = dirs.clone();
        parts.push(format!("{stem}.{ext}"));
        let forward = AssetSource::new(parts.join("/"));
        let backward = AssetSource::new(parts.join("\\"));

        prop_assert_eq!(&forward, &backward);
        prop_assert_eq!(forward.source_type(), ext.as_str());
        prop_assert_eq!(
            forward.target_path("out"),
            format!("{}.out", forward.name())
        );
    }
}
