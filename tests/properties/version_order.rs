//! Property tests for version parsing and ordering.

use proptest::prelude::*;

use hoist::domain::value_objects::{newer, Version};

fn version() -> impl Strategy<Value = Version> {
    (0u64..1000, 0u64..1000, 0u64..1000).prop_map(|(a, b, c)| Version::new(a, b, c))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: Printing then parsing a version gives it back.
    #[test]
    fn property_version_display_parses_back(v in version()) {
        prop_assert_eq!(Version::parse(&v.to_string()).unwrap(), v);
    }

    /// PROPERTY: `newer` is numeric lexicographic comparison of the triplet.
    #[test]
    fn property_newer_matches_tuple_order(a in version(), b in version()) {
        let ta = (a.major(), a.minor(), a.patch());
        let tb = (b.major(), b.minor(), b.patch());
        prop_assert_eq!(newer(&a, &b), ta > tb);
    }

    /// PROPERTY: A version is never newer than itself, so redeploys are refused.
    #[test]
    fn property_newer_is_irreflexive(v in version()) {
        prop_assert!(!newer(&v, &v));
    }

    /// PROPERTY: Parsing arbitrary text never panics.
    #[test]
    fn property_parse_never_panics(input in "\\PC{0,24}") {
        let _ = Version::parse(&input);
    }
}
