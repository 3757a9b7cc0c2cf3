//! Property tests for artifact naming.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use hoist::domain::value_objects::{ArtifactId, Version, ARTIFACT_EXTENSION, SHORT_COMMIT_LEN};

fn commit_hash() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[0-9a-f]{7,40}").unwrap()
}

fn product() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_]{0,15}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: The id is a pure function of product, day, version and short commit.
    #[test]
    fn property_artifact_id_is_deterministic(
        product in product(),
        secs_a in 0i64..86_400,
        secs_b in 0i64..86_400,
        day in 0i64..20_000,
        (major, minor, patch) in (0u64..100, 0u64..100, 0u64..1000),
        commit in commit_hash(),
    ) {
        let version = Version::new(major, minor, patch);
        let midnight = day * 86_400;
        let a = Utc.timestamp_opt(midnight + secs_a, 0).unwrap();
        let b = Utc.timestamp_opt(midnight + secs_b, 0).unwrap();

        let first = ArtifactId::new(product.clone(), a, version.clone(), &commit);
        let second = ArtifactId::new(product, b, version, &commit);
        prop_assert_eq!(first.to_string(), second.to_string());
    }

    /// PROPERTY: The id always splits into four `--` separated components.
    #[test]
    fn property_artifact_id_has_four_components(
        product in product(),
        secs in 0i64..2_000_000_000,
        (major, minor, patch) in (0u64..100, 0u64..100, 0u64..1000),
        commit in commit_hash(),
    ) {
        let built_at = Utc.timestamp_opt(secs, 0).unwrap();
        let version = Version::new(major, minor, patch);
        let id = ArtifactId::new(product.clone(), built_at, version.clone(), &commit);
        let text = id.to_string();

        let parts: Vec<&str> = text.split("--").collect();
        prop_assert_eq!(parts.len(), 4);
        prop_assert_eq!(parts[0], product.as_str());
        prop_assert_eq!(parts[1], built_at.format("%Y-%m-%d").to_string());
        prop_assert_eq!(parts[2], version.to_string());
        prop_assert_eq!(parts[3], &commit[..SHORT_COMMIT_LEN]);

        prop_assert_eq!(id.file_name(), format!("{text}{ARTIFACT_EXTENSION}"));
    }
}
