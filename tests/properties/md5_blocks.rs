//! Property tests for block-wise archive hashing.

use proptest::prelude::*;

use hoist::application::package::{md5_reader, HASH_BLOCK_SIZE};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: The digest does not depend on the read block size.
    #[test]
    fn property_md5_independent_of_block_size(
        data in proptest::collection::vec(any::<u8>(), 0..=8192),
        block in 1usize..=4096,
    ) {
        let blockwise = md5_reader(data.as_slice(), block).unwrap();
        let whole = md5_reader(data.as_slice(), HASH_BLOCK_SIZE).unwrap();
        prop_assert_eq!(blockwise, whole);
    }

    /// PROPERTY: Digests are 32 lowercase hex characters.
    #[test]
    fn property_md5_is_lower_hex(data in proptest::collection::vec(any::<u8>(), 0..=1024)) {
        let digest = md5_reader(data.as_slice(), HASH_BLOCK_SIZE).unwrap();
        prop_assert_eq!(digest.len(), 32);
        prop_assert!(digest.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)));
    }
}
