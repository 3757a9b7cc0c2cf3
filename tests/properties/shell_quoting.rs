//! Property tests for remote argument quoting.

use proptest::prelude::*;

use hoist::infrastructure::quote;

use crate::common::shell_words;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: A quoted value is read back by the shell as exactly one word.
    #[test]
    fn property_quote_is_a_single_word(value in "\\PC{0,32}") {
        prop_assert_eq!(shell_words(&quote(&value)), vec![value]);
    }

    /// PROPERTY: Quoted values cannot split a command.
    #[test]
    fn property_quoted_arguments_stay_separate(
        a in "[ ';&|$a-z]{0,12}",
        b in "[ ';&|$a-z]{0,12}",
    ) {
        let command = format!("mv -f {} {}", quote(&a), quote(&b));
        prop_assert_eq!(shell_words(&command), vec!["mv".to_string(), "-f".to_string(), a, b]);
    }
}
