//! Property tests for the transliteration engine

use mirror_translit::{
    collapse_hyphens, contains_hangul, is_name_safe, sanitize_name, transliterate,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn transliterate_is_deterministic(s in "\\PC*") {
        prop_assert_eq!(transliterate(&s), transliterate(&s));
    }

    #[test]
    fn transliterate_is_idempotent(s in "\\PC*") {
        let once = transliterate(&s);
        prop_assert_eq!(transliterate(&once), once.clone());
    }

    #[test]
    fn output_has_no_syllables_or_table_chars(s in "[가-힣a-zA-Z0-9 &+@#%=()\\[\\]{}'\",;!$^`~]*") {
        let out = transliterate(&s);
        prop_assert!(!contains_hangul(&out));
        prop_assert!(is_name_safe(&out));
    }

    #[test]
    fn sanitize_is_idempotent(s in "\\PC*") {
        let once = sanitize_name(&s);
        prop_assert_eq!(sanitize_name(&once), once.clone());
    }

    #[test]
    fn collapse_leaves_no_double_hyphen(s in "[a-c-]*") {
        let out = collapse_hyphens(&s);
        prop_assert!(!out.contains("--"));
        prop_assert!(!out.starts_with('-') && !out.ends_with('-'));
    }
}
