//! Property-based tests for path manipulation functions.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::path::{archive_file_name, normalize, resolve};
    use proptest::prelude::*;
    use std::path::{Component, Path};

    // ============================================================================
    // normalize property tests
    // ============================================================================

    proptest! {
        /// Property: normalize is idempotent
        #[test]
        fn normalize_is_idempotent(parts in prop::collection::vec("(\\.|\\.\\.|[a-z]{1,6})", 0..8)) {
            let path = format!("/{}", parts.join("/"));
            let once = normalize(Path::new(&path));
            let twice = normalize(&once);
            prop_assert_eq!(once, twice);
        }

        /// Property: normalized absolute paths contain no `.` or `..` components
        #[test]
        fn normalize_absolute_has_no_dot_components(parts in prop::collection::vec("(\\.|\\.\\.|[a-z]{1,6})", 0..8)) {
            let path = format!("/{}", parts.join("/"));
            let normalized = normalize(Path::new(&path));
            prop_assert!(normalized.has_root());
            for component in normalized.components() {
                prop_assert!(
                    !matches!(component, Component::CurDir | Component::ParentDir),
                    "unexpected component in {:?}",
                    normalized
                );
            }
        }

        /// Property: a plain relative path without dots resolves under the root
        #[test]
        fn resolve_plain_relative_stays_under_root(parts in prop::collection::vec("[A-Za-z0-9_]{1,8}", 1..5)) {
            let root = Path::new("/workspace/root");
            let resolved = resolve(root, &parts.join("/"));
            prop_assert!(resolved.starts_with(root));
            prop_assert_eq!(resolved.components().count(), root.components().count() + parts.len());
        }
    }

    // ============================================================================
    // archive_file_name property tests
    // ============================================================================

    proptest! {
        /// Property: query strings and fragments never leak into the file name
        #[test]
        fn archive_file_name_ignores_query_and_fragment(
            name in "[A-Za-z0-9_.-]{1,20}",
            query in "[a-z0-9=&]{0,12}",
            fragment in "[a-z0-9]{0,8}",
        ) {
            prop_assume!(name != "." && name != "..");
            let url = format!("https://example.com/dl/{}?{}#{}", name, query, fragment);
            prop_assert_eq!(archive_file_name(&url).unwrap(), name);
        }
    }
}
