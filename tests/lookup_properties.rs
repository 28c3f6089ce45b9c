//! Property tests for module lookup
//!
//! These tests verify that:
//! - Swapping apostrophes twice gives back the original identifier
//! - Every named module resolves in either apostrophe spelling
//! - Identifiers absent from the table never resolve

use bossmodules::services::{normalize_modules, resolve_ignore_list, swap_apostrophes};
use proptest::prelude::*;
use serde_json::json;
use std::collections::BTreeSet;

proptest! {
    #[test]
    fn swap_apostrophes_is_reversible(identifier in "[A-Za-z' ]{1,24}") {
        prop_assume!(identifier.contains('\''));

        let swapped = swap_apostrophes(&identifier).unwrap();
        prop_assert!(!swapped.contains('\''));
        prop_assert_eq!(swap_apostrophes(&swapped), Some(identifier));
    }

    #[test]
    fn plain_identifiers_have_no_alternate(identifier in "[A-Za-z0-9 ]{0,24}") {
        prop_assert_eq!(swap_apostrophes(&identifier), None);
    }

    #[test]
    fn named_modules_resolve_in_both_spellings(
        stems in proptest::collection::btree_set("[A-Za-z]{1,8}", 1..12)
    ) {
        let stems: Vec<String> = stems.into_iter().collect();
        let modules: Vec<_> = stems
            .iter()
            .enumerate()
            .map(|(i, stem)| {
                json!({
                    "Name": format!("{}’s Module", stem),
                    "ModuleID": format!("id{}", i),
                    "Ignore": [format!("{}’s Module", stems[0])]
                })
            })
            .collect();

        let feed = normalize_modules(&modules);

        for (i, stem) in stems.iter().enumerate() {
            let expected_id = format!("id{}", i);
            let typographic = format!("{}’s Module", stem);
            let ascii = format!("{}'s Module", stem);

            for spelling in [&typographic, &ascii, &expected_id] {
                let ids = resolve_ignore_list(&feed.ignore_table, &feed.index, spelling, true);
                prop_assert_eq!(ids, Some(vec!["id0".to_string()]));
            }
        }
    }

    #[test]
    fn straight_apostrophe_names_resolve_from_typographic_queries(
        stems in proptest::collection::btree_set("[A-Za-z]{1,8}", 1..12)
    ) {
        let stems: Vec<String> = stems.into_iter().collect();
        let modules: Vec<_> = stems
            .iter()
            .enumerate()
            .map(|(i, stem)| {
                json!({
                    "Name": format!("{}'s Module", stem),
                    "ModuleID": format!("id{}", i),
                    "Ignore": [format!("{}'s Module", stems[stems.len() - 1])]
                })
            })
            .collect();

        let feed = normalize_modules(&modules);
        let last_id = format!("id{}", stems.len() - 1);
        let last_name = format!("{}'s Module", stems[stems.len() - 1]);

        for stem in &stems {
            let typographic = format!("{}’s Module", stem);

            let ids = resolve_ignore_list(&feed.ignore_table, &feed.index, &typographic, true);
            prop_assert_eq!(ids, Some(vec![last_id.clone()]));

            let names = resolve_ignore_list(&feed.ignore_table, &feed.index, &typographic, false);
            prop_assert_eq!(names, Some(vec![last_name.clone()]));
        }
    }

    #[test]
    fn unknown_identifiers_never_resolve(
        known in proptest::collection::btree_set("[a-z]{1,6}", 0..8),
        probe in "[A-Za-z'’ ]{0,16}"
    ) {
        let known: BTreeSet<String> = known;
        let modules: Vec<_> = known
            .iter()
            .map(|stem| json!({"Name": stem.to_uppercase(), "ModuleID": stem, "Ignore": []}))
            .collect();
        let feed = normalize_modules(&modules);

        let resolvable = known.iter().any(|stem| {
            probe == *stem
                || probe == stem.to_uppercase()
        });
        prop_assume!(!resolvable);

        prop_assert_eq!(resolve_ignore_list(&feed.ignore_table, &feed.index, &probe, false), None);
        prop_assert_eq!(resolve_ignore_list(&feed.ignore_table, &feed.index, &probe, true), None);
    }
}
