//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - order-independent equality
//! - path parsing (pure, cached, never panics)
//! - agreement between the two resolution modes

use crate::canonical::{canonical_string, equal, normalize};
use crate::model::ValueTree;
use crate::path_expr::{PathEngine, PathExpression, resolve_all, resolve_first};
use proptest::prelude::*;
use serde_json::{Map, json};
use std::sync::Arc;

// ============================================================================
// Strategies for generating arbitrary values
// ============================================================================

fn arb_key() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["a", "b", "name", "value", "env"]).prop_map(str::to_string)
}

fn arb_leaf() -> impl Strategy<Value = ValueTree> {
    prop_oneof![
        Just(ValueTree::Null),
        any::<bool>().prop_map(ValueTree::Bool),
        (-1000i64..1000).prop_map(|n| json!(n)),
        prop::string::string_regex("[A-Z_]{0,8}")
            .unwrap()
            .prop_map(ValueTree::String),
    ]
}

/// Small nested trees over a handful of keys so paths actually hit.
fn arb_tree() -> impl Strategy<Value = ValueTree> {
    arb_leaf().prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(ValueTree::Array),
            prop::collection::vec((arb_key(), inner), 0..5).prop_map(|entries| {
                let mut map = Map::new();
                for (key, value) in entries {
                    map.insert(key, value);
                }
                ValueTree::Object(map)
            }),
        ]
    })
}

/// Paths assembled from well-formed segments.
fn arb_path() -> impl Strategy<Value = String> {
    let segment = prop_oneof![
        arb_key(),
        (0usize..4).prop_map(|i| format!("[{i}]")),
        Just("[*]".to_string()),
        Just("*".to_string()),
        (
            arb_key(),
            prop::sample::select(vec!["=", "^=", "$=", "*="]),
            prop::string::string_regex("[A-Z_]{0,3}").unwrap(),
        )
            .prop_map(|(property, op, literal)| format!("[{property}{op}{literal}]")),
    ];
    prop::collection::vec(segment, 1..5).prop_map(|segments| {
        let mut path = String::new();
        for segment in segments {
            if !path.is_empty() && !segment.starts_with('[') {
                path.push('.');
            }
            path.push_str(&segment);
        }
        path
    })
}

/// Arbitrary text biased towards path syntax.
fn arb_path_noise() -> impl Strategy<Value = String> {
    prop::string::string_regex(r#"[a-z0-9.\[\]*=^$"' _-]{0,24}"#).unwrap()
}

// ============================================================================
// Property tests: equality
// ============================================================================

proptest! {
    #[test]
    fn equality_is_reflexive(tree in arb_tree()) {
        prop_assert!(equal(&normalize(tree.clone()), &normalize(tree)));
    }

    #[test]
    fn equality_is_symmetric(a in arb_tree(), b in arb_tree()) {
        let (a, b) = (normalize(a), normalize(b));
        prop_assert_eq!(equal(&a, &b), equal(&b, &a));
    }

    /// Shuffling a sequence never changes the equality decision.
    #[test]
    fn equality_ignores_sequence_order(
        (items, shuffled) in prop::collection::vec(arb_tree(), 0..6)
            .prop_flat_map(|items| (Just(items.clone()), Just(items).prop_shuffle()))
    ) {
        let a = normalize(json!({"items": items}));
        let b = normalize(json!({"items": shuffled}));
        prop_assert!(equal(&a, &b));
    }

    #[test]
    fn normalize_is_idempotent(tree in arb_tree()) {
        let once = normalize(tree);
        let twice = normalize(once.clone());
        prop_assert_eq!(canonical_string(&once), canonical_string(&twice));
    }

    /// Equal canonical strings and structural equality agree.
    #[test]
    fn canonical_string_agrees_with_equal(a in arb_tree(), b in arb_tree()) {
        let (a, b) = (normalize(a), normalize(b));
        prop_assert_eq!(canonical_string(&a) == canonical_string(&b), equal(&a, &b));
    }
}

// ============================================================================
// Property tests: path expressions
// ============================================================================

proptest! {
    #[test]
    fn parse_never_panics(raw in any::<String>()) {
        let _ = PathExpression::parse(&raw);
    }

    #[test]
    fn parse_is_pure_and_cached(raw in arb_path_noise()) {
        let engine = PathEngine::new();
        let first = engine.parse(&raw);
        let second = engine.parse(&raw);
        prop_assert!(Arc::ptr_eq(&first, &second));
        prop_assert_eq!(&*first, &PathExpression::parse(&raw));
        prop_assert_eq!(engine.cached_len(), 1);
    }

    #[test]
    fn resolution_never_panics(tree in arb_tree(), raw in arb_path_noise()) {
        let expr = PathExpression::parse(&raw);
        let _ = resolve_first(&tree, &expr);
        let _ = resolve_all(&tree, &expr);
    }

    /// Whatever `resolve_first` reads is one of the locations
    /// `resolve_all` reports.
    #[test]
    fn resolve_first_is_among_resolve_all(tree in arb_tree(), raw in arb_path()) {
        let expr = PathExpression::parse(&raw);
        if let Some(value) = resolve_first(&tree, &expr) {
            let locations = resolve_all(&tree, &expr);
            prop_assert!(
                locations
                    .iter()
                    .any(|location| location.get(&tree).is_some_and(|hit| std::ptr::eq(hit, value))),
                "{} resolved to {} but was not among {:?}",
                raw,
                value,
                locations
            );
        }
    }

    /// Every reported location still addresses a value in the same tree.
    #[test]
    fn resolve_all_locations_are_live(tree in arb_tree(), raw in arb_path()) {
        for location in resolve_all(&tree, &PathExpression::parse(&raw)) {
            prop_assert!(location.get(&tree).is_some(), "dangling {}", location);
        }
    }
}
