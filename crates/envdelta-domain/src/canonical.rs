//! Order-independent comparison of value trees.
//!
//! [`normalize`] sorts every sequence by the canonical serialization of its
//! (already normalized) elements; [`equal`] then compares two normalized trees
//! structurally. Mapping key order never matters.

use crate::model::ValueTree;
use serde_json::Number;

/// Reorder sequences so that element order no longer affects [`equal`].
pub fn normalize(tree: ValueTree) -> ValueTree {
    match tree {
        ValueTree::Array(items) => {
            let mut items: Vec<ValueTree> = items.into_iter().map(normalize).collect();
            items.sort_by_cached_key(canonical_string);
            ValueTree::Array(items)
        }
        ValueTree::Object(map) => ValueTree::Object(
            map.into_iter()
                .map(|(key, value)| (key, normalize(value)))
                .collect(),
        ),
        scalar => scalar,
    }
}

/// Deterministic serialization: mapping keys sorted, numbers in canonical
/// form. Sequence order is kept as-is, so feed it normalized trees.
pub fn canonical_string(tree: &ValueTree) -> String {
    let mut out = String::new();
    write_canonical(tree, &mut out);
    out
}

fn write_canonical(tree: &ValueTree, out: &mut String) {
    match tree {
        ValueTree::Null => out.push_str("null"),
        ValueTree::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        ValueTree::Number(n) => out.push_str(&number_text(n)),
        ValueTree::String(_) => out.push_str(&tree.to_string()),
        ValueTree::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        ValueTree::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            out.push('{');
            for (i, (key, value)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&ValueTree::from(key.as_str()).to_string());
                out.push(':');
                write_canonical(value, out);
            }
            out.push('}');
        }
    }
}

/// Structural equality of two normalized trees.
pub fn equal(a: &ValueTree, b: &ValueTree) -> bool {
    match (a, b) {
        (ValueTree::Null, ValueTree::Null) => true,
        (ValueTree::Bool(x), ValueTree::Bool(y)) => x == y,
        (ValueTree::Number(x), ValueTree::Number(y)) => numbers_equal(x, y),
        (ValueTree::String(x), ValueTree::String(y)) => x == y,
        (ValueTree::Array(xs), ValueTree::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| equal(x, y))
        }
        (ValueTree::Object(xs), ValueTree::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(key, x)| ys.get(key).is_some_and(|y| equal(x, y)))
        }
        _ => false,
    }
}

fn numbers_equal(x: &Number, y: &Number) -> bool {
    if x.is_f64() || y.is_f64() {
        x.as_f64() == y.as_f64()
    } else {
        x == y
    }
}

/// Integral floats print without a fraction so `1` and `1.0` agree.
fn number_text(n: &Number) -> String {
    if !n.is_f64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// String form of a scalar, as used by filters and stop rules.
/// Composites have no scalar form.
pub fn scalar_text(value: &ValueTree) -> Option<String> {
    match value {
        ValueTree::Null => Some("null".to_string()),
        ValueTree::Bool(b) => Some(b.to_string()),
        ValueTree::Number(n) => Some(number_text(n)),
        ValueTree::String(s) => Some(s.clone()),
        ValueTree::Array(_) | ValueTree::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn same(a: ValueTree, b: ValueTree) -> bool {
        equal(&normalize(a), &normalize(b))
    }

    #[test]
    fn scalar_arrays_ignore_order() {
        assert!(same(json!([1, 2, 3]), json!([3, 2, 1])));
        assert!(!same(json!([1, 2, 3]), json!([1, 2, 4])));
        assert!(!same(json!([1, 2]), json!([1, 2, 2])));
    }

    #[test]
    fn object_arrays_ignore_order() {
        assert!(same(json!([{"a": 1}, {"a": 2}]), json!([{"a": 2}, {"a": 1}])));
        assert!(same(
            json!({"env": [{"name": "B", "value": "2"}, {"value": "1", "name": "A"}]}),
            json!({"env": [{"name": "A", "value": "1"}, {"name": "B", "value": "2"}]})
        ));
    }

    #[test]
    fn nested_arrays_are_normalized_before_sorting_parents() {
        assert!(same(json!([[2, 1], [4, 3]]), json!([[3, 4], [1, 2]])));
    }

    #[test]
    fn key_order_is_irrelevant() {
        assert!(same(json!({"a": 1, "b": 2}), json!({"b": 2, "a": 1})));
        assert!(!same(json!({"a": 1}), json!({"a": 1, "b": null})));
    }

    #[test]
    fn types_must_match() {
        assert!(!same(json!("1"), json!(1)));
        assert!(!same(json!(null), json!(false)));
        assert!(!same(json!([]), json!({})));
    }

    #[test]
    fn integral_floats_equal_integers() {
        assert!(same(json!(1), json!(1.0)));
        assert!(same(json!([1.0, 2]), json!([2, 1])));
        assert!(!same(json!(1), json!(1.5)));
    }

    #[test]
    fn canonical_string_sorts_keys() {
        assert_eq!(
            canonical_string(&json!({"b": [1, "x"], "a": {"d": null, "c": true}})),
            r#"{"a":{"c":true,"d":null},"b":[1,"x"]}"#
        );
    }

    #[test]
    fn scalar_text_forms() {
        assert_eq!(scalar_text(&json!("s")).as_deref(), Some("s"));
        assert_eq!(scalar_text(&json!(42)).as_deref(), Some("42"));
        assert_eq!(scalar_text(&json!(2.0)).as_deref(), Some("2"));
        assert_eq!(scalar_text(&json!(2.5)).as_deref(), Some("2.5"));
        assert_eq!(scalar_text(&json!(true)).as_deref(), Some("true"));
        assert_eq!(scalar_text(&json!(null)).as_deref(), Some("null"));
        assert_eq!(scalar_text(&json!([1])), None);
    }
}
