//! YAML text to [`ValueTree`].
//!
//! Trees use string keys only, so non-string scalar keys are stringified.
//! Non-finite floats have no JSON number form and are kept as their YAML
//! spelling.

use crate::model::ValueTree;
use serde_json::{Map, Number};
use serde_yaml_ng::Value as YamlValue;

pub fn parse_yaml(text: &str) -> Result<ValueTree, serde_yaml_ng::Error> {
    if text.trim().is_empty() {
        return Ok(ValueTree::Null);
    }
    let doc: YamlValue = serde_yaml_ng::from_str(text)?;
    Ok(to_tree(doc))
}

fn to_tree(value: YamlValue) -> ValueTree {
    match value {
        YamlValue::Null => ValueTree::Null,
        YamlValue::Bool(b) => ValueTree::Bool(b),
        YamlValue::Number(n) => number_to_tree(&n),
        YamlValue::String(s) => ValueTree::String(s),
        YamlValue::Sequence(items) => ValueTree::Array(items.into_iter().map(to_tree).collect()),
        YamlValue::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, value) in mapping {
                map.insert(key_text(key), to_tree(value));
            }
            ValueTree::Object(map)
        }
        YamlValue::Tagged(tagged) => to_tree(tagged.value),
    }
}

fn number_to_tree(n: &serde_yaml_ng::Number) -> ValueTree {
    if let Some(i) = n.as_i64() {
        return ValueTree::from(i);
    }
    if let Some(u) = n.as_u64() {
        return ValueTree::from(u);
    }
    match n.as_f64() {
        Some(f) => match Number::from_f64(f) {
            Some(num) => ValueTree::Number(num),
            None => ValueTree::String(non_finite_text(f).to_string()),
        },
        None => ValueTree::String(n.to_string()),
    }
}

fn non_finite_text(f: f64) -> &'static str {
    if f.is_nan() {
        ".nan"
    } else if f.is_sign_negative() {
        "-.inf"
    } else {
        ".inf"
    }
}

fn key_text(key: YamlValue) -> String {
    match key {
        YamlValue::String(s) => s,
        YamlValue::Number(n) => n.to_string(),
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Null => "null".to_string(),
        YamlValue::Tagged(tagged) => key_text(tagged.value),
        other => serde_yaml_ng::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
