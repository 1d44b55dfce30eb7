//! Fuzz target for path expression parsing and resolution.
//!
//! Goal: parsing and both resolution modes should **never panic** on any
//! input. Malformed paths degrade to fewer segments.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_path_expression
//! ```

#![no_main]

use arbitrary::Arbitrary;
use envdelta_domain::PathEngine;
use envdelta_domain::yaml::parse_yaml;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct PathInput {
    /// Raw path expression, e.g. `env[name^=LOG_].value`
    path: String,
    /// YAML document to resolve against
    document: String,
}

fuzz_target!(|input: PathInput| {
    if input.path.len() > 512 || input.document.len() > 4096 {
        return;
    }

    let engine = PathEngine::new();
    let expr = engine.parse(&input.path);
    let again = engine.parse(&input.path);
    assert_eq!(expr, again, "parsing must be deterministic");

    let Ok(mut tree) = parse_yaml(&input.document) else {
        return;
    };

    let first = engine.resolve_first(&tree, &input.path).cloned();
    let locations = engine.resolve_all(&tree, &input.path);
    if let Some(value) = first {
        assert!(
            locations.iter().any(|l| l.get(&tree) == Some(&value)),
            "resolve_first result must be among resolve_all results"
        );
    }

    for location in &locations {
        location.set(&mut tree, serde_json::Value::Null);
    }
});
