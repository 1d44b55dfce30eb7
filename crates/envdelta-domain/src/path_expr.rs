//! Path expressions: a small dot/bracket language for addressing locations in
//! a [`ValueTree`].
//!
//! ```text
//! spec.containers[0].env[name=DEBUG].value
//! env[name^=LOG_LEVEL_].value
//! items[*].image
//! labels["app.kubernetes.io/name"]
//! ```
//!
//! A bare `*` between dots is the same wildcard as `[*]`.
//!
//! Parsing is tolerant: bracket content that is not an index, `*`, a filter,
//! or a quoted key is dropped, as is an unterminated bracket. A malformed
//! path therefore degrades to fewer segments instead of failing.
//!
//! Two resolution modes exist on purpose:
//! - [`resolve_first`] reads a single value; a filter picks the first match
//!   and a wildcard never resolves.
//! - [`resolve_all`] returns every concrete [`Location`] reached; filters and
//!   wildcards fan out to all matches. Fixed values and skip masks use this.

use crate::canonical::scalar_text;
use crate::model::ValueTree;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterOperator {
    /// `=`
    Eq,
    /// `^=`
    StartsWith,
    /// `$=`
    EndsWith,
    /// `*=`
    Contains,
}

impl FilterOperator {
    fn test(self, candidate: &str, literal: &str) -> bool {
        match self {
            FilterOperator::Eq => candidate == literal,
            FilterOperator::StartsWith => candidate.starts_with(literal),
            FilterOperator::EndsWith => candidate.ends_with(literal),
            FilterOperator::Contains => candidate.contains(literal),
        }
    }
}

/// `[property OP literal]`: selects sequence elements by a property value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Filter {
    pub property: String,
    pub operator: FilterOperator,
    pub literal: String,
}

impl Filter {
    /// Both sides are compared as strings. Elements that are not mappings, or
    /// whose property is missing or composite, never match.
    pub fn matches(&self, element: &ValueTree) -> bool {
        element
            .get(&self.property)
            .and_then(scalar_text)
            .is_some_and(|text| self.operator.test(&text, &self.literal))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
    Wildcard,
    Filter(Filter),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PathExpression {
    segments: Vec<Segment>,
}

impl PathExpression {
    /// Parse without caching. Prefer [`PathEngine::parse`] in hot paths.
    pub fn parse(raw: &str) -> Self {
        Self {
            segments: parse_segments(raw),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// One concrete step of a [`Location`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    Key(String),
    Index(usize),
}

/// A fully resolved address inside one tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Location {
    steps: Vec<Step>,
}

impl Location {
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    fn child(&self, step: Step) -> Location {
        let mut steps = self.steps.clone();
        steps.push(step);
        Location { steps }
    }

    pub fn get<'a>(&self, tree: &'a ValueTree) -> Option<&'a ValueTree> {
        let mut current = tree;
        for step in &self.steps {
            current = match step {
                Step::Key(key) => current.as_object()?.get(key)?,
                Step::Index(i) => current.as_array()?.get(*i)?,
            };
        }
        Some(current)
    }

    pub fn get_mut<'a>(&self, tree: &'a mut ValueTree) -> Option<&'a mut ValueTree> {
        let mut current = tree;
        for step in &self.steps {
            current = match step {
                Step::Key(key) => current.as_object_mut()?.get_mut(key)?,
                Step::Index(i) => current.as_array_mut()?.get_mut(*i)?,
            };
        }
        Some(current)
    }

    /// Overwrite the addressed value. Returns `false` if the location no
    /// longer exists in `tree`.
    pub fn set(&self, tree: &mut ValueTree, value: ValueTree) -> bool {
        match self.get_mut(tree) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            match step {
                Step::Key(key) if i == 0 => write!(f, "{key}")?,
                Step::Key(key) => write!(f, ".{key}")?,
                Step::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}

/// Owns the parse cache for one run (or for many runs, shared read-only).
///
/// The cache is append-only and keyed by the raw path string, so the engine
/// can be shared across threads comparing independent files.
#[derive(Debug, Default)]
pub struct PathEngine {
    cache: Mutex<HashMap<String, Arc<PathExpression>>>,
}

impl PathEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(&self, raw: &str) -> Arc<PathExpression> {
        let mut cache = self
            .cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(hit) = cache.get(raw) {
            return Arc::clone(hit);
        }
        let parsed = Arc::new(PathExpression::parse(raw));
        cache.insert(raw.to_string(), Arc::clone(&parsed));
        parsed
    }

    /// Number of distinct path strings parsed so far.
    pub fn cached_len(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn resolve_first<'a>(&self, tree: &'a ValueTree, raw: &str) -> Option<&'a ValueTree> {
        resolve_first(tree, &self.parse(raw))
    }

    pub fn resolve_all(&self, tree: &ValueTree, raw: &str) -> Vec<Location> {
        resolve_all(tree, &self.parse(raw))
    }
}

/// Single-value read. A zero-segment expression addresses nothing.
pub fn resolve_first<'a>(tree: &'a ValueTree, expr: &PathExpression) -> Option<&'a ValueTree> {
    if expr.is_empty() {
        return None;
    }
    let mut current = tree;
    for segment in expr.segments() {
        current = match segment {
            Segment::Key(key) => child_by_key(current, key)?,
            Segment::Index(i) => current.as_array()?.get(*i)?,
            Segment::Wildcard => return None,
            Segment::Filter(filter) => current
                .as_array()?
                .iter()
                .find(|element| filter.matches(element))?,
        };
    }
    Some(current)
}

/// Every location the expression reaches, in document order.
pub fn resolve_all(tree: &ValueTree, expr: &PathExpression) -> Vec<Location> {
    if expr.is_empty() {
        return Vec::new();
    }
    let mut frontier: Vec<(Location, &ValueTree)> = vec![(Location::default(), tree)];
    for segment in expr.segments() {
        let mut next = Vec::new();
        for (location, node) in frontier {
            match segment {
                Segment::Key(key) => match node {
                    ValueTree::Object(map) => {
                        if let Some(child) = map.get(key) {
                            next.push((location.child(Step::Key(key.clone())), child));
                        }
                    }
                    ValueTree::Array(items) => {
                        if let Ok(i) = key.parse::<usize>()
                            && let Some(child) = items.get(i)
                        {
                            next.push((location.child(Step::Index(i)), child));
                        }
                    }
                    _ => {}
                },
                Segment::Index(i) => {
                    if let Some(child) = node.as_array().and_then(|items| items.get(*i)) {
                        next.push((location.child(Step::Index(*i)), child));
                    }
                }
                Segment::Wildcard => match node {
                    ValueTree::Array(items) => {
                        for (i, child) in items.iter().enumerate() {
                            next.push((location.child(Step::Index(i)), child));
                        }
                    }
                    ValueTree::Object(map) => {
                        for (key, child) in map {
                            next.push((location.child(Step::Key(key.clone())), child));
                        }
                    }
                    _ => {}
                },
                Segment::Filter(filter) => {
                    if let Some(items) = node.as_array() {
                        for (i, child) in items.iter().enumerate() {
                            if filter.matches(child) {
                                next.push((location.child(Step::Index(i)), child));
                            }
                        }
                    }
                }
            }
        }
        if next.is_empty() {
            return Vec::new();
        }
        frontier = next;
    }
    frontier.into_iter().map(|(location, _)| location).collect()
}

fn child_by_key<'a>(node: &'a ValueTree, key: &str) -> Option<&'a ValueTree> {
    match node {
        ValueTree::Object(map) => map.get(key),
        ValueTree::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

// ============================================================================
// Parser
// ============================================================================

fn parse_segments(raw: &str) -> Vec<Segment> {
    let raw = raw.trim();
    let raw = if raw == "$" {
        ""
    } else if raw.starts_with("$.") || raw.starts_with("$[") {
        &raw[1..]
    } else {
        raw
    };

    let mut segments = Vec::new();
    let mut key = String::new();
    let mut chars = raw.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '.' => flush_key(&mut key, &mut segments),
            '[' => {
                flush_key(&mut key, &mut segments);
                let Some(end) = bracket_end(raw, i + 1) else {
                    // Unterminated: the rest of the path is dropped.
                    break;
                };
                if let Some(segment) = parse_bracket(&raw[i + 1..end]) {
                    segments.push(segment);
                }
                while chars.peek().is_some_and(|(j, _)| *j <= end) {
                    chars.next();
                }
            }
            other => key.push(other),
        }
    }
    flush_key(&mut key, &mut segments);
    segments
}

fn flush_key(key: &mut String, segments: &mut Vec<Segment>) {
    match key.as_str() {
        "" => {}
        "*" => {
            key.clear();
            segments.push(Segment::Wildcard);
        }
        _ => segments.push(Segment::Key(std::mem::take(key))),
    }
}

/// Byte index of the `]` closing a bracket whose content starts at `start`,
/// skipping over quoted runs.
///
/// A quote only opens a run when it starts a value: first thing in the
/// bracket, or first thing after a filter's `=`. Elsewhere it is literal,
/// so `[name=O'BRIEN]` still closes at its `]`.
fn bracket_end(raw: &str, start: usize) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut value_start = true;
    for (offset, c) in raw[start..].char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => {
                quote = None;
                value_start = false;
            }
            (Some(_), _) => {}
            (None, '"' | '\'') if value_start => quote = Some(c),
            (None, ']') => return Some(start + offset),
            (None, '=') => value_start = true,
            (None, c) if c.is_whitespace() => {}
            (None, _) => value_start = false,
        }
    }
    None
}

fn parse_bracket(content: &str) -> Option<Segment> {
    let content = content.trim();
    if content == "*" {
        return Some(Segment::Wildcard);
    }
    if !content.is_empty() && content.bytes().all(|b| b.is_ascii_digit()) {
        return content.parse().ok().map(Segment::Index);
    }
    if let Some(key) = unquote(content) {
        return Some(Segment::Key(key.to_string()));
    }
    parse_filter(content).map(Segment::Filter)
}

fn parse_filter(content: &str) -> Option<Filter> {
    let eq = content.find('=')?;
    let (operator, property_end) = match content[..eq].chars().last() {
        Some('^') => (FilterOperator::StartsWith, eq - 1),
        Some('$') => (FilterOperator::EndsWith, eq - 1),
        Some('*') => (FilterOperator::Contains, eq - 1),
        _ => (FilterOperator::Eq, eq),
    };
    let property = content[..property_end].trim();
    if property.is_empty() || property.contains(['"', '\'']) {
        return None;
    }
    let literal = content[eq + 1..].trim();
    let literal = unquote(literal).unwrap_or(literal);
    Some(Filter {
        property: property.to_string(),
        operator,
        literal: literal.to_string(),
    })
}

fn unquote(s: &str) -> Option<&str> {
    let first = s.chars().next()?;
    if s.len() >= 2 && (first == '"' || first == '\'') && s.ends_with(first) {
        Some(&s[1..s.len() - 1])
    } else {
        None
    }
}
