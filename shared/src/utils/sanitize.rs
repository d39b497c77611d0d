//! Request input sanitization rules.
//!
//! Two rules operate on decoded request input, either a JSON document or the
//! key/value pairs of a URL-encoded body or query string:
//!
//! - [`SanitizeRule::Xss`] neutralizes markup by escaping `<` as `&lt;` in
//!   every string, object keys included. Whitespace is preserved.
//! - [`SanitizeRule::QueryOperators`] removes keys that a document store would
//!   interpret as query operators or field paths: keys starting with `$` or
//!   containing `.`.
//!
//! Values are never touched by the operator rule.

use serde_json::Value;

/// A sanitization pass applied to request input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanitizeRule {
    /// Escape markup in string values
    Xss,
    /// Strip operator-like keys
    QueryOperators,
}

impl SanitizeRule {
    /// Short name used in log output
    pub fn name(self) -> &'static str {
        match self {
            SanitizeRule::Xss => "xss",
            SanitizeRule::QueryOperators => "query-operators",
        }
    }

    /// Apply the rule to a JSON document, returning how many values or keys changed
    pub fn apply_json(self, value: &mut Value) -> usize {
        match self {
            SanitizeRule::Xss => clean_xss(value),
            SanitizeRule::QueryOperators => strip_operator_keys(value),
        }
    }

    /// Apply the rule to decoded form pairs, returning how many pairs changed
    pub fn apply_pairs(self, pairs: &mut Vec<(String, String)>) -> usize {
        match self {
            SanitizeRule::Xss => clean_xss_pairs(pairs),
            SanitizeRule::QueryOperators => strip_operator_pairs(pairs),
        }
    }
}

/// Escape HTML data the way an HTML text context requires: `<` becomes `&lt;`
pub fn escape_html_data(input: &str) -> String {
    input.replace('<', "&lt;")
}

/// Whether a JSON object key could be read as an operator or a dotted path
pub fn is_operator_key(key: &str) -> bool {
    key.starts_with('$') || key.contains('.')
}

/// Form keys may carry bracketed nesting (`filter[$gt]`); every segment is checked
pub fn is_operator_form_key(key: &str) -> bool {
    key.split(|c| c == '[' || c == ']')
        .filter(|segment| !segment.is_empty())
        .any(is_operator_key)
}

/// Escape every string in the document, keys and values, walking arrays and objects
pub fn clean_xss(value: &mut Value) -> usize {
    match value {
        Value::String(text) => replace_if_changed(text),
        Value::Array(items) => items.iter_mut().map(clean_xss).sum(),
        Value::Object(map) => {
            let mut changed = 0;
            let entries = std::mem::take(map);
            for (mut key, mut item) in entries {
                changed += replace_if_changed(&mut key);
                changed += clean_xss(&mut item);
                map.insert(key, item);
            }
            changed
        }
        Value::Null | Value::Bool(_) | Value::Number(_) => 0,
    }
}

/// Remove operator keys at every depth of the document
pub fn strip_operator_keys(value: &mut Value) -> usize {
    match value {
        Value::Object(map) => {
            let before = map.len();
            map.retain(|key, _| !is_operator_key(key));
            let removed = before - map.len();
            removed + map.values_mut().map(strip_operator_keys).sum::<usize>()
        }
        Value::Array(items) => items.iter_mut().map(strip_operator_keys).sum(),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => 0,
    }
}

/// Escape every key and value of a decoded form
pub fn clean_xss_pairs(pairs: &mut [(String, String)]) -> usize {
    pairs
        .iter_mut()
        .map(|(key, value)| replace_if_changed(key) + replace_if_changed(value))
        .sum()
}

/// Drop every pair whose key is an operator form key
pub fn strip_operator_pairs(pairs: &mut Vec<(String, String)>) -> usize {
    let before = pairs.len();
    pairs.retain(|(key, _)| !is_operator_form_key(key));
    before - pairs.len()
}

fn replace_if_changed(text: &mut String) -> usize {
    let cleaned = escape_html_data(text);
    if cleaned == *text {
        0
    } else {
        *text = cleaned;
        1
    }
}
