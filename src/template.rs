//! Template variable extraction for text nodes.
//!
//! A text node's template may contain `{{name}}` placeholders. Every distinct
//! placeholder becomes a target handle on the node, so the extracted list is
//! part of the node's handle identity: the same template must always yield the
//! same names in the same order.

use itertools::Itertools;
use regex::Regex;
use std::sync::LazyLock;

/// `{{ name }}` with optional padding; names are ASCII word characters.
static VARIABLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([[:word:]]+)\s*\}\}").expect("valid regex"));

/// Extracts the distinct variable names of a template, in first-seen order.
///
/// ```
/// use pipeflow::template::extract_variables;
///
/// assert_eq!(extract_variables("{{b}} {{a}} {{ b }}"), vec!["b", "a"]);
/// ```
pub fn extract_variables(template: &str) -> Vec<String> {
    VARIABLE_PATTERN
        .captures_iter(template)
        .filter_map(|caps| caps.get(1))
        .map(|name| name.as_str())
        .unique()
        .map(str::to_string)
        .collect()
}
