//! Prioritized-path field resolution.
//!
//! The same logical quantity can sit in different places depending on which
//! upstream feature filled it in. Each field is described by an ordered list
//! of candidate paths; the first candidate that yields a usable value wins.

use roxmltree::Node;

use super::path::FieldPath;
use super::scalar::{normalize_duration, try_parse_decimal};

/// Resolve a field from ordered candidate paths.
///
/// A candidate is skipped when its first match is missing, blank, or
/// rejected by `coerce`; `default` is returned when every candidate is
/// skipped.
pub fn resolve<T, F>(node: Node<'_, '_>, candidates: &[&str], coerce: F, default: T) -> T
where
    F: Fn(&str) -> Option<T>,
{
    resolve_opt(node, candidates, coerce).unwrap_or(default)
}

/// Like [`resolve`], but reports absence instead of substituting a default.
pub fn resolve_opt<T, F>(node: Node<'_, '_>, candidates: &[&str], coerce: F) -> Option<T>
where
    F: Fn(&str) -> Option<T>,
{
    candidates
        .iter()
        .map(|expr| FieldPath::parse(expr))
        .find_map(|path| path.value(node).and_then(&coerce))
}

/// Resolve a text field, empty when absent.
pub fn resolve_text(node: Node<'_, '_>, candidates: &[&str]) -> String {
    resolve(node, candidates, |s| Some(s.to_string()), String::new())
}

/// Resolve a decimal field, zero when absent or unparsable.
pub fn resolve_decimal(node: Node<'_, '_>, candidates: &[&str]) -> f64 {
    resolve(node, candidates, try_parse_decimal, 0.0)
}

/// Resolve a duration field as normalized `HH:MM:SS`.
pub fn resolve_duration(node: Node<'_, '_>, candidates: &[&str]) -> String {
    normalize_duration(resolve_opt(node, candidates, |s| Some(s.to_string())).as_deref())
}
