//! Document loading, path queries and field resolution.

mod document;
mod path;
mod resolve;
mod scalar;

pub use document::{parse_document, read_document, source_filename};
pub use path::{find_all, find_first, FieldPath};
pub use resolve::{resolve, resolve_decimal, resolve_duration, resolve_opt, resolve_text};
pub use scalar::{duration_to_hours, normalize_duration, parse_decimal, try_parse_decimal};
