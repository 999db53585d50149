//! Simple-identifier detection
//!
//! These patterns decide between quoting a name and passing it through as
//! a raw SQL fragment. They are the injection boundary of the renderer:
//! anything that does not match is emitted verbatim. Keep them exactly as
//! they are unless the quoting model itself changes.

use regex::Regex;
use std::sync::OnceLock;

/// `^\w*$` with ASCII word characters
fn column_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(?-u:\w)*$").expect("column identifier pattern is valid"))
}

/// `^(\w|-)*$` with ASCII word characters
fn table_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(?:(?-u:\w)|-)*$").expect("table identifier pattern is valid"))
}

/// Whether an attribute name is a plain column identifier
pub fn is_simple_identifier(name: &str) -> bool {
    column_pattern().is_match(name)
}

/// Whether a table name is a plain identifier (hyphens allowed)
pub fn is_simple_table_name(name: &str) -> bool {
    table_pattern().is_match(name)
}
