//! sqlweave core
//!
//! Shared domain types for the SQL renderer: dialect configuration,
//! column metadata used as quoting hints, literal values, and the
//! stable diagnostic codes reported when rendering fails.
//! Never rename diagnostic codes - they are part of the public API.

pub mod diagnostic;
pub mod schema;
pub mod literal;
pub mod config;

pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use schema::{LogicalType, ColumnMeta};
pub use literal::Literal;
pub use config::{Config, ConfigError, DialectConfig, BooleanLiterals, QuotingOptions, NamingOptions};
