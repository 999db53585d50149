//! Quoting policy: the boundary between the renderer and the target engine
//!
//! The renderer never builds a quoted identifier or literal itself. It asks
//! a [`QuotingPolicy`], which also answers which display name a relation
//! carries in the current pass.

use crate::ast::TableRef;
use sqlweave_core::{BooleanLiterals, ColumnMeta, Config, DialectConfig, Literal, LogicalType};

/// Identifier quoting, value quoting and relation naming
///
/// Implementations are only read during rendering, so one policy can be
/// shared by any number of concurrent renders.
pub trait QuotingPolicy: Send + Sync {
    /// Wrap a table or column name in the dialect's identifier quotes
    fn quote_identifier(&self, raw: &str) -> String;

    /// Format a literal for inline embedding
    ///
    /// The column hint picks numeric, string or date formatting.
    fn quote_value(&self, value: &Literal, column: Option<&ColumnMeta>) -> Result<String, QuotingError>;

    /// Display name of a relation in the current pass
    fn resolve_display_name(&self, relation: &TableRef) -> Option<String>;
}

/// Errors raised while quoting a literal
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QuotingError {
    #[error("Cannot coerce '{value}' to {target} for column '{column}'")]
    Coercion {
        value: String,
        target: LogicalType,
        column: String,
    },

    #[error("Non-finite float {0} has no SQL representation")]
    NonFinite(f64),

    #[error("Cannot quote a {literal} literal for {target} column '{column}'")]
    Unsupported {
        literal: &'static str,
        target: LogicalType,
        column: String,
    },
}

/// Per-dialect identifier and literal quoting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialectQuoter {
    dialect: DialectConfig,
    boolean_literals: BooleanLiterals,
    backslash_escapes: bool,
}

impl DialectQuoter {
    /// Quoter with the dialect's native defaults
    pub fn new(dialect: DialectConfig) -> Self {
        Self {
            dialect,
            boolean_literals: dialect.boolean_literals(),
            backslash_escapes: dialect.backslash_escapes(),
        }
    }

    /// Quoter honouring the `[quoting]` overrides of a config
    pub fn from_config(config: &Config) -> Self {
        Self {
            dialect: config.dialect,
            boolean_literals: config.boolean_literals(),
            backslash_escapes: config.backslash_escapes(),
        }
    }

    pub fn dialect(&self) -> DialectConfig {
        self.dialect
    }

    /// Quote an identifier, doubling embedded quote characters
    pub fn quote_identifier(&self, raw: &str) -> String {
        let quote = self.dialect.identifier_quote();
        let mut quoted = String::with_capacity(raw.len() + 2);
        quoted.push(quote);
        for c in raw.chars() {
            if c == quote {
                quoted.push(quote);
            }
            quoted.push(c);
        }
        quoted.push(quote);
        quoted
    }

    /// Quote a string literal
    pub fn quote_string(&self, raw: &str) -> String {
        let mut quoted = String::with_capacity(raw.len() + 2);
        quoted.push('\'');
        for c in raw.chars() {
            match c {
                '\'' => quoted.push_str("''"),
                '\\' if self.backslash_escapes => quoted.push_str("\\\\"),
                other => quoted.push(other),
            }
        }
        quoted.push('\'');
        quoted
    }

    fn boolean(&self, value: bool) -> &'static str {
        match (self.boolean_literals, value) {
            (BooleanLiterals::Keyword, true) => "TRUE",
            (BooleanLiterals::Keyword, false) => "FALSE",
            (BooleanLiterals::Numeric, true) => "1",
            (BooleanLiterals::Numeric, false) => "0",
        }
    }

    /// Quote a literal, coercing it to the hinted column type
    pub fn quote_value(&self, value: &Literal, column: Option<&ColumnMeta>) -> Result<String, QuotingError> {
        let target = column.map(|c| &c.logical_type);

        match value {
            Literal::Null => Ok("NULL".to_string()),
            Literal::Bool(b) => match target {
                Some(LogicalType::Int) => Ok(if *b { "1" } else { "0" }.to_string()),
                _ => Ok(self.boolean(*b).to_string()),
            },
            Literal::Int(i) => match target {
                Some(t) if t.is_textual() => Ok(self.quote_string(&i.to_string())),
                _ => Ok(i.to_string()),
            },
            Literal::Float(x) => {
                if !x.is_finite() {
                    return Err(QuotingError::NonFinite(*x));
                }
                match (target, column) {
                    (Some(t), _) if t.is_textual() => Ok(self.quote_string(&x.to_string())),
                    (Some(LogicalType::Int), Some(column)) => coerce_integer(&x.to_string(), column),
                    _ => Ok(x.to_string()),
                }
            }
            Literal::Decimal(text) => match (target, column) {
                (Some(t), _) if t.is_textual() => Ok(self.quote_string(text)),
                (Some(LogicalType::Int), Some(column)) => coerce_integer(text, column),
                _ => {
                    let decimal = LogicalType::Decimal { precision: None, scale: None };
                    coerce_decimal(text, &decimal, column)
                }
            },
            Literal::String(text) => match (target, column) {
                (Some(t), Some(column)) if t.is_numeric() => coerce_numeric(text, column),
                _ => Ok(self.quote_string(text)),
            },
            Literal::Date(_) | Literal::Timestamp(_) => match (target, column) {
                (Some(t), Some(column)) if t.is_numeric() || *t == LogicalType::Bool => {
                    Err(QuotingError::Unsupported {
                        literal: value.type_name(),
                        target: t.clone(),
                        column: column.name.clone(),
                    })
                }
                _ => Ok(self.quote_string(&value.to_string())),
            },
        }
    }
}

/// Coerce string input for a numeric column into a bare number
fn coerce_numeric(text: &str, column: &ColumnMeta) -> Result<String, QuotingError> {
    let trimmed = text.trim();

    match &column.logical_type {
        LogicalType::Int => coerce_integer(trimmed, column).map_err(|_| coercion(text, column)),
        LogicalType::Float => match trimmed.parse::<f64>() {
            Ok(x) if x.is_finite() => Ok(x.to_string()),
            _ => Err(coercion(text, column)),
        },
        decimal => coerce_decimal(trimmed, decimal, Some(column)).map_err(|_| coercion(text, column)),
    }
}

/// Integral decimal text for an int column
///
/// Follows the decimal grammar, so values past the `i64` range pass through.
/// A fraction is only accepted when it is all zeros and is dropped.
fn coerce_integer(text: &str, column: &ColumnMeta) -> Result<String, QuotingError> {
    let (negative, whole, fraction) = decimal_parts(text).ok_or_else(|| coercion(text, column))?;

    if fraction.map_or(false, |f| f.chars().any(|c| c != '0')) {
        return Err(coercion(text, column));
    }

    Ok(if negative { format!("-{}", whole) } else { whole.to_string() })
}

/// Accept `[+-]digits[.digits]` verbatim; anything else would be injected raw
fn coerce_decimal(text: &str, target: &LogicalType, column: Option<&ColumnMeta>) -> Result<String, QuotingError> {
    match decimal_parts(text) {
        Some(_) => Ok(text.to_string()),
        None => Err(QuotingError::Coercion {
            value: text.to_string(),
            target: target.clone(),
            column: column.map(|c| c.name.clone()).unwrap_or_default(),
        }),
    }
}

/// Split `[+-]digits[.digits]` into sign, whole digits and fraction digits
fn decimal_parts(text: &str) -> Option<(bool, &str, Option<&str>)> {
    let negative = text.starts_with('-');
    let unsigned = text.strip_prefix(['-', '+']).unwrap_or(text);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };

    let digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if digits(whole) && fraction.map_or(true, digits) {
        Some((negative, whole, fraction))
    } else {
        None
    }
}

fn coercion(text: &str, column: &ColumnMeta) -> QuotingError {
    QuotingError::Coercion {
        value: text.to_string(),
        target: column.logical_type.clone(),
        column: column.name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn int_column() -> ColumnMeta {
        ColumnMeta::new("age", LogicalType::Int)
    }

    fn string_column() -> ColumnMeta {
        ColumnMeta::new("name", LogicalType::String)
    }

    #[test]
    fn identifier_quotes_per_dialect() {
        assert_eq!(DialectQuoter::new(DialectConfig::MySql).quote_identifier("users"), "`users`");
        assert_eq!(DialectQuoter::new(DialectConfig::BigQuery).quote_identifier("users"), "`users`");
        assert_eq!(DialectQuoter::new(DialectConfig::Postgres).quote_identifier("users"), "\"users\"");
        assert_eq!(DialectQuoter::new(DialectConfig::Ansi).quote_identifier("users"), "\"users\"");
    }

    #[test]
    fn identifier_quote_is_doubled() {
        assert_eq!(DialectQuoter::new(DialectConfig::MySql).quote_identifier("we`ird"), "`we``ird`");
        assert_eq!(DialectQuoter::new(DialectConfig::Postgres).quote_identifier("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn strings_escape_single_quotes() {
        let quoter = DialectQuoter::new(DialectConfig::Postgres);
        assert_eq!(quoter.quote_value(&Literal::from("O'Brien"), None).unwrap(), "'O''Brien'");
        assert_eq!(quoter.quote_value(&Literal::from("a\\b"), None).unwrap(), "'a\\b'");
    }

    #[test]
    fn mysql_escapes_backslashes() {
        let quoter = DialectQuoter::new(DialectConfig::MySql);
        assert_eq!(quoter.quote_value(&Literal::from("a\\b"), None).unwrap(), "'a\\\\b'");
    }

    #[test]
    fn null_and_numbers_are_bare() {
        let quoter = DialectQuoter::new(DialectConfig::Ansi);
        assert_eq!(quoter.quote_value(&Literal::Null, None).unwrap(), "NULL");
        assert_eq!(quoter.quote_value(&Literal::Int(-3), None).unwrap(), "-3");
        assert_eq!(quoter.quote_value(&Literal::Float(2.5), None).unwrap(), "2.5");
        assert_eq!(quoter.quote_value(&Literal::Decimal("10.25".into()), None).unwrap(), "10.25");
    }

    #[test]
    fn booleans_follow_dialect_and_hint() {
        let ansi = DialectQuoter::new(DialectConfig::Ansi);
        let mysql = DialectQuoter::new(DialectConfig::MySql);

        assert_eq!(ansi.quote_value(&Literal::Bool(true), None).unwrap(), "TRUE");
        assert_eq!(mysql.quote_value(&Literal::Bool(true), None).unwrap(), "1");
        assert_eq!(ansi.quote_value(&Literal::Bool(false), Some(&int_column())).unwrap(), "0");
    }

    #[test]
    fn config_overrides_reach_quoter() {
        let config = Config::from_toml(
            "dialect = \"mysql\"\n[quoting]\nboolean_literals = \"keyword\"\nbackslash_escapes = false\n",
        )
        .unwrap();
        let quoter = DialectQuoter::from_config(&config);

        assert_eq!(quoter.quote_value(&Literal::Bool(false), None).unwrap(), "FALSE");
        assert_eq!(quoter.quote_value(&Literal::from("a\\b"), None).unwrap(), "'a\\b'");
    }

    #[test]
    fn strings_coerce_to_numeric_columns() {
        let quoter = DialectQuoter::new(DialectConfig::Ansi);
        let float = ColumnMeta::new("price", LogicalType::Float);
        let decimal = ColumnMeta::new("total", LogicalType::Decimal { precision: Some(10), scale: Some(2) });

        assert_eq!(quoter.quote_value(&Literal::from(" 42 "), Some(&int_column())).unwrap(), "42");
        assert_eq!(quoter.quote_value(&Literal::from("1.5"), Some(&float)).unwrap(), "1.5");
        assert_eq!(quoter.quote_value(&Literal::from("-0.10"), Some(&decimal)).unwrap(), "-0.10");
    }

    #[test]
    fn int_columns_take_integral_decimal_text() {
        let quoter = DialectQuoter::new(DialectConfig::Ansi);

        assert_eq!(quoter.quote_value(&Literal::from("1.0"), Some(&int_column())).unwrap(), "1");
        assert_eq!(quoter.quote_value(&Literal::from("+7"), Some(&int_column())).unwrap(), "7");
        assert_eq!(
            quoter.quote_value(&Literal::from("123456789012345678901234"), Some(&int_column())).unwrap(),
            "123456789012345678901234"
        );
        assert_eq!(quoter.quote_value(&Literal::Decimal("-12.00".into()), Some(&int_column())).unwrap(), "-12");
        assert_eq!(quoter.quote_value(&Literal::Float(3.0), Some(&int_column())).unwrap(), "3");
    }

    #[test]
    fn fractional_values_for_int_columns_are_rejected() {
        let quoter = DialectQuoter::new(DialectConfig::Ansi);

        assert!(matches!(
            quoter.quote_value(&Literal::from("1.5"), Some(&int_column())),
            Err(QuotingError::Coercion { target: LogicalType::Int, .. })
        ));
        assert!(matches!(
            quoter.quote_value(&Literal::Float(2.5), Some(&int_column())),
            Err(QuotingError::Coercion { target: LogicalType::Int, .. })
        ));
        assert!(quoter.quote_value(&Literal::Decimal("0.01".into()), Some(&int_column())).is_err());
    }

    #[test]
    fn unparsable_numeric_string_is_rejected() {
        let quoter = DialectQuoter::new(DialectConfig::Ansi);
        let err = quoter
            .quote_value(&Literal::from("1; DROP TABLE users"), Some(&int_column()))
            .unwrap_err();

        assert_eq!(
            err,
            QuotingError::Coercion {
                value: "1; DROP TABLE users".to_string(),
                target: LogicalType::Int,
                column: "age".to_string(),
            }
        );
    }

    #[test]
    fn malformed_decimal_is_rejected() {
        let quoter = DialectQuoter::new(DialectConfig::Ansi);
        assert!(quoter.quote_value(&Literal::Decimal("1.2.3".into()), None).is_err());
        assert!(quoter.quote_value(&Literal::Decimal("1e5".into()), None).is_err());
        assert!(quoter.quote_value(&Literal::Decimal(".5".into()), None).is_err());
    }

    #[test]
    fn numbers_quote_for_string_columns() {
        let quoter = DialectQuoter::new(DialectConfig::Ansi);
        assert_eq!(quoter.quote_value(&Literal::Int(7), Some(&string_column())).unwrap(), "'7'");
    }

    #[test]
    fn non_finite_floats_fail() {
        let quoter = DialectQuoter::new(DialectConfig::Ansi);
        assert!(matches!(
            quoter.quote_value(&Literal::Float(f64::NAN), None),
            Err(QuotingError::NonFinite(_))
        ));
    }

    #[test]
    fn dates_are_quoted_strings() {
        let quoter = DialectQuoter::new(DialectConfig::Postgres);
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();

        assert_eq!(quoter.quote_value(&Literal::Date(date), None).unwrap(), "'2024-01-31'");
        assert_eq!(
            quoter.quote_value(&Literal::Timestamp(date.and_hms_opt(12, 0, 1).unwrap()), None).unwrap(),
            "'2024-01-31 12:00:01'"
        );
    }

    #[test]
    fn dates_for_numeric_columns_are_unsupported() {
        let quoter = DialectQuoter::new(DialectConfig::Postgres);
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();

        assert!(matches!(
            quoter.quote_value(&Literal::Date(date), Some(&int_column())),
            Err(QuotingError::Unsupported { literal: "date", .. })
        ));
    }
}
