//! Column metadata used as type hints when quoting values

use serde::{Deserialize, Serialize};

/// Portable logical type system
///
/// Only the distinctions that change how a literal is quoted matter here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LogicalType {
    /// Boolean type
    Bool,

    /// Integer type (any precision)
    Int,

    /// Floating point (any precision)
    Float,

    /// Decimal with precision and scale
    Decimal {
        #[serde(default)]
        precision: Option<u16>,
        #[serde(default)]
        scale: Option<u16>,
    },

    /// String/text type
    String,

    /// Date (no time component)
    Date,

    /// Timestamp (with time component)
    Timestamp,

    /// JSON/Variant type
    Json,

    /// Unknown type (no hint)
    Unknown,
}

impl LogicalType {
    /// Whether values of this type are written as bare numbers
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int | Self::Float | Self::Decimal { .. })
    }

    /// Whether values of this type are written as quoted text
    pub fn is_textual(&self) -> bool {
        matches!(self, Self::String | Self::Json)
    }
}

impl std::fmt::Display for LogicalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool => write!(f, "BOOL"),
            Self::Int => write!(f, "INT"),
            Self::Float => write!(f, "FLOAT"),
            Self::Decimal { precision, scale } => {
                match (precision, scale) {
                    (Some(p), Some(s)) => write!(f, "DECIMAL({}, {})", p, s),
                    (Some(p), None) => write!(f, "DECIMAL({})", p),
                    _ => write!(f, "DECIMAL"),
                }
            }
            Self::String => write!(f, "STRING"),
            Self::Date => write!(f, "DATE"),
            Self::Timestamp => write!(f, "TIMESTAMP"),
            Self::Json => write!(f, "JSON"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Metadata for the column a value is compared against or stored into
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnMeta {
    /// Column name
    pub name: String,

    /// Logical type
    pub logical_type: LogicalType,
}

impl ColumnMeta {
    /// Create column metadata
    pub fn new(name: impl Into<String>, logical_type: LogicalType) -> Self {
        Self {
            name: name.into(),
            logical_type,
        }
    }
}
