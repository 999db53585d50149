//! Configuration schema (sqlweave.toml)

use serde::{Deserialize, Serialize};

/// SQL dialect configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectConfig {
    /// MySQL / MariaDB
    MySql,

    /// BigQuery SQL dialect
    BigQuery,

    /// Snowflake SQL dialect
    Snowflake,

    /// PostgreSQL SQL dialect
    Postgres,

    /// SQLite
    Sqlite,

    /// Generic ANSI SQL
    Ansi,
}

impl Default for DialectConfig {
    fn default() -> Self {
        Self::Ansi
    }
}

impl DialectConfig {
    /// Character used to delimit identifiers
    pub fn identifier_quote(&self) -> char {
        match self {
            Self::MySql | Self::BigQuery => '`',
            Self::Snowflake | Self::Postgres | Self::Sqlite | Self::Ansi => '"',
        }
    }

    /// Boolean literal style native to the dialect
    pub fn boolean_literals(&self) -> BooleanLiterals {
        match self {
            Self::MySql | Self::Sqlite => BooleanLiterals::Numeric,
            Self::BigQuery | Self::Snowflake | Self::Postgres | Self::Ansi => BooleanLiterals::Keyword,
        }
    }

    /// Whether backslash is an escape character inside string literals
    pub fn backslash_escapes(&self) -> bool {
        matches!(self, Self::MySql | Self::BigQuery)
    }
}

impl std::str::FromStr for DialectConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" => Ok(Self::MySql),
            "bigquery" => Ok(Self::BigQuery),
            "snowflake" => Ok(Self::Snowflake),
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "sqlite" => Ok(Self::Sqlite),
            "ansi" => Ok(Self::Ansi),
            other => Err(ConfigError::ParseError(format!("unknown dialect '{}'", other))),
        }
    }
}

/// How boolean literals are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BooleanLiterals {
    /// TRUE / FALSE
    Keyword,

    /// 1 / 0
    Numeric,
}

/// Overrides for the dialect's value quoting defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotingOptions {
    /// Boolean literal style (defaults to the dialect's)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boolean_literals: Option<BooleanLiterals>,

    /// Escape backslashes in strings (defaults to the dialect's)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backslash_escapes: Option<bool>,
}

/// Display-name assignment for relations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingOptions {
    /// Separator between a repeated relation name and its counter
    #[serde(default = "default_suffix_separator")]
    pub suffix_separator: String,
}

fn default_suffix_separator() -> String {
    "_".to_string()
}

impl Default for NamingOptions {
    fn default() -> Self {
        Self {
            suffix_separator: default_suffix_separator(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// SQL dialect
    #[serde(default)]
    pub dialect: DialectConfig,

    /// Value quoting overrides
    #[serde(default)]
    pub quoting: QuotingOptions,

    /// Relation naming
    #[serde(default)]
    pub naming: NamingOptions,
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Effective boolean literal style
    pub fn boolean_literals(&self) -> BooleanLiterals {
        self.quoting
            .boolean_literals
            .unwrap_or_else(|| self.dialect.boolean_literals())
    }

    /// Effective backslash escaping
    pub fn backslash_escapes(&self) -> bool {
        self.quoting
            .backslash_escapes
            .unwrap_or_else(|| self.dialect.backslash_escapes())
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
