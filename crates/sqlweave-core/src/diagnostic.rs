//! Diagnostic codes and error reporting
//!
//! IMPORTANT: Diagnostic codes are versioned and stable.
//! NEVER rename or remove codes - they are part of the public API.
//! Add new codes with new names only.

use serde::{Deserialize, Serialize};

/// Diagnostic code registry (v1)
///
/// These codes are STABLE and VERSIONED.
/// Do NOT rename or remove codes - only add new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    /// A node was rendered in a context that has no rule for it
    RenderUnsupportedContext,

    /// A relation has no display name in the current pass
    RenderUnresolvedRelation,

    /// The quoting policy rejected a literal
    RenderQuotingFailed,

    /// An AND/OR group with no predicates
    RenderEmptyPredicate,

    /// Node or statement document could not be read
    InputInvalid,

    /// A column hint was given for a context that never quotes with it
    ColumnHintIgnored,

    /// Configuration file could not be loaded
    ConfigInvalid,
}

impl DiagnosticCode {
    /// Get the diagnostic code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RenderUnsupportedContext => "RENDER_UNSUPPORTED_CONTEXT",
            Self::RenderUnresolvedRelation => "RENDER_UNRESOLVED_RELATION",
            Self::RenderQuotingFailed => "RENDER_QUOTING_FAILED",
            Self::RenderEmptyPredicate => "RENDER_EMPTY_PREDICATE",
            Self::InputInvalid => "INPUT_INVALID",
            Self::ColumnHintIgnored => "COLUMN_HINT_IGNORED",
            Self::ConfigInvalid => "CONFIG_INVALID",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Warning - output produced but worth reviewing
    Warn,

    /// Error - no SQL was produced
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A diagnostic message with structured metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable diagnostic code
    pub code: DiagnosticCode,

    /// Severity level
    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// Kind of node being rendered, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,

    /// Render context in effect, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic with minimal fields
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            node: None,
            context: None,
        }
    }

    /// Create an error diagnostic
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Error, message)
    }

    /// Create a warning diagnostic
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(code, Severity::Warn, message)
    }

    /// Set the node kind
    pub fn with_node(mut self, node: impl Into<String>) -> Self {
        self.node = Some(node.into());
        self
    }

    /// Set the render context
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Node and context stay structured fields; the message already names them
impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.code, self.message)
    }
}
