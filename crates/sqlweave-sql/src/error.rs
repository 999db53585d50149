//! Rendering errors

use crate::ast::NodeKind;
use crate::context::ContextKind;
use crate::quoting::QuotingError;
use sqlweave_core::{Diagnostic, DiagnosticCode};

/// Errors that abort a render call
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Cannot render {node} in {context} context")]
    UnsupportedContext {
        node: NodeKind,
        context: ContextKind,
    },

    #[error("No display name for relation '{relation}' while rendering {node} in {context} context")]
    UnresolvedRelation {
        relation: String,
        node: NodeKind,
        context: ContextKind,
    },

    #[error("Failed to quote {node} in {context} context: {source}")]
    Quoting {
        node: NodeKind,
        context: ContextKind,
        #[source]
        source: QuotingError,
    },

    #[error("Empty {group} predicate group in {context} context")]
    EmptyPredicate {
        group: &'static str,
        context: ContextKind,
    },
}

impl RenderError {
    /// Context the failure happened in
    pub fn context(&self) -> ContextKind {
        match self {
            Self::UnsupportedContext { context, .. }
            | Self::UnresolvedRelation { context, .. }
            | Self::Quoting { context, .. }
            | Self::EmptyPredicate { context, .. } => *context,
        }
    }

    /// Node being rendered, if the failure is tied to one
    pub fn node(&self) -> Option<NodeKind> {
        match self {
            Self::UnsupportedContext { node, .. }
            | Self::UnresolvedRelation { node, .. }
            | Self::Quoting { node, .. } => Some(*node),
            Self::EmptyPredicate { .. } => Some(NodeKind::Predicate),
        }
    }

    /// Stable diagnostic code
    pub fn code(&self) -> DiagnosticCode {
        match self {
            Self::UnsupportedContext { .. } => DiagnosticCode::RenderUnsupportedContext,
            Self::UnresolvedRelation { .. } => DiagnosticCode::RenderUnresolvedRelation,
            Self::Quoting { .. } => DiagnosticCode::RenderQuotingFailed,
            Self::EmptyPredicate { .. } => DiagnosticCode::RenderEmptyPredicate,
        }
    }

    /// Convert to a diagnostic carrying node and context kinds
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::error(self.code(), self.to_string())
            .with_context(self.context().as_str());

        match self.node() {
            Some(node) => diagnostic.with_node(node.as_str()),
            None => diagnostic,
        }
    }
}
