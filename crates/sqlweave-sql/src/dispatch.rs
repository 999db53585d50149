//! Node-to-context dispatch
//!
//! Compiling a node in a context invokes the context method for the
//! node's variant. Nested nodes (expression operands, array items, range
//! endpoints, value operands) are compiled by those methods through this
//! same entry point.

use crate::ast::Node;
use crate::context::RenderContext;
use crate::error::RenderError;
use crate::quoting::QuotingPolicy;

impl Node {
    /// Render this node in the given context
    pub fn to_sql(&self, context: &RenderContext<'_>) -> Result<String, RenderError> {
        tracing::trace!(node = %self.kind(), context = %context.kind(), "rendering node");

        match self {
            Node::Attribute(attribute) => context.attribute(attribute),
            Node::Expression(expression) => context.expression(expression),
            Node::Scalar(scalar) => context.scalar(scalar),
            Node::Value(value) => context.value(value),
            Node::Array { items } => context.array(items),
            Node::Range(range) => context.range(range),
            Node::Table(table) => context.table(table),
            Node::Subselect(subselect) => context.select(subselect),
        }
    }
}

/// Render a node where a complete statement is required
///
/// A subselect yields its inner SQL without parentheses or alias.
pub fn render_top_level(node: &Node, policy: &dyn QuotingPolicy) -> Result<String, RenderError> {
    node.to_sql(&RenderContext::select_statement(policy))
}
