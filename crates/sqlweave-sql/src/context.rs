//! Render contexts
//!
//! A context is the syntactic position a node is rendered in. Each render
//! method below matches exhaustively over [`ContextKind`], so the table of
//! (node kind, context kind) combinations is checked by the compiler and
//! every combination without a rule fails with
//! [`RenderError::UnsupportedContext`].
//!
//! | context          | attribute       | expression    | value       | scalar | array / range | subselect      | table          |
//! |------------------|-----------------|---------------|-------------|--------|---------------|----------------|----------------|
//! | select_list      | qualify + alias | call + alias  | passthrough | -      | -             | `(sql) AS n`   | -              |
//! | where            | -               | -             | passthrough | -      | -             | -              | -              |
//! | order, group     | qualify         | -             | passthrough | -      | -             | -              | -              |
//! | where_condition  | qualify         | call          | recurse     | quote  | -             | `(sql)`        | -              |
//! | attribute_operand| qualify         | call          | recurse     | quote  | list / AND    | `(sql)`        | -              |
//! | table_reference  | -               | -             | -           | -      | -             | `(sql) AS n`   | name [AS n]    |
//! | select_statement | -               | -             | -           | -      | -             | `sql`          | -              |

use crate::ast::{Attribute, Expression, Node, NodeKind, Range, Scalar, Subselect, TableRef, Value};
use crate::error::RenderError;
use crate::identifier::{is_simple_identifier, is_simple_table_name};
use crate::quoting::QuotingPolicy;
use sqlweave_core::{ColumnMeta, Literal};
use std::fmt;

/// Syntactic position a node is rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    /// SELECT list
    SelectList,

    /// Top-level WHERE container
    Where,

    /// ORDER BY
    Order,

    /// GROUP BY
    Group,

    /// Either side of a predicate
    WhereCondition,

    /// Right side of a predicate whose left side is an attribute
    AttributeOperand,

    /// FROM / JOIN position
    TableReference,

    /// A complete statement rather than a derived table
    SelectStatement,
}

impl ContextKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelectList => "select_list",
            Self::Where => "where",
            Self::Order => "order",
            Self::Group => "group",
            Self::WhereCondition => "where_condition",
            Self::AttributeOperand => "attribute_operand",
            Self::TableReference => "table_reference",
            Self::SelectStatement => "select_statement",
        }
    }

    /// Only the select list may alias attributes and expressions
    pub fn allows_alias(&self) -> bool {
        matches!(self, Self::SelectList)
    }
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A context kind bound to the quoting policy of the current pass
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    kind: ContextKind,
    policy: &'a dyn QuotingPolicy,

    /// Quoting hint for scalars on the right of an attribute predicate
    column: Option<&'a ColumnMeta>,
}

impl<'a> RenderContext<'a> {
    pub fn new(kind: ContextKind, policy: &'a dyn QuotingPolicy) -> Self {
        Self {
            kind,
            policy,
            column: None,
        }
    }

    pub fn select_list(policy: &'a dyn QuotingPolicy) -> Self {
        Self::new(ContextKind::SelectList, policy)
    }

    pub fn where_clause(policy: &'a dyn QuotingPolicy) -> Self {
        Self::new(ContextKind::Where, policy)
    }

    pub fn order(policy: &'a dyn QuotingPolicy) -> Self {
        Self::new(ContextKind::Order, policy)
    }

    pub fn group(policy: &'a dyn QuotingPolicy) -> Self {
        Self::new(ContextKind::Group, policy)
    }

    pub fn where_condition(policy: &'a dyn QuotingPolicy) -> Self {
        Self::new(ContextKind::WhereCondition, policy)
    }

    /// Operand context for the right side of a predicate on an attribute
    pub fn attribute_operand(policy: &'a dyn QuotingPolicy, column: Option<&'a ColumnMeta>) -> Self {
        Self {
            kind: ContextKind::AttributeOperand,
            policy,
            column,
        }
    }

    pub fn table_reference(policy: &'a dyn QuotingPolicy) -> Self {
        Self::new(ContextKind::TableReference, policy)
    }

    pub fn select_statement(policy: &'a dyn QuotingPolicy) -> Self {
        Self::new(ContextKind::SelectStatement, policy)
    }

    /// Sibling context sharing this context's policy
    pub fn nested(&self, kind: ContextKind) -> Self {
        Self::new(kind, self.policy)
    }

    pub fn kind(&self) -> ContextKind {
        self.kind
    }

    pub fn policy(&self) -> &'a dyn QuotingPolicy {
        self.policy
    }

    pub fn column(&self) -> Option<&'a ColumnMeta> {
        self.column
    }

    pub(crate) fn unsupported(&self, node: NodeKind) -> RenderError {
        RenderError::UnsupportedContext {
            node,
            context: self.kind,
        }
    }

    fn display_name(&self, relation: &TableRef, node: NodeKind) -> Result<String, RenderError> {
        self.policy
            .resolve_display_name(relation)
            .ok_or_else(|| RenderError::UnresolvedRelation {
                relation: relation.to_string(),
                node,
                context: self.kind,
            })
    }

    fn quote(&self, value: &Literal, column: Option<&ColumnMeta>) -> Result<String, RenderError> {
        self.policy
            .quote_value(value, column)
            .map_err(|source| RenderError::Quoting {
                node: NodeKind::Scalar,
                context: self.kind,
                source,
            })
    }

    fn alias_suffix(&self, alias: Option<&str>) -> String {
        match alias {
            Some(alias) if self.kind.allows_alias() => {
                format!(" AS {}", self.policy.quote_identifier(alias))
            }
            _ => String::new(),
        }
    }

    /// `"relation"."column"`, or the name verbatim when it is a SQL fragment
    fn qualify(&self, attribute: &Attribute) -> Result<String, RenderError> {
        if is_simple_identifier(&attribute.name) {
            let relation = self.display_name(&attribute.relation, NodeKind::Attribute)?;
            Ok(format!(
                "{}.{}",
                self.policy.quote_identifier(&relation),
                self.policy.quote_identifier(&attribute.name)
            ))
        } else {
            tracing::debug!(
                fragment = %attribute.name,
                context = %self.kind,
                "attribute name is not a simple identifier, emitting raw"
            );
            Ok(attribute.name.clone())
        }
    }

    /// Column reference
    pub fn attribute(&self, attribute: &Attribute) -> Result<String, RenderError> {
        match self.kind {
            ContextKind::SelectList => {
                let sql = self.qualify(attribute)?;
                Ok(sql + &self.alias_suffix(attribute.alias.as_deref()))
            }
            ContextKind::Order
            | ContextKind::Group
            | ContextKind::WhereCondition
            | ContextKind::AttributeOperand => self.qualify(attribute),
            ContextKind::Where
            | ContextKind::TableReference
            | ContextKind::SelectStatement => Err(self.unsupported(NodeKind::Attribute)),
        }
    }

    /// Function call, or `DISTINCT operand`
    pub fn expression(&self, expression: &Expression) -> Result<String, RenderError> {
        match self.kind {
            ContextKind::SelectList
            | ContextKind::WhereCondition
            | ContextKind::AttributeOperand => {
                let operand = expression.operand.to_sql(self)?;
                let sql = if expression.is_distinct() {
                    format!("{} {}", expression.function_sql, operand)
                } else {
                    format!("{}({})", expression.function_sql, operand)
                };
                Ok(sql + &self.alias_suffix(expression.alias.as_deref()))
            }
            ContextKind::Where
            | ContextKind::Order
            | ContextKind::Group
            | ContextKind::TableReference
            | ContextKind::SelectStatement => Err(self.unsupported(NodeKind::Expression)),
        }
    }

    /// Passthrough value
    pub fn value(&self, value: &Value) -> Result<String, RenderError> {
        match self.kind {
            ContextKind::SelectList
            | ContextKind::Where
            | ContextKind::Order
            | ContextKind::Group => match value.operand.as_ref() {
                // Already-rendered SQL text
                Node::Scalar(scalar) => Ok(scalar.value.to_string()),
                other => other.to_sql(self),
            },
            ContextKind::WhereCondition
            | ContextKind::AttributeOperand => value.operand.to_sql(self),
            ContextKind::TableReference
            | ContextKind::SelectStatement => Err(self.unsupported(NodeKind::Value)),
        }
    }

    /// Quoted literal
    pub fn scalar(&self, scalar: &Scalar) -> Result<String, RenderError> {
        match self.kind {
            ContextKind::WhereCondition => self.quote(&scalar.value, scalar.column.as_ref()),
            ContextKind::AttributeOperand => {
                let column = self.column.or(scalar.column.as_ref());
                self.quote(&scalar.value, column)
            }
            ContextKind::SelectList
            | ContextKind::Where
            | ContextKind::Order
            | ContextKind::Group
            | ContextKind::TableReference
            | ContextKind::SelectStatement => Err(self.unsupported(NodeKind::Scalar)),
        }
    }

    /// `(a, b, c)`
    pub fn array(&self, items: &[Node]) -> Result<String, RenderError> {
        match self.kind {
            ContextKind::AttributeOperand => {
                let rendered = items
                    .iter()
                    .map(|item| item.to_sql(self))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!("({})", rendered.join(", ")))
            }
            ContextKind::SelectList
            | ContextKind::Where
            | ContextKind::Order
            | ContextKind::Group
            | ContextKind::WhereCondition
            | ContextKind::TableReference
            | ContextKind::SelectStatement => Err(self.unsupported(NodeKind::Array)),
        }
    }

    /// `low AND high`
    pub fn range(&self, range: &Range) -> Result<String, RenderError> {
        match self.kind {
            ContextKind::AttributeOperand => Ok(format!(
                "{} AND {}",
                range.low.to_sql(self)?,
                range.high.to_sql(self)?
            )),
            ContextKind::SelectList
            | ContextKind::Where
            | ContextKind::Order
            | ContextKind::Group
            | ContextKind::WhereCondition
            | ContextKind::TableReference
            | ContextKind::SelectStatement => Err(self.unsupported(NodeKind::Range)),
        }
    }

    /// Derived table, scalar subquery, or the bare statement
    pub fn select(&self, subselect: &Subselect) -> Result<String, RenderError> {
        match self.kind {
            ContextKind::SelectList | ContextKind::TableReference => {
                let name = self.display_name(&subselect.source_table, NodeKind::Subselect)?;
                Ok(format!("({}) AS {}", subselect.sql, self.policy.quote_identifier(&name)))
            }
            ContextKind::WhereCondition
            | ContextKind::AttributeOperand => Ok(format!("({})", subselect.sql)),
            ContextKind::SelectStatement => Ok(subselect.sql.clone()),
            ContextKind::Where
            | ContextKind::Order
            | ContextKind::Group => Err(self.unsupported(NodeKind::Subselect)),
        }
    }

    /// Table in FROM / JOIN position
    pub fn table(&self, table: &TableRef) -> Result<String, RenderError> {
        match self.kind {
            ContextKind::TableReference => {
                let name = self.display_name(table, NodeKind::Table)?;
                let aliased = name != table.name;

                if is_simple_table_name(&table.name) {
                    let mut sql = self.policy.quote_identifier(&table.name);
                    if aliased {
                        sql.push_str(" AS ");
                        sql.push_str(&self.policy.quote_identifier(&name));
                    }
                    Ok(sql)
                } else if aliased {
                    Ok(format!("{} AS {}", table.name, name))
                } else {
                    Ok(table.name.clone())
                }
            }
            ContextKind::SelectList
            | ContextKind::Where
            | ContextKind::Order
            | ContextKind::Group
            | ContextKind::WhereCondition
            | ContextKind::AttributeOperand
            | ContextKind::SelectStatement => Err(self.unsupported(NodeKind::Table)),
        }
    }
}

impl fmt::Debug for RenderContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("kind", &self.kind)
            .field("column", &self.column)
            .finish_non_exhaustive()
    }
}
