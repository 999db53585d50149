//! WHERE / ON predicates
//!
//! The left operand renders as a where-condition. The right operand
//! renders in the context the left operand picks: an attribute passes its
//! column type down so literals are quoted for that column.

use crate::ast::{Node, NodeKind, TableRef};
use crate::context::{ContextKind, RenderContext};
use crate::error::RenderError;
use serde::{Deserialize, Serialize};

/// Comparison operator of a binary predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    Like,
    In,
    NotIn,
}

impl Operator {
    /// SQL operator for this comparison against `operand2`
    pub fn sql_for(&self, operand2: &Node) -> &'static str {
        let operand2 = operand2.unwrap_value();
        match self {
            Self::Equal if operand2.is_null_literal() => "IS",
            Self::Equal => "=",
            Self::NotEqual if operand2.is_null_literal() => "IS NOT",
            Self::NotEqual => "!=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
            Self::Like => "LIKE",
            Self::In => match operand2 {
                Node::Range(_) => "BETWEEN",
                _ => "IN",
            },
            Self::NotIn => match operand2 {
                Node::Range(_) => "NOT BETWEEN",
                _ => "NOT IN",
            },
        }
    }
}

/// A boolean condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    Binary {
        operator: Operator,
        operand1: Node,
        operand2: Node,
    },
    And {
        predicates: Vec<Predicate>,
    },
    Or {
        predicates: Vec<Predicate>,
    },

    /// Caller-supplied condition, emitted through the where passthrough
    Raw {
        sql: Node,
    },
}

impl Predicate {
    pub fn binary(operator: Operator, operand1: impl Into<Node>, operand2: impl Into<Node>) -> Self {
        Self::Binary {
            operator,
            operand1: operand1.into(),
            operand2: operand2.into(),
        }
    }

    pub fn eq(operand1: impl Into<Node>, operand2: impl Into<Node>) -> Self {
        Self::binary(Operator::Equal, operand1, operand2)
    }

    pub fn not_eq(operand1: impl Into<Node>, operand2: impl Into<Node>) -> Self {
        Self::binary(Operator::NotEqual, operand1, operand2)
    }

    pub fn lt(operand1: impl Into<Node>, operand2: impl Into<Node>) -> Self {
        Self::binary(Operator::LessThan, operand1, operand2)
    }

    pub fn gt(operand1: impl Into<Node>, operand2: impl Into<Node>) -> Self {
        Self::binary(Operator::GreaterThan, operand1, operand2)
    }

    pub fn like(operand1: impl Into<Node>, operand2: impl Into<Node>) -> Self {
        Self::binary(Operator::Like, operand1, operand2)
    }

    pub fn is_in(operand1: impl Into<Node>, operand2: impl Into<Node>) -> Self {
        Self::binary(Operator::In, operand1, operand2)
    }

    pub fn and(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Self::And {
            predicates: predicates.into_iter().collect(),
        }
    }

    pub fn or(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Self::Or {
            predicates: predicates.into_iter().collect(),
        }
    }

    /// Condition written as SQL text
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::Raw { sql: Node::sql(sql) }
    }

    /// Render through a where context
    pub fn to_sql(&self, context: &RenderContext<'_>) -> Result<String, RenderError> {
        match context.kind() {
            ContextKind::Where => self.render(context),
            ContextKind::SelectList
            | ContextKind::Order
            | ContextKind::Group
            | ContextKind::WhereCondition
            | ContextKind::AttributeOperand
            | ContextKind::TableReference
            | ContextKind::SelectStatement => Err(context.unsupported(NodeKind::Predicate)),
        }
    }

    fn render(&self, context: &RenderContext<'_>) -> Result<String, RenderError> {
        match self {
            Self::Binary { operator, operand1, operand2 } => {
                let condition = context.nested(ContextKind::WhereCondition);
                let left = operand1.to_sql(&condition)?;

                let right = match operand1 {
                    Node::Attribute(attribute) => operand2.to_sql(&RenderContext::attribute_operand(
                        context.policy(),
                        attribute.column.as_ref(),
                    ))?,
                    Node::Expression(_) => {
                        operand2.to_sql(&RenderContext::attribute_operand(context.policy(), None))?
                    }
                    _ => operand2.to_sql(&condition)?,
                };

                Ok(format!("{} {} {}", left, operator.sql_for(operand2), right))
            }
            Self::And { predicates } => Self::group(predicates, "AND", context),
            Self::Or { predicates } => Self::group(predicates, "OR", context),
            Self::Raw { sql } => sql.to_sql(context),
        }
    }

    fn group(predicates: &[Predicate], keyword: &'static str, context: &RenderContext<'_>) -> Result<String, RenderError> {
        match predicates {
            [] => Err(RenderError::EmptyPredicate {
                group: keyword,
                context: context.kind(),
            }),
            [single] => single.render(context),
            many => {
                let rendered = many
                    .iter()
                    .map(|predicate| predicate.render(context))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(format!("({})", rendered.join(&format!(" {} ", keyword))))
            }
        }
    }

    /// Collect every relation reachable from this predicate, in pre-order
    pub fn collect_relations<'a>(&'a self, out: &mut Vec<&'a TableRef>) {
        match self {
            Self::Binary { operand1, operand2, .. } => {
                operand1.collect_relations(out);
                operand2.collect_relations(out);
            }
            Self::And { predicates } | Self::Or { predicates } => {
                for predicate in predicates {
                    predicate.collect_relations(out);
                }
            }
            Self::Raw { sql } => sql.collect_relations(out),
        }
    }
}
