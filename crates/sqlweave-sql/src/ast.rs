//! Expression tree nodes
//!
//! Nodes are plain owned data built by a query builder and never mutated
//! while rendering. The same tree may be rendered from several threads.

use serde::{Deserialize, Serialize};
use sqlweave_core::{ColumnMeta, Literal};
use std::fmt;

/// A relation (table) as it appears in a query
///
/// Two references are the same relation when name, alias and instance
/// all match. `instance` separates repeated unaliased uses of one table,
/// as in a self-join.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableRef {
    /// Literal table name
    pub name: String,

    /// Explicit alias requested by the builder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Occurrence counter for repeated uses of the same table
    #[serde(default, skip_serializing_if = "is_zero")]
    pub instance: u32,
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

impl TableRef {
    /// Create a reference to a table
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            instance: 0,
        }
    }

    /// Set the explicit alias
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Set the occurrence counter
    pub fn with_instance(mut self, instance: u32) -> Self {
        self.instance = instance;
        self
    }

    /// Name the relation is displayed as before de-duplication
    pub fn base_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Reference an attribute of this relation
    pub fn attribute(&self, name: impl Into<String>) -> Attribute {
        Attribute::new(self.clone(), name)
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(alias) = &self.alias {
            write!(f, " AS {}", alias)?;
        }
        if self.instance > 0 {
            write!(f, "#{}", self.instance)?;
        }
        Ok(())
    }
}

/// A column reference tied to the relation it was declared against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Column name, or a raw SQL fragment when not a simple identifier
    pub name: String,

    /// Relation the attribute was declared against
    pub relation: TableRef,

    /// Output alias, honoured only in a select list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Column type, used as the quoting hint for compared values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<ColumnMeta>,
}

impl Attribute {
    pub fn new(relation: TableRef, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            relation,
            alias: None,
            column: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_column(mut self, column: ColumnMeta) -> Self {
        self.column = Some(column);
        self
    }
}

/// A function call or modifier keyword applied to one operand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    /// Function name or keyword, e.g. `COUNT` or `DISTINCT`
    pub function_sql: String,

    pub operand: Box<Node>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl Expression {
    pub fn new(function_sql: impl Into<String>, operand: impl Into<Node>) -> Self {
        Self {
            function_sql: function_sql.into(),
            operand: Box::new(operand.into()),
            alias: None,
        }
    }

    /// `DISTINCT <operand>`
    pub fn distinct(operand: impl Into<Node>) -> Self {
        Self::new(DISTINCT, operand)
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// DISTINCT is a modifier keyword, not a call
    pub fn is_distinct(&self) -> bool {
        self.function_sql == DISTINCT
    }
}

const DISTINCT: &str = "DISTINCT";

/// A literal value with an optional target-column hint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scalar {
    pub value: Literal,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<ColumnMeta>,
}

impl Scalar {
    pub fn new(value: impl Into<Literal>) -> Self {
        Self {
            value: value.into(),
            column: None,
        }
    }

    pub fn with_column(mut self, column: ColumnMeta) -> Self {
        self.column = Some(column);
        self
    }
}

/// Wrapper whose operand is emitted verbatim in passthrough positions
/// and compiled as an operand in predicate positions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Value {
    pub operand: Box<Node>,
}

impl Value {
    pub fn new(operand: impl Into<Node>) -> Self {
        Self {
            operand: Box::new(operand.into()),
        }
    }
}

/// `low AND high`, the right side of BETWEEN
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub low: Box<Node>,
    pub high: Box<Node>,
}

impl Range {
    pub fn new(low: impl Into<Node>, high: impl Into<Node>) -> Self {
        Self {
            low: Box::new(low.into()),
            high: Box::new(high.into()),
        }
    }
}

/// A fully rendered inner SELECT and the relation it stands for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subselect {
    pub sql: String,
    pub source_table: TableRef,
}

impl Subselect {
    pub fn new(sql: impl Into<String>, source_table: TableRef) -> Self {
        Self {
            sql: sql.into(),
            source_table,
        }
    }
}

/// A node of the expression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Attribute(Attribute),
    Expression(Expression),
    Scalar(Scalar),
    Value(Value),
    Array { items: Vec<Node> },
    Range(Range),
    Table(TableRef),
    Subselect(Subselect),
}

impl Node {
    /// Literal scalar without a column hint
    pub fn scalar(value: impl Into<Literal>) -> Self {
        Self::Scalar(Scalar::new(value))
    }

    /// Already-rendered SQL text, emitted verbatim in passthrough positions
    pub fn sql(text: impl Into<String>) -> Self {
        Self::Value(Value::new(Self::scalar(Literal::String(text.into()))))
    }

    pub fn array(items: impl IntoIterator<Item = Node>) -> Self {
        Self::Array {
            items: items.into_iter().collect(),
        }
    }

    pub fn range(low: impl Into<Node>, high: impl Into<Node>) -> Self {
        Self::Range(Range::new(low, high))
    }

    /// Variant tag used in dispatch errors and logs
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Attribute(_) => NodeKind::Attribute,
            Self::Expression(_) => NodeKind::Expression,
            Self::Scalar(_) => NodeKind::Scalar,
            Self::Value(_) => NodeKind::Value,
            Self::Array { .. } => NodeKind::Array,
            Self::Range(_) => NodeKind::Range,
            Self::Table(_) => NodeKind::Table,
            Self::Subselect(_) => NodeKind::Subselect,
        }
    }

    /// Strip any `Value` wrappers
    pub fn unwrap_value(&self) -> &Node {
        match self {
            Self::Value(value) => value.operand.unwrap_value(),
            other => other,
        }
    }

    /// Whether this is a NULL literal, possibly wrapped in a `Value`
    pub fn is_null_literal(&self) -> bool {
        matches!(self.unwrap_value(), Self::Scalar(scalar) if scalar.value.is_null())
    }

    /// Collect every relation reachable from this node, in pre-order
    pub fn collect_relations<'a>(&'a self, out: &mut Vec<&'a TableRef>) {
        match self {
            Self::Attribute(attribute) => out.push(&attribute.relation),
            Self::Expression(expression) => expression.operand.collect_relations(out),
            Self::Scalar(_) => {}
            Self::Value(value) => value.operand.collect_relations(out),
            Self::Array { items } => {
                for item in items {
                    item.collect_relations(out);
                }
            }
            Self::Range(range) => {
                range.low.collect_relations(out);
                range.high.collect_relations(out);
            }
            Self::Table(table) => out.push(table),
            Self::Subselect(subselect) => out.push(&subselect.source_table),
        }
    }
}

impl From<Attribute> for Node {
    fn from(value: Attribute) -> Self {
        Self::Attribute(value)
    }
}

impl From<Expression> for Node {
    fn from(value: Expression) -> Self {
        Self::Expression(value)
    }
}

impl From<Scalar> for Node {
    fn from(value: Scalar) -> Self {
        Self::Scalar(value)
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Range> for Node {
    fn from(value: Range) -> Self {
        Self::Range(value)
    }
}

impl From<TableRef> for Node {
    fn from(value: TableRef) -> Self {
        Self::Table(value)
    }
}

impl From<Subselect> for Node {
    fn from(value: Subselect) -> Self {
        Self::Subselect(value)
    }
}

impl From<Literal> for Node {
    fn from(value: Literal) -> Self {
        Self::scalar(value)
    }
}

/// Node variant tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Attribute,
    Expression,
    Scalar,
    Value,
    Array,
    Range,
    Table,
    Subselect,
    Predicate,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attribute => "attribute",
            Self::Expression => "expression",
            Self::Scalar => "scalar",
            Self::Value => "value",
            Self::Array => "array",
            Self::Range => "range",
            Self::Table => "table",
            Self::Subselect => "subselect",
            Self::Predicate => "predicate",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
