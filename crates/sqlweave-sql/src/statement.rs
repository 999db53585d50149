//! SELECT statement assembly
//!
//! Each clause renders its nodes through the matching context. A rendered
//! statement can be wrapped as a [`Subselect`] and nested in another one.

use crate::ast::{Node, Subselect, TableRef};
use crate::context::RenderContext;
use crate::error::RenderError;
use crate::predicate::Predicate;
use crate::quoting::QuotingPolicy;
use serde::{Deserialize, Serialize};

/// Join flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
    Inner,
    LeftOuter,
}

impl JoinKind {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::LeftOuter => "LEFT OUTER JOIN",
        }
    }
}

/// A joined relation with its ON conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub kind: JoinKind,

    /// Table or subselect
    pub relation: Node,

    #[serde(default)]
    pub on: Vec<Predicate>,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

/// ORDER BY entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ordering {
    pub node: Node,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

/// A SELECT statement built from already-constructed nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectStatement {
    #[serde(default)]
    pub projections: Vec<Node>,

    /// Table or subselect
    pub from: Node,

    #[serde(default)]
    pub joins: Vec<Join>,

    #[serde(default)]
    pub wheres: Vec<Predicate>,

    #[serde(default)]
    pub groups: Vec<Node>,

    #[serde(default)]
    pub orders: Vec<Ordering>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

impl SelectStatement {
    pub fn new(from: impl Into<Node>) -> Self {
        Self {
            projections: Vec::new(),
            from: from.into(),
            joins: Vec::new(),
            wheres: Vec::new(),
            groups: Vec::new(),
            orders: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    pub fn project(mut self, node: impl Into<Node>) -> Self {
        self.projections.push(node.into());
        self
    }

    pub fn join(mut self, kind: JoinKind, relation: impl Into<Node>, on: Vec<Predicate>) -> Self {
        self.joins.push(Join {
            kind,
            relation: relation.into(),
            on,
        });
        self
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.wheres.push(predicate);
        self
    }

    pub fn group(mut self, node: impl Into<Node>) -> Self {
        self.groups.push(node.into());
        self
    }

    pub fn order(mut self, node: impl Into<Node>, direction: Option<Direction>) -> Self {
        self.orders.push(Ordering {
            node: node.into(),
            direction,
        });
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Render the statement
    pub fn to_sql(&self, policy: &dyn QuotingPolicy) -> Result<String, RenderError> {
        let select = RenderContext::select_list(policy);
        let table = RenderContext::table_reference(policy);
        let condition = RenderContext::where_clause(policy);

        let mut clauses = Vec::new();

        let projections = if self.projections.is_empty() {
            "*".to_string()
        } else {
            render_all(&self.projections, &select)?.join(", ")
        };
        clauses.push(format!("SELECT {}", projections));
        clauses.push(format!("FROM {}", self.from.to_sql(&table)?));

        for join in &self.joins {
            let mut sql = format!("{} {}", join.kind.as_sql(), join.relation.to_sql(&table)?);
            if !join.on.is_empty() {
                sql.push_str(" ON ");
                sql.push_str(&render_predicates(&join.on, &condition)?);
            }
            clauses.push(sql);
        }

        if !self.wheres.is_empty() {
            clauses.push(format!("WHERE {}", render_predicates(&self.wheres, &condition)?));
        }

        if !self.groups.is_empty() {
            let groups = render_all(&self.groups, &RenderContext::group(policy))?;
            clauses.push(format!("GROUP BY {}", groups.join(", ")));
        }

        if !self.orders.is_empty() {
            let order = RenderContext::order(policy);
            let orders = self
                .orders
                .iter()
                .map(|ordering| {
                    let sql = ordering.node.to_sql(&order)?;
                    Ok(match ordering.direction {
                        Some(Direction::Asc) => format!("{} ASC", sql),
                        Some(Direction::Desc) => format!("{} DESC", sql),
                        None => sql,
                    })
                })
                .collect::<Result<Vec<_>, RenderError>>()?;
            clauses.push(format!("ORDER BY {}", orders.join(", ")));
        }

        if let Some(limit) = self.limit {
            clauses.push(format!("LIMIT {}", limit));
        }
        if let Some(offset) = self.offset {
            clauses.push(format!("OFFSET {}", offset));
        }

        tracing::debug!(clauses = clauses.len(), "rendered select statement");
        Ok(clauses.join(" "))
    }

    /// Render the statement and wrap it as a subselect standing for `source_table`
    pub fn to_subselect(&self, policy: &dyn QuotingPolicy, source_table: TableRef) -> Result<Subselect, RenderError> {
        Ok(Subselect::new(self.to_sql(policy)?, source_table))
    }

    /// Collect every relation reachable from the statement
    ///
    /// FROM comes first, then joins, so base tables keep their plain names.
    pub fn collect_relations<'a>(&'a self, out: &mut Vec<&'a TableRef>) {
        self.from.collect_relations(out);
        for join in &self.joins {
            join.relation.collect_relations(out);
            for predicate in &join.on {
                predicate.collect_relations(out);
            }
        }
        for node in &self.projections {
            node.collect_relations(out);
        }
        for predicate in &self.wheres {
            predicate.collect_relations(out);
        }
        for node in &self.groups {
            node.collect_relations(out);
        }
        for ordering in &self.orders {
            ordering.node.collect_relations(out);
        }
    }
}

fn render_all(nodes: &[Node], context: &RenderContext<'_>) -> Result<Vec<String>, RenderError> {
    nodes.iter().map(|node| node.to_sql(context)).collect()
}

fn render_predicates(predicates: &[Predicate], context: &RenderContext<'_>) -> Result<String, RenderError> {
    let rendered = predicates
        .iter()
        .map(|predicate| predicate.to_sql(context))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rendered.join(" AND "))
}
