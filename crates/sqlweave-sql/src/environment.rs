//! Default quoting policy: a dialect quoter plus a christened name resolver

use crate::ast::{Node, TableRef};
use crate::quoting::{DialectQuoter, QuotingError, QuotingPolicy};
use crate::resolver::NameResolver;
use crate::statement::SelectStatement;
use sqlweave_core::{ColumnMeta, Config, Literal};

/// Everything a render pass needs from the outside world
#[derive(Debug, Clone)]
pub struct Environment {
    quoter: DialectQuoter,
    names: NameResolver,
}

impl Environment {
    pub fn new(quoter: DialectQuoter, names: NameResolver) -> Self {
        Self { quoter, names }
    }

    /// Environment for a config, with no relations christened yet
    pub fn from_config(config: &Config) -> Self {
        Self {
            quoter: DialectQuoter::from_config(config),
            names: NameResolver::with_options(&config.naming),
        }
    }

    /// Christen the relations of a node
    pub fn with_node(mut self, node: &Node) -> Self {
        self.names.christen_node(node);
        self
    }

    /// Christen the relations of a statement
    pub fn with_statement(mut self, statement: &SelectStatement) -> Self {
        self.names.christen_statement(statement);
        self
    }

    pub fn quoter(&self) -> &DialectQuoter {
        &self.quoter
    }

    pub fn names(&self) -> &NameResolver {
        &self.names
    }

    pub fn names_mut(&mut self) -> &mut NameResolver {
        &mut self.names
    }
}

impl QuotingPolicy for Environment {
    fn quote_identifier(&self, raw: &str) -> String {
        self.quoter.quote_identifier(raw)
    }

    fn quote_value(&self, value: &Literal, column: Option<&ColumnMeta>) -> Result<String, QuotingError> {
        self.quoter.quote_value(value, column)
    }

    fn resolve_display_name(&self, relation: &TableRef) -> Option<String> {
        self.names.name_for(relation).map(str::to_string)
    }
}
