//! Display-name assignment for relations
//!
//! Every relation reachable from a query gets a stable display name before
//! rendering starts. The first relation with a given base name keeps it;
//! later distinct relations with the same base name are numbered, so a
//! self-join of `users` renders as `users` and `users_2`.

use crate::ast::{Node, TableRef};
use crate::predicate::Predicate;
use crate::statement::SelectStatement;
use sqlweave_core::NamingOptions;
use std::collections::{HashMap, HashSet};

/// Name resolver (christener) for the relations of a query
#[derive(Debug, Clone)]
pub struct NameResolver {
    /// Display name per relation
    names: HashMap<TableRef, String>,

    /// Relations in the order they were christened
    order: Vec<TableRef>,

    /// Number of relations seen per base name
    used: HashMap<String, usize>,

    /// Display names already handed out
    taken: HashSet<String>,

    separator: String,
}

impl NameResolver {
    /// Create a new name resolver
    pub fn new() -> Self {
        Self::with_options(&NamingOptions::default())
    }

    /// Create a resolver using the configured suffix separator
    pub fn with_options(options: &NamingOptions) -> Self {
        Self {
            names: HashMap::new(),
            order: Vec::new(),
            used: HashMap::new(),
            taken: HashSet::new(),
            separator: options.suffix_separator.clone(),
        }
    }

    /// Assign a display name to a relation, or return the one it already has
    pub fn christen(&mut self, relation: &TableRef) -> &str {
        if !self.names.contains_key(relation) {
            let name = self.next_name(relation.base_name());
            self.taken.insert(name.clone());
            self.names.insert(relation.clone(), name);
            self.order.push(relation.clone());
        }

        &self.names[relation]
    }

    fn next_name(&mut self, base: &str) -> String {
        let count = self.used.entry(base.to_string()).or_insert(0);
        loop {
            *count += 1;
            let candidate = if *count > 1 {
                format!("{}{}{}", base, self.separator, count)
            } else {
                base.to_string()
            };

            // A literal table may already own the suffixed form
            if !self.taken.contains(&candidate) {
                return candidate;
            }
        }
    }

    /// Christen every relation reachable from a node
    pub fn christen_node(&mut self, node: &Node) {
        let mut relations = Vec::new();
        node.collect_relations(&mut relations);
        for relation in relations {
            self.christen(relation);
        }
    }

    /// Christen every relation reachable from a predicate
    pub fn christen_predicate(&mut self, predicate: &Predicate) {
        let mut relations = Vec::new();
        predicate.collect_relations(&mut relations);
        for relation in relations {
            self.christen(relation);
        }
    }

    /// Christen a statement: FROM first, then joins, then the other clauses
    pub fn christen_statement(&mut self, statement: &SelectStatement) {
        let mut relations = Vec::new();
        statement.collect_relations(&mut relations);
        for relation in relations {
            self.christen(relation);
        }
    }

    /// Display name of a christened relation
    pub fn name_for(&self, relation: &TableRef) -> Option<&str> {
        self.names.get(relation).map(String::as_str)
    }

    /// Christened relations with their display names, in christening order
    pub fn relations(&self) -> impl Iterator<Item = (&TableRef, &str)> {
        self.order
            .iter()
            .map(move |relation| (relation, self.names[relation].as_str()))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for NameResolver {
    fn default() -> Self {
        Self::new()
    }
}
