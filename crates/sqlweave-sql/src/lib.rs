//! SQL rendering for expression trees
//!
//! This crate handles:
//! - Expression tree nodes (attributes, functions, literals, subselects)
//! - Context-sensitive rendering for each syntactic position
//! - Dialect identifier and value quoting
//! - Display names for relations, including self-joins
//! - Predicates and full SELECT statement assembly

pub mod ast;
pub mod identifier;
pub mod quoting;
pub mod resolver;
pub mod environment;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod predicate;
pub mod statement;

pub use identifier::{is_simple_identifier, is_simple_table_name};
pub use ast::{Attribute, Expression, Node, NodeKind, Range, Scalar, Subselect, TableRef, Value};
pub use quoting::{DialectQuoter, QuotingError, QuotingPolicy};
pub use resolver::NameResolver;
pub use environment::Environment;
pub use context::{ContextKind, RenderContext};
pub use dispatch::render_top_level;
pub use error::RenderError;
pub use predicate::{Operator, Predicate};
pub use statement::{Direction, Join, JoinKind, Ordering, SelectStatement};
