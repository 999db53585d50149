//! Integration tests for rendering trees and statements end to end

use pretty_assertions::assert_eq;
use sqlweave_core::{ColumnMeta, Config, DialectConfig, Literal, LogicalType};
use sqlweave_sql::{
    render_top_level, ContextKind, Direction, Environment, Expression, JoinKind, Node, NodeKind,
    Predicate, RenderContext, RenderError, SelectStatement, TableRef,
};

fn config(dialect: DialectConfig) -> Config {
    Config {
        dialect,
        ..Config::default()
    }
}

fn mysql_env(node: &Node) -> Environment {
    Environment::from_config(&config(DialectConfig::MySql)).with_node(node)
}

#[test]
fn attribute_in_select_list_and_order() {
    let users = TableRef::new("users");
    let plain = Node::from(users.attribute("id"));
    let aliased = Node::from(users.attribute("id").with_alias("uid"));
    let env = mysql_env(&plain);

    assert_eq!(plain.to_sql(&RenderContext::select_list(&env)).unwrap(), "`users`.`id`");
    assert_eq!(
        aliased.to_sql(&RenderContext::select_list(&env)).unwrap(),
        "`users`.`id` AS `uid`"
    );
    assert_eq!(aliased.to_sql(&RenderContext::order(&env)).unwrap(), "`users`.`id`");
}

#[test]
fn aliased_table_reference() {
    let node = Node::Table(TableRef::new("orders").with_alias("o"));
    let env = mysql_env(&node);

    assert_eq!(
        node.to_sql(&RenderContext::table_reference(&env)).unwrap(),
        "`orders` AS `o`"
    );
}

#[test]
fn range_operand() {
    let node = Node::range(Node::scalar(10), Node::scalar(20));
    let env = mysql_env(&node);

    assert_eq!(
        node.to_sql(&RenderContext::attribute_operand(&env, None)).unwrap(),
        "10 AND 20"
    );
}

#[test]
fn large_array_operand() {
    let node = Node::array((1..=50).map(|n| Node::scalar(n as i64)));
    let env = mysql_env(&node);

    let sql = node.to_sql(&RenderContext::attribute_operand(&env, None)).unwrap();
    assert!(sql.starts_with("(1, 2, 3"));
    assert!(sql.ends_with("49, 50)"));
    assert_eq!(sql.matches(", ").count(), 49);
}

#[test]
fn string_escaping_per_dialect() {
    let users = TableRef::new("users");
    let predicate = Predicate::eq(users.attribute("bio"), Node::scalar(r"it's a \ path"));

    let mut mysql = Environment::from_config(&config(DialectConfig::MySql));
    mysql.names_mut().christen_predicate(&predicate);
    assert_eq!(
        predicate.to_sql(&RenderContext::where_clause(&mysql)).unwrap(),
        r"`users`.`bio` = 'it''s a \\ path'"
    );

    let mut postgres = Environment::from_config(&config(DialectConfig::Postgres));
    postgres.names_mut().christen_predicate(&predicate);
    assert_eq!(
        predicate.to_sql(&RenderContext::where_clause(&postgres)).unwrap(),
        r#""users"."bio" = 'it''s a \ path'"#
    );
}

#[test]
fn column_type_drives_literal_coercion() {
    let events = TableRef::new("events");
    let attempts = events
        .attribute("attempts")
        .with_column(ColumnMeta::new("attempts", LogicalType::Int));

    let ok = Predicate::eq(attempts.clone(), Node::scalar("3"));
    let bad = Predicate::eq(attempts, Node::scalar("three"));

    let mut env = Environment::from_config(&config(DialectConfig::Snowflake));
    env.names_mut().christen_predicate(&ok);

    assert_eq!(
        ok.to_sql(&RenderContext::where_clause(&env)).unwrap(),
        r#""events"."attempts" = 3"#
    );

    let err = bad.to_sql(&RenderContext::where_clause(&env)).unwrap_err();
    assert!(matches!(err, RenderError::Quoting { node: NodeKind::Scalar, .. }));
}

#[test]
fn null_and_boolean_literals() {
    let users = TableRef::new("users");
    let statement = SelectStatement::new(users.clone())
        .filter(Predicate::eq(users.attribute("deleted_at"), Node::scalar(Literal::Null)))
        .filter(Predicate::eq(users.attribute("active"), Node::scalar(true)));

    let postgres = Environment::from_config(&config(DialectConfig::Postgres)).with_statement(&statement);
    assert_eq!(
        statement.to_sql(&postgres).unwrap(),
        r#"SELECT * FROM "users" WHERE "users"."deleted_at" IS NULL AND "users"."active" = TRUE"#
    );

    let sqlite = Environment::from_config(&config(DialectConfig::Sqlite)).with_statement(&statement);
    assert_eq!(
        statement.to_sql(&sqlite).unwrap(),
        r#"SELECT * FROM "users" WHERE "users"."deleted_at" IS NULL AND "users"."active" = 1"#
    );
}

#[test]
fn join_report_statement() {
    let users = TableRef::new("users");
    let orders = TableRef::new("orders").with_alias("o");

    let statement = SelectStatement::new(users.clone())
        .project(users.attribute("name"))
        .project(Expression::new("SUM", orders.attribute("total")).with_alias("spent"))
        .join(
            JoinKind::Inner,
            orders.clone(),
            vec![Predicate::eq(orders.attribute("user_id"), users.attribute("id"))],
        )
        .filter(Predicate::is_in(
            orders.attribute("status"),
            Node::array([Node::scalar("paid"), Node::scalar("shipped")]),
        ))
        .group(users.attribute("name"))
        .order(users.attribute("name"), Some(Direction::Asc))
        .limit(5);

    let env = Environment::from_config(&config(DialectConfig::BigQuery)).with_statement(&statement);

    assert_eq!(
        statement.to_sql(&env).unwrap(),
        "SELECT `users`.`name`, SUM(`o`.`total`) AS `spent` FROM `users` \
         INNER JOIN `orders` AS `o` ON `o`.`user_id` = `users`.`id` \
         WHERE `o`.`status` IN ('paid', 'shipped') GROUP BY `users`.`name` ORDER BY `users`.`name` ASC LIMIT 5"
    );
}

#[test]
fn subselect_as_filter_and_top_level() {
    let orders = TableRef::new("orders");
    let users = TableRef::new("users");

    let inner = SelectStatement::new(orders.clone())
        .project(orders.attribute("user_id"))
        .filter(Predicate::gt(orders.attribute("total"), Node::scalar(1000)));
    let env = Environment::from_config(&config(DialectConfig::Ansi)).with_statement(&inner);
    let subselect = inner.to_subselect(&env, orders.clone()).unwrap();

    let outer = SelectStatement::new(users.clone())
        .project(users.attribute("email"))
        .filter(Predicate::is_in(users.attribute("id"), subselect.clone()));
    let env = env.with_statement(&outer);

    assert_eq!(
        outer.to_sql(&env).unwrap(),
        r#"SELECT "users"."email" FROM "users" WHERE "users"."id" IN (SELECT "orders"."user_id" FROM "orders" WHERE "orders"."total" > 1000)"#
    );
    assert_eq!(
        render_top_level(&Node::Subselect(subselect), &env).unwrap(),
        r#"SELECT "orders"."user_id" FROM "orders" WHERE "orders"."total" > 1000"#
    );
}

#[test]
fn repeated_relation_instances_are_numbered() {
    let nodes = TableRef::new("nodes");
    let parent = TableRef::new("nodes").with_instance(1);
    let grandparent = TableRef::new("nodes").with_instance(2);

    let statement = SelectStatement::new(nodes.clone())
        .project(grandparent.attribute("label"))
        .join(
            JoinKind::Inner,
            parent.clone(),
            vec![Predicate::eq(nodes.attribute("parent_id"), parent.attribute("id"))],
        )
        .join(
            JoinKind::Inner,
            grandparent.clone(),
            vec![Predicate::eq(parent.attribute("parent_id"), grandparent.attribute("id"))],
        );

    let env = Environment::from_config(&config(DialectConfig::MySql)).with_statement(&statement);

    assert_eq!(
        statement.to_sql(&env).unwrap(),
        "SELECT `nodes_3`.`label` FROM `nodes` \
         INNER JOIN `nodes` AS `nodes_2` ON `nodes`.`parent_id` = `nodes_2`.`id` \
         INNER JOIN `nodes` AS `nodes_3` ON `nodes_2`.`parent_id` = `nodes_3`.`id`"
    );
}

#[test]
fn unsupported_node_reports_both_kinds() {
    let users = TableRef::new("users");
    let statement = SelectStatement::new(users.clone()).project(Node::scalar(1));
    let env = Environment::from_config(&Config::default()).with_statement(&statement);

    let err = statement.to_sql(&env).unwrap_err();
    assert!(matches!(
        err,
        RenderError::UnsupportedContext { node: NodeKind::Scalar, context: ContextKind::SelectList }
    ));

    let diagnostic = err.to_diagnostic();
    assert_eq!(diagnostic.node.as_deref(), Some("scalar"));
    assert_eq!(diagnostic.context.as_deref(), Some("select_list"));
}

#[test]
fn relation_missing_from_environment() {
    let users = TableRef::new("users");
    let statement = SelectStatement::new(users.clone()).project(users.attribute("id"));
    let env = Environment::from_config(&Config::default());

    let err = statement.to_sql(&env).unwrap_err();
    assert!(matches!(err, RenderError::UnresolvedRelation { .. }));
}

#[test]
fn concurrent_renders_share_one_environment() {
    let users = TableRef::new("users");
    let statement = SelectStatement::new(users.clone())
        .project(users.attribute("id"))
        .filter(Predicate::gt(users.attribute("age"), Node::scalar(30)));
    let env = Environment::from_config(&config(DialectConfig::MySql)).with_statement(&statement);
    let expected = statement.to_sql(&env).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| statement.to_sql(&env).unwrap()))
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn statement_from_json() {
    let json = r#"{
        "projections": [
            {"kind": "attribute", "name": "id", "relation": {"name": "users"}, "alias": "uid"}
        ],
        "from": {"kind": "table", "name": "users"},
        "wheres": [
            {
                "kind": "binary",
                "operator": "like",
                "operand1": {"kind": "attribute", "name": "email", "relation": {"name": "users"}},
                "operand2": {"kind": "scalar", "value": {"type": "string", "value": "%@example.com"}}
            }
        ],
        "orders": [
            {"node": {"kind": "attribute", "name": "id", "relation": {"name": "users"}}, "direction": "desc"}
        ],
        "limit": 1
    }"#;

    let statement: SelectStatement = serde_json::from_str(json).unwrap();
    let env = Environment::from_config(&config(DialectConfig::MySql)).with_statement(&statement);

    assert_eq!(
        statement.to_sql(&env).unwrap(),
        "SELECT `users`.`id` AS `uid` FROM `users` WHERE `users`.`email` LIKE '%@example.com' \
         ORDER BY `users`.`id` DESC LIMIT 1"
    );
}
