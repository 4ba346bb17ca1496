#![allow(unused_macros, dead_code)]

use pg_deparse::ast::*;

// Modified from https://github.com/colin-kiegel/rust-pretty-assertions/issues/24#issuecomment-520613247
// to optionally turn off the pretty printing so you can copy the actual string.
macro_rules! assert_eq {
    ($left:expr, $right:expr) => {
        if let Ok(_diff) = std::env::var("DIFF") {
            pretty_assertions::assert_eq!($left, $right);
        } else {
            std::assert_eq!($left, $right);
        }
    };
}

/// Asserts that a node deparses to the expected SQL string.
macro_rules! assert_deparses {
    ($node:expr, $expected:expr) => {{
        let node = $node;
        let sql = pg_deparse::deparse(&node)
            .unwrap_or_else(|err| panic!("deparse failed: {err}"));
        assert_eq!(sql, $expected);
    }};
}

// ============================================================================
// AST construction helpers
// ============================================================================

pub fn string(s: &str) -> Node {
    Node::String(StringValue { sval: s.into() })
}

pub fn int_const(ival: i32) -> Node {
    Node::AConst(Box::new(AConst {
        val: Some(Node::Integer(Integer { ival })),
        ..Default::default()
    }))
}

pub fn string_const(s: &str) -> Node {
    Node::AConst(Box::new(AConst { val: Some(string(s)), ..Default::default() }))
}

pub fn null_const() -> Node {
    Node::AConst(Box::new(AConst { val: Some(Node::Null), ..Default::default() }))
}

pub fn column_ref(fields: &[&str]) -> Node {
    Node::ColumnRef(Box::new(ColumnRef {
        fields: fields.iter().map(|f| string(f)).collect(),
        ..Default::default()
    }))
}

/// A bare `*` projection.
pub fn star() -> Node {
    Node::ColumnRef(Box::new(ColumnRef {
        fields: vec![Node::AStar(AStar)],
        ..Default::default()
    }))
}

/// Projection entry without an output name.
pub fn target(val: Node) -> Node {
    Node::ResTarget(Box::new(ResTarget { val: Some(val), ..Default::default() }))
}

/// Projection entry with an `AS` name, or an UPDATE SET assignment.
pub fn named_target(name: &str, val: Node) -> Node {
    Node::ResTarget(Box::new(ResTarget {
        name: name.into(),
        val: Some(val),
        ..Default::default()
    }))
}

/// INSERT column-list entry.
pub fn insert_col(name: &str) -> Node {
    Node::ResTarget(Box::new(ResTarget { name: name.into(), ..Default::default() }))
}

pub fn table(name: &str) -> RangeVar {
    RangeVar { relname: name.into(), inh: true, relpersistence: "p".into(), ..Default::default() }
}

pub fn qualified_table(schema: &str, name: &str) -> RangeVar {
    RangeVar { schemaname: schema.into(), ..table(name) }
}

pub fn aliased_table(name: &str, alias: &str) -> RangeVar {
    RangeVar {
        alias: Some(Alias { aliasname: alias.into(), colnames: vec![] }),
        ..table(name)
    }
}

pub fn table_node(name: &str) -> Node {
    Node::RangeVar(Box::new(table(name)))
}

pub fn op_expr(op: &str, lexpr: Node, rexpr: Node) -> Node {
    Node::AExpr(Box::new(AExpr {
        kind: AExprKind::Op,
        name: vec![string(op)],
        lexpr: Some(lexpr),
        rexpr: Some(rexpr),
        ..Default::default()
    }))
}

pub fn bool_expr(boolop: BoolExprType, args: Vec<Node>) -> Node {
    Node::BoolExpr(Box::new(BoolExpr { boolop, args, ..Default::default() }))
}

pub fn select(targets: Vec<Node>) -> SelectStmt {
    SelectStmt { target_list: targets, ..Default::default() }
}

pub fn select_from(targets: Vec<Node>, from: Vec<Node>) -> SelectStmt {
    SelectStmt { target_list: targets, from_clause: from, ..Default::default() }
}

pub fn select_node(stmt: SelectStmt) -> Node {
    Node::SelectStmt(Box::new(stmt))
}

/// Wraps a statement the way the parser hands over top-level statements.
pub fn raw(stmt: Node) -> Node {
    Node::RawStmt(Box::new(RawStmt { stmt, stmt_location: 0, stmt_len: 0 }))
}

/// A `pg_catalog`-qualified type.
pub fn pg_type(name: &str) -> TypeName {
    TypeName { names: vec![string("pg_catalog"), string(name)], ..Default::default() }
}

/// A plain (user-defined or unqualified) type.
pub fn plain_type(name: &str) -> TypeName {
    TypeName { names: vec![string(name)], ..Default::default() }
}

pub fn cast(arg: Node, type_name: TypeName) -> Node {
    Node::TypeCast(Box::new(TypeCast {
        arg: Some(arg),
        type_name: Some(type_name),
        ..Default::default()
    }))
}

/// A VALUES row.
pub fn row(values: Vec<Node>) -> Node {
    Node::List(values)
}

pub fn column_def(name: &str, type_name: TypeName) -> ColumnDef {
    ColumnDef { colname: name.into(), type_name: Some(type_name), ..Default::default() }
}

pub fn constraint(contype: ConstrType) -> Node {
    Node::Constraint(Box::new(Constraint { contype, ..Default::default() }))
}

pub fn func_call(name: &[&str], args: Vec<Node>) -> FuncCall {
    FuncCall {
        funcname: name.iter().map(|n| string(n)).collect(),
        args,
        ..Default::default()
    }
}
