//! Deparsing of parse-tree nodes back to PostgreSQL statements.
//!
//! The deparser is a context-threaded recursive walk over [`Node`]: a single
//! dispatcher matches the variant and hands off to a renderer per node type,
//! all of them appending to one shared output buffer. A [`Context`] value
//! narrows at well-defined call sites to disambiguate how leaves are
//! rendered: the same `StringValue` emits as `"ident"`, `'literal'` or a
//! bare word depending on its syntactic position.

use itertools::Itertools;

use crate::ast::*;
use crate::{Error, Result};

/// Stack headroom the dispatcher keeps while recursing; realistic SQL nests
/// hundreds of expressions deep.
const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_GROW: usize = 1024 * 1024;

/// Rendering mode threaded through the recursion.
///
/// Never inherited transitively: renderers pass `Context::None` to children
/// unless the child sits in a position that requires a specific mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Context {
    /// Default; identifiers double-quoted, string literals single-quoted.
    #[default]
    None,
    /// Inside a projection or RETURNING clause.
    Select,
    /// Inside an UPDATE SET list.
    Update,
    /// The leaf is a constant.
    AConst,
    /// Part of a function name.
    FuncCall,
    /// Part of a type name.
    TypeName,
    /// An operator name.
    Operator,
}

/// The literal value carried by a constant node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Integer(i32),
    Null,
}

/// Deparses a single parse-tree node back to SQL.
///
/// The emitted text reparses to a tree equivalent to the input; only a
/// [`RawStmt`] wrapper carries a trailing `;`.
///
/// # Example
///
/// ```rust
/// use pg_deparse::ast::*;
///
/// let stmt = Node::SelectStmt(Box::new(SelectStmt {
///     target_list: vec![Node::ResTarget(Box::new(ResTarget {
///         val: Some(Node::AConst(Box::new(AConst {
///             val: Some(Node::Integer(Integer { ival: 1 })),
///             ..Default::default()
///         }))),
///         ..Default::default()
///     }))],
///     ..Default::default()
/// }));
/// assert_eq!(pg_deparse::deparse(&stmt).unwrap(), "SELECT 1");
/// ```
pub fn deparse(node: &Node) -> Result<String> {
    let mut buf = String::new();
    deparse_node(&mut buf, node, Context::None)?;
    Ok(buf)
}

/// Extracts the literal value of a constant without emitting SQL.
///
/// # Example
///
/// ```rust
/// use pg_deparse::ast::*;
/// use pg_deparse::{deparse_value, Value};
///
/// let constant = AConst {
///     val: Some(Node::String(StringValue { sval: "on".into() })),
///     ..Default::default()
/// };
/// assert_eq!(deparse_value(&constant).unwrap(), Value::Text("on".into()));
/// ```
pub fn deparse_value(constant: &AConst) -> Result<Value> {
    match &constant.val {
        Some(Node::String(s)) => Ok(Value::Text(s.sval.clone())),
        Some(Node::Integer(i)) => Ok(Value::Integer(i.ival)),
        Some(Node::Null) => Ok(Value::Null),
        Some(other) => Err(Error::UnsupportedNode(node_name(other).into())),
        None => Err(Error::InvalidTree("constant without a value".into())),
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Renders one node into `buf`. The single recursion point; grows the stack
/// ahead of deep trees.
fn deparse_node(buf: &mut String, node: &Node, ctx: Context) -> Result<()> {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_GROW, || match node {
        Node::Integer(v) => {
            buf.push_str(&v.ival.to_string());
            Ok(())
        }
        Node::Float(v) => {
            buf.push_str(&v.fval);
            Ok(())
        }
        Node::String(v) => {
            deparse_string(buf, v, ctx);
            Ok(())
        }
        Node::Null => {
            buf.push_str("NULL");
            Ok(())
        }
        Node::AStar(_) => {
            buf.push('*');
            Ok(())
        }
        Node::AConst(v) => deparse_a_const(buf, v),
        Node::List(_) => Err(Error::UnsupportedNode("List".into())),

        Node::RawStmt(v) => deparse_raw_stmt(buf, v),
        Node::SelectStmt(v) => deparse_select_stmt(buf, v),
        Node::InsertStmt(v) => deparse_insert_stmt(buf, v),
        Node::UpdateStmt(v) => deparse_update_stmt(buf, v),
        Node::DeleteStmt(v) => deparse_delete_stmt(buf, v),
        Node::CreateStmt(v) => deparse_create_stmt(buf, v),
        Node::DropStmt(v) => deparse_drop_stmt(buf, v),
        Node::TransactionStmt(v) => deparse_transaction_stmt(buf, v),
        Node::VariableSetStmt(v) => deparse_variable_set_stmt(buf, v),
        Node::VariableShowStmt(v) => deparse_variable_show_stmt(buf, v),

        Node::AExpr(v) => deparse_a_expr(buf, v, ctx),
        Node::ColumnRef(v) => deparse_column_ref(buf, v),
        Node::TypeCast(v) => deparse_type_cast(buf, v),
        Node::FuncCall(v) => deparse_func_call(buf, v),
        Node::SubLink(v) => deparse_sub_link(buf, v),
        Node::BoolExpr(v) => deparse_bool_expr(buf, v),
        Node::NullTest(v) => deparse_null_test(buf, v),
        Node::CaseExpr(v) => deparse_case_expr(buf, v),
        Node::CaseWhen(v) => deparse_case_when(buf, v),
        Node::SqlValueFunction(v) => deparse_sql_value_function(buf, v),

        Node::ResTarget(v) => deparse_res_target(buf, v, ctx),
        Node::RangeVar(v) => deparse_range_var(buf, v),
        Node::JoinExpr(v) => deparse_join_expr(buf, v, ctx),
        Node::SortBy(v) => deparse_sort_by(buf, v),
        Node::WindowDef(v) => deparse_window_def(buf, v),
        Node::WithClause(v) => deparse_with_clause(buf, v),
        Node::CommonTableExpr(v) => deparse_common_table_expr(buf, v),
        Node::LockingClause(v) => deparse_locking_clause(buf, v),
        Node::TypeName(v) => deparse_type_name(buf, v),
        Node::ColumnDef(v) => deparse_column_def(buf, v),
        Node::Constraint(v) => deparse_constraint(buf, v),
        Node::Alias(v) => deparse_alias(buf, v),
    })
}

/// Renders a node into a fresh string, for fragments that need inspection
/// or joining before they land in the output buffer.
fn deparse_node_string(node: &Node, ctx: Context) -> Result<String> {
    let mut buf = String::new();
    deparse_node(&mut buf, node, ctx)?;
    Ok(buf)
}

/// Space separator between clauses; skipped while the renderer has not
/// written anything past `start` yet.
fn sep(buf: &mut String, start: usize) {
    if buf.len() > start {
        buf.push(' ');
    }
}

fn deparse_comma_list(buf: &mut String, items: &[Node], ctx: Context) -> Result<()> {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            buf.push_str(", ");
        }
        deparse_node(buf, item, ctx)?;
    }
    Ok(())
}

/// Extracts a list of bare names (alias columns, key lists).
fn bare_name_list(items: &[Node], what: &str) -> Result<Vec<String>> {
    items
        .iter()
        .map(|item| match item {
            Node::String(s) => Ok(s.sval.clone()),
            other => Err(Error::InvalidTree(format!(
                "{what} must be plain names, found {}",
                node_name(other)
            ))),
        })
        .collect()
}

fn node_name(node: &Node) -> &'static str {
    match node {
        Node::Integer(_) => "Integer",
        Node::Float(_) => "Float",
        Node::String(_) => "String",
        Node::Null => "Null",
        Node::List(_) => "List",
        Node::RawStmt(_) => "RawStmt",
        Node::SelectStmt(_) => "SelectStmt",
        Node::InsertStmt(_) => "InsertStmt",
        Node::UpdateStmt(_) => "UpdateStmt",
        Node::DeleteStmt(_) => "DeleteStmt",
        Node::CreateStmt(_) => "CreateStmt",
        Node::DropStmt(_) => "DropStmt",
        Node::TransactionStmt(_) => "TransactionStmt",
        Node::VariableSetStmt(_) => "VariableSetStmt",
        Node::VariableShowStmt(_) => "VariableShowStmt",
        Node::AExpr(_) => "A_Expr",
        Node::ColumnRef(_) => "ColumnRef",
        Node::AConst(_) => "A_Const",
        Node::TypeCast(_) => "TypeCast",
        Node::FuncCall(_) => "FuncCall",
        Node::AStar(_) => "A_Star",
        Node::SubLink(_) => "SubLink",
        Node::BoolExpr(_) => "BoolExpr",
        Node::NullTest(_) => "NullTest",
        Node::CaseExpr(_) => "CaseExpr",
        Node::CaseWhen(_) => "CaseWhen",
        Node::SqlValueFunction(_) => "SQLValueFunction",
        Node::ResTarget(_) => "ResTarget",
        Node::RangeVar(_) => "RangeVar",
        Node::JoinExpr(_) => "JoinExpr",
        Node::SortBy(_) => "SortBy",
        Node::WindowDef(_) => "WindowDef",
        Node::WithClause(_) => "WithClause",
        Node::CommonTableExpr(_) => "CommonTableExpr",
        Node::LockingClause(_) => "LockingClause",
        Node::TypeName(_) => "TypeName",
        Node::ColumnDef(_) => "ColumnDef",
        Node::Constraint(_) => "Constraint",
        Node::Alias(_) => "Alias",
    }
}

// ============================================================================
// Leaves
// ============================================================================

fn deparse_string(buf: &mut String, s: &StringValue, ctx: Context) {
    match ctx {
        Context::AConst => {
            buf.push('\'');
            buf.push_str(&s.sval.replace('\'', "''"));
            buf.push('\'');
        }
        Context::FuncCall | Context::TypeName | Context::Operator => buf.push_str(&s.sval),
        _ => push_identifier(buf, &s.sval),
    }
}

fn push_identifier(buf: &mut String, name: &str) {
    buf.push('"');
    buf.push_str(&name.replace('"', "\"\""));
    buf.push('"');
}

fn deparse_a_const(buf: &mut String, constant: &AConst) -> Result<()> {
    match &constant.val {
        Some(val) => deparse_node(buf, val, Context::AConst),
        None => Err(Error::InvalidTree("constant without a value".into())),
    }
}

// ============================================================================
// Type names
// ============================================================================

fn deparse_type_name(buf: &mut String, tn: &TypeName) -> Result<()> {
    if tn.names.is_empty() {
        return Err(Error::InvalidTree("type without a name".into()));
    }
    let names: Vec<String> = tn
        .names
        .iter()
        .map(|n| deparse_node_string(n, Context::TypeName))
        .collect::<Result<_>>()?;

    if names.len() == 2 && names[0] == "pg_catalog" && names[1] == "interval" {
        return deparse_interval_type(buf, tn);
    }

    if tn.setof {
        buf.push_str("SETOF ");
    }

    if names.len() == 2 && names[0] == "pg_catalog" {
        deparse_catalog_type(buf, &names[1], &tn.typmods)?;
    } else {
        buf.push_str(&names.iter().join("."));
    }

    if !tn.array_bounds.is_empty() {
        buf.push_str("[]");
    }
    Ok(())
}

/// The `pg_catalog` alias table: internal names emit as their SQL spellings,
/// with type modifiers where the type takes them.
fn deparse_catalog_type(buf: &mut String, name: &str, typmods: &[Node]) -> Result<()> {
    let with_mods = |buf: &mut String, name: &str, typmods: &[Node]| -> Result<()> {
        buf.push_str(name);
        if !typmods.is_empty() {
            buf.push('(');
            deparse_comma_list(buf, typmods, Context::None)?;
            buf.push(')');
        }
        Ok(())
    };

    match name {
        "bpchar" => with_mods(buf, "char", typmods),
        "varchar" => with_mods(buf, "varchar", typmods),
        "numeric" => with_mods(buf, "numeric", typmods),
        "bool" => with_mods(buf, "boolean", &[]),
        "int2" => with_mods(buf, "smallint", &[]),
        "int4" => with_mods(buf, "int", &[]),
        "int8" => with_mods(buf, "bigint", &[]),
        "real" | "float4" => with_mods(buf, "real", &[]),
        "float8" => with_mods(buf, "double", &[]),
        "time" => with_mods(buf, "time", &[]),
        "timetz" => with_mods(buf, "time with time zone", &[]),
        "timestamp" => with_mods(buf, "timestamp", &[]),
        "timestamptz" => with_mods(buf, "timestamp with time zone", &[]),
        other => Err(Error::UnknownType(format!("pg_catalog.{other}"))),
    }
}

fn deparse_interval_type(buf: &mut String, tn: &TypeName) -> Result<()> {
    // Field masks like HOUR TO SECOND(p) arrive as typmods.
    if !tn.typmods.is_empty() {
        return Err(Error::UnsupportedNode("interval typmods".into()));
    }
    buf.push_str("interval");
    Ok(())
}

fn deparse_type_cast(buf: &mut String, cast: &TypeCast) -> Result<()> {
    let arg = cast
        .arg
        .as_ref()
        .ok_or_else(|| Error::InvalidTree("type cast without an argument".into()))?;
    let type_name = cast
        .type_name
        .as_ref()
        .ok_or_else(|| Error::InvalidTree("type cast without a type".into()))?;

    let mut rendered = String::new();
    deparse_type_name(&mut rendered, type_name)?;

    // Boolean literals reach the parser as 't'/'f' string constants.
    if rendered == "boolean" {
        if let Node::AConst(constant) = arg {
            let truthy =
                matches!(&constant.val, Some(Node::String(s)) if s.sval == "t");
            buf.push_str(if truthy { "true" } else { "false" });
            return Ok(());
        }
    }

    deparse_node(buf, arg, Context::None)?;
    buf.push_str("::");
    buf.push_str(&rendered);
    Ok(())
}

// ============================================================================
// Expressions
// ============================================================================

fn deparse_a_expr(buf: &mut String, expr: &AExpr, ctx: Context) -> Result<()> {
    match expr.kind {
        AExprKind::Op => deparse_a_expr_op(buf, expr, ctx),
        AExprKind::In => deparse_a_expr_in(buf, expr),
        AExprKind::OpAny => deparse_a_expr_any(buf, expr),
        kind => Err(Error::BadEnum { field: "A_Expr kind", value: format!("{kind:?}") }),
    }
}

/// First entry of `name`, rendered bare.
fn operator_name(expr: &AExpr) -> Result<String> {
    let first = expr
        .name
        .first()
        .ok_or_else(|| Error::InvalidTree("expression operator name cannot be empty".into()))?;
    deparse_node_string(first, Context::Operator)
}

fn deparse_a_expr_op(buf: &mut String, expr: &AExpr, ctx: Context) -> Result<()> {
    let lexpr = expr
        .lexpr
        .as_ref()
        .ok_or_else(|| Error::InvalidTree("operator expression without a left operand".into()))?;
    let rexpr = expr
        .rexpr
        .as_ref()
        .ok_or_else(|| Error::InvalidTree("operator expression without a right operand".into()))?;
    let operator = operator_name(expr)?;

    // A list on the left arises from grammar productions that stack extra
    // operands; only the head is the operand itself.
    let lexpr = match lexpr {
        Node::List(items) => items.first().ok_or_else(|| {
            Error::InvalidTree("operand list of an operator expression cannot be empty".into())
        })?,
        node => node,
    };

    let nested = ctx != Context::None;
    if nested {
        buf.push('(');
    }
    deparse_node(buf, lexpr, ctx)?;
    buf.push(' ');
    buf.push_str(&operator);
    buf.push(' ');
    deparse_node(buf, rexpr, ctx)?;
    if nested {
        buf.push(')');
    }
    Ok(())
}

fn deparse_a_expr_in(buf: &mut String, expr: &AExpr) -> Result<()> {
    let rexpr = expr
        .rexpr
        .as_ref()
        .ok_or_else(|| Error::InvalidTree("IN expression without a right operand".into()))?;
    let values = match rexpr {
        Node::List(items) if !items.is_empty() => items,
        Node::List(_) => {
            return Err(Error::InvalidTree("IN expression value list cannot be empty".into()))
        }
        other => {
            return Err(Error::InvalidTree(format!(
                "IN expression operand must be a list, found {}",
                node_name(other)
            )))
        }
    };
    let lexpr = expr
        .lexpr
        .as_ref()
        .ok_or_else(|| Error::InvalidTree("IN expression without a left operand".into()))?;
    let keyword = if operator_name(expr)? == "=" { "IN" } else { "NOT IN" };

    deparse_node(buf, lexpr, Context::None)?;
    buf.push(' ');
    buf.push_str(keyword);
    buf.push_str(" (");
    deparse_comma_list(buf, values, Context::None)?;
    buf.push(')');
    Ok(())
}

fn deparse_a_expr_any(buf: &mut String, expr: &AExpr) -> Result<()> {
    let lexpr = expr
        .lexpr
        .as_ref()
        .ok_or_else(|| Error::InvalidTree("ANY expression without a left operand".into()))?;
    let rexpr = expr
        .rexpr
        .as_ref()
        .ok_or_else(|| Error::InvalidTree("ANY expression without a right operand".into()))?;
    let operator = operator_name(expr)?;

    deparse_node(buf, lexpr, Context::None)?;
    buf.push(' ');
    buf.push_str(&operator);
    buf.push_str(" ANY(");
    deparse_node(buf, rexpr, Context::None)?;
    buf.push(')');
    Ok(())
}

fn deparse_bool_expr(buf: &mut String, expr: &BoolExpr) -> Result<()> {
    let keyword = match expr.boolop {
        BoolExprType::And => " AND ",
        BoolExprType::Or => " OR ",
        BoolExprType::Not => {
            return Err(Error::BadEnum { field: "boolean operator", value: "Not".into() })
        }
    };
    if expr.args.is_empty() {
        return Err(Error::InvalidTree("boolean expression without arguments".into()));
    }
    for (i, arg) in expr.args.iter().enumerate() {
        if i > 0 {
            buf.push_str(keyword);
        }
        // OR binds looser than AND; parenthesize where flattening would
        // change how the reparse groups the arguments.
        let wrap = match (expr.boolop, arg) {
            (BoolExprType::And, Node::BoolExpr(child)) => child.boolop == BoolExprType::Or,
            (BoolExprType::Or, Node::BoolExpr(child)) => {
                matches!(child.boolop, BoolExprType::And | BoolExprType::Or)
            }
            _ => false,
        };
        if wrap {
            buf.push('(');
        }
        deparse_node(buf, arg, Context::None)?;
        if wrap {
            buf.push(')');
        }
    }
    Ok(())
}

fn deparse_null_test(buf: &mut String, test: &NullTest) -> Result<()> {
    let arg = test
        .arg
        .as_ref()
        .ok_or_else(|| Error::InvalidTree("null test without an argument".into()))?;
    deparse_node(buf, arg, Context::None)?;
    buf.push_str(match test.nulltesttype {
        NullTestType::IsNull => " IS NULL",
        NullTestType::IsNotNull => " IS NOT NULL",
    });
    Ok(())
}

fn deparse_case_expr(buf: &mut String, case: &CaseExpr) -> Result<()> {
    if case.args.is_empty() {
        return Err(Error::InvalidTree("CASE expression without WHEN clauses".into()));
    }
    buf.push_str("CASE");
    if let Some(arg) = &case.arg {
        buf.push(' ');
        deparse_node(buf, arg, Context::None)?;
    }
    for when in &case.args {
        buf.push(' ');
        deparse_node(buf, when, Context::None)?;
    }
    if let Some(defresult) = &case.defresult {
        buf.push_str(" ELSE ");
        deparse_node(buf, defresult, Context::None)?;
    }
    buf.push_str(" END");
    Ok(())
}

fn deparse_case_when(buf: &mut String, when: &CaseWhen) -> Result<()> {
    let expr = when
        .expr
        .as_ref()
        .ok_or_else(|| Error::InvalidTree("WHEN clause without a condition".into()))?;
    let result = when
        .result
        .as_ref()
        .ok_or_else(|| Error::InvalidTree("WHEN clause without a result".into()))?;
    buf.push_str("WHEN ");
    deparse_node(buf, expr, Context::None)?;
    buf.push_str(" THEN ");
    deparse_node(buf, result, Context::None)?;
    Ok(())
}

fn deparse_func_call(buf: &mut String, call: &FuncCall) -> Result<()> {
    if call.funcname.is_empty() {
        return Err(Error::InvalidTree("function call without a name".into()));
    }
    // Built-ins are qualified with pg_catalog in the tree; the prefix is
    // implicit in the emitted text.
    let name = call
        .funcname
        .iter()
        .map(|part| deparse_node_string(part, Context::FuncCall))
        .filter_ok(|part| part != "pg_catalog")
        .collect::<Result<Vec<_>>>()?
        .iter()
        .join(".");

    buf.push_str(&name);
    buf.push('(');
    if call.agg_distinct {
        buf.push_str("DISTINCT ");
    }
    deparse_comma_list(buf, &call.args, Context::None)?;
    if call.agg_star {
        if !call.args.is_empty() {
            buf.push_str(", ");
        }
        buf.push('*');
    }
    buf.push(')');

    if let Some(over) = &call.over {
        buf.push_str(" OVER (");
        deparse_window_def(buf, over)?;
        buf.push(')');
    }
    Ok(())
}

fn deparse_window_def(buf: &mut String, window: &WindowDef) -> Result<()> {
    let start = buf.len();
    if !window.partition_clause.is_empty() {
        buf.push_str("PARTITION BY ");
        deparse_comma_list(buf, &window.partition_clause, Context::None)?;
    }
    if !window.order_clause.is_empty() {
        sep(buf, start);
        buf.push_str("ORDER BY ");
        deparse_comma_list(buf, &window.order_clause, Context::None)?;
    }
    Ok(())
}

fn deparse_sub_link(buf: &mut String, link: &SubLink) -> Result<()> {
    match link.sub_link_type {
        SubLinkType::Expr => {
            let subselect = link
                .subselect
                .as_ref()
                .ok_or_else(|| Error::InvalidTree("sublink without a subquery".into()))?;
            buf.push('(');
            deparse_node(buf, subselect, Context::None)?;
            buf.push(')');
            Ok(())
        }
        kind => Err(Error::BadEnum { field: "sublink type", value: format!("{kind:?}") }),
    }
}

fn deparse_sql_value_function(buf: &mut String, func: &SqlValueFunction) -> Result<()> {
    match func.op {
        SqlValueFunctionOp::CurrentTimestamp => {
            buf.push_str("CURRENT_TIMESTAMP");
            Ok(())
        }
        op => Err(Error::UnsupportedNode(format!("SQLValueFunction({op:?})"))),
    }
}

// ============================================================================
// References
// ============================================================================

fn deparse_column_ref(buf: &mut String, column: &ColumnRef) -> Result<()> {
    if column.fields.is_empty() {
        return Err(Error::InvalidTree("column reference without fields".into()));
    }
    for (i, field) in column.fields.iter().enumerate() {
        if i > 0 {
            buf.push('.');
        }
        match field {
            Node::String(s) => push_identifier(buf, &s.sval),
            other => deparse_node(buf, other, Context::None)?,
        }
    }
    Ok(())
}

fn deparse_range_var(buf: &mut String, range_var: &RangeVar) -> Result<()> {
    if range_var.relname.is_empty() {
        return Err(Error::InvalidTree("range var without a relation name".into()));
    }
    if !range_var.inh {
        buf.push_str("ONLY ");
    }
    if !range_var.schemaname.is_empty() {
        push_identifier(buf, &range_var.schemaname);
        buf.push('.');
    }
    push_identifier(buf, &range_var.relname);
    if let Some(alias) = &range_var.alias {
        buf.push(' ');
        deparse_alias(buf, alias)?;
    }
    Ok(())
}

fn deparse_alias(buf: &mut String, alias: &Alias) -> Result<()> {
    if alias.aliasname.is_empty() {
        return Err(Error::InvalidTree("alias without a name".into()));
    }
    buf.push_str(&alias.aliasname);
    if !alias.colnames.is_empty() {
        let colnames = bare_name_list(&alias.colnames, "alias column names")?;
        buf.push_str(" (");
        buf.push_str(&colnames.iter().join(", "));
        buf.push(')');
    }
    Ok(())
}

fn deparse_res_target(buf: &mut String, target: &ResTarget, ctx: Context) -> Result<()> {
    match ctx {
        Context::Select => {
            let val = target
                .val
                .as_ref()
                .ok_or_else(|| Error::InvalidTree("projection target without a value".into()))?;
            deparse_node(buf, val, Context::None)?;
            if !target.name.is_empty() {
                buf.push_str(" AS ");
                buf.push_str(&target.name);
            }
            Ok(())
        }
        Context::Update => {
            if target.name.is_empty() {
                return Err(Error::InvalidTree("update target without a column name".into()));
            }
            let val = target
                .val
                .as_ref()
                .ok_or_else(|| Error::InvalidTree("update target without a value".into()))?;
            buf.push_str(&target.name);
            buf.push_str(" = ");
            deparse_node(buf, val, Context::None)
        }
        // Bare column position, e.g. an INSERT column list.
        _ => {
            if target.name.is_empty() {
                return Err(Error::InvalidTree("result target without a name".into()));
            }
            buf.push_str(&target.name);
            Ok(())
        }
    }
}

fn deparse_join_expr(buf: &mut String, join: &JoinExpr, ctx: Context) -> Result<()> {
    let larg = join
        .larg
        .as_ref()
        .ok_or_else(|| Error::InvalidTree("join without a left side".into()))?;
    let rarg = join
        .rarg
        .as_ref()
        .ok_or_else(|| Error::InvalidTree("join without a right side".into()))?;

    let keyword = match join.jointype {
        JoinType::Inner => {
            if join.is_natural {
                "NATURAL JOIN"
            } else if join.quals.is_none() && join.using_clause.is_empty() {
                "CROSS JOIN"
            } else {
                "INNER JOIN"
            }
        }
        JoinType::Left => "LEFT JOIN",
        JoinType::Right => "RIGHT JOIN",
        JoinType::Full => "FULL JOIN",
        other => {
            return Err(Error::BadEnum { field: "join type", value: format!("{other:?}") })
        }
    };

    deparse_node(buf, larg, ctx)?;
    buf.push(' ');
    buf.push_str(keyword);
    buf.push(' ');
    deparse_node(buf, rarg, ctx)?;

    if !join.using_clause.is_empty() {
        buf.push_str(" USING (");
        deparse_comma_list(buf, &join.using_clause, ctx)?;
        buf.push(')');
    } else if let Some(quals) = &join.quals {
        buf.push_str(" ON ");
        deparse_node(buf, quals, Context::None)?;
    }
    Ok(())
}

// ============================================================================
// Clauses
// ============================================================================

fn deparse_with_clause(buf: &mut String, with: &WithClause) -> Result<()> {
    if with.ctes.is_empty() {
        return Err(Error::InvalidTree(
            "WITH clause without any common table expressions".into(),
        ));
    }
    buf.push_str("WITH ");
    if with.recursive {
        buf.push_str("RECURSIVE ");
    }
    deparse_comma_list(buf, &with.ctes, Context::None)
}

fn deparse_common_table_expr(buf: &mut String, cte: &CommonTableExpr) -> Result<()> {
    if cte.ctename.is_empty() {
        return Err(Error::InvalidTree("common table expression without a name".into()));
    }
    let query = cte
        .ctequery
        .as_ref()
        .ok_or_else(|| Error::InvalidTree("common table expression without a query".into()))?;
    buf.push_str(&cte.ctename);
    if !cte.aliascolnames.is_empty() {
        let colnames = bare_name_list(&cte.aliascolnames, "CTE column names")?;
        buf.push_str(" (");
        buf.push_str(&colnames.iter().join(", "));
        buf.push(')');
    }
    buf.push_str(" AS (");
    deparse_node(buf, query, Context::None)?;
    buf.push(')');
    Ok(())
}

fn deparse_sort_by(buf: &mut String, sort: &SortBy) -> Result<()> {
    let node = sort
        .node
        .as_ref()
        .ok_or_else(|| Error::InvalidTree("sort clause without an expression".into()))?;
    deparse_node(buf, node, Context::None)?;
    match sort.sortby_dir {
        SortByDir::Default => {}
        SortByDir::Asc => buf.push_str(" ASC"),
        SortByDir::Desc => buf.push_str(" DESC"),
        SortByDir::Using => {
            return Err(Error::BadEnum { field: "sort direction", value: "Using".into() })
        }
    }
    match sort.sortby_nulls {
        SortByNulls::Default => {}
        SortByNulls::First => buf.push_str(" NULLS FIRST"),
        SortByNulls::Last => buf.push_str(" NULLS LAST"),
    }
    Ok(())
}

fn deparse_locking_clause(buf: &mut String, lock: &LockingClause) -> Result<()> {
    let keyword = match lock.strength {
        LockClauseStrength::ForKeyShare => "FOR KEY SHARE",
        LockClauseStrength::ForShare => "FOR SHARE",
        LockClauseStrength::ForNoKeyUpdate => "FOR NO KEY UPDATE",
        LockClauseStrength::ForUpdate => "FOR UPDATE",
        LockClauseStrength::None => {
            return Err(Error::BadEnum { field: "lock strength", value: "None".into() })
        }
    };
    buf.push_str(keyword);
    if !lock.locked_rels.is_empty() {
        buf.push_str(" OF ");
        deparse_comma_list(buf, &lock.locked_rels, Context::None)?;
    }
    match lock.wait_policy {
        LockWaitPolicy::Block => {}
        LockWaitPolicy::Skip => buf.push_str(" SKIP LOCKED"),
        LockWaitPolicy::Error => buf.push_str(" NOWAIT"),
    }
    Ok(())
}

// ============================================================================
// Statements
// ============================================================================

fn deparse_raw_stmt(buf: &mut String, stmt: &RawStmt) -> Result<()> {
    deparse_node(buf, &stmt.stmt, Context::None)?;
    buf.push(';');
    Ok(())
}

fn deparse_select_stmt(buf: &mut String, stmt: &SelectStmt) -> Result<()> {
    if let Some(keyword) = set_operation_keyword(stmt.op) {
        let larg = stmt
            .larg
            .as_ref()
            .ok_or_else(|| Error::InvalidTree("set operation without a left query".into()))?;
        let rarg = stmt
            .rarg
            .as_ref()
            .ok_or_else(|| Error::InvalidTree("set operation without a right query".into()))?;
        deparse_select_stmt(buf, larg)?;
        buf.push(' ');
        buf.push_str(keyword);
        if stmt.all {
            buf.push_str(" ALL");
        }
        buf.push(' ');
        return deparse_select_stmt(buf, rarg);
    }

    if stmt.target_list.is_empty() && stmt.values_lists.is_empty() {
        return Err(Error::InvalidTree(
            "SELECT statement without targets or VALUES".into(),
        ));
    }

    let start = buf.len();
    if let Some(with) = &stmt.with_clause {
        deparse_with_clause(buf, with)?;
    }

    if !stmt.target_list.is_empty() {
        sep(buf, start);
        buf.push_str("SELECT ");
        if !stmt.distinct_clause.is_empty() {
            buf.push_str("DISTINCT ");
        }
        deparse_comma_list(buf, &stmt.target_list, Context::Select)?;
    }

    if !stmt.from_clause.is_empty() {
        sep(buf, start);
        buf.push_str("FROM ");
        deparse_comma_list(buf, &stmt.from_clause, Context::Select)?;
    }

    if let Some(where_clause) = &stmt.where_clause {
        sep(buf, start);
        buf.push_str("WHERE ");
        deparse_node(buf, where_clause, Context::None)?;
    }

    if !stmt.values_lists.is_empty() {
        sep(buf, start);
        buf.push_str("VALUES ");
        for (i, row) in stmt.values_lists.iter().enumerate() {
            if i > 0 {
                buf.push_str(", ");
            }
            let values = match row {
                Node::List(items) if !items.is_empty() => items,
                Node::List(_) => {
                    return Err(Error::InvalidTree("VALUES row cannot be empty".into()))
                }
                other => {
                    return Err(Error::InvalidTree(format!(
                        "VALUES row must be a list, found {}",
                        node_name(other)
                    )))
                }
            };
            buf.push('(');
            deparse_comma_list(buf, values, Context::None)?;
            buf.push(')');
        }
    }

    if !stmt.group_clause.is_empty() {
        sep(buf, start);
        buf.push_str("GROUP BY ");
        deparse_comma_list(buf, &stmt.group_clause, Context::None)?;
    }

    if let Some(having) = &stmt.having_clause {
        sep(buf, start);
        buf.push_str("HAVING ");
        deparse_node(buf, having, Context::None)?;
    }

    if !stmt.sort_clause.is_empty() {
        sep(buf, start);
        buf.push_str("ORDER BY ");
        deparse_comma_list(buf, &stmt.sort_clause, Context::None)?;
    }

    if let Some(limit) = &stmt.limit_count {
        sep(buf, start);
        buf.push_str("LIMIT ");
        deparse_node(buf, limit, Context::None)?;
    }

    if let Some(offset) = &stmt.limit_offset {
        sep(buf, start);
        buf.push_str("OFFSET ");
        deparse_node(buf, offset, Context::None)?;
    }

    for lock in &stmt.locking_clause {
        sep(buf, start);
        deparse_node(buf, lock, Context::None)?;
    }
    Ok(())
}

fn set_operation_keyword(op: SetOperation) -> Option<&'static str> {
    match op {
        SetOperation::None => None,
        SetOperation::Union => Some("UNION"),
        SetOperation::Intersect => Some("INTERSECT"),
        SetOperation::Except => Some("EXCEPT"),
    }
}

fn deparse_insert_stmt(buf: &mut String, stmt: &InsertStmt) -> Result<()> {
    let relation = stmt
        .relation
        .as_ref()
        .ok_or_else(|| Error::InvalidTree("INSERT without a target relation".into()))?;

    let start = buf.len();
    if let Some(with) = &stmt.with_clause {
        deparse_with_clause(buf, with)?;
    }
    sep(buf, start);
    buf.push_str("INSERT INTO ");
    deparse_range_var(buf, relation)?;

    if !stmt.cols.is_empty() {
        buf.push_str(" (");
        for (i, col) in stmt.cols.iter().enumerate() {
            if i > 0 {
                buf.push(',');
            }
            deparse_node(buf, col, Context::None)?;
        }
        buf.push(')');
    }

    match &stmt.select_stmt {
        Some(source) => {
            buf.push(' ');
            deparse_node(buf, source, Context::None)?;
        }
        None => buf.push_str(" DEFAULT VALUES"),
    }

    if !stmt.returning_list.is_empty() {
        buf.push_str(" RETURNING ");
        deparse_comma_list(buf, &stmt.returning_list, Context::Select)?;
    }
    Ok(())
}

fn deparse_update_stmt(buf: &mut String, stmt: &UpdateStmt) -> Result<()> {
    let relation = stmt
        .relation
        .as_ref()
        .ok_or_else(|| Error::InvalidTree("UPDATE without a target relation".into()))?;
    if stmt.target_list.is_empty() {
        return Err(Error::InvalidTree("UPDATE without assignments".into()));
    }

    let start = buf.len();
    if let Some(with) = &stmt.with_clause {
        deparse_with_clause(buf, with)?;
    }
    sep(buf, start);
    buf.push_str("UPDATE ");
    deparse_range_var(buf, relation)?;
    buf.push_str(" SET ");
    deparse_comma_list(buf, &stmt.target_list, Context::Update)?;

    if let Some(where_clause) = &stmt.where_clause {
        buf.push_str(" WHERE ");
        deparse_node(buf, where_clause, Context::None)?;
    }
    if !stmt.returning_list.is_empty() {
        buf.push_str(" RETURNING ");
        deparse_comma_list(buf, &stmt.returning_list, Context::Select)?;
    }
    Ok(())
}

fn deparse_delete_stmt(buf: &mut String, stmt: &DeleteStmt) -> Result<()> {
    let relation = stmt
        .relation
        .as_ref()
        .ok_or_else(|| Error::InvalidTree("DELETE without a target relation".into()))?;

    buf.push_str("DELETE FROM ");
    deparse_range_var(buf, relation)?;

    if let Some(where_clause) = &stmt.where_clause {
        buf.push_str(" WHERE ");
        deparse_node(buf, where_clause, Context::None)?;
    }
    if !stmt.returning_list.is_empty() {
        buf.push_str(" RETURNING ");
        deparse_comma_list(buf, &stmt.returning_list, Context::Select)?;
    }
    Ok(())
}

fn deparse_create_stmt(buf: &mut String, stmt: &CreateStmt) -> Result<()> {
    let relation = stmt
        .relation
        .as_ref()
        .ok_or_else(|| Error::InvalidTree("CREATE TABLE without a relation".into()))?;

    buf.push_str("CREATE ");
    match relation.relpersistence.as_str() {
        "" | "p" => {}
        "t" => buf.push_str("TEMPORARY "),
        "u" => buf.push_str("UNLOGGED "),
        other => {
            return Err(Error::BadEnum { field: "relation persistence", value: other.into() })
        }
    }
    buf.push_str("TABLE ");
    if stmt.if_not_exists {
        buf.push_str("IF NOT EXISTS ");
    }
    deparse_range_var(buf, relation)?;

    buf.push_str(" (");
    deparse_comma_list(buf, &stmt.table_elts, Context::None)?;
    buf.push(')');

    if !stmt.inh_relations.is_empty() {
        buf.push_str(" INHERITS (");
        deparse_comma_list(buf, &stmt.inh_relations, Context::None)?;
        buf.push(')');
    }
    if !stmt.tablespacename.is_empty() {
        buf.push_str(" TABLESPACE ");
        push_identifier(buf, &stmt.tablespacename);
    }
    Ok(())
}

fn deparse_column_def(buf: &mut String, def: &ColumnDef) -> Result<()> {
    if def.colname.is_empty() {
        return Err(Error::InvalidTree("column definition without a name".into()));
    }
    let type_name = def
        .type_name
        .as_ref()
        .ok_or_else(|| Error::InvalidTree("column definition without a type".into()))?;

    buf.push_str(&def.colname);
    buf.push(' ');
    deparse_type_name(buf, type_name)?;

    if let Some(default) = &def.raw_default {
        buf.push_str(" USING ");
        deparse_node(buf, default, Context::None)?;
    }
    for constraint in &def.constraints {
        buf.push(' ');
        deparse_node(buf, constraint, Context::None)?;
    }
    Ok(())
}

fn deparse_constraint(buf: &mut String, constraint: &Constraint) -> Result<()> {
    let start = buf.len();
    if !constraint.conname.is_empty() {
        buf.push_str("CONSTRAINT ");
        buf.push_str(&constraint.conname);
    }

    match constraint.contype {
        ConstrType::Null => {
            sep(buf, start);
            buf.push_str("NULL");
        }
        ConstrType::NotNull => {
            sep(buf, start);
            buf.push_str("NOT NULL");
        }
        ConstrType::Default => {
            sep(buf, start);
            buf.push_str("DEFAULT");
        }
        ConstrType::Check => {
            sep(buf, start);
            buf.push_str("CHECK");
        }
        ConstrType::Primary => {
            sep(buf, start);
            buf.push_str("PRIMARY KEY");
        }
        ConstrType::Unique => {
            sep(buf, start);
            buf.push_str("UNIQUE");
        }
        ConstrType::Exclusion => {
            sep(buf, start);
            buf.push_str("EXCLUSION");
        }
        ConstrType::Foreign => {}
        other => {
            return Err(Error::BadEnum { field: "constraint type", value: format!("{other:?}") })
        }
    }

    if let Some(expr) = &constraint.raw_expr {
        sep(buf, start);
        let wrap = matches!(expr, Node::AExpr(e) if e.kind == AExprKind::Op);
        if wrap {
            buf.push('(');
        }
        deparse_node(buf, expr, Context::None)?;
        if wrap {
            buf.push(')');
        }
    }

    if !constraint.keys.is_empty() {
        let keys = bare_name_list(&constraint.keys, "constraint keys")?;
        sep(buf, start);
        buf.push('(');
        buf.push_str(&keys.iter().join(", "));
        buf.push(')');
    }

    if constraint.contype == ConstrType::Foreign {
        if !constraint.fk_attrs.is_empty() {
            let fk_attrs = bare_name_list(&constraint.fk_attrs, "foreign key columns")?;
            sep(buf, start);
            buf.push_str("FOREIGN KEY (");
            buf.push_str(&fk_attrs.iter().join(", "));
            buf.push(')');
        }
        let pktable = constraint.pktable.as_ref().ok_or_else(|| {
            Error::InvalidTree("foreign key constraint without a referenced table".into())
        })?;
        sep(buf, start);
        buf.push_str("REFERENCES ");
        deparse_range_var(buf, pktable)?;
        if !constraint.pk_attrs.is_empty() {
            let pk_attrs = bare_name_list(&constraint.pk_attrs, "referenced columns")?;
            buf.push_str(" (");
            buf.push_str(&pk_attrs.iter().join(", "));
            buf.push(')');
        }
    }

    if !constraint.indexname.is_empty() {
        sep(buf, start);
        buf.push_str("USING INDEX ");
        buf.push_str(&constraint.indexname);
    }
    if constraint.skip_validation {
        sep(buf, start);
        buf.push_str("NOT VALID");
    }
    Ok(())
}

fn deparse_drop_stmt(buf: &mut String, stmt: &DropStmt) -> Result<()> {
    if stmt.objects.is_empty() {
        return Err(Error::InvalidTree("DROP without any objects".into()));
    }

    buf.push_str("DROP ");
    buf.push_str(drop_object_keyword(stmt.remove_type)?);
    if stmt.missing_ok {
        buf.push_str(" IF EXISTS");
    }
    buf.push(' ');
    for (i, object) in stmt.objects.iter().enumerate() {
        if i > 0 {
            buf.push_str(", ");
        }
        // Objects are qualified names wrapped in a List.
        match object {
            Node::List(parts) => {
                for (j, part) in parts.iter().enumerate() {
                    if j > 0 {
                        buf.push('.');
                    }
                    deparse_node(buf, part, Context::None)?;
                }
            }
            node => deparse_node(buf, node, Context::None)?,
        }
    }
    if stmt.behavior == DropBehavior::Cascade {
        buf.push_str(" CASCADE");
    }
    Ok(())
}

fn drop_object_keyword(object_type: ObjectType) -> Result<&'static str> {
    Ok(match object_type {
        ObjectType::Table => "TABLE",
        ObjectType::Index => "INDEX",
        ObjectType::Sequence => "SEQUENCE",
        ObjectType::View => "VIEW",
        ObjectType::MatView => "MATERIALIZED VIEW",
        ObjectType::Schema => "SCHEMA",
        ObjectType::Function => "FUNCTION",
        ObjectType::Aggregate => "AGGREGATE",
        ObjectType::Type => "TYPE",
        ObjectType::Domain => "DOMAIN",
        ObjectType::Trigger => "TRIGGER",
        ObjectType::Rule => "RULE",
        ObjectType::Extension => "EXTENSION",
        ObjectType::AccessMethod => "ACCESS METHOD",
        ObjectType::Cast => "CAST",
        other => {
            return Err(Error::BadEnum { field: "drop object type", value: format!("{other:?}") })
        }
    })
}

fn deparse_transaction_stmt(buf: &mut String, stmt: &TransactionStmt) -> Result<()> {
    buf.push_str(match stmt.kind {
        TransactionStmtKind::Begin | TransactionStmtKind::Start => "BEGIN",
        TransactionStmtKind::Commit => "COMMIT",
        TransactionStmtKind::Rollback => "ROLLBACK",
        TransactionStmtKind::Savepoint => "SAVEPOINT",
        TransactionStmtKind::Release => "RELEASE",
        TransactionStmtKind::RollbackTo => "ROLLBACK TO SAVEPOINT",
        TransactionStmtKind::Prepare => "PREPARE TRANSACTION",
        TransactionStmtKind::CommitPrepared => "COMMIT PREPARED",
        TransactionStmtKind::RollbackPrepared => "ROLLBACK PREPARED",
    });

    if matches!(
        stmt.kind,
        TransactionStmtKind::Prepare
            | TransactionStmtKind::CommitPrepared
            | TransactionStmtKind::RollbackPrepared
    ) {
        if stmt.gid.is_empty() {
            return Err(Error::InvalidTree(
                "prepared transaction without a global identifier".into(),
            ));
        }
        buf.push_str(" '");
        buf.push_str(&stmt.gid.replace('\'', "''"));
        buf.push('\'');
    }
    Ok(())
}

fn deparse_variable_set_stmt(buf: &mut String, stmt: &VariableSetStmt) -> Result<()> {
    if stmt.name.is_empty() {
        return Err(Error::InvalidTree("SET without a variable name".into()));
    }
    if stmt.args.is_empty() {
        return Err(Error::InvalidTree("SET without a value".into()));
    }
    buf.push_str("SET ");
    if stmt.is_local {
        buf.push_str("LOCAL ");
    }
    buf.push_str(&stmt.name);
    buf.push_str(" TO ");
    deparse_comma_list(buf, &stmt.args, Context::AConst)
}

fn deparse_variable_show_stmt(buf: &mut String, stmt: &VariableShowStmt) -> Result<()> {
    if stmt.name.is_empty() {
        return Err(Error::InvalidTree("SHOW without a variable name".into()));
    }
    buf.push_str("SHOW ");
    buf.push_str(&stmt.name);
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn render(node: &Node, ctx: Context) -> String {
        let mut buf = String::new();
        deparse_node(&mut buf, node, ctx).unwrap();
        buf
    }

    /// A string leaf renders as exactly one literal kind per context.
    #[test]
    fn string_leaf_rendering_follows_context() {
        let leaf = Node::String(StringValue { sval: "x".into() });

        assert_eq!(render(&leaf, Context::None), "\"x\"");
        assert_eq!(render(&leaf, Context::Select), "\"x\"");
        assert_eq!(render(&leaf, Context::Update), "\"x\"");
        assert_eq!(render(&leaf, Context::AConst), "'x'");
        assert_eq!(render(&leaf, Context::FuncCall), "x");
        assert_eq!(render(&leaf, Context::TypeName), "x");
        assert_eq!(render(&leaf, Context::Operator), "x");
    }

    #[test]
    fn string_leaf_doubles_embedded_quotes() {
        let single = Node::String(StringValue { sval: "it's".into() });
        assert_eq!(render(&single, Context::AConst), "'it''s'");

        let double = Node::String(StringValue { sval: "a\"b".into() });
        assert_eq!(render(&double, Context::None), "\"a\"\"b\"");
    }

    #[test]
    fn context_is_not_inherited_through_operands() {
        // A string operand of an expression in a non-default context still
        // renders as an identifier, not a bare word.
        let expr = Node::AExpr(Box::new(AExpr {
            kind: AExprKind::Op,
            name: vec![Node::String(StringValue { sval: "=".into() })],
            lexpr: Some(Node::String(StringValue { sval: "a".into() })),
            rexpr: Some(Node::String(StringValue { sval: "b".into() })),
            ..Default::default()
        }));
        assert_eq!(render(&expr, Context::Select), "(\"a\" = \"b\")");
        assert_eq!(render(&expr, Context::None), "\"a\" = \"b\"");
    }

    #[test]
    fn value_extraction_matches_leaf_kind() {
        let text = AConst {
            val: Some(Node::String(StringValue { sval: "on".into() })),
            ..Default::default()
        };
        assert_eq!(deparse_value(&text).unwrap(), Value::Text("on".into()));

        let number =
            AConst { val: Some(Node::Integer(Integer { ival: 42 })), ..Default::default() };
        assert_eq!(deparse_value(&number).unwrap(), Value::Integer(42));

        let null = AConst { val: Some(Node::Null), ..Default::default() };
        assert_eq!(deparse_value(&null).unwrap(), Value::Null);

        let float = AConst {
            val: Some(Node::Float(Float { fval: "1.5".into() })),
            ..Default::default()
        };
        assert_eq!(
            deparse_value(&float).unwrap_err(),
            Error::UnsupportedNode("Float".into())
        );
    }
}
