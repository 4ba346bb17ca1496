//! Native Rust AST node types for PostgreSQL parse trees.
//!
//! These types mirror the PostgreSQL parse tree structure for the statement
//! subset the deparser understands, using idiomatic Rust patterns instead of
//! nilable-pointer wrappers: optional subtrees are `Option`, list fields are
//! `Vec`, and optional names follow the empty-string-means-absent convention
//! of the upstream schema.
//!
//! The node schema is the fixed contract with the upstream parser; serde
//! derives make the types directly usable as the interchange format.

use serde::{Deserialize, Serialize};

/// A raw statement wrapper with location information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawStmt {
    /// The statement node
    pub stmt: Node,
    /// Character offset in source where statement starts
    pub stmt_location: i32,
    /// Length of statement in characters (0 means "rest of string")
    pub stmt_len: i32,
}

/// The main AST node enum containing all possible node types.
///
/// This is a closed set: the deparser matches it exhaustively, so adding a
/// variant forces every consumer to address it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Node {
    // Primitive value types
    Integer(Integer),
    Float(Float),
    String(StringValue),
    Null,

    // List type
    List(Vec<Node>),

    // Statement types
    RawStmt(Box<RawStmt>),
    SelectStmt(Box<SelectStmt>),
    InsertStmt(Box<InsertStmt>),
    UpdateStmt(Box<UpdateStmt>),
    DeleteStmt(Box<DeleteStmt>),
    CreateStmt(Box<CreateStmt>),
    DropStmt(Box<DropStmt>),
    TransactionStmt(Box<TransactionStmt>),
    VariableSetStmt(Box<VariableSetStmt>),
    VariableShowStmt(Box<VariableShowStmt>),

    // Expression types
    AExpr(Box<AExpr>),
    ColumnRef(Box<ColumnRef>),
    AConst(Box<AConst>),
    TypeCast(Box<TypeCast>),
    FuncCall(Box<FuncCall>),
    AStar(AStar),
    SubLink(Box<SubLink>),
    BoolExpr(Box<BoolExpr>),
    NullTest(Box<NullTest>),
    CaseExpr(Box<CaseExpr>),
    CaseWhen(Box<CaseWhen>),
    SqlValueFunction(Box<SqlValueFunction>),

    // Target/Result types
    ResTarget(Box<ResTarget>),

    // Table/Range types
    RangeVar(Box<RangeVar>),
    JoinExpr(Box<JoinExpr>),

    // Clause types
    SortBy(Box<SortBy>),
    WindowDef(Box<WindowDef>),
    WithClause(Box<WithClause>),
    CommonTableExpr(Box<CommonTableExpr>),
    LockingClause(Box<LockingClause>),

    // Type-related
    TypeName(Box<TypeName>),
    ColumnDef(Box<ColumnDef>),
    Constraint(Box<Constraint>),

    // Alias
    Alias(Box<Alias>),
}

// ============================================================================
// Primitive value types
// ============================================================================

/// Integer value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Integer {
    pub ival: i32,
}

/// Float value (stored as string)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Float {
    pub fval: String,
}

/// String value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StringValue {
    pub sval: String,
}

/// A star (*) in column reference
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AStar;

/// A constant value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AConst {
    pub val: Option<Node>,
    pub location: i32,
}

// ============================================================================
// Core statement types
// ============================================================================

/// SELECT statement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectStmt {
    pub distinct_clause: Vec<Node>,
    pub target_list: Vec<Node>,
    pub from_clause: Vec<Node>,
    pub where_clause: Option<Node>,
    pub group_clause: Vec<Node>,
    pub having_clause: Option<Node>,
    pub values_lists: Vec<Node>,
    pub sort_clause: Vec<Node>,
    pub limit_offset: Option<Node>,
    pub limit_count: Option<Node>,
    pub locking_clause: Vec<Node>,
    pub with_clause: Option<WithClause>,
    pub op: SetOperation,
    pub all: bool,
    pub larg: Option<Box<SelectStmt>>,
    pub rarg: Option<Box<SelectStmt>>,
}

/// INSERT statement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InsertStmt {
    pub relation: Option<RangeVar>,
    pub cols: Vec<Node>,
    pub select_stmt: Option<Node>,
    pub returning_list: Vec<Node>,
    pub with_clause: Option<WithClause>,
}

/// UPDATE statement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateStmt {
    pub relation: Option<RangeVar>,
    pub target_list: Vec<Node>,
    pub where_clause: Option<Node>,
    pub returning_list: Vec<Node>,
    pub with_clause: Option<WithClause>,
}

/// DELETE statement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteStmt {
    pub relation: Option<RangeVar>,
    pub where_clause: Option<Node>,
    pub returning_list: Vec<Node>,
}

// ============================================================================
// DDL statement types
// ============================================================================

/// CREATE TABLE statement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateStmt {
    pub relation: Option<RangeVar>,
    pub table_elts: Vec<Node>,
    pub inh_relations: Vec<Node>,
    pub tablespacename: String,
    pub if_not_exists: bool,
}

/// DROP statement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DropStmt {
    pub objects: Vec<Node>,
    pub remove_type: ObjectType,
    pub behavior: DropBehavior,
    pub missing_ok: bool,
}

// ============================================================================
// Transaction statement
// ============================================================================

/// Transaction statement (BEGIN, COMMIT, ROLLBACK, etc.)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionStmt {
    pub kind: TransactionStmtKind,
    /// Parsed but never emitted; savepoint names live here upstream.
    pub options: Vec<Node>,
    pub gid: String,
}

// ============================================================================
// Administrative statements
// ============================================================================

/// SET variable statement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VariableSetStmt {
    pub name: String,
    pub args: Vec<Node>,
    pub is_local: bool,
}

/// SHOW variable statement
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VariableShowStmt {
    pub name: String,
}

// ============================================================================
// Expression types
// ============================================================================

/// An expression with an operator (e.g., "a + b", "x = 1")
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AExpr {
    pub kind: AExprKind,
    pub name: Vec<Node>,
    pub lexpr: Option<Node>,
    pub rexpr: Option<Node>,
    pub location: i32,
}

/// Column reference (e.g., "table.column")
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnRef {
    pub fields: Vec<Node>,
    pub location: i32,
}

/// Type cast expression
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeCast {
    pub arg: Option<Node>,
    pub type_name: Option<TypeName>,
    pub location: i32,
}

/// Function call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FuncCall {
    pub funcname: Vec<Node>,
    pub args: Vec<Node>,
    pub over: Option<WindowDef>,
    pub agg_star: bool,
    pub agg_distinct: bool,
    pub location: i32,
}

/// Subquery link (subquery in expression context)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SubLink {
    pub sub_link_type: SubLinkType,
    pub subselect: Option<Node>,
    pub location: i32,
}

/// Boolean expression (AND, OR, NOT)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BoolExpr {
    pub boolop: BoolExprType,
    pub args: Vec<Node>,
    pub location: i32,
}

/// NULL test expression
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NullTest {
    pub arg: Option<Node>,
    pub nulltesttype: NullTestType,
    pub location: i32,
}

/// CASE expression
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseExpr {
    pub arg: Option<Node>,
    pub args: Vec<Node>,
    pub defresult: Option<Node>,
    pub location: i32,
}

/// WHEN clause of CASE
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseWhen {
    pub expr: Option<Node>,
    pub result: Option<Node>,
    pub location: i32,
}

/// Single-valued SQL value function (CURRENT_TIMESTAMP and friends)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SqlValueFunction {
    pub op: SqlValueFunctionOp,
    pub location: i32,
}

// ============================================================================
// Target/Result types
// ============================================================================

/// Result target (column in SELECT list or assignment target)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResTarget {
    pub name: String,
    pub val: Option<Node>,
    pub location: i32,
}

// ============================================================================
// Table/Range types
// ============================================================================

/// Table/relation reference
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeVar {
    pub schemaname: String,
    pub relname: String,
    pub inh: bool,
    /// 'p' permanent, 't' temporary, 'u' unlogged
    pub relpersistence: String,
    pub alias: Option<Alias>,
    pub location: i32,
}

/// JOIN expression
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinExpr {
    pub jointype: JoinType,
    pub is_natural: bool,
    pub larg: Option<Node>,
    pub rarg: Option<Node>,
    pub using_clause: Vec<Node>,
    pub quals: Option<Node>,
}

// ============================================================================
// Clause types
// ============================================================================

/// ORDER BY clause element
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SortBy {
    pub node: Option<Node>,
    pub sortby_dir: SortByDir,
    pub sortby_nulls: SortByNulls,
    pub location: i32,
}

/// WINDOW definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowDef {
    pub name: String,
    pub partition_clause: Vec<Node>,
    pub order_clause: Vec<Node>,
    pub location: i32,
}

/// WITH clause
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WithClause {
    pub ctes: Vec<Node>,
    pub recursive: bool,
    pub location: i32,
}

/// Common Table Expression (CTE)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommonTableExpr {
    pub ctename: String,
    pub aliascolnames: Vec<Node>,
    pub ctequery: Option<Node>,
    pub location: i32,
}

/// FOR UPDATE/SHARE clause
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LockingClause {
    pub locked_rels: Vec<Node>,
    pub strength: LockClauseStrength,
    pub wait_policy: LockWaitPolicy,
}

// ============================================================================
// Type-related
// ============================================================================

/// Type name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeName {
    pub names: Vec<Node>,
    pub setof: bool,
    pub typmods: Vec<Node>,
    pub array_bounds: Vec<Node>,
    pub location: i32,
}

/// Column definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnDef {
    pub colname: String,
    pub type_name: Option<TypeName>,
    pub raw_default: Option<Node>,
    pub constraints: Vec<Node>,
    pub location: i32,
}

/// Constraint definition
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraint {
    pub contype: ConstrType,
    pub conname: String,
    pub raw_expr: Option<Node>,
    pub keys: Vec<Node>,
    pub fk_attrs: Vec<Node>,
    pub pktable: Option<RangeVar>,
    pub pk_attrs: Vec<Node>,
    pub indexname: String,
    pub skip_validation: bool,
    pub location: i32,
}

// ============================================================================
// Alias
// ============================================================================

/// Alias
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Alias {
    pub aliasname: String,
    pub colnames: Vec<Node>,
}

// ============================================================================
// Enums
// ============================================================================

/// SET operation type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SetOperation {
    #[default]
    None,
    Union,
    Intersect,
    Except,
}

/// A_Expr kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AExprKind {
    #[default]
    Op,
    OpAny,
    OpAll,
    Distinct,
    NotDistinct,
    NullIf,
    In,
    Like,
    ILike,
    Similar,
    Between,
    NotBetween,
    BetweenSym,
    NotBetweenSym,
}

/// Boolean expression type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BoolExprType {
    #[default]
    And,
    Or,
    Not,
}

/// Sublink type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SubLinkType {
    #[default]
    Exists,
    All,
    Any,
    RowCompare,
    Expr,
    MultiExpr,
    Array,
    Cte,
}

/// NULL test type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NullTestType {
    #[default]
    IsNull,
    IsNotNull,
}

/// JOIN type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Full,
    Right,
    Semi,
    Anti,
    RightAnti,
    UniqueOuter,
    UniqueInner,
}

/// SORT BY direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortByDir {
    #[default]
    Default,
    Asc,
    Desc,
    Using,
}

/// SORT BY nulls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortByNulls {
    #[default]
    Default,
    First,
    Last,
}

/// Object type for DDL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObjectType {
    #[default]
    Table,
    Index,
    Sequence,
    View,
    MatView,
    Type,
    Schema,
    Function,
    Procedure,
    Routine,
    Aggregate,
    Operator,
    Language,
    Cast,
    Trigger,
    EventTrigger,
    Rule,
    Database,
    Tablespace,
    Role,
    Extension,
    Fdw,
    ForeignServer,
    ForeignTable,
    Policy,
    Publication,
    Subscription,
    Collation,
    Conversion,
    Default,
    Domain,
    Constraint,
    Column,
    AccessMethod,
    LargeObject,
    Transform,
    StatisticsObject,
}

/// DROP behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DropBehavior {
    #[default]
    Restrict,
    Cascade,
}

/// Transaction statement kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TransactionStmtKind {
    #[default]
    Begin,
    Start,
    Commit,
    Rollback,
    Savepoint,
    Release,
    RollbackTo,
    Prepare,
    CommitPrepared,
    RollbackPrepared,
}

/// Constraint type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConstrType {
    #[default]
    Null,
    NotNull,
    Default,
    Identity,
    Generated,
    Check,
    Primary,
    Unique,
    Exclusion,
    Foreign,
    AttrDeferrable,
    AttrNotDeferrable,
    AttrDeferred,
    AttrImmediate,
}

/// Lock clause strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LockClauseStrength {
    #[default]
    None,
    ForKeyShare,
    ForShare,
    ForNoKeyUpdate,
    ForUpdate,
}

/// Lock wait policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LockWaitPolicy {
    #[default]
    Block,
    Skip,
    Error,
}

/// SQL value function operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SqlValueFunctionOp {
    #[default]
    CurrentDate,
    CurrentTime,
    CurrentTimeN,
    CurrentTimestamp,
    CurrentTimestampN,
    Localtime,
    LocaltimeN,
    Localtimestamp,
    LocaltimestampN,
    CurrentRole,
    CurrentUser,
    User,
    SessionUser,
    CurrentCatalog,
    CurrentSchema,
}
