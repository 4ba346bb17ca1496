//! Deparser that reconstructs PostgreSQL statements from their parse trees.
//!
//! Given an abstract syntax tree of [`ast::Node`] variants, built by an
//! upstream PostgreSQL grammar parser or deserialized from its output, the
//! deparser emits a statement string that reparses to an equivalent tree.
//! Deparsing is a pure function: no I/O, no state, deterministic output for
//! identical input. Trees are read-only, so distinct threads may deparse the
//! same tree concurrently without synchronization.
//!
//! # Example
//!
//! ```rust
//! use pg_deparse::ast::*;
//! use pg_deparse::deparse;
//!
//! // SELECT "user_id" FROM "users"
//! let stmt = Node::SelectStmt(Box::new(SelectStmt {
//!     target_list: vec![Node::ResTarget(Box::new(ResTarget {
//!         val: Some(Node::ColumnRef(Box::new(ColumnRef {
//!             fields: vec![Node::String(StringValue { sval: "user_id".into() })],
//!             ..Default::default()
//!         }))),
//!         ..Default::default()
//!     }))],
//!     from_clause: vec![Node::RangeVar(Box::new(RangeVar {
//!         relname: "users".into(),
//!         inh: true,
//!         ..Default::default()
//!     }))],
//!     ..Default::default()
//! }));
//!
//! assert_eq!(deparse(&stmt).unwrap(), "SELECT \"user_id\" FROM \"users\"");
//! ```
//!
//! Nodes outside the covered grammar subset fail with
//! [`Error::UnsupportedNode`]; malformed trees fail with
//! [`Error::InvalidTree`]. Partial output is never returned.

pub mod ast;
mod deparse;
mod error;

pub use deparse::{deparse, deparse_value, Value};
pub use error::{Error, Result};
