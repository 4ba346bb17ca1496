//! Native Rust AST types for PostgreSQL parse trees.
//!
//! This module provides ergonomic Rust types for the PostgreSQL parse tree
//! structure. Trees are built by an upstream parser (or deserialized from it
//! via serde) and handed to [`crate::deparse`] to reconstruct SQL text.
//!
//! # Example
//!
//! ```rust
//! use pg_deparse::ast::Node;
//!
//! fn tables(stmt: &Node) -> Vec<String> {
//!     let mut out = Vec::new();
//!     if let Node::SelectStmt(select) = stmt {
//!         for table in &select.from_clause {
//!             if let Node::RangeVar(rv) = table {
//!                 out.push(rv.relname.clone());
//!             }
//!         }
//!     }
//!     out
//! }
//! ```

mod nodes;

pub use nodes::*;
