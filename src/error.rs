use thiserror::Error;

/// Error structure representing the basic error scenarios for `pg_deparse`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A node variant the deparser has no renderer for.
    #[error("cannot handle node type ({0})")]
    UnsupportedNode(String),
    /// A `pg_catalog` type with no entry in the alias table.
    #[error("cannot deparse type ({0})")]
    UnknownType(String),
    /// A required subfield is absent or empty.
    #[error("invalid parse tree: {0}")]
    InvalidTree(String),
    /// An enum value outside the covered grammar subset.
    #[error("cannot handle {field} value ({value})")]
    BadEnum { field: &'static str, value: String },
}

/// Convenient Result alias for returning `pg_deparse::Error`.
pub type Result<T> = core::result::Result<T, Error>;
