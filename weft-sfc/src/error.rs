//! Error types for the template compiler

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("Tokenize error: {0}")]
    Tokenize(String),

    /// A pre-parsed child list contained an array where a node was expected.
    #[error("Nested content: {0}")]
    NestedContent(String),

    #[error("Invalid node input: {0}")]
    InvalidInput(String),

    /// A structural invariant of the pipeline did not hold.
    #[error("Internal compiler error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, CompileError>;
