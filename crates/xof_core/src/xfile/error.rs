//! Error taxonomy for `.x` parsing.
//!
//! Every variant is fatal for the current file; there is no recovery or
//! resynchronization. Batch imports catch at file granularity.

use thiserror::Error;

/// Errors that can occur while lexing or parsing an X file.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected end of file")]
    UnexpectedEof,

    #[error("unexpected token at line {line}: '{found}' (expected {expected})")]
    UnexpectedToken {
        line: usize,
        expected: String,
        found: String,
    },

    #[error("unterminated {what} at line {line}")]
    Unterminated { what: &'static str, line: usize },

    #[error("stray '/' at line {line} (block comments are not supported)")]
    StraySlash { line: usize },

    #[error("invalid number '{value}' at line {line}")]
    InvalidNumber { line: usize, value: String },

    #[error("undefined material '{name}' referenced at line {line}")]
    UndefinedMaterial { line: usize, name: String },

    #[error("unbalanced braces at line {line}")]
    UnbalancedBraces { line: usize },
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;
