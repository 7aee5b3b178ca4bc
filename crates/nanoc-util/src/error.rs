//! The compiler's single error type.
//!
//! Every phase — lexer, parser, semantic analyzer — reports failures as a
//! [`CompilerError`]. The three variants correspond to the three error kinds
//! a single-file compilation can produce; there is no fourth "internal
//! compiler error" kind because none of the phases here can panic on well
//! formed input without it being a bug in this crate, not the compiled
//! program.

use thiserror::Error;

/// A single diagnosable failure, tagged with the phase that raised it and
/// located at a 1-based `(line, column)` pair.
///
/// `Display` renders the exact wire format driver consumers depend on:
/// `Error en línea {line}, columna {column}: {message}`.
#[derive(Debug, Clone, Error)]
pub enum CompilerError {
    /// Raised by the lexer: an unrecognized character, an unterminated
    /// string/char literal, or a malformed numeric literal.
    #[error("{}", format_error(.line, .column, .message))]
    Lexical {
        message: String,
        line: u32,
        column: u32,
    },

    /// Raised by the parser: a token sequence that matches no production at
    /// the current point in the grammar.
    #[error("{}", format_error(.line, .column, .message))]
    Syntactic {
        message: String,
        line: u32,
        column: u32,
    },

    /// Raised by the semantic analyzer: a type mismatch, an undeclared or
    /// uninitialized identifier, an arity mismatch, a missing `main`, or
    /// any other rule in §4.3.
    #[error("{}", format_error(.line, .column, .message))]
    Semantic {
        message: String,
        line: u32,
        column: u32,
    },
}

fn format_error(line: &u32, column: &u32, message: &str) -> String {
    format!("Error en línea {line}, columna {column}: {message}")
}

impl CompilerError {
    pub fn lexical(message: impl Into<String>, line: u32, column: u32) -> Self {
        CompilerError::Lexical {
            message: message.into(),
            line,
            column,
        }
    }

    pub fn syntactic(message: impl Into<String>, line: u32, column: u32) -> Self {
        CompilerError::Syntactic {
            message: message.into(),
            line,
            column,
        }
    }

    pub fn semantic(message: impl Into<String>, line: u32, column: u32) -> Self {
        CompilerError::Semantic {
            message: message.into(),
            line,
            column,
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            CompilerError::Lexical { line, .. }
            | CompilerError::Syntactic { line, .. }
            | CompilerError::Semantic { line, .. } => *line,
        }
    }

    pub fn column(&self) -> u32 {
        match self {
            CompilerError::Lexical { column, .. }
            | CompilerError::Syntactic { column, .. }
            | CompilerError::Semantic { column, .. } => *column,
        }
    }

    /// The short kind name, used by the driver's `--verbose` tracing.
    pub fn kind(&self) -> &'static str {
        match self {
            CompilerError::Lexical { .. } => "lexical",
            CompilerError::Syntactic { .. } => "syntactic",
            CompilerError::Semantic { .. } => "semantic",
        }
    }
}

/// Convenience alias used across every compiler phase.
pub type CompilerResult<T> = std::result::Result<T, CompilerError>;
