//! Shared infrastructure for the `nanoc` front end: source positions,
//! string interning, diagnostic collection, and the compiler's error type.
//!
//! Every other crate in this workspace (`nanoc-lex`, `nanoc-sem`,
//! `nanoc-par`, `nanoc-drv`) depends on this one and nothing else outside
//! the standard library and its own direct dependencies — it sits below
//! the lexer/symbol-table/analyzer/parser split, not beside it.

pub mod diagnostic;
pub mod error;
pub mod index_vec;
pub mod span;
pub mod symbol;

pub use error::{CompilerError, CompilerResult};
pub use span::{FileId, Span, SourceMap};
pub use symbol::Symbol;

pub use rustc_hash::FxHashMap;
pub use rustc_hash::FxHashSet;
