//! Semantic analysis for `nanoc`: the scope-stack symbol table and the type
//! checker the parser drives directly as it recognizes each production.
//!
//! There is no separate pass over a finished tree — `nanoc-par` calls into
//! [`SemanticAnalyzer`] at every binding site while it parses, which is why
//! this crate has no dependency on `nanoc-par` at all; the dependency runs
//! the other way.

pub mod analyzer;
pub mod scope;
pub mod types;

pub use analyzer::SemanticAnalyzer;
pub use scope::SymbolTable;
pub use types::{DataType, Function, Variable};
