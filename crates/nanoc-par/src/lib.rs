//! The parser for `nanoc`: recursive descent with a single token of
//! lookahead, driving semantic analysis inline at every binding site and
//! building a parse tree as it goes.
//!
//! There is no separate AST or a pass over a finished parse — declarations,
//! expressions, and statements are type-checked the moment the grammar
//! recognizes them (see [`nanoc_sem::SemanticAnalyzer`]), and the parse tree
//! built alongside that is the only structured output this crate produces.

pub mod parser;
pub mod tree;

pub use parser::parse;
pub use tree::{Node, NodeId, ParseTree};
