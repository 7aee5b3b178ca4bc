//! Diagnostic collection.
//!
//! The lexer and parser don't stop at the first error — §7's recovery
//! policy has them resynchronize and keep going so a single run can report
//! more than one mistake. [`Handler`] is where those diagnostics pile up;
//! the driver drains it at the end of a phase and prints each one in the
//! wire format from [`crate::error::CompilerError`].

use crate::error::CompilerError;

/// Diagnostic severity. Only `Error` is ever produced by the phases this
/// workspace implements — `Warning` exists so the type isn't a lie if a
/// future pass (e.g. unused-variable detection) wants to use the same
/// collection mechanism without a breaking change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Level {
    Error,
    Warning,
}

/// A collection point for diagnostics raised during one phase of
/// compilation (lexing, parsing, or analysis).
///
/// # Examples
///
/// ```
/// use nanoc_util::diagnostic::Handler;
/// use nanoc_util::error::CompilerError;
///
/// let mut handler = Handler::new();
/// assert!(!handler.has_errors());
/// handler.report(CompilerError::lexical("bad token", 1, 1));
/// assert!(handler.has_errors());
/// assert_eq!(handler.errors().len(), 1);
/// ```
#[derive(Default)]
pub struct Handler {
    errors: Vec<CompilerError>,
}

impl Handler {
    pub fn new() -> Self {
        Handler { errors: Vec::new() }
    }

    pub fn report(&mut self, error: CompilerError) {
        self.errors.push(error);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn errors(&self) -> &[CompilerError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<CompilerError> {
        self.errors
    }

    /// The first reported error, the one a single-shot `compile` mode run
    /// reports before giving up.
    pub fn first(&self) -> Option<&CompilerError> {
        self.errors.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_errors_in_order() {
        let mut handler = Handler::new();
        handler.report(CompilerError::lexical("a", 1, 1));
        handler.report(CompilerError::syntactic("b", 2, 3));
        assert_eq!(handler.errors().len(), 2);
        assert_eq!(handler.first().unwrap().kind(), "lexical");
    }
}
