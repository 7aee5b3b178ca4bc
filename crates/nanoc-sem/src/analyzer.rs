//! The semantic analyzer: every type-checking and scoping rule the parser
//! calls into as it recognizes each grammar rule.
//!
//! One `SemanticAnalyzer` is created per compilation and driven entirely by
//! the parser — there is no separate "semantic pass" over a finished tree.
//! Each method here corresponds to exactly one operation from the
//! analyzer's original specification, kept under the same name so the
//! correspondence stays obvious.

use nanoc_lex::TokenKind;
use nanoc_util::error::{CompilerError, CompilerResult};
use nanoc_util::Symbol;

use crate::scope::SymbolTable;
use crate::types::{DataType, Function, Variable};

/// Which compatibility rule `check_types` should enforce. Assignments and
/// `return` allow `Int -> Float` widening; function-call arguments and I/O
/// operands require an exact match. This mirrors the "strict" vs "general"
/// typing contexts distinguished in the original design: a context, not a
/// property of the types themselves.
#[derive(Clone, Copy, PartialEq, Eq)]
enum TypingContext {
    General,
    Strict,
}

pub struct SemanticAnalyzer {
    symbols: SymbolTable,
    current_return_type: Option<DataType>,
    has_return: bool,
    typing_context: TypingContext,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        SemanticAnalyzer {
            symbols: SymbolTable::new(),
            current_return_type: None,
            has_return: false,
            typing_context: TypingContext::General,
        }
    }

    /// Resets per-function transient state after an error forces the
    /// parser to resynchronize. The scope stack itself is left untouched —
    /// losing track of which identifiers are in scope would cascade
    /// unrelated "no declarada" errors through the rest of the program.
    pub fn synchronize(&mut self) {
        self.current_return_type = None;
        self.has_return = false;
        self.typing_context = TypingContext::General;
    }

    // ---- type checking -------------------------------------------------

    /// Verifies `found` is compatible with `expected`, raising a type
    /// mismatch otherwise. Implicit `Int -> Float` widening is permitted
    /// only in a general (assignment/return) context.
    pub fn check_types(
        &self,
        expected: DataType,
        found: DataType,
        line: u32,
        column: u32,
    ) -> CompilerResult<()> {
        if expected == found {
            return Ok(());
        }
        if self.typing_context == TypingContext::General
            && expected == DataType::Float
            && found == DataType::Int
        {
            return Ok(());
        }
        Err(CompilerError::semantic(
            format!("Tipo incompatible: se esperaba {expected} pero se encontró {found}"),
            line,
            column,
        ))
    }

    /// The result type of a binary operation. Arithmetic operators widen to
    /// `Float` if either operand is `Float`; comparison and logical
    /// operators always produce `Int` (this language has no dedicated
    /// boolean type), after checking their operands are compatible.
    pub fn get_operation_type(
        &self,
        left: DataType,
        op: TokenKind,
        right: DataType,
        line: u32,
        column: u32,
    ) -> CompilerResult<DataType> {
        match op {
            TokenKind::Plus | TokenKind::Minus | TokenKind::Times | TokenKind::Divide => {
                let numeric = |t: DataType| matches!(t, DataType::Int | DataType::Float);
                if !numeric(left) || !numeric(right) {
                    return Err(CompilerError::semantic(
                        format!("Operación aritmética requiere operandos numéricos, se encontró {left} y {right}"),
                        line,
                        column,
                    ));
                }
                if left == DataType::Float || right == DataType::Float {
                    Ok(DataType::Float)
                } else {
                    Ok(DataType::Int)
                }
            }
            TokenKind::Equals
            | TokenKind::NotEquals
            | TokenKind::Less
            | TokenKind::LessEqual
            | TokenKind::Greater
            | TokenKind::GreaterEqual
            | TokenKind::And
            | TokenKind::Or => {
                let compatible = left == right
                    || (left == DataType::Float && right == DataType::Int)
                    || (left == DataType::Int && right == DataType::Float);
                if !compatible {
                    return Err(CompilerError::semantic(
                        format!("Operandos incompatibles: {left} {op:?} {right}"),
                        line,
                        column,
                    ));
                }
                if matches!(op, TokenKind::And | TokenKind::Or)
                    && (left != DataType::Int || right != DataType::Int)
                {
                    return Err(CompilerError::semantic(
                        "Operadores lógicos requieren operandos enteros".to_string(),
                        line,
                        column,
                    ));
                }
                Ok(DataType::Int)
            }
            _ => Err(CompilerError::semantic(
                format!("Operador no soportado: {op:?}"),
                line,
                column,
            )),
        }
    }

    /// A `while`/`do`-`while`/`if` condition must evaluate to `Int`.
    pub fn check_condition(&self, ty: DataType, line: u32, column: u32) -> CompilerResult<()> {
        if ty != DataType::Int {
            return Err(CompilerError::semantic(
                "La condición debe ser de tipo int".to_string(),
                line,
                column,
            ));
        }
        Ok(())
    }

    // ---- declarations and scoping --------------------------------------

    pub fn enter_scope(&mut self) {
        self.symbols.enter_scope();
    }

    pub fn exit_scope(&mut self) {
        self.symbols.exit_scope();
    }

    pub fn declare_variable(
        &mut self,
        ty: DataType,
        name: Symbol,
        initialized: bool,
        line: u32,
        column: u32,
    ) -> CompilerResult<()> {
        let var = Variable::new(name, ty, initialized, line, column);
        self.symbols.define_variable(var).map_err(|var| {
            CompilerError::semantic(
                format!("Variable '{}' ya declarada en este ámbito", var.name),
                var.line,
                var.column,
            )
        })
    }

    pub fn check_variable_exists(
        &self,
        name: Symbol,
        line: u32,
        column: u32,
    ) -> CompilerResult<&Variable> {
        self.symbols.get_variable(name).ok_or_else(|| {
            CompilerError::semantic(format!("Variable '{name}' no declarada"), line, column)
        })
    }

    /// A variable reference in an expression must have been assigned a
    /// value at least once.
    pub fn check_variable_initialized(
        &self,
        name: Symbol,
        line: u32,
        column: u32,
    ) -> CompilerResult<DataType> {
        let var = self.check_variable_exists(name, line, column)?;
        if !var.initialized {
            return Err(CompilerError::semantic(
                format!("Variable '{name}' usada sin inicializar"),
                line,
                column,
            ));
        }
        Ok(var.ty)
    }

    /// Checks and records a `name = value` assignment, using the general
    /// (widening-permitted) typing context.
    pub fn analyze_assignment(
        &mut self,
        name: Symbol,
        value_type: DataType,
        line: u32,
        column: u32,
    ) -> CompilerResult<()> {
        self.typing_context = TypingContext::General;
        let var_type = self.check_variable_exists(name, line, column)?.ty;
        self.check_types(var_type, value_type, line, column)?;
        self.symbols.mark_initialized(name);
        Ok(())
    }

    // ---- functions ------------------------------------------------------

    pub fn enter_function(
        &mut self,
        return_type: DataType,
        name: Symbol,
        line: u32,
        column: u32,
    ) -> CompilerResult<()> {
        let func = Function::new(name, return_type, line, column);
        self.symbols.define_function(func).map_err(|func| {
            CompilerError::semantic(
                format!("Función '{}' ya declarada", func.name),
                func.line,
                func.column,
            )
        })?;
        self.symbols.set_current_function(Some(name));
        self.current_return_type = Some(return_type);
        self.has_return = false;
        self.symbols.enter_scope();
        Ok(())
    }

    pub fn add_parameter(
        &mut self,
        ty: DataType,
        name: Symbol,
        line: u32,
        column: u32,
    ) -> CompilerResult<()> {
        let var = Variable::new(name, ty, true, line, column);
        self.symbols
            .define_variable(var.clone())
            .map_err(|var| {
                CompilerError::semantic(
                    format!("Variable '{}' ya declarada en este ámbito", var.name),
                    var.line,
                    var.column,
                )
            })?;
        self.symbols.add_parameter_to_current_function(var);
        Ok(())
    }

    pub fn check_function_call(
        &mut self,
        name: Symbol,
        arg_types: &[DataType],
        line: u32,
        column: u32,
    ) -> CompilerResult<DataType> {
        let func = self.symbols.get_function(name).ok_or_else(|| {
            CompilerError::semantic(format!("Función '{name}' no declarada"), line, column)
        })?;
        if arg_types.len() != func.parameters.len() {
            return Err(CompilerError::semantic(
                format!(
                    "Número incorrecto de argumentos para '{}'. Se esperaban {}, se recibieron {}",
                    name,
                    func.parameters.len(),
                    arg_types.len()
                ),
                line,
                column,
            ));
        }
        self.typing_context = TypingContext::Strict;
        for (i, (param, arg_ty)) in func.parameters.iter().zip(arg_types.iter()).enumerate() {
            if param.ty != *arg_ty {
                self.typing_context = TypingContext::General;
                return Err(CompilerError::semantic(
                    format!(
                        "Tipo de argumento incompatible en posición {}. Se esperaba {}, se recibió {}",
                        i + 1,
                        param.ty,
                        arg_ty
                    ),
                    line,
                    column,
                ));
            }
        }
        self.typing_context = TypingContext::General;
        Ok(func.return_type)
    }

    /// Checks a `return` statement against the enclosing function's
    /// declared return type. `return_type` is `None` for a bare `return;`.
    pub fn check_return(
        &mut self,
        return_type: Option<DataType>,
        line: u32,
        column: u32,
    ) -> CompilerResult<()> {
        let expected = self
            .current_return_type
            .ok_or_else(|| CompilerError::semantic("return fuera de una función".to_string(), line, column))?;
        self.has_return = true;
        match (expected, return_type) {
            (DataType::Void, Some(_)) => Err(CompilerError::semantic(
                "función void no debe retornar un valor".to_string(),
                line,
                column,
            )),
            (DataType::Void, None) => Ok(()),
            (_, None) => Err(CompilerError::semantic(
                format!("función de tipo {expected} debe retornar un valor"),
                line,
                column,
            )),
            (_, Some(found)) => {
                self.typing_context = TypingContext::General;
                self.check_types(expected, found, line, column)
            }
        }
    }

    /// Unwinds the scope and per-function state `enter_function` pushed,
    /// without running the "must return a value" check — used when parsing
    /// the function's parameter list or body failed partway through, so
    /// there is no complete body to hold that check against. Leaves the
    /// analyzer ready to parse the next top-level declaration.
    pub fn abort_function(&mut self) {
        self.symbols.exit_scope();
        self.symbols.set_current_function(None);
        self.current_return_type = None;
        self.has_return = false;
    }

    /// Called when the parser closes a function body: every non-`void`
    /// function must have executed a `return` on every path the analyzer
    /// can see. This is not path-sensitive — a `return` anywhere in the
    /// body satisfies the check, even inside a conditional that might not
    /// execute.
    pub fn exit_function(&mut self) -> CompilerResult<()> {
        if self.current_return_type != Some(DataType::Void) && !self.has_return {
            if let Some(func) = self.symbols.current_function() {
                let err = CompilerError::semantic(
                    format!("La función '{}' debe retornar un valor", func.name),
                    func.line,
                    func.column,
                );
                self.symbols.exit_scope();
                self.symbols.set_current_function(None);
                self.current_return_type = None;
                self.has_return = false;
                return Err(err);
            }
        }
        self.symbols.exit_scope();
        self.symbols.set_current_function(None);
        self.current_return_type = None;
        self.has_return = false;
        Ok(())
    }

    /// Switches to the strict (exact-match) typing context for the
    /// duration of checking one I/O statement's operand.
    pub fn check_io_operand(
        &mut self,
        expected: DataType,
        found: DataType,
        line: u32,
        column: u32,
    ) -> CompilerResult<()> {
        self.typing_context = TypingContext::Strict;
        let result = self.check_types(expected, found, line, column);
        self.typing_context = TypingContext::General;
        result
    }

    pub fn has_function(&self, name: Symbol) -> bool {
        self.symbols.has_function(name)
    }

    /// Run once parsing completes: every program must declare `main`.
    pub fn check_main_declared(&self, eof_line: u32, eof_column: u32) -> CompilerResult<()> {
        if self.has_function(Symbol::intern("main")) {
            Ok(())
        } else {
            Err(CompilerError::semantic(
                "No se encontró la función 'main'".to_string(),
                eof_line,
                eof_column,
            ))
        }
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_allows_int_to_float_widening() {
        let mut sem = SemanticAnalyzer::new();
        sem.declare_variable(DataType::Float, Symbol::intern("x"), false, 1, 1)
            .unwrap();
        assert!(sem
            .analyze_assignment(Symbol::intern("x"), DataType::Int, 2, 1)
            .is_ok());
    }

    #[test]
    fn function_call_rejects_widening() {
        let mut sem = SemanticAnalyzer::new();
        sem.enter_function(DataType::Void, Symbol::intern("f"), 1, 1)
            .unwrap();
        sem.add_parameter(DataType::Float, Symbol::intern("p"), 1, 10)
            .unwrap();
        sem.exit_function().unwrap();
        let err = sem
            .check_function_call(Symbol::intern("f"), &[DataType::Int], 5, 1)
            .unwrap_err();
        assert_eq!(err.kind(), "semantic");
    }

    #[test]
    fn condition_must_be_int() {
        let sem = SemanticAnalyzer::new();
        assert!(sem.check_condition(DataType::Int, 1, 1).is_ok());
        assert!(sem.check_condition(DataType::Float, 1, 1).is_err());
    }

    #[test]
    fn void_function_without_return_is_fine() {
        let mut sem = SemanticAnalyzer::new();
        sem.enter_function(DataType::Void, Symbol::intern("f_void"), 1, 1)
            .unwrap();
        assert!(sem.exit_function().is_ok());
    }

    #[test]
    fn non_void_function_without_return_is_an_error() {
        let mut sem = SemanticAnalyzer::new();
        sem.enter_function(DataType::Int, Symbol::intern("f_int"), 1, 1)
            .unwrap();
        assert!(sem.exit_function().is_err());
    }

    #[test]
    fn using_uninitialized_variable_is_an_error() {
        let mut sem = SemanticAnalyzer::new();
        sem.declare_variable(DataType::Int, Symbol::intern("y"), false, 1, 1)
            .unwrap();
        assert!(sem
            .check_variable_initialized(Symbol::intern("y"), 2, 1)
            .is_err());
    }

    /// `abort_function` must leave the analyzer exactly as `exit_function`
    /// would have: back in the enclosing (global) scope, with no dangling
    /// per-function state, so the parser can move on to the next top-level
    /// declaration after a malformed function body.
    #[test]
    fn abort_function_unwinds_scope_and_state_like_exit_function() {
        let mut sem = SemanticAnalyzer::new();
        sem.enter_function(DataType::Int, Symbol::intern("broken"), 1, 1)
            .unwrap();
        sem.declare_variable(DataType::Int, Symbol::intern("a"), true, 1, 1)
            .unwrap();
        sem.abort_function();

        // The parameter/body scope is gone: "a" is no longer reachable.
        assert!(sem.check_variable_exists(Symbol::intern("a"), 2, 1).is_err());

        // A second function reusing the same variable name in its own body
        // works exactly as it would after a clean `exit_function` — the
        // aborted function's scope left no trace behind.
        sem.enter_function(DataType::Void, Symbol::intern("main"), 2, 1)
            .unwrap();
        assert!(sem
            .declare_variable(DataType::Int, Symbol::intern("a"), true, 2, 1)
            .is_ok());
        assert!(sem.exit_function().is_ok());
    }
}
