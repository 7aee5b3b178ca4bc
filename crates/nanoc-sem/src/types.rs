//! The value-level type system: [`DataType`] and the two kinds of record a
//! scope can bind a name to.

use nanoc_util::Symbol;
use std::fmt;

/// One of the four types this language's values can have. `Copy` because
/// every place a `DataType` is threaded through the analyzer (return types
/// of `check_types`, `get_operation_type`, ...) wants it by value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    Int,
    Float,
    Char,
    Void,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Int => "INT",
            DataType::Float => "FLOAT",
            DataType::Char => "CHAR",
            DataType::Void => "VOID",
        };
        f.write_str(name)
    }
}

/// A declared variable. `initialized` starts `false` for a plain
/// declaration and flips to `true` the first time it's assigned — or
/// immediately for a function parameter, which always arrives with a
/// value.
#[derive(Clone, Debug)]
pub struct Variable {
    pub name: Symbol,
    pub ty: DataType,
    pub initialized: bool,
    pub line: u32,
    pub column: u32,
}

impl Variable {
    pub fn new(name: Symbol, ty: DataType, initialized: bool, line: u32, column: u32) -> Self {
        Variable {
            name,
            ty,
            initialized,
            line,
            column,
        }
    }
}

/// A declared function: its signature plus the source position of its
/// declaration, used to point a "must return a value" error back at the
/// function header rather than at wherever control fell off the end.
#[derive(Clone, Debug)]
pub struct Function {
    pub name: Symbol,
    pub return_type: DataType,
    pub parameters: Vec<Variable>,
    pub line: u32,
    pub column: u32,
}

impl Function {
    pub fn new(name: Symbol, return_type: DataType, line: u32, column: u32) -> Self {
        Function {
            name,
            return_type,
            parameters: Vec::new(),
            line,
            column,
        }
    }
}
