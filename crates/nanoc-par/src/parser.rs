//! The recursive-descent parser: a single lookahead token, a stack of open
//! tree nodes, and a semantic analyzer driven inline at every binding site.

use nanoc_lex::{Token, TokenKind};
use nanoc_sem::{DataType, SemanticAnalyzer};
use nanoc_util::error::{CompilerError, CompilerResult};
use nanoc_util::Symbol;

use crate::tree::{ParseTree, TreeBuilder};

/// Tokens that can begin a declaration or statement, used both for the
/// global-declaration/function lookahead and for resynchronizing after an
/// error.
const SYNC_STARTS: &[TokenKind] = &[
    TokenKind::Int,
    TokenKind::Char,
    TokenKind::Float,
    TokenKind::Void,
    TokenKind::If,
    TokenKind::While,
    TokenKind::Do,
    TokenKind::Return,
];

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    tree: TreeBuilder,
    analyzer: SemanticAnalyzer,
    /// When `true`, a failed rule records its error and resynchronizes
    /// instead of propagating — the driver's batched `compile --recover`
    /// path. When `false`, the first error aborts the whole parse.
    recover: bool,
    errors: Vec<CompilerError>,
}

/// Parses a complete token stream (already `Lexer::tokenize`d, `Eof`
/// terminated) into a parse tree. `recover` selects single-shot vs batched
/// error reporting, per the driver's two parsing modes.
pub fn parse(tokens: Vec<Token>, recover: bool) -> (Option<ParseTree>, Vec<CompilerError>) {
    let mut parser = Parser {
        tokens,
        current: 0,
        tree: TreeBuilder::new(),
        analyzer: SemanticAnalyzer::new(),
        recover,
        errors: Vec::new(),
    };
    match parser.program() {
        Ok(()) => {
            let tree = parser.tree.finish();
            (Some(tree), parser.errors)
        }
        Err(e) => {
            parser.errors.push(e);
            (None, parser.errors)
        }
    }
}

impl Parser {
    /// Runs `body` as the contents of a rule node labeled `label`: opens the
    /// node, runs `body`, and closes the node whether `body` succeeded or
    /// failed. Mirrors the inherited parser's `try/finally: move_to_parent`
    /// shape — every rule pops its own node on the way out, error or not, so
    /// a partially parsed subtree never leaves the builder's stack stuck
    /// open.
    fn rule<T>(
        &mut self,
        label: &'static str,
        body: impl FnOnce(&mut Self) -> CompilerResult<T>,
    ) -> CompilerResult<T> {
        self.tree.begin_rule(label);
        let result = body(self);
        self.tree.end_rule();
        result
    }

    // ---- token-stream primitives ----------------------------------------

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous().clone()
    }

    fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, kind: TokenKind, message: impl Into<String>) -> CompilerResult<Token> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        Err(CompilerError::syntactic(
            format!("{}. Se encontró '{}'", message.into(), self.peek().lexeme),
            self.peek().line,
            self.peek().column,
        ))
    }

    fn is_type_token(&self, token: &Token) -> bool {
        matches!(
            token.kind,
            TokenKind::Int | TokenKind::Char | TokenKind::Float | TokenKind::Void
        )
    }

    fn is_io_token(&self, token: &Token) -> bool {
        matches!(
            token.kind,
            TokenKind::PrintInt
                | TokenKind::PrintFloat
                | TokenKind::PrintChar
                | TokenKind::PrintStr
                | TokenKind::ScanInt
                | TokenKind::ScanFloat
                | TokenKind::ScanChar
        )
    }

    fn data_type_of(&self, kind: TokenKind, at: &Token) -> CompilerResult<DataType> {
        match kind {
            TokenKind::Int => Ok(DataType::Int),
            TokenKind::Float => Ok(DataType::Float),
            TokenKind::Char => Ok(DataType::Char),
            TokenKind::Void => Ok(DataType::Void),
            _ => Err(CompilerError::syntactic(
                format!("Tipo de dato no válido: {kind:?}"),
                at.line,
                at.column,
            )),
        }
    }

    /// Consumes one of `int | char | float | void`, recording the consumed
    /// token as a leaf under the current rule.
    fn parse_type(&mut self) -> CompilerResult<Token> {
        if self.is_type_token(self.peek()) {
            let token = self.advance();
            self.tree.push_token("Type", token.clone());
            Ok(token)
        } else {
            Err(CompilerError::syntactic(
                "Se esperaba un tipo de dato (int, char, float, void)",
                self.peek().line,
                self.peek().column,
            ))
        }
    }

    // ---- bounded lookahead (saved-cursor peeks) --------------------------

    /// `Type ID (` — the start of a function declaration.
    fn is_function_declaration(&self) -> bool {
        if !self.is_type_token(self.peek()) {
            return false;
        }
        let mut cursor = self.current + 1;
        if self.tokens[cursor].kind != TokenKind::Id {
            return false;
        }
        cursor += 1;
        self.tokens[cursor].kind == TokenKind::LParen
    }

    /// `Type ID` followed by anything other than `(` — a global variable
    /// declaration.
    fn is_global_declaration(&self) -> bool {
        if !self.is_type_token(self.peek()) {
            return false;
        }
        let mut cursor = self.current + 1;
        if self.tokens[cursor].kind != TokenKind::Id {
            return false;
        }
        cursor += 1;
        self.tokens[cursor].kind != TokenKind::LParen
    }

    fn is_function_call(&self) -> bool {
        self.check(TokenKind::Id) && self.tokens[self.current + 1].kind == TokenKind::LParen
    }

    // ---- top level --------------------------------------------------------

    fn program(&mut self) -> CompilerResult<()> {
        if self.is_at_end() {
            return Err(CompilerError::syntactic(
                "El programa está vacío",
                self.peek().line,
                self.peek().column,
            ));
        }

        self.rule("Program", |p| {
            while !p.is_at_end() && p.is_global_declaration() {
                if let Err(e) = p.global_declaration() {
                    p.handle_error(e)?;
                }
            }
            p.function_list()?;
            if !p.is_at_end() {
                let trailing = p.peek().clone();
                let err = CompilerError::syntactic(
                    format!("Token inesperado después de la última función: '{}'", trailing.lexeme),
                    trailing.line,
                    trailing.column,
                );
                p.handle_error(err)?;
            }
            Ok(())
        })?;

        let eof = self.peek().clone();
        self.analyzer.check_main_declared(eof.line, eof.column)
    }

    fn global_declaration(&mut self) -> CompilerResult<()> {
        self.rule("GlobalDeclaration", |p| {
            let type_token = p.peek().clone();
            let data_type = p.data_type_of(type_token.kind, &type_token)?;
            p.parse_type()?;

            let id_token = p.consume(
                TokenKind::Id,
                format!("Se esperaba un identificador después de '{}'", type_token.lexeme),
            )?;
            p.tree.push_token("Identifier", id_token.clone());
            let name = Symbol::intern(&id_token.lexeme);

            let mut initialized = false;
            if p.match_kind(TokenKind::Assign) {
                p.tree.push_token("Operator", p.previous().clone());
                let expr_type = p.expression()?;
                p.analyzer
                    .check_types(data_type, expr_type, id_token.line, id_token.column)?;
                initialized = true;
            }

            p.analyzer
                .declare_variable(data_type, name, initialized, id_token.line, id_token.column)?;

            let semi = p.consume(
                TokenKind::Semicolon,
                format!("Se esperaba ';' después de la declaración de '{}'", id_token.lexeme),
            )?;
            p.tree.push_token("Semicolon", semi);
            Ok(())
        })
    }

    fn function_list(&mut self) -> CompilerResult<()> {
        self.rule("FunctionList", |p| {
            while !p.is_at_end() {
                if p.is_function_declaration() {
                    if let Err(e) = p.function() {
                        p.handle_error(e)?;
                    }
                } else {
                    break;
                }
            }
            Ok(())
        })
    }

    fn function(&mut self) -> CompilerResult<()> {
        self.rule("Function", |p| {
            let type_token = p.peek().clone();
            let return_type = p.data_type_of(type_token.kind, &type_token)?;
            p.parse_type()?;

            let name_token = p.consume(TokenKind::Id, "Se esperaba un nombre de función")?;
            p.tree.push_token("Identifier", name_token.clone());
            let name = Symbol::intern(&name_token.lexeme);

            p.analyzer
                .enter_function(return_type, name, name_token.line, name_token.column)?;

            let body_result = (|| {
                let lparen = p.consume(
                    TokenKind::LParen,
                    format!("Se esperaba '(' después de '{}'", name_token.lexeme),
                )?;
                p.tree.push_token("LParen", lparen);
                p.parameter_list()?;
                let rparen =
                    p.consume(TokenKind::RParen, "Se esperaba ')' después de los parámetros")?;
                p.tree.push_token("RParen", rparen);
                p.compound_stmt()
            })();

            match body_result {
                Ok(()) => p.analyzer.exit_function(),
                Err(e) => {
                    p.analyzer.abort_function();
                    Err(e)
                }
            }
        })
    }

    fn parameter_list(&mut self) -> CompilerResult<()> {
        self.rule("ParameterList", |p| {
            if p.is_type_token(p.peek()) {
                p.parameter()?;
                while p.match_kind(TokenKind::Comma) {
                    p.tree.push_token("Comma", p.previous().clone());
                    p.parameter()?;
                }
            }
            Ok(())
        })
    }

    fn parameter(&mut self) -> CompilerResult<()> {
        self.rule("Parameter", |p| {
            let type_token = p.peek().clone();
            let ty = p.data_type_of(type_token.kind, &type_token)?;
            p.parse_type()?;
            let name_token = p.consume(TokenKind::Id, "Se esperaba un nombre de parámetro")?;
            p.tree.push_token("Identifier", name_token.clone());
            p.analyzer.add_parameter(
                ty,
                Symbol::intern(&name_token.lexeme),
                name_token.line,
                name_token.column,
            )?;
            Ok(())
        })
    }

    // ---- expressions --------------------------------------------------

    /// `Expression → scan-call | LogicExpr`. A bare `scanInt()`/`scanFloat()`
    /// /`scanChar()` call is only recognized here, at the top of an
    /// expression — not inside `logic_expr`'s operand positions.
    fn expression(&mut self) -> CompilerResult<DataType> {
        self.rule("Expression", |p| {
            if matches!(
                p.peek().kind,
                TokenKind::ScanInt | TokenKind::ScanFloat | TokenKind::ScanChar
            ) {
                let scan_token = p.advance();
                p.tree.push_token("ScanFunction", scan_token.clone());
                let lparen = p.consume(TokenKind::LParen, "Se esperaba '(' después de la función scan")?;
                p.tree.push_token("LParen", lparen);
                let rparen = p.consume(TokenKind::RParen, "Se esperaba ')' después de scan")?;
                p.tree.push_token("RParen", rparen);
                Ok(match scan_token.kind {
                    TokenKind::ScanInt => DataType::Int,
                    TokenKind::ScanFloat => DataType::Float,
                    TokenKind::ScanChar => DataType::Char,
                    _ => unreachable!(),
                })
            } else {
                p.logic_expr()
            }
        })
    }

    fn logic_expr(&mut self) -> CompilerResult<DataType> {
        self.rule("LogicExpr", |p| {
            let mut left = p.comp_expr()?;
            while matches!(p.peek().kind, TokenKind::And | TokenKind::Or) {
                let op = p.advance();
                p.tree.push_token("Operator", op.clone());
                let right = p.comp_expr()?;
                left = p
                    .analyzer
                    .get_operation_type(left, op.kind, right, op.line, op.column)?;
            }
            Ok(left)
        })
    }

    fn comp_expr(&mut self) -> CompilerResult<DataType> {
        self.rule("CompExpr", |p| {
            let mut left = p.add_expr()?;
            while matches!(
                p.peek().kind,
                TokenKind::Equals
                    | TokenKind::NotEquals
                    | TokenKind::Less
                    | TokenKind::LessEqual
                    | TokenKind::Greater
                    | TokenKind::GreaterEqual
            ) {
                let op = p.advance();
                p.tree.push_token("Operator", op.clone());
                let right = p.add_expr()?;
                left = p
                    .analyzer
                    .get_operation_type(left, op.kind, right, op.line, op.column)?;
            }
            Ok(left)
        })
    }

    fn add_expr(&mut self) -> CompilerResult<DataType> {
        self.rule("AddExpr", |p| {
            let mut left = p.mult_expr()?;
            while matches!(p.peek().kind, TokenKind::Plus | TokenKind::Minus) {
                let op = p.advance();
                p.tree.push_token("Operator", op.clone());
                let right = p.mult_expr()?;
                left = p
                    .analyzer
                    .get_operation_type(left, op.kind, right, op.line, op.column)?;
            }
            Ok(left)
        })
    }

    fn mult_expr(&mut self) -> CompilerResult<DataType> {
        self.rule("MultExpr", |p| {
            let mut left = p.factor()?;
            while matches!(p.peek().kind, TokenKind::Times | TokenKind::Divide) {
                let op = p.advance();
                p.tree.push_token("Operator", op.clone());
                let right = p.factor()?;
                left = p
                    .analyzer
                    .get_operation_type(left, op.kind, right, op.line, op.column)?;
            }
            Ok(left)
        })
    }

    fn factor(&mut self) -> CompilerResult<DataType> {
        self.rule("Factor", |p| {
            if p.match_kind(TokenKind::LParen) {
                p.tree.push_token("LParen", p.previous().clone());
                let inner = p.expression()?;
                let rparen = p.consume(TokenKind::RParen, "Se esperaba ')'")?;
                p.tree.push_token("RParen", rparen);
                Ok(inner)
            } else if p.check(TokenKind::Id) {
                let id_token = p.advance();
                p.tree.push_token("Identifier", id_token.clone());
                let name = Symbol::intern(&id_token.lexeme);
                if p.check(TokenKind::LParen) {
                    p.call_tail(&id_token, name)
                } else {
                    p.analyzer
                        .check_variable_initialized(name, id_token.line, id_token.column)
                }
            } else if p.match_kind(TokenKind::IntegerLiteral) {
                p.tree.push_token("IntegerLiteral", p.previous().clone());
                Ok(DataType::Int)
            } else if p.match_kind(TokenKind::FloatLiteral) {
                p.tree.push_token("FloatLiteral", p.previous().clone());
                Ok(DataType::Float)
            } else if p.match_kind(TokenKind::CharLiteral) {
                p.tree.push_token("CharLiteral", p.previous().clone());
                Ok(DataType::Char)
            } else if p.match_kind(TokenKind::StringLiteral) {
                p.tree.push_token("StringLiteral", p.previous().clone());
                // String literals are typed CHAR for I/O-argument-matching
                // purposes; see printStr's expectation in io_stmt.
                Ok(DataType::Char)
            } else {
                Err(CompilerError::syntactic(
                    "Se esperaba una expresión",
                    p.peek().line,
                    p.peek().column,
                ))
            }
        })
    }

    /// `'(' ArgList? ')'` following an identifier already consumed as
    /// `id_token`. Returns the call's result type.
    fn call_tail(&mut self, id_token: &Token, name: Symbol) -> CompilerResult<DataType> {
        let lparen = self.consume(TokenKind::LParen, "Se esperaba '('")?;
        self.tree.push_token("LParen", lparen);
        let arg_types = self.argument_list()?;
        let rparen = self.consume(TokenKind::RParen, "Se esperaba ')'")?;
        self.tree.push_token("RParen", rparen);
        self.analyzer
            .check_function_call(name, &arg_types, id_token.line, id_token.column)
    }

    fn argument_list(&mut self) -> CompilerResult<Vec<DataType>> {
        let mut types = Vec::new();
        if !self.check(TokenKind::RParen) {
            types.push(self.expression()?);
            while self.match_kind(TokenKind::Comma) {
                self.tree.push_token("Comma", self.previous().clone());
                types.push(self.expression()?);
            }
        }
        Ok(types)
    }

    // ---- statements -----------------------------------------------------

    fn statement(&mut self) -> CompilerResult<()> {
        if self.is_type_token(self.peek()) {
            self.declaration_stmt()
        } else if self.check(TokenKind::Id) {
            if self.is_function_call() {
                self.function_call_stmt()
            } else {
                self.assignment_stmt()
            }
        } else if self.check(TokenKind::If) {
            self.if_stmt()
        } else if self.check(TokenKind::While) {
            self.while_stmt()
        } else if self.check(TokenKind::Do) {
            self.do_while_stmt()
        } else if self.check(TokenKind::Return) {
            self.return_stmt()
        } else if self.is_io_token(self.peek()) {
            self.io_stmt()
        } else if self.check(TokenKind::LBrace) {
            self.compound_stmt()
        } else if self.match_kind(TokenKind::Semicolon) {
            self.tree.push_token("Semicolon", self.previous().clone());
            Ok(())
        } else {
            Err(CompilerError::syntactic(
                "Se esperaba el inicio de una declaración",
                self.peek().line,
                self.peek().column,
            ))
        }
    }

    fn declaration_stmt(&mut self) -> CompilerResult<()> {
        self.rule("Declaration", |p| {
            let type_token = p.peek().clone();
            let data_type = p.data_type_of(type_token.kind, &type_token)?;
            p.parse_type()?;
            let id_token = p.consume(TokenKind::Id, "Se esperaba un identificador")?;
            p.tree.push_token("Identifier", id_token.clone());
            let name = Symbol::intern(&id_token.lexeme);

            let mut initialized = false;
            if p.match_kind(TokenKind::Assign) {
                p.tree.push_token("Operator", p.previous().clone());
                let expr_type = p.expression()?;
                p.analyzer
                    .check_types(data_type, expr_type, id_token.line, id_token.column)?;
                initialized = true;
            }
            p.analyzer
                .declare_variable(data_type, name, initialized, id_token.line, id_token.column)?;

            let semi = p.consume(TokenKind::Semicolon, "Se esperaba ';' después de la declaración")?;
            p.tree.push_token("Semicolon", semi);
            Ok(())
        })
    }

    fn assignment_stmt(&mut self) -> CompilerResult<()> {
        self.rule("Assignment", |p| {
            let id_token = p.consume(TokenKind::Id, "Se esperaba un identificador")?;
            p.tree.push_token("Identifier", id_token.clone());
            let name = Symbol::intern(&id_token.lexeme);
            let assign = p.consume(TokenKind::Assign, "Se esperaba '=' después del identificador")?;
            p.tree.push_token("Operator", assign);
            let value_type = p.expression()?;
            p.analyzer
                .analyze_assignment(name, value_type, id_token.line, id_token.column)?;
            let semi = p.consume(TokenKind::Semicolon, "Se esperaba ';' después de la asignación")?;
            p.tree.push_token("Semicolon", semi);
            Ok(())
        })
    }

    fn function_call_stmt(&mut self) -> CompilerResult<()> {
        self.rule("FunctionCallStmt", |p| {
            let id_token = p.consume(TokenKind::Id, "Se esperaba un identificador")?;
            p.tree.push_token("Identifier", id_token.clone());
            let name = Symbol::intern(&id_token.lexeme);
            p.call_tail(&id_token, name)?;
            let semi = p.consume(TokenKind::Semicolon, "Se esperaba ';' después de la llamada a función")?;
            p.tree.push_token("Semicolon", semi);
            Ok(())
        })
    }

    fn if_stmt(&mut self) -> CompilerResult<()> {
        self.rule("IfStatement", |p| {
            let if_tok = p.consume(TokenKind::If, "Se esperaba 'if'")?;
            p.tree.push_token("Keyword", if_tok.clone());
            let lparen = p.consume(TokenKind::LParen, "Se esperaba '(' después de 'if'")?;
            p.tree.push_token("LParen", lparen);
            let cond_tok = p.peek().clone();
            let cond_type = p.expression()?;
            p.analyzer
                .check_condition(cond_type, cond_tok.line, cond_tok.column)?;
            let rparen = p.consume(TokenKind::RParen, "Se esperaba ')' después de la condición")?;
            p.tree.push_token("RParen", rparen);

            p.analyzer.enter_scope();
            let then_result = p.statement();
            p.analyzer.exit_scope();
            then_result?;

            if p.match_kind(TokenKind::Else) {
                p.tree.push_token("Keyword", p.previous().clone());
                p.analyzer.enter_scope();
                let else_result = p.statement();
                p.analyzer.exit_scope();
                else_result?;
            }
            Ok(())
        })
    }

    fn while_stmt(&mut self) -> CompilerResult<()> {
        self.rule("WhileStatement", |p| {
            let while_tok = p.consume(TokenKind::While, "Se esperaba 'while'")?;
            p.tree.push_token("Keyword", while_tok.clone());
            let lparen = p.consume(TokenKind::LParen, "Se esperaba '(' después de 'while'")?;
            p.tree.push_token("LParen", lparen);
            let cond_tok = p.peek().clone();
            let cond_type = p.expression()?;
            p.analyzer
                .check_condition(cond_type, cond_tok.line, cond_tok.column)?;
            let rparen = p.consume(TokenKind::RParen, "Se esperaba ')' después de la condición")?;
            p.tree.push_token("RParen", rparen);

            p.analyzer.enter_scope();
            let body_result = p.statement();
            p.analyzer.exit_scope();
            body_result
        })
    }

    fn do_while_stmt(&mut self) -> CompilerResult<()> {
        self.rule("DoWhileStatement", |p| {
            let do_tok = p.consume(TokenKind::Do, "Se esperaba 'do'")?;
            p.tree.push_token("Keyword", do_tok.clone());

            p.analyzer.enter_scope();
            let body_result = p.statement();
            p.analyzer.exit_scope();
            body_result?;

            let while_tok = p.consume(TokenKind::While, "Se esperaba 'while'")?;
            p.tree.push_token("Keyword", while_tok.clone());
            let lparen = p.consume(TokenKind::LParen, "Se esperaba '(' después de 'while'")?;
            p.tree.push_token("LParen", lparen);
            let cond_tok = p.peek().clone();
            let cond_type = p.expression()?;
            p.analyzer
                .check_condition(cond_type, cond_tok.line, cond_tok.column)?;
            let rparen = p.consume(TokenKind::RParen, "Se esperaba ')' después de la condición")?;
            p.tree.push_token("RParen", rparen);
            let semi = p.consume(TokenKind::Semicolon, "Se esperaba ';' después del do-while")?;
            p.tree.push_token("Semicolon", semi);
            Ok(())
        })
    }

    fn return_stmt(&mut self) -> CompilerResult<()> {
        self.rule("ReturnStatement", |p| {
            let return_tok = p.consume(TokenKind::Return, "Se esperaba 'return'")?;
            p.tree.push_token("Keyword", return_tok.clone());

            let value_type = if !p.check(TokenKind::Semicolon) {
                Some(p.expression()?)
            } else {
                None
            };
            p.analyzer
                .check_return(value_type, return_tok.line, return_tok.column)?;

            let semi = p.consume(TokenKind::Semicolon, "Se esperaba ';' después de return")?;
            p.tree.push_token("Semicolon", semi);
            Ok(())
        })
    }

    /// The type each I/O primitive expects its operand to exactly match
    /// (checked in a strict context — no widening, per §4.3/§4.4).
    fn io_expected_type(kind: TokenKind) -> DataType {
        match kind {
            TokenKind::PrintInt | TokenKind::ScanInt => DataType::Int,
            TokenKind::PrintFloat | TokenKind::ScanFloat => DataType::Float,
            TokenKind::PrintChar | TokenKind::ScanChar => DataType::Char,
            TokenKind::PrintStr => DataType::Char,
            _ => unreachable!("io_expected_type called on a non-I/O token"),
        }
    }

    fn io_stmt(&mut self) -> CompilerResult<()> {
        self.rule("IOStatement", |p| {
            let io_tok = p.advance();
            p.tree.push_token("IOFunction", io_tok.clone());

            let lparen = p.consume(
                TokenKind::LParen,
                format!("Se esperaba '(' después de {}", io_tok.lexeme),
            )?;
            p.tree.push_token("LParen", lparen);

            if matches!(
                io_tok.kind,
                TokenKind::PrintInt | TokenKind::PrintFloat | TokenKind::PrintChar | TokenKind::PrintStr
            ) {
                let arg_type = p.expression()?;
                p.analyzer.check_io_operand(
                    Self::io_expected_type(io_tok.kind),
                    arg_type,
                    io_tok.line,
                    io_tok.column,
                )?;
            }

            let rparen = p.consume(
                TokenKind::RParen,
                format!("Se esperaba ')' después de {}", io_tok.lexeme),
            )?;
            p.tree.push_token("RParen", rparen);
            let semi = p.consume(
                TokenKind::Semicolon,
                format!("Se esperaba ';' después de {}", io_tok.lexeme),
            )?;
            p.tree.push_token("Semicolon", semi);
            Ok(())
        })
    }

    fn compound_stmt(&mut self) -> CompilerResult<()> {
        self.rule("CompoundStatement", |p| {
            let lbrace = p.consume(TokenKind::LBrace, "Se esperaba '{'")?;
            p.tree.push_token("LBrace", lbrace);

            p.analyzer.enter_scope();
            let body_result = (|| {
                while !p.check(TokenKind::RBrace) && !p.is_at_end() {
                    if let Err(e) = p.statement() {
                        p.handle_error(e)?;
                    }
                }
                Ok(())
            })();
            p.analyzer.exit_scope();
            body_result?;

            let rbrace = p.consume(TokenKind::RBrace, "Se esperaba '}'")?;
            p.tree.push_token("RBrace", rbrace);
            Ok(())
        })
    }

    // ---- error recovery --------------------------------------------------

    /// Records `err` and resynchronizes if batched recovery is enabled;
    /// otherwise propagates immediately, aborting the parse.
    fn handle_error(&mut self, err: CompilerError) -> CompilerResult<()> {
        if !self.recover {
            return Err(err);
        }
        self.errors.push(err);
        self.synchronize();
        Ok(())
    }

    /// Consumes tokens until just past a `;` or up to (not past) a token
    /// that can start a new declaration/statement, then resets the
    /// analyzer's transient per-function state.
    fn synchronize(&mut self) {
        self.advance();
        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                self.analyzer.synchronize();
                return;
            }
            if SYNC_STARTS.contains(&self.peek().kind) {
                self.analyzer.synchronize();
                return;
            }
            self.advance();
        }
    }
}
