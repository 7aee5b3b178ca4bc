//! The lexer: turns source text into a token stream.
//!
//! Tokenization is a single left-to-right pass with one character of
//! lookahead (two, for the `/*` vs `/` vs `//` decision). Multi-character
//! operators are always preferred over their single-character prefix
//! (`==` over `=` followed by `=`), matching the longest-match rule in the
//! keyword/operator table this lexer was modeled on.

use nanoc_util::error::CompilerError;

use crate::cursor::Cursor;
use crate::token::{keyword_kind, Token, TokenKind};

pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    token_start_line: u32,
    token_start_column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            cursor: Cursor::new(source),
            token_start_line: 1,
            token_start_column: 1,
        }
    }

    /// Tokenizes the entire input, collecting every lexical error rather
    /// than stopping at the first one — matching the recovery policy used
    /// by every later phase. The returned token list always ends with
    /// exactly one `Eof` token.
    pub fn tokenize(source: &'a str) -> (Vec<Token>, Vec<CompilerError>) {
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        let mut errors = Vec::new();
        loop {
            match lexer.next_token() {
                Ok(token) => {
                    let is_eof = token.kind == TokenKind::Eof;
                    tokens.push(token);
                    if is_eof {
                        break;
                    }
                }
                Err(error) => errors.push(error),
            }
        }
        (tokens, errors)
    }

    fn next_token(&mut self) -> Result<Token, CompilerError> {
        self.skip_trivia();

        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();

        if self.cursor.is_at_end() {
            return Ok(self.make(TokenKind::Eof, String::new()));
        }

        let c = self.cursor.current_char();
        match c {
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            '{' => self.single(TokenKind::LBrace),
            '}' => self.single(TokenKind::RBrace),
            ';' => self.single(TokenKind::Semicolon),
            ',' => self.single(TokenKind::Comma),
            '+' => self.single(TokenKind::Plus),
            '-' => self.single(TokenKind::Minus),
            '*' => self.single(TokenKind::Times),
            '/' => self.single(TokenKind::Divide),
            '=' => Ok(self.lex_one_or_two('=', TokenKind::Assign, TokenKind::Equals)),
            '!' => self.lex_bang(),
            '<' => Ok(self.lex_one_or_two('=', TokenKind::Less, TokenKind::LessEqual)),
            '>' => Ok(self.lex_one_or_two('=', TokenKind::Greater, TokenKind::GreaterEqual)),
            '&' => self.lex_doubled('&', TokenKind::And),
            '|' => self.lex_doubled('|', TokenKind::Or),
            '"' => self.lex_string(),
            '\'' => self.lex_char(),
            c if c.is_ascii_digit() => Ok(self.lex_number()),
            c if is_ident_start(c) => Ok(self.lex_identifier()),
            c => {
                let err = self.error(format!("Carácter no reconocido: {c}"));
                self.cursor.advance();
                Err(err)
            }
        }
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.cursor.current_char() {
                ' ' | '\t' | '\r' | '\n' => {
                    self.cursor.advance();
                }
                '/' if self.cursor.peek_char(1) == '/' => {
                    while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                        self.cursor.advance();
                    }
                }
                '/' if self.cursor.peek_char(1) == '*' => {
                    self.cursor.advance();
                    self.cursor.advance();
                    while !self.cursor.is_at_end()
                        && !(self.cursor.current_char() == '*' && self.cursor.peek_char(1) == '/')
                    {
                        self.cursor.advance();
                    }
                    if !self.cursor.is_at_end() {
                        self.cursor.advance();
                        self.cursor.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn single(&mut self, kind: TokenKind) -> Result<Token, CompilerError> {
        let lexeme = self.cursor.current_char().to_string();
        self.cursor.advance();
        Ok(self.make(kind, lexeme))
    }

    /// Consumes `first`, then `second` only if it follows `expect`;
    /// otherwise emits `lone`. Used for `=`/`==`, `<`/`<=`, `>`/`>=`.
    fn lex_one_or_two(&mut self, expect: char, lone: TokenKind, doubled: TokenKind) -> Token {
        let first = self.cursor.current_char();
        self.cursor.advance();
        if self.cursor.current_char() == expect {
            self.cursor.advance();
            self.make(doubled, format!("{first}{expect}"))
        } else {
            self.make(lone, first.to_string())
        }
    }

    fn lex_bang(&mut self) -> Result<Token, CompilerError> {
        self.cursor.advance();
        if self.cursor.current_char() == '=' {
            self.cursor.advance();
            Ok(self.make(TokenKind::NotEquals, "!="))
        } else {
            let err = self.error("Carácter no reconocido: !".to_string());
            Err(err)
        }
    }

    /// `&&` / `||` — a lone `&` or `|` is not part of this language's
    /// operator set, so it is a lexical error rather than a single-char
    /// token.
    fn lex_doubled(&mut self, c: char, kind: TokenKind) -> Result<Token, CompilerError> {
        self.cursor.advance();
        if self.cursor.current_char() == c {
            self.cursor.advance();
            Ok(self.make(kind, format!("{c}{c}")))
        } else {
            Err(self.error(format!("Carácter no reconocido: {c}")))
        }
    }

    fn lex_identifier(&mut self) -> Token {
        let mut lexeme = String::new();
        while is_ident_continue(self.cursor.current_char()) {
            lexeme.push(self.cursor.current_char());
            self.cursor.advance();
        }
        let kind = keyword_kind(&lexeme).unwrap_or(TokenKind::Id);
        self.make(kind, lexeme)
    }

    /// Integer or float literal. A run of digits followed by `.` and more
    /// digits is a float; otherwise it's an integer. `1.` with no trailing
    /// digit is an integer token `1` followed by a `.` lexical error, since
    /// this language has no trailing-dot float syntax.
    fn lex_number(&mut self) -> Token {
        let mut lexeme = String::new();
        while self.cursor.current_char().is_ascii_digit() {
            lexeme.push(self.cursor.current_char());
            self.cursor.advance();
        }
        if self.cursor.current_char() == '.' && self.cursor.peek_char(1).is_ascii_digit() {
            lexeme.push('.');
            self.cursor.advance();
            while self.cursor.current_char().is_ascii_digit() {
                lexeme.push(self.cursor.current_char());
                self.cursor.advance();
            }
            return self.make(TokenKind::FloatLiteral, lexeme);
        }
        self.make(TokenKind::IntegerLiteral, lexeme)
    }

    /// `"..."` — no escape processing, matching this language's resolved
    /// design: backslash is an ordinary character inside a string literal.
    /// The lexeme keeps its delimiting quotes, matching every other token's
    /// lexeme being the exact source slice it was read from.
    fn lex_string(&mut self) -> Result<Token, CompilerError> {
        let mut lexeme = String::from('"');
        self.cursor.advance();
        while !self.cursor.is_at_end() && self.cursor.current_char() != '"' {
            if self.cursor.current_char() == '\n' {
                return Err(self.error("Cadena no terminada".to_string()));
            }
            lexeme.push(self.cursor.current_char());
            self.cursor.advance();
        }
        if self.cursor.is_at_end() {
            return Err(self.error("Cadena no terminada".to_string()));
        }
        lexeme.push('"');
        self.cursor.advance();
        Ok(self.make(TokenKind::StringLiteral, lexeme))
    }

    /// `'...'` — any run of characters except another `'`, no escapes; the
    /// lexeme keeps its delimiting quotes. `''` is a valid, empty literal.
    fn lex_char(&mut self) -> Result<Token, CompilerError> {
        let mut lexeme = String::from('\'');
        self.cursor.advance();
        while !self.cursor.is_at_end() && self.cursor.current_char() != '\'' {
            if self.cursor.current_char() == '\n' {
                return Err(self.error("Literal de carácter no terminado".to_string()));
            }
            lexeme.push(self.cursor.current_char());
            self.cursor.advance();
        }
        if self.cursor.is_at_end() {
            return Err(self.error("Literal de carácter no terminado".to_string()));
        }
        lexeme.push('\'');
        self.cursor.advance();
        Ok(self.make(TokenKind::CharLiteral, lexeme))
    }

    fn make(&self, kind: TokenKind, lexeme: impl Into<String>) -> Token {
        Token::new(kind, lexeme, self.token_start_line, self.token_start_column)
    }

    fn error(&self, message: String) -> CompilerError {
        CompilerError::lexical(message, self.token_start_line, self.token_start_column)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, errors) = Lexer::tokenize(source);
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn keywords_take_priority_over_identifiers() {
        assert_eq!(kinds("int"), vec![TokenKind::Int, TokenKind::Eof]);
        assert_eq!(
            kinds("printIntermediate"),
            vec![TokenKind::Id, TokenKind::Eof]
        );
    }

    #[test]
    fn multi_char_operators_use_longest_match() {
        assert_eq!(
            kinds("a == b"),
            vec![TokenKind::Id, TokenKind::Equals, TokenKind::Id, TokenKind::Eof]
        );
        assert_eq!(
            kinds("a<=b"),
            vec![
                TokenKind::Id,
                TokenKind::LessEqual,
                TokenKind::Id,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn distinguishes_int_and_float_literals() {
        let (tokens, errors) = Lexer::tokenize("42 3.14");
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::IntegerLiteral);
        assert_eq!(tokens[0].lexeme, "42");
        assert_eq!(tokens[1].kind, TokenKind::FloatLiteral);
        assert_eq!(tokens[1].lexeme, "3.14");
    }

    #[test]
    fn comments_and_whitespace_produce_no_tokens() {
        assert_eq!(
            kinds("int // comment\nx /* block */ ;"),
            vec![
                TokenKind::Int,
                TokenKind::Id,
                TokenKind::Semicolon,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn reports_unrecognized_character() {
        let (_, errors) = Lexer::tokenize("int x = 5 # 3;");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind(), "lexical");
    }

    #[test]
    fn string_lexeme_keeps_its_quotes() {
        let (tokens, errors) = Lexer::tokenize(r#""fac: ""#);
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].lexeme, r#""fac: ""#);
    }

    #[test]
    fn char_literal_accepts_more_than_one_inner_character() {
        let (tokens, errors) = Lexer::tokenize("'ab'");
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::CharLiteral);
        assert_eq!(tokens[0].lexeme, "'ab'");
    }

    #[test]
    fn char_literal_keeps_its_quotes_and_allows_empty_content() {
        let (tokens, errors) = Lexer::tokenize("''");
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::CharLiteral);
        assert_eq!(tokens[0].lexeme, "''");
    }

    #[test]
    fn unterminated_char_literal_is_an_error() {
        let (_, errors) = Lexer::tokenize("'ab");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind(), "lexical");
    }

    #[test]
    fn tracks_line_and_column() {
        let (tokens, _) = Lexer::tokenize("int\nx;");
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (2, 1));
    }
}
