//! Character cursor for traversing source code.
//!
//! Tracks byte position plus 1-based line/column as it walks the source,
//! so every token the lexer produces already knows where it started.

/// A cursor over a source string, advancing one character at a time.
///
/// # Examples
///
/// ```
/// use nanoc_lex::cursor::Cursor;
///
/// let mut cursor = Cursor::new("int x;");
/// assert_eq!(cursor.current_char(), 'i');
/// cursor.advance();
/// assert_eq!(cursor.current_char(), 'n');
/// ```
pub struct Cursor<'a> {
    source: &'a str,
    position: usize,
    line: u32,
    column: u32,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Cursor {
            source,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// The character at the cursor, or `'\0'` at end of input.
    #[inline]
    pub fn current_char(&self) -> char {
        self.char_at(0)
    }

    /// The character `offset` bytes ahead of the cursor, or `'\0'` past the
    /// end. `offset` is a byte count, not a character count — fine for the
    /// one- and two-character lookahead this lexer ever needs.
    #[inline]
    pub fn char_at(&self, offset: usize) -> char {
        let pos = self.position + offset;
        if pos >= self.source.len() {
            return '\0';
        }
        let byte = self.source.as_bytes()[pos];
        if byte < 128 {
            byte as char
        } else {
            self.source[pos..].chars().next().unwrap_or('\0')
        }
    }

    #[inline]
    pub fn peek_char(&self, offset: usize) -> char {
        self.char_at(offset)
    }

    /// Advance one character, updating line/column bookkeeping.
    #[inline]
    pub fn advance(&mut self) {
        if self.position >= self.source.len() {
            return;
        }
        let byte = self.source.as_bytes()[self.position];
        let len = if byte < 128 {
            1
        } else {
            self.source[self.position..]
                .chars()
                .next()
                .map(char::len_utf8)
                .unwrap_or(1)
        };
        let consumed = self.current_char();
        self.position += len;
        if consumed == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    pub fn position(&self) -> u32 {
        self.position as u32
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_line_and_column_across_newlines() {
        let mut cursor = Cursor::new("a\nb");
        assert_eq!((cursor.line(), cursor.column()), (1, 1));
        cursor.advance();
        assert_eq!((cursor.line(), cursor.column()), (1, 2));
        cursor.advance();
        assert_eq!((cursor.line(), cursor.column()), (2, 1));
    }

    #[test]
    fn returns_nul_past_end() {
        let mut cursor = Cursor::new("a");
        cursor.advance();
        assert!(cursor.is_at_end());
        assert_eq!(cursor.current_char(), '\0');
    }
}
