//! Source positions: byte spans, file identifiers, and a source map that
//! turns byte offsets back into line/column pairs for diagnostics.

use std::sync::Arc;

/// Identifies one loaded source file. `nanoc` compiles a single file per
/// invocation, but `FileId` keeps the door open for the driver to load more
/// than one without touching the lexer/parser/analyzer signatures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct FileId(pub u32);

impl FileId {
    pub const fn new(id: u32) -> Self {
        FileId(id)
    }
}

/// A half-open byte range `[start, end)` into a source file, plus the
/// 1-based line/column of its first byte (recomputing line/column from a
/// byte offset on every use would mean re-scanning the file per token).
///
/// # Examples
///
/// ```
/// use nanoc_util::span::{FileId, Span};
///
/// let a = Span::new(0, 3, 1, 1, FileId::new(0));
/// let b = Span::new(3, 6, 1, 4, FileId::new(0));
/// let merged = a.merge(b);
/// assert_eq!((merged.start, merged.end), (0, 6));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: u32,
    pub end: u32,
    pub line: u32,
    pub column: u32,
    pub file_id: FileId,
}

impl Span {
    pub const DUMMY: Span = Span {
        start: 0,
        end: 0,
        line: 0,
        column: 0,
        file_id: FileId(0),
    };

    pub fn new(start: u32, end: u32, line: u32, column: u32, file_id: FileId) -> Self {
        debug_assert!(start <= end, "span start {start} must not exceed end {end}");
        Span {
            start,
            end,
            line,
            column,
            file_id,
        }
    }

    /// A zero-width span at a single position, used for errors that point
    /// at "the next token" rather than a recognized range (e.g. unexpected
    /// EOF).
    pub fn point(offset: u32, line: u32, column: u32, file_id: FileId) -> Self {
        Span::new(offset, offset, line, column, file_id)
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The smallest span covering both `self` and `other`. Panics (in debug
    /// builds) if they belong to different files — merging across files is
    /// always a caller bug for a single-file compiler.
    pub fn merge(&self, other: Span) -> Span {
        debug_assert_eq!(self.file_id, other.file_id);
        let (first, _) = if self.start <= other.start {
            (self, other)
        } else {
            (&other, *self)
        };
        Span::new(
            self.start.min(other.start),
            self.end.max(other.end),
            first.line,
            first.column,
            self.file_id,
        )
    }
}

/// One loaded source file: its name, its text, and precomputed line start
/// offsets so `SourceMap::line_col_for` is O(log n) instead of a rescan.
#[derive(Clone)]
pub struct SourceFile {
    id: FileId,
    name: String,
    content: Arc<str>,
    line_starts: Vec<u32>,
}

impl SourceFile {
    pub fn new(id: FileId, name: impl Into<String>, content: impl Into<Arc<str>>) -> Self {
        let content = content.into();
        let mut line_starts = vec![0u32];
        for (offset, byte) in content.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(offset as u32 + 1);
            }
        }
        SourceFile {
            id,
            name: name.into(),
            content,
            line_starts,
        }
    }

    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// 1-based `(line, column)` for a byte offset into this file.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line_start = self.line_starts[line_idx];
        (line_idx as u32 + 1, offset - line_start + 1)
    }

    /// The text of the line a span starts on, without its trailing newline,
    /// for displaying a source snippet alongside a diagnostic.
    pub fn line_text(&self, line: u32) -> &str {
        let idx = (line - 1) as usize;
        let start = self.line_starts[idx] as usize;
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&s| s as usize - 1)
            .unwrap_or(self.content.len());
        self.content[start..end].trim_end_matches('\r')
    }
}

/// Owns every loaded source file for one compilation session.
#[derive(Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

impl SourceMap {
    pub fn new() -> Self {
        SourceMap { files: Vec::new() }
    }

    pub fn add_file(&mut self, name: impl Into<String>, content: impl Into<Arc<str>>) -> FileId {
        let id = FileId::new(self.files.len() as u32);
        self.files.push(SourceFile::new(id, name, content));
        id
    }

    pub fn get(&self, id: FileId) -> &SourceFile {
        &self.files[id.0 as usize]
    }
}
