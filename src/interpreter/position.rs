use std::{fmt, rc::Rc};

/// A named piece of source text.
///
/// Every [`Position`] keeps a shared handle to the file it points into so that
/// diagnostics can quote the offending line long after lexing has finished.
#[derive(Debug)]
pub struct SourceFile {
    /// Display name, usually the path the text was read from.
    pub name:    String,
    /// The text that was lexed.
    pub text:    String,
    line_starts: Vec<usize>,
}

impl SourceFile {
    /// Wraps `text` under the display name `name`.
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Rc<Self> {
        let text: String = text.into();
        let line_starts = std::iter::once(0).chain(text.match_indices('\n').map(|(i, _)| i + 1))
                                            .collect();

        Rc::new(Self { name: name.into(),
                       text,
                       line_starts })
    }

    /// Returns the position of the byte offset `index`.
    ///
    /// `index` is clamped to the end of the text; line and column are
    /// zero-based and the column counts characters, not bytes.
    #[must_use]
    pub fn position(self: &Rc<Self>, index: usize) -> Position {
        let mut index = index.min(self.text.len());
        while !self.text.is_char_boundary(index) {
            index -= 1;
        }
        let line = self.line_starts.partition_point(|&start| start <= index) - 1;
        let column = self.text[self.line_starts[line]..index].chars().count();

        Position { source: Rc::clone(self),
                   index,
                   line,
                   column }
    }

    /// Returns the span covering the byte range `start..end`.
    #[must_use]
    pub fn span(self: &Rc<Self>, start: usize, end: usize) -> Span {
        Span { start: self.position(start),
               end:   self.position(end), }
    }

    /// Returns the text of the zero-based line `line` without its newline.
    #[must_use]
    pub fn line_text(&self, line: usize) -> &str {
        let Some(&start) = self.line_starts.get(line) else {
            return "";
        };
        let end = self.line_starts
                      .get(line + 1)
                      .map_or(self.text.len(), |next| next - 1);

        &self.text[start..end]
    }
}

/// A frozen location inside a [`SourceFile`].
///
/// Positions are cheap to clone and never change after creation, so tokens,
/// nodes, values and errors each keep their own independent copy.
#[derive(Clone)]
pub struct Position {
    /// The file this position points into.
    pub source: Rc<SourceFile>,
    /// Byte offset into the source text.
    pub index:  usize,
    /// Zero-based line number.
    pub line:   usize,
    /// Zero-based column, counted in characters.
    pub column: usize,
}

impl Position {
    /// Name of the file this position points into.
    #[must_use]
    pub fn file(&self) -> &str {
        &self.source.name
    }

    /// The full text of the line this position sits on.
    #[must_use]
    pub fn line_text(&self) -> &str {
        self.source.line_text(self.line)
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.source, &other.source) && self.index == other.index
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.source.name, self.line + 1, self.column + 1)
    }
}

/// A start/end pair of positions.
#[derive(Clone, Debug, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end:   Position,
}

impl Span {
    /// Creates a span from `start` to `end`.
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Returns a span running from the start of `self` to the end of `other`.
    #[must_use]
    pub fn to(&self, other: &Self) -> Self {
        Self { start: self.start.clone(),
               end:   other.end.clone(), }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_track_lines_and_columns() {
        let source = SourceFile::new("test.peri", "var x = 1\nvar é = 2\n");

        let pos = source.position(4);
        assert_eq!((pos.line, pos.column), (0, 4));

        let pos = source.position(10);
        assert_eq!((pos.line, pos.column), (1, 0));
        assert_eq!(pos.line_text(), "var é = 2");

        // the byte after the two-byte 'é' is the sixth character of the line
        let pos = source.position(16);
        assert_eq!((pos.line, pos.column), (1, 5));
    }

    #[test]
    fn positions_clamp_to_the_end_of_the_text() {
        let source = SourceFile::new("test.peri", "1");
        let pos = source.position(99);

        assert_eq!(pos.index, 1);
        assert_eq!(pos.column, 1);
    }
}
