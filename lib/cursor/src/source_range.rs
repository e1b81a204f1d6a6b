use crate::{Cursor, Line};

/// A contiguous slice of the source, delimited by two cursors.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRange<'a> {
    start: Cursor<'a>,
    end: Cursor<'a>,
}

impl<'a> From<(Cursor<'a>, Cursor<'a>)> for SourceRange<'a> {
    fn from((start, end): (Cursor<'a>, Cursor<'a>)) -> Self {
        Self::new(start, end)
    }
}

impl<'a> SourceRange<'a> {
    pub fn new(start: Cursor<'a>, end: Cursor<'a>) -> Self {
        assert!(start.source == end.source);
        assert!(start.offset() <= end.offset());
        Self { start, end }
    }

    pub fn lexeme(&self) -> &'a str {
        self.start.slice_until(&self.end)
    }

    pub fn line(&self) -> Line {
        self.start.line()
    }

    pub fn position(&self) -> usize {
        self.start.offset()
    }

    pub fn len(&self) -> usize {
        self.end.offset() - self.start.offset()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
