use std::{fmt::Formatter, str::Chars};

mod source_range;
pub use source_range::*;

/// Position inside a source text. Iterating yields the characters of the
/// source while keeping track of the current line.
#[derive(Clone)]
pub struct Cursor<'a> {
    source: &'a str,
    chars: Chars<'a>,
    line: Line,
}

impl<'a> std::fmt::Debug for Cursor<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // Printing source and chars is usually too verbose, so by default
        // we only print line/offset
        if f.alternate() {
            f.debug_struct("Cursor")
                .field("line", &self.line)
                .field("offset", &self.offset())
                .field("source", &self.source)
                .finish()
        } else {
            f.debug_struct("Cursor")
                .field("line", &self.line)
                .field("offset", &self.offset())
                .finish()
        }
    }
}

impl<'a> PartialEq for Cursor<'a> {
    fn eq(&self, other: &Self) -> bool {
        (self.source, self.chars.as_str()) == (other.source, other.chars.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, derive_more::Display)]
pub struct Line(pub usize);

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, chars: source.chars(), line: Line(1) }
    }

    pub fn line(&self) -> Line {
        self.line
    }

    /// Byte offset of the cursor into the source.
    pub fn offset(&self) -> usize {
        self.source.len() - self.chars.as_str().len()
    }
}

impl<'a> From<&'a str> for Cursor<'a> {
    fn from(source: &'a str) -> Self {
        Self::new(source)
    }
}

impl<'a> Iterator for Cursor<'a> {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        let c = self.chars.next();
        if c == Some('\n') {
            self.line.0 += 1;
        }
        c
    }
}

impl<'a> Cursor<'a> {
    pub fn slice_until<'c>(&self, end: &'c Cursor<'a>) -> &'a str {
        assert!(self.source == end.source);
        &self.source[self.offset()..end.offset()]
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    pub fn peek_next(&self) -> Option<char> {
        self.chars.clone().nth(1)
    }

    /// Consumes the next character if it is `expected`.
    pub fn next_if_eq(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.next();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn slice_until() {
        let mut cursor: Cursor = "ab\ncd\n\n".into();

        cursor.next(); // 'a'

        let start = cursor.clone();

        cursor.next(); // 'b'
        cursor.next(); // '\n'
        cursor.next(); // 'c'

        assert_eq!(start.slice_until(&cursor), "b\nc");
        assert_eq!(start.slice_until(&start), "");
    }

    #[test]
    fn lines_and_offsets() {
        let source = "ab\ncd\n\n";
        let mut cursor = Cursor::new(source);

        assert_eq!(cursor.peek(), Some('a'));
        assert_eq!(cursor.peek_next(), Some('b'));
        assert_eq!(cursor.next(), Some('a'));
        assert_eq!((cursor.line(), cursor.offset()), (Line(1), 1));

        assert_eq!(cursor.next(), Some('b'));
        assert_eq!(cursor.next(), Some('\n'));
        assert_eq!((cursor.line(), cursor.offset()), (Line(2), 3));

        cursor.next(); // 'c'
        cursor.next(); // 'd'

        assert_eq!(cursor.next(), Some('\n'));
        assert_eq!(cursor.next(), Some('\n'));
        assert_eq!((cursor.line(), cursor.offset()), (Line(4), 7));

        assert_eq!(cursor.peek(), None);
        assert_eq!(cursor.next(), None);
        assert_eq!((cursor.line(), cursor.offset()), (Line(4), 7));

        cursor = "".into();
        assert_eq!(cursor.peek(), None);
        assert_eq!(cursor.peek_next(), None);
        assert_eq!(cursor.next(), None);
        assert_eq!((cursor.line(), cursor.offset()), (Line(1), 0));
    }

    #[test]
    fn next_if_eq() {
        let mut cursor = Cursor::new("=>");
        assert!(!cursor.next_if_eq('>'));
        assert!(cursor.next_if_eq('='));
        assert!(cursor.next_if_eq('>'));
        assert!(!cursor.next_if_eq('>'));
        assert_eq!(cursor.offset(), 2);
    }

    #[test]
    fn offsets_are_bytes() {
        let mut cursor = Cursor::new("äb");
        cursor.next();
        assert_eq!(cursor.offset(), 2);
        assert_eq!(cursor.peek(), Some('b'));
    }
}
