use std::fmt::Display;

use cursor::{Cursor, Line, SourceRange};
use errors::{Diagnostic, Diagnostics};
use itertools::Itertools;
use log::{debug, trace};

mod keywords;
pub mod token;

pub use keywords::keyword;
pub use token::{Literal, Token, TokenKind};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ScanErrorType {
    #[error("Unexpected character: {0}")]
    UnexpectedCharacter(char),
    #[error("Unterminated string.")]
    UnterminatedString,
    #[error("Unterminated block comment.")]
    UnterminatedBlockComment,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("[line {line}] Error: {error}")]
pub struct ScanError {
    pub error: ScanErrorType,
    pub line: Line,
    /// Byte offset where the offending lexeme starts.
    pub position: usize,
}

impl From<ScanError> for Diagnostic {
    fn from(e: ScanError) -> Self {
        Diagnostic::new(e.line, e.position, "", e.error)
    }
}

#[derive(thiserror::Error, Debug, Clone, Default, PartialEq)]
pub struct ScanErrors(pub Vec<ScanError>);

impl ScanErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for ScanErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join("\n"))
    }
}

impl From<ScanErrors> for Diagnostics {
    fn from(errors: ScanErrors) -> Self {
        errors.0.into_iter().map(Diagnostic::from).collect()
    }
}

/// Output of a full scan. `tokens` always ends with exactly one `Eof` token,
/// even if `errors` is not empty.
#[derive(Debug, PartialEq)]
pub struct Scanned<'a> {
    pub tokens: Vec<Token<'a>>,
    pub errors: ScanErrors,
}

impl<'a> Scanned<'a> {
    pub fn into_result(self) -> Result<Vec<Token<'a>>, ScanErrors> {
        if self.errors.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.errors)
        }
    }
}

pub fn scan(source: &str) -> Scanned<'_> {
    Scanner::new(source).scan_tokens()
}

pub struct Scanner<'a> {
    start: Cursor<'a>,
    cursor: Cursor<'a>,
    tokens: Vec<Token<'a>>,
    errors: ScanErrors,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            start: Cursor::new(source),
            cursor: Cursor::new(source),
            tokens: Vec::new(),
            errors: ScanErrors::default(),
        }
    }

    fn lexeme(&self) -> &'a str {
        self.start.slice_until(&self.cursor)
    }

    fn add_token(&mut self, kind: TokenKind) {
        self.push(Token::new(kind, (self.start.clone(), self.cursor.clone())));
    }

    fn add_literal_token(&mut self, kind: TokenKind, literal: Literal<'a>) {
        self.push(Token::new(kind, (self.start.clone(), self.cursor.clone())).with_literal(literal));
    }

    fn push(&mut self, token: Token<'a>) {
        trace!("Scanned {} {:?} at line {}", token.kind, token.lexeme(), token.line());
        self.tokens.push(token);
    }

    fn error(&mut self, error: ScanErrorType) {
        trace!("Scan error at line {}: {}", self.start.line(), error);
        self.errors.0.push(ScanError {
            error,
            line: self.start.line(),
            position: self.start.offset(),
        });
    }

    fn consume_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.cursor.peek().is_some_and(&predicate) {
            self.cursor.next();
        }
    }

    pub fn scan_tokens(mut self) -> Scanned<'a> {
        use TokenKind::*;

        loop {
            self.start = self.cursor.clone();
            let Some(c) = self.cursor.next() else {
                break;
            };

            match c {
                '(' => self.add_token(LeftParen),
                ')' => self.add_token(RightParen),
                '{' => self.add_token(LeftBrace),
                '}' => self.add_token(RightBrace),
                ',' => self.add_token(Comma),
                '.' => self.add_token(Dot),
                '-' => self.add_token(Minus),
                '+' => self.add_token(Plus),
                ';' => self.add_token(Semicolon),
                '*' => self.add_token(Star),

                '!' => {
                    let kind = if self.cursor.next_if_eq('=') { BangEqual } else { Bang };
                    self.add_token(kind)
                }

                '=' => {
                    let kind = if self.cursor.next_if_eq('=') { EqualEqual } else { Equal };
                    self.add_token(kind)
                }

                '<' => {
                    let kind = if self.cursor.next_if_eq('=') { LessEqual } else { Less };
                    self.add_token(kind)
                }

                '>' => {
                    let kind = if self.cursor.next_if_eq('=') { GreaterEqual } else { Greater };
                    self.add_token(kind)
                }

                '/' => {
                    if self.cursor.next_if_eq('/') {
                        self.consume_while(|c| c != '\n');
                    } else if self.cursor.next_if_eq('*') {
                        self.block_comment();
                    } else {
                        self.add_token(Slash)
                    }
                }

                '"' => self.string(),

                d if d.is_ascii_digit() => self.number(),

                c if c.is_alphabetic() || c == '_' => self.identifier(),

                // The cursor does the line counting for '\n'
                ' ' | '\r' | '\t' | '\n' => (),

                c => self.error(ScanErrorType::UnexpectedCharacter(c)),
            }
        }

        self.start = self.cursor.clone();
        self.add_token(Eof);

        debug!(
            "Scanned {} tokens with {} errors",
            self.tokens.len(),
            self.errors.0.len()
        );

        Scanned { tokens: self.tokens, errors: self.errors }
    }

    fn block_comment(&mut self) {
        let mut depth = 1;
        while depth > 0 {
            match self.cursor.next() {
                Some('/') if self.cursor.next_if_eq('*') => depth += 1,
                Some('*') if self.cursor.next_if_eq('/') => depth -= 1,
                Some(_) => (),
                None => return self.error(ScanErrorType::UnterminatedBlockComment),
            }
        }
    }

    fn string(&mut self) {
        let content_start = self.cursor.clone();
        loop {
            match self.cursor.peek() {
                Some('"') => break,
                Some('\\') => {
                    self.cursor.next();
                    self.cursor.next();
                }
                Some(_) => {
                    self.cursor.next();
                }
                None => return self.error(ScanErrorType::UnterminatedString),
            }
        }

        let range = SourceRange::new(content_start, self.cursor.clone());
        self.cursor.next(); // closing quote

        let content = range.lexeme();
        self.push(Token::new(TokenKind::String, range).with_literal(Literal::Str(content)));
    }

    fn number(&mut self) {
        self.consume_while(|c| c.is_ascii_digit());

        if self.cursor.peek() == Some('.')
            && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            self.cursor.next();
            self.consume_while(|c| c.is_ascii_digit());
        }

        // Digits with an optional digit fraction always parse as f64.
        let value = self.lexeme().parse().unwrap_or(f64::NAN);
        self.add_literal_token(TokenKind::Number, Literal::Number(value));
    }

    fn identifier(&mut self) {
        self.consume_while(|c| c.is_alphanumeric() || c == '_' || c == '-');

        match keyword(self.lexeme()) {
            Some(TokenKind::True) => self.add_literal_token(TokenKind::True, Literal::Bool(true)),
            Some(TokenKind::False) => {
                self.add_literal_token(TokenKind::False, Literal::Bool(false))
            }
            Some(kind) => self.add_token(kind),
            None => self.add_token(TokenKind::Identifier),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use TokenKind::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        scan(source).tokens.iter().map(|t| t.kind).collect()
    }

    fn summary<'a>(tokens: &[Token<'a>]) -> Vec<(TokenKind, &'a str, usize)> {
        tokens.iter().map(|t| (t.kind, t.lexeme(), t.line().0)).collect()
    }

    #[test]
    fn punctuation() {
        assert_eq!(
            kinds("( ( ) ) { }"),
            vec![LeftParen, LeftParen, RightParen, RightParen, LeftBrace, RightBrace, Eof]
        );
        assert_eq!(
            kinds("=(){},.-+;*/!<>"),
            vec![
                Equal, LeftParen, RightParen, LeftBrace, RightBrace, Comma, Dot, Minus, Plus,
                Semicolon, Star, Slash, Bang, Less, Greater, Eof
            ]
        );
    }

    #[test]
    fn operators() {
        assert_eq!(
            kinds("!*+-/=<> <= =="),
            vec![
                Bang, Star, Plus, Minus, Slash, Equal, Less, Greater, LessEqual, EqualEqual, Eof
            ]
        );
    }

    #[test]
    fn two_char_tokens() {
        let tokens = scan("! != = == < <= > >=").into_result().unwrap();
        assert_eq!(
            tokens.iter().map(|t| (t.kind, t.lexeme(), t.length())).collect::<Vec<_>>(),
            vec![
                (Bang, "!", 1),
                (BangEqual, "!=", 2),
                (Equal, "=", 1),
                (EqualEqual, "==", 2),
                (Less, "<", 1),
                (LessEqual, "<=", 2),
                (Greater, ">", 1),
                (GreaterEqual, ">=", 2),
                (Eof, "", 0),
            ]
        );
    }

    #[test]
    fn numbers() {
        let tokens = scan("0123.1223").into_result().unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, Number);
        assert_eq!(tokens[0].lexeme(), "0123.1223");
        assert_eq!(tokens[0].literal, Some(Literal::Number(123.1223)));

        let tokens = scan("123 1225 12.356").into_result().unwrap();
        assert_eq!(
            tokens.iter().filter_map(|t| t.literal).collect::<Vec<_>>(),
            vec![Literal::Number(123.0), Literal::Number(1225.0), Literal::Number(12.356)]
        );

        assert_eq!(kinds("12."), vec![Number, Dot, Eof]);
        assert_eq!(kinds("1.2.3"), vec![Number, Dot, Number, Eof]);
    }

    #[test]
    fn every_number_lexeme_carries_a_value() {
        let source = "000 99999999999999999999999999.5 1.2e3";
        let scanned = scan(source);
        assert!(scanned.errors.is_empty());
        assert_eq!(kinds(source), vec![Number, Number, Number, Identifier, Eof]);
        for token in scanned.tokens.iter().filter(|t| t.kind == Number) {
            let Some(Literal::Number(n)) = token.literal else { panic!("{token:?}") };
            assert!(n.is_finite(), "{}", token.lexeme());
        }
        assert_eq!(scanned.tokens[2].literal, Some(Literal::Number(1.2)));
    }

    #[test]
    fn keywords_and_identifiers() {
        let tokens = scan("and  and_and").into_result().unwrap();
        assert_eq!(summary(&tokens), vec![(And, "and", 1), (Identifier, "and_and", 1), (Eof, "", 1)]);

        assert_eq!(
            kinds("class class_class else else_else false false_false for for_for"),
            vec![
                Class, Identifier, Else, Identifier, False, Identifier, For, Identifier, Eof
            ]
        );
        assert_eq!(
            kinds("fun if nil or print return super this true var while"),
            vec![Fun, If, Nil, Or, Print, Return, Super, This, True, Var, While, Eof]
        );

        let tokens = scan("_private iden_ti-fier x2").into_result().unwrap();
        assert_eq!(
            tokens.iter().map(|t| t.lexeme()).collect::<Vec<_>>(),
            vec!["_private", "iden_ti-fier", "x2", ""]
        );

        let tokens = scan("true false nil").into_result().unwrap();
        assert_eq!(
            tokens.iter().map(|t| t.literal).collect::<Vec<_>>(),
            vec![Some(Literal::Bool(true)), Some(Literal::Bool(false)), None, None]
        );
    }

    #[test]
    fn string_literals() {
        let tokens = scan("\"hello world\"").into_result().unwrap();
        assert_eq!(tokens[0].kind, String);
        assert_eq!(tokens[0].lexeme(), "hello world");
        assert_eq!(tokens[0].literal, Some(Literal::Str("hello world")));
        assert_eq!((tokens[0].position(), tokens[0].length()), (1, 11));

        let tokens = scan("\"a \\\" b\" c").into_result().unwrap();
        assert_eq!(summary(&tokens), vec![(String, "a \\\" b", 1), (Identifier, "c", 1), (Eof, "", 1)]);

        let scanned = scan("\"hello world");
        assert_eq!(
            scanned.errors,
            ScanErrors(vec![ScanError {
                error: ScanErrorType::UnterminatedString,
                line: Line(1),
                position: 0,
            }])
        );
        assert_eq!(kinds("\"hello world"), vec![Eof]);
    }

    #[test]
    fn multi_line_strings_advance_the_line() {
        let tokens = scan("\"first\nsecond\n\nlast\" after").into_result().unwrap();
        assert_eq!(
            summary(&tokens),
            vec![(String, "first\nsecond\n\nlast", 1), (Identifier, "after", 4), (Eof, "", 4)]
        );
    }

    #[test]
    fn comments() {
        let tokens = scan("a // comment\nb").into_result().unwrap();
        assert_eq!(summary(&tokens), vec![(Identifier, "a", 1), (Identifier, "b", 2), (Eof, "", 2)]);

        let tokens = scan("a /* one\ntwo */ b").into_result().unwrap();
        assert_eq!(summary(&tokens), vec![(Identifier, "a", 1), (Identifier, "b", 2), (Eof, "", 2)]);

        let tokens = scan("/* outer /* inner\n */ still outer\n */ x").into_result().unwrap();
        assert_eq!(summary(&tokens), vec![(Identifier, "x", 3), (Eof, "", 3)]);

        let tokens = scan("/* /* /* deep */ */ */ 1").into_result().unwrap();
        assert_eq!(summary(&tokens), vec![(Number, "1", 1), (Eof, "", 1)]);
    }

    #[test]
    fn unterminated_block_comment() {
        let scanned = scan("1 /* never\nclosed /* */");
        assert_eq!(
            scanned.errors,
            ScanErrors(vec![ScanError {
                error: ScanErrorType::UnterminatedBlockComment,
                line: Line(1),
                position: 2,
            }])
        );
        assert_eq!(summary(&scanned.tokens), vec![(Number, "1", 1), (Eof, "", 2)]);
    }

    #[test]
    fn errors_accumulate() {
        let scanned = scan("@ 1\n# 2");
        assert_eq!(
            scanned.errors,
            ScanErrors(vec![
                ScanError {
                    error: ScanErrorType::UnexpectedCharacter('@'),
                    line: Line(1),
                    position: 0,
                },
                ScanError {
                    error: ScanErrorType::UnexpectedCharacter('#'),
                    line: Line(2),
                    position: 4,
                },
            ])
        );
        assert_eq!(summary(&scanned.tokens), vec![(Number, "1", 1), (Number, "2", 2), (Eof, "", 2)]);
        assert_eq!(
            scanned.errors.to_string(),
            "[line 1] Error: Unexpected character: @\n[line 2] Error: Unexpected character: #"
        );
    }

    #[test]
    fn eof_is_always_last() {
        for source in ["", "\n\n", "1 + 2", "\"open", "/* open", "@", "a // trailing"] {
            let tokens = scan(source).tokens;
            let eof = tokens.last().unwrap();
            assert_eq!(eof.kind, Eof, "{source:?}");
            assert_eq!(eof.length(), 0, "{source:?}");
            assert_eq!(eof.position(), source.len(), "{source:?}");
            assert_eq!(tokens.iter().filter(|t| t.kind == Eof).count(), 1, "{source:?}");
            assert!(
                tokens.windows(2).all(|w| w[0].line() <= w[1].line()),
                "lines must not decrease for {source:?}"
            );
        }
    }

    #[test]
    fn mixed_source() {
        let source = concat!(
            "/* outer /* inner\n",
            "*/ still comment */\n",
            "(( )){} // grouping\n",
            "!*+-/=<> <= ==\n",
            "12.356 identifier = \"Fooo\"\n",
            "\"multi\n",
            "line\" class_class\n",
            "0123.1223",
        );
        let tokens = scan(source).into_result().unwrap();
        assert_eq!(
            summary(&tokens),
            vec![
                (LeftParen, "(", 3),
                (LeftParen, "(", 3),
                (RightParen, ")", 3),
                (RightParen, ")", 3),
                (LeftBrace, "{", 3),
                (RightBrace, "}", 3),
                (Bang, "!", 4),
                (Star, "*", 4),
                (Plus, "+", 4),
                (Minus, "-", 4),
                (Slash, "/", 4),
                (Equal, "=", 4),
                (Less, "<", 4),
                (Greater, ">", 4),
                (LessEqual, "<=", 4),
                (EqualEqual, "==", 4),
                (Number, "12.356", 5),
                (Identifier, "identifier", 5),
                (Equal, "=", 5),
                (String, "Fooo", 5),
                (String, "multi\nline", 6),
                (Identifier, "class_class", 7),
                (Number, "0123.1223", 8),
                (Eof, "", 8),
            ]
        );
    }

    #[test]
    fn into_diagnostics() {
        let errors = scan("1 ~").errors;
        let diagnostics = Diagnostics::from(errors);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].position, 2);
        assert_eq!(diagnostics[0].to_string(), "[line 1] Error: Unexpected character: ~");
    }
}
