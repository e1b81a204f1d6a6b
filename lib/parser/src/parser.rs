mod expr;
mod printer;
mod visitor;

use std::fmt::Display;

use errors::{Diagnostic, Diagnostics};
use itertools::Itertools;
use log::{debug, trace};
use scanner::{Token, TokenKind};

pub use expr::Expr;
pub use printer::{AstPrinter, RpnPrinter};
pub use visitor::Visitor;

use TokenKind::*;

/// Token kinds `primary` can start with.
const PRIMARY: &[TokenKind] = &[False, True, Nil, String, Number, LeftParen];

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParseErrorType {
    #[error("Expect ')' after {0}.")]
    ExpectedRightParen(&'static str),
    #[error("Expect ')' to close group.")]
    UnclosedGroup,
    #[error("Expect expression, found end of grammar. Expected one of: {}.", .0.iter().join(", "))]
    ExpectedExpression(&'static [TokenKind]),
    #[error("Expect end of expression.")]
    ExpectedEnd,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError<'a> {
    pub error: ParseErrorType,
    /// The token the parser was looking at.
    pub token: Token<'a>,
    /// Index of `token` in the token sequence.
    pub head: usize,
    /// Where the parser resumed after synchronizing, for fatal errors.
    pub synced_to: Option<Token<'a>>,
}

fn location(token: &Token) -> std::string::String {
    match token.kind {
        Eof => "end".to_string(),
        _ => format!("'{}'", token.lexeme()),
    }
}

impl<'a> From<&ParseError<'a>> for Diagnostic {
    fn from(e: &ParseError<'a>) -> Self {
        let diagnostic = Diagnostic::new(e.token.line(), e.head, location(&e.token), &e.error);
        match &e.synced_to {
            Some(token) => diagnostic.with_synced_to(location(token)),
            None => diagnostic,
        }
    }
}

impl Display for ParseError<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Diagnostic::from(self))
    }
}

impl std::error::Error for ParseError<'_> {}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseErrors<'a>(pub Vec<ParseError<'a>>);

impl ParseErrors<'_> {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for ParseErrors<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join("\n"))
    }
}

impl From<&ParseErrors<'_>> for Diagnostics {
    fn from(errors: &ParseErrors<'_>) -> Self {
        errors.0.iter().map(Diagnostic::from).collect()
    }
}

/// Broken parser invariants. Never caused by bad input.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum InternalError {
    #[error("cursor {head} is outside of the token buffer (length {len})")]
    CursorOutOfBounds { head: usize, len: usize },
    #[error("no token has been consumed yet")]
    NothingConsumed,
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error<'a> {
    /// Every diagnostic collected up to and including the fatal one.
    #[error("{0}")]
    Syntax(ParseErrors<'a>),
    #[error("internal parser error: {0}")]
    Internal(#[from] InternalError),
}

/// Aborts the current derivation.
#[derive(Debug)]
enum Fatal<'a> {
    Syntax(ParseError<'a>),
    Internal(InternalError),
}

impl From<InternalError> for Fatal<'_> {
    fn from(e: InternalError) -> Self {
        Fatal::Internal(e)
    }
}

type Result<'a, T> = std::result::Result<T, Fatal<'a>>;

/// A successful parse. `diagnostics` holds recoverable errors, e.g. a missing
/// `)` that was patched over by keeping the partial grouping.
#[derive(Debug, PartialEq)]
pub struct Parsed<'a> {
    pub expr: Expr<'a>,
    pub diagnostics: ParseErrors<'a>,
}

#[derive(Debug)]
pub struct Parser<'a> {
    tokens: &'a [Token<'a>],
    head: usize,
    open_groups: usize,
    diagnostics: Vec<ParseError<'a>>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token<'a>]) -> Self {
        Self { tokens, head: 0, open_groups: 0, diagnostics: Vec::new() }
    }

    pub fn parse(mut self) -> std::result::Result<Parsed<'a>, Error<'a>> {
        match self.expression() {
            Ok(expr) => {
                if !self.is_at_end()? {
                    self.record(ParseErrorType::ExpectedEnd)?;
                }
                Ok(Parsed { expr, diagnostics: ParseErrors(self.diagnostics) })
            }
            Err(Fatal::Syntax(mut error)) => {
                trace!("Hit error: {:?}, syncing...", error.error);
                self.synchronize()?;
                let synced_to = self.current()?;
                debug!("Synchronized up to {} {:?}", synced_to.kind, synced_to.lexeme());
                error.synced_to = Some(synced_to.clone());
                self.diagnostics.push(error);
                Err(Error::Syntax(ParseErrors(self.diagnostics)))
            }
            Err(Fatal::Internal(e)) => Err(e.into()),
        }
    }

    // expression → equality
    fn expression(&mut self) -> Result<'a, Expr<'a>> {
        self.equality()
    }

    // equality → comparison ( ( "!=" | "==" ) comparison )*
    fn equality(&mut self) -> Result<'a, Expr<'a>> {
        let mut expr = self.comparison()?;

        while let Some(operator) = self.advance_if(&[BangEqual, EqualEqual])? {
            let right = self.comparison()?;
            expr = Expr::binary(expr, operator.clone(), right);
        }
        Ok(expr)
    }

    // comparison → addition ( ( "<" | "<=" | ">" | ">=" ) addition )*
    fn comparison(&mut self) -> Result<'a, Expr<'a>> {
        let mut expr = self.addition()?;

        while let Some(operator) = self.advance_if(&[Less, LessEqual, Greater, GreaterEqual])? {
            let right = self.addition()?;
            expr = Expr::binary(expr, operator.clone(), right);
        }
        Ok(expr)
    }

    // addition → multiplication ( ( "-" | "+" ) multiplication )*
    fn addition(&mut self) -> Result<'a, Expr<'a>> {
        let mut expr = self.multiplication()?;

        while let Some(operator) = self.advance_if(&[Minus, Plus])? {
            let right = self.multiplication()?;
            expr = Expr::binary(expr, operator.clone(), right);
        }
        Ok(expr)
    }

    // multiplication → unary ( ( "/" | "*" ) unary )*
    fn multiplication(&mut self) -> Result<'a, Expr<'a>> {
        let mut expr = self.unary()?;

        while let Some(operator) = self.advance_if(&[Slash, Star])? {
            let right = self.unary()?;
            expr = Expr::binary(expr, operator.clone(), right);
        }
        Ok(expr)
    }

    // unary → ( "!" | "-" ) unary | primary
    fn unary(&mut self) -> Result<'a, Expr<'a>> {
        if let Some(operator) = self.advance_if(&[Bang, Minus])? {
            let right = self.unary()?;
            return Ok(Expr::unary(operator.clone(), right));
        }
        self.primary()
    }

    // primary → NUMBER | STRING | "true" | "false" | "nil" | "(" expression ")"
    fn primary(&mut self) -> Result<'a, Expr<'a>> {
        if let Some(token) = self.advance_if(&[False, True, Nil, String, Number])? {
            trace!("Parsed literal {}", token);
            return Ok(Expr::Literal(token.clone()));
        }

        if self.advance_if(&[LeftParen])?.is_some() {
            self.open_groups += 1;
            let inner = self.expression();
            self.open_groups -= 1;
            let inner = inner?;

            if self.advance_if(&[RightParen])?.is_none() {
                self.record(ParseErrorType::ExpectedRightParen("expression"))?;
            }
            return Ok(Expr::grouping(inner));
        }

        // Running out of tokens inside a group is reported as the unclosed
        // group rather than as a missing operand.
        let error = if self.is_at_end()? && self.open_groups > 0 {
            match self.previous()?.kind {
                LeftParen => ParseErrorType::UnclosedGroup,
                _ => ParseErrorType::ExpectedRightParen("expression"),
            }
        } else {
            ParseErrorType::ExpectedExpression(PRIMARY)
        };
        Err(Fatal::Syntax(self.error_here(error)?))
    }

    /// Skips to the next statement boundary so parsing can resume there. The
    /// boundary keyword itself is left behind the cursor.
    fn synchronize(&mut self) -> std::result::Result<(), InternalError> {
        self.advance()?;
        while !self.is_at_end()? {
            if self.previous()?.kind.is_statement_boundary() {
                return Ok(());
            }
            self.advance()?;
        }
        Ok(())
    }

    fn error_here(&self, error: ParseErrorType) -> std::result::Result<ParseError<'a>, InternalError> {
        Ok(ParseError { error, token: self.current()?.clone(), head: self.head, synced_to: None })
    }

    fn record(&mut self, error: ParseErrorType) -> std::result::Result<(), InternalError> {
        let error = self.error_here(error)?;
        trace!("Recording recoverable error: {:?}", error.error);
        self.diagnostics.push(error);
        Ok(())
    }
}

// Cursor helpers
impl<'a> Parser<'a> {
    fn current(&self) -> std::result::Result<&'a Token<'a>, InternalError> {
        self.tokens
            .get(self.head)
            .ok_or(InternalError::CursorOutOfBounds { head: self.head, len: self.tokens.len() })
    }

    fn previous(&self) -> std::result::Result<&'a Token<'a>, InternalError> {
        match self.head {
            0 => Err(InternalError::NothingConsumed),
            head => self
                .tokens
                .get(head - 1)
                .ok_or(InternalError::CursorOutOfBounds { head, len: self.tokens.len() }),
        }
    }

    fn is_at_end(&self) -> std::result::Result<bool, InternalError> {
        Ok(self.current()?.kind == Eof)
    }

    /// Moves past the current token and returns it. The cursor never moves
    /// past `Eof`.
    fn advance(&mut self) -> std::result::Result<&'a Token<'a>, InternalError> {
        let token = self.current()?;
        if token.kind != Eof {
            self.head += 1;
        }
        Ok(token)
    }

    fn advance_if(
        &mut self,
        kinds: &[TokenKind],
    ) -> std::result::Result<Option<&'a Token<'a>>, InternalError> {
        let token = self.current()?;
        if kinds.contains(&token.kind) {
            self.advance()?;
            Ok(Some(token))
        } else {
            Ok(None)
        }
    }
}
