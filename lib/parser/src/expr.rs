use std::fmt::{self, Display, Formatter};

use scanner::Token;

use crate::AstPrinter;

/// Expression tree. Built bottom-up by the parser and never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr<'a> {
    Binary { left: Box<Expr<'a>>, operator: Token<'a>, right: Box<Expr<'a>> },
    Grouping(Box<Expr<'a>>),
    Unary { operator: Token<'a>, right: Box<Expr<'a>> },
    /// Always a NUMBER, STRING, TRUE, FALSE or NIL token.
    Literal(Token<'a>),
}

impl<'a> Expr<'a> {
    pub fn binary(left: Expr<'a>, operator: Token<'a>, right: Expr<'a>) -> Self {
        Expr::Binary { left: Box::new(left), operator, right: Box::new(right) }
    }

    pub fn unary(operator: Token<'a>, right: Expr<'a>) -> Self {
        Expr::Unary { operator, right: Box::new(right) }
    }

    pub fn grouping(inner: Expr<'a>) -> Self {
        Expr::Grouping(Box::new(inner))
    }
}

impl Display for Expr<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", AstPrinter.render(self))
    }
}
