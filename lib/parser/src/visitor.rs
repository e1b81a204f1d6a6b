use scanner::Token;

use crate::Expr;

/// One operation per expression variant. `Expr::accept` picks the operation,
/// the implementor picks what to produce.
pub trait Visitor<'a> {
    type Output;

    fn visit_binary(&self, left: &Expr<'a>, operator: &Token<'a>, right: &Expr<'a>) -> Self::Output;
    fn visit_grouping(&self, inner: &Expr<'a>) -> Self::Output;
    fn visit_literal(&self, value: &Token<'a>) -> Self::Output;
    fn visit_unary(&self, operator: &Token<'a>, right: &Expr<'a>) -> Self::Output;
}

impl<'a> Expr<'a> {
    pub fn accept<V: Visitor<'a>>(&self, visitor: &V) -> V::Output {
        match self {
            Expr::Binary { left, operator, right } => visitor.visit_binary(left, operator, right),
            Expr::Grouping(inner) => visitor.visit_grouping(inner),
            Expr::Literal(value) => visitor.visit_literal(value),
            Expr::Unary { operator, right } => visitor.visit_unary(operator, right),
        }
    }
}
