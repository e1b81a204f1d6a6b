use itertools::Itertools;
use scanner::Token;

use crate::{Expr, Visitor};

/// Prefix rendering with explicit parentheses, e.g. `(+ 1 (* 2 3))`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AstPrinter;

impl AstPrinter {
    pub fn render(&self, expr: &Expr<'_>) -> String {
        expr.accept(self)
    }

    fn parenthesize(&self, name: &str, exprs: &[&Expr<'_>]) -> String {
        format!("({} {})", name, exprs.iter().map(|e| e.accept(self)).join(" "))
    }
}

impl<'a> Visitor<'a> for AstPrinter {
    type Output = String;

    fn visit_binary(&self, left: &Expr<'a>, operator: &Token<'a>, right: &Expr<'a>) -> String {
        self.parenthesize(operator.lexeme(), &[left, right])
    }

    fn visit_grouping(&self, inner: &Expr<'a>) -> String {
        self.parenthesize("group", &[inner])
    }

    fn visit_literal(&self, value: &Token<'a>) -> String {
        value.to_string()
    }

    fn visit_unary(&self, operator: &Token<'a>, right: &Expr<'a>) -> String {
        self.parenthesize(operator.lexeme(), &[right])
    }
}

/// Reverse Polish rendering: operands first, operator last, e.g. `1 2 3 * +`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RpnPrinter;

impl RpnPrinter {
    pub fn render(&self, expr: &Expr<'_>) -> String {
        expr.accept(self)
    }

    fn postfix(&self, name: &str, exprs: &[&Expr<'_>]) -> String {
        exprs.iter().map(|e| e.accept(self)).chain(std::iter::once(name.to_string())).join(" ")
    }
}

impl<'a> Visitor<'a> for RpnPrinter {
    type Output = String;

    fn visit_binary(&self, left: &Expr<'a>, operator: &Token<'a>, right: &Expr<'a>) -> String {
        self.postfix(operator.lexeme(), &[left, right])
    }

    fn visit_grouping(&self, inner: &Expr<'a>) -> String {
        self.postfix("group", &[inner])
    }

    fn visit_literal(&self, value: &Token<'a>) -> String {
        value.to_string()
    }

    fn visit_unary(&self, operator: &Token<'a>, right: &Expr<'a>) -> String {
        self.postfix(operator.lexeme(), &[right])
    }
}
