use crate::expression::arena::ExprView;
use crate::expression::ast::{ExprKind, ExprRef};

impl<'a> ExprView<'a> {
    /// Canonical human rendering of the tree behind `expr`.
    pub fn render(&self, expr: ExprRef) -> String {
        let mut out = String::new();
        self.write_node(expr, &mut out);
        out
    }

    fn write_node(&self, expr: ExprRef, out: &mut String) {
        match self.node(expr).kind() {
            ExprKind::Literal(text) => out.push_str(text),
            ExprKind::Add(l, r) => self.write_binary(*l, " + ", *r, out),
            ExprKind::Sub(l, r) => self.write_binary(*l, " − ", *r, out),
            ExprKind::Mul(l, r) => self.write_binary(*l, " * ", *r, out),
            ExprKind::Div(l, r) => self.write_binary(*l, " / ", *r, out),
            ExprKind::Pow(l, r) => self.write_binary(*l, " ^ ", *r, out),
            ExprKind::NegPow(l, r) => self.write_binary(*l, " ^-", *r, out),
            ExprKind::MultiSqrtPow {
                radicals,
                base,
                exponent,
            } => {
                self.write_radicals(*radicals, out);
                self.write_binary(*base, " ^ ", *exponent, out);
            }
            ExprKind::NegMultiSqrtPow {
                radicals,
                base,
                exponent,
            } => {
                self.write_radicals(*radicals, out);
                self.write_binary(*base, " ^-", *exponent, out);
            }
            ExprKind::Factorial(child) => {
                self.write_tight(*child, out);
                out.push('!');
            }
            ExprKind::Sqrt(child) => {
                out.push('√');
                self.write_tight(*child, out);
            }
            ExprKind::DoubleSqrt(child) => {
                out.push_str("√√");
                self.write_tight(*child, out);
            }
        }
    }

    fn write_binary(&self, left: ExprRef, op: &str, right: ExprRef, out: &mut String) {
        self.write_operand(left, out);
        out.push_str(op);
        self.write_operand(right, out);
    }

    /// Operands of a binary operator are parenthesised iff they are
    /// themselves binary.
    fn write_operand(&self, expr: ExprRef, out: &mut String) {
        if self.node(expr).kind().is_binary() {
            out.push('(');
            self.write_node(expr, out);
            out.push(')');
        } else {
            self.write_node(expr, out);
        }
    }

    /// '!' and '√' bind directly to literals and factorials; anything
    /// else is parenthesised.
    fn write_tight(&self, expr: ExprRef, out: &mut String) {
        if matches!(
            self.node(expr).kind(),
            ExprKind::Literal(_) | ExprKind::Factorial(_)
        ) {
            self.write_node(expr, out);
        } else {
            out.push('(');
            self.write_node(expr, out);
            out.push(')');
        }
    }

    fn write_radicals(&self, count: u32, out: &mut String) {
        for _ in 0..count {
            out.push('√');
        }
    }
}
