use crate::expression::value::Value;

/// Handle to a node inside one of the solver's pools.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExprRef {
    pool: u32,
    slot: u32,
}

impl ExprRef {
    pub(crate) fn new(pool: u32, slot: u32) -> Self {
        Self { pool, slot }
    }

    pub(crate) fn pool(self) -> u32 {
        self.pool
    }

    pub(crate) fn slot(self) -> u32 {
        self.slot
    }
}

/// A node handle paired with its evaluated scalar.
///
/// Generations store terms rather than bare handles so that the
/// enumeration loop never has to resolve a pool.
#[derive(Clone, Copy, Debug)]
pub struct Term {
    pub expr: ExprRef,
    pub value: Value,
}

/// Immutable expression node. Children are shared: a node may appear
/// under many parents, and nothing is mutated after construction.
#[derive(Debug)]
pub struct Expr {
    value: Value,
    kind: ExprKind,
}

#[derive(Debug)]
pub enum ExprKind {
    Literal(Box<str>),
    Add(ExprRef, ExprRef),
    Sub(ExprRef, ExprRef),
    Mul(ExprRef, ExprRef),
    Div(ExprRef, ExprRef),
    Pow(ExprRef, ExprRef),
    /// 1 / L^R, rendered "L ^-R".
    NegPow(ExprRef, ExprRef),
    /// L^(R >> radicals): each prefix radical halves the exponent.
    MultiSqrtPow {
        radicals: u32,
        base: ExprRef,
        exponent: ExprRef,
    },
    /// 1 / L^(R >> radicals).
    NegMultiSqrtPow {
        radicals: u32,
        base: ExprRef,
        exponent: ExprRef,
    },
    Factorial(ExprRef),
    Sqrt(ExprRef),
    DoubleSqrt(ExprRef),
}

impl ExprKind {
    /// True for the operator forms whose operands take parentheses.
    pub(crate) fn is_binary(&self) -> bool {
        matches!(
            self,
            ExprKind::Add(..)
                | ExprKind::Sub(..)
                | ExprKind::Mul(..)
                | ExprKind::Div(..)
                | ExprKind::Pow(..)
                | ExprKind::NegPow(..)
                | ExprKind::MultiSqrtPow { .. }
                | ExprKind::NegMultiSqrtPow { .. }
        )
    }
}

impl Expr {
    /// The literal made of `repeats` copies of the seed digit.
    pub fn literal(seed: u32, repeats: usize) -> Self {
        let text = seed.to_string().repeat(repeats);
        let value = match text.parse::<i64>() {
            Ok(n) => Value::Int(n),
            // 19-digit literals overflow i64; the magnitude limits will
            // discard the float fallback.
            Err(_) => Value::Float(text.parse::<f64>().unwrap_or(f64::INFINITY)),
        };
        Self {
            value,
            kind: ExprKind::Literal(text.into_boxed_str()),
        }
    }

    pub fn add(l: Term, r: Term, precision: f64) -> Self {
        Self {
            value: Value::from_f64(l.value.as_f64() + r.value.as_f64(), precision),
            kind: ExprKind::Add(l.expr, r.expr),
        }
    }

    pub fn sub(l: Term, r: Term, precision: f64) -> Self {
        Self {
            value: Value::from_f64(l.value.as_f64() - r.value.as_f64(), precision),
            kind: ExprKind::Sub(l.expr, r.expr),
        }
    }

    pub fn mul(l: Term, r: Term, precision: f64) -> Self {
        Self {
            value: Value::from_f64(l.value.as_f64() * r.value.as_f64(), precision),
            kind: ExprKind::Mul(l.expr, r.expr),
        }
    }

    pub fn div(l: Term, r: Term, precision: f64) -> Self {
        Self {
            value: Value::from_f64(l.value.as_f64() / r.value.as_f64(), precision),
            kind: ExprKind::Div(l.expr, r.expr),
        }
    }

    pub fn pow(base: Term, exponent: Term, precision: f64) -> Self {
        Self {
            value: Value::from_f64(base.value.as_f64().powf(exponent.value.as_f64()), precision),
            kind: ExprKind::Pow(base.expr, exponent.expr),
        }
    }

    pub fn neg_pow(base: Term, exponent: Term, precision: f64) -> Self {
        Self {
            value: Value::from_f64(
                1.0 / base.value.as_f64().powf(exponent.value.as_f64()),
                precision,
            ),
            kind: ExprKind::NegPow(base.expr, exponent.expr),
        }
    }

    pub fn multi_sqrt_pow(radicals: u32, base: Term, exponent: Term, precision: f64) -> Self {
        let reduced = exponent.value.as_i64() >> radicals;
        Self {
            value: Value::from_f64(base.value.as_f64().powf(reduced as f64), precision),
            kind: ExprKind::MultiSqrtPow {
                radicals,
                base: base.expr,
                exponent: exponent.expr,
            },
        }
    }

    pub fn neg_multi_sqrt_pow(radicals: u32, base: Term, exponent: Term, precision: f64) -> Self {
        let reduced = exponent.value.as_i64() >> radicals;
        Self {
            value: Value::from_f64(1.0 / base.value.as_f64().powf(reduced as f64), precision),
            kind: ExprKind::NegMultiSqrtPow {
                radicals,
                base: base.expr,
                exponent: exponent.expr,
            },
        }
    }

    pub fn factorial(child: Term) -> Self {
        Self {
            value: factorial_value(child.value.as_i64()),
            kind: ExprKind::Factorial(child.expr),
        }
    }

    pub fn sqrt(child: Term, precision: f64) -> Self {
        Self {
            value: Value::from_f64(child.value.as_f64().sqrt(), precision),
            kind: ExprKind::Sqrt(child.expr),
        }
    }

    pub fn double_sqrt(child: Term, precision: f64) -> Self {
        Self {
            value: Value::from_f64(child.value.as_f64().sqrt().sqrt(), precision),
            kind: ExprKind::DoubleSqrt(child.expr),
        }
    }

    pub fn value(&self) -> Value {
        self.value
    }

    pub fn is_int(&self) -> bool {
        self.value.is_int()
    }

    pub(crate) fn kind(&self) -> &ExprKind {
        &self.kind
    }
}

/// n! as an exact integer, degrading to a float on overflow so the
/// magnitude limits can filter it.
fn factorial_value(n: i64) -> Value {
    let mut acc: i64 = 1;
    for k in 2..=n {
        match acc.checked_mul(k) {
            Some(next) => acc = next,
            None => return Value::Float((2..=n).fold(1.0, |product, k| product * k as f64)),
        }
    }
    Value::Int(acc)
}
