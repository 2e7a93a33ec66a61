use crate::expression::{Expr, ExprPool, PoolSet, Term, Value};
use crate::solver::config::SolverConfig;
use crate::solver::core::SearchShared;
use crate::solver::generation::Generation;

/// Per-worker producer for one pass: owns a fresh pool and one
/// partition of the current generation, shares the dedup set and the
/// found flag with every other worker.
pub(crate) struct GenerationCreator<'a> {
    shared: &'a SearchShared,
    frozen: &'a PoolSet,
    pool: &'a mut ExprPool,
    part: &'a mut Vec<Term>,
}

impl<'a> GenerationCreator<'a> {
    pub(crate) fn new(
        shared: &'a SearchShared,
        frozen: &'a PoolSet,
        pool: &'a mut ExprPool,
        part: &'a mut Vec<Term>,
    ) -> Self {
        Self {
            shared,
            frozen,
            pool,
            part,
        }
    }

    fn config(&self) -> &SolverConfig {
        &self.shared.config
    }

    fn precision(&self) -> f64 {
        self.shared.config.precision
    }

    /// Enumerates every binary combination of the two generations.
    /// Returns true once the target has been found, by this worker or
    /// any other.
    pub(crate) fn cross_generation(&mut self, g1: &Generation, g2: &Generation) -> bool {
        for a in g1.iter() {
            for b in g2.iter() {
                if self.add_addition(a, b)
                    || self.add_subtraction(a, b)
                    || self.add_multiplication(a, b)
                    || self.add_division(a, b)
                    || self.add_power(a, b)
                {
                    return true;
                }
            }
        }
        false
    }

    /// Injects the literal made of `repeats` copies of the seed digit.
    pub(crate) fn add_literal(&mut self, repeats: usize) -> bool {
        self.add_candidate(Expr::literal(self.shared.seed, repeats))
    }

    /// Admission pipeline. Emplaces the candidate speculatively; only a
    /// candidate that survives the limits and the dedup set is
    /// committed, pushed into this worker's partition, and offered to
    /// the unary derivations. Returns true when the search is done.
    fn add_candidate(&mut self, expr: Expr) -> bool {
        if self.shared.found() {
            return true;
        }
        let value = expr.value();
        let node = self.pool.emplace(expr);
        if let Value::Int(n) = value
            && n == self.shared.target
        {
            let rendering = self.frozen.view_with(self.pool).render(node);
            self.shared.publish(rendering);
            return true;
        }
        let magnitude = value.as_f64().abs();
        if magnitude < self.config().value_min_limit || magnitude > self.config().value_max_limit {
            // slot stays uncommitted; the next emplace overwrites it
            return false;
        }
        if !self.shared.reachable.insert_if_absent(value) {
            return false;
        }
        self.pool.commit();
        let term = Term { expr: node, value };
        self.part.push(term);
        self.add_factorial(term) || self.add_square_root(term)
    }

    fn add_addition(&mut self, a: Term, b: Term) -> bool {
        self.add_candidate(Expr::add(a, b, self.precision()))
    }

    /// The larger operand goes on the left so the result stays positive.
    fn add_subtraction(&mut self, a: Term, b: Term) -> bool {
        if a.value.as_f64() > b.value.as_f64() {
            self.add_candidate(Expr::sub(a, b, self.precision()))
        } else {
            self.add_candidate(Expr::sub(b, a, self.precision()))
        }
    }

    fn add_multiplication(&mut self, a: Term, b: Term) -> bool {
        self.add_candidate(Expr::mul(a, b, self.precision()))
    }

    fn add_division(&mut self, a: Term, b: Term) -> bool {
        let precision = self.precision();
        if a.value.as_f64().abs() < precision || b.value.as_f64().abs() < precision {
            return false;
        }
        self.add_candidate(Expr::div(a, b, precision)) || self.add_candidate(Expr::div(b, a, precision))
    }

    /// Powers are tried in both orientations whenever the exponent side
    /// is integer-tagged and within the limit; every power also yields
    /// its reciprocal and the square-root ladder of its even exponents.
    fn add_power(&mut self, a: Term, b: Term) -> bool {
        let precision = self.precision();
        if let Value::Int(e) = b.value
            && e > 0
            && e <= self.config().power_limit
        {
            if self.add_candidate(Expr::pow(a, b, precision))
                || self.add_candidate(Expr::neg_pow(a, b, precision))
                || self.add_multi_sqrt_power(a, b, e)
            {
                return true;
            }
        }
        if let Value::Int(e) = a.value
            && e > 0
            && e <= self.config().power_limit
        {
            return self.add_candidate(Expr::pow(b, a, precision))
                || self.add_candidate(Expr::neg_pow(b, a, precision))
                || self.add_multi_sqrt_power(b, a, e);
        }
        false
    }

    /// Each halving of an even exponent corresponds to one more outer
    /// radical on the base.
    fn add_multi_sqrt_power(&mut self, base: Term, exponent: Term, e: i64) -> bool {
        let precision = self.precision();
        let mut remaining = e;
        let mut radicals = 0;
        while remaining & 1 == 0 {
            remaining >>= 1;
            radicals += 1;
            let expr = Expr::multi_sqrt_pow(radicals, base, exponent, precision);
            if self.config().mode.admits_irrational_roots() || expr.is_int() {
                if self.add_candidate(expr)
                    || self.add_candidate(Expr::neg_multi_sqrt_pow(
                        radicals, base, exponent, precision,
                    ))
                {
                    return true;
                }
            }
        }
        false
    }

    fn add_factorial(&mut self, term: Term) -> bool {
        if let Value::Int(n) = term.value
            && (0..=self.config().factorial_limit).contains(&n)
        {
            return self.add_candidate(Expr::factorial(term));
        }
        false
    }

    fn add_square_root(&mut self, term: Term) -> bool {
        let Value::Int(n) = term.value else {
            return false;
        };
        if n <= 0 {
            return false;
        }
        let precision = self.precision();
        let sqrt = Expr::sqrt(term, precision);
        let sqrt_is_int = sqrt.is_int();
        if !self.config().mode.admits_irrational_roots() {
            return sqrt_is_int && self.add_candidate(sqrt);
        }
        if self.add_candidate(sqrt) {
            return true;
        }
        if sqrt_is_int || self.config().mode.exhaustive_double_sqrt() {
            return self.add_candidate(Expr::double_sqrt(term, precision));
        }
        false
    }
}
