//! Tchisla solver: find the shortest expression built from copies of a
//! single digit that reaches a target integer.
//!
//! Expressions combine concatenated digit literals (d, dd, ddd, …) with
//! addition, subtraction, multiplication, division, powers, square
//! roots and factorials. The solver enumerates reachable values
//! generation by generation (generation n holds the values reachable
//! with exactly n digit copies), dedupes them across the reals, and
//! stops at the first generation that produces the target, so the
//! answer uses a minimal number of digits.

pub mod expression;
pub mod solver;

pub use expression::{Expr, ExprPool, ExprRef, ExprView, PoolSet, Term, Value};
pub use solver::{ConfigError, SearchMode, SolverConfig, SolverError, TchislaSolver};

/// Solve one target/seed pair with the given configuration.
///
/// Returns the rendering of the first expression found, or `None` when
/// the search depth is exhausted without reaching the target.
///
/// # Errors
///
/// Returns an error if the target is not positive, the seed is not a
/// digit in 1..=9, or the configuration fails validation.
///
/// # Examples
///
/// ```
/// use tchisla_solver::{SolverConfig, solve_target};
///
/// let result = solve_target(1, 1, &SolverConfig::default());
/// assert_eq!(result.unwrap().as_deref(), Some("1"));
/// ```
pub fn solve_target(
    target: i64,
    seed: u32,
    config: &SolverConfig,
) -> Result<Option<String>, SolverError> {
    if target <= 0 {
        return Err(SolverError::InvalidTarget(target));
    }
    if !(1..=9).contains(&seed) {
        return Err(SolverError::InvalidSeed(seed));
    }
    config.validate()?;

    let mut solver = TchislaSolver::new(target, seed, *config);
    if solver.solve() {
        Ok(solver.result())
    } else {
        Ok(None)
    }
}
