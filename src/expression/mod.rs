//! Expression model: tagged scalar values, arena-allocated immutable
//! nodes, and their canonical rendering.

mod arena;
mod ast;
mod display;
mod value;

pub use arena::{ExprPool, ExprView, PoolSet};
pub use ast::{Expr, ExprKind, ExprRef, Term};
pub use value::Value;
