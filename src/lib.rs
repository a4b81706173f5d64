//! Expression DAGs with memoized postorder evaluation
//!
//! Algebraic expressions are built as directed acyclic graphs of immutable
//! nodes. A node reused through cloned handles is shared, not copied, and the
//! postorder evaluator visits every distinct node exactly once no matter how
//! many parents point at it. Symbolic differentiation is the built-in
//! transformation on top of that evaluator.
//!
//! # Features
//! - Operator overloading with literal lifting in both operand orders
//! - Minimal-parenthesis rendering driven by precedence classes
//! - Identity-memoized, explicit-stack postorder traversal
//! - Symbolic differentiation, gradient, Hessian and Jacobian
//! - Optional Rayon-backed batch differentiation (`parallel` feature)
//!
//! # Usage Examples
//!
//! ```
//! use symb_dag::{Expr, differentiate};
//!
//! let x = Expr::symbol("x");
//! let expr = (&x + 2.0) * 3.0;
//! assert_eq!(expr.to_string(), "(x + 2) * 3");
//!
//! let derivative = differentiate(&(&x * &x), "x")?;
//! assert_eq!(derivative.to_string(), "x * 1 + x * 1");
//! # Ok::<(), symb_dag::ExprError>(())
//! ```
//!
//! Custom transformations plug into the same traversal:
//!
//! ```
//! use symb_dag::{Expr, ExprError, ExprKind, postorder};
//!
//! let x = Expr::symbol("x");
//! let expr = (&x + 1.0) / 4.0;
//!
//! let value = postorder(&expr, |node, o: &[&f64]| match node.kind() {
//!     ExprKind::Number(n) => Ok(*n),
//!     ExprKind::Symbol(_) => Ok(3.0),
//!     ExprKind::Add(_) => Ok(o[0] + o[1]),
//!     ExprKind::Div(_) => Ok(o[0] / o[1]),
//!     other => Err(ExprError::unsupported("evaluate", other.name())),
//! })?;
//! assert_eq!(value, 1.0);
//! # Ok::<(), ExprError>(())
//! ```

mod ast;
mod builder;
mod differentiation;
mod display;
mod error;
mod helpers;
mod ops;
mod symbol;
pub mod visitor;

#[cfg(feature = "parallel")]
pub mod parallel;

#[cfg(test)]
mod tests;

// Re-export key types for easier usage
pub use ast::{Expr, ExprId, ExprKind, Payload, Precedence};
pub use builder::Diff;
pub use error::{ExprError, Result};
pub use helpers::{gradient, hessian, jacobian};
pub use ops::pow;
pub use symbol::{Symbol, symb, symbol_exists};
pub use visitor::{PostorderVisitor, postorder, postorder_with, walk_postorder};

/// Default maximum number of distinct nodes accepted by [`differentiate`]
pub const DEFAULT_MAX_NODES: usize = 1_000_000;

/// Main API function for symbolic differentiation
///
/// Differentiates `expr` with respect to the symbol named `var`, refusing
/// inputs larger than [`DEFAULT_MAX_NODES`]. Use the [`Diff`] builder for
/// other limits.
///
/// # Example
/// ```
/// use symb_dag::{Expr, differentiate};
///
/// let d = differentiate(&Expr::number(7.0), "x")?;
/// assert_eq!(d, Expr::number(0.0));
/// # Ok::<(), symb_dag::ExprError>(())
/// ```
pub fn differentiate(expr: &Expr, var: &str) -> Result<Expr> {
    Diff::new()
        .max_nodes(DEFAULT_MAX_NODES)
        .differentiate_by_name(expr, var)
}
