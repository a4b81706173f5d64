//! Multi-variable differentiation helpers
//!
//! Gradient, Hessian and Jacobian built from repeated single-variable
//! differentiation. The first failing derivative aborts the whole computation,
//! and inputs with more than [`DEFAULT_MAX_NODES`] distinct nodes are refused
//! the same way [`crate::differentiate`] refuses them.

use crate::error::Result;
use crate::{DEFAULT_MAX_NODES, Diff, Expr};

/// Compute the gradient `[∂f/∂x₁, ∂f/∂x₂, ...]`
///
/// # Example
/// ```
/// use symb_dag::{Expr, gradient};
///
/// let x = Expr::symbol("x");
/// let y = Expr::symbol("y");
/// let grad = gradient(&(&x * &y), &["x", "y"])?;
/// assert_eq!(grad[0].to_string(), "x * 0 + y * 1");
/// assert_eq!(grad[1].to_string(), "x * 1 + y * 0");
/// # Ok::<(), symb_dag::ExprError>(())
/// ```
pub fn gradient(expr: &Expr, vars: &[&str]) -> Result<Vec<Expr>> {
    let diff = Diff::new().max_nodes(DEFAULT_MAX_NODES);
    vars.iter()
        .map(|var| diff.differentiate_by_name(expr, var))
        .collect()
}

/// Compute the Hessian matrix, `H[i][j] = ∂²f/∂xᵢ∂xⱼ`
pub fn hessian(expr: &Expr, vars: &[&str]) -> Result<Vec<Vec<Expr>>> {
    gradient(expr, vars)?
        .iter()
        .map(|partial| gradient(partial, vars))
        .collect()
}

/// Compute the Jacobian matrix, `J[i][j] = ∂fᵢ/∂xⱼ`
pub fn jacobian(exprs: &[Expr], vars: &[&str]) -> Result<Vec<Vec<Expr>>> {
    exprs.iter().map(|expr| gradient(expr, vars)).collect()
}
