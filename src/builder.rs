//! Builder pattern API for differentiation
//!
//! # Example
//! ```
//! use symb_dag::{Diff, Expr, symb};
//!
//! let x = symb("x");
//! let expr = Expr::from(&x) * 3.0;
//!
//! let derivative = Diff::new().max_nodes(1_000).differentiate(&expr, &x)?;
//! assert_eq!(derivative.to_string(), "x * 0 + 3 * 1");
//! # Ok::<(), symb_dag::ExprError>(())
//! ```

use tracing::debug;

use crate::differentiation::Differentiator;
use crate::error::Result;
use crate::visitor::walk_postorder;
use crate::{Expr, Symbol};

/// Builder for differentiation operations
#[derive(Debug, Clone, Default)]
pub struct Diff {
    max_nodes: Option<usize>,
}

impl Diff {
    /// Create a new differentiation builder with default settings (no node limit)
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse inputs with more than `limit` distinct nodes
    ///
    /// The check counts node objects, not occurrences: a sub-expression shared
    /// by many parents counts once.
    pub fn max_nodes(mut self, limit: usize) -> Self {
        self.max_nodes = Some(limit);
        self
    }

    /// Differentiate `expr` with respect to `var`
    pub fn differentiate(&self, expr: &Expr, var: &Symbol) -> Result<Expr> {
        self.differentiate_by_name(expr, var.name())
    }

    /// Differentiate `expr` with respect to the symbol named `var`
    ///
    /// The name does not need to be interned; a name that never occurs in
    /// the expression simply yields an all-zero derivative.
    pub fn differentiate_by_name(&self, expr: &Expr, var: &str) -> Result<Expr> {
        debug!(var, max_nodes = ?self.max_nodes, root = %expr.id(), "differentiate");

        let mut rules = Differentiator::new(var, self.max_nodes);
        let derivative = walk_postorder(expr, &mut rules)?;

        debug!(var, nodes = rules.combined(), "differentiate done");
        Ok(derivative)
    }
}
