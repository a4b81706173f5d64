//! Parallel batch differentiation using Rayon
//!
//! Nodes are immutable and `Send + Sync`, so independent traversals can read
//! the same shared DAG from several threads without any locking. Each call
//! here runs one ordinary postorder walk per task on the Rayon pool, with the
//! same [`DEFAULT_MAX_NODES`] limit as [`crate::differentiate`].
//!
//! Enable with the `parallel` feature:
//! ```toml
//! symb_dag = { version = "0.1", features = ["parallel"] }
//! ```

use rayon::prelude::*;

use crate::error::Result;
use crate::{DEFAULT_MAX_NODES, Diff, Expr};

/// Gradient of `expr`, one variable per task
pub fn gradient_par(expr: &Expr, vars: &[&str]) -> Result<Vec<Expr>> {
    let diff = Diff::new().max_nodes(DEFAULT_MAX_NODES);
    vars.par_iter()
        .map(|var| diff.differentiate_by_name(expr, var))
        .collect()
}

/// Differentiate every expression in `exprs` with respect to `var`
///
/// Results keep the input order. The expressions may share sub-DAGs.
pub fn differentiate_batch(exprs: &[Expr], var: &str) -> Result<Vec<Expr>> {
    let diff = Diff::new().max_nodes(DEFAULT_MAX_NODES);
    exprs
        .par_iter()
        .map(|expr| diff.differentiate_by_name(expr, var))
        .collect()
}
