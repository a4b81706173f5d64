//! Symbolic differentiation rules
//!
//! One rule per node kind, applied bottom-up by the postorder evaluator. Each
//! rule sees the node itself (so it can reuse the original operands) and the
//! already computed derivatives of its operands. No simplification happens:
//! `d/dx (x * x)` is `x * 1 + x * 1`.

use crate::error::{ExprError, Result};
use crate::visitor::PostorderVisitor;
use crate::{Expr, ExprKind};

/// Derivative rule table for a single target variable
pub(crate) struct Differentiator<'a> {
    var: &'a str,
    max_nodes: Option<usize>,
    combined: usize,
}

impl<'a> Differentiator<'a> {
    pub(crate) fn new(var: &'a str, max_nodes: Option<usize>) -> Self {
        Differentiator {
            var,
            max_nodes,
            combined: 0,
        }
    }

    /// Number of distinct nodes differentiated so far
    pub(crate) fn combined(&self) -> usize {
        self.combined
    }
}

impl PostorderVisitor for Differentiator<'_> {
    type Output = Expr;
    type Error = ExprError;

    fn combine(&mut self, expr: &Expr, d: &[&Expr]) -> Result<Expr> {
        self.combined += 1;
        if let Some(limit) = self.max_nodes
            && self.combined > limit
        {
            return Err(ExprError::MaxNodesExceeded { limit });
        }

        match expr.kind() {
            ExprKind::Number(_) => Ok(Expr::number(0.0)),

            ExprKind::Symbol(s) => Ok(Expr::number(if s == self.var { 1.0 } else { 0.0 })),

            ExprKind::Add(_) => Ok(d[0] + d[1]),

            ExprKind::Sub(_) => Ok(d[0] - d[1]),

            // Product rule, the untouched factor is the original operand node
            ExprKind::Mul([f, g]) => Ok(f * d[1] + g * d[0]),

            // Quotient rule: (f'g - fg') / g^2
            ExprKind::Div([f, g]) => Ok((d[0] * g - f * d[1]) / g.clone().pow(2)),

            // Constant-exponent power rule: p * f^(p - 1). Bases or exponents
            // that depend on the variable need the general rule, which is
            // deliberately not applied here.
            ExprKind::Pow([base, power]) => Ok(power * base.clone().pow(power - 1)),

            // Kinds without a rule fail loudly instead of defaulting to zero
            other => Err(ExprError::unsupported("differentiate", other.name())),
        }
    }
}
