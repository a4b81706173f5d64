//! DAG-aware postorder evaluation
//!
//! Every distinct node object reachable from the root is combined exactly
//! once, after all of its operands, and parents receive references to the
//! cached results of their operands. The walk uses an explicit work stack, so
//! deep expressions do not grow the native call stack.
//!
//! Results are memoized by [`ExprId`], never by structural equality: two
//! equal-looking nodes that were built separately are combined separately.

use std::marker::PhantomData;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::Expr;
use crate::ast::ExprId;

/// Per-node evaluation plugged into [`walk_postorder`]
///
/// # Example
/// ```
/// use std::convert::Infallible;
/// use symb_dag::{Expr, PostorderVisitor, walk_postorder};
///
/// struct Leaves;
///
/// impl PostorderVisitor for Leaves {
///     type Output = usize;
///     type Error = Infallible;
///
///     fn combine(&mut self, expr: &Expr, operands: &[&usize]) -> Result<usize, Infallible> {
///         Ok(if expr.is_terminal() { 1 } else { operands.iter().copied().sum() })
///     }
/// }
///
/// let x = Expr::symbol("x");
/// let e = &x * &x + 1.0;
/// assert_eq!(walk_postorder(&e, &mut Leaves), Ok(3));
/// ```
pub trait PostorderVisitor {
    type Output;
    type Error;

    /// Compute the result for `expr` from the results of its operands,
    /// given in operand order
    fn combine(
        &mut self,
        expr: &Expr,
        operands: &[&Self::Output],
    ) -> Result<Self::Output, Self::Error>;
}

/// Walk the DAG under `root` in postorder and return the root's result
///
/// The first error returned by the visitor aborts the walk and is passed
/// through unchanged.
pub fn walk_postorder<V>(root: &Expr, visitor: &mut V) -> Result<V::Output, V::Error>
where
    V: PostorderVisitor,
{
    let mut visited: FxHashMap<ExprId, V::Output> = FxHashMap::default();
    let mut stack: Vec<&Expr> = vec![root];

    trace!(root = %root.id(), "postorder walk start");

    while let Some(expr) = stack.pop() {
        // A node can sit on the stack more than once (e.g. `a + a`, or two
        // parents reaching it before it resolved); only the first pop counts.
        if visited.contains_key(&expr.id()) {
            continue;
        }

        let is_unvisited = |operand: &&Expr| !visited.contains_key(&operand.id());
        if expr.operands().iter().any(|operand| is_unvisited(&operand)) {
            // Back under its operands: `expr` pops again once they resolved
            stack.push(expr);
            stack.extend(expr.operands().iter().filter(is_unvisited));
            continue;
        }

        let result = {
            let operands: Vec<&V::Output> = expr
                .operands()
                .iter()
                .map(|operand| &visited[&operand.id()])
                .collect();
            visitor.combine(expr, &operands)?
        };
        visited.insert(expr.id(), result);
    }

    trace!(nodes = visited.len(), "postorder walk complete");

    // The root is always the last node resolved
    Ok(visited
        .remove(&root.id())
        .unwrap_or_else(|| unreachable!("postorder walk finished without resolving the root")))
}

/// Adapter turning a closure into a [`PostorderVisitor`]
struct FnVisitor<F, R, E> {
    combine: F,
    _marker: PhantomData<fn() -> (R, E)>,
}

impl<F, R, E> PostorderVisitor for FnVisitor<F, R, E>
where
    F: FnMut(&Expr, &[&R]) -> Result<R, E>,
{
    type Output = R;
    type Error = E;

    fn combine(&mut self, expr: &Expr, operands: &[&R]) -> Result<R, E> {
        (self.combine)(expr, operands)
    }
}

/// Evaluate `root` in postorder with a closure
///
/// # Example
/// ```
/// use std::convert::Infallible;
/// use symb_dag::{Expr, postorder};
///
/// let shared = Expr::number(5.0);
/// let root = &shared + &shared;
///
/// let mut calls = 0;
/// let _ = postorder(&root, |_, _: &[&()]| {
///     calls += 1;
///     Ok::<_, Infallible>(())
/// });
/// assert_eq!(calls, 2);
/// ```
pub fn postorder<R, E, F>(root: &Expr, combine: F) -> Result<R, E>
where
    F: FnMut(&Expr, &[&R]) -> Result<R, E>,
{
    walk_postorder(
        root,
        &mut FnVisitor {
            combine,
            _marker: PhantomData,
        },
    )
}

/// Evaluate `root` in postorder, passing `state` unchanged to every call
pub fn postorder_with<S, R, E, F>(root: &Expr, state: &S, mut combine: F) -> Result<R, E>
where
    S: ?Sized,
    F: FnMut(&Expr, &[&R], &S) -> Result<R, E>,
{
    postorder(root, |expr, operands| combine(expr, operands, state))
}
