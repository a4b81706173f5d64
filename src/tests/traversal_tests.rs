use crate::visitor::{PostorderVisitor, walk_postorder};
use crate::{Expr, ExprError, ExprId, ExprKind, differentiate, postorder, postorder_with};
use std::collections::HashMap;
use std::convert::Infallible;

/// x, x + x, (x + x) + (x + x), ... with every level shared by both operands
fn doubling_chain(levels: usize) -> Expr {
    let mut expr = Expr::symbol("x");
    for _ in 0..levels {
        expr = &expr + &expr;
    }
    expr
}

/// Records how often each node was combined and in which order
#[derive(Default)]
struct CallLog {
    calls: HashMap<ExprId, usize>,
    order: Vec<ExprId>,
}

impl PostorderVisitor for CallLog {
    type Output = ();
    type Error = Infallible;

    fn combine(&mut self, expr: &Expr, _: &[&()]) -> Result<(), Infallible> {
        *self.calls.entry(expr.id()).or_default() += 1;
        self.order.push(expr.id());
        Ok(())
    }
}

// ============================================================================
// Memoization by node identity
// ============================================================================

#[test]
fn test_doubling_chain_is_linear() {
    let expr = doubling_chain(40);
    assert_eq!(expr.node_count(), 41);
    assert_eq!(expr.tree_size(), (1usize << 41) - 1);
    assert_eq!(expr.depth(), 41);

    let mut log = CallLog::default();
    let _ = walk_postorder(&expr, &mut log);
    assert_eq!(log.calls.len(), 41);
    assert!(log.calls.values().all(|&n| n == 1));
}

#[test]
fn test_structurally_equal_nodes_are_distinct() {
    let a = Expr::symbol("x") + 1.0;
    let b = Expr::symbol("x") + 1.0;
    assert_eq!(a, b);
    assert!(!Expr::same_node(&a, &b));

    // the symbol terminals are separate nodes as well
    let root = &a * &b;
    assert_eq!(root.node_count(), 7);
}

#[test]
fn test_operands_combined_before_parents() {
    let x = Expr::symbol("x");
    let y = Expr::symbol("y");
    let shared = &x * &y;
    let expr = (&shared - &x) / (&shared + &y);

    let mut log = CallLog::default();
    let _ = walk_postorder(&expr, &mut log);
    let position: HashMap<ExprId, usize> =
        log.order.iter().enumerate().map(|(i, id)| (*id, i)).collect();

    let _ = postorder(&expr, |node, _: &[&()]| {
        for operand in node.operands() {
            assert!(position[&operand.id()] < position[&node.id()]);
        }
        Ok::<_, Infallible>(())
    });
    assert_eq!(log.order.last(), Some(&expr.id()));
    assert_eq!(log.order.len(), 6);
}

#[test]
fn test_shared_result_is_reused() {
    let x = Expr::symbol("x");
    let shared = &x * &x;
    let root = &shared + &shared;

    let d = differentiate(&root, "x").unwrap();
    let [left, right] = d.operands() else {
        panic!("Expected a binary node");
    };
    // both operands are the one cached derivative of `shared`
    assert!(Expr::same_node(left, right));
    assert_eq!(d.to_string(), "x * 1 + x * 1 + x * 1 + x * 1");
}

#[test]
fn test_doubling_chain_derivative_stays_shared() {
    let expr = doubling_chain(60);
    let d = differentiate(&expr, "x").unwrap();
    // Number(1) plus one Add per level
    assert_eq!(d.node_count(), 61);
}

#[test]
fn test_equality_of_shared_dags_is_linear() {
    // 2^60 paths, 61 distinct node pairs
    assert_eq!(doubling_chain(60), doubling_chain(60));
    assert_ne!(doubling_chain(60), doubling_chain(59));

    let mut a = doubling_chain(60);
    let mut b = doubling_chain(60);
    a = &a * 2.0;
    b = &b * 3.0;
    assert_ne!(a, b);
}

// ============================================================================
// Depth and state threading
// ============================================================================

#[test]
fn test_deep_chain_no_stack_overflow() {
    let mut expr = Expr::symbol("x");
    for i in 0..200_000 {
        expr = &expr + f64::from(i % 7);
    }
    assert_eq!(expr.depth(), 200_001);

    let d = differentiate(&expr, "x").unwrap();
    assert_eq!(d.depth(), 200_001);
    assert_eq!(d.node_count(), 400_001);
}

fn eval(expr: &Expr, env: &HashMap<&str, f64>) -> crate::Result<f64> {
    postorder_with(expr, env, |node, o: &[&f64], env| match node.kind() {
        ExprKind::Number(n) => Ok(*n),
        ExprKind::Symbol(s) => env
            .get(s.name())
            .copied()
            .ok_or_else(|| ExprError::unsupported("evaluate", s.name())),
        ExprKind::Add(_) => Ok(o[0] + o[1]),
        ExprKind::Sub(_) => Ok(o[0] - o[1]),
        ExprKind::Mul(_) => Ok(o[0] * o[1]),
        ExprKind::Div(_) => Ok(o[0] / o[1]),
        ExprKind::Pow(_) => Ok(o[0].powf(*o[1])),
        other => Err(ExprError::unsupported("evaluate", other.name())),
    })
}

#[test]
fn test_deep_derivatives_compare_equal() {
    let build = || {
        let mut expr = Expr::symbol("x");
        for i in 0..200_000 {
            expr = &expr * f64::from(i % 5 + 1);
        }
        expr
    };
    let first = differentiate(&build(), "x").unwrap();
    let second = differentiate(&build(), "x").unwrap();
    assert!(!Expr::same_node(&first, &second));
    assert_eq!(first, second);
    assert_ne!(first, differentiate(&build(), "y").unwrap());
}

#[test]
fn test_postorder_with_environment() {
    let x = Expr::symbol("x");
    let y = Expr::symbol("y");
    let expr = (&x * &y + 1.0).pow(2.0) / &y;

    let env: HashMap<&str, f64> = [("x", 2.0), ("y", 4.0)].into_iter().collect();
    assert_eq!(eval(&expr, &env), Ok(20.25));

    let partial: HashMap<&str, f64> = [("y", 4.0)].into_iter().collect();
    assert_eq!(
        eval(&expr, &partial),
        Err(ExprError::unsupported("evaluate", "x"))
    );
}

#[test]
fn test_error_stops_before_parents() {
    let x = Expr::symbol("x");
    let bad = Expr::func("f", x.clone());
    let expr = (&bad + &x) * 2.0;

    let mut seen = Vec::new();
    let result = postorder(&expr, |node, _: &[&()]| {
        seen.push(node.kind().name());
        match node.kind() {
            ExprKind::Function { .. } => Err(ExprError::unsupported("visit", "Function")),
            _ => Ok(()),
        }
    });

    assert!(result.is_err());
    assert!(!seen.contains(&"Add"));
    assert!(!seen.contains(&"Mul"));
}
