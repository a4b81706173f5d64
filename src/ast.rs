//! Expression DAG node model
//!
//! An `Expr` is a cheap handle to an immutable node. Cloning the handle does
//! not copy the node: both handles refer to the same node object and share
//! its `ExprId`. A sub-expression reused through cloned handles is therefore a
//! shared DAG node, while two nodes built separately stay distinct even when
//! they look identical.

use std::collections::HashSet;
use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rustc_hash::FxHashSet;

use crate::error::{ExprError, Result};
use crate::symbol::{Symbol, get_or_intern};
use crate::visitor::postorder;

/// Global counter for node IDs
static EXPR_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_id() -> ExprId {
    ExprId(EXPR_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// Identity of a node object, unique for the lifetime of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExprId(u64);

impl ExprId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Precedence class used to decide parenthesization when rendering
///
/// The gap at 3 leaves room for a future operator tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Precedence {
    Additive = 0,
    Multiplicative = 1,
    Power = 2,
    Terminal = 4,
}

/// Node kind with its payload or operands
#[derive(Clone, PartialEq)]
pub enum ExprKind {
    /// Numeric literal
    Number(f64),

    /// Named symbol
    Symbol(Symbol),

    /// Addition
    Add([Expr; 2]),

    /// Subtraction
    Sub([Expr; 2]),

    /// Multiplication
    Mul([Expr; 2]),

    /// Division
    Div([Expr; 2]),

    /// Exponentiation
    Pow([Expr; 2]),

    /// Uninterpreted function application, e.g. `f(x, y)`
    ///
    /// No built-in transformation has a rule for it.
    Function { name: String, args: Vec<Expr> },
}

impl ExprKind {
    /// Kind name, as used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            ExprKind::Number(_) => "Number",
            ExprKind::Symbol(_) => "Symbol",
            ExprKind::Add(_) => "Add",
            ExprKind::Sub(_) => "Sub",
            ExprKind::Mul(_) => "Mul",
            ExprKind::Div(_) => "Div",
            ExprKind::Pow(_) => "Pow",
            ExprKind::Function { .. } => "Function",
        }
    }

    /// Display symbol of an operator kind
    pub fn symbol(&self) -> Option<&'static str> {
        match self {
            ExprKind::Add(_) => Some("+"),
            ExprKind::Sub(_) => Some("-"),
            ExprKind::Mul(_) => Some("*"),
            ExprKind::Div(_) => Some("/"),
            ExprKind::Pow(_) => Some("^"),
            ExprKind::Number(_) | ExprKind::Symbol(_) | ExprKind::Function { .. } => None,
        }
    }

    pub fn precedence(&self) -> Precedence {
        match self {
            ExprKind::Add(_) | ExprKind::Sub(_) => Precedence::Additive,
            ExprKind::Mul(_) | ExprKind::Div(_) => Precedence::Multiplicative,
            ExprKind::Pow(_) => Precedence::Power,
            ExprKind::Number(_) | ExprKind::Symbol(_) | ExprKind::Function { .. } => {
                Precedence::Terminal
            }
        }
    }

    pub fn operands(&self) -> &[Expr] {
        match self {
            ExprKind::Number(_) | ExprKind::Symbol(_) => &[],
            ExprKind::Add(pair)
            | ExprKind::Sub(pair)
            | ExprKind::Mul(pair)
            | ExprKind::Div(pair)
            | ExprKind::Pow(pair) => pair,
            ExprKind::Function { args, .. } => args,
        }
    }

    /// Same kind and payload, with the same number of operands; operands
    /// themselves are not compared
    fn same_head(&self, other: &ExprKind) -> bool {
        match (self, other) {
            (ExprKind::Number(a), ExprKind::Number(b)) => a == b,
            (ExprKind::Symbol(a), ExprKind::Symbol(b)) => a == b,
            (
                ExprKind::Function { name: a, args: x },
                ExprKind::Function { name: b, args: y },
            ) => a == b && x.len() == y.len(),
            (ExprKind::Add(_), ExprKind::Add(_))
            | (ExprKind::Sub(_), ExprKind::Sub(_))
            | (ExprKind::Mul(_), ExprKind::Mul(_))
            | (ExprKind::Div(_), ExprKind::Div(_))
            | (ExprKind::Pow(_), ExprKind::Pow(_)) => true,
            _ => false,
        }
    }

    // Leaves a Number behind so the node can be dropped without recursion
    fn take_operands(&mut self) -> Vec<Expr> {
        match std::mem::replace(self, ExprKind::Number(0.0)) {
            ExprKind::Number(_) | ExprKind::Symbol(_) => Vec::new(),
            ExprKind::Add(pair)
            | ExprKind::Sub(pair)
            | ExprKind::Mul(pair)
            | ExprKind::Div(pair)
            | ExprKind::Pow(pair) => pair.into(),
            ExprKind::Function { args, .. } => args,
        }
    }
}

struct Node {
    id: ExprId,
    kind: ExprKind,
}

impl Drop for Node {
    fn drop(&mut self) {
        // Unlink uniquely owned descendants iteratively; a long chain would
        // otherwise be freed through one native stack frame per level.
        let mut pending = self.kind.take_operands();
        while let Some(expr) = pending.pop() {
            if let Some(mut node) = Arc::into_inner(expr.0) {
                pending.extend(node.kind.take_operands());
            }
        }
    }
}

/// Handle to an immutable expression node
#[derive(Clone)]
pub struct Expr(Arc<Node>);

// Structural equality: kind, payload and operands. The postorder evaluator
// never relies on it; memoization is keyed by `ExprId`, so two equal-looking
// nodes built separately are still evaluated separately.
//
// Compared with an explicit stack of node pairs. A pair is checked once no
// matter how many paths reach it, so shared DAGs compare in time linear in
// their distinct nodes.
impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        let mut seen: FxHashSet<(ExprId, ExprId)> = FxHashSet::default();
        let mut stack: Vec<(&Expr, &Expr)> = vec![(self, other)];

        while let Some((a, b)) = stack.pop() {
            if Expr::same_node(a, b) || !seen.insert((a.id(), b.id())) {
                continue;
            }
            if !a.0.kind.same_head(&b.0.kind) {
                return false;
            }
            stack.extend(a.operands().iter().zip(b.operands()));
        }
        true
    }
}

/// Raw terminal payload, checked when a terminal is built from it
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Number(f64),
    Text(String),
}

impl Payload {
    fn describe(&self) -> String {
        match self {
            Payload::Number(n) => format!("number {n}"),
            Payload::Text(s) => format!("text {s:?}"),
        }
    }
}

// `i64` and `u32` convert with `as f64`: integers beyond 2^53 in magnitude
// round to the nearest representable `f64`.
macro_rules! impl_numeric_payload {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Payload {
                fn from(n: $t) -> Self {
                    Payload::Number(n as f64)
                }
            }
        )*
    };
}

impl_numeric_payload!(f64, f32, i32, i64, u32);

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Payload::Text(s.to_string())
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Payload::Text(s)
    }
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Expr(Arc::new(Node {
            id: next_id(),
            kind,
        }))
    }

    // Accessors

    pub fn id(&self) -> ExprId {
        self.0.id
    }

    pub fn kind(&self) -> &ExprKind {
        &self.0.kind
    }

    /// Operand handles: two for operators, none for terminals
    pub fn operands(&self) -> &[Expr] {
        self.0.kind.operands()
    }

    pub fn precedence(&self) -> Precedence {
        self.0.kind.precedence()
    }

    /// True when both handles refer to the same node object
    pub fn same_node(a: &Expr, b: &Expr) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    /// True for nodes without operands: numbers, symbols and zero-argument
    /// function applications
    pub fn is_terminal(&self) -> bool {
        self.operands().is_empty()
    }

    /// Return the value if this is a `Number` node
    ///
    /// # Example
    /// ```
    /// use symb_dag::Expr;
    /// assert_eq!(Expr::number(3.5).as_number(), Some(3.5));
    /// assert_eq!(Expr::symbol("x").as_number(), None);
    /// ```
    pub fn as_number(&self) -> Option<f64> {
        match &self.0.kind {
            ExprKind::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match &self.0.kind {
            ExprKind::Symbol(s) => Some(s),
            _ => None,
        }
    }

    // Terminal constructors

    /// Create a number terminal
    pub fn number(n: f64) -> Self {
        Expr::new(ExprKind::Number(n))
    }

    /// Create a symbol terminal
    ///
    /// The name is interned, see [`Symbol`].
    pub fn symbol(name: impl AsRef<str>) -> Self {
        Expr::new(ExprKind::Symbol(get_or_intern(name.as_ref())))
    }

    pub(crate) fn from_symbol(symbol: Symbol) -> Self {
        Expr::new(ExprKind::Symbol(symbol))
    }

    /// Build a number terminal from an unchecked payload
    ///
    /// Fails with [`ExprError::Construction`] when the payload is text.
    pub fn try_number(payload: impl Into<Payload>) -> Result<Self> {
        match payload.into() {
            Payload::Number(n) => Ok(Expr::number(n)),
            other => Err(ExprError::construction("number", other.describe())),
        }
    }

    /// Build a symbol terminal from an unchecked payload
    ///
    /// Fails with [`ExprError::Construction`] when the payload is numeric.
    pub fn try_symbol(payload: impl Into<Payload>) -> Result<Self> {
        match payload.into() {
            Payload::Text(s) => Ok(Expr::symbol(s)),
            other => Err(ExprError::construction("symbol", other.describe())),
        }
    }

    // Operator constructors

    pub fn add_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Add([left, right]))
    }

    pub fn sub_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Sub([left, right]))
    }

    pub fn mul_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Mul([left, right]))
    }

    pub fn div_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Div([left, right]))
    }

    pub fn pow_expr(base: Expr, exponent: Expr) -> Self {
        Expr::new(ExprKind::Pow([base, exponent]))
    }

    /// Create a single-argument function application
    pub fn func(name: impl Into<String>, arg: Expr) -> Self {
        Expr::new(ExprKind::Function {
            name: name.into(),
            args: vec![arg],
        })
    }

    /// Create a function application with explicit arguments
    ///
    /// # Example
    /// ```
    /// use symb_dag::Expr;
    /// let g = Expr::call("g", [Expr::symbol("x"), Expr::number(2.0)]);
    /// assert_eq!(g.to_string(), "g(x, 2)");
    /// ```
    pub fn call<const N: usize>(name: impl Into<String>, args: [Expr; N]) -> Self {
        Expr::new(ExprKind::Function {
            name: name.into(),
            args: args.into(),
        })
    }

    // Analysis, all running on the postorder evaluator

    /// Number of distinct node objects reachable from this root
    pub fn node_count(&self) -> usize {
        let mut count = 0usize;
        infallible(postorder(self, |_, _: &[&()]| {
            count += 1;
            Ok(())
        }));
        count
    }

    /// Number of nodes counted once per occurrence, as if the DAG were
    /// expanded into a tree (saturates at `usize::MAX`)
    pub fn tree_size(&self) -> usize {
        infallible(postorder(self, |_, operands: &[&usize]| {
            Ok(operands
                .iter()
                .fold(1usize, |acc, &&size| acc.saturating_add(size)))
        }))
    }

    /// Length of the longest root-to-leaf path, counted in nodes
    pub fn depth(&self) -> usize {
        infallible(postorder(self, |_, operands: &[&usize]| {
            Ok(1 + operands.iter().map(|&&d| d).max().unwrap_or(0))
        }))
    }

    /// Check if any `Symbol` node named `var` is reachable
    pub fn contains_var(&self, var: &str) -> bool {
        infallible(postorder(self, |node, operands: &[&bool]| {
            Ok(match node.kind() {
                ExprKind::Symbol(s) => s == var,
                _ => operands.iter().any(|&&found| found),
            })
        }))
    }

    /// Collect the names of all symbols in the expression
    pub fn variables(&self) -> HashSet<String> {
        let mut vars = HashSet::new();
        infallible(postorder(self, |node, _: &[&()]| {
            if let ExprKind::Symbol(s) = node.kind() {
                vars.insert(s.name().to_string());
            }
            Ok(())
        }));
        vars
    }

    /// Differentiate with respect to `var` (convenience wrapper)
    ///
    /// Shorthand for `Diff::new().differentiate_by_name(self, var)` with the
    /// default node limit.
    pub fn diff(&self, var: &str) -> Result<Expr> {
        crate::differentiate(self, var)
    }
}

fn infallible<T>(result: std::result::Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}
