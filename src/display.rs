// Display formatting for expressions
//
// Rendering is a plain recursive descent: a shared sub-DAG is printed once
// per occurrence. A child is parenthesized exactly when its precedence class
// is strictly lower than its parent's, so equal precedence never adds
// parentheses (`a - b - c` and `a - (b - c)` both render as `a - b - c`).
use crate::{Expr, ExprKind};
use std::fmt;

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            ExprKind::Number(n) => format_number(*n, f),

            ExprKind::Symbol(s) => write!(f, "{}", s),

            ExprKind::Function { name, args } => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }

            ExprKind::Add([left, right])
            | ExprKind::Sub([left, right])
            | ExprKind::Mul([left, right])
            | ExprKind::Div([left, right])
            | ExprKind::Pow([left, right]) => {
                let symbol = self.kind().symbol().unwrap_or("?");
                write_operand(self, left, f)?;
                write!(f, " {} ", symbol)?;
                write_operand(self, right, f)
            }
        }
    }
}

/// Write an operand, wrapped in parentheses when it binds looser than `parent`
fn write_operand(parent: &Expr, operand: &Expr, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if operand.precedence() < parent.precedence() {
        write!(f, "({})", operand)
    } else {
        write!(f, "{}", operand)
    }
}

fn format_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_nan() {
        write!(f, "NaN")
    } else if n.is_infinite() {
        if n > 0.0 {
            write!(f, "Infinity")
        } else {
            write!(f, "-Infinity")
        }
    } else if n.fract() == 0.0 && n.abs() < 1e10 {
        // Display as integer if no fractional part
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{}", n)
    }
}

// Unambiguous structural form, e.g. `Mul(Add(Symbol("x"), Number(2.0)), Number(3.0))`
impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.kind(), f)
    }
}

impl fmt::Debug for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprKind::Number(n) => f.debug_tuple("Number").field(n).finish(),
            ExprKind::Symbol(s) => f.debug_tuple("Symbol").field(s).finish(),
            ExprKind::Function { name, args } => {
                f.debug_tuple("Function").field(name).field(args).finish()
            }
            ExprKind::Add([l, r])
            | ExprKind::Sub([l, r])
            | ExprKind::Mul([l, r])
            | ExprKind::Div([l, r])
            | ExprKind::Pow([l, r]) => f.debug_tuple(self.name()).field(l).field(r).finish(),
        }
    }
}
