//! Operator overloading for ergonomic expression building
//!
//! Raw numbers are lifted to `Number` terminals and raw strings to `Symbol`
//! terminals, so both operand orders work:
//!
//! ```
//! use symb_dag::Expr;
//!
//! let x = Expr::symbol("x");
//! assert_eq!((&x + 5.0).to_string(), "x + 5");
//! assert_eq!((5.0 + &x).to_string(), "5 + x");
//! assert_eq!(("y" * x.clone()).to_string(), "y * x");
//! ```
//!
//! `^` builds a power, but Rust parses it with lower precedence than `+`,
//! `-`, `*` and `/`: `x ^ 2 + 1` means `x ^ (2 + 1)`. Use [`Expr::pow`] or
//! explicit parentheses when mixing it with other operators.

use std::ops::{Add, BitXor, Div, Mul, Neg, Sub};

use crate::{Expr, Symbol};

// Integers lift through `as f64`; an `i64` beyond 2^53 in magnitude rounds
// to the nearest representable value.
macro_rules! impl_number_lift {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Expr {
                fn from(n: $t) -> Self {
                    Expr::number(n as f64)
                }
            }
        )*
    };
}

impl_number_lift!(f64, f32, i32, i64, u32);

impl From<&str> for Expr {
    fn from(name: &str) -> Self {
        Expr::symbol(name)
    }
}

impl From<String> for Expr {
    fn from(name: String) -> Self {
        Expr::symbol(name)
    }
}

impl From<Symbol> for Expr {
    fn from(s: Symbol) -> Self {
        s.to_expr()
    }
}

impl From<&Symbol> for Expr {
    fn from(s: &Symbol) -> Self {
        s.to_expr()
    }
}

// Reuses the node: the result shares identity with the borrowed handle
impl From<&Expr> for Expr {
    fn from(e: &Expr) -> Self {
        e.clone()
    }
}

// ===== Binary operators =====
// Node (owned or borrowed) on the left with anything liftable on the right,
// plus raw literals on the left with a node on the right.

macro_rules! impl_binary_ops {
    (@lhs $op:ident, $method:ident => $build:path, $($lhs:ty),*) => {
        $(
            impl $op<Expr> for $lhs {
                type Output = Expr;
                fn $method(self, rhs: Expr) -> Expr {
                    $build(Expr::from(self), rhs)
                }
            }

            impl $op<&Expr> for $lhs {
                type Output = Expr;
                fn $method(self, rhs: &Expr) -> Expr {
                    $build(Expr::from(self), rhs.clone())
                }
            }
        )*
    };
    ($($op:ident, $method:ident => $build:path;)*) => {
        $(
            impl<T: Into<Expr>> $op<T> for Expr {
                type Output = Expr;
                fn $method(self, rhs: T) -> Expr {
                    $build(self, rhs.into())
                }
            }

            impl<T: Into<Expr>> $op<T> for &Expr {
                type Output = Expr;
                fn $method(self, rhs: T) -> Expr {
                    $build(self.clone(), rhs.into())
                }
            }

            impl_binary_ops!(@lhs $op, $method => $build, f64, i32, &str);
        )*
    };
}

impl_binary_ops! {
    Add, add => Expr::add_expr;
    Sub, sub => Expr::sub_expr;
    Mul, mul => Expr::mul_expr;
    Div, div => Expr::div_expr;
    BitXor, bitxor => Expr::pow_expr;
}

impl Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        Expr::mul_expr(Expr::number(-1.0), self)
    }
}

impl Neg for &Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        -self.clone()
    }
}

impl Expr {
    /// Raise to a power (Rust's `^` is XOR-precedence, this is the safe spelling)
    #[inline]
    pub fn pow(self, exp: impl Into<Expr>) -> Expr {
        Expr::pow_expr(self, exp.into())
    }
}

/// Build `base ^ exp`, lifting either side
pub fn pow(base: impl Into<Expr>, exp: impl Into<Expr>) -> Expr {
    Expr::pow_expr(base.into(), exp.into())
}
