//! Tree interpreter over host `f64` arithmetic.

use super::parser::{BinOp, Expr};

/// Evaluate `expr`. Domain errors surface as NaN or infinity; the caller
/// decides whether a non-finite result is acceptable.
#[must_use]
pub fn eval(expr: &Expr) -> f64 {
    match expr {
        Expr::Number(v) => *v,
        Expr::Neg(inner) => -eval(inner),
        Expr::Binary { op, lhs, rhs } => {
            let (a, b) = (eval(lhs), eval(rhs));
            match op {
                BinOp::Add => a + b,
                BinOp::Sub => a - b,
                BinOp::Mul => a * b,
                BinOp::Div => a / b,
                BinOp::Rem => a % b,
                BinOp::Pow => pow(a, b),
            }
        }
        Expr::Call { func, arg } => func.apply(eval(arg)),
        Expr::Factorial(n) => factorial(*n),
    }
}

/// `n!` for non-negative integers; NaN for anything else.
///
/// Overflows to infinity past `170!`.
#[must_use]
pub fn factorial(n: f64) -> f64 {
    if n < 0.0 || n.fract() != 0.0 || n.is_nan() {
        return f64::NAN;
    }
    let mut acc = 1.0_f64;
    let mut k = n;
    while k > 1.0 {
        acc *= k;
        if acc.is_infinite() {
            break;
        }
        k -= 1.0;
    }
    acc
}

/// Exponentiation with `(±1)^±∞ = NaN`, where `powf` would return 1.
#[must_use]
pub fn pow(base: f64, exponent: f64) -> f64 {
    if exponent.is_infinite() && base.abs() == 1.0 {
        return f64::NAN;
    }
    base.powf(exponent)
}
