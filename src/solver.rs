use anyhow::{anyhow, bail, Result};
use num_bigint::{BigInt, Sign};

use crate::ast::{BinaryOp, Equation, Expr};
use crate::tuple::Tuple;

fn is_zero(n: &BigInt) -> bool {
    n.sign() == Sign::NoSign
}

fn divide_exactly(dividend: &BigInt, divisor: &BigInt) -> Result<BigInt> {
    if is_zero(divisor) {
        bail!("division by zero");
    }
    if !is_zero(&(dividend % divisor)) {
        bail!("{} is not divisible by {}", dividend, divisor);
    }
    Ok(dividend / divisor)
}

fn evaluate(expr: &Expr, bindings: &Tuple) -> Result<BigInt> {
    match expr {
        Expr::Number(n) => Ok(n.clone()),
        Expr::Variable(name) => bindings
            .get(name)
            .ok_or_else(|| anyhow!("variable {:?} is not bound", name))?
            .as_integer()
            .cloned()
            .ok_or_else(|| anyhow!("variable {:?} is not bound to an integer", name)),
        Expr::Negate(inner) => Ok(-evaluate(inner, bindings)?),
        Expr::Binary(op, lhs, rhs) => {
            let lhs = evaluate(lhs, bindings)?;
            let rhs = evaluate(rhs, bindings)?;
            match op {
                BinaryOp::Add => Ok(lhs + rhs),
                BinaryOp::Subtract => Ok(lhs - rhs),
                BinaryOp::Multiply => Ok(lhs * rhs),
                BinaryOp::Divide => divide_exactly(&lhs, &rhs),
            }
        }
    }
}

/// Evaluates both sides under `bindings` and compares them.
pub fn holds(equation: &Equation, bindings: &Tuple) -> Result<bool> {
    Ok(evaluate(&equation.lhs, bindings)? == evaluate(&equation.rhs, bindings)?)
}

/// Solves `equation` for `unknown`, all other variables taken from
/// `bindings`. The unknown must occur exactly once; the side holding it is
/// inverted one operation at a time. Arithmetic is exact over integers.
pub fn solve(equation: &Equation, bindings: &Tuple, unknown: &str) -> Result<BigInt> {
    let (mut side, other) = match (
        equation.lhs.occurrences(unknown),
        equation.rhs.occurrences(unknown),
    ) {
        (1, 0) => (&equation.lhs, &equation.rhs),
        (0, 1) => (&equation.rhs, &equation.lhs),
        (0, 0) => bail!("{:?} does not occur in the equation", unknown),
        _ => bail!("{:?} occurs more than once in the equation", unknown),
    };

    let mut value = evaluate(other, bindings)?;

    loop {
        match side {
            Expr::Variable(_) => return Ok(value),

            Expr::Number(_) => bail!("{:?} does not occur in the equation", unknown),

            Expr::Negate(inner) => {
                value = -value;
                side = &**inner;
            }

            Expr::Binary(op, lhs, rhs) if lhs.occurrences(unknown) == 1 => {
                let known = evaluate(rhs, bindings)?;
                value = match op {
                    BinaryOp::Add => value - known,
                    BinaryOp::Subtract => value + known,
                    BinaryOp::Multiply => divide_exactly(&value, &known)?,
                    BinaryOp::Divide => {
                        if is_zero(&known) {
                            bail!("division by zero");
                        }
                        value * known
                    }
                };
                side = &**lhs;
            }

            Expr::Binary(op, lhs, rhs) => {
                let known = evaluate(lhs, bindings)?;
                value = match op {
                    BinaryOp::Add => value - known,
                    BinaryOp::Subtract => known - value,
                    BinaryOp::Multiply => divide_exactly(&value, &known)?,
                    BinaryOp::Divide => divide_exactly(&known, &value)?,
                };
                side = &**rhs;
            }
        }
    }
}
