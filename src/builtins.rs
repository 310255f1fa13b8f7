//! Rule-defined relations over integers.
//!
//! All of them are indefinite: they answer once enough attributes are bound
//! and are typically used through [`Relation::compose`] or [`Relation::and`].

use std::cmp::Ordering;

use num_bigint::{BigInt, Sign};
use tracing::trace;

use crate::ast::{BinaryOp, Equation, Expr};
use crate::error::Result;
use crate::parser::parse_equation;
use crate::relation::Relation;
use crate::select::Production;
use crate::solver::{holds, solve};
use crate::tuple;
use crate::tuple::{Heading, Tuple, Type};

fn integer_heading<'a>(attributes: impl IntoIterator<Item = &'a str>) -> Heading {
    attributes
        .into_iter()
        .map(|attribute| (attribute, Type::Integer))
        .collect()
}

/// Parses `text` and builds the relation of all integer assignments that
/// satisfy it.
pub fn equation(text: &str) -> anyhow::Result<Relation> {
    Ok(equation_relation(parse_equation(text)?))
}

/// Fewer than `n - 1` bound variables is undecidable, `n - 1` solves for the
/// missing one and a full binding is evaluated directly.
pub fn equation_relation(equation: Equation) -> Relation {
    let variables = equation.variables();
    let heading = integer_heading(variables.iter().map(String::as_str));

    Relation::with_rule(heading, move |bindings| {
        if bindings.len() + 1 < variables.len() {
            return Production::Indefinite;
        }

        let unknown = match variables.iter().find(|v| !bindings.contains(v)) {
            Some(unknown) => unknown,
            None => {
                return match holds(&equation, bindings) {
                    Ok(satisfied) => satisfied.into(),
                    Err(error) => {
                        trace!(%error, "equation cannot be evaluated");
                        Production::Nothing
                    }
                }
            }
        };

        match solve(&equation, bindings, unknown) {
            Ok(value) => {
                let mut tuple = Tuple::new();
                tuple.insert(unknown.clone(), value);
                Production::Tuples(vec![tuple])
            }
            Err(error) => {
                trace!(%error, unknown = %unknown, "equation has no solution");
                Production::Nothing
            }
        }
    })
}

fn arithmetic(op: BinaryOp) -> Relation {
    equation_relation(Equation {
        lhs: Expr::binary(op, Expr::var("x"), Expr::var("y")),
        rhs: Expr::var("z"),
    })
}

/// `x + y = z`
pub fn plus() -> Relation {
    arithmetic(BinaryOp::Add)
}

/// `x - y = z`
pub fn subtract() -> Relation {
    arithmetic(BinaryOp::Subtract)
}

/// `x * y = z`
pub fn multiply() -> Relation {
    arithmetic(BinaryOp::Multiply)
}

/// `x / y = z`, exact division only.
pub fn divide() -> Relation {
    arithmetic(BinaryOp::Divide)
}

/// `y * y = x`. Given `x`, produces both integer roots.
pub fn sqrt() -> Relation {
    Relation::with_rule(integer_heading(["x", "y"]), |bindings| {
        let x = bindings.get("x").and_then(|v| v.as_integer());
        let y = bindings.get("y").and_then(|v| v.as_integer());

        let x = match (x, y) {
            (None, None) => return Production::Indefinite,
            (None, Some(y)) => return Production::Tuples(vec![tuple! { "x" => y * y }]),
            (Some(x), _) => x,
        };

        if x.sign() == Sign::Minus {
            return Production::Nothing;
        }

        let y1 = x.sqrt();
        if &(&y1 * &y1) != x {
            return Production::Nothing;
        }
        let y2: BigInt = -&y1;

        if let Some(y) = y {
            if y != &y1 && y != &y2 {
                return Production::Nothing;
            }
        }

        Production::Tuples(vec![tuple! { "y" => y1 }, tuple! { "y" => y2 }])
    })
}

fn comparison(accept: fn(Ordering) -> bool) -> Relation {
    Relation::with_rule(integer_heading(["x", "y"]), move |bindings| {
        match (
            bindings.get("x").and_then(|v| v.as_integer()),
            bindings.get("y").and_then(|v| v.as_integer()),
        ) {
            (Some(x), Some(y)) => accept(x.cmp(y)).into(),
            _ => Production::Indefinite,
        }
    })
}

/// `x > y`
pub fn gt() -> Relation {
    comparison(|ordering| ordering == Ordering::Greater)
}

/// `x >= y`
pub fn gte() -> Relation {
    comparison(|ordering| ordering != Ordering::Less)
}

/// `x < y`
pub fn lt() -> Relation {
    comparison(|ordering| ordering == Ordering::Less)
}

/// `x <= y`
pub fn lte() -> Relation {
    comparison(|ordering| ordering != Ordering::Greater)
}

/// `x >= 0`, built as `gte` composed with `{y: 0}`.
pub fn positive() -> Result<Relation> {
    gte().compose(&Relation::from_tuples([tuple! { "y" => 0 }])?)
}

/// Complement of [`positive`].
pub fn negative() -> Result<Relation> {
    Ok(positive()?.not())
}
