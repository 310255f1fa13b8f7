use std::borrow::BorrowMut;

use anyhow::{Context, Result};
use itertools::Itertools;
use pest::Parser as _;
use pest_derive::Parser;

use crate::ast::{BinaryOp, Equation, Expr};

#[derive(Parser)]
#[grammar = "equation.pest"]
struct Parser;

type Pair<'a> = pest::iterators::Pair<'a, Rule>;
type Pairs<'a> = pest::iterators::Pairs<'a, Rule>;

pub fn parse_equation(code: &str) -> Result<Equation> {
    let equation = Parser::parse(Rule::equation, code)
        .with_context(|| format!("Failed to parse equation {:?}", code))?
        .next()
        .unwrap();

    let mut pairs = equation.into_inner();
    let lhs = Expr::from(expect_next_rule(&mut pairs, Rule::expr));
    let rhs = Expr::from(expect_next_rule(&mut pairs, Rule::expr));

    Ok(Equation { lhs, rhs })
}

fn expect_next_rule<'a, P: BorrowMut<Pairs<'a>>>(mut pairs: P, rule: Rule) -> Pair<'a> {
    let pair = pairs.borrow_mut().next().expect("missing pair");
    assert_eq!(pair.as_rule(), rule);
    pair
}

impl From<Pair<'_>> for BinaryOp {
    fn from(pair: Pair<'_>) -> Self {
        match pair.as_str() {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Subtract,
            "*" => BinaryOp::Multiply,
            "/" => BinaryOp::Divide,
            _ => unreachable!(),
        }
    }
}

impl From<Pair<'_>> for Expr {
    fn from(pair: Pair<'_>) -> Self {
        match pair.as_rule() {
            // Left-associative chains of operand (operator operand)*.
            Rule::expr | Rule::term => {
                let mut pairs = pair.into_inner();
                let first = Expr::from(pairs.next().expect("missing operand"));
                pairs.tuples::<(Pair, Pair)>().fold(first, |lhs, (op, rhs)| {
                    Expr::binary(BinaryOp::from(op), lhs, Expr::from(rhs))
                })
            }

            Rule::factor => Expr::from(pair.into_inner().next().expect("missing factor")),

            Rule::negation => Expr::Negate(Box::new(Expr::from(expect_next_rule(
                pair.into_inner(),
                Rule::factor,
            )))),

            Rule::number => Expr::Number(pair.as_str().parse().unwrap()),

            Rule::variable => Expr::Variable(pair.as_str().to_owned()),

            _ => unreachable!(),
        }
    }
}
