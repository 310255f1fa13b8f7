use itertools::Itertools;
use num_bigint::BigInt;

pub type Variable = String;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Number(BigInt),
    Variable(Variable),
    Negate(Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn var(name: &str) -> Self {
        Expr::Variable(name.to_owned())
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    /// Number of occurrences of `variable`.
    pub fn occurrences(&self, variable: &str) -> usize {
        match self {
            Expr::Number(_) => 0,
            Expr::Variable(name) => usize::from(name == variable),
            Expr::Negate(inner) => inner.occurrences(variable),
            Expr::Binary(_, lhs, rhs) => lhs.occurrences(variable) + rhs.occurrences(variable),
        }
    }

    fn collect_variables<'a>(&'a self, out: &mut Vec<&'a Variable>) {
        match self {
            Expr::Number(_) => {}
            Expr::Variable(name) => out.push(name),
            Expr::Negate(inner) => inner.collect_variables(out),
            Expr::Binary(_, lhs, rhs) => {
                lhs.collect_variables(out);
                rhs.collect_variables(out);
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Equation {
    pub lhs: Expr,
    pub rhs: Expr,
}

impl Equation {
    /// Distinct variables in order of first appearance.
    pub fn variables(&self) -> Vec<Variable> {
        let mut all = vec![];
        self.lhs.collect_variables(&mut all);
        self.rhs.collect_variables(&mut all);
        all.into_iter().unique().cloned().collect()
    }
}
