use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use itertools::Itertools;

use crate::error::{Error, Result};
use crate::select::{Production, Rule, Selection};
use crate::tuple::{Heading, Tuple};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cardinality {
    Finite(usize),
    Indefinite,
}

#[derive(Clone)]
pub(crate) enum Body {
    Definite(Vec<Tuple>),
    Indefinite {
        seed: Vec<Tuple>,
        rule: Rule,
        excluded: Vec<Tuple>,
    },
}

/// A heading plus either a materialized body or a rule answering bounded
/// queries.
#[derive(Clone)]
pub struct Relation {
    heading: Heading,
    pub(crate) body: Body,
    /// Set on relations built by `not`, pointing at the negated operand.
    pub(crate) negation_of: Option<Rc<Relation>>,
}

impl Relation {
    pub fn new(heading: Heading) -> Self {
        Self::definite(heading, vec![])
    }

    pub fn with_body(heading: Heading, tuples: impl IntoIterator<Item = Tuple>) -> Result<Self> {
        let mut relation = Self::new(heading);
        for tuple in tuples {
            relation.add(tuple)?;
        }
        Ok(relation)
    }

    /// Infers the heading from the value types of the first tuple.
    pub fn from_tuples(tuples: impl IntoIterator<Item = Tuple>) -> Result<Self> {
        let mut tuples = tuples.into_iter().peekable();
        let heading = tuples.peek().map(Heading::from).unwrap_or_default();
        Self::with_body(heading, tuples)
    }

    pub fn with_rule<F>(heading: Heading, rule: F) -> Self
    where
        F: Fn(&Tuple) -> Production + 'static,
    {
        let mut relation = Self::new(heading);
        relation.rule(rule);
        relation
    }

    /// Tuples must already satisfy the heading and be free of duplicates.
    pub(crate) fn definite(heading: Heading, tuples: Vec<Tuple>) -> Self {
        Self {
            heading,
            body: Body::Definite(tuples),
            negation_of: None,
        }
    }

    /// Turns the relation indefinite. The current body is kept as seed.
    pub fn rule<F>(&mut self, rule: F)
    where
        F: Fn(&Tuple) -> Production + 'static,
    {
        let rule: Rule = Rc::new(rule);
        self.negation_of = None;
        self.body = match std::mem::replace(&mut self.body, Body::Definite(vec![])) {
            Body::Definite(seed) => Body::Indefinite {
                seed,
                rule,
                excluded: vec![],
            },
            Body::Indefinite { seed, excluded, .. } => Body::Indefinite {
                seed,
                rule,
                excluded,
            },
        };
    }

    pub fn heading(&self) -> &Heading {
        &self.heading
    }

    pub fn degree(&self) -> usize {
        self.heading.degree()
    }

    pub fn size(&self) -> Cardinality {
        match &self.body {
            Body::Definite(tuples) => Cardinality::Finite(tuples.len()),
            Body::Indefinite { .. } => Cardinality::Indefinite,
        }
    }

    pub fn is_definite(&self) -> bool {
        matches!(self.body, Body::Definite(_))
    }

    /// Known to hold no tuple at all.
    pub fn is_empty(&self) -> bool {
        self.size() == Cardinality::Finite(0)
    }

    pub fn to_bool(&self) -> bool {
        !self.is_empty()
    }

    /// The definite body, or the seed of an indefinite relation.
    pub(crate) fn known_tuples(&self) -> &[Tuple] {
        match &self.body {
            Body::Definite(tuples) => tuples,
            Body::Indefinite { seed, .. } => seed,
        }
    }

    pub fn add(&mut self, tuple: Tuple) -> Result<&mut Self> {
        self.heading.validate(&tuple)?;

        if self.has(&tuple) {
            return Ok(self);
        }

        self.negation_of = None;
        match &mut self.body {
            Body::Definite(tuples) => tuples.push(tuple),
            Body::Indefinite { seed, excluded, .. } => {
                excluded.retain(|t| t != &tuple);
                seed.push(tuple);
            }
        }

        Ok(self)
    }

    /// Returns whether the tuple was present.
    pub fn delete(&mut self, tuple: &Tuple) -> bool {
        let accepted = match &self.body {
            Body::Definite(_) => false,
            Body::Indefinite { .. } => self.degree() == tuple.len() && self.has(tuple),
        };

        self.negation_of = None;

        match &mut self.body {
            Body::Definite(tuples) => match tuples.iter().position(|t| t == tuple) {
                Some(index) => {
                    tuples.remove(index);
                    true
                }
                None => false,
            },
            Body::Indefinite { seed, excluded, .. } => {
                seed.retain(|t| t != tuple);
                if accepted {
                    excluded.push(tuple.clone());
                }
                accepted
            }
        }
    }

    pub fn tuples(&self) -> Result<&[Tuple]> {
        match &self.body {
            Body::Definite(tuples) => Ok(tuples),
            Body::Indefinite { .. } => Err(Error::IndefiniteCardinality),
        }
    }

    pub fn values(&self) -> Result<std::slice::Iter<'_, Tuple>> {
        Ok(self.tuples()?.iter())
    }

    pub fn into_tuples(self) -> Result<Vec<Tuple>> {
        match self.body {
            Body::Definite(tuples) => Ok(tuples),
            Body::Indefinite { .. } => Err(Error::IndefiniteCardinality),
        }
    }

    /// Same as [`Relation::select`] with no bindings.
    pub fn select_all(&self) -> Selection {
        self.select(&Tuple::new())
    }
}

impl PartialEq for Relation {
    fn eq(&self, other: &Self) -> bool {
        fn same_set(a: &[Tuple], b: &[Tuple]) -> bool {
            a.len() == b.len() && a.iter().all(|t| b.contains(t))
        }

        if self.heading != other.heading {
            return false;
        }

        match (&self.body, &other.body) {
            (Body::Definite(a), Body::Definite(b)) => same_set(a, b),
            (
                Body::Indefinite {
                    seed: a_seed,
                    rule: a_rule,
                    excluded: a_excluded,
                },
                Body::Indefinite {
                    seed: b_seed,
                    rule: b_rule,
                    excluded: b_excluded,
                },
            ) => {
                Rc::ptr_eq(a_rule, b_rule)
                    && same_set(a_seed, b_seed)
                    && same_set(a_excluded, b_excluded)
            }
            _ => false,
        }
    }
}

impl Eq for Relation {}

impl Hash for Relation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.heading.hash(state);
        self.size().hash(state);
    }
}

impl fmt::Debug for Relation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut s = f.debug_struct("Relation");
        s.field("heading", &self.heading);
        match &self.body {
            Body::Definite(tuples) => s.field("body", tuples),
            Body::Indefinite { seed, excluded, .. } => s
                .field("seed", seed)
                .field("excluded", excluded)
                .field("rule", &format_args!("<rule>")),
        };
        s.finish()
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.body {
            Body::Definite(tuples) => {
                write!(f, "{} [{}]", self.heading, tuples.iter().join(", "))
            }
            Body::Indefinite { .. } => write!(f, "{} [..]", self.heading),
        }
    }
}
