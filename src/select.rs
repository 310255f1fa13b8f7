use std::rc::Rc;

use crate::algebra::union;
use crate::relation::{Body, Relation};
use crate::tuple::Tuple;

/// Answer of [`Relation::select`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    Tuples(Vec<Tuple>),
    /// The bindings do not carry enough information to decide.
    Indefinite,
}

impl Selection {
    pub fn is_indefinite(&self) -> bool {
        matches!(self, Selection::Indefinite)
    }

    /// `true` for an undecidable answer or at least one tuple.
    pub fn is_match(&self) -> bool {
        match self {
            Selection::Tuples(tuples) => !tuples.is_empty(),
            Selection::Indefinite => true,
        }
    }

    pub fn tuples(self) -> Option<Vec<Tuple>> {
        match self {
            Selection::Tuples(tuples) => Some(tuples),
            Selection::Indefinite => None,
        }
    }
}

/// What a rule produces for a set of bindings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Production {
    Indefinite,
    /// No tuple beyond the seed body.
    Nothing,
    /// The bindings themselves are a member.
    Satisfied,
    /// Produced tuples; each is merged with the bindings.
    Tuples(Vec<Tuple>),
}

impl From<bool> for Production {
    fn from(satisfied: bool) -> Self {
        if satisfied {
            Production::Satisfied
        } else {
            Production::Nothing
        }
    }
}

impl From<Selection> for Production {
    fn from(selection: Selection) -> Self {
        match selection {
            Selection::Tuples(tuples) => Production::Tuples(tuples),
            Selection::Indefinite => Production::Indefinite,
        }
    }
}

pub type Rule = Rc<dyn Fn(&Tuple) -> Production>;

fn select_body(body: &[Tuple], bindings: &Tuple) -> Vec<Tuple> {
    if bindings.is_empty() {
        return body.to_vec();
    }

    body.iter()
        .filter(|tuple| tuple.matches(bindings))
        .cloned()
        .collect()
}

impl Relation {
    /// The single query primitive: tuples matching `bindings`, or
    /// [`Selection::Indefinite`] when a rule cannot decide.
    pub fn select(&self, bindings: &Tuple) -> Selection {
        match &self.body {
            Body::Definite(tuples) => Selection::Tuples(select_body(tuples, bindings)),

            Body::Indefinite {
                seed,
                rule,
                excluded,
            } => {
                // An attribute outside the heading never matches, as for a
                // definite body.
                if bindings.attributes().any(|a| !self.heading().contains(a)) {
                    return Selection::Tuples(vec![]);
                }

                let seeded = select_body(seed, bindings);

                let produced = match rule(bindings) {
                    Production::Indefinite => return Selection::Indefinite,
                    Production::Nothing => vec![],
                    Production::Satisfied => vec![bindings.clone()],
                    Production::Tuples(tuples) => tuples
                        .iter()
                        .map(|tuple| tuple.merge(bindings))
                        .collect(),
                };

                let mut tuples = union(&seeded, &produced);
                tuples.retain(|tuple| !excluded.contains(tuple));
                Selection::Tuples(tuples)
            }
        }
    }

    /// Membership; an undecidable probe counts as present.
    pub fn has(&self, tuple: &Tuple) -> bool {
        self.select(tuple).is_match()
    }
}
