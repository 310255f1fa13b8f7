use std::rc::Rc;

use itertools::Itertools;
use tracing::debug;

use crate::algebra::{join, times, union};
use crate::error::{Error, Result};
use crate::relation::Relation;
use crate::select::{Production, Selection};
use crate::tuple::{Attribute, Heading, Tuple};

/// How the bounded selections of two indefinite operands are combined.
enum Combine {
    Times,
    Join(Vec<Attribute>),
}

fn select_both(r: &Relation, s: &Relation, bindings: &Tuple) -> Selection {
    let r_tuples = match r.select(bindings) {
        Selection::Tuples(tuples) => tuples,
        Selection::Indefinite => return Selection::Indefinite,
    };
    let s_tuples = match s.select(bindings) {
        Selection::Tuples(tuples) => tuples,
        Selection::Indefinite => return Selection::Indefinite,
    };
    Selection::Tuples(union(&r_tuples, &s_tuples))
}

impl Relation {
    /// Natural join; Cartesian product when the headings are disjoint.
    pub fn and(&self, other: &Relation) -> Result<Relation> {
        let common = self.heading().common(other.heading())?;
        self.and_on(other, common)
    }

    fn and_on(&self, other: &Relation, common: Vec<Attribute>) -> Result<Relation> {
        let heading = self.heading().merge(other.heading())?;

        if self.is_empty() || other.is_empty() {
            return Ok(Relation::new(heading));
        }

        let relation = match (self.is_definite(), other.is_definite()) {
            (true, true) if common.is_empty() => Relation::definite(
                heading,
                times(self.known_tuples(), other.known_tuples()),
            ),
            _ if common.is_empty() => and_any_indefinite(heading, self, other, Combine::Times),
            (true, _) => and_one_indefinite(heading, self, other, common),
            (false, true) => and_one_indefinite(heading, other, self, common),
            (false, false) => {
                and_any_indefinite(heading, self, other, Combine::Join(common))
            }
        };

        Ok(relation)
    }

    /// Union. Attributes outside the shared part of the headings must be
    /// bound before a membership can be decided, and accept any value.
    pub fn or(&self, other: &Relation) -> Result<Relation> {
        let common = self.heading().common(other.heading())?;
        let heading = self.heading().merge(other.heading())?;
        let degree = heading.degree();

        if common.is_empty() {
            return Ok(Relation::with_rule(heading, move |bindings| {
                if bindings.len() != degree {
                    Production::Indefinite
                } else {
                    Production::Satisfied
                }
            }));
        }

        let r = Rc::new(self.clone());
        let s = Rc::new(other.clone());

        if common.len() == degree {
            return Ok(match select_both(&r, &s, &Tuple::new()) {
                Selection::Tuples(tuples) => Relation::definite(heading, tuples),
                Selection::Indefinite => Relation::with_rule(heading, move |bindings| {
                    select_both(&r, &s, bindings).into()
                }),
            });
        }

        let uncommon: Vec<Attribute> = heading
            .attributes()
            .filter(|attribute| !common.contains(attribute))
            .cloned()
            .collect();

        Ok(Relation::with_rule(heading, move |bindings| {
            if uncommon.iter().any(|attribute| !bindings.contains(attribute)) {
                return Production::Indefinite;
            }

            let common_bindings = bindings.project(&common);

            let tuples = match r.select(&common_bindings) {
                Selection::Tuples(tuples) if !tuples.is_empty() => tuples,
                _ => match s.select(&common_bindings) {
                    Selection::Indefinite => return Production::Indefinite,
                    Selection::Tuples(tuples) if tuples.is_empty() => {
                        return Production::Nothing
                    }
                    Selection::Tuples(tuples) => tuples,
                },
            };

            Production::Tuples(tuples.iter().map(|tuple| tuple.merge(bindings)).collect())
        }))
    }

    /// Closed-world complement. Only full bindings are decidable.
    pub fn not(&self) -> Relation {
        if let Some(original) = &self.negation_of {
            return (**original).clone();
        }

        let degree = self.degree();
        let r = Rc::new(self.clone());
        let negated = Rc::clone(&r);

        let mut relation = Relation::with_rule(self.heading().clone(), move |bindings| {
            if bindings.len() != degree {
                return Production::Indefinite;
            }

            match r.select(bindings) {
                Selection::Indefinite => Production::Indefinite,
                Selection::Tuples(tuples) => tuples.is_empty().into(),
            }
        });
        relation.negation_of = Some(negated);
        relation
    }

    pub fn rename(&self, mapping: &[(&str, &str)]) -> Result<Relation> {
        let mut heading = self.heading().clone();
        let mut renames: Vec<(Attribute, Attribute)> = vec![];

        for &(from, to) in mapping {
            if !heading.contains(from) {
                return Err(Error::NotInHeading(from.to_owned()));
            }
            if self.heading().contains(to) || heading.contains(to) {
                return Err(Error::AlreadyInHeading(to.to_owned()));
            }

            if let Some(ty) = heading.remove(from) {
                heading.insert(to.to_owned(), ty);
            }
            renames.push((from.to_owned(), to.to_owned()));
        }

        if self.is_empty() {
            return Ok(Relation::new(heading));
        }

        let apply = move |tuples: &[Tuple]| -> Vec<Tuple> {
            tuples
                .iter()
                .map(|tuple| {
                    let mut renamed = tuple.clone();
                    for (from, to) in &renames {
                        if let Some(value) = renamed.remove(from) {
                            renamed.insert(to.clone(), value);
                        }
                    }
                    renamed
                })
                .collect()
        };

        if self.is_definite() {
            let tuples = apply(self.known_tuples());
            return Ok(Relation::definite(heading, tuples));
        }

        let r = Rc::new(self.clone());
        let inverse: Vec<(Attribute, Attribute)> = mapping
            .iter()
            .map(|&(from, to)| (to.to_owned(), from.to_owned()))
            .collect();

        Ok(Relation::with_rule(heading, move |bindings| {
            let mut original = bindings.clone();
            for (to, from) in &inverse {
                if let Some(value) = original.remove(to) {
                    original.insert(from.clone(), value);
                }
            }

            match r.select(&original) {
                Selection::Indefinite => Production::Indefinite,
                Selection::Tuples(tuples) => Production::Tuples(apply(&tuples)),
            }
        }))
    }

    /// Drops attributes. Removing every attribute leaves a 0-degree
    /// relation that is TRUE iff this relation has any match.
    pub fn remove<A: AsRef<str>>(&self, attributes: &[A]) -> Result<Relation> {
        let attributes = self.known_attributes(attributes)?;
        let heading = self.heading().without(&attributes);

        if heading.degree() == 0 {
            let tuples = if self.has(&Tuple::new()) {
                vec![Tuple::new()]
            } else {
                vec![]
            };
            return Ok(Relation::definite(heading, tuples));
        }

        if self.is_definite() {
            let tuples = self
                .known_tuples()
                .iter()
                .map(|tuple| tuple.without(&attributes))
                .unique()
                .collect();
            return Ok(Relation::definite(heading, tuples));
        }

        let r = Rc::new(self.clone());
        let degree = heading.degree();

        Ok(Relation::with_rule(heading, move |bindings| {
            match r.select(bindings) {
                Selection::Indefinite if bindings.len() == degree => Production::Satisfied,
                Selection::Indefinite => Production::Indefinite,
                Selection::Tuples(tuples) => Production::Tuples(
                    tuples
                        .iter()
                        .map(|tuple| tuple.without(&attributes))
                        .collect(),
                ),
            }
        }))
    }

    /// Keeps only the listed attributes.
    pub fn project<A: AsRef<str>>(&self, attributes: &[A]) -> Result<Relation> {
        let attributes = self.known_attributes(attributes)?;

        let removed: Vec<Attribute> = self
            .heading()
            .attributes()
            .filter(|a| !attributes.contains(a))
            .cloned()
            .collect();

        if removed.is_empty() {
            return Ok(self.clone());
        }

        self.remove(&removed)
    }

    fn known_attributes<A: AsRef<str>>(&self, attributes: &[A]) -> Result<Vec<Attribute>> {
        attributes
            .iter()
            .map(|a| {
                let a = a.as_ref();
                if self.heading().contains(a) {
                    Ok(a.to_owned())
                } else {
                    Err(Error::NotInHeading(a.to_owned()))
                }
            })
            .collect()
    }

    /// Join, then hide the join attributes.
    pub fn compose(&self, other: &Relation) -> Result<Relation> {
        let common = self.heading().common(other.heading())?;
        let joined = self.and_on(other, common.clone())?;

        if common.is_empty() {
            return Ok(joined);
        }

        joined.remove(&common)
    }
}

/// `definite` is joined against `other`. When `other` cannot answer the
/// probes, the join is retried per query with the query's bindings.
fn and_one_indefinite(
    heading: Heading,
    definite: &Relation,
    other: &Relation,
    common: Vec<Attribute>,
) -> Relation {
    let tuples = match join(definite.known_tuples(), other, &common) {
        Selection::Tuples(tuples) => return Relation::definite(heading, tuples),
        Selection::Indefinite => definite.known_tuples().to_vec(),
    };

    debug!(
        heading = %heading,
        common = ?common,
        "join against indefinite relation deferred to query time"
    );

    let other = Rc::new(other.clone());

    Relation::with_rule(heading, move |bindings| {
        let mut widened = common.clone();
        for attribute in bindings.attributes() {
            if other.heading().contains(attribute) && !widened.contains(attribute) {
                widened.push(attribute.clone());
            }
        }

        let restricted: Vec<Tuple> = tuples
            .iter()
            .filter(|tuple| tuple.agrees_with(bindings))
            .map(|tuple| tuple.merge(bindings))
            .collect();

        join(&restricted, &other, &widened).into()
    })
}

fn and_any_indefinite(heading: Heading, r: &Relation, s: &Relation, combine: Combine) -> Relation {
    let r = Rc::new(r.clone());
    let s = Rc::new(s.clone());

    Relation::with_rule(heading, move |bindings| {
        let r_tuples = match r.select(&bindings.restrict(r.heading())) {
            Selection::Indefinite => return Production::Indefinite,
            Selection::Tuples(tuples) if tuples.is_empty() => return Production::Nothing,
            Selection::Tuples(tuples) => tuples,
        };

        let s_tuples = match s.select(&bindings.restrict(s.heading())) {
            Selection::Indefinite => return Production::Indefinite,
            Selection::Tuples(tuples) if tuples.is_empty() => return Production::Nothing,
            Selection::Tuples(tuples) => tuples,
        };

        match &combine {
            Combine::Times => Production::Tuples(times(&r_tuples, &s_tuples)),
            Combine::Join(common) => {
                let s_selected = Relation::definite(s.heading().clone(), s_tuples);
                join(&r_tuples, &s_selected, common).into()
            }
        }
    })
}
