use itertools::Itertools;

use crate::relation::Relation;
use crate::select::Selection;
use crate::tuple::{Attribute, Tuple};

/// `r` followed by every tuple of `s` not already accumulated.
pub fn union(r: &[Tuple], s: &[Tuple]) -> Vec<Tuple> {
    let mut results = r.to_vec();
    for tuple in s {
        if !results.contains(tuple) {
            results.push(tuple.clone());
        }
    }
    results
}

/// Cartesian product. Callers pass attribute-disjoint tuples.
pub fn times(r: &[Tuple], s: &[Tuple]) -> Vec<Tuple> {
    r.iter()
        .cartesian_product(s)
        .map(|(r_tuple, s_tuple)| r_tuple.merge(s_tuple))
        .collect()
}

/// Probes `s` once per tuple of `r` with the `attributes` of that tuple as
/// bindings. A single undecidable probe makes the whole join undecidable.
pub fn join(r: &[Tuple], s: &Relation, attributes: &[Attribute]) -> Selection {
    let mut results = vec![];

    for r_tuple in r {
        let bindings = r_tuple.project(attributes);

        let s_tuples = match s.select(&bindings) {
            Selection::Tuples(tuples) => tuples,
            Selection::Indefinite => return Selection::Indefinite,
        };

        results.extend(s_tuples.iter().map(|s_tuple| r_tuple.merge(s_tuple)));
    }

    Selection::Tuples(results)
}
