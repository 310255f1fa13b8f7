use tracing::{debug, trace};

use crate::algebra::union;
use crate::error::{Error, Result};
use crate::relation::Relation;
use crate::tuple::{Attribute, Tuple};

impl Relation {
    /// Transitive closure of a definite binary relation `{a, b}`, where a
    /// tuple reads "a precedes b". Iterates one-step compositions until a
    /// round adds nothing.
    pub fn tclose(&self) -> Result<Relation> {
        if self.degree() != 2 {
            return Err(Error::NotBinary(self.degree()));
        }

        let mut body = self.tuples()?.to_vec();

        let attributes: Vec<&Attribute> = self.heading().attributes().collect();
        let (a, b) = (attributes[0], attributes[1]);

        let mut round = 0;
        loop {
            let mut closures = vec![];
            for tuple1 in &body {
                for tuple2 in &body {
                    if let (Some(a1), Some(b1), Some(a2), Some(b2)) =
                        (tuple1.get(a), tuple1.get(b), tuple2.get(a), tuple2.get(b))
                    {
                        if a1 == b2 {
                            let mut closure = Tuple::new();
                            closure.insert(a.clone(), a2.clone());
                            closure.insert(b.clone(), b1.clone());
                            closures.push(closure);
                        }
                    }
                }
            }

            let next = union(&body, &closures);
            round += 1;
            trace!(round, tuples = next.len(), "transitive closure round");

            if next.len() == body.len() {
                break;
            }
            body = next;
        }

        debug!(rounds = round, tuples = body.len(), "transitive closure reached fixpoint");

        Ok(Relation::definite(self.heading().clone(), body))
    }
}
