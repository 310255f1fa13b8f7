use std::collections::BTreeMap;
use std::fmt;

use itertools::Itertools;
use num_bigint::BigInt;

use crate::error::{Error, Result};
use crate::relation::Relation;

pub type Attribute = String;

/// Type tag of an attribute. Only used to validate values entering a body.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Boolean,
    Integer,
    String,
    Tuple,
    Relation(Heading),
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Type::Boolean => write!(f, "Boolean"),
            Type::Integer => write!(f, "Integer"),
            Type::String => write!(f, "String"),
            Type::Tuple => write!(f, "Tuple"),
            Type::Relation(heading) => write!(f, "Relation{}", heading),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
    Boolean(bool),
    Integer(BigInt),
    String(String),
    Tuple(Tuple),
    Relation(Relation),
}

impl Value {
    pub fn type_of(&self) -> Type {
        match self {
            Value::Boolean(_) => Type::Boolean,
            Value::Integer(_) => Type::Integer,
            Value::String(_) => Type::String,
            Value::Tuple(_) => Type::Tuple,
            Value::Relation(relation) => Type::Relation(relation.heading().clone()),
        }
    }

    pub fn as_integer(&self) -> Option<&BigInt> {
        match self {
            Value::Integer(n) => Some(n),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Tuple(t) => write!(f, "{}", t),
            Value::Relation(r) => write!(f, "{}", r),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n.into())
    }
}

impl From<BigInt> for Value {
    fn from(n: BigInt) -> Self {
        Value::Integer(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Tuple> for Value {
    fn from(t: Tuple) -> Self {
        Value::Tuple(t)
    }
}

impl From<Relation> for Value {
    fn from(r: Relation) -> Self {
        Value::Relation(r)
    }
}

/// The attribute schema of a relation. Its size is the relation's degree.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Heading(BTreeMap<Attribute, Type>);

impl Heading {
    pub fn new<A, I>(attributes: I) -> Self
    where
        A: Into<Attribute>,
        I: IntoIterator<Item = (A, Type)>,
    {
        attributes.into_iter().collect()
    }

    pub fn degree(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, attribute: &str) -> Option<&Type> {
        self.0.get(attribute)
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.0.contains_key(attribute)
    }

    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> + '_ {
        self.0.keys()
    }

    pub(crate) fn insert(&mut self, attribute: Attribute, ty: Type) {
        self.0.insert(attribute, ty);
    }

    pub(crate) fn remove(&mut self, attribute: &str) -> Option<Type> {
        self.0.remove(attribute)
    }

    /// Attributes present in both headings. A shared name with different
    /// type tags is a modeling error.
    pub fn common(&self, other: &Heading) -> Result<Vec<Attribute>> {
        let mut common = vec![];
        for (attribute, ty) in &self.0 {
            if let Some(other_ty) = other.get(attribute) {
                if ty != other_ty {
                    return Err(Error::ConflictingTypes {
                        attribute: attribute.clone(),
                        left: ty.clone(),
                        right: other_ty.clone(),
                    });
                }
                common.push(attribute.clone());
            }
        }
        Ok(common)
    }

    pub fn merge(&self, other: &Heading) -> Result<Heading> {
        self.common(other)?;
        let mut heading = self.clone();
        for (attribute, ty) in &other.0 {
            heading.insert(attribute.clone(), ty.clone());
        }
        Ok(heading)
    }

    pub fn without(&self, attributes: &[Attribute]) -> Heading {
        let mut heading = self.clone();
        for attribute in attributes {
            heading.remove(attribute);
        }
        heading
    }

    /// Checks that `tuple` assigns a value of the right type to every
    /// attribute and to nothing else.
    pub fn validate(&self, tuple: &Tuple) -> Result<()> {
        for (attribute, ty) in &self.0 {
            let value = tuple
                .get(attribute)
                .ok_or_else(|| Error::MissingAttribute(attribute.clone()))?;
            let found = value.type_of();
            if &found != ty {
                return Err(Error::TypeMismatch {
                    attribute: attribute.clone(),
                    expected: ty.clone(),
                    found,
                });
            }
        }

        if let Some(extra) = tuple.attributes().find(|a| !self.contains(a)) {
            return Err(Error::NotInHeading(extra.clone()));
        }

        Ok(())
    }
}

impl<A: Into<Attribute>> FromIterator<(A, Type)> for Heading {
    fn from_iter<I: IntoIterator<Item = (A, Type)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(a, ty)| (a.into(), ty)).collect())
    }
}

impl From<&Tuple> for Heading {
    fn from(tuple: &Tuple) -> Self {
        tuple
            .iter()
            .map(|(attribute, value)| (attribute.clone(), value.type_of()))
            .collect()
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.0
                .iter()
                .map(|(attribute, ty)| format!("{}: {}", attribute, ty))
                .join(", ")
        )
    }
}

/// One row: a value per attribute. Also used for partial bindings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Tuple(BTreeMap<Attribute, Value>);

impl Tuple {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.0.get(attribute)
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.0.contains_key(attribute)
    }

    pub fn insert(&mut self, attribute: impl Into<Attribute>, value: impl Into<Value>) {
        self.0.insert(attribute.into(), value.into());
    }

    pub fn remove(&mut self, attribute: &str) -> Option<Value> {
        self.0.remove(attribute)
    }

    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> + '_ {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Attribute, &Value)> + '_ {
        self.0.iter()
    }

    /// Attribute-wise union; values of `other` win on shared attributes.
    pub fn merge(&self, other: &Tuple) -> Tuple {
        let mut merged = self.clone();
        for (attribute, value) in &other.0 {
            merged.0.insert(attribute.clone(), value.clone());
        }
        merged
    }

    /// Keeps only the listed attributes that this tuple binds.
    pub fn project(&self, attributes: &[Attribute]) -> Tuple {
        attributes
            .iter()
            .filter_map(|a| self.get(a).map(|v| (a.clone(), v.clone())))
            .collect()
    }

    pub fn restrict(&self, heading: &Heading) -> Tuple {
        self.iter()
            .filter(|(a, _)| heading.contains(a))
            .map(|(a, v)| (a.clone(), v.clone()))
            .collect()
    }

    pub fn without(&self, attributes: &[Attribute]) -> Tuple {
        let mut tuple = self.clone();
        for attribute in attributes {
            tuple.remove(attribute);
        }
        tuple
    }

    /// True when every attribute bound by `bindings` holds the same value here.
    pub fn matches(&self, bindings: &Tuple) -> bool {
        bindings
            .iter()
            .all(|(attribute, value)| self.get(attribute) == Some(value))
    }

    /// True when the tuples agree on every attribute they share.
    pub fn agrees_with(&self, other: &Tuple) -> bool {
        other
            .iter()
            .all(|(attribute, value)| self.get(attribute).map_or(true, |v| v == value))
    }
}

impl<A: Into<Attribute>, V: Into<Value>> FromIterator<(A, V)> for Tuple {
    fn from_iter<I: IntoIterator<Item = (A, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(a, v)| (a.into(), v.into()))
                .collect(),
        )
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{{{}}}",
            self.0
                .iter()
                .map(|(attribute, value)| format!("{}: {}", attribute, value))
                .join(", ")
        )
    }
}

/// Builds a [`Tuple`] from `attribute => value` pairs.
///
/// ```
/// use relational::tuple;
/// let t = tuple! { "name" => "Jack", "age" => 30 };
/// assert_eq!(t.len(), 2);
/// ```
#[macro_export]
macro_rules! tuple {
    () => {
        $crate::Tuple::new()
    };
    ($($attribute:expr => $value:expr),+ $(,)?) => {{
        let mut tuple = $crate::Tuple::new();
        $(tuple.insert($attribute, $value);)+
        tuple
    }};
}
