use thiserror::Error;

use crate::tuple::{Attribute, Type};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("tuple is missing attribute '{0}'")]
    MissingAttribute(Attribute),

    #[error("attribute '{0}' is not in heading")]
    NotInHeading(Attribute),

    #[error("attribute '{0}' is already in heading")]
    AlreadyInHeading(Attribute),

    #[error("attribute '{attribute}' must be of type {expected}, found {found}")]
    TypeMismatch {
        attribute: Attribute,
        expected: Type,
        found: Type,
    },

    #[error("type mismatch for attribute '{attribute}': {left} vs {right}")]
    ConflictingTypes {
        attribute: Attribute,
        left: Type,
        right: Type,
    },

    #[error("relation must have a definite cardinality")]
    IndefiniteCardinality,

    #[error("relation must be binary (degree of two), found degree {0}")]
    NotBinary(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Heading or type violations.
    Schema,
    /// Operations that need a finite, enumerable body.
    Cardinality,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingAttribute(_)
            | Error::NotInHeading(_)
            | Error::AlreadyInHeading(_)
            | Error::TypeMismatch { .. }
            | Error::ConflictingTypes { .. } => ErrorKind::Schema,
            Error::IndefiniteCardinality | Error::NotBinary(_) => ErrorKind::Cardinality,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
