//! History filename derivation

pub(crate) mod destination;
pub(crate) mod sanitize;

pub(crate) use destination::{NamingPolicy, NamingScheme};
