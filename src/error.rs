use core::fmt;

use thiserror::Error;

/// A `Result` alias for fallible tree, list, and map queries.
pub type Result<T> = core::result::Result<T, Error>;

/// The relation a neighbor or exact-match query asked for.
///
/// Carried by [`Error::AbsentKey`] to describe which lookup could not be
/// satisfied.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Relation {
    /// A key equal to the probe.
    EqualTo,
    /// The smallest key strictly greater than the probe.
    GreaterThan,
    /// The smallest key greater than or equal to the probe.
    GreaterThanOrEqualTo,
    /// The largest key strictly less than the probe.
    LessThan,
    /// The largest key less than or equal to the probe.
    LessThanOrEqualTo,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Relation::EqualTo => "equal to",
            Relation::GreaterThan => "greater than",
            Relation::GreaterThanOrEqualTo => "greater than or equal to",
            Relation::LessThan => "less than",
            Relation::LessThanOrEqualTo => "less than or equal to",
        })
    }
}

/// Errors reported by positional and value-based queries.
///
/// Rejecting a duplicate key is not an error; insertion reports it by
/// returning `false`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Error)]
pub enum Error {
    /// A positional access at or beyond the current length, or any
    /// neighbor query against an empty container.
    #[error("index {index} is out of bounds for length {len}")]
    OutOfBounds {
        /// The requested rank.
        index: usize,
        /// The length of the container when the query was issued.
        len: usize,
    },
    /// No key satisfies `relation` with respect to the probe.
    #[error("no key is {relation} the probe")]
    AbsentKey {
        /// The relation that could not be satisfied.
        relation: Relation,
    },
}

impl Error {
    #[inline]
    pub(crate) const fn out_of_bounds(index: usize, len: usize) -> Self {
        Error::OutOfBounds { index, len }
    }

    /// The error returned when a query is issued against an empty container.
    #[inline]
    pub(crate) const fn empty() -> Self {
        Error::OutOfBounds { index: 0, len: 0 }
    }

    #[inline]
    pub(crate) const fn absent(relation: Relation) -> Self {
        Error::AbsentKey { relation }
    }
}
