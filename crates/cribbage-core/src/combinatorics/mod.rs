//! Index combinations over an `n`-element universe.
//!
//! - `enumerate`: uncached combinadic enumeration and index complements.
//! - `cache`: lazily populated, thread-safe memo of combinations and powersets.

mod cache;
mod enumerate;

pub use cache::CombinationCache;
pub use enumerate::{binomial, enumerate_combinations, enumerate_powerset, index_complement};

use core::fmt;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CombinatoricsError {
    #[error("invalid combinatorics arguments: cannot choose {k} of {n}")]
    InvalidArguments { n: usize, k: usize },
}

/// Strictly increasing positions picked out of an `n`-element universe.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Combination(Box<[usize]>);

impl Combination {
    pub(crate) fn from_indices(indices: &[usize]) -> Self {
        Self(indices.into())
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.binary_search(&index).is_ok()
    }

    /// Picks the elements of `items` named by this combination, or `None`
    /// when an index falls past the end of `items`.
    pub fn select<T: Copy>(&self, items: &[T]) -> Option<Vec<T>> {
        self.iter().map(|index| items.get(index).copied()).collect()
    }
}

impl AsRef<[usize]> for Combination {
    fn as_ref(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (pos, index) in self.0.iter().enumerate() {
            if pos > 0 {
                f.write_str(",")?;
            }
            write!(f, "{index}")?;
        }
        f.write_str("}")
    }
}
