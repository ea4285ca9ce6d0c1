use crate::error::{Error, Result};
use lasso::{Key, Rodeo, Spur};
use std::fmt;

/// The distinct labels seen along one axis of a contingency table.
///
/// Each label gets a dense index in the order it was first seen; indices are never reassigned and
/// labels are never sorted. Axes are independent, so the same string on two axes gets two
/// unrelated indices.
pub struct Labels {
    axis: usize,
    limit: usize,
    rodeo: Rodeo<Spur>,
}

impl Labels {
    /// Creates an empty label set for the given axis which will refuse to hold more than `limit`
    /// distinct labels.
    pub fn new(axis: usize, limit: usize) -> Self {
        Labels {
            axis,
            limit,
            rodeo: Rodeo::new(),
        }
    }

    /// Returns the index of `label`, assigning the next free index if it hasn't been seen before.
    ///
    /// ```
    /// use chisq::Labels;
    ///
    /// let mut labels = Labels::new(0, 2);
    /// assert_eq!(labels.intern("B").unwrap(), 0);
    /// assert_eq!(labels.intern("A").unwrap(), 1);
    /// assert_eq!(labels.intern("B").unwrap(), 0);
    /// assert!(labels.intern("C").is_err());
    /// ```
    pub fn intern(&mut self, label: &str) -> Result<usize> {
        if let Some(key) = self.rodeo.get(label) {
            return Ok(key.into_usize());
        }
        if self.rodeo.len() >= self.limit {
            return Err(Error::CapacityExceeded {
                axis: self.axis,
                limit: self.limit,
            });
        }
        Ok(self.rodeo.get_or_intern(label).into_usize())
    }

    /// Looks up the index of a label without interning it.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.rodeo.get(label).map(Key::into_usize)
    }

    /// Returns the label with the given index, if there is one.
    pub fn get(&self, index: usize) -> Option<&str> {
        Spur::try_from_usize(index).and_then(|key| self.rodeo.try_resolve(&key))
    }

    /// The number of distinct labels on this axis.
    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    /// Returns `true` if no label has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }

    /// Iterates over the labels in index order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.rodeo.strings()
    }
}

impl fmt::Debug for Labels {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
