//! Read operations shared by read-only and writable vectors.

use hostvec_core::{ArrayId, Element, Host};

use crate::error::VectorError;
use crate::iter::BlockIter;
use crate::raw::Access;

/// Attribute holding the parallel names array.
pub(crate) const NAMES: &str = "names";

/// Borrowed snapshot of a vector's read state.
pub(crate) struct View<'a, T> {
    pub(crate) host: &'a dyn Host,
    pub(crate) array: Option<ArrayId>,
    pub(crate) access: Access<T>,
    pub(crate) len: usize,
    pub(crate) block_len: usize,
}

impl<T> Clone for View<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for View<'_, T> {}

impl<'a, T: Element> View<'a, T> {
    pub(crate) fn at(&self, pos: usize) -> Result<T, VectorError> {
        self.access
            .get(self.host, pos, self.len)
            .ok_or(VectorError::OutOfRange {
                label: T::LABEL,
                index: pos,
                len: self.len,
            })
    }

    pub(crate) fn iter(self) -> BlockIter<'a, T> {
        BlockIter::new(self)
    }

    pub(crate) fn names(&self) -> Option<Vec<String>> {
        let names = self.host.attrib(self.array?, NAMES)?;
        let n = self.host.length(names);
        Some((0..n).map(|i| self.host.string_elt(names, i)).collect())
    }

    pub(crate) fn position_of(&self, name: &str) -> Option<usize> {
        let names = self.host.attrib(self.array?, NAMES)?;
        let n = self.host.length(names).min(self.len);
        (0..n).find(|&i| self.host.string_elt(names, i) == name)
    }
}
