//! The default protection registry.

use std::cell::RefCell;
use std::fmt;

use hostvec_core::{ArrayId, HostError, ProtectToken, Registry};
use indexmap::IndexMap;

use crate::table::TokenTable;

struct Inner {
    tokens: TokenTable<ArrayId>,
    /// Live registrations per array, in first-registration order.
    counts: IndexMap<ArrayId, usize>,
}

/// Process-wide table of protected arrays.
///
/// One instance is shared (as `Rc<dyn Registry>`) by every vector created
/// against the same host. Registration is O(1); an array may be registered
/// several times and remains protected until its last token is released.
pub struct PreserveList {
    inner: RefCell<Inner>,
}

impl PreserveList {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            inner: RefCell::new(Inner {
                tokens: TokenTable::new(),
                counts: IndexMap::new(),
            }),
        }
    }

    /// Arrays currently protected, in first-registration order.
    pub fn protected(&self) -> Vec<ArrayId> {
        self.inner.borrow().counts.keys().copied().collect()
    }

    /// The array a live token refers to.
    pub fn array_of(&self, token: ProtectToken) -> Option<ArrayId> {
        self.inner.borrow().tokens.get(token).copied()
    }
}

impl Default for PreserveList {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry for PreserveList {
    fn protect(&self, array: ArrayId) -> Result<ProtectToken, HostError> {
        let mut inner = self.inner.borrow_mut();
        let token = inner.tokens.insert(array);
        *inner.counts.entry(array).or_insert(0) += 1;
        tracing::trace!(%array, %token, live = inner.tokens.len(), "protect");
        Ok(token)
    }

    fn release(&self, token: ProtectToken) {
        let mut inner = self.inner.borrow_mut();
        let Some(array) = inner.tokens.remove(token) else {
            tracing::warn!(%token, "release of stale protection token ignored");
            return;
        };
        if let Some(count) = inner.counts.get_mut(&array) {
            *count -= 1;
            if *count == 0 {
                inner.counts.shift_remove(&array);
            }
        }
        tracing::trace!(%array, %token, live = inner.tokens.len(), "release");
    }

    fn is_protected(&self, array: ArrayId) -> bool {
        self.inner.borrow().counts.contains_key(&array)
    }

    fn live(&self) -> usize {
        self.inner.borrow().tokens.len()
    }
}

impl fmt::Debug for PreserveList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("PreserveList")
            .field("live", &inner.tokens.len())
            .field("arrays", &inner.counts.len())
            .finish()
    }
}
