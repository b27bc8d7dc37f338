//! A registry that records every protect and release.

use std::cell::{Cell, RefCell};

use hostvec_core::{ArrayId, HostError, ProtectToken, Registry};
use hostvec_protect::PreserveList;

/// One registry call, as observed by [`CountingRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistryEvent {
    Protect(ArrayId),
    Release(ArrayId),
}

/// Wraps a [`PreserveList`] and keeps a log of calls plus the live count
/// after each one.
///
/// `fail_next_protect` makes the next `protect` return an allocation
/// failure without registering anything.
pub struct CountingRegistry {
    inner: PreserveList,
    events: RefCell<Vec<RegistryEvent>>,
    live_after: RefCell<Vec<usize>>,
    fail_next: Cell<bool>,
}

impl CountingRegistry {
    pub fn new() -> Self {
        Self {
            inner: PreserveList::new(),
            events: RefCell::new(Vec::new()),
            live_after: RefCell::new(Vec::new()),
            fail_next: Cell::new(false),
        }
    }

    pub fn fail_next_protect(&self) {
        self.fail_next.set(true);
    }

    pub fn protects(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| matches!(e, RegistryEvent::Protect(_)))
            .count()
    }

    pub fn releases(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| matches!(e, RegistryEvent::Release(_)))
            .count()
    }

    pub fn events(&self) -> Vec<RegistryEvent> {
        self.events.borrow().clone()
    }

    /// Live registration count after each recorded call.
    pub fn live_history(&self) -> Vec<usize> {
        self.live_after.borrow().clone()
    }

    pub fn protected(&self) -> Vec<ArrayId> {
        self.inner.protected()
    }

    fn record(&self, event: RegistryEvent) {
        self.events.borrow_mut().push(event);
        self.live_after.borrow_mut().push(self.inner.live());
    }
}

impl Default for CountingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry for CountingRegistry {
    fn protect(&self, array: ArrayId) -> Result<ProtectToken, HostError> {
        if self.fail_next.replace(false) {
            return Err(HostError::AllocationFailed {
                kind: hostvec_core::ElementKind::Character,
                requested: 1,
            });
        }
        let token = self.inner.protect(array)?;
        self.record(RegistryEvent::Protect(array));
        Ok(token)
    }

    fn release(&self, token: ProtectToken) {
        let array = self.inner.array_of(token);
        self.inner.release(token);
        if let Some(array) = array {
            self.record(RegistryEvent::Release(array));
        }
    }

    fn is_protected(&self, array: ArrayId) -> bool {
        self.inner.is_protected(array)
    }

    fn live(&self) -> usize {
        self.inner.live()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_calls_and_live_counts() {
        let reg = CountingRegistry::new();
        let a = reg.protect(ArrayId(1)).unwrap();
        let b = reg.protect(ArrayId(2)).unwrap();
        reg.release(a);
        reg.release(b);
        reg.release(b);
        assert_eq!(reg.protects(), 2);
        assert_eq!(reg.releases(), 2, "stale release is not recorded");
        assert_eq!(reg.live_history(), vec![1, 2, 1, 0]);
    }

    #[test]
    fn injected_failure_registers_nothing() {
        let reg = CountingRegistry::new();
        reg.fail_next_protect();
        assert!(reg.protect(ArrayId(1)).is_err());
        assert_eq!(reg.live(), 0);
        assert!(reg.protect(ArrayId(1)).is_ok());
    }
}
