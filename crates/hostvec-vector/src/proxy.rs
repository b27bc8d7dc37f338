//! Assignable handles to single elements.

use std::fmt;
use std::marker::PhantomData;

use hostvec_core::{Element, Host};

use crate::raw::Slot;

/// A handle to one slot of a writable vector.
///
/// Reads and writes go straight to the host array, through the buffer
/// pointer when the array is materialized and through single-element host
/// calls otherwise. The proxy mutably borrows its vector, so the array
/// cannot be resized or handed off while the proxy is alive.
pub struct Proxy<'a, T: Element> {
    host: &'a dyn Host,
    slot: Slot<T>,
    _vector: PhantomData<&'a mut T>,
}

impl<'a, T: Element> Proxy<'a, T> {
    pub(crate) fn new(host: &'a dyn Host, slot: Slot<T>) -> Self {
        Self {
            host,
            slot,
            _vector: PhantomData,
        }
    }

    /// Position of the slot.
    pub fn index(&self) -> usize {
        self.slot.index()
    }

    /// Current value of the slot.
    pub fn get(&self) -> T {
        self.slot.get(self.host)
    }

    /// Store `value` in the slot.
    pub fn set(&mut self, value: T) {
        self.slot.set(self.host, value);
    }

    /// Replace the slot with `f(current)` and return the new value.
    pub fn update(&mut self, f: impl FnOnce(T) -> T) -> T {
        let value = f(self.get());
        self.set(value);
        value
    }
}

impl<T: Element> PartialEq<T> for Proxy<'_, T> {
    fn eq(&self, other: &T) -> bool {
        self.get() == *other
    }
}

impl<T: Element> fmt::Debug for Proxy<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("index", &self.index())
            .field("value", &self.get())
            .finish()
    }
}
