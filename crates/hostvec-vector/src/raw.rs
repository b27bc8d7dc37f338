//! Representation dispatch and the unprotected direct-pointer path.
//!
//! [`Access`] is decided once per array: a direct pointer when the host
//! materializes the buffer, the array id otherwise. Every raw dereference in
//! the crate lives in this module, behind bounds-checked entry points
//! ([`Access::get`], [`Slot::checked`]). Outside it the only unsafe items are
//! the public `get_unchecked` and `get_unchecked_mut` accessors, which skip
//! the check and forward their contract to [`Access::read`] and
//! [`Slot::unchecked`].
//!
//! Direct reads and writes are not guarded against collection. The array is
//! already protected (or borrowed from a protected owner) for as long as the
//! `Access` exists, and a plain load or store cannot enter the host, so no
//! collection can run between fetching the pointer and completing the
//! access. Guarding each element would cost a host call per element.

#![allow(unsafe_code)]

use std::ptr::NonNull;

use hostvec_core::{ArrayId, Element, Host, Representation};

/// How element `i` of one specific array is reached.
#[derive(Debug)]
pub(crate) enum Access<T> {
    /// No array yet (an empty writable vector).
    Null,
    /// Contiguous host buffer.
    Direct(NonNull<T>),
    /// Opaque array, reached through host calls.
    Indexed(ArrayId),
}

impl<T> Clone for Access<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Access<T> {}

impl<T: Element> Access<T> {
    /// Classify `array`. Call again whenever the array id changes.
    pub(crate) fn classify(host: &dyn Host, array: ArrayId) -> Self {
        match T::ptr(host, array) {
            Some(p) => Self::Direct(p),
            None => Self::Indexed(array),
        }
    }

    pub(crate) fn representation(&self) -> Option<Representation> {
        match self {
            Self::Null => None,
            Self::Direct(_) => Some(Representation::Materialized),
            Self::Indexed(_) => Some(Representation::Opaque),
        }
    }

    pub(crate) fn direct(&self) -> Option<NonNull<T>> {
        match self {
            Self::Direct(p) => Some(*p),
            _ => None,
        }
    }

    /// Read slot `index`.
    ///
    /// # Safety
    ///
    /// `index` must be below the length of the array this access was
    /// classified from, and that array must not have been resized or
    /// reclaimed since.
    pub(crate) unsafe fn read(&self, host: &dyn Host, index: usize) -> T {
        match *self {
            // SAFETY: caller guarantees `index` is in bounds of a live buffer.
            Self::Direct(p) => unsafe { p.as_ptr().add(index).read() },
            Self::Indexed(array) => T::elt(host, array, index),
            Self::Null => unreachable!("read from a vector with no array"),
        }
    }

    /// Read slot `index` if it is below `len`.
    ///
    /// `len` must not exceed the length of the live array this access was
    /// classified from. Every vector keeps that invariant for its own length.
    pub(crate) fn get(&self, host: &dyn Host, index: usize, len: usize) -> Option<T> {
        if index >= len {
            return None;
        }
        // SAFETY: in bounds per the check above and the `len` invariant.
        Some(unsafe { self.read(host, index) })
    }

    /// Write slot `index`.
    ///
    /// # Safety
    ///
    /// Same contract as [`read`](Self::read). The caller must also hold the
    /// only handle that writes to this array.
    unsafe fn write(&self, host: &dyn Host, index: usize, value: T) {
        match *self {
            // SAFETY: caller guarantees `index` is in bounds of a live buffer
            // with no concurrent writer.
            Self::Direct(p) => unsafe { p.as_ptr().add(index).write(value) },
            Self::Indexed(array) => T::set_elt(host, array, index, value),
            Self::Null => unreachable!("write to a vector with no array"),
        }
    }
}

/// One addressable slot, known to be in bounds of its array.
#[derive(Debug)]
pub(crate) struct Slot<T> {
    access: Access<T>,
    index: usize,
}

impl<T: Element> Slot<T> {
    /// Slot `index` if it is below `bound`.
    ///
    /// `bound` is the vector's length for element access, or its capacity
    /// when appending. Either way it must not exceed the length of the live
    /// array `access` was classified from.
    pub(crate) fn checked(access: Access<T>, index: usize, bound: usize) -> Option<Self> {
        match access {
            Access::Null => None,
            _ if index >= bound => None,
            _ => Some(Self { access, index }),
        }
    }

    /// Slot `index` without a bounds check.
    ///
    /// # Safety
    ///
    /// `index` must be below the length of the live array `access` was
    /// classified from.
    pub(crate) unsafe fn unchecked(access: Access<T>, index: usize) -> Self {
        Self { access, index }
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn get(&self, host: &dyn Host) -> T {
        // SAFETY: bounds established at construction.
        unsafe { self.access.read(host, self.index) }
    }

    /// Callers hold the owning vector mutably, so this is the only writer.
    pub(crate) fn set(&self, host: &dyn Host, value: T) {
        // SAFETY: bounds established at construction.
        unsafe { self.access.write(host, self.index, value) }
    }
}
