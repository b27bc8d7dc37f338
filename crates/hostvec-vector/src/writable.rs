//! Owning, growable typed vectors.
//!
//! A [`WritableVector`] owns one protection registration for its current
//! array. Growth replaces the array: the new one is allocated (or resized
//! from the old one), protected, and only then is the old registration
//! released and the access path reclassified. Every failure before that
//! point leaves the vector exactly as it was.

use std::fmt;

use hostvec_core::{ArrayId, Element, Logical, Representation};
use hostvec_protect::Protected;

use crate::error::VectorError;
use crate::iter::BlockIter;
use crate::proxy::Proxy;
use crate::raw::{Access, Slot};
use crate::runtime::Runtime;
use crate::vector::Vector;
use crate::view::View;

/// Writable vector of doubles.
pub type Doubles = WritableVector<f64>;
/// Writable vector of integers.
pub type Integers = WritableVector<i32>;
/// Writable vector of tri-state logicals.
pub type Logicals = WritableVector<Logical>;

/// A typed vector that owns and can grow its host array.
///
/// `len <= capacity` always holds, and `capacity` is the length of the
/// host array. A vector built with [`new`](Self::new) has no array until
/// the first growth.
pub struct WritableVector<T: Element> {
    rt: Runtime,
    guard: Option<Protected>,
    access: Access<T>,
    len: usize,
    capacity: usize,
}

impl<T: Element> WritableVector<T> {
    /// An empty vector with no array.
    pub fn new(rt: &Runtime) -> Self {
        Self {
            rt: rt.clone(),
            guard: None,
            access: Access::Null,
            len: 0,
            capacity: 0,
        }
    }

    /// An empty vector backed by a fresh array of `capacity` slots.
    pub fn with_capacity(rt: &Runtime, capacity: usize) -> Result<Self, VectorError> {
        let mut v = Self::new(rt);
        v.reserve(capacity)?;
        Ok(v)
    }

    /// Take ownership of an existing array. Every slot counts as an element.
    pub fn from_handle(rt: &Runtime, array: ArrayId) -> Result<Self, VectorError> {
        let host = rt.host();
        let actual = host.kind(array);
        if actual != T::KIND {
            return Err(VectorError::TypeMismatch {
                expected: T::KIND,
                actual,
            });
        }
        let guard = Protected::new(rt.registry().clone(), array)?;
        let len = host.length(array);
        Ok(Self {
            rt: rt.clone(),
            guard: Some(guard),
            access: Access::classify(host, array),
            len,
            capacity: len,
        })
    }

    /// A vector holding `values` in order.
    ///
    /// If a write fails partway, the partly filled array is unprotected
    /// again before the failure propagates.
    pub fn from_slice(rt: &Runtime, values: &[T]) -> Result<Self, VectorError> {
        let mut v = Self::with_capacity(rt, values.len())?;
        for &value in values {
            v.push(value)?;
        }
        Ok(v)
    }

    /// An owned copy of a read-only vector, in a fresh array.
    pub fn from_vector(source: &Vector<T>) -> Result<Self, VectorError> {
        let mut v = Self::with_capacity(source.runtime(), source.len())?;
        for value in source {
            v.push(value?)?;
        }
        Ok(v)
    }

    fn view(&self) -> View<'_, T> {
        View {
            host: self.rt.host(),
            array: self.array(),
            access: self.access,
            len: self.len,
            block_len: self.rt.config().block_len,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the vector has no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots in the current array.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// How the host stores the current array, `None` before the first
    /// allocation.
    pub fn representation(&self) -> Option<Representation> {
        self.access.representation()
    }

    /// The current array, `None` before the first allocation.
    pub fn array(&self) -> Option<ArrayId> {
        self.guard.as_ref().map(Protected::array)
    }

    /// The runtime this vector allocates from.
    pub fn runtime(&self) -> &Runtime {
        &self.rt
    }

    /// Element at `pos`, or `OutOfRange`.
    pub fn at(&self, pos: usize) -> Result<T, VectorError> {
        self.view().at(pos)
    }

    /// Element at `pos`, or `None` when out of range.
    pub fn get(&self, pos: usize) -> Option<T> {
        self.at(pos).ok()
    }

    /// Element at `pos` without a bounds check.
    ///
    /// # Safety
    ///
    /// `pos` must be less than [`len`](Self::len).
    #[allow(unsafe_code)]
    pub unsafe fn get_unchecked(&self, pos: usize) -> T {
        // SAFETY: forwarded contract; `len` never exceeds the capacity.
        unsafe { self.access.read(self.rt.host(), pos) }
    }

    fn out_of_range(&self, pos: usize) -> VectorError {
        VectorError::OutOfRange {
            label: T::LABEL,
            index: pos,
            len: self.len,
        }
    }

    /// Assignable handle to the element at `pos`, or `OutOfRange`.
    pub fn at_mut(&mut self, pos: usize) -> Result<Proxy<'_, T>, VectorError> {
        match Slot::checked(self.access, pos, self.len) {
            Some(slot) => Ok(Proxy::new(self.rt.host(), slot)),
            None => Err(self.out_of_range(pos)),
        }
    }

    /// Like [`at_mut`](Self::at_mut), `None` when out of range.
    pub fn get_mut(&mut self, pos: usize) -> Option<Proxy<'_, T>> {
        self.at_mut(pos).ok()
    }

    /// Assignable handle to the element at `pos` without a bounds check.
    ///
    /// # Safety
    ///
    /// `pos` must be less than [`len`](Self::len).
    #[allow(unsafe_code)]
    pub unsafe fn get_unchecked_mut(&mut self, pos: usize) -> Proxy<'_, T> {
        // SAFETY: forwarded contract.
        Proxy::new(self.rt.host(), unsafe { Slot::unchecked(self.access, pos) })
    }

    /// Write `value` into a slot below capacity, which may lie past `len`.
    fn fill_spare(&mut self, pos: usize, value: T) {
        match Slot::checked(self.access, pos, self.capacity) {
            Some(slot) => slot.set(self.rt.host(), value),
            None => unreachable!("slot {pos} is past capacity {}", self.capacity),
        }
    }

    /// Store `value` at `pos`.
    pub fn set(&mut self, pos: usize, value: T) -> Result<(), VectorError> {
        self.at_mut(pos)?.set(value);
        Ok(())
    }

    /// Make the array exactly `capacity` slots long.
    ///
    /// With no array yet, allocates one; otherwise asks the host to resize,
    /// which yields a new array. Elements past `capacity` are dropped. The
    /// new array is protected before the old one is released. On error the
    /// vector is unchanged.
    pub fn reserve(&mut self, capacity: usize) -> Result<(), VectorError> {
        let host = self.rt.host();
        let array = match &self.guard {
            None => host.allocate(T::KIND, capacity)?,
            Some(guard) => host.resize(guard.array(), capacity)?,
        };
        match &mut self.guard {
            Some(guard) => guard.replace(array)?,
            None => self.guard = Some(Protected::new(self.rt.registry().clone(), array)?),
        }
        self.access = Access::classify(host, array);
        tracing::debug!(
            %array,
            from = self.capacity,
            to = capacity,
            representation = ?self.access.representation(),
            "reserved {}",
            T::LABEL
        );
        self.capacity = capacity;
        self.len = self.len.min(capacity);
        Ok(())
    }

    /// Capacity to grow to when `needed` slots do not fit.
    fn grown(&self, needed: usize) -> Result<usize, VectorError> {
        let config = self.rt.config();
        let next = if self.capacity == 0 {
            config.min_capacity
        } else {
            self.capacity
                .checked_mul(config.growth_factor)
                .ok_or(VectorError::AllocationFailure {
                    kind: T::KIND,
                    requested: usize::MAX,
                })?
        };
        Ok(next.max(needed))
    }

    /// Append `value`, growing geometrically when full.
    pub fn push(&mut self, value: T) -> Result<(), VectorError> {
        if self.len >= self.capacity {
            let capacity = self.grown(self.len + 1)?;
            self.reserve(capacity)?;
        }
        self.fill_spare(self.len, value);
        self.len += 1;
        Ok(())
    }

    /// Append every element of `values`, growing at most once.
    pub fn extend_from_slice(&mut self, values: &[T]) -> Result<(), VectorError> {
        let needed = self.len + values.len();
        if needed > self.capacity {
            let capacity = self.grown(needed)?;
            self.reserve(capacity)?;
        }
        for &value in values {
            self.push(value)?;
        }
        Ok(())
    }

    /// Remove and return the last element. Capacity is kept.
    pub fn pop(&mut self) -> Option<T> {
        let last = self.len.checked_sub(1)?;
        let value = self.at(last).ok()?;
        self.len = last;
        Some(value)
    }

    /// Drop every element. Capacity is kept.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Keep the first `len` elements. No effect if already shorter.
    pub fn truncate(&mut self, len: usize) {
        self.len = self.len.min(len);
    }

    /// Change the length to `len`, filling new slots with `fill`.
    pub fn resize(&mut self, len: usize, fill: T) -> Result<(), VectorError> {
        if len <= self.len {
            self.truncate(len);
            return Ok(());
        }
        if len > self.capacity {
            self.reserve(len)?;
        }
        for pos in self.len..len {
            self.fill_spare(pos, fill);
        }
        self.len = len;
        Ok(())
    }

    /// Iterate in order, fetching opaque arrays a block at a time.
    pub fn iter(&self) -> BlockIter<'_, T> {
        self.view().iter()
    }

    /// Copy every element out.
    pub fn to_vec(&self) -> Result<Vec<T>, VectorError> {
        self.iter().collect()
    }

    /// The names attribute, if the array carries one.
    pub fn names(&self) -> Option<Vec<String>> {
        let mut names = self.view().names()?;
        names.truncate(self.len);
        Some(names)
    }

    /// Whether some element is named `name`.
    pub fn contains_name(&self, name: &str) -> bool {
        self.view().position_of(name).is_some()
    }

    /// The first element named `name`.
    pub fn get_named(&self, name: &str) -> Option<T> {
        let view = self.view();
        view.at(view.position_of(name)?).ok()
    }

    /// Direct buffer of a materialized array.
    ///
    /// Invalidated by any call that can grow or shrink the array
    /// ([`reserve`](Self::reserve), [`push`](Self::push),
    /// [`extend_from_slice`](Self::extend_from_slice),
    /// [`resize`](Self::resize)).
    pub fn data_ptr(&mut self) -> Option<*mut T> {
        self.access.direct().map(|p| p.as_ptr())
    }

    /// Hand the array back to the caller, who becomes responsible for
    /// keeping it reachable.
    ///
    /// Spare capacity is trimmed first so the array's length equals
    /// [`len`](Self::len); an empty vector with no array allocates a
    /// zero-length one.
    pub fn into_array(mut self) -> Result<ArrayId, VectorError> {
        if self.guard.is_none() || self.capacity > self.len {
            self.reserve(self.len)?;
        }
        match self.guard.take() {
            Some(guard) => Ok(guard.release()),
            None => unreachable!("reserve leaves the vector with an array"),
        }
    }
}

impl<'a, T: Element> IntoIterator for &'a WritableVector<T> {
    type Item = Result<T, VectorError>;
    type IntoIter = BlockIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Element> fmt::Debug for WritableVector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WritableVector")
            .field("kind", &T::KIND)
            .field("array", &self.array())
            .field("len", &self.len)
            .field("capacity", &self.capacity)
            .field("representation", &self.access.representation())
            .finish()
    }
}
