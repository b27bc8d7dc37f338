//! Read-only typed vectors.

use std::fmt;

use hostvec_core::{ArrayId, Element, Logical, Representation};
use hostvec_protect::Protected;

use crate::error::VectorError;
use crate::iter::BlockIter;
use crate::raw::Access;
use crate::runtime::Runtime;
use crate::view::View;

/// A typed, read-only view of one host array.
///
/// The representation is classified once, in [`from_handle`](Self::from_handle),
/// and every later read goes through that classification. The vector holds
/// its own protection registration, so the array stays live even after the
/// handle it came from lets go of it (for example a writable vector over the
/// same array growing into a new one). Dropping the vector releases it.
pub struct Vector<T: Element> {
    rt: Runtime,
    array: ArrayId,
    guard: Protected,
    len: usize,
    access: Access<T>,
}

/// Read-only vector of doubles.
pub type Doubles = Vector<f64>;
/// Read-only vector of integers.
pub type Integers = Vector<i32>;
/// Read-only vector of tri-state logicals.
pub type Logicals = Vector<Logical>;

impl<T: Element> Vector<T> {
    /// Wrap `array`, checking that its kind tag is `T::KIND`.
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
        let access = Access::classify(host, array);
        let len = host.length(array);
        tracing::trace!(%array, len, kind = %T::KIND, token = ?guard.token(), "wrapped array");
        Ok(Self {
            rt: rt.clone(),
            array,
            guard,
            len,
            access,
        })
    }

    fn view(&self) -> View<'_, T> {
        View {
            host: self.rt.host(),
            array: Some(self.array),
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

    /// How the host stores the array.
    pub fn representation(&self) -> Representation {
        match self.access.representation() {
            Some(r) => r,
            None => unreachable!("a read-only vector always has an array"),
        }
    }

    /// The wrapped array.
    pub fn array(&self) -> ArrayId {
        self.array
    }

    /// The runtime this vector reads through.
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
    /// `pos` must be less than [`len`](Self::len). Opaque arrays are still
    /// indexed through the host, but a materialized read out of bounds is
    /// undefined behaviour.
    #[allow(unsafe_code)]
    pub unsafe fn get_unchecked(&self, pos: usize) -> T {
        // SAFETY: forwarded contract; `len` is the array's length.
        unsafe { self.access.read(self.rt.host(), pos) }
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
        self.view().names()
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
    /// The pointer is valid for [`len`](Self::len) elements for as long as
    /// the array is live and has not been replaced by a resize.
    pub fn data_ptr(&self) -> Option<*const T> {
        self.access.direct().map(|p| p.as_ptr().cast_const())
    }
}

impl<'a, T: Element> IntoIterator for &'a Vector<T> {
    type Item = Result<T, VectorError>;
    type IntoIter = BlockIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Element> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector")
            .field("kind", &T::KIND)
            .field("array", &self.array)
            .field("len", &self.len)
            .field("representation", &self.access.representation())
            .field("token", &self.guard.token())
            .finish()
    }
}
