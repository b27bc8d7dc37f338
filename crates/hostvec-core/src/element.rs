//! Element types that typed vectors can hold.
//!
//! [`Element`] maps a Rust scalar onto the matching family of [`Host`]
//! primitives, so vector code can be written once and dispatched per kind.
//! The trait is sealed: only `f64`, `i32` and [`Logical`] implement it.

use std::fmt;
use std::ptr::NonNull;

use smallvec::SmallVec;

use crate::error::HostError;
use crate::handle::ArrayId;
use crate::host::Host;
use crate::kind::ElementKind;
use crate::logical::Logical;

/// The `NA` sentinel for integer arrays.
pub const NA_INTEGER: i32 = i32::MIN;

mod sealed {
    pub trait Sealed {}
    impl Sealed for f64 {}
    impl Sealed for i32 {}
    impl Sealed for crate::logical::Logical {}
}

/// A scalar type stored in host arrays of one [`ElementKind`].
///
/// Implementations must have the same layout as the host's slot for
/// [`KIND`](Element::KIND), so that [`ptr`](Element::ptr) can hand out a
/// typed pointer into a materialized buffer.
pub trait Element: sealed::Sealed + Copy + Default + PartialEq + fmt::Debug + 'static {
    /// The host kind tag this type corresponds to.
    const KIND: ElementKind;

    /// Plural label used in diagnostics (e.g. `"doubles"`).
    const LABEL: &'static str;

    /// Direct buffer of `array`, or `None` if the host keeps it opaque.
    fn ptr(host: &dyn Host, array: ArrayId) -> Option<NonNull<Self>>;

    /// Single-element read through the host.
    fn elt(host: &dyn Host, array: ArrayId, index: usize) -> Self;

    /// Single-element write through the host.
    fn set_elt(host: &dyn Host, array: ArrayId, index: usize, value: Self);

    /// Batched read of `buf.len()` elements starting at `start`.
    fn region(
        host: &dyn Host,
        array: ArrayId,
        start: usize,
        buf: &mut [Self],
    ) -> Result<usize, HostError>;
}

impl Element for f64 {
    const KIND: ElementKind = ElementKind::Real;
    const LABEL: &'static str = "doubles";

    fn ptr(host: &dyn Host, array: ArrayId) -> Option<NonNull<Self>> {
        host.real_ptr(array)
    }

    fn elt(host: &dyn Host, array: ArrayId, index: usize) -> Self {
        host.real_elt(array, index)
    }

    fn set_elt(host: &dyn Host, array: ArrayId, index: usize, value: Self) {
        host.set_real_elt(array, index, value);
    }

    fn region(
        host: &dyn Host,
        array: ArrayId,
        start: usize,
        buf: &mut [Self],
    ) -> Result<usize, HostError> {
        host.real_region(array, start, buf)
    }
}

impl Element for i32 {
    const KIND: ElementKind = ElementKind::Integer;
    const LABEL: &'static str = "integers";

    fn ptr(host: &dyn Host, array: ArrayId) -> Option<NonNull<Self>> {
        host.integer_ptr(array)
    }

    fn elt(host: &dyn Host, array: ArrayId, index: usize) -> Self {
        host.integer_elt(array, index)
    }

    fn set_elt(host: &dyn Host, array: ArrayId, index: usize, value: Self) {
        host.set_integer_elt(array, index, value);
    }

    fn region(
        host: &dyn Host,
        array: ArrayId,
        start: usize,
        buf: &mut [Self],
    ) -> Result<usize, HostError> {
        host.integer_region(array, start, buf)
    }
}

impl Element for Logical {
    const KIND: ElementKind = ElementKind::Logical;
    const LABEL: &'static str = "logicals";

    fn ptr(host: &dyn Host, array: ArrayId) -> Option<NonNull<Self>> {
        // Logical is repr(transparent) over the i32 slot.
        host.logical_ptr(array).map(NonNull::cast)
    }

    fn elt(host: &dyn Host, array: ArrayId, index: usize) -> Self {
        Logical::from_raw(host.logical_elt(array, index))
    }

    fn set_elt(host: &dyn Host, array: ArrayId, index: usize, value: Self) {
        host.set_logical_elt(array, index, value.raw());
    }

    fn region(
        host: &dyn Host,
        array: ArrayId,
        start: usize,
        buf: &mut [Self],
    ) -> Result<usize, HostError> {
        let mut slots: SmallVec<[i32; 64]> = SmallVec::from_elem(0, buf.len());
        let n = host.logical_region(array, start, &mut slots)?;
        for (dst, &src) in buf.iter_mut().zip(&slots[..n]) {
            *dst = Logical::from_raw(src);
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_match_labels() {
        assert_eq!(<f64 as Element>::KIND, ElementKind::Real);
        assert_eq!(<i32 as Element>::KIND, ElementKind::Integer);
        assert_eq!(<Logical as Element>::KIND, ElementKind::Logical);
        assert_eq!(<Logical as Element>::LABEL, "logicals");
    }

    #[test]
    fn logical_layout_matches_slot() {
        assert_eq!(std::mem::size_of::<Logical>(), ElementKind::Logical.slot_bytes());
        assert_eq!(std::mem::align_of::<Logical>(), std::mem::align_of::<i32>());
    }
}
