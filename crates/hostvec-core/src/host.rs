//! The host runtime boundary.
//!
//! [`Host`] is everything the vector layer consumes from the runtime that
//! owns the arrays: allocation, resize, element access for both
//! representations, and attributes. Nothing here is implemented by this
//! workspace for production use; `hostvec-test-utils` provides an in-memory
//! stand-in.
//!
//! # Failure model
//!
//! Calls that allocate or touch many elements at once return
//! `Result<_, HostError>`. Single-element reads and writes do not: a host
//! failure there is the runtime's own unwind (a Rust panic) and is not
//! intercepted per element. Anything holding protection across such a call
//! must release it from `Drop`, which runs on unwind.
//!
//! # Region reads
//!
//! The `*_region` methods may copy fewer elements than `buf` holds, but must
//! copy at least one whenever `start` is below the array's length and `buf`
//! is not empty. Returning 0 there is a contract violation, which callers
//! report as such rather than as a host error.

use std::ptr::NonNull;

use crate::error::HostError;
use crate::handle::ArrayId;
use crate::kind::ElementKind;

/// Services provided by the host runtime.
///
/// All methods take `&self`: the runtime is single-threaded with respect to
/// this layer and owns whatever interior mutability it needs.
pub trait Host {
    /// Allocate a new array of `kind` with `len` slots.
    fn allocate(&self, kind: ElementKind, len: usize) -> Result<ArrayId, HostError>;

    /// Produce an array of the same kind with `len` slots, copying the common
    /// prefix. The result is always a new [`ArrayId`]; the storage may move.
    fn resize(&self, array: ArrayId, len: usize) -> Result<ArrayId, HostError>;

    /// Declared element kind of `array`.
    fn kind(&self, array: ArrayId) -> ElementKind;

    /// Number of slots in `array`.
    fn length(&self, array: ArrayId) -> usize;

    /// Direct buffer of a materialized real array, `None` when opaque.
    fn real_ptr(&self, array: ArrayId) -> Option<NonNull<f64>>;
    /// Read one real element.
    fn real_elt(&self, array: ArrayId, index: usize) -> f64;
    /// Write one real element.
    fn set_real_elt(&self, array: ArrayId, index: usize, value: f64);
    /// Copy up to `buf.len()` real elements starting at `start` in one call.
    ///
    /// Returns the number of elements copied, which must be at least 1 when
    /// `start < length` and `buf` is non-empty.
    fn real_region(&self, array: ArrayId, start: usize, buf: &mut [f64])
        -> Result<usize, HostError>;

    /// Direct buffer of a materialized integer array, `None` when opaque.
    fn integer_ptr(&self, array: ArrayId) -> Option<NonNull<i32>>;
    /// Read one integer element.
    fn integer_elt(&self, array: ArrayId, index: usize) -> i32;
    /// Write one integer element.
    fn set_integer_elt(&self, array: ArrayId, index: usize, value: i32);
    /// Copy up to `buf.len()` integer elements starting at `start` in one call.
    ///
    /// Returns the number copied, at least 1 when `start < length` and `buf`
    /// is non-empty.
    fn integer_region(
        &self,
        array: ArrayId,
        start: usize,
        buf: &mut [i32],
    ) -> Result<usize, HostError>;

    /// Direct buffer of a materialized logical array, `None` when opaque.
    fn logical_ptr(&self, array: ArrayId) -> Option<NonNull<i32>>;
    /// Read one raw logical slot.
    fn logical_elt(&self, array: ArrayId, index: usize) -> i32;
    /// Write one raw logical slot.
    fn set_logical_elt(&self, array: ArrayId, index: usize, value: i32);
    /// Copy up to `buf.len()` raw logical slots starting at `start` in one call.
    ///
    /// Same return contract as [`real_region`](Self::real_region).
    fn logical_region(
        &self,
        array: ArrayId,
        start: usize,
        buf: &mut [i32],
    ) -> Result<usize, HostError>;

    /// Read one element of a character array.
    fn string_elt(&self, array: ArrayId, index: usize) -> String;
    /// Write one element of a character array.
    fn set_string_elt(&self, array: ArrayId, index: usize, value: &str);

    /// Attribute `name` of `array`, if set.
    fn attrib(&self, array: ArrayId, name: &str) -> Option<ArrayId>;
    /// Attach `value` as attribute `name` of `array`.
    ///
    /// Attributes are reachable from their owner: protecting the owner keeps
    /// them alive.
    fn set_attrib(&self, array: ArrayId, name: &str, value: ArrayId) -> Result<(), HostError>;
}
