//! Core types and traits for hostvec.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! boundary between typed vectors and the host runtime that owns (and
//! garbage-collects) the underlying arrays:
//!
//! - [`ElementKind`] and the sealed [`Element`] trait (`f64`, `i32`, [`Logical`]).
//! - [`ArrayId`], the opaque identity of a host-owned array.
//! - [`Host`], the runtime's allocation, resize and element-access surface.
//! - [`Registry`], the protection table the collector consults.
//! - [`HostError`], failures the runtime reports back across the boundary.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod element;
pub mod error;
pub mod handle;
pub mod host;
pub mod kind;
pub mod logical;
pub mod registry;

pub use element::{Element, NA_INTEGER};
pub use error::HostError;
pub use handle::{ArrayId, ProtectToken, Representation};
pub use host::Host;
pub use kind::ElementKind;
pub use logical::Logical;
pub use registry::Registry;
