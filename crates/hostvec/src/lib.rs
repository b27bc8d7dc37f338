//! hostvec: typed, growable vectors over arrays owned by a garbage-collected
//! host runtime.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the hostvec sub-crates. Embedders implement [`types::Host`] (and usually
//! use [`protect::PreserveList`] as the registry); everything else is
//! available through this crate.
//!
//! # Quick start
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use hostvec::prelude::*;
//! use hostvec_test_utils::MockHost;
//!
//! let rt = Runtime::with_preserve_list(Rc::new(MockHost::new()));
//!
//! let mut v = hostvec::writable::Doubles::new(&rt);
//! for i in 0..10 {
//!     v.push(f64::from(i)).unwrap();
//! }
//! v.at_mut(0).unwrap().set(-1.0);
//! assert_eq!(v.at(0).unwrap(), -1.0);
//! assert_eq!(v.capacity(), 16);
//!
//! // Hand the array back, then view it read-only.
//! let array = v.into_array().unwrap();
//! let ro = Doubles::from_handle(&rt, array).unwrap();
//! let sum: f64 = ro.iter().map(Result::unwrap).sum();
//! assert_eq!(sum, 44.0);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `hostvec-core` | Host and registry traits, element kinds, `Logical` |
//! | [`protect`] | `hostvec-protect` | `PreserveList`, the `Protected` guard |
//! | [`vector`] | `hostvec-vector` | Read-only and writable vectors, proxies, iteration |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and the host boundary (`hostvec-core`).
///
/// Contains [`types::Host`], [`types::Registry`], [`types::ArrayId`],
/// [`types::ElementKind`] and the tri-state [`types::Logical`].
pub use hostvec_core as types;

/// Protection registry and guards (`hostvec-protect`).
pub use hostvec_protect as protect;

/// Typed vectors (`hostvec-vector`).
///
/// [`vector::Vector`] for read-only access, [`vector::WritableVector`] for
/// owned, growable storage.
pub use hostvec_vector as vector;

/// Writable vector aliases: [`writable::Doubles`], [`writable::Integers`],
/// [`writable::Logicals`].
pub use hostvec_vector::writable;

/// Common imports for typical hostvec usage.
///
/// ```rust
/// use hostvec::prelude::*;
/// ```
pub mod prelude {
    // Host boundary
    pub use hostvec_core::{
        ArrayId, Element, ElementKind, Host, HostError, Logical, Registry, Representation,
    };

    // Protection
    pub use hostvec_protect::{PreserveList, Protected};

    // Vectors
    pub use hostvec_vector::{
        BlockIter, Doubles, Integers, Logicals, NamedArg, NamedValue, Proxy, Runtime, Vector,
        VectorConfig, VectorError, WritableVector,
    };
}
