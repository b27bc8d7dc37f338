//! Typed, growable vectors over host-owned arrays.
//!
//! A host runtime owns every array and reclaims any array its collector
//! cannot reach. This crate layers typed access on top:
//!
//! - [`Vector`]: a read-only view of an existing array, with its
//!   representation (materialized or opaque) classified once at
//!   construction.
//! - [`WritableVector`]: an owning vector that protects its array, writes
//!   through assignable [`Proxy`] handles, and grows by doubling.
//! - [`BlockIter`]: forward iteration that fetches opaque arrays in blocks
//!   rather than one host call per element.
//!
//! All vectors from one [`Runtime`] share its host, registry and
//! [`VectorConfig`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod iter;
pub mod named;
pub mod proxy;
mod raw;
pub mod runtime;
pub mod vector;
mod view;
pub mod writable;

pub use config::{ConfigError, VectorConfig};
pub use error::VectorError;
pub use iter::BlockIter;
pub use named::{NamedArg, NamedValue};
pub use proxy::Proxy;
pub use runtime::Runtime;
pub use vector::{Doubles, Integers, Logicals, Vector};
pub use writable::WritableVector;
