//! Protection registry and scoped guards for host-owned arrays.
//!
//! The host's collector reclaims any array that nothing registers as live.
//! This crate provides:
//!
//! - [`PreserveList`]: a [`Registry`](hostvec_core::Registry) backed by a
//!   slot+generation table, so stale or repeated releases are harmless.
//! - [`Protected`]: an RAII guard that holds exactly one registration and
//!   releases it on every exit path, including panic unwind.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod guard;
pub mod preserve;
mod table;

pub use guard::Protected;
pub use preserve::PreserveList;
