//! Test utilities and mock types for hostvec development.
//!
//! Provides [`MockHost`], an in-memory implementation of
//! [`Host`](hostvec_core::Host) that can hand out either representation and
//! inject failures, and [`CountingRegistry`], a
//! [`Registry`](hostvec_core::Registry) that logs every protect and release.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod host;
pub mod registry;

pub use config::{HostStats, MockHostConfig};
pub use host::MockHost;
pub use registry::{CountingRegistry, RegistryEvent};
