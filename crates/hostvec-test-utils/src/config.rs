//! Behaviour knobs for [`MockHost`](crate::MockHost).

use hostvec_core::Representation;

/// Configuration for the mock host runtime.
///
/// Defaults describe a well-behaved host that hands out materialized arrays
/// and never fails. Fault-injection fields count calls from host creation
/// (or the last [`MockHost::reset_stats`](crate::MockHost::reset_stats)).
#[derive(Clone, Debug)]
pub struct MockHostConfig {
    /// Representation of arrays produced by `allocate`.
    pub representation: Representation,

    /// Representation of arrays produced by `resize`.
    ///
    /// Default: `Materialized`, since a resized array is a fresh ordinary
    /// allocation even when the source was opaque.
    pub resized: Representation,

    /// Largest length `allocate`/`resize` will accept.
    pub max_len: Option<usize>,

    /// Allow this many successful `allocate`/`resize` calls, then fail all
    /// later ones with `AllocationFailed`.
    pub allocations_before_failure: Option<usize>,

    /// Panic (the host's unwind) on the element write with this zero-based
    /// ordinal.
    pub panic_on_write: Option<usize>,

    /// Make every region fetch fail with `Unwind`.
    pub fail_regions: bool,

    /// Copy at most this many elements per region fetch. `Some(0)` breaks
    /// the host contract on purpose.
    pub region_limit: Option<usize>,
}

impl MockHostConfig {
    /// A host that hands out arrays in the given representation, both for
    /// fresh allocations and resizes.
    pub fn uniform(representation: Representation) -> Self {
        Self {
            representation,
            resized: representation,
            ..Self::default()
        }
    }
}

impl Default for MockHostConfig {
    fn default() -> Self {
        Self {
            representation: Representation::Materialized,
            resized: Representation::Materialized,
            max_len: None,
            allocations_before_failure: None,
            panic_on_write: None,
            fail_regions: false,
            region_limit: None,
        }
    }
}

/// Call counters kept by [`MockHost`](crate::MockHost).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HostStats {
    pub allocations: usize,
    pub resizes: usize,
    pub element_reads: usize,
    pub element_writes: usize,
    pub region_reads: usize,
    pub pointer_requests: usize,
}
