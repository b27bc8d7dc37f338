//! The protection registry boundary.

use crate::error::HostError;
use crate::handle::{ArrayId, ProtectToken};

/// Table of arrays the host's collector must treat as live.
///
/// Registrations need not be released in LIFO order, but every token must be
/// released exactly once. The same array may be registered several times; it
/// stays protected until its last token is released.
///
/// Passed around as `Rc<dyn Registry>` so tests can substitute a counting
/// implementation.
pub trait Registry {
    /// Register `array`. The collector will not reclaim it until the returned
    /// token is released.
    fn protect(&self, array: ArrayId) -> Result<ProtectToken, HostError>;

    /// Release a registration. Releasing a stale token is a no-op.
    fn release(&self, token: ProtectToken);

    /// Whether at least one live registration covers `array`.
    fn is_protected(&self, array: ArrayId) -> bool;

    /// Number of live registrations.
    fn live(&self) -> usize;
}
